//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use std::sync::Once;

use lazy_static::lazy_static;
use prometheus::{HistogramOpts, IntCounterVec, IntGauge, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("placeboard_http_requests_total", "Total number of view requests"),
        &["view", "status"]
    ).expect("metric can be created");

    // Remote API Metrics
    pub static ref REMOTE_FETCHES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("placeboard_remote_fetches_total", "Total number of remote API fetches"),
        &["resource", "outcome"]
    ).expect("metric can be created");
    pub static ref REMOTE_FETCH_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "placeboard_remote_fetch_duration_seconds",
            "Remote API fetch duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["resource"]
    ).expect("metric can be created");

    // Local Store Metrics
    pub static ref STORE_OPERATIONS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("placeboard_store_operations_total", "Total number of local store operations"),
        &["operation", "key"]
    ).expect("metric can be created");
    pub static ref STORE_DECODE_FAILURES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("placeboard_store_decode_failures_total", "Stored values that failed to decode"),
        &["key"]
    ).expect("metric can be created");
    pub static ref LOCAL_POSTS_TOTAL: IntGauge = IntGauge::new(
        "placeboard_local_posts_total",
        "Number of locally created posts"
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("placeboard_errors_total", "Total number of errors returned to clients"),
        &["error_type"]
    ).expect("metric can be created");
}

static INIT: Once = Once::new();

/// Initialize metrics registry.
///
/// Safe to call more than once; only the first call registers.
pub fn init_metrics() {
    INIT.call_once(|| {
        REGISTRY
            .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
            .expect("HTTP_REQUESTS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(REMOTE_FETCHES_TOTAL.clone()))
            .expect("REMOTE_FETCHES_TOTAL can be registered");
        REGISTRY
            .register(Box::new(REMOTE_FETCH_DURATION_SECONDS.clone()))
            .expect("REMOTE_FETCH_DURATION_SECONDS can be registered");
        REGISTRY
            .register(Box::new(STORE_OPERATIONS_TOTAL.clone()))
            .expect("STORE_OPERATIONS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(STORE_DECODE_FAILURES_TOTAL.clone()))
            .expect("STORE_DECODE_FAILURES_TOTAL can be registered");
        REGISTRY
            .register(Box::new(LOCAL_POSTS_TOTAL.clone()))
            .expect("LOCAL_POSTS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(ERRORS_TOTAL.clone()))
            .expect("ERRORS_TOTAL can be registered");

        tracing::info!("Metrics registry initialized");
    });
}
