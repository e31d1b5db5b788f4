//! Placeboard - a small dashboard over the JSONPlaceholder API
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - One route per dashboard view                             │
//! │  - Login guard for protected views                          │
//! │  - Login / sign-up / logout                                 │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - List synchronizer (local + remote posts)                 │
//! │  - Pagination and photo/album join                          │
//! │  - Per-user view state                                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      Data Layer                              │
//! │  - Remote placeholder API (reqwest)                         │
//! │  - Local key/value store (JSON file)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers for the dashboard views
//! - `auth`: Local accounts, sessions and the login guard
//! - `config`: Configuration management
//! - `data`: Record models and the local store
//! - `error`: Error types
//! - `navigation`: Route table and guard decisions
//! - `remote`: Placeholder API client
//! - `service`: View logic
//! - `view_state`: Per-user UI state cells

pub mod api;
pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod metrics;
pub mod navigation;
pub mod remote;
pub mod service;
pub mod view_state;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains
/// shared resources like the store, the remote client and view state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Local persisted store
    pub store: Arc<data::LocalStore>,

    /// Remote placeholder API
    pub remote: remote::RemoteApi,

    /// View state per logged-in user
    pub view_states: Arc<view_state::ViewStateRegistry>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Open the local store
    /// 2. Build the remote API client
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        // 1. Open the local store
        let store = match &config.store.path {
            Some(path) => data::LocalStore::open(path).await?,
            None => data::LocalStore::in_memory(),
        };
        tracing::info!(path = ?config.store.path, "Local store opened");

        // 2. Build the remote API client
        let http_remote = remote::HttpRemote::new(&config.remote)?;
        tracing::info!(base_url = %config.remote.base_url, "Remote API client initialized");

        Ok(Self::from_parts(config, store, Arc::new(http_remote)))
    }

    /// Assemble state from already-built parts
    pub fn from_parts(
        config: config::AppConfig,
        store: data::LocalStore,
        source: Arc<dyn remote::RemoteSource>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(store),
            remote: remote::RemoteApi::new(source),
            view_states: Arc::new(view_state::ViewStateRegistry::new()),
        }
    }

    pub fn post_service(&self) -> service::PostService {
        service::PostService::new(
            self.remote.clone(),
            self.store.clone(),
            service::ListSynchronizer::new(
                self.config.dashboard.merge_policy,
                self.config.dashboard.sentinel_id,
            ),
        )
    }

    pub fn catalog_service(&self) -> service::CatalogService {
        service::CatalogService::new(self.remote.clone())
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .merge(auth::auth_router())
        .merge(api::public_router())
        .merge(api::protected_router(state.clone()))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
