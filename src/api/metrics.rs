//! Prometheus metrics endpoint

use axum::response::{IntoResponse, Response};
use prometheus::{Encoder, TextEncoder};

use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::metrics::REGISTRY;

/// GET /metrics
///
/// Returns all metrics in Prometheus text format. Sits behind the login
/// guard like every other non-public route.
pub async fn metrics_handler(CurrentUser(_auth): CurrentUser) -> Result<Response, AppError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();

    let metrics_text = encoder
        .encode_to_string(&metric_families)
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok((
        axum::http::StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, encoder.format_type().to_string())],
        metrics_text,
    )
        .into_response())
}
