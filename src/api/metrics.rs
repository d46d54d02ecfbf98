//! `/metrics` endpoint, mounted on every service outside `/api`

use axum::{
    Router,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus::{Encoder, TextEncoder};

use crate::error::AppError;
use crate::metrics::REGISTRY;

async fn render_metrics() -> Result<Response, AppError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to encode metrics");
            AppError::Internal(anyhow::anyhow!("metrics encoding failed: {e}"))
        })?;

    Ok(([(CONTENT_TYPE, encoder.format_type().to_string())], buffer).into_response())
}

/// Router serving the process-wide registry; unauthenticated.
pub fn metrics_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(render_metrics))
}
