use axum::{extract::Extension, http::StatusCode, Json};
use serde::Serialize;

use crate::server::app::AxumAppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub adapter: AdapterHealth,
}

#[derive(Debug, Serialize)]
pub struct AdapterHealth {
    pub reachable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Health check endpoint
///
/// Polls the adapter service status endpoint. Returns 200 OK when it
/// answers, 503 Service Unavailable otherwise.
pub async fn health_handler(
    Extension(state): Extension<AxumAppState>,
) -> (StatusCode, Json<HealthResponse>) {
    let status = state.server_deps.adapter.check_status().await;
    let is_healthy = status.is_some();

    let adapter = AdapterHealth {
        reachable: is_healthy,
        version: status.and_then(|s| s.version),
    };

    let (status_code, overall_status) = if is_healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall_status.to_string(),
            adapter,
        }),
    )
}
