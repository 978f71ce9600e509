use axum::Json;
use crate::models::HealthResponse;
use tracing::debug;

fn ok(message: &str) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: message.to_string(),
    })
}

/// Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    debug!("Health check requested");
    ok("Server is running")
}

/// Readiness probe. The internal API client is built before the listener binds,
/// so a running server is ready to proxy.
pub async fn ready_check() -> Json<HealthResponse> {
    debug!("Readiness check requested");
    ok("Service is ready")
}
