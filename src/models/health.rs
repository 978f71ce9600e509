use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// API response for the health and readiness probes
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
