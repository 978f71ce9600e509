use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Envelope around the internal API's reply to a comment deletion
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MrCommentDeleteResponse {
    /// Backend JSON, relayed unchanged
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}
