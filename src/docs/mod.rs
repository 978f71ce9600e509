use utoipa::OpenApi;
use crate::models::*;

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Readiness probe
#[utoipa::path(
    get,
    path = "/api/ready",
    responses(
        (status = 200, description = "Service is ready", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn ready_check_doc() {}

/// Delete a merge request comment
#[utoipa::path(
    post,
    path = "/api/v1/mr/comment/{id}/delete",
    params(
        ("id" = String, Path, description = "Comment identifier, passed to the internal API as is")
    ),
    responses(
        (status = 200, description = "Internal API reply wrapped in `data`", body = MrCommentDeleteResponse),
        (status = 401, description = "No valid session"),
        (status = 502, description = "Internal API unreachable or replied with invalid JSON", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn mr_comment_delete_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        ready_check_doc,
        mr_comment_delete_doc,
    ),
    components(
        schemas(HealthResponse, MrCommentDeleteResponse, ErrorResponse)
    ),
    tags(
        (name = "api", description = "API endpoints")
    )
)]
pub struct ApiDoc;
