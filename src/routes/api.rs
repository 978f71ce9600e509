use crate::{
    handlers::{health_check, mr_comment_delete, ready_check},
    state::AppState,
};
use axum::{
    routing::{get, post},
    Router,
};

/// Create API routes
pub fn create_api_routes(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/v1/mr/comment/:id/delete", post(mr_comment_delete))
        .with_state(state)
}
