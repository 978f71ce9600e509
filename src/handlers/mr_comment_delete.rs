use crate::{
    auth::session::Session,
    clients::mega_client::BackendError,
    models::{ErrorResponse, MrCommentDeleteResponse},
    state::AppState,
};
use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{debug, error, info, warn};

/// Delete a merge request comment through the internal API
pub async fn mr_comment_delete(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    // Unauthenticated callers get a bare 401 whatever the id, and the backend is never called
    let user = match state.session_verifier.verify(&headers) {
        Session::Authenticated(user) => user,
        Session::Unauthenticated => {
            info!("Rejected unauthenticated comment delete");
            return Ok(StatusCode::UNAUTHORIZED.into_response());
        }
    };

    let id = match path {
        Ok(Path(id)) => id,
        Err(rejection) => {
            warn!("User '{}' sent an unreadable comment id: {}", user.uid, rejection);
            return Ok(rejection.into_response());
        }
    };

    info!("User '{}' deleting merge request comment '{}'", user.uid, id);
    debug!("Session roles {:?}", user.roles);

    let data = match state.mega_client.delete_mr_comment(&id).await {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to delete comment '{}': {}", id, e);
            let status = StatusCode::BAD_GATEWAY;
            let message = match e {
                BackendError::Request(_) => "Internal API request failed",
                BackendError::InvalidJson(_) => "Internal API returned an invalid response",
            };
            return Err((status, Json(ErrorResponse::new(status, message))));
        }
    };

    Ok((StatusCode::OK, Json(MrCommentDeleteResponse { data })).into_response())
}

#[cfg(test)]
mod tests {
    use crate::{
        auth::session::{Session, SessionVerifier, UserContext},
        clients::mega_client::MegaClient,
        routes::create_api_routes,
        state::AppState,
    };
    use axum::{
        body::Body,
        http::{header, HeaderMap, Method, Request, StatusCode, Uri},
        Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tower::ServiceExt;

    struct StaticVerifier(Session);

    impl SessionVerifier for StaticVerifier {
        fn verify(&self, _headers: &HeaderMap) -> Session {
            self.0.clone()
        }
    }

    fn signed_in() -> StaticVerifier {
        StaticVerifier(Session::Authenticated(UserContext {
            uid: "alice".to_string(),
            roles: Vec::new(),
        }))
    }

    fn signed_out() -> StaticVerifier {
        StaticVerifier(Session::Unauthenticated)
    }

    type Hits = Arc<Mutex<Vec<String>>>;

    /// Start a throwaway backend that records every request and always answers with `body`
    async fn fake_backend(status: StatusCode, body: &'static str) -> (String, Hits) {
        let hits: Hits = Arc::new(Mutex::new(Vec::new()));
        let recorded = hits.clone();
        let app = Router::new().fallback(move |method: Method, uri: Uri| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().unwrap().push(format!("{} {}", method, uri));
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), hits)
    }

    /// Start a backend that accepts the request but never answers in time
    async fn hanging_backend() -> (String, Hits) {
        let hits: Hits = Arc::new(Mutex::new(Vec::new()));
        let recorded = hits.clone();
        let app = Router::new().fallback(move |uri: Uri| {
            let recorded = recorded.clone();
            async move {
                recorded.lock().unwrap().push(uri.to_string());
                tokio::time::sleep(Duration::from_secs(30)).await;
                "{}"
            }
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}", addr), hits)
    }

    fn app(base_url: &str, verifier: StaticVerifier) -> Router {
        app_with_timeout(base_url, verifier, Duration::from_secs(5))
    }

    fn app_with_timeout(base_url: &str, verifier: StaticVerifier, timeout: Duration) -> Router {
        let client = MegaClient::new(base_url, timeout).unwrap();
        Router::new().nest("/api", create_api_routes(AppState::new(client, verifier)))
    }

    async fn delete(app: Router, id: &str) -> (StatusCode, Vec<u8>) {
        let request = Request::builder()
            .method("POST")
            .uri(format!("/api/v1/mr/comment/{}/delete", id))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn deleted_comment_is_wrapped_in_data() {
        let (base_url, hits) = fake_backend(StatusCode::OK, r#"{"deleted":42}"#).await;

        let (status, body) = delete(app(&base_url, signed_in()), "42").await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "data": { "deleted": 42 } }));
        assert_eq!(
            *hits.lock().unwrap(),
            vec!["POST /api/v1/mr/comment/42/delete".to_string()]
        );
    }

    #[tokio::test]
    async fn backend_body_is_relayed_unchanged() {
        let (base_url, _hits) = fake_backend(StatusCode::OK, r#"{"ok": true}"#).await;

        let (status, body) = delete(app(&base_url, signed_in()), "7").await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body, json!({ "data": { "ok": true } }));
    }

    #[tokio::test]
    async fn unauthenticated_caller_gets_empty_401_and_no_backend_call() {
        let (base_url, hits) = fake_backend(StatusCode::OK, r#"{"deleted":42}"#).await;

        let (status, body) = delete(app(&base_url, signed_out()), "42").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());
        assert!(hits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn id_reaches_backend_without_validation() {
        let (base_url, hits) = fake_backend(StatusCode::OK, "{}").await;

        let (status, _) = delete(app(&base_url, signed_in()), "not-a-number_x.y").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            *hits.lock().unwrap(),
            vec!["POST /api/v1/mr/comment/not-a-number_x.y/delete".to_string()]
        );
    }

    #[tokio::test]
    async fn backend_error_status_with_json_is_still_relayed() {
        let (base_url, _hits) = fake_backend(
            StatusCode::NOT_FOUND,
            r#"{"req_result":false,"err_message":"comment not found"}"#,
        )
        .await;

        let (status, body) = delete(app(&base_url, signed_in()), "999").await;

        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["data"]["err_message"], "comment not found");
    }

    #[tokio::test]
    async fn non_json_backend_reply_is_a_bad_gateway() {
        let (base_url, hits) = fake_backend(StatusCode::OK, "<html>oops</html>").await;

        let (status, body) = delete(app(&base_url, signed_in()), "42").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["code"], 502);
        assert_eq!(body["error"], "Internal API returned an invalid response");
        assert_eq!(hits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_bad_gateway() {
        // Grab a free port, then close it so nothing is listening there
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let (status, body) = delete(app(&format!("http://{}", addr), signed_in()), "42").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Internal API request failed");
    }

    #[tokio::test]
    async fn get_is_not_routed() {
        let (base_url, hits) = fake_backend(StatusCode::OK, "{}").await;

        let request = Request::builder()
            .method("GET")
            .uri("/api/v1/mr/comment/42/delete")
            .body(Body::empty())
            .unwrap();
        let response = app(&base_url, signed_in()).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(hits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn hanging_backend_times_out_as_bad_gateway() {
        let (base_url, hits) = hanging_backend().await;
        let app = app_with_timeout(&base_url, signed_in(), Duration::from_millis(300));

        let started = std::time::Instant::now();
        let (status, body) = delete(app, "42").await;

        assert!(started.elapsed() < Duration::from_secs(10));
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let body: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["error"], "Internal API request failed");
        assert_eq!(hits.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unreadable_id_from_unauthenticated_caller_is_still_401() {
        let (base_url, hits) = fake_backend(StatusCode::OK, "{}").await;

        let (status, body) = delete(app(&base_url, signed_out()), "%FF").await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.is_empty());
        assert!(hits.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn unreadable_id_from_signed_in_caller_is_rejected() {
        let (base_url, hits) = fake_backend(StatusCode::OK, "{}").await;

        let (status, _) = delete(app(&base_url, signed_in()), "%FF").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(hits.lock().unwrap().is_empty());
    }
}
