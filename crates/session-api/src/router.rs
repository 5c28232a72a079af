//! Route table

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::error::handle_panic;
use crate::handlers::{health, sessions};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Session routes
        .route("/api/v1/sessions", post(sessions::create_session))
        .route(
            "/api/v1/sessions/{id}",
            get(sessions::get_session)
                .put(sessions::put_session)
                .delete(sessions::delete_session),
        )
        .route("/api/v1/sessions/{id}/exists", get(sessions::session_exists))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use session_core::SessionStore;
    use session_infrastructure::{JsonSerializer, MemoryExecutor};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app_with(executor: MemoryExecutor) -> Router {
        let store = SessionStore::new(executor, JsonSerializer::new());
        build_router(AppState::new(Arc::new(store)))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_health() {
        let app = app_with(MemoryExecutor::new(2));
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let app = app_with(MemoryExecutor::new(2));

        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/sessions",
            Some(json!({
                "context_path": "/shop",
                "virtual_host": "shop.example.com",
                "max_inactive_ms": 60000,
                "attributes": {"user": "alice"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let created = body["data"].clone();
        let id = created["id"].as_str().unwrap().to_string();
        assert!(created["last_saved"].as_i64().unwrap() > 0);

        let (status, body) = send(&app, "GET", &format!("/api/v1/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["session_id"], id.as_str());
        assert_eq!(body["data"], created);

        let mut updated = created.clone();
        updated["attributes"]["cart"] = json!(["A-1"]);
        let (status, body) = send(&app, "PUT", &format!("/api/v1/sessions/{}", id), Some(updated)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["attributes"]["cart"], json!(["A-1"]));

        let (_, body) = send(&app, "GET", &format!("/api/v1/sessions/{}/exists", id), None).await;
        assert_eq!(body["data"]["exists"], true);

        let (_, body) = send(&app, "DELETE", &format!("/api/v1/sessions/{}", id), None).await;
        assert_eq!(body["data"]["deleted"], true);
        let (_, body) = send(&app, "DELETE", &format!("/api/v1/sessions/{}", id), None).await;
        assert_eq!(body["data"]["deleted"], false);

        let (status, body) = send(&app, "GET", &format!("/api/v1/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_create_validation() {
        let app = app_with(MemoryExecutor::new(2));
        let (status, body) = send(
            &app,
            "POST",
            "/api/v1/sessions",
            Some(json!({"context_path": "", "virtual_host": "localhost"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_put_with_mismatched_id_is_bad_request() {
        let app = app_with(MemoryExecutor::new(2));
        let record = json!({
            "id": "abc",
            "context_path": "/",
            "virtual_host": "localhost",
            "created": 1, "accessed": 1, "last_accessed": 1, "max_inactive_ms": 0
        });
        let (status, body) = send(&app, "PUT", "/api/v1/sessions/xyz", Some(record)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_failure_becomes_generic_500() {
        let executor = MemoryExecutor::new(2);
        executor.fail_next_checkouts(u32::MAX);
        let app = app_with(executor);

        let (status, body) = send(&app, "GET", "/api/v1/sessions/abc", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
        assert_eq!(body["error"]["message"], "Internal server error");
    }

    async fn exploding_handler() -> &'static str {
        panic!("handler exploded")
    }

    #[tokio::test]
    async fn test_panic_becomes_generic_500() {
        let app: Router = Router::new()
            .route("/boom", get(exploding_handler))
            .layer(CatchPanicLayer::custom(handle_panic));

        let (status, body) = send(&app, "GET", "/boom", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "Internal server error");
    }
}
