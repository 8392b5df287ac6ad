use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use todo_core::RecordStore;
use todo_server::web::{AppState, create_router};
use tower::ServiceExt;

/// Builds the application router over a fresh, empty record store.
pub fn test_app() -> Router {
    app_with_store(RecordStore::new())
}

/// Builds the application router over a pre-seeded record store.
#[allow(dead_code)] // not every test binary seeds the store
pub fn app_with_store(store: RecordStore) -> Router {
    create_router(AppState::new(store))
}

/// Sends one request through the router and returns the status plus the
/// parsed JSON body (`Null` for empty bodies).
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .expect("request should build"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router should answer");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body should be JSON")
    };
    (status, json)
}
