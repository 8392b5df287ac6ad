mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use crate::common::{send, test_app};

#[tokio::test]
async fn creating_a_category_requires_a_name() {
    let app = test_app();

    let (status, body) = send(&app, Method::POST, "/api/categories", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "400");
    assert_eq!(body["error"]["message"], "Name is required");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({ "name": "", "color": "#fff" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Name is required");
}

#[tokio::test]
async fn created_categories_are_listed() {
    let app = test_app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/categories",
        Some(json!({ "name": "Work", "color": "#ff5722" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Work");
    assert_eq!(created["color"], "#ff5722");
    assert!(created["id"].is_string());

    let (status, list) = send(&app, Method::GET, "/api/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    assert_eq!(list[0], created);
}
