use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde::Deserialize;

use todo_core::model::{NewTag, Tag};

use crate::web::{ApiError, AppState};

/// Request body for creating a tag; the name is validated here.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateTagRequest {
    name: Option<String>,
}

/// Handler for GET /api/tags - unpaginated.
#[tracing::instrument(skip(state))]
pub async fn list_tags_handler(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, ApiError> {
    let store = state.records()?;
    Ok(Json(store.tags().to_vec()))
}

/// Handler for POST /api/tags.
#[tracing::instrument(skip(state, payload))]
pub async fn create_tag_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<Tag>), ApiError> {
    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Name is required"))?;

    let mut store = state.records()?;
    let tag = store.create_tag(NewTag { name });
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Creates the tags router.
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/tags", get(list_tags_handler).post(create_tag_handler))
        .with_state(state)
}
