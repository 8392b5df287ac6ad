use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde::Deserialize;

use todo_core::model::{Category, NewCategory};

use crate::web::{ApiError, AppState};

/// Request body for creating a category; the name is validated here.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCategoryRequest {
    name: Option<String>,
    color: Option<String>,
}

/// Handler for GET /api/categories - unpaginated.
#[tracing::instrument(skip(state))]
pub async fn list_categories_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Category>>, ApiError> {
    let store = state.records()?;
    Ok(Json(store.categories().to_vec()))
}

/// Handler for POST /api/categories.
#[tracing::instrument(skip(state, payload))]
pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Name is required"))?;

    let mut store = state.records()?;
    let category = store.create_category(NewCategory {
        name,
        color: payload.color,
    });
    Ok((StatusCode::CREATED, Json(category)))
}

/// Creates the categories router.
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/categories",
            get(list_categories_handler).post(create_category_handler),
        )
        .with_state(state)
}
