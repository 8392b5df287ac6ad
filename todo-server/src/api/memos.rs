use axum::Router;
use axum::extract::{Path, State};
use axum::response::Json;
use axum::routing::get;
use uuid::Uuid;

use todo_core::model::{Memo, MemoPatch};

use crate::web::{ApiError, AppState};

/// An id that does not parse as a UUID cannot name a record, so it answers
/// the same not-found envelope as an unknown id.
fn memo_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Memo not found"))
}

/// Handler for GET /api/memos/{id}.
#[tracing::instrument(skip(state))]
pub async fn get_memo_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Memo>, ApiError> {
    let id = memo_id(&id)?;
    let store = state.records()?;
    store
        .memo(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Memo not found"))
}

/// Handler for PUT /api/memos/{id} - patches the listed fields only.
#[tracing::instrument(skip(state, payload))]
pub async fn update_memo_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<MemoPatch>,
) -> Result<Json<Memo>, ApiError> {
    let id = memo_id(&id)?;
    let mut store = state.records()?;
    store
        .update_memo(id, payload)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Memo not found"))
}

/// Creates the memos router.
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/memos/{id}", get(get_memo_handler).put(update_memo_handler))
        .with_state(state)
}
