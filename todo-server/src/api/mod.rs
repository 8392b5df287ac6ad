//! HTTP resource handlers: one module per resource, each contributing its
//! routes to the `/api` router.

pub mod categories;
pub mod memos;
pub mod tags;
pub mod todos;

use axum::Router;

use crate::web::AppState;

/// Merges the per-resource routers into the REST API surface.
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .merge(todos::create_api_router(state.clone()))
        .merge(categories::create_api_router(state.clone()))
        .merge(tags::create_api_router(state.clone()))
        .merge(memos::create_api_router(state))
}
