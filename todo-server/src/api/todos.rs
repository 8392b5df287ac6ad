use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use todo_core::model::{
    NewReminder, NewTodo, NotifyMethod, Page, PageRequest, Reminder, Todo, TodoPatch, TodoStatus,
};

use crate::web::{ApiError, AppState};

/// Query parameters for listing todos. Parsed leniently: an unrecognized
/// status means "no filter", non-numeric bounds fall back to the defaults.
#[derive(Debug, Deserialize)]
pub struct TodosQuery {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    page: Option<String>,
    #[serde(default)]
    limit: Option<String>,
}

/// An id that does not parse as a UUID cannot name a record, so it answers
/// the same not-found envelope as an unknown id.
fn todo_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("Todo not found"))
}

/// Request body for creating a todo. The title is validated here, before
/// the record store is touched; the status defaults to `pending`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTodoRequest {
    title: Option<String>,
    description: Option<String>,
    status: Option<TodoStatus>,
    due_date: Option<DateTime<Utc>>,
    category_id: Option<Uuid>,
    tag_ids: Option<Vec<Uuid>>,
    memo_id: Option<Uuid>,
}

/// Request body for creating a reminder under a todo.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateReminderRequest {
    time: Option<DateTime<Utc>>,
    notify_method: Option<NotifyMethod>,
}

/// Handler for GET /api/todos - paginated, optionally filtered by status.
#[tracing::instrument(skip(state))]
pub async fn list_todos_handler(
    State(state): State<AppState>,
    Query(query): Query<TodosQuery>,
) -> Result<Json<Page<Todo>>, ApiError> {
    let store = state.records()?;
    let status = query.status.as_deref().and_then(TodoStatus::parse);
    let pagination = PageRequest {
        page: query.page.as_deref().and_then(|raw| raw.parse().ok()).unwrap_or(1),
        limit: query.limit.as_deref().and_then(|raw| raw.parse().ok()).unwrap_or(20),
    };
    Ok(Json(store.list_todos(status, Some(pagination))))
}

/// Handler for POST /api/todos.
#[tracing::instrument(skip(state, payload))]
pub async fn create_todo_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), ApiError> {
    let title = payload
        .title
        .filter(|title| !title.trim().is_empty())
        .ok_or_else(|| ApiError::validation("Title is required"))?;

    let mut store = state.records()?;
    let todo = store.create_todo(NewTodo {
        title,
        description: payload.description,
        status: payload.status,
        due_date: payload.due_date,
        category_id: payload.category_id,
        tag_ids: payload.tag_ids,
        memo_id: payload.memo_id,
    });
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Handler for GET /api/todos/{id}.
#[tracing::instrument(skip(state))]
pub async fn get_todo_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Todo>, ApiError> {
    let id = todo_id(&id)?;
    let store = state.records()?;
    store
        .todo(id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Todo not found"))
}

/// Handler for PUT /api/todos/{id} - patches the listed fields only.
#[tracing::instrument(skip(state, payload))]
pub async fn update_todo_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<TodoPatch>,
) -> Result<Json<Todo>, ApiError> {
    let id = todo_id(&id)?;
    let mut store = state.records()?;
    store
        .update_todo(id, payload)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Todo not found"))
}

/// Handler for DELETE /api/todos/{id} - cascades to owned reminders and
/// answers a bodyless 204.
#[tracing::instrument(skip(state))]
pub async fn delete_todo_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = todo_id(&id)?;
    let mut store = state.records()?;
    if !store.delete_todo(id) {
        return Err(ApiError::not_found("Todo not found"));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/todos/{id}/reminders - the owning todo must exist.
#[tracing::instrument(skip(state))]
pub async fn list_reminders_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Reminder>>, ApiError> {
    let id = todo_id(&id)?;
    let store = state.records()?;
    if store.todo(id).is_none() {
        return Err(ApiError::not_found("Todo not found"));
    }
    Ok(Json(store.reminders_for(id)))
}

/// Handler for POST /api/todos/{id}/reminders.
#[tracing::instrument(skip(state, payload))]
pub async fn create_reminder_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<CreateReminderRequest>,
) -> Result<(StatusCode, Json<Reminder>), ApiError> {
    let id = todo_id(&id)?;
    let mut store = state.records()?;
    if store.todo(id).is_none() {
        return Err(ApiError::not_found("Todo not found"));
    }
    let time = payload
        .time
        .ok_or_else(|| ApiError::validation("Time is required"))?;

    let reminder = store.create_reminder(
        id,
        NewReminder {
            time,
            notify_method: payload.notify_method,
        },
    );
    Ok((StatusCode::CREATED, Json(reminder)))
}

/// Creates the todos (and nested reminders) router.
pub fn create_api_router(state: AppState) -> Router {
    Router::new()
        .route("/todos", get(list_todos_handler).post(create_todo_handler))
        .route(
            "/todos/{id}",
            get(get_todo_handler)
                .put(update_todo_handler)
                .delete(delete_todo_handler),
        )
        .route(
            "/todos/{id}/reminders",
            get(list_reminders_handler).post(create_reminder_handler),
        )
        .with_state(state)
}
