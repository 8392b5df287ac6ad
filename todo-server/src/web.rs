use std::sync::{Arc, Mutex, MutexGuard};

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use todo_core::RecordStore;

use crate::config::Config;

/// Shared handler state: one injected record store, serialized behind a
/// single mutex. The backend is single-process and non-concurrent by
/// contract; the mutex only satisfies axum's `Send + Sync` requirement.
#[derive(Clone)]
pub struct AppState {
    store: Arc<Mutex<RecordStore>>,
}

impl AppState {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Locks the record store. A poisoned lock surfaces as the generic
    /// internal-error envelope rather than leaking the panic.
    pub fn records(&self) -> Result<MutexGuard<'_, RecordStore>, ApiError> {
        self.store.lock().map_err(|err| {
            tracing::error!("Record store lock poisoned: {}", err);
            ApiError::internal("Internal server error")
        })
    }
}

/// Wire shape of every failed response:
/// `{"error":{"code","message","details"?}}`.
#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Failure taxonomy of the resource handlers. Validation and internal
/// errors answer 400, missing records answer 404; the envelope code is the
/// status as a numeric string.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::Internal(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let envelope = ErrorEnvelope {
            error: ErrorDetail {
                code: status.as_u16().to_string(),
                message: self.to_string(),
                details: None,
            },
        };
        (status, Json(envelope)).into_response()
    }
}

/// Assembles the application router: the REST surface under `/api`, a
/// health probe at the root, request tracing and permissive CORS.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", axum::routing::get(health_check_handler))
        .nest("/api", crate::api::create_api_router(state))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

#[tracing::instrument(skip(config))]
pub async fn start_web_server(config: Config) -> anyhow::Result<()> {
    let server_address = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&server_address).await?;
    tracing::info!("Todo server running on http://{}", server_address);

    let state = AppState::new(RecordStore::with_sample_data());
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

#[tracing::instrument]
pub async fn health_check_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn validation_error_renders_400_envelope() {
        let response = ApiError::validation("Title is required").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "400");
        assert_eq!(json["error"]["message"], "Title is required");
        assert!(json["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn not_found_error_renders_404_envelope() {
        let response = ApiError::not_found("Todo not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"]["code"], "404");
        assert_eq!(json["error"]["message"], "Todo not found");
    }
}
