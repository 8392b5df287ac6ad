//! HTTP wrapper around the REST API. Every failure, whatever its cause,
//! reaches callers as an [`ApiError`] carrying the envelope fields; no
//! transport detail leaks past this module.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use todo_core::model::{
    Category, Memo, MemoPatch, NewCategory, NewReminder, NewTag, NewTodo, Page, Reminder, Tag,
    Todo, TodoPatch, TodoStatus,
};

use crate::config::ClientConfig;

/// Sentinel code for failures where no response was received at all,
/// distinct from every HTTP status code.
pub const NETWORK_ERROR_CODE: &str = "NETWORK_ERROR";
/// Sentinel code for failures in building or decoding a request locally.
pub const REQUEST_ERROR_CODE: &str = "REQUEST_ERROR";

/// Normalized failure shape: the server's error envelope, or a synthesized
/// equivalent for transport-level failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// True for 404-family failures; fetches treat these as "no data".
    pub fn is_not_found(&self) -> bool {
        self.code == StatusCode::NOT_FOUND.as_u16().to_string()
    }

    fn network() -> Self {
        Self {
            code: NETWORK_ERROR_CODE.to_string(),
            message: "No response from server. Please check your connection or server status."
                .to_string(),
            details: None,
        }
    }

    fn request(message: String) -> Self {
        Self {
            code: REQUEST_ERROR_CODE.to_string(),
            message,
            details: None,
        }
    }

    fn from_transport(err: reqwest::Error) -> Self {
        tracing::error!("API transport error: {}", err);
        if err.is_builder() || err.is_decode() {
            Self::request(err.to_string())
        } else {
            Self::network()
        }
    }

    async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body: Option<serde_json::Value> = response.json().await.ok();
        let message = body
            .as_ref()
            .and_then(|value| value.pointer("/error/message"))
            .and_then(|message| message.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| format!("Server error: {}", status.as_u16()));
        tracing::error!("API error {}: {}", status, message);
        Self {
            code: status.as_u16().to_string(),
            message,
            details: body,
        }
    }
}

/// Query parameters for listing todos.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TodoListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TodoStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

/// Todo operations the state store depends on; the seam where tests inject
/// scripted doubles.
#[allow(async_fn_in_trait)]
pub trait TodoApi {
    async fn list_todos(&self, query: &TodoListQuery) -> Result<Page<Todo>, ApiError>;
    async fn todo(&self, id: Uuid) -> Result<Todo, ApiError>;
    async fn create_todo(&self, new: &NewTodo) -> Result<Todo, ApiError>;
    async fn update_todo(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo, ApiError>;
    async fn delete_todo(&self, id: Uuid) -> Result<(), ApiError>;
}

/// Category operations used by [`crate::store::CategoryStore`].
#[allow(async_fn_in_trait)]
pub trait CategoryApi {
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;
    async fn create_category(&self, new: &NewCategory) -> Result<Category, ApiError>;
}

/// Tag operations used by [`crate::store::TagStore`].
#[allow(async_fn_in_trait)]
pub trait TagApi {
    async fn tags(&self) -> Result<Vec<Tag>, ApiError>;
    async fn create_tag(&self, new: &NewTag) -> Result<Tag, ApiError>;
}

/// reqwest-backed client holding the base URL and the bearer token taken
/// from client-side persisted configuration.
#[derive(Debug, Clone)]
pub struct RemoteClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RemoteClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        }
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(&ClientConfig {
            api_url: base_url.into(),
            api_token: None,
        })
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, format!("{}{}", self.base_url, path))
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        request
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request.send().await.map_err(ApiError::from_transport)?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        response.json().await.map_err(ApiError::from_transport)
    }

    /// For operations whose success payload is irrelevant (delete answers a
    /// bodyless 204).
    async fn send_expect_success(&self, request: RequestBuilder) -> Result<(), ApiError> {
        let response = request.send().await.map_err(ApiError::from_transport)?;
        if !response.status().is_success() {
            return Err(ApiError::from_response(response).await);
        }
        Ok(())
    }

    pub async fn reminders_for(&self, todo_id: Uuid) -> Result<Vec<Reminder>, ApiError> {
        self.send_json(self.request(Method::GET, &format!("/todos/{todo_id}/reminders")))
            .await
    }

    pub async fn create_reminder(
        &self,
        todo_id: Uuid,
        new: &NewReminder,
    ) -> Result<Reminder, ApiError> {
        self.send_json(
            self.request(Method::POST, &format!("/todos/{todo_id}/reminders"))
                .json(new),
        )
        .await
    }

    pub async fn memo(&self, id: Uuid) -> Result<Memo, ApiError> {
        self.send_json(self.request(Method::GET, &format!("/memos/{id}")))
            .await
    }

    pub async fn update_memo(&self, id: Uuid, patch: &MemoPatch) -> Result<Memo, ApiError> {
        self.send_json(self.request(Method::PUT, &format!("/memos/{id}")).json(patch))
            .await
    }
}

impl TodoApi for RemoteClient {
    async fn list_todos(&self, query: &TodoListQuery) -> Result<Page<Todo>, ApiError> {
        self.send_json(self.request(Method::GET, "/todos").query(query))
            .await
    }

    async fn todo(&self, id: Uuid) -> Result<Todo, ApiError> {
        self.send_json(self.request(Method::GET, &format!("/todos/{id}")))
            .await
    }

    async fn create_todo(&self, new: &NewTodo) -> Result<Todo, ApiError> {
        self.send_json(self.request(Method::POST, "/todos").json(new))
            .await
    }

    async fn update_todo(&self, id: Uuid, patch: &TodoPatch) -> Result<Todo, ApiError> {
        self.send_json(self.request(Method::PUT, &format!("/todos/{id}")).json(patch))
            .await
    }

    async fn delete_todo(&self, id: Uuid) -> Result<(), ApiError> {
        self.send_expect_success(self.request(Method::DELETE, &format!("/todos/{id}")))
            .await
    }
}

impl CategoryApi for RemoteClient {
    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.send_json(self.request(Method::GET, "/categories")).await
    }

    async fn create_category(&self, new: &NewCategory) -> Result<Category, ApiError> {
        self.send_json(self.request(Method::POST, "/categories").json(new))
            .await
    }
}

impl TagApi for RemoteClient {
    async fn tags(&self) -> Result<Vec<Tag>, ApiError> {
        self.send_json(self.request(Method::GET, "/tags")).await
    }

    async fn create_tag(&self, new: &NewTag) -> Result<Tag, ApiError> {
        self.send_json(self.request(Method::POST, "/tags").json(new))
            .await
    }
}
