//! Client-side companion to the todo API: a typed remote client that
//! normalizes every failure into one envelope shape, and the state stores
//! that mediate UI mutations through it.

pub mod config {
    use serde::Deserialize;

    #[derive(Deserialize, Debug, Clone)]
    pub struct ClientConfig {
        /// Base URL of the REST API.
        #[serde(default = "default_api_url")]
        pub api_url: String,
        /// Bearer token attached to every request when present.
        #[serde(default)]
        pub api_token: Option<String>,
    }

    impl ClientConfig {
        /// Loads configuration from environment variables
        /// (`API_URL`, `API_TOKEN`), falling back to defaults.
        pub fn from_env() -> anyhow::Result<Self> {
            let settings = config::Config::builder()
                .add_source(config::Environment::default())
                .build()?;

            let config: ClientConfig = settings.try_deserialize()?;
            Ok(config)
        }
    }

    impl Default for ClientConfig {
        fn default() -> Self {
            Self {
                api_url: default_api_url(),
                api_token: None,
            }
        }
    }

    fn default_api_url() -> String {
        "http://localhost:8080/api".to_string()
    }
}

pub mod remote;
pub mod store;

pub use remote::{ApiError, CategoryApi, RemoteClient, TagApi, TodoApi, TodoListQuery};
pub use store::{CacheEvent, CategoryStore, StatusFilter, TagStore, TodoStore};
