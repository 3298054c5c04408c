use periodic_core::{Event, Result, Session};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct CreateRequest {
    pub app_name: String,
    pub user_id: String,
    /// Generated when absent.
    pub session_id: Option<String>,
    pub state: HashMap<String, Value>,
}

impl CreateRequest {
    pub fn new(app_name: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: None,
            state: HashMap::new(),
        }
    }

    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct GetRequest {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

#[derive(Debug, Clone)]
pub struct ListRequest {
    pub app_name: String,
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteRequest {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

#[async_trait]
pub trait SessionService: Send + Sync {
    async fn create(&self, req: CreateRequest) -> Result<Arc<dyn Session>>;
    async fn get(&self, req: GetRequest) -> Result<Arc<dyn Session>>;
    async fn list(&self, req: ListRequest) -> Result<Vec<Arc<dyn Session>>>;
    async fn delete(&self, req: DeleteRequest) -> Result<()>;

    /// Records `event` and merges its state delta into the session state.
    async fn append_event(&self, session_id: &str, event: Event) -> Result<()>;
}
