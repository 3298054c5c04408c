use crate::{Artifacts, ReadonlyContext, Result, RuntimeScheduler, State, TaskScheduler};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::Arc;

#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn parameters_schema(&self) -> Option<Value> {
        None
    }
    fn response_schema(&self) -> Option<Value> {
        None
    }

    /// Function declaration advertised to models.
    fn declaration(&self) -> Value {
        let mut decl = json!({
            "name": self.name(),
            "description": self.description(),
        });
        if let Some(params) = self.parameters_schema() {
            decl["parameters"] = params;
        }
        if let Some(response) = self.response_schema() {
            decl["response"] = response;
        }
        decl
    }

    async fn execute(&self, ctx: Arc<dyn ToolContext>, args: Value) -> Result<Value>;
}

/// What a tool can reach while it runs.
///
/// `session_state` is the raw session bag; `state` is the change-tracked view
/// whose writes are reported back to the host with the tool's result.
pub trait ToolContext: ReadonlyContext {
    fn function_call_id(&self) -> &str;
    fn session_state(&self) -> &dyn State;
    fn state(&self) -> &dyn State;
    fn artifacts(&self) -> Option<Arc<dyn Artifacts>>;
    fn scheduler(&self) -> Arc<dyn TaskScheduler> {
        Arc::new(RuntimeScheduler)
    }
}
