//! `lookup`: calls the tool directly against a throwaway session.

use anyhow::Result;
use periodic_artifact::{ArtifactScope, InMemoryArtifactService, ScopedArtifacts};
use periodic_core::{
    Artifacts, BackgroundTask, Content, DeltaState, ReadonlyContext, Session, State,
    TaskScheduler, Tool, ToolContext,
};
use periodic_session::{CreateRequest, InMemorySessionService, SessionService};
use periodic_tool::{ElementInfo, element_info_tool};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex, PoisonError};

use crate::agent::{AGENT_NAME, APP_NAME};

/// Holds scheduled side effects so the command can finish them before printing.
#[derive(Default)]
struct PendingTasks {
    tasks: Mutex<Vec<BackgroundTask>>,
}

impl PendingTasks {
    async fn finish(&self) {
        let tasks: Vec<_> = self.tasks.lock().unwrap_or_else(PoisonError::into_inner).drain(..).collect();
        for task in tasks {
            task.await;
        }
    }
}

impl TaskScheduler for PendingTasks {
    fn schedule(&self, task: BackgroundTask) {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner).push(task);
    }
}

struct LookupContext {
    session: Arc<dyn Session>,
    session_state: Arc<dyn State>,
    state: DeltaState,
    artifacts: Arc<dyn Artifacts>,
    scheduler: Arc<PendingTasks>,
    user_content: Content,
}

impl ReadonlyContext for LookupContext {
    fn invocation_id(&self) -> &str {
        "lookup"
    }
    fn agent_name(&self) -> &str {
        AGENT_NAME
    }
    fn user_id(&self) -> &str {
        self.session.user_id()
    }
    fn app_name(&self) -> &str {
        self.session.app_name()
    }
    fn session_id(&self) -> &str {
        self.session.id()
    }
    fn user_content(&self) -> &Content {
        &self.user_content
    }
}

impl ToolContext for LookupContext {
    fn function_call_id(&self) -> &str {
        "lookup"
    }
    fn session_state(&self) -> &dyn State {
        self.session_state.as_ref()
    }
    fn state(&self) -> &dyn State {
        &self.state
    }
    fn artifacts(&self) -> Option<Arc<dyn Artifacts>> {
        Some(self.artifacts.clone())
    }
    fn scheduler(&self) -> Arc<dyn TaskScheduler> {
        self.scheduler.clone()
    }
}

/// Runs `get_element_info(symbol)` and renders the result as JSON.
///
/// With `show_context` the output also carries the session state and the
/// names of the artifacts the call saved.
pub async fn run_lookup(symbol: &str, user_id: &str, show_context: bool) -> Result<String> {
    let sessions = InMemorySessionService::new();
    let session = sessions.create(CreateRequest::new(APP_NAME, user_id)).await?;
    let scope = ArtifactScope::new(APP_NAME, user_id, session.id());
    let artifacts: Arc<dyn Artifacts> =
        Arc::new(ScopedArtifacts::new(Arc::new(InMemoryArtifactService::new()), scope));

    let session_state = session.state();
    let scheduler = Arc::new(PendingTasks::default());
    let ctx = Arc::new(LookupContext {
        session: session.clone(),
        session_state: session_state.clone(),
        state: DeltaState::new(session_state),
        artifacts: artifacts.clone(),
        scheduler: scheduler.clone(),
        user_content: Content::new("user").with_text(symbol),
    });

    let result = element_info_tool().execute(ctx.clone(), json!({ "symbol": symbol })).await?;
    scheduler.finish().await;

    if !show_context {
        let info: ElementInfo = serde_json::from_value(result)?;
        return Ok(serde_json::to_string(&info)?);
    }

    let state: serde_json::Map<String, Value> = session.state().all().into_iter().collect();
    let output = json!({
        "result": result,
        "session_id": session.id(),
        "state": state,
        "state_delta": ctx.state.delta(),
        "artifacts": artifacts.list().await?,
    });
    Ok(serde_json::to_string_pretty(&output)?)
}
