use periodic_core::{
    Artifacts, Content, InvocationContext as InvocationContextTrait, ReadonlyContext, RunConfig,
    Session,
};
use std::sync::Arc;

pub struct InvocationContext {
    invocation_id: String,
    agent_name: String,
    user_content: Content,
    session: Arc<dyn Session>,
    artifacts: Option<Arc<dyn Artifacts>>,
    run_config: RunConfig,
}

impl InvocationContext {
    pub fn new(
        invocation_id: String,
        agent_name: String,
        user_content: Content,
        session: Arc<dyn Session>,
    ) -> Self {
        Self {
            invocation_id,
            agent_name,
            user_content,
            session,
            artifacts: None,
            run_config: RunConfig::default(),
        }
    }

    pub fn with_artifacts(mut self, artifacts: Arc<dyn Artifacts>) -> Self {
        self.artifacts = Some(artifacts);
        self
    }

    pub fn with_run_config(mut self, config: RunConfig) -> Self {
        self.run_config = config;
        self
    }
}

impl ReadonlyContext for InvocationContext {
    fn invocation_id(&self) -> &str {
        &self.invocation_id
    }

    fn agent_name(&self) -> &str {
        &self.agent_name
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

impl InvocationContextTrait for InvocationContext {
    fn session(&self) -> Arc<dyn Session> {
        self.session.clone()
    }

    fn artifacts(&self) -> Option<Arc<dyn Artifacts>> {
        self.artifacts.clone()
    }

    fn run_config(&self) -> &RunConfig {
        &self.run_config
    }
}
