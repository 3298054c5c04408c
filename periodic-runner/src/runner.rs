use crate::InvocationContext;
use async_stream::stream;
use futures::StreamExt;
use periodic_artifact::{ArtifactScope, ArtifactService, ScopedArtifacts};
use periodic_core::{Agent, Content, Event, EventStream, PeriodicError, Result, RunConfig};
use periodic_session::{GetRequest, SessionService};
use std::sync::Arc;

pub struct RunnerConfig {
    pub app_name: String,
    pub agent: Arc<dyn Agent>,
    pub session_service: Arc<dyn SessionService>,
    pub artifact_service: Option<Arc<dyn ArtifactService>>,
    pub run_config: RunConfig,
}

pub struct Runner {
    app_name: String,
    root_agent: Arc<dyn Agent>,
    session_service: Arc<dyn SessionService>,
    artifact_service: Option<Arc<dyn ArtifactService>>,
    run_config: RunConfig,
}

impl Runner {
    pub fn new(config: RunnerConfig) -> Result<Self> {
        if config.app_name.trim().is_empty() {
            return Err(PeriodicError::Config("app name must not be empty".to_string()));
        }
        Ok(Self {
            app_name: config.app_name,
            root_agent: config.agent,
            session_service: config.session_service,
            artifact_service: config.artifact_service,
            run_config: config.run_config,
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Runs the agent on `user_content` within an existing session.
    ///
    /// The user turn is recorded first, then every agent event is appended
    /// to the session before it is yielded. The stream ends at the first
    /// error.
    pub async fn run(
        &self,
        user_id: String,
        session_id: String,
        user_content: Content,
    ) -> Result<EventStream> {
        let app_name = self.app_name.clone();
        let session_service = self.session_service.clone();
        let agent = self.root_agent.clone();
        let artifact_service = self.artifact_service.clone();
        let run_config = self.run_config.clone();

        let s = stream! {
            let session = match session_service
                .get(GetRequest {
                    app_name: app_name.clone(),
                    user_id: user_id.clone(),
                    session_id: session_id.clone(),
                })
                .await
            {
                Ok(s) => s,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            let invocation_id = format!("inv-{}", uuid::Uuid::new_v4());
            tracing::info!(
                app.name = %app_name,
                user.id = %user_id,
                session.id = %session_id,
                invocation.id = %invocation_id,
                agent.name = %agent.name(),
                "starting invocation"
            );

            let mut ctx = InvocationContext::new(
                invocation_id.clone(),
                agent.name().to_string(),
                user_content.clone(),
                session,
            )
            .with_run_config(run_config);

            if let Some(service) = artifact_service {
                let scope = ArtifactScope::new(&app_name, &user_id, &session_id);
                ctx = ctx.with_artifacts(Arc::new(ScopedArtifacts::new(service, scope)));
            }

            let mut user_event = Event::new(&invocation_id).with_author("user");
            user_event.set_content(user_content);
            if let Err(e) = session_service.append_event(&session_id, user_event).await {
                yield Err(e);
                return;
            }

            let mut agent_stream = match agent.run(Arc::new(ctx)).await {
                Ok(s) => s,
                Err(e) => {
                    yield Err(e);
                    return;
                }
            };

            while let Some(result) = agent_stream.next().await {
                match result {
                    Ok(event) => {
                        if let Err(e) = session_service.append_event(&session_id, event.clone()).await {
                            yield Err(e);
                            return;
                        }
                        yield Ok(event);
                    }
                    Err(e) => {
                        tracing::error!(invocation.id = %invocation_id, error = %e, "agent run failed");
                        yield Err(e);
                        return;
                    }
                }
            }
        };

        Ok(Box::pin(s))
    }
}
