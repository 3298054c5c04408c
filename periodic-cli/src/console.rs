use anyhow::Result;
use futures::StreamExt;
use periodic_artifact::InMemoryArtifactService;
use periodic_core::{Agent, Content, RunConfig};
use periodic_runner::{Runner, RunnerConfig};
use periodic_session::{CreateRequest, InMemorySessionService, SessionService};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::sync::Arc;

use crate::agent::APP_NAME;

/// One in-memory session with an agent, kept across turns.
pub struct ChatSession {
    runner: Runner,
    user_id: String,
    session_id: String,
}

impl ChatSession {
    pub async fn start(agent: Arc<dyn Agent>, user_id: &str) -> Result<Self> {
        let session_service = Arc::new(InMemorySessionService::new());
        let session = session_service.create(CreateRequest::new(APP_NAME, user_id)).await?;

        let runner = Runner::new(RunnerConfig {
            app_name: APP_NAME.to_string(),
            agent,
            session_service,
            artifact_service: Some(Arc::new(InMemoryArtifactService::new())),
            run_config: RunConfig::default(),
        })?;

        Ok(Self { runner, user_id: user_id.to_string(), session_id: session.id().to_string() })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Runs one turn and returns the agent's final text.
    pub async fn send(&self, message: &str) -> Result<String> {
        let mut events = self
            .runner
            .run(self.user_id.clone(), self.session_id.clone(), Content::new("user").with_text(message))
            .await?;

        let mut answer = String::new();
        while let Some(event) = events.next().await {
            let event = event?;
            let Some(content) = event.content() else { continue };

            for (name, args) in content.function_calls() {
                tracing::info!(tool.name = name, args = %args, "model requested tool");
            }
            if event.is_final_response() {
                if let Some(text) = content.text() {
                    answer.push_str(&text);
                }
            }
        }
        Ok(answer)
    }
}

pub async fn run_console(chat: &ChatSession, agent_name: &str, model_name: &str) -> Result<()> {
    let mut rl = DefaultEditor::new()?;

    println!("Periodic Table Agent");
    println!("Agent: {agent_name} ({model_name})");
    println!("Ask about an element by symbol or Chinese name. Ctrl+C to exit.\n");

    loop {
        match rl.readline("User -> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)?;

                match chat.send(line).await {
                    Ok(answer) => println!("\nAgent -> {answer}\n"),
                    Err(e) => eprintln!("\nError: {e}\n"),
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err}");
                break;
            }
        }
    }

    Ok(())
}
