use crate::{Artifacts, ReadonlyContext, Result, Session, event::Event};
use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;
use std::sync::Arc;

pub type EventStream = Pin<Box<dyn Stream<Item = Result<Event>> + Send>>;

#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream>;
}

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Upper bound on model calls within one invocation.
    pub max_llm_calls: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self { max_llm_calls: 10 }
    }
}

pub trait InvocationContext: ReadonlyContext {
    fn session(&self) -> Arc<dyn Session>;
    fn artifacts(&self) -> Option<Arc<dyn Artifacts>>;
    fn run_config(&self) -> &RunConfig;
}
