use async_trait::async_trait;
use periodic_core::{Llm, LlmRequest, LlmResponse, LlmResponseStream, PeriodicError, Result};
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Scripted model for tests: each call to `generate_content` replays the
/// next queued turn and records the request it was given.
pub struct MockLlm {
    name: String,
    turns: Mutex<VecDeque<Vec<LlmResponse>>>,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlm {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), turns: Mutex::new(VecDeque::new()), requests: Mutex::new(Vec::new()) }
    }

    /// Queues a turn answered by a single response.
    pub fn with_response(self, response: LlmResponse) -> Self {
        self.with_turn(vec![response])
    }

    /// Queues a turn answered by several streamed responses.
    pub fn with_turn(self, responses: Vec<LlmResponse>) -> Self {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner).push_back(responses);
        self
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn remaining_turns(&self) -> usize {
        self.turns.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl Llm for MockLlm {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate_content(&self, req: LlmRequest, _stream: bool) -> Result<LlmResponseStream> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(req);
        let responses = self
            .turns
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .ok_or_else(|| PeriodicError::Model(format!("{}: no scripted responses left", self.name)))?;
        Ok(Box::pin(futures::stream::iter(responses.into_iter().map(Ok))))
    }
}
