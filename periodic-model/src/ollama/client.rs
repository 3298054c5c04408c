use super::config::OllamaConfig;
use super::convert::{self, ChatResponse};
use crate::retry::{AttemptError, RetryConfig, execute_with_retry};
use async_trait::async_trait;
use periodic_core::{Llm, LlmRequest, LlmResponseStream, PeriodicError, Result};
use reqwest::Client;
use std::time::Duration;

/// Chat model served by a local Ollama runtime.
///
/// ```rust,ignore
/// use periodic_model::ollama::{OllamaConfig, OllamaModel};
///
/// let model = OllamaModel::new(OllamaConfig::new("qwen2.5"))?;
/// ```
pub struct OllamaModel {
    client: Client,
    config: OllamaConfig,
    retry_config: RetryConfig,
}

impl OllamaModel {
    pub fn new(config: OllamaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| PeriodicError::Model(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config, retry_config: RetryConfig::default() })
    }

    #[must_use]
    pub fn with_retry_config(mut self, retry_config: RetryConfig) -> Self {
        self.retry_config = retry_config;
        self
    }

    pub fn config(&self) -> &OllamaConfig {
        &self.config
    }
}

#[async_trait]
impl Llm for OllamaModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    /// Always answers with a single complete response; `stream` is ignored.
    async fn generate_content(&self, request: LlmRequest, _stream: bool) -> Result<LlmResponseStream> {
        let url = self.config.chat_url();
        let mut body = convert::build_request(&request, &self.config.model, self.config.temperature);
        body.keep_alive = self.config.keep_alive.clone();

        tracing::debug!(
            model = %self.config.model,
            messages = body.messages.len(),
            tools = body.tools.len(),
            "sending Ollama chat request"
        );

        let chat_response = execute_with_retry(&self.retry_config, || {
            let client = self.client.clone();
            let url = url.clone();
            let body = body.clone();
            async move {
                let response = client
                    .post(&url)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| AttemptError::transport("Ollama", "API request failed", &e))?;

                let status = response.status();
                let text = response
                    .text()
                    .await
                    .map_err(|e| AttemptError::transport("Ollama", "response could not be read", &e))?;
                if !status.is_success() {
                    return Err(AttemptError::status("Ollama", status, &text));
                }

                serde_json::from_str::<ChatResponse>(&text).map_err(|e| {
                    AttemptError::permanent(PeriodicError::Model(format!(
                        "failed to parse Ollama response: {e} - {text}"
                    )))
                })
            }
        })
        .await?;

        let response = convert::from_response(&chat_response);
        Ok(Box::pin(futures::stream::iter([Ok(response)])))
    }
}
