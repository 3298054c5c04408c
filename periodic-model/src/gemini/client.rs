use super::config::GeminiConfig;
use super::convert::{self, GenerateContentResponse};
use crate::retry::{AttemptError, RetryConfig, execute_with_retry};
use async_trait::async_trait;
use periodic_core::{Llm, LlmRequest, LlmResponseStream, PeriodicError, Result};
use reqwest::Client;
use std::time::Duration;

/// Gemini model called through `generateContent`.
///
/// ```rust,ignore
/// use periodic_model::GeminiModel;
///
/// let model = GeminiModel::new(std::env::var("GOOGLE_API_KEY")?, "gemini-2.0-flash")?;
/// ```
pub struct GeminiModel {
    client: Client,
    config: GeminiConfig,
    retry_config: RetryConfig,
}

impl GeminiModel {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Self::from_config(GeminiConfig::new(api_key, model))
    }

    pub fn from_config(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(PeriodicError::Config("Gemini API key is empty".to_string()));
        }
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

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl Llm for GeminiModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    /// Always answers with a single complete response; `stream` is ignored.
    async fn generate_content(&self, request: LlmRequest, _stream: bool) -> Result<LlmResponseStream> {
        let url = self.config.generate_url();
        let body = convert::build_request(&request, self.config.temperature);

        tracing::debug!(
            model = %self.config.model,
            contents = body.contents.len(),
            tools = request.tools.len(),
            "sending Gemini generateContent request"
        );

        let gemini_response = execute_with_retry(&self.retry_config, || {
            let client = self.client.clone();
            let url = url.clone();
            let body = body.clone();
            let api_key = self.config.api_key.clone();
            async move {
                let response = client
                    .post(&url)
                    .header("x-goog-api-key", api_key)
                    .json(&body)
                    .send()
                    .await
                    .map_err(|e| AttemptError::transport("Gemini", "API request failed", &e))?;

                let status = response.status();
                let text = response
                    .text()
                    .await
                    .map_err(|e| AttemptError::transport("Gemini", "response could not be read", &e))?;
                if !status.is_success() {
                    return Err(AttemptError::status("Gemini", status, &text));
                }

                serde_json::from_str::<GenerateContentResponse>(&text).map_err(|e| {
                    AttemptError::permanent(PeriodicError::Model(format!(
                        "failed to parse Gemini response: {e} - {text}"
                    )))
                })
            }
        })
        .await?;

        let response = convert::from_response(&gemini_response);
        if let Some(message) = &response.error_message {
            tracing::warn!(model = %self.config.model, "{message}");
        }
        Ok(Box::pin(futures::stream::iter([Ok(response)])))
    }
}
