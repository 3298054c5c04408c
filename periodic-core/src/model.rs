use crate::{Result, types::Content};
use async_trait::async_trait;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::pin::Pin;

pub type LlmResponseStream = Pin<Box<dyn Stream<Item = Result<LlmResponse>> + Send>>;

#[async_trait]
pub trait Llm: Send + Sync {
    fn name(&self) -> &str;
    async fn generate_content(&self, req: LlmRequest, stream: bool) -> Result<LlmResponseStream>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRequest {
    pub model: String,
    pub contents: Vec<Content>,
    pub config: Option<GenerateContentConfig>,
    /// Function declarations keyed by tool name.
    #[serde(skip)]
    pub tools: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateContentConfig {
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub top_k: Option<i32>,
    pub max_output_tokens: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: Option<Content>,
    pub usage_metadata: Option<UsageMetadata>,
    pub finish_reason: Option<FinishReason>,
    pub partial: bool,
    pub turn_complete: bool,
    pub error_code: Option<String>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub prompt_token_count: i32,
    pub candidates_token_count: i32,
    pub total_token_count: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FinishReason {
    Stop,
    MaxTokens,
    Safety,
    Other,
}

impl LlmRequest {
    pub fn new(model: impl Into<String>, contents: Vec<Content>) -> Self {
        Self { model: model.into(), contents, config: None, tools: HashMap::new() }
    }

    pub fn with_config(mut self, config: GenerateContentConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_tool(mut self, name: impl Into<String>, declaration: serde_json::Value) -> Self {
        self.tools.insert(name.into(), declaration);
        self
    }

    pub fn system_instruction(&self) -> Option<&str> {
        self.config.as_ref().and_then(|c| c.system_instruction.as_deref())
    }
}

impl LlmResponse {
    pub fn new(content: Content) -> Self {
        Self {
            content: Some(content),
            usage_metadata: None,
            finish_reason: Some(FinishReason::Stop),
            partial: false,
            turn_complete: true,
            error_code: None,
            error_message: None,
        }
    }

    pub fn has_function_calls(&self) -> bool {
        self.content.as_ref().is_some_and(|c| c.function_calls().next().is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Part;
    use serde_json::json;

    #[test]
    fn test_llm_request_creation() {
        let req = LlmRequest::new("qwen2.5", vec![]);
        assert_eq!(req.model, "qwen2.5");
        assert!(req.contents.is_empty());
        assert!(req.system_instruction().is_none());
    }

    #[test]
    fn test_llm_request_with_config_and_tool() {
        let config = GenerateContentConfig {
            temperature: Some(0.2),
            system_instruction: Some("你是一个化学助手".to_string()),
            ..Default::default()
        };
        let req = LlmRequest::new("qwen2.5", vec![])
            .with_config(config)
            .with_tool("get_element_info", json!({"name": "get_element_info"}));

        assert_eq!(req.system_instruction(), Some("你是一个化学助手"));
        assert!(req.tools.contains_key("get_element_info"));
    }

    #[test]
    fn test_llm_response_creation() {
        let resp = LlmResponse::new(Content::new("model").with_text("hi"));
        assert!(resp.turn_complete);
        assert!(!resp.partial);
        assert_eq!(resp.finish_reason, Some(FinishReason::Stop));
        assert!(!resp.has_function_calls());
    }

    #[test]
    fn test_llm_response_detects_function_calls() {
        let content = Content::new("model").with_part(Part::FunctionCall {
            name: "get_element_info".to_string(),
            args: json!({"symbol": "H"}),
            id: None,
        });
        assert!(LlmResponse::new(content).has_function_calls());
    }

    #[test]
    fn test_llm_response_deserialize() {
        let json = json!({
            "content": {"role": "model", "parts": [{"text": "hello"}]},
            "partial": false,
            "turn_complete": true
        });
        let response: LlmResponse = serde_json::from_value(json).expect("should deserialize");
        assert_eq!(response.content.and_then(|c| c.text()).as_deref(), Some("hello"));
    }
}
