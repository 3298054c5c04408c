//! Wire types for Ollama's `/api/chat` and conversions from core types.

use periodic_core::{Content, FinishReason, LlmRequest, LlmResponse, Part, UsageMetadata};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Set on `tool` messages so the model can match results to calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl ChatMessage {
    fn new(role: &str, content: impl Into<String>) -> Self {
        Self { role: role.to_string(), content: content.into(), tool_calls: Vec::new(), tool_name: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub function: ToolCallFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: &'static str,
    pub function: Value,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num_predict: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<ChatOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_alive: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub done_reason: Option<String>,
    #[serde(default)]
    pub prompt_eval_count: Option<i32>,
    #[serde(default)]
    pub eval_count: Option<i32>,
}

/// Messages for one content. Function responses become one `tool` message each.
pub fn content_to_messages(content: &Content) -> Vec<ChatMessage> {
    let text: String = content.parts.iter().filter_map(Part::text).collect::<Vec<_>>().join("\n");

    match content.role.as_str() {
        "user" => vec![ChatMessage::new("user", text)],
        "system" => vec![ChatMessage::new("system", text)],
        "model" | "assistant" => {
            let mut message = ChatMessage::new("assistant", text);
            message.tool_calls = content
                .function_calls()
                .map(|(name, args)| ToolCall {
                    function: ToolCallFunction { name: name.to_string(), arguments: args.clone() },
                })
                .collect();
            vec![message]
        }
        "function" | "tool" => content
            .parts
            .iter()
            .filter_map(|part| match part {
                Part::FunctionResponse { function_response, .. } => {
                    let mut message =
                        ChatMessage::new("tool", function_response.response.to_string());
                    message.tool_name = Some(function_response.name.clone());
                    Some(message)
                }
                _ => None,
            })
            .collect(),
        other => {
            tracing::debug!(role = other, "skipping content with unsupported role");
            Vec::new()
        }
    }
}

/// Declarations sorted by name so requests are reproducible.
pub fn convert_tools(request: &LlmRequest) -> Vec<ToolDefinition> {
    let mut names: Vec<&String> = request.tools.keys().collect();
    names.sort();
    names
        .into_iter()
        .map(|name| ToolDefinition { tool_type: "function", function: request.tools[name].clone() })
        .collect()
}

pub fn build_request(request: &LlmRequest, model: &str, temperature: Option<f32>) -> ChatRequest {
    let mut messages = Vec::new();
    if let Some(instruction) = request.system_instruction() {
        messages.push(ChatMessage::new("system", instruction));
    }
    messages.extend(request.contents.iter().flat_map(content_to_messages));

    let config = request.config.clone().unwrap_or_default();
    let options = ChatOptions {
        temperature: config.temperature.or(temperature),
        top_p: config.top_p,
        top_k: config.top_k,
        num_predict: config.max_output_tokens,
    };
    let has_options = options.temperature.is_some()
        || options.top_p.is_some()
        || options.top_k.is_some()
        || options.num_predict.is_some();

    ChatRequest {
        model: model.to_string(),
        messages,
        stream: false,
        tools: convert_tools(request),
        options: has_options.then_some(options),
        keep_alive: None,
    }
}

pub fn from_response(response: &ChatResponse) -> LlmResponse {
    let mut parts = Vec::new();
    if !response.message.content.is_empty() {
        parts.push(Part::Text { text: response.message.content.clone() });
    }
    for call in &response.message.tool_calls {
        parts.push(Part::FunctionCall {
            name: call.function.name.clone(),
            args: call.function.arguments.clone(),
            id: None,
        });
    }

    let finish_reason = match response.done_reason.as_deref() {
        Some("length") => Some(FinishReason::MaxTokens),
        Some("stop") | None if response.done => Some(FinishReason::Stop),
        Some(_) => Some(FinishReason::Other),
        None => None,
    };

    let usage_metadata = match (response.prompt_eval_count, response.eval_count) {
        (None, None) => None,
        (prompt, eval) => {
            let (prompt, eval) = (prompt.unwrap_or(0), eval.unwrap_or(0));
            Some(UsageMetadata {
                prompt_token_count: prompt,
                candidates_token_count: eval,
                total_token_count: prompt + eval,
            })
        }
    };

    LlmResponse {
        content: (!parts.is_empty()).then(|| Content { role: "model".to_string(), parts }),
        usage_metadata,
        finish_reason,
        partial: false,
        turn_complete: true,
        error_code: None,
        error_message: None,
    }
}
