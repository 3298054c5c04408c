//! Wire types for `models/{model}:generateContent` and conversions from core types.

use periodic_core::{Content, FinishReason, LlmRequest, LlmResponse, Part, UsageMetadata};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<GeminiFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<GeminiFunctionResponse>,
}

impl GeminiPart {
    fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), function_call: None, function_response: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiFunctionCall {
    pub name: String,
    #[serde(default)]
    pub args: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeminiFunctionResponse {
    pub name: String,
    pub response: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<i32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    pub prompt_feedback: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<GeminiContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiUsage {
    #[serde(default)]
    pub prompt_token_count: i32,
    #[serde(default)]
    pub candidates_token_count: i32,
    #[serde(default)]
    pub total_token_count: i32,
}

/// Gemini only knows `user` and `model`; function responses travel as `user`.
/// Returns `None` for contents with nothing Gemini can carry.
pub fn content_to_gemini(content: &Content) -> Option<GeminiContent> {
    let role = match content.role.as_str() {
        "model" | "assistant" => "model",
        _ => "user",
    };

    let parts: Vec<GeminiPart> = content
        .parts
        .iter()
        .filter_map(|part| match part {
            Part::Text { text } => Some(GeminiPart::text(text.clone())),
            Part::FunctionCall { name, args, .. } => Some(GeminiPart {
                text: None,
                function_call: Some(GeminiFunctionCall { name: name.clone(), args: args.clone() }),
                function_response: None,
            }),
            Part::FunctionResponse { function_response, .. } => Some(GeminiPart {
                text: None,
                function_call: None,
                function_response: Some(GeminiFunctionResponse {
                    name: function_response.name.clone(),
                    response: wrap_response(&function_response.response),
                }),
            }),
            Part::InlineData { .. } => None,
        })
        .collect();

    (!parts.is_empty()).then(|| GeminiContent { role: Some(role.to_string()), parts })
}

/// `functionResponse.response` must be a JSON object.
fn wrap_response(response: &Value) -> Value {
    if response.is_object() { response.clone() } else { json!({ "result": response }) }
}

pub fn build_request(request: &LlmRequest, temperature: Option<f32>) -> GenerateContentRequest {
    let mut contents = Vec::new();
    let mut system_texts: Vec<String> = request.system_instruction().map(str::to_string).into_iter().collect();

    for content in &request.contents {
        if content.role == "system" {
            system_texts.extend(content.text());
            continue;
        }
        contents.extend(content_to_gemini(content));
    }

    let system_instruction = (!system_texts.is_empty()).then(|| GeminiContent {
        role: None,
        parts: vec![GeminiPart::text(system_texts.join("\n\n"))],
    });

    let mut names: Vec<&String> = request.tools.keys().collect();
    names.sort();
    let declarations: Vec<Value> = names.into_iter().map(|name| request.tools[name].clone()).collect();
    let tools =
        if declarations.is_empty() { Vec::new() } else { vec![json!({ "functionDeclarations": declarations })] };

    let config = request.config.clone().unwrap_or_default();
    let generation_config = GenerationConfig {
        temperature: config.temperature.or(temperature),
        top_p: config.top_p,
        top_k: config.top_k,
        max_output_tokens: config.max_output_tokens,
    };
    let has_config = generation_config.temperature.is_some()
        || generation_config.top_p.is_some()
        || generation_config.top_k.is_some()
        || generation_config.max_output_tokens.is_some();

    GenerateContentRequest {
        contents,
        system_instruction,
        tools,
        generation_config: has_config.then_some(generation_config),
    }
}

pub fn from_response(response: &GenerateContentResponse) -> LlmResponse {
    let usage_metadata = response.usage_metadata.as_ref().map(|u| UsageMetadata {
        prompt_token_count: u.prompt_token_count,
        candidates_token_count: u.candidates_token_count,
        total_token_count: u.total_token_count,
    });

    let Some(candidate) = response.candidates.first() else {
        return LlmResponse {
            usage_metadata,
            turn_complete: true,
            error_code: Some("NO_CANDIDATES".to_string()),
            error_message: Some(match &response.prompt_feedback {
                Some(feedback) => format!("no candidates returned: {feedback}"),
                None => "no candidates returned".to_string(),
            }),
            ..Default::default()
        };
    };

    let parts: Vec<Part> = candidate
        .content
        .iter()
        .flat_map(|c| c.parts.iter())
        .flat_map(|part| {
            let text = part.text.clone().filter(|t| !t.is_empty()).map(|text| Part::Text { text });
            let call = part.function_call.as_ref().map(|call| Part::FunctionCall {
                name: call.name.clone(),
                args: call.args.clone(),
                id: None,
            });
            text.into_iter().chain(call)
        })
        .collect();

    let finish_reason = candidate.finish_reason.as_deref().map(|reason| match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::MaxTokens,
        "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST" => FinishReason::Safety,
        _ => FinishReason::Other,
    });

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
