//! Recovery of tool calls that a model wrote as text.
//!
//! Local models served through Ollama (Qwen in particular) sometimes answer
//! with a Hermes-style block instead of a native tool call:
//!
//! ```text
//! <tool_call>
//! {"name": "get_element_info", "arguments": {"symbol": "Fe"}}
//! </tool_call>
//! ```
//!
//! Such blocks are turned into `Part::FunctionCall`. Anything that does not
//! parse is left as text.

use periodic_core::{Content, Part};
use serde_json::Value;

const TOOL_CALL_START: &str = "<tool_call>";
const TOOL_CALL_END: &str = "</tool_call>";

/// Converts tool call markup in text parts to function call parts.
pub fn normalize_content(content: &mut Content) {
    let parts = std::mem::take(&mut content.parts);
    let mut normalized = Vec::with_capacity(parts.len());

    for part in parts {
        match part {
            Part::Text { text } => normalized.extend(split_text(text)),
            other => normalized.push(other),
        }
    }

    content.parts = normalized;
}

pub fn normalize_option_content(content: &mut Option<Content>) {
    if let Some(content) = content {
        normalize_content(content);
    }
}

fn split_text(text: String) -> Vec<Part> {
    if !text.contains(TOOL_CALL_START) {
        return vec![Part::Text { text }];
    }

    let mut parts = Vec::new();
    let mut remainder = text.as_str();

    while let Some(start) = remainder.find(TOOL_CALL_START) {
        push_text(&mut parts, &remainder[..start]);
        let after_start = &remainder[start + TOOL_CALL_START.len()..];

        let Some(end) = after_start.find(TOOL_CALL_END) else {
            // Unclosed block stays as text.
            push_text(&mut parts, &remainder[start..]);
            remainder = "";
            break;
        };

        let block = &after_start[..end];
        match parse_block(block) {
            Some(call) => parts.push(call),
            None => push_text(&mut parts, &remainder[start..start + TOOL_CALL_START.len() + end + TOOL_CALL_END.len()]),
        }
        remainder = &after_start[end + TOOL_CALL_END.len()..];
    }

    push_text(&mut parts, remainder);
    parts
}

fn push_text(parts: &mut Vec<Part>, text: &str) {
    if !text.trim().is_empty() {
        parts.push(Part::Text { text: text.to_string() });
    }
}

fn parse_block(block: &str) -> Option<Part> {
    let value: Value = serde_json::from_str(block.trim()).ok()?;
    let name = value.get("name")?.as_str()?.trim();
    if name.is_empty() {
        return None;
    }

    let args = match value.get("arguments").or_else(|| value.get("parameters")) {
        None | Some(Value::Null) => Value::Object(Default::default()),
        // Some models double-encode the arguments.
        Some(Value::String(raw)) => serde_json::from_str(raw).ok()?,
        Some(args) => args.clone(),
    };

    Some(Part::FunctionCall { name: name.to_string(), args, id: None })
}
