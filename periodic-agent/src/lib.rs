//! # periodic-agent
//!
//! [`LlmAgent`] drives a model through tool calls until it produces a final
//! answer, handing each tool a [`ToolContext`](periodic_core::ToolContext)
//! bound to the invocation's session and artifacts.

mod llm_agent;
mod tool_call_markup;

pub use llm_agent::{LlmAgent, LlmAgentBuilder};
pub use periodic_core::Agent;
pub use tool_call_markup::{normalize_content, normalize_option_content};
