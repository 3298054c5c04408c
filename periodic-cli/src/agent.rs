use periodic_agent::LlmAgent;
use periodic_core::{Llm, Result};
use periodic_tool::element_info_tool;
use std::sync::Arc;

pub const APP_NAME: &str = "periodic_table";
pub const AGENT_NAME: &str = "periodic_table_agent";
pub const AGENT_DESCRIPTION: &str = "Agent to answer questions about chemical element information.";
pub const AGENT_INSTRUCTION: &str = "You are a helpful agent that provides information about chemical elements. \
Use the 'get_element_info' tool to look up element information by symbol or Chinese name.";

pub fn build_agent(model: Arc<dyn Llm>) -> Result<LlmAgent> {
    LlmAgent::builder(AGENT_NAME)
        .description(AGENT_DESCRIPTION)
        .instruction(AGENT_INSTRUCTION)
        .model(model)
        .tool(Arc::new(element_info_tool()))
        .build()
}
