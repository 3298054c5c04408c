use crate::tool_call_markup::normalize_option_content;
use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use periodic_core::{
    Agent, Artifacts, Content, DeltaState, Event, EventStream, FunctionResponseData,
    GenerateContentConfig, InvocationContext, Llm, LlmRequest, Part, PeriodicError,
    ReadonlyContext, Result, State, Tool, ToolContext, UsageMetadata,
};
use periodic_telemetry::{model_call_span, tool_execute_span};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::Instrument;

pub struct LlmAgent {
    name: String,
    description: String,
    model: Arc<dyn Llm>,
    instruction: Option<String>,
    generate_config: Option<GenerateContentConfig>,
    tools: Vec<Arc<dyn Tool>>,
}

impl std::fmt::Debug for LlmAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmAgent")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("model", &self.model.name())
            .field("instruction", &self.instruction)
            .field("tools", &self.tools.iter().map(|t| t.name()).collect::<Vec<_>>())
            .finish()
    }
}

impl LlmAgent {
    pub fn builder(name: impl Into<String>) -> LlmAgentBuilder {
        LlmAgentBuilder::new(name)
    }

    pub fn instruction(&self) -> Option<&str> {
        self.instruction.as_deref()
    }

    pub fn tools(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Function declarations keyed by tool name, as sent to the model.
    fn tool_declarations(&self) -> HashMap<String, Value> {
        self.tools.iter().map(|tool| (tool.name().to_string(), tool.declaration())).collect()
    }

    fn request_config(&self) -> Option<GenerateContentConfig> {
        let instruction = self.instruction.clone().filter(|i| !i.is_empty());
        match (self.generate_config.clone(), instruction) {
            (None, None) => None,
            (config, system_instruction) => Some(GenerateContentConfig {
                system_instruction,
                ..config.unwrap_or_default()
            }),
        }
    }
}

pub struct LlmAgentBuilder {
    name: String,
    description: Option<String>,
    model: Option<Arc<dyn Llm>>,
    instruction: Option<String>,
    generate_config: Option<GenerateContentConfig>,
    tools: Vec<Arc<dyn Tool>>,
}

impl LlmAgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            model: None,
            instruction: None,
            generate_config: None,
            tools: Vec::new(),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn model(mut self, model: Arc<dyn Llm>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = Some(instruction.into());
        self
    }

    /// Sampling settings sent with every request. The instruction always
    /// overrides `system_instruction`.
    pub fn generate_content_config(mut self, config: GenerateContentConfig) -> Self {
        self.generate_config = Some(config);
        self
    }

    pub fn tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn build(self) -> Result<LlmAgent> {
        let model = self.model.ok_or_else(|| PeriodicError::Agent("Model is required".to_string()))?;

        let mut seen = std::collections::HashSet::new();
        for tool in &self.tools {
            if !seen.insert(tool.name().to_string()) {
                return Err(PeriodicError::Agent(format!(
                    "duplicate tool '{}' on agent '{}'",
                    tool.name(),
                    self.name
                )));
            }
        }

        Ok(LlmAgent {
            name: self.name,
            description: self.description.unwrap_or_default(),
            model,
            instruction: self.instruction,
            generate_config: self.generate_config,
            tools: self.tools,
        })
    }
}

/// Context handed to a tool for one function call. State writes go through a
/// [`DeltaState`] so they can be reported on the tool's event.
struct AgentToolContext {
    parent_ctx: Arc<dyn InvocationContext>,
    function_call_id: String,
    session_state: Arc<dyn State>,
    state: DeltaState,
}

impl AgentToolContext {
    fn new(parent_ctx: Arc<dyn InvocationContext>, function_call_id: String) -> Self {
        let session_state = parent_ctx.session().state();
        let state = DeltaState::new(session_state.clone());
        Self { parent_ctx, function_call_id, session_state, state }
    }
}

impl ReadonlyContext for AgentToolContext {
    fn invocation_id(&self) -> &str {
        self.parent_ctx.invocation_id()
    }

    fn agent_name(&self) -> &str {
        self.parent_ctx.agent_name()
    }

    fn user_id(&self) -> &str {
        self.parent_ctx.user_id()
    }

    fn app_name(&self) -> &str {
        self.parent_ctx.app_name()
    }

    fn session_id(&self) -> &str {
        self.parent_ctx.session_id()
    }

    fn user_content(&self) -> &Content {
        self.parent_ctx.user_content()
    }
}

impl ToolContext for AgentToolContext {
    fn function_call_id(&self) -> &str {
        &self.function_call_id
    }

    fn session_state(&self) -> &dyn State {
        self.session_state.as_ref()
    }

    fn state(&self) -> &dyn State {
        &self.state
    }

    fn artifacts(&self) -> Option<Arc<dyn Artifacts>> {
        self.parent_ctx.artifacts()
    }
}

/// Runs one tool call. Failures are reported to the model as `{"error": ...}`.
async fn call_tool(
    tools: &[Arc<dyn Tool>],
    ctx: &Arc<dyn InvocationContext>,
    name: &str,
    args: &Value,
    call_id: String,
) -> (Value, HashMap<String, Value>) {
    let Some(tool) = tools.iter().find(|t| t.name() == name) else {
        tracing::warn!(tool.name = name, "model called an unknown tool");
        return (json!({ "error": format!("Tool {} not found", name) }), HashMap::new());
    };

    let tool_ctx = Arc::new(AgentToolContext::new(ctx.clone(), call_id));
    let result = tool
        .execute(tool_ctx.clone(), args.clone())
        .instrument(tool_execute_span(name))
        .await;

    let response = match result {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(tool.name = name, error = %e, "tool execution failed");
            json!({ "error": e.to_string() })
        }
    };
    (response, tool_ctx.state.delta())
}

/// Joins streamed chunks of one model turn.
#[derive(Default)]
struct TurnAccumulator {
    content: Option<Content>,
    usage_metadata: Option<UsageMetadata>,
}

impl TurnAccumulator {
    fn push(&mut self, chunk: periodic_core::LlmResponse) -> Result<()> {
        if let Some(code) = &chunk.error_code {
            if chunk.content.is_none() {
                return Err(PeriodicError::Model(format!(
                    "{code}: {}",
                    chunk.error_message.as_deref().unwrap_or("model returned no content")
                )));
            }
        }
        if chunk.usage_metadata.is_some() {
            self.usage_metadata = chunk.usage_metadata;
        }
        if let Some(chunk_content) = chunk.content {
            match &mut self.content {
                Some(acc) => acc.parts.extend(chunk_content.parts),
                None => self.content = Some(chunk_content),
            }
        }
        Ok(())
    }
}

/// Session history followed by the current user turn. The runner usually
/// records the user turn before the agent starts, so it is only added when
/// it is not already the latest entry.
fn initial_history(ctx: &dyn InvocationContext) -> Vec<Content> {
    let mut history = ctx.session().conversation_history();
    let user_content = ctx.user_content();
    if !user_content.parts.is_empty() && history.last() != Some(user_content) {
        history.push(user_content.clone());
    }
    history
}

#[async_trait]
impl Agent for LlmAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    #[tracing::instrument(
        skip(self, ctx),
        fields(
            agent.name = %self.name,
            invocation.id = %ctx.invocation_id(),
            user.id = %ctx.user_id(),
            session.id = %ctx.session_id()
        )
    )]
    async fn run(&self, ctx: Arc<dyn InvocationContext>) -> Result<EventStream> {
        tracing::info!("Starting agent execution");

        let agent_name = self.name.clone();
        let invocation_id = ctx.invocation_id().to_string();
        let model = self.model.clone();
        let tools = self.tools.clone();
        let tool_declarations = self.tool_declarations();
        let config = self.request_config();
        let max_iterations = ctx.run_config().max_llm_calls;
        let mut conversation_history = initial_history(ctx.as_ref());

        let s = stream! {
            let mut iteration = 0;

            loop {
                iteration += 1;
                if iteration > max_iterations {
                    yield Err(PeriodicError::Agent(format!(
                        "Max iterations ({max_iterations}) exceeded"
                    )));
                    return;
                }

                let request = LlmRequest {
                    model: model.name().to_string(),
                    contents: conversation_history.clone(),
                    config: config.clone(),
                    tools: tool_declarations.clone(),
                };

                let span = model_call_span(model.name());
                let mut response_stream = match model
                    .generate_content(request, false)
                    .instrument(span.clone())
                    .await
                {
                    Ok(stream) => stream,
                    Err(e) => {
                        yield Err(e);
                        return;
                    }
                };

                let mut turn = TurnAccumulator::default();
                while let Some(chunk) = response_stream.next().instrument(span.clone()).await {
                    let pushed = chunk.and_then(|chunk| {
                        let complete = chunk.turn_complete;
                        turn.push(chunk).map(|()| complete)
                    });
                    match pushed {
                        Ok(true) => break,
                        Ok(false) => continue,
                        Err(e) => {
                            yield Err(e);
                            return;
                        }
                    }
                }

                normalize_option_content(&mut turn.content);
                let Some(mut content) = turn.content else {
                    tracing::warn!(iteration, "model returned an empty turn");
                    let mut event = Event::new(&invocation_id).with_author(&agent_name);
                    event.llm_response.usage_metadata = turn.usage_metadata;
                    event.llm_response.turn_complete = true;
                    yield Ok(event);
                    return;
                };
                content.role = "model".to_string();

                let mut model_event = Event::new(&invocation_id).with_author(&agent_name);
                model_event.set_content(content.clone());
                model_event.llm_response.usage_metadata = turn.usage_metadata;
                model_event.llm_response.turn_complete = true;
                yield Ok(model_event);

                conversation_history.push(content.clone());

                let calls: Vec<(String, Value, Option<String>)> = content
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        Part::FunctionCall { name, args, id } => {
                            Some((name.clone(), args.clone(), id.clone()))
                        }
                        _ => None,
                    })
                    .collect();

                if calls.is_empty() {
                    tracing::info!(iterations = iteration, "Agent execution complete");
                    return;
                }

                for (name, args, id) in calls {
                    let call_id = id.clone().unwrap_or_else(|| format!("{invocation_id}_{name}"));
                    tracing::debug!(tool.name = %name, call.id = %call_id, "executing tool");
                    let (response, state_delta) = call_tool(&tools, &ctx, &name, &args, call_id).await;

                    let response_content = Content::new("function").with_part(Part::FunctionResponse {
                        function_response: FunctionResponseData { name, response },
                        id,
                    });

                    let mut tool_event = Event::new(&invocation_id).with_author(&agent_name);
                    tool_event.set_content(response_content.clone());
                    tool_event.actions.state_delta = state_delta;
                    yield Ok(tool_event);

                    conversation_history.push(response_content);
                }
            }
        };

        Ok(Box::pin(s))
    }
}
