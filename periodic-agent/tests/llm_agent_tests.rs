use futures::StreamExt;
use periodic_agent::LlmAgent;
use periodic_artifact::{ArtifactScope, InMemoryArtifactService, ScopedArtifacts};
use periodic_core::{
    Agent, Artifacts, Content, Event, InvocationContext, LlmResponse, Part, PeriodicError,
    ReadonlyContext, RunConfig, Session, State,
};
use periodic_model::MockLlm;
use periodic_session::{CreateRequest, InMemorySessionService, SessionService};
use periodic_tool::element_info_tool;
use serde_json::{Value, json};
use std::sync::Arc;

const INSTRUCTION: &str = "You are a helpful agent that provides information about chemical elements.";

struct TestInvocation {
    session: Arc<dyn Session>,
    artifacts: Option<Arc<dyn Artifacts>>,
    user_content: Content,
    run_config: RunConfig,
}

impl ReadonlyContext for TestInvocation {
    fn invocation_id(&self) -> &str {
        "inv-1"
    }
    fn agent_name(&self) -> &str {
        "periodic_table_agent"
    }
    fn user_id(&self) -> &str {
        self.session.user_id()
    }
    fn app_name(&self) -> &str {
        self.session.app_name()
    }
    fn session_id(&self) -> &str {
        self.session.id()
    }
    fn user_content(&self) -> &Content {
        &self.user_content
    }
}

impl InvocationContext for TestInvocation {
    fn session(&self) -> Arc<dyn Session> {
        self.session.clone()
    }
    fn artifacts(&self) -> Option<Arc<dyn Artifacts>> {
        self.artifacts.clone()
    }
    fn run_config(&self) -> &RunConfig {
        &self.run_config
    }
}

async fn new_session() -> Arc<dyn Session> {
    InMemorySessionService::new()
        .create(CreateRequest::new("periodic", "user-1").with_session_id("session-1"))
        .await
        .unwrap()
}

fn invocation(session: Arc<dyn Session>, question: &str) -> Arc<dyn InvocationContext> {
    Arc::new(TestInvocation {
        session,
        artifacts: None,
        user_content: Content::new("user").with_text(question),
        run_config: RunConfig::default(),
    })
}

fn call(name: &str, args: Value) -> LlmResponse {
    LlmResponse::new(Content::new("model").with_part(Part::FunctionCall {
        name: name.to_string(),
        args,
        id: None,
    }))
}

fn text(text: &str) -> LlmResponse {
    LlmResponse::new(Content::new("model").with_text(text))
}

fn function_response(event: &Event) -> (&str, &Value) {
    match event.content().map(|c| &c.parts[..]) {
        Some([Part::FunctionResponse { function_response, .. }]) => {
            (function_response.name.as_str(), &function_response.response)
        }
        other => panic!("expected a single function response, got {other:?}"),
    }
}

async fn run(agent: &LlmAgent, ctx: Arc<dyn InvocationContext>) -> Vec<Result<Event, PeriodicError>> {
    agent.run(ctx).await.unwrap().collect().await
}

fn agent(model: Arc<MockLlm>) -> LlmAgent {
    LlmAgent::builder("periodic_table_agent")
        .description("Agent to answer questions about chemical element information.")
        .instruction(INSTRUCTION)
        .model(model)
        .tool(Arc::new(element_info_tool()))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_tool_call_then_answer() {
    let model = Arc::new(
        MockLlm::new("mock")
            .with_response(call("get_element_info", json!({"symbol": "Fe"})))
            .with_response(text("铁的原子序数是 26，原子量 55.845。")),
    );
    let agent = agent(model.clone());
    let session = new_session().await;

    let events: Vec<Event> =
        run(&agent, invocation(session.clone(), "铁的原子量？")).await.into_iter().map(Result::unwrap).collect();

    assert_eq!(events.len(), 3);
    assert!(events.iter().all(|e| e.author == "periodic_table_agent" && e.invocation_id == "inv-1"));

    let (name, response) = function_response(&events[1]);
    assert_eq!(name, "get_element_info");
    assert_eq!(
        response,
        &json!({"status": "success", "report": "铁（Iron），原子序数：26，原子量：55.845"})
    );
    assert_eq!(events[1].content().unwrap().role, "function");

    let delta = &events[1].actions.state_delta;
    assert_eq!(delta.get("last_query"), Some(&json!("Fe")));
    assert!(delta.contains_key("last_query_time"));
    assert!(!delta.contains_key("query_history"));

    assert!(events[2].is_final_response());
    assert_eq!(
        events[2].content().and_then(Content::text).as_deref(),
        Some("铁的原子序数是 26，原子量 55.845。")
    );

    assert_eq!(session.state().get("query_history"), Some(json!(["Fe"])));
}

#[tokio::test]
async fn test_requests_carry_instruction_tools_and_history() {
    let model = Arc::new(
        MockLlm::new("mock")
            .with_response(call("get_element_info", json!({"symbol": "氧"})))
            .with_response(text("氧的原子序数是 8。")),
    );
    let agent = agent(model.clone());

    run(&agent, invocation(new_session().await, "氧是几号元素？")).await;

    let requests = model.requests();
    assert_eq!(requests.len(), 2);

    let first = &requests[0];
    assert_eq!(first.system_instruction(), Some(INSTRUCTION));
    assert_eq!(first.tools["get_element_info"]["parameters"]["properties"]["symbol"]["type"], "string");
    assert_eq!(first.contents.len(), 1);
    assert_eq!(first.contents[0].role, "user");

    let roles: Vec<&str> = requests[1].contents.iter().map(|c| c.role.as_str()).collect();
    assert_eq!(roles, ["user", "model", "function"]);
}

#[tokio::test]
async fn test_unknown_tool_is_reported_to_model() {
    let model = Arc::new(
        MockLlm::new("mock")
            .with_response(call("get_isotopes", json!({"symbol": "U"})))
            .with_response(text("抱歉，我无法查询同位素。")),
    );
    let agent = agent(model);

    let events = run(&agent, invocation(new_session().await, "铀的同位素？")).await;
    let tool_event = events[1].as_ref().unwrap();

    assert_eq!(function_response(tool_event).1, &json!({"error": "Tool get_isotopes not found"}));
    assert!(tool_event.actions.state_delta.is_empty());
}

#[tokio::test]
async fn test_tool_error_is_reported_to_model() {
    let model = Arc::new(
        MockLlm::new("mock")
            .with_response(call("get_element_info", json!({"element": "H"})))
            .with_response(text("参数错误。")),
    );
    let agent = agent(model);

    let events = run(&agent, invocation(new_session().await, "氢？")).await;
    let (_, response) = function_response(events[1].as_ref().unwrap());

    let message = response["error"].as_str().unwrap();
    assert!(message.starts_with("Tool error: invalid arguments for get_element_info"), "{message}");
}

#[tokio::test]
async fn test_lookup_miss_is_not_an_error() {
    let model = Arc::new(
        MockLlm::new("mock")
            .with_response(call("get_element_info", json!({"symbol": "Xx"})))
            .with_response(text("没有找到 Xx。")),
    );
    let agent = agent(model);
    let session = new_session().await;

    let events = run(&agent, invocation(session.clone(), "Xx 是什么？")).await;
    let (_, response) = function_response(events[1].as_ref().unwrap());

    assert_eq!(
        response,
        &json!({"status": "error", "error_message": "元素符号或中文名 'Xx' 未找到。"})
    );
    assert_eq!(session.state().get("query_history"), Some(json!(["Xx"])));
}

#[tokio::test]
async fn test_max_iterations_exceeded() {
    let model = Arc::new(
        MockLlm::new("mock")
            .with_response(call("get_element_info", json!({"symbol": "H"})))
            .with_response(call("get_element_info", json!({"symbol": "He"})))
            .with_response(call("get_element_info", json!({"symbol": "Li"}))),
    );
    let agent = agent(model.clone());
    let ctx = Arc::new(TestInvocation {
        session: new_session().await,
        artifacts: None,
        user_content: Content::new("user").with_text("前三个元素？"),
        run_config: RunConfig { max_llm_calls: 2 },
    });

    let events = run(&agent, ctx).await;

    assert_eq!(events.len(), 5);
    match events.last().unwrap() {
        Err(PeriodicError::Agent(message)) => assert_eq!(message, "Max iterations (2) exceeded"),
        other => panic!("unexpected: {other:?}"),
    }
    assert_eq!(model.remaining_turns(), 1);
}

#[tokio::test]
async fn test_model_failure_ends_stream() {
    let model = Arc::new(MockLlm::new("mock"));
    let agent = agent(model);

    let events = run(&agent, invocation(new_session().await, "氢？")).await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Err(PeriodicError::Model(_))));
}

#[tokio::test]
async fn test_user_turn_already_in_session_is_not_repeated() {
    let question = Content::new("user").with_text("金的符号？");
    let service = InMemorySessionService::new();
    let session = service
        .create(CreateRequest::new("periodic", "user-1").with_session_id("s2"))
        .await
        .unwrap();
    let mut user_event = Event::new("inv-1").with_author("user");
    user_event.set_content(question.clone());
    service.append_event("s2", user_event).await.unwrap();

    let model = Arc::new(MockLlm::new("mock").with_response(text("Au")));
    let agent = agent(model.clone());
    let ctx = Arc::new(TestInvocation {
        session,
        artifacts: None,
        user_content: question,
        run_config: RunConfig::default(),
    });

    run(&agent, ctx).await;

    assert_eq!(model.requests()[0].contents.len(), 1);
}

#[tokio::test]
async fn test_snapshot_saved_through_invocation_artifacts() {
    let service = Arc::new(InMemoryArtifactService::new());
    let artifacts: Arc<dyn Artifacts> = Arc::new(ScopedArtifacts::new(
        service.clone(),
        ArtifactScope::new("periodic", "user-1", "session-1"),
    ));
    let model = Arc::new(
        MockLlm::new("mock")
            .with_response(call("get_element_info", json!({"symbol": "铜"})))
            .with_response(text("铜是 29 号元素。")),
    );
    let agent = agent(model);
    let ctx = Arc::new(TestInvocation {
        session: new_session().await,
        artifacts: Some(artifacts.clone()),
        user_content: Content::new("user").with_text("铜？"),
        run_config: RunConfig::default(),
    });

    run(&agent, ctx).await;

    for _ in 0..100 {
        if let Ok(part) = artifacts.load("element_info_铜.json").await {
            let snapshot: Value = serde_json::from_slice(part.inline_bytes().unwrap()).unwrap();
            assert_eq!(snapshot["symbol"], "Cu");
            assert_eq!(snapshot["atomic_number"], 29);
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("snapshot was never saved");
}

#[test]
fn test_builder_requires_model() {
    let err = LlmAgent::builder("periodic_table_agent").build().unwrap_err();
    assert!(matches!(err, PeriodicError::Agent(_)));
}

#[test]
fn test_builder_rejects_duplicate_tools() {
    let err = LlmAgent::builder("periodic_table_agent")
        .model(Arc::new(MockLlm::new("mock")))
        .tool(Arc::new(element_info_tool()))
        .tool(Arc::new(element_info_tool()))
        .build()
        .unwrap_err();
    assert!(err.to_string().contains("duplicate tool 'get_element_info'"));
}
