use async_trait::async_trait;
use futures::StreamExt;
use periodic_agent::LlmAgent;
use periodic_artifact::{ArtifactScope, ArtifactService, InMemoryArtifactService};
use periodic_core::{
    Agent, Content, Event, EventStream, InvocationContext, LlmResponse, Part, PeriodicError,
    Result, RunConfig, Session, State,
};
use periodic_model::MockLlm;
use periodic_runner::{Runner, RunnerConfig};
use periodic_session::{CreateRequest, GetRequest, InMemorySessionService, SessionService};
use periodic_tool::element_info_tool;
use serde_json::json;
use std::sync::Arc;

const APP: &str = "periodic";
const USER: &str = "user-1";
const SESSION: &str = "session-1";

fn element_agent(model: Arc<MockLlm>) -> Arc<dyn Agent> {
    Arc::new(
        LlmAgent::builder("periodic_table_agent")
            .instruction("Use the 'get_element_info' tool to look up element information.")
            .model(model)
            .tool(Arc::new(element_info_tool()))
            .build()
            .unwrap(),
    )
}

fn lookup_then_answer(symbol: &str, answer: &str) -> Vec<LlmResponse> {
    vec![
        LlmResponse::new(Content::new("model").with_part(Part::FunctionCall {
            name: "get_element_info".to_string(),
            args: json!({"symbol": symbol}),
            id: None,
        })),
        LlmResponse::new(Content::new("model").with_text(answer)),
    ]
}

struct Fixture {
    runner: Runner,
    sessions: Arc<InMemorySessionService>,
    artifacts: Arc<InMemoryArtifactService>,
}

async fn fixture(agent: Arc<dyn Agent>) -> Fixture {
    let sessions = Arc::new(InMemorySessionService::new());
    sessions.create(CreateRequest::new(APP, USER).with_session_id(SESSION)).await.unwrap();
    let artifacts = Arc::new(InMemoryArtifactService::new());

    let runner = Runner::new(RunnerConfig {
        app_name: APP.to_string(),
        agent,
        session_service: sessions.clone(),
        artifact_service: Some(artifacts.clone()),
        run_config: RunConfig::default(),
    })
    .unwrap();

    Fixture { runner, sessions, artifacts }
}

async fn ask(runner: &Runner, question: &str) -> Vec<Result<Event>> {
    runner
        .run(USER.to_string(), SESSION.to_string(), Content::new("user").with_text(question))
        .await
        .unwrap()
        .collect()
        .await
}

#[tokio::test]
async fn test_run_persists_events_and_state() {
    let mut turns = lookup_then_answer("H", "氢是 1 号元素。");
    let model = MockLlm::new("mock").with_response(turns.remove(0)).with_response(turns.remove(0));
    let fx = fixture(element_agent(Arc::new(model))).await;

    let events = ask(&fx.runner, "氢是几号元素？").await;
    assert_eq!(events.len(), 3);
    assert!(events.iter().all(Result::is_ok));

    let session = fx
        .sessions
        .get(GetRequest { app_name: APP.into(), user_id: USER.into(), session_id: SESSION.into() })
        .await
        .unwrap();

    let stored = session.events();
    let authors: Vec<&str> = stored.iter().map(|e| e.author.as_str()).collect();
    assert_eq!(authors, ["user", "periodic_table_agent", "periodic_table_agent", "periodic_table_agent"]);
    assert!(stored.iter().all(|e| e.invocation_id == stored[0].invocation_id));
    assert!(stored[0].invocation_id.starts_with("inv-"));

    let state = session.state();
    assert_eq!(state.get("query_history"), Some(json!(["H"])));
    assert_eq!(state.get("last_query"), Some(json!("H")));
    assert!(state.get("last_query_time").is_some());
}

#[tokio::test]
async fn test_run_saves_snapshot_in_session_scope() {
    let mut turns = lookup_then_answer("金", "金的符号是 Au。");
    let model = MockLlm::new("mock").with_response(turns.remove(0)).with_response(turns.remove(0));
    let fx = fixture(element_agent(Arc::new(model))).await;

    ask(&fx.runner, "金的符号？").await;

    let scope = ArtifactScope::new(APP, USER, SESSION);
    for _ in 0..100 {
        if fx.artifacts.list(&scope).await.unwrap() == ["element_info_金.json"] {
            let other = ArtifactScope::new(APP, USER, "another-session");
            assert!(fx.artifacts.list(&other).await.unwrap().is_empty());
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("snapshot was never saved");
}

#[tokio::test]
async fn test_second_turn_sees_first() {
    let mut first = lookup_then_answer("O", "氧是 8 号元素。");
    let model = Arc::new(
        MockLlm::new("mock")
            .with_response(first.remove(0))
            .with_response(first.remove(0))
            .with_response(LlmResponse::new(Content::new("model").with_text("你刚才问的是氧。"))),
    );
    let fx = fixture(element_agent(model.clone())).await;

    ask(&fx.runner, "氧？").await;
    let events = ask(&fx.runner, "我刚才问了什么？").await;
    assert_eq!(events.len(), 1);

    let requests = model.requests();
    let roles: Vec<&str> = requests[2].contents.iter().map(|c| c.role.as_str()).collect();
    assert_eq!(roles, ["user", "model", "function", "model", "user"]);
    assert_eq!(requests[2].contents[4].text().as_deref(), Some("我刚才问了什么？"));
}

#[tokio::test]
async fn test_missing_session() {
    let fx = fixture(element_agent(Arc::new(MockLlm::new("mock")))).await;

    let events: Vec<_> = fx
        .runner
        .run(USER.to_string(), "nope".to_string(), Content::new("user").with_text("H"))
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], Err(PeriodicError::Session(_))));
}

struct FailingAgent;

#[async_trait]
impl Agent for FailingAgent {
    fn name(&self) -> &str {
        "failing"
    }

    fn description(&self) -> &str {
        "always fails"
    }

    async fn run(&self, _ctx: Arc<dyn InvocationContext>) -> Result<EventStream> {
        Err(PeriodicError::Agent("boom".to_string()))
    }
}

#[tokio::test]
async fn test_agent_failure_keeps_user_turn() {
    let fx = fixture(Arc::new(FailingAgent)).await;

    let events = ask(&fx.runner, "氢？").await;
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], Err(PeriodicError::Agent(m)) if m == "boom"));

    let session = fx
        .sessions
        .get(GetRequest { app_name: APP.into(), user_id: USER.into(), session_id: SESSION.into() })
        .await
        .unwrap();
    assert_eq!(session.events().len(), 1);
}

#[test]
fn test_empty_app_name_rejected() {
    let result = Runner::new(RunnerConfig {
        app_name: " ".to_string(),
        agent: Arc::new(FailingAgent),
        session_service: Arc::new(InMemorySessionService::new()),
        artifact_service: None,
        run_config: RunConfig::default(),
    });
    assert!(matches!(result, Err(PeriodicError::Config(_))));
}
