use futures::StreamExt;
use periodic_core::{Content, Llm, LlmRequest, PeriodicError};
use periodic_model::{OllamaConfig, OllamaModel, RetryConfig};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fast_retry() -> RetryConfig {
    RetryConfig::default()
        .with_max_retries(2)
        .with_initial_delay(Duration::ZERO)
        .with_max_delay(Duration::ZERO)
}

fn request() -> LlmRequest {
    LlmRequest::new("qwen2.5", vec![Content::new("user").with_text("铁的原子量是多少？")])
        .with_tool("get_element_info", json!({"name": "get_element_info", "description": "d", "parameters": {"type": "object"}}))
}

#[tokio::test]
async fn test_tool_call_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({"model": "qwen2.5", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "qwen2.5",
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{"function": {"name": "get_element_info", "arguments": {"symbol": "Fe"}}}]
            },
            "done": true,
            "done_reason": "stop"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = OllamaModel::new(OllamaConfig::new("qwen2.5").with_base_url(server.uri())).unwrap();
    let mut stream = model.generate_content(request(), false).await.unwrap();
    let response = stream.next().await.unwrap().unwrap();

    let content = response.content.unwrap();
    let calls: Vec<_> = content.function_calls().collect();
    assert_eq!(calls, vec![("get_element_info", &json!({"symbol": "Fe"}))]);
    assert!(stream.next().await.is_none());

    let received = server.received_requests().await.unwrap();
    let body: Value = received[0].body_json().unwrap();
    assert_eq!(body["tools"][0]["function"]["name"], "get_element_info");
    assert_eq!(body["messages"][0]["content"], "铁的原子量是多少？");
}

#[tokio::test]
async fn test_retries_transient_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(503).set_body_string("model is loading"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {"role": "assistant", "content": "铁的原子量是 55.845。"},
            "done": true
        })))
        .mount(&server)
        .await;

    let model = OllamaModel::new(OllamaConfig::new("qwen2.5").with_base_url(server.uri()))
        .unwrap()
        .with_retry_config(fast_retry());
    let mut stream = model.generate_content(request(), false).await.unwrap();
    let response = stream.next().await.unwrap().unwrap();

    assert_eq!(response.content.and_then(|c| c.text()).as_deref(), Some("铁的原子量是 55.845。"));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_client_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(404).set_body_string("model 'nope' not found"))
        .expect(1)
        .mount(&server)
        .await;

    let model = OllamaModel::new(OllamaConfig::new("nope").with_base_url(server.uri()))
        .unwrap()
        .with_retry_config(fast_retry());
    let err = model.generate_content(request(), false).await.err().unwrap();

    match err {
        PeriodicError::Model(message) => assert!(message.contains("not found"), "{message}"),
        other => panic!("unexpected error: {other}"),
    }
}
