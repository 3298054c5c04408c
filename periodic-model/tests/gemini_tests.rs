use futures::StreamExt;
use periodic_core::{Content, Llm, LlmRequest, Part, PeriodicError};
use periodic_model::gemini::GeminiConfig;
use periodic_model::{GeminiModel, RetryConfig};
use serde_json::{Value, json};
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[test]
fn test_empty_api_key_rejected() {
    let err = GeminiModel::new("  ", "gemini-2.0-flash").err().unwrap();
    assert!(matches!(err, PeriodicError::Config(_)));
}

#[test]
fn test_retry_config_is_additive() {
    let retry_config = RetryConfig::default()
        .with_max_retries(5)
        .with_initial_delay(Duration::from_millis(50))
        .with_max_delay(Duration::from_secs(1));

    assert!(retry_config.enabled);
    assert_eq!(retry_config.max_retries, 5);
}

#[tokio::test]
async fn test_generate_content_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "氢的原子序数是 1。"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 30, "candidatesTokenCount": 8, "totalTokenCount": 38}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let model = GeminiModel::from_config(
        GeminiConfig::new("test-key", "gemini-2.0-flash").with_base_url(server.uri()),
    )
    .unwrap();

    let request = LlmRequest::new(
        "gemini-2.0-flash",
        vec![
            Content::new("user").with_text("氢的原子序数？"),
            Content::new("model").with_part(Part::FunctionCall {
                name: "get_element_info".to_string(),
                args: json!({"symbol": "氢"}),
                id: None,
            }),
            Content::new("function").with_part(Part::function_response(
                "get_element_info",
                json!({"status": "success", "report": "氢（Hydrogen），原子序数：1，原子量：1.008"}),
            )),
        ],
    );

    let mut stream = model.generate_content(request, false).await.unwrap();
    let response = stream.next().await.unwrap().unwrap();
    assert_eq!(response.content.and_then(|c| c.text()).as_deref(), Some("氢的原子序数是 1。"));
    assert_eq!(response.usage_metadata.unwrap().total_token_count, 38);

    let received = server.received_requests().await.unwrap();
    let body: Value = received[0].body_json().unwrap();
    assert_eq!(body["contents"][2]["role"], "user");
    assert_eq!(
        body["contents"][2]["parts"][0]["functionResponse"]["response"]["status"],
        "success"
    );
}

#[tokio::test]
async fn test_bad_request_surfaces_model_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("API key not valid"))
        .expect(1)
        .mount(&server)
        .await;

    let model = GeminiModel::from_config(
        GeminiConfig::new("bad-key", "gemini-2.0-flash").with_base_url(server.uri()),
    )
    .unwrap();

    let err = model.generate_content(LlmRequest::new("gemini-2.0-flash", vec![]), false).await.err().unwrap();
    match err {
        PeriodicError::Model(message) => {
            assert!(message.contains("400"), "{message}");
            assert!(message.contains("API key not valid"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_client_error_mentioning_timeout_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_string("request timeout exceeded"))
        .expect(1)
        .mount(&server)
        .await;

    let model = GeminiModel::from_config(
        GeminiConfig::new("test-key", "gemini-2.0-flash").with_base_url(server.uri()),
    )
    .unwrap()
    .with_retry_config(
        RetryConfig::default()
            .with_max_retries(3)
            .with_initial_delay(Duration::ZERO)
            .with_max_delay(Duration::ZERO),
    );

    let err = model.generate_content(LlmRequest::new("gemini-2.0-flash", vec![]), false).await.err().unwrap();

    assert!(err.to_string().contains("400 Bad Request"), "{err}");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}
