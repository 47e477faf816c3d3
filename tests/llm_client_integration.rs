use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vault_ask::config::LlmConfig;
use vault_ask::{ChatCompletionClient, LanguageModel, ModelError};

fn config(server: &MockServer) -> LlmConfig {
    LlmConfig {
        base_url: format!("{}/v1", server.uri()),
        model: "test-model".to_string(),
        timeout_secs: 5,
        max_retries: 2,
        initial_backoff_ms: 10,
        ..LlmConfig::default()
    }
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn test_complete_sends_prompt_and_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [{ "role": "user", "content": "Say hi" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("hi")))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatCompletionClient::new(&config(&server), "sk-test").unwrap();
    assert_eq!(client.complete("Say hi").await.unwrap(), "hi");
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("recovered")))
        .with_priority(2)
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatCompletionClient::new(&config(&server), "sk-test").unwrap();
    assert_eq!(client.complete("anything").await.unwrap(), "recovered");
}

#[tokio::test]
async fn test_rate_limit_exhausts_retries() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
        .expect(3)
        .mount(&server)
        .await;

    let client = ChatCompletionClient::new(&config(&server), "sk-test").unwrap();
    let err = client.complete("anything").await.unwrap_err();
    assert_matches!(err, ModelError::RetriesExhausted { attempts: 3, .. });
}

#[tokio::test]
async fn test_auth_failure_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatCompletionClient::new(&config(&server), "sk-wrong").unwrap();
    let err = client.complete("anything").await.unwrap_err();
    assert_matches!(err, ModelError::Status { status: 401, ref body } if body == "invalid api key");
}

#[tokio::test]
async fn test_missing_choices_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = ChatCompletionClient::new(&config(&server), "sk-test").unwrap();
    assert_matches!(client.complete("anything").await, Err(ModelError::EmptyResponse));
}

#[tokio::test]
async fn test_timeout_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(std::time::Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = LlmConfig {
        timeout_secs: 1,
        max_retries: 0,
        ..config(&server)
    };
    let client = ChatCompletionClient::new(&config, "sk-test").unwrap();
    let err = client.complete("anything").await.unwrap_err();
    assert!(err.is_transient(), "expected a timeout, got {:?}", err);
}
