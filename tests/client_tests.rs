//! Wire-level tests for the inference client against a mock server.

use std::time::Duration;

use pretty_assertions::assert_eq;
use roast::client::InferenceClient;
use roast::error::RoastError;
use roast::types::TextGenerationRequest;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PROMPT: &str = "Can you please let us know more details about your ";

fn request_for(model: &str) -> TextGenerationRequest {
    TextGenerationRequest::builder()
        .prompt(PROMPT)
        .model(model)
        .build()
}

fn router_client(server: &MockServer) -> InferenceClient {
    InferenceClient::new("featherless-ai", "test-token").with_base_url(server.uri())
}

#[tokio::test]
async fn router_happy_path_returns_choice_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/featherless-ai/v1/completions"))
        .and(header("authorization", "Bearer test-token"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "model": "meta-llama/Llama-3.1-8B",
            "prompt": PROMPT,
            "max_tokens": 200,
            "temperature": 0.8,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"text": "hello world"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = router_client(&server);
    let text = client
        .text_generation(&request_for("meta-llama/Llama-3.1-8B"))
        .await
        .expect("generation should succeed");

    assert_eq!(text, "hello world");
}

#[tokio::test]
async fn router_omits_unset_sampling_fields() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/featherless-ai/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"text": "ok"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = router_client(&server);
    client
        .text_generation(&request_for("meta-llama/Llama-3.1-8B"))
        .await
        .expect("generation should succeed");

    let requests = server.received_requests().await.expect("recording enabled");
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).expect("json body");
    let object = body.as_object().expect("object body");
    assert!(!object.contains_key("top_p"));
    assert!(!object.contains_key("stop"));
}

#[tokio::test]
async fn router_falls_back_to_chat_style_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/featherless-ai/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "from chat shape"}}]
        })))
        .mount(&server)
        .await;

    let client = router_client(&server);
    let text = client
        .text_generation(&request_for("meta-llama/Llama-3.1-8B"))
        .await
        .expect("generation should succeed");

    assert_eq!(text, "from chat shape");
}

#[tokio::test]
async fn router_empty_choices_is_a_request_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/featherless-ai/v1/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = router_client(&server);
    let err = client
        .text_generation(&request_for("meta-llama/Llama-3.1-8B"))
        .await
        .expect_err("empty choices must fail");

    assert!(matches!(err, RoastError::Request { .. }));
    assert!(
        err.to_string().contains("no generated text"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn router_malformed_body_is_a_request_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/featherless-ai/v1/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/json")
                .set_body_string("this is not json"),
        )
        .mount(&server)
        .await;

    let client = router_client(&server);
    let err = client
        .text_generation(&request_for("meta-llama/Llama-3.1-8B"))
        .await
        .expect_err("malformed body must fail");

    assert!(matches!(err, RoastError::Request { .. }));
    assert!(
        err.to_string().contains("undecodable"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn inference_api_route_uses_models_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/meta-llama/Llama-3.1-8B"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "inputs": PROMPT,
            "parameters": {
                "max_new_tokens": 200,
                "temperature": 0.8,
                "return_full_text": false,
            },
            "options": {"wait_for_model": true},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"generated_text": "legacy route text"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        InferenceClient::new("hf-inference", "test-token").with_base_url(server.uri());
    let text = client
        .text_generation(&request_for("meta-llama/Llama-3.1-8B"))
        .await
        .expect("generation should succeed");

    assert_eq!(text, "legacy route text");
}

#[tokio::test]
async fn inference_api_accepts_output_text_alias() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/org/model"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"output_text": "aliased text"}])),
        )
        .mount(&server)
        .await;

    let client = InferenceClient::new("hf-inference", "test-token").with_base_url(server.uri());
    let text = client
        .text_generation(&request_for("org/model"))
        .await
        .expect("generation should succeed");

    assert_eq!(text, "aliased text");
}

#[tokio::test]
async fn auth_failure_carries_status_and_guidance() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/featherless-ai/v1/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let client = router_client(&server);
    let err = client
        .text_generation(&request_for("meta-llama/Llama-3.1-8B"))
        .await
        .expect_err("401 must fail");

    assert_eq!(err.status(), Some(401));
    let text = err.to_string();
    assert!(text.contains("Invalid credentials"), "unexpected error: {text}");
    assert!(
        text.contains("inference permission"),
        "unexpected error: {text}"
    );
}

#[tokio::test]
async fn not_found_names_provider_and_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/featherless-ai/v1/completions"))
        .respond_with(ResponseTemplate::new(404).set_body_string(""))
        .mount(&server)
        .await;

    let client = router_client(&server);
    let err = client
        .text_generation(&request_for("org/absent-model"))
        .await
        .expect_err("404 must fail");

    assert_eq!(err.status(), Some(404));
    let text = err.to_string();
    assert!(text.contains("featherless-ai"), "unexpected error: {text}");
    assert!(text.contains("org/absent-model"), "unexpected error: {text}");
}

#[tokio::test]
async fn rate_limit_echoes_retry_after_header() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/featherless-ai/v1/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "7")
                .set_body_json(json!({"error": "rate limit exceeded"})),
        )
        .mount(&server)
        .await;

    let client = router_client(&server);
    let err = client
        .text_generation(&request_for("meta-llama/Llama-3.1-8B"))
        .await
        .expect_err("429 must fail");

    assert_eq!(err.status(), Some(429));
    let text = err.to_string();
    assert!(text.contains("rate limit exceeded"), "unexpected error: {text}");
    assert!(text.contains("retry after 7s"), "unexpected error: {text}");
}

#[tokio::test]
async fn unavailable_reports_model_loading_estimate() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/org/cold-model"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": "Model org/cold-model is currently loading",
            "estimated_time": 20.0,
        })))
        .mount(&server)
        .await;

    let client = InferenceClient::new("hf-inference", "test-token").with_base_url(server.uri());
    let err = client
        .text_generation(&request_for("org/cold-model"))
        .await
        .expect_err("503 must fail");

    assert_eq!(err.status(), Some(503));
    assert!(
        err.to_string().contains("model loading"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn server_error_carries_body_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/featherless-ai/v1/completions"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": "backend exploded"})),
        )
        .mount(&server)
        .await;

    let client = router_client(&server);
    let err = client
        .text_generation(&request_for("meta-llama/Llama-3.1-8B"))
        .await
        .expect_err("500 must fail");

    assert_eq!(err.status(), Some(500));
    assert!(
        err.to_string().contains("backend exploded"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn deadline_expiry_is_a_request_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/featherless-ai/v1/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"text": "too late"}]}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let client = router_client(&server).with_timeout(Duration::from_millis(50));
    let err = client
        .text_generation(&request_for("meta-llama/Llama-3.1-8B"))
        .await
        .expect_err("deadline must fail the call");

    assert!(matches!(err, RoastError::Request { .. }));
    assert!(
        err.to_string().contains("timed out"),
        "unexpected error: {err}"
    );
}

#[tokio::test]
async fn stop_sequences_reach_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/featherless-ai/v1/completions"))
        .and(body_partial_json(json!({"stop": ["\n\n"], "top_p": 0.9})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"text": "bounded"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = TextGenerationRequest::builder()
        .prompt(PROMPT)
        .model("meta-llama/Llama-3.1-8B")
        .top_p(0.9)
        .stop(vec!["\n\n".to_string()])
        .build();

    let client = router_client(&server);
    let text = client
        .text_generation(&request)
        .await
        .expect("generation should succeed");

    assert_eq!(text, "bounded");
}
