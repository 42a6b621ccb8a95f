//! Integration tests for the text generation clients using WireMock
//!
//! The clients are blocking, so each call runs on a blocking thread while the
//! mock server is served by the test runtime.

use ai_core::{
    CompletionRequest, HuggingFaceConfig, HuggingFaceGenerator, InferenceError, LlmConfig,
    LlmProvider, OllamaConfig, OllamaGenerator, OpenAiConfig, OpenAiGenerator, ProviderRegistry,
    TextGenerator,
};
use secrecy::SecretString;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn openai_config(base_url: &str) -> OpenAiConfig {
    OpenAiConfig {
        api_key: Some(SecretString::from("sk-test")),
        base_url: base_url.to_string(),
        model: "gpt-test".to_string(),
        timeout_ms: 5000,
    }
}

fn ollama_config(base_url: &str) -> OllamaConfig {
    OllamaConfig {
        base_url: base_url.to_string(),
        story_model: "mistral".to_string(),
        summary_model: "mistral-small".to_string(),
        timeout_ms: 5000,
    }
}

fn hf_config(base_url: &str) -> HuggingFaceConfig {
    HuggingFaceConfig {
        api_key: Some(SecretString::from("hf-test")),
        base_url: base_url.to_string(),
        story_model: "org/story-model".to_string(),
        summary_model: "org/summary-model".to_string(),
        timeout_ms: 5000,
        ..Default::default()
    }
}

fn chat_success_response(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-1",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
}

async fn run_blocking<T, F>(f: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.unwrap()
}

// =============================================================================
// OpenAI Tests
// =============================================================================

mod openai_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn completion_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-test",
                "max_tokens": 1200,
                "messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "Racconta"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_success_response("{\"ok\":1}")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = run_blocking(move || {
            let generator = OpenAiGenerator::new(&openai_config(&uri)).unwrap();
            generator.complete(&CompletionRequest::story("sys", "Racconta"))
        })
        .await;

        assert_eq!(result.unwrap(), "{\"ok\":1}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn too_many_requests_is_rate_limited() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = run_blocking(move || {
            OpenAiGenerator::new(&openai_config(&uri))
                .unwrap()
                .complete(&CompletionRequest::story("sys", "p"))
        })
        .await;

        assert!(matches!(result, Err(InferenceError::RateLimited)));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn server_error_carries_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = run_blocking(move || {
            OpenAiGenerator::new(&openai_config(&uri))
                .unwrap()
                .complete(&CompletionRequest::story("sys", "p"))
        })
        .await;

        assert!(matches!(
            result,
            Err(InferenceError::ServerError { status: 500, .. })
        ));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_choices_is_invalid_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = run_blocking(move || {
            OpenAiGenerator::new(&openai_config(&uri))
                .unwrap()
                .complete(&CompletionRequest::story("sys", "p"))
        })
        .await;

        assert!(matches!(result, Err(InferenceError::InvalidResponse(_))));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unreachable_server_is_transport_error() {
        let result = run_blocking(|| {
            OpenAiGenerator::new(&openai_config("http://127.0.0.1:1"))
                .unwrap()
                .complete(&CompletionRequest::story("sys", "p"))
        })
        .await;

        assert!(matches!(
            result,
            Err(InferenceError::ConnectionFailed(_) | InferenceError::RequestFailed(_))
        ));
    }
}

// =============================================================================
// Ollama Tests
// =============================================================================

mod ollama_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(header("ngrok-skip-browser-warning", "true"))
            .and(body_partial_json(serde_json::json!({
                "model": "mistral",
                "prompt": "instr\nPROMPT:\nstoria",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "model": "mistral",
                "response": "{\"intro\": \"C'era una volta\"}",
                "done": true
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = run_blocking(move || {
            OllamaGenerator::new(&ollama_config(&uri))
                .unwrap()
                .complete(&CompletionRequest::story("instr", "storia"))
        })
        .await;

        assert!(result.unwrap().contains("C'era una volta"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn summary_uses_summary_model() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(serde_json::json!({"model": "mistral-small"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "{\"summary\": \"ok\"}"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = run_blocking(move || {
            OllamaGenerator::new(&ollama_config(&uri))
                .unwrap()
                .complete(&CompletionRequest::summary("", "STORY: x"))
        })
        .await;

        assert!(result.is_ok());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn empty_response_is_invalid() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "   "
            })))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = run_blocking(move || {
            OllamaGenerator::new(&ollama_config(&uri))
                .unwrap()
                .complete(&CompletionRequest::story("instr", "storia"))
        })
        .await;

        assert!(matches!(result, Err(InferenceError::InvalidResponse(_))));
    }
}

// =============================================================================
// HuggingFace Tests
// =============================================================================

mod huggingface_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn list_response_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/org/story-model"))
            .and(header("authorization", "Bearer hf-test"))
            .and(body_partial_json(serde_json::json!({
                "parameters": {"max_new_tokens": 800, "return_full_text": false},
                "options": {"wait_for_model": true}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"generated_text": "  {\"intro\": \"x\"}  "}
            ])))
            .expect(1)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = run_blocking(move || {
            HuggingFaceGenerator::new(&hf_config(&uri))
                .unwrap()
                .complete(&CompletionRequest::story("instr", "p").with_max_tokens(800))
        })
        .await;

        assert_eq!(result.unwrap(), "{\"intro\": \"x\"}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn object_response_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/org/summary-model"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "generated_text": "{\"summary\": \"y\"}"
            })))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = run_blocking(move || {
            HuggingFaceGenerator::new(&hf_config(&uri))
                .unwrap()
                .complete(&CompletionRequest::summary("", "STORY: y"))
        })
        .await;

        assert_eq!(result.unwrap(), "{\"summary\": \"y\"}");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn model_loading_error_is_server_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/org/story-model"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": "Model is currently loading"
            })))
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        let result = run_blocking(move || {
            HuggingFaceGenerator::new(&hf_config(&uri))
                .unwrap()
                .complete(&CompletionRequest::story("instr", "p"))
        })
        .await;

        assert!(matches!(
            result,
            Err(InferenceError::ServerError { status: 503, .. })
        ));
    }
}

// =============================================================================
// Registry Tests
// =============================================================================

mod registry_tests {
    use super::*;

    #[tokio::test(flavor = "multi_thread")]
    async fn registry_generator_reuses_configured_endpoint() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": "{}"
            })))
            .expect(2)
            .mount(&mock_server)
            .await;

        let uri = mock_server.uri();
        run_blocking(move || {
            let config = LlmConfig {
                provider: LlmProvider::Ollama,
                ollama: ollama_config(&uri),
                ..Default::default()
            };
            let registry = ProviderRegistry::new(&config).unwrap();
            let generator = registry.generator().unwrap();
            assert_eq!(generator.kind(), LlmProvider::Ollama);
            generator
                .complete(&CompletionRequest::story("a", "b"))
                .unwrap();
            generator
                .complete(&CompletionRequest::summary("", "c"))
                .unwrap();
        })
        .await;
    }
}
