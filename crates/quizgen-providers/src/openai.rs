//! OpenAI-compatible chat-completions provider.
//!
//! Groq serves the same API under `/openai`, so one implementation covers
//! both; the constructors only differ in name, base URL and model list.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizgen_core::error::ProviderError;
use quizgen_core::traits::{
    GenerateRequest, GenerateResponse, LlmProvider, ModelInfo, TokenUsage, DEFAULT_SYSTEM_PROMPT,
};

const OPENAI_BASE_URL: &str = "https://api.openai.com";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Provider for any endpoint that speaks `/v1/chat/completions`.
pub struct OpenAiProvider {
    name: &'static str,
    api_key: String,
    base_url: String,
    org_id: Option<String>,
    client: reqwest::Client,
}

impl OpenAiProvider {
    /// OpenAI itself.
    pub fn new(
        api_key: &str,
        base_url: Option<String>,
        org_id: Option<String>,
    ) -> anyhow::Result<Self> {
        Self::build("openai", api_key, base_url, OPENAI_BASE_URL, org_id)
    }

    /// Groq's OpenAI-compatible endpoint.
    pub fn groq(api_key: &str, base_url: Option<String>) -> anyhow::Result<Self> {
        Self::build("groq", api_key, base_url, GROQ_BASE_URL, None)
    }

    fn build(
        name: &'static str,
        api_key: &str,
        base_url: Option<String>,
        default_base_url: &str,
        org_id: Option<String>,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::NetworkError(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            name,
            api_key: api_key.to_string(),
            base_url: base_url
                .unwrap_or_else(|| default_base_url.to_string())
                .trim_end_matches('/')
                .to_string(),
            org_id,
            client,
        })
    }
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    temperature: f64,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: ChatUsage,
    model: String,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct ChatUsage {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
    #[serde(default)]
    total_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        self.name
    }

    #[instrument(skip(self, request), fields(provider = self.name, model = %request.model))]
    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let start = Instant::now();

        let system_prompt = request
            .system_prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string());

        let body = ChatRequest {
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
        };

        let mut req = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json");

        if let Some(org) = &self.org_id {
            req = req.header("OpenAI-Organization", org);
        }

        let response = req.json(&body).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(DEFAULT_TIMEOUT_SECS)
            } else {
                ProviderError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(5)
                .saturating_mul(1000);
            return Err(ProviderError::RateLimited {
                retry_after_ms: retry_after,
            }
            .into());
        }
        if status == 401 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::AuthenticationFailed(body).into());
        }
        if status == 404 {
            return Err(ProviderError::ModelNotFound(request.model.clone()).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: ChatResponse =
            response
                .json()
                .await
                .map_err(|e| ProviderError::ApiError {
                    status,
                    message: format!("failed to parse response: {e}"),
                })?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let content = api_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ProviderError::ApiError {
                status,
                message: "response contained no message content".into(),
            })?;

        tracing::debug!(
            latency_ms,
            completion_tokens = api_response.usage.completion_tokens,
            "received completion"
        );

        Ok(GenerateResponse {
            content,
            model: api_response.model,
            token_usage: TokenUsage {
                prompt_tokens: api_response.usage.prompt_tokens,
                completion_tokens: api_response.usage.completion_tokens,
                total_tokens: api_response.usage.total_tokens,
            },
            latency_ms,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        let models: &[(&str, &str, u32)] = match self.name {
            "groq" => &[
                ("llama-3.1-8b-instant", "Llama 3.1 8B Instant", 131_072),
                ("llama-3.3-70b-versatile", "Llama 3.3 70B Versatile", 131_072),
                ("gemma2-9b-it", "Gemma 2 9B", 8_192),
            ],
            _ => &[
                ("gpt-4.1", "GPT-4.1", 1_000_000),
                ("gpt-4.1-mini", "GPT-4.1 Mini", 1_000_000),
                ("gpt-4.1-nano", "GPT-4.1 Nano", 1_000_000),
            ],
        };
        models
            .iter()
            .map(|(id, name, max_context)| ModelInfo {
                id: (*id).into(),
                name: (*name).into(),
                provider: self.name.into(),
                max_context: *max_context,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request(model: &str) -> GenerateRequest {
        GenerateRequest {
            model: model.into(),
            prompt: "Write one question".into(),
            system_prompt: None,
            max_tokens: 256,
            temperature: 0.9,
        }
    }

    fn completion(content: &str, model: &str) -> serde_json::Value {
        serde_json::json!({
            "choices": [{"message": {"content": content, "role": "assistant"}, "index": 0}],
            "model": model,
            "usage": {"prompt_tokens": 40, "completion_tokens": 15, "total_tokens": 55}
        })
    }

    #[tokio::test]
    async fn successful_generation() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama-3.1-8b-instant",
                "temperature": 0.9
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion(r#"{"answer": true}"#, "llama-3.1-8b-instant")),
            )
            .mount(&server)
            .await;

        let provider = OpenAiProvider::groq("test-key", Some(server.uri())).unwrap();
        let response = provider
            .generate(&request("llama-3.1-8b-instant"))
            .await
            .unwrap();
        assert_eq!(response.content, r#"{"answer": true}"#);
        assert_eq!(response.token_usage.total_tokens, 55);
        assert_eq!(provider.name(), "groq");
    }

    #[tokio::test]
    async fn organization_header_is_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("OpenAI-Organization", "org-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok", "gpt-4.1")))
            .mount(&server)
            .await;

        let provider =
            OpenAiProvider::new("key", Some(server.uri()), Some("org-123".into())).unwrap();
        let response = provider.generate(&request("gpt-4.1")).await.unwrap();
        assert_eq!(response.model, "gpt-4.1");
    }

    #[tokio::test]
    async fn rate_limit_carries_retry_after() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::groq("key", Some(server.uri())).unwrap();
        let err = provider.generate(&request("m")).await.unwrap_err();
        let provider_err = err.downcast_ref::<ProviderError>().unwrap();
        assert_eq!(provider_err.retry_after_ms(), Some(7000));
    }

    #[tokio::test]
    async fn huge_retry_after_saturates() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(429).insert_header("retry-after", "99999999999999999"),
            )
            .mount(&server)
            .await;

        let provider = OpenAiProvider::groq("key", Some(server.uri())).unwrap();
        let err = provider.generate(&request("m")).await.unwrap_err();
        let provider_err = err.downcast_ref::<ProviderError>().unwrap();
        assert_eq!(provider_err.retry_after_ms(), Some(u64::MAX));
    }

    #[tokio::test]
    async fn unauthorized_is_authentication_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::groq("bad", Some(server.uri())).unwrap();
        let err = provider.generate(&request("m")).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ProviderError>(),
            Some(ProviderError::AuthenticationFailed(_))
        ));
    }

    #[tokio::test]
    async fn error_response() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::groq("key", Some(server.uri())).unwrap();
        let err = provider.generate(&request("m")).await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[tokio::test]
    async fn empty_choices_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [],
                "model": "m"
            })))
            .mount(&server)
            .await;

        let provider = OpenAiProvider::groq("key", Some(server.uri())).unwrap();
        let err = provider.generate(&request("m")).await.unwrap_err();
        assert!(err.to_string().contains("no message content"));
    }

    #[test]
    fn model_lists_differ_by_provider() {
        let groq = OpenAiProvider::groq("k", None).unwrap();
        assert!(groq
            .available_models()
            .iter()
            .any(|m| m.id == "llama-3.1-8b-instant"));

        let openai = OpenAiProvider::new("k", None, None).unwrap();
        assert!(openai.available_models().iter().all(|m| m.provider == "openai"));
    }
}
