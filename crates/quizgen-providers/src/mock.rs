//! Mock provider for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizgen_core::error::ProviderError;
use quizgen_core::traits::{GenerateRequest, GenerateResponse, LlmProvider, ModelInfo, TokenUsage};

/// A mock LLM provider for driving the generator without real API calls.
///
/// Replies are consumed in order; the final reply repeats once the script
/// runs out.
pub struct MockProvider {
    /// Scripted replies. `None` stands for a transport failure.
    replies: Vec<Option<String>>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    /// Create a mock that always returns the same response.
    pub fn with_fixed_response(response: &str) -> Self {
        Self::with_sequence([response])
    }

    /// Create a mock that returns each response in turn.
    pub fn with_sequence<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: responses.into_iter().map(|r| Some(r.into())).collect(),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Insert a transport failure before the scripted replies.
    pub fn failing_first(mut self, failures: usize) -> Self {
        let mut replies = vec![None; failures];
        replies.append(&mut self.replies);
        self.replies = replies;
        self
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or(None)
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> anyhow::Result<GenerateResponse> {
        let index = self.call_count.fetch_add(1, Ordering::Relaxed) as usize;
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }

        let reply = self
            .replies
            .get(index)
            .or_else(|| self.replies.last())
            .cloned()
            .flatten()
            .ok_or_else(|| ProviderError::NetworkError("scripted failure".into()))?;

        let prompt_tokens = (request.prompt.len() / 4) as u32;
        let completion_tokens = (reply.len() / 4) as u32; // rough estimate

        Ok(GenerateResponse {
            content: reply,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms: 1,
        })
    }

    fn available_models(&self) -> Vec<ModelInfo> {
        vec![ModelInfo {
            id: "mock-model".into(),
            name: "Mock Model".into(),
            provider: "mock".into(),
            max_context: 100_000,
        }]
    }
}
