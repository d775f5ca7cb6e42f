//! Question generator.
//!
//! Drives prompt → LLM → parse → validate for one question at a time, with a
//! bounded number of sequential attempts.

use std::sync::Arc;
use std::time::Duration;

use crate::error::{AttemptError, GenerationFailure};
use crate::model::{
    FillBlankQuestion, McqQuestion, NumericQuestion, Question, QuestionKind, QuestionRequest,
    TrueFalseQuestion,
};
use crate::parser::parse_question;
use crate::prompt::render_prompt;
use crate::traits::{GenerateRequest, LlmProvider};

/// Longest we will wait on a provider's retry-after hint.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Configuration for the question generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Max tokens for generation.
    pub max_tokens: u32,
    /// Attempts per question, including the first one.
    pub max_retries: u32,
    /// Pause between attempts (a rate-limit hint takes precedence).
    pub retry_delay: Duration,
    /// Optional system prompt override.
    pub system_prompt_override: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.9,
            max_tokens: 1024,
            max_retries: 3,
            retry_delay: Duration::ZERO,
            system_prompt_override: None,
        }
    }
}

/// Progress reporting trait.
pub trait ProgressReporter: Send + Sync {
    fn on_attempt_start(&self, kind: QuestionKind, attempt: u32, max_attempts: u32);
    fn on_attempt_failed(&self, kind: QuestionKind, attempt: u32, error: &AttemptError);
    fn on_question_ready(&self, index: usize, total: usize, question: &Question);
}

/// No-op progress reporter.
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_attempt_start(&self, _: QuestionKind, _: u32, _: u32) {}
    fn on_attempt_failed(&self, _: QuestionKind, _: u32, _: &AttemptError) {}
    fn on_question_ready(&self, _: usize, _: usize, _: &Question) {}
}

/// Generates validated questions from an LLM provider.
pub struct QuestionGenerator {
    provider: Arc<dyn LlmProvider>,
    config: GeneratorConfig,
}

impl QuestionGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub async fn generate_mcq(
        &self,
        request: &QuestionRequest,
    ) -> Result<McqQuestion, GenerationFailure> {
        self.run_attempts(QuestionKind::Mcq, request, &NoopReporter, |q| match q {
            Question::Mcq(q) => Some(q),
            _ => None,
        })
        .await
    }

    pub async fn generate_fill_blank(
        &self,
        request: &QuestionRequest,
    ) -> Result<FillBlankQuestion, GenerationFailure> {
        self.run_attempts(QuestionKind::FillBlank, request, &NoopReporter, |q| match q {
            Question::FillBlank(q) => Some(q),
            _ => None,
        })
        .await
    }

    pub async fn generate_numerical(
        &self,
        request: &QuestionRequest,
    ) -> Result<NumericQuestion, GenerationFailure> {
        self.run_attempts(QuestionKind::Numeric, request, &NoopReporter, |q| match q {
            Question::Numeric(q) => Some(q),
            _ => None,
        })
        .await
    }

    pub async fn generate_true_false(
        &self,
        request: &QuestionRequest,
    ) -> Result<TrueFalseQuestion, GenerationFailure> {
        self.run_attempts(QuestionKind::TrueFalse, request, &NoopReporter, |q| match q {
            Question::TrueFalse(q) => Some(q),
            _ => None,
        })
        .await
    }

    /// Generate one question of `kind`.
    pub async fn generate(
        &self,
        kind: QuestionKind,
        request: &QuestionRequest,
        progress: &dyn ProgressReporter,
    ) -> Result<Question, GenerationFailure> {
        self.run_attempts(kind, request, progress, Some).await
    }

    async fn run_attempts<T>(
        &self,
        kind: QuestionKind,
        request: &QuestionRequest,
        progress: &dyn ProgressReporter,
        pick: impl Fn(Question) -> Option<T>,
    ) -> Result<T, GenerationFailure> {
        let max_attempts = self.config.max_retries.max(1);
        let prompt = render_prompt(kind, request);

        let mut attempt = 1;
        loop {
            progress.on_attempt_start(kind, attempt, max_attempts);
            tracing::info!(
                "[{attempt}/{max_attempts}] generating {kind} question on '{}' ({}) for {}",
                request.topic,
                request.difficulty,
                request.exam_type
            );

            let outcome = self.attempt(kind, &prompt).await.and_then(|q| {
                pick(q).ok_or_else(|| AttemptError::Parse {
                    kind,
                    message: "parsed question has the wrong kind".into(),
                })
            });

            let error = match outcome {
                Ok(question) => {
                    tracing::info!(attempt, "parsed {kind} question");
                    return Ok(question);
                }
                Err(e) => e,
            };

            tracing::warn!(attempt, "{kind} attempt failed: {error}");
            progress.on_attempt_failed(kind, attempt, &error);

            if attempt >= max_attempts {
                tracing::error!("{kind} generation failed after {max_attempts} attempts");
                return Err(GenerationFailure {
                    kind,
                    attempts: attempt,
                    topic: request.topic.clone(),
                    difficulty: request.difficulty,
                    exam_type: request.exam_type.clone(),
                    last_error: error,
                });
            }

            let delay = error
                .retry_after_ms()
                .map(|ms| Duration::from_millis(ms).min(MAX_RETRY_AFTER))
                .unwrap_or(self.config.retry_delay);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }

    async fn attempt(&self, kind: QuestionKind, prompt: &str) -> Result<Question, AttemptError> {
        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: prompt.to_string(),
            system_prompt: self.config.system_prompt_override.clone(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = self
            .provider
            .generate(&request)
            .await
            .map_err(AttemptError::Transport)?;

        let question = parse_question(kind, &response.content)?;
        question
            .validate()
            .map_err(|reason| AttemptError::Structural { kind, reason })?;
        Ok(question)
    }
}
