//! Error types for providers, generation, and quiz sessions.
//!
//! `ProviderError` is defined here rather than in `quizgen-providers` so the
//! generator can downcast transport failures (e.g. to honour a rate-limit
//! hint) without string matching.

use thiserror::Error;

use crate::model::{Difficulty, QuestionKind};

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// A parsed question that breaks a domain rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("expected exactly 4 options, found {0}")]
    WrongOptionCount(usize),

    #[error("duplicate option: {0:?}")]
    DuplicateOption(String),

    #[error("correct answer {0:?} is not one of the options")]
    AnswerNotInOptions(String),

    #[error("question text has no blank marker (\"___\")")]
    MissingBlankMarker,
}

/// Why a single generation attempt failed.
///
/// Every variant is transient from the generator's point of view: the retry
/// loop absorbs them and only the last one escapes, wrapped in
/// [`GenerationFailure`].
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("LLM request failed: {0:#}")]
    Transport(anyhow::Error),

    #[error("response does not match the {kind} schema: {message}")]
    Parse { kind: QuestionKind, message: String },

    #[error("invalid {kind} question: {reason}")]
    Structural {
        kind: QuestionKind,
        reason: ValidationError,
    },
}

impl AttemptError {
    /// The provider's retry-after hint, when the attempt was rate limited.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            AttemptError::Transport(e) => e
                .downcast_ref::<ProviderError>()
                .and_then(ProviderError::retry_after_ms),
            _ => None,
        }
    }
}

/// All generation attempts for one question were exhausted.
#[derive(Debug, Error)]
#[error(
    "{kind} generation failed after {attempts} attempts \
     (topic '{topic}', {difficulty}, {exam_type})"
)]
pub struct GenerationFailure {
    pub kind: QuestionKind,
    pub attempts: u32,
    pub topic: String,
    pub difficulty: Difficulty,
    pub exam_type: String,
    #[source]
    pub last_error: AttemptError,
}

/// Errors surfaced by [`QuizSession`](crate::session::QuizSession).
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Generation(#[from] GenerationFailure),

    #[error("cannot {action} while the session is {state}")]
    InvalidState {
        action: &'static str,
        state: crate::session::SessionState,
    },

    #[error("expected {expected} answers (one per question), got {found}")]
    AnswerCountMismatch { expected: usize, found: usize },

    #[error("no results to save; grade the quiz first")]
    NoResults,

    #[error("inconsistent session: {0}")]
    Inconsistent(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid session JSON: {0}")]
    Json(#[from] serde_json::Error),
}
