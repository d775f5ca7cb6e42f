//! quizgen-providers: LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for OpenAI-compatible chat-completion
//! APIs (Groq by default, OpenAI itself as an alternative), plus a scripted
//! mock for tests.

pub mod config;
pub mod mock;
pub mod openai;

pub use config::{create_provider, load_config, ProviderConfig, QuizgenConfig};
pub use mock::MockProvider;
pub use openai::OpenAiProvider;
pub use quizgen_core::error::ProviderError;
