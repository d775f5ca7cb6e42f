//! quizgen-core: question schema, generator, and quiz session engine.
//!
//! This crate defines the question data model, the prompt templates, the
//! `LlmProvider` trait, the retrying generator, and the session state machine
//! that grades answers and writes results.

pub mod error;
pub mod generator;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod report;
pub mod session;
pub mod traits;
