//! Strict parsers for LLM replies and answer sheets.
//!
//! LLM replies are deserialized into per-kind wire structs that reject
//! unknown and missing fields. The one tolerated deviation: a text field that
//! arrives as an object is replaced by its `description` string.

use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::AttemptError;
use crate::model::{
    FillBlankQuestion, McqQuestion, NumericQuestion, Question, QuestionKind, TrueFalseQuestion,
    UserAnswer,
};
use crate::traits::extract_json_block;

/// A text field as LLMs actually send it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextField {
    Plain(String),
    Described { description: String },
}

impl From<TextField> for String {
    fn from(field: TextField) -> Self {
        match field {
            TextField::Plain(s) => s,
            TextField::Described { description } => description,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireMcq {
    question: TextField,
    options: Vec<String>,
    correct_answer: String,
    #[serde(default)]
    explanation: Option<TextField>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireFillBlank {
    question: TextField,
    answer: String,
    #[serde(default)]
    explanation: Option<TextField>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireNumeric {
    question: TextField,
    answer: f64,
    #[serde(default)]
    explanation: Option<TextField>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WireTrueFalse {
    question: TextField,
    answer: bool,
    #[serde(default)]
    explanation: Option<TextField>,
}

fn parse_wire<T: DeserializeOwned>(kind: QuestionKind, raw: &str) -> Result<T, AttemptError> {
    let json = extract_json_block(raw);
    serde_json::from_str(&json).map_err(|e| AttemptError::Parse {
        kind,
        message: e.to_string(),
    })
}

/// Parse a raw LLM reply as a question of `kind`.
///
/// Only checks shape and types; call [`Question::validate`] for domain rules.
pub fn parse_question(kind: QuestionKind, raw: &str) -> Result<Question, AttemptError> {
    let question = match kind {
        QuestionKind::Mcq => {
            let w: WireMcq = parse_wire(kind, raw)?;
            Question::Mcq(McqQuestion {
                question: w.question.into(),
                options: w.options,
                correct_answer: w.correct_answer,
                explanation: w.explanation.map(Into::into),
            })
        }
        QuestionKind::FillBlank => {
            let w: WireFillBlank = parse_wire(kind, raw)?;
            Question::FillBlank(FillBlankQuestion {
                question: w.question.into(),
                answer: w.answer,
                explanation: w.explanation.map(Into::into),
            })
        }
        QuestionKind::Numeric => {
            let w: WireNumeric = parse_wire(kind, raw)?;
            Question::Numeric(NumericQuestion {
                question: w.question.into(),
                answer: w.answer,
                explanation: w.explanation.map(Into::into),
            })
        }
        QuestionKind::TrueFalse => {
            let w: WireTrueFalse = parse_wire(kind, raw)?;
            Question::TrueFalse(TrueFalseQuestion {
                question: w.question.into(),
                answer: w.answer,
                explanation: w.explanation.map(Into::into),
            })
        }
    };
    Ok(question)
}

/// Intermediate TOML structure for answer sheets.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlAnswerSheet {
    answers: Vec<UserAnswer>,
}

/// Load an answer sheet (`answers = ["Paris", true, "5"]`) from a TOML file.
pub fn load_answers(path: &Path) -> Result<Vec<UserAnswer>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read answers file: {}", path.display()))?;

    parse_answers_str(&content, path)
}

/// Parse an answer sheet from a TOML string (useful for testing).
pub fn parse_answers_str(content: &str, source_path: &Path) -> Result<Vec<UserAnswer>> {
    let sheet: TomlAnswerSheet = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
    Ok(sheet.answers)
}
