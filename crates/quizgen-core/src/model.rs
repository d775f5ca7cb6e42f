//! Core data model types for quizgen.
//!
//! Questions come in four kinds. Each kind is its own struct so the generator
//! can hand back a concrete type (`generate_mcq` returns an [`McqQuestion`]),
//! while [`Question`] is the uniform form a quiz session stores.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Placeholder that marks the omitted word in a fill-in-the-blank question.
pub const BLANK_MARKER: &str = "___";

/// Number of options every multiple-choice question must carry.
pub const MCQ_OPTION_COUNT: usize = 4;

/// The four supported question kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionKind {
    Mcq,
    FillBlank,
    Numeric,
    TrueFalse,
}

impl QuestionKind {
    pub const ALL: [QuestionKind; 4] = [
        QuestionKind::Mcq,
        QuestionKind::FillBlank,
        QuestionKind::Numeric,
        QuestionKind::TrueFalse,
    ];
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Mcq => write!(f, "MCQ"),
            QuestionKind::FillBlank => write!(f, "Fill in the blank"),
            QuestionKind::Numeric => write!(f, "Numeric"),
            QuestionKind::TrueFalse => write!(f, "True or False"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c == '_' || c == ' ' { '-' } else { c })
            .collect();
        match normalized.as_str() {
            "mcq" | "multiple-choice" => Ok(QuestionKind::Mcq),
            "fill-blank" | "fill-in-the-blank" | "blank" => Ok(QuestionKind::FillBlank),
            "numeric" | "numerical" => Ok(QuestionKind::Numeric),
            "true-false" | "true-or-false" | "tf" => Ok(QuestionKind::TrueFalse),
            _ => Err(format!("unknown question type: {s}")),
        }
    }
}

/// Requested difficulty, rendered lowercase into prompts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty: {other}")),
        }
    }
}

/// What to generate questions about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRequest {
    pub subject: String,
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Named exam used to steer question style (e.g. "GATE", "JEE").
    #[serde(default = "default_exam_type")]
    pub exam_type: String,
}

impl QuestionRequest {
    pub fn new(subject: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
            difficulty: Difficulty::default(),
            exam_type: default_exam_type(),
        }
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    pub fn with_exam_type(mut self, exam_type: impl Into<String>) -> Self {
        self.exam_type = exam_type.into();
        self
    }
}

fn default_exam_type() -> String {
    "GATE".to_string()
}

/// A multiple-choice question with exactly four distinct options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl McqQuestion {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.options.len() != MCQ_OPTION_COUNT {
            return Err(ValidationError::WrongOptionCount(self.options.len()));
        }
        let mut seen = HashSet::new();
        for option in &self.options {
            if !seen.insert(option.as_str()) {
                return Err(ValidationError::DuplicateOption(option.clone()));
            }
        }
        if !seen.contains(self.correct_answer.as_str()) {
            return Err(ValidationError::AnswerNotInOptions(
                self.correct_answer.clone(),
            ));
        }
        Ok(())
    }
}

/// A sentence with a blank marker and the word or phrase that fills it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillBlankQuestion {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl FillBlankQuestion {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.question.contains(BLANK_MARKER) {
            Ok(())
        } else {
            Err(ValidationError::MissingBlankMarker)
        }
    }
}

/// A problem with a numeric answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericQuestion {
    pub question: String,
    pub answer: f64,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A statement that is either true or false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrueFalseQuestion {
    pub question: String,
    pub answer: bool,
    #[serde(default)]
    pub explanation: Option<String>,
}

/// A validated question of any kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Question {
    Mcq(McqQuestion),
    FillBlank(FillBlankQuestion),
    Numeric(NumericQuestion),
    TrueFalse(TrueFalseQuestion),
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::Mcq(_) => QuestionKind::Mcq,
            Question::FillBlank(_) => QuestionKind::FillBlank,
            Question::Numeric(_) => QuestionKind::Numeric,
            Question::TrueFalse(_) => QuestionKind::TrueFalse,
        }
    }

    pub fn question(&self) -> &str {
        match self {
            Question::Mcq(q) => &q.question,
            Question::FillBlank(q) => &q.question,
            Question::Numeric(q) => &q.question,
            Question::TrueFalse(q) => &q.question,
        }
    }

    pub fn explanation(&self) -> Option<&str> {
        match self {
            Question::Mcq(q) => q.explanation.as_deref(),
            Question::FillBlank(q) => q.explanation.as_deref(),
            Question::Numeric(q) => q.explanation.as_deref(),
            Question::TrueFalse(q) => q.explanation.as_deref(),
        }
    }

    /// Answer options; empty for every kind except MCQ.
    pub fn options(&self) -> &[String] {
        match self {
            Question::Mcq(q) => &q.options,
            _ => &[],
        }
    }

    /// The correct answer as the text a user would type or pick.
    pub fn correct_answer_text(&self) -> String {
        match self {
            Question::Mcq(q) => q.correct_answer.clone(),
            Question::FillBlank(q) => q.answer.clone(),
            Question::Numeric(q) => format_numeric(q.answer),
            Question::TrueFalse(q) => bool_text(q.answer).to_string(),
        }
    }

    /// Structural validation beyond what the type already guarantees.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Question::Mcq(q) => q.validate(),
            Question::FillBlank(q) => q.validate(),
            Question::Numeric(_) | Question::TrueFalse(_) => Ok(()),
        }
    }
}

impl From<McqQuestion> for Question {
    fn from(q: McqQuestion) -> Self {
        Question::Mcq(q)
    }
}

impl From<FillBlankQuestion> for Question {
    fn from(q: FillBlankQuestion) -> Self {
        Question::FillBlank(q)
    }
}

impl From<NumericQuestion> for Question {
    fn from(q: NumericQuestion) -> Self {
        Question::Numeric(q)
    }
}

impl From<TrueFalseQuestion> for Question {
    fn from(q: TrueFalseQuestion) -> Self {
        Question::TrueFalse(q)
    }
}

/// Render a number the way it is shown as a correct answer.
///
/// Values in `[1e-4, 1e16)` use plain decimals, with integral values keeping
/// one decimal place (`5.0`). Anything outside that range uses the shortest
/// exponent form with a signed, two-digit exponent (`1e-05`, `1.5e+16`).
pub fn format_numeric(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude == 0.0 || (1e-4..1e16).contains(&magnitude) {
        return if value.fract() == 0.0 {
            format!("{value:.1}")
        } else {
            value.to_string()
        };
    }

    let scientific = format!("{value:e}");
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => scientific,
    }
}

fn bool_text(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

/// What the user submitted for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserAnswer {
    Choice(bool),
    Text(String),
}

impl UserAnswer {
    /// Text form used for grading and export; booleans become "True"/"False".
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            UserAnswer::Choice(b) => Cow::Borrowed(bool_text(*b)),
            UserAnswer::Text(s) => Cow::Borrowed(s.as_str()),
        }
    }
}

impl From<&str> for UserAnswer {
    fn from(s: &str) -> Self {
        UserAnswer::Text(s.to_string())
    }
}

impl From<String> for UserAnswer {
    fn from(s: String) -> Self {
        UserAnswer::Text(s)
    }
}

impl From<bool> for UserAnswer {
    fn from(b: bool) -> Self {
        UserAnswer::Choice(b)
    }
}

impl fmt::Display for UserAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_text_uses_decimal_form_in_range() {
        assert_eq!(format_numeric(5.0), "5.0");
        assert_eq!(format_numeric(-3.0), "-3.0");
        assert_eq!(format_numeric(0.0), "0.0");
        assert_eq!(format_numeric(2.5), "2.5");
        assert_eq!(format_numeric(0.0001), "0.0001");
        assert_eq!(format_numeric(1e15), "1000000000000000.0");
    }

    #[test]
    fn numeric_text_uses_exponent_form_outside_range() {
        assert_eq!(format_numeric(0.00001), "1e-05");
        assert_eq!(format_numeric(1.5e-7), "1.5e-07");
        assert_eq!(format_numeric(1e16), "1e+16");
        assert_eq!(format_numeric(-2.5e20), "-2.5e+20");
        assert_eq!(format_numeric(1e-100), "1e-100");
        assert_eq!(format_numeric(f64::INFINITY), "inf");
    }

    fn mcq(options: &[&str], correct: &str) -> McqQuestion {
        McqQuestion {
            question: "Which layer does TCP belong to?".into(),
            options: options.iter().map(|s| s.to_string()).collect(),
            correct_answer: correct.into(),
            explanation: None,
        }
    }

    #[test]
    fn question_kind_display_and_parse() {
        assert_eq!(QuestionKind::Mcq.to_string(), "MCQ");
        assert_eq!(QuestionKind::TrueFalse.to_string(), "True or False");
        assert_eq!("mcq".parse::<QuestionKind>().unwrap(), QuestionKind::Mcq);
        assert_eq!(
            "Multiple Choice".parse::<QuestionKind>().unwrap(),
            QuestionKind::Mcq
        );
        assert_eq!(
            "Fill in the blank".parse::<QuestionKind>().unwrap(),
            QuestionKind::FillBlank
        );
        assert_eq!(
            "fill_blank".parse::<QuestionKind>().unwrap(),
            QuestionKind::FillBlank
        );
        assert_eq!(
            "numerical".parse::<QuestionKind>().unwrap(),
            QuestionKind::Numeric
        );
        assert_eq!(
            "True or False".parse::<QuestionKind>().unwrap(),
            QuestionKind::TrueFalse
        );
        assert!("essay".parse::<QuestionKind>().is_err());
    }

    #[test]
    fn labels_parse_back_to_their_kind() {
        for kind in QuestionKind::ALL {
            assert_eq!(kind.to_string().parse::<QuestionKind>().unwrap(), kind);
        }
    }

    #[test]
    fn difficulty_parse_is_case_insensitive() {
        assert_eq!("Hard".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!(Difficulty::default().to_string(), "medium");
        assert!("impossible".parse::<Difficulty>().is_err());
    }

    #[test]
    fn valid_mcq_passes() {
        let q = mcq(&["Physical", "Network", "Transport", "Application"], "Transport");
        assert!(q.validate().is_ok());
    }

    #[test]
    fn mcq_needs_exactly_four_options() {
        let q = mcq(&["A", "B", "C"], "A");
        assert_eq!(q.validate(), Err(ValidationError::WrongOptionCount(3)));

        let q = mcq(&["A", "B", "C", "D", "E"], "A");
        assert_eq!(q.validate(), Err(ValidationError::WrongOptionCount(5)));
    }

    #[test]
    fn mcq_rejects_duplicate_options() {
        let q = mcq(&["A", "B", "B", "D"], "A");
        assert_eq!(
            q.validate(),
            Err(ValidationError::DuplicateOption("B".into()))
        );
    }

    #[test]
    fn mcq_answer_must_be_an_option() {
        let q = mcq(&["A", "B", "C", "D"], "E");
        assert_eq!(
            q.validate(),
            Err(ValidationError::AnswerNotInOptions("E".into()))
        );
    }

    #[test]
    fn fill_blank_requires_marker() {
        let ok = FillBlankQuestion {
            question: "Ohm's law states that V = _____ * I.".into(),
            answer: "R".into(),
            explanation: None,
        };
        assert!(ok.validate().is_ok());

        let missing = FillBlankQuestion {
            question: "Ohm's law states that V = R * I.".into(),
            answer: "R".into(),
            explanation: None,
        };
        assert_eq!(missing.validate(), Err(ValidationError::MissingBlankMarker));

        let too_short = FillBlankQuestion {
            question: "V = __ * I".into(),
            answer: "R".into(),
            explanation: None,
        };
        assert!(too_short.validate().is_err());
    }

    #[test]
    fn correct_answer_text_per_kind() {
        let q = Question::Numeric(NumericQuestion {
            question: "R for V=10V, I=2A?".into(),
            answer: 5.0,
            explanation: None,
        });
        assert_eq!(q.correct_answer_text(), "5.0");

        let q = Question::Numeric(NumericQuestion {
            question: "Half of 5?".into(),
            answer: 2.5,
            explanation: None,
        });
        assert_eq!(q.correct_answer_text(), "2.5");

        let q = Question::TrueFalse(TrueFalseQuestion {
            question: "In a vacuum, all objects fall at the same rate.".into(),
            answer: true,
            explanation: None,
        });
        assert_eq!(q.correct_answer_text(), "True");
        assert!(q.options().is_empty());
    }

    #[test]
    fn question_serde_is_tagged_by_kind() {
        let q: Question = TrueFalseQuestion {
            question: "Light is a wave.".into(),
            answer: false,
            explanation: Some("It is both.".into()),
        }
        .into();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["kind"], "true_false");
        let back: Question = serde_json::from_value(json).unwrap();
        assert_eq!(back, q);
    }

    #[test]
    fn user_answer_text_forms() {
        assert_eq!(UserAnswer::Choice(true).as_text(), "True");
        assert_eq!(UserAnswer::Choice(false).to_string(), "False");
        assert_eq!(UserAnswer::from(" Paris ").as_text(), " Paris ");

        let parsed: Vec<UserAnswer> = serde_json::from_str(r#"["5", true]"#).unwrap();
        assert_eq!(parsed, vec![UserAnswer::from("5"), UserAnswer::Choice(true)]);
    }
}
