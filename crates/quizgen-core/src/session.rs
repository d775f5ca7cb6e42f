//! Quiz session: questions, the user's answers, and graded results.
//!
//! The session moves Empty → Generated → Answered → Graded. Its state is
//! derived from which lists are populated, and every transition replaces the
//! lists together, so `questions`, `answers` and `results` never disagree.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{SessionError, ValidationError};
use crate::generator::{ProgressReporter, QuestionGenerator};
use crate::model::{Question, QuestionKind, QuestionRequest, UserAnswer};
use crate::report::{
    results_filename, write_csv_file, ResultRecord, ScoreSummary, NO_EXPLANATION,
};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Empty,
    Generated,
    Answered,
    Graded,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Empty => write!(f, "empty"),
            SessionState::Generated => write!(f, "generated"),
            SessionState::Answered => write!(f, "answered"),
            SessionState::Graded => write!(f, "graded"),
        }
    }
}

/// Compare a user's answer with the correct one.
///
/// MCQ and true/false answers are picked from fixed choices, so they must
/// match exactly. Typed answers (fill-blank, numeric) ignore case and
/// surrounding whitespace. Numbers are compared as text: "5" ≠ "5.0".
pub fn answers_match(kind: QuestionKind, user_answer: &str, correct_answer: &str) -> bool {
    match kind {
        QuestionKind::Mcq | QuestionKind::TrueFalse => user_answer == correct_answer,
        QuestionKind::FillBlank | QuestionKind::Numeric => {
            user_answer.trim().to_lowercase() == correct_answer.trim().to_lowercase()
        }
    }
}

/// A single quiz session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    id: Uuid,
    created_at: DateTime<Utc>,
    #[serde(default)]
    request: Option<QuestionRequest>,
    #[serde(default)]
    questions: Vec<Question>,
    #[serde(default)]
    answers: Vec<UserAnswer>,
    #[serde(default)]
    results: Vec<ResultRecord>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            request: None,
            questions: Vec::new(),
            answers: Vec::new(),
            results: Vec::new(),
        }
    }

    /// Start a session from already-generated questions.
    ///
    /// Returns the 0-based index of the first question that fails
    /// validation.
    pub fn from_questions(questions: Vec<Question>) -> Result<Self, (usize, ValidationError)> {
        for (i, q) in questions.iter().enumerate() {
            q.validate().map_err(|e| (i, e))?;
        }
        Ok(Self {
            questions,
            ..Self::new()
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The request the current questions were generated from, if known.
    pub fn request(&self) -> Option<&QuestionRequest> {
        self.request.as_ref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[UserAnswer] {
        &self.answers
    }

    pub fn state(&self) -> SessionState {
        if !self.results.is_empty() {
            SessionState::Graded
        } else if !self.answers.is_empty() {
            SessionState::Answered
        } else if !self.questions.is_empty() {
            SessionState::Generated
        } else {
            SessionState::Empty
        }
    }

    /// Discard questions, answers and results.
    pub fn reset(&mut self) {
        self.request = None;
        self.questions.clear();
        self.answers.clear();
        self.results.clear();
    }

    /// Replace the quiz with `count` freshly generated questions of `kind`.
    ///
    /// All or nothing: if any question fails, the session is left empty.
    pub async fn generate(
        &mut self,
        generator: &QuestionGenerator,
        request: &QuestionRequest,
        kind: QuestionKind,
        count: usize,
        progress: &dyn ProgressReporter,
    ) -> Result<(), SessionError> {
        self.reset();

        let mut questions = Vec::with_capacity(count);
        for index in 0..count {
            let question = generator.generate(kind, request, progress).await?;
            progress.on_question_ready(index, count, &question);
            questions.push(question);
        }

        tracing::info!(
            session = %self.id,
            "generated {count} {kind} question(s) on '{}'",
            request.topic
        );
        self.questions = questions;
        self.request = Some(request.clone());
        Ok(())
    }

    /// Store the user's answers, one per question in question order.
    pub fn record_answers(&mut self, answers: Vec<UserAnswer>) -> Result<(), SessionError> {
        let state = self.state();
        if state != SessionState::Generated {
            return Err(SessionError::InvalidState {
                action: "record answers",
                state,
            });
        }
        if answers.len() != self.questions.len() {
            return Err(SessionError::AnswerCountMismatch {
                expected: self.questions.len(),
                found: answers.len(),
            });
        }
        self.answers = answers;
        Ok(())
    }

    /// Grade the recorded answers. Grading an already graded session
    /// returns the existing results.
    pub fn grade(&mut self) -> Result<&[ResultRecord], SessionError> {
        match self.state() {
            SessionState::Graded => return Ok(&self.results),
            SessionState::Answered => {}
            state => {
                return Err(SessionError::InvalidState {
                    action: "grade",
                    state,
                })
            }
        }

        self.results = self
            .questions
            .iter()
            .zip(&self.answers)
            .enumerate()
            .map(|(i, (question, answer))| {
                let user_answer = answer.as_text().into_owned();
                let correct_answer = question.correct_answer_text();
                let is_correct = answers_match(question.kind(), &user_answer, &correct_answer);
                ResultRecord {
                    question_number: i + 1,
                    question: question.question().to_string(),
                    kind: question.kind(),
                    options: question.options().to_vec(),
                    user_answer,
                    correct_answer,
                    is_correct,
                    explanation: question
                        .explanation()
                        .unwrap_or(NO_EXPLANATION)
                        .to_string(),
                }
            })
            .collect();

        let summary = self.score();
        tracing::info!(
            session = %self.id,
            "graded quiz: {}/{} correct",
            summary.correct,
            summary.total
        );
        Ok(&self.results)
    }

    /// Graded results; empty until the session is graded.
    pub fn export(&self) -> &[ResultRecord] {
        &self.results
    }

    pub fn score(&self) -> ScoreSummary {
        ScoreSummary::from_results(&self.results)
    }

    /// Write the results to `<dir>/<prefix>_<YYYYMMDD_HHMMSS>.csv`.
    pub fn persist(&self, dir: &Path, prefix: &str) -> Result<PathBuf, SessionError> {
        if self.results.is_empty() {
            return Err(SessionError::NoResults);
        }
        let path = dir.join(results_filename(prefix, &Local::now()));
        write_csv_file(&self.results, &path)?;
        tracing::info!(path = %path.display(), "saved quiz results");
        Ok(path)
    }

    /// Save the whole session as JSON.
    pub fn save_json(&self, path: &Path) -> Result<(), SessionError> {
        let json = serde_json::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load a session saved with [`save_json`](Self::save_json).
    pub fn load_json(path: &Path) -> Result<Self, SessionError> {
        let content = std::fs::read_to_string(path)?;
        let session: QuizSession = serde_json::from_str(&content)?;
        session.check_consistency()?;
        Ok(session)
    }

    fn check_consistency(&self) -> Result<(), SessionError> {
        let n = self.questions.len();
        if !self.answers.is_empty() && self.answers.len() != n {
            return Err(SessionError::Inconsistent(format!(
                "{} answers for {n} questions",
                self.answers.len()
            )));
        }
        if !self.results.is_empty() && (self.results.len() != n || self.answers.len() != n) {
            return Err(SessionError::Inconsistent(format!(
                "{} results for {n} questions and {} answers",
                self.results.len(),
                self.answers.len()
            )));
        }
        Ok(())
    }
}
