//! The `quizgen grade` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgen_core::parser::load_answers;
use quizgen_core::session::QuizSession;
use quizgen_providers::config::load_config_from;

use super::{print_summary, save_results};

pub fn execute(
    quiz_path: PathBuf,
    answers_path: PathBuf,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let mut session = QuizSession::load_json(&quiz_path)
        .with_context(|| format!("failed to load quiz: {}", quiz_path.display()))?;
    let answers = load_answers(&answers_path)?;

    session.record_answers(answers)?;
    session.grade()?;

    print_summary(&session);
    save_results(&session, &config, output, &format)
}
