//! The `quizgen validate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgen_core::session::QuizSession;

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let session = QuizSession::load_json(&quiz_path)
        .with_context(|| format!("failed to load quiz: {}", quiz_path.display()))?;

    println!(
        "Quiz: {} ({} questions, {})",
        quiz_path.display(),
        session.questions().len(),
        session.state()
    );

    let mut invalid = 0;
    for (i, question) in session.questions().iter().enumerate() {
        if let Err(e) = question.validate() {
            println!("  [{}] INVALID: {e}", i + 1);
            invalid += 1;
        }
    }

    if invalid > 0 {
        anyhow::bail!("{invalid} invalid question(s) found");
    }
    println!("All questions valid.");
    Ok(())
}
