//! The `quizgen generate` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use super::{build_generator, generate_session, print_question};
use crate::QuizArgs;

pub async fn execute(quiz: QuizArgs, output: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    quiz.request()?;
    let (_config, generator) = build_generator(&quiz, config_path.as_deref())?;

    let session = generate_session(&quiz, &generator).await?;

    for (i, question) in session.questions().iter().enumerate() {
        print_question(i + 1, question);
    }

    session
        .save_json(&output)
        .with_context(|| format!("failed to save quiz to {}", output.display()))?;
    println!("\nQuiz saved to: {}", output.display());
    println!("Take it with: quizgen take --quiz {}", output.display());

    Ok(())
}
