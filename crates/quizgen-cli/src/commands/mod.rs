pub mod generate;
pub mod grade;
pub mod init;
pub mod list_models;
pub mod take;
pub mod validate;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use quizgen_core::error::AttemptError;
use quizgen_core::generator::{ProgressReporter, QuestionGenerator};
use quizgen_core::model::{Question, QuestionKind};
use quizgen_core::session::QuizSession;
use quizgen_providers::config::{load_config_from, QuizgenConfig};
use quizgen_providers::create_provider;
use quizgen_report::html::write_html_report;

use crate::QuizArgs;

/// Console progress reporter.
pub struct ConsoleReporter;

impl ProgressReporter for ConsoleReporter {
    fn on_attempt_start(&self, kind: QuestionKind, attempt: u32, max_attempts: u32) {
        if attempt > 1 {
            eprintln!("  Retrying {kind} question (attempt {attempt}/{max_attempts})");
        }
    }

    fn on_attempt_failed(&self, kind: QuestionKind, attempt: u32, error: &AttemptError) {
        eprintln!("  Attempt {attempt} for {kind} question failed: {error}");
    }

    fn on_question_ready(&self, index: usize, total: usize, _question: &Question) {
        eprintln!("  Generated question {}/{total}", index + 1);
    }
}

/// Load config and build a generator for the provider/model the user asked for.
pub fn build_generator(
    quiz: &QuizArgs,
    config_path: Option<&Path>,
) -> Result<(QuizgenConfig, QuestionGenerator)> {
    let config = load_config_from(config_path)?;
    let (name, provider_config) = config.provider(quiz.provider.as_deref())?;
    let provider = create_provider(name, provider_config)?;

    let mut generator_config = config.generator_config();
    if let Some(model) = &quiz.model {
        generator_config.model = model.clone();
    }

    tracing::debug!(provider = name, model = %generator_config.model, "using provider");
    let generator = QuestionGenerator::new(Arc::from(provider), generator_config);
    Ok((config, generator))
}

/// Generate a fresh session from the command-line request.
pub async fn generate_session(
    quiz: &QuizArgs,
    generator: &QuestionGenerator,
) -> Result<QuizSession> {
    let request = quiz.request()?;
    eprintln!(
        "Generating {} {} question(s) on '{}' ({}, {})",
        quiz.count, quiz.question_type, request.topic, request.difficulty, request.exam_type
    );

    let mut session = QuizSession::new();
    session
        .generate(
            generator,
            &request,
            quiz.question_type,
            quiz.count,
            &ConsoleReporter,
        )
        .await?;
    Ok(session)
}

/// Print a graded session's summary table and performance message.
pub fn print_summary(session: &QuizSession) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Type", "Your answer", "Correct answer", "Result"]);

    for r in session.export() {
        table.add_row(vec![
            Cell::new(r.question_number),
            Cell::new(r.kind),
            Cell::new(&r.user_answer),
            Cell::new(&r.correct_answer),
            Cell::new(if r.is_correct { "Correct" } else { "Incorrect" }),
        ]);
    }

    let score = session.score();
    println!("\n{table}");
    println!(
        "Score: {}/{} ({:.1}%)",
        score.correct, score.total, score.percentage
    );
    println!("{}", score.performance().message());

    for r in session.export() {
        let verdict = if r.is_correct { "correct" } else { "incorrect" };
        println!("\nQuestion {} ({verdict}): {}", r.question_number, r.question);
        println!("  Your answer:    {}", r.user_answer);
        println!("  Correct answer: {}", r.correct_answer);
        println!("  Explanation:    {}", r.explanation);
    }
}

/// Write the graded session in each requested format.
pub fn save_results(
    session: &QuizSession,
    config: &QuizgenConfig,
    output: Option<PathBuf>,
    format: &str,
) -> Result<()> {
    let output = output.unwrap_or_else(|| config.output_dir.clone());

    for fmt in format.split(',').map(str::trim) {
        match fmt {
            "csv" => {
                let path = session.persist(&output, &config.results_prefix)?;
                eprintln!("Results saved to: {}", path.display());
            }
            "html" => {
                let path = output.join(format!("{}_{}.html", config.results_prefix, session.id()));
                write_html_report(session, &path)?;
                eprintln!("HTML report: {}", path.display());
            }
            _ => {
                eprintln!("Unknown format: {fmt}");
            }
        }
    }

    Ok(())
}

/// Print questions as the user will see them.
pub fn print_question(number: usize, question: &Question) {
    println!("\nQuestion {number} ({}):", question.kind());
    println!("{}", question.question());
    for (i, option) in question.options().iter().enumerate() {
        println!("  {}. {option}", i + 1);
    }
}
