//! quizgen CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use quizgen_core::model::{Difficulty, QuestionKind, QuestionRequest};

mod commands;

#[derive(Parser)]
#[command(name = "quizgen", version, about = "LLM-backed exam quiz generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// What to generate. Shared by `generate` and `take`.
#[derive(Args, Debug, Clone)]
pub struct QuizArgs {
    /// Subject area (e.g. "Computer Networks")
    #[arg(long)]
    subject: Option<String>,

    /// Topic within the subject
    #[arg(long)]
    topic: Option<String>,

    /// easy, medium or hard
    #[arg(long, default_value = "medium")]
    difficulty: Difficulty,

    /// Exam whose style the questions should follow
    #[arg(long, default_value = "GATE")]
    exam_type: String,

    /// mcq, fill-blank, numeric or true-false
    #[arg(long, default_value = "mcq")]
    question_type: QuestionKind,

    /// Number of questions
    #[arg(long, default_value = "5")]
    count: usize,

    /// Provider name from the config (defaults to `default_provider`)
    #[arg(long)]
    provider: Option<String>,

    /// Model override
    #[arg(long)]
    model: Option<String>,
}

impl QuizArgs {
    pub fn request(&self) -> anyhow::Result<QuestionRequest> {
        let subject = self.subject.as_deref().unwrap_or("").trim();
        let topic = self.topic.as_deref().unwrap_or("").trim();
        anyhow::ensure!(!subject.is_empty(), "--subject must not be empty");
        anyhow::ensure!(!topic.is_empty(), "--topic must not be empty");
        anyhow::ensure!(self.count >= 1, "--count must be at least 1");
        anyhow::ensure!(
            !self.exam_type.trim().is_empty(),
            "--exam-type must not be empty"
        );

        Ok(QuestionRequest::new(subject, topic)
            .with_difficulty(self.difficulty)
            .with_exam_type(self.exam_type.trim()))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz and save it as JSON
    Generate {
        #[command(flatten)]
        quiz: QuizArgs,

        /// Where to save the quiz
        #[arg(long, default_value = "quiz.json")]
        output: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Take a quiz interactively
    Take {
        /// Saved quiz to take instead of generating one
        #[arg(long = "quiz", conflicts_with_all = ["subject", "topic"])]
        quiz_file: Option<PathBuf>,

        #[command(flatten)]
        quiz: QuizArgs,

        /// Output directory for results (defaults to `output_dir` from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: csv, html, or both (comma-separated)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Grade a saved quiz against a TOML answer sheet
    Grade {
        /// Saved quiz JSON
        #[arg(long)]
        quiz: PathBuf,

        /// Answer sheet, e.g. `answers = ["Paris", true, "5"]`
        #[arg(long)]
        answers: PathBuf,

        /// Output directory for results (defaults to `output_dir` from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: csv, html, or both (comma-separated)
        #[arg(long, default_value = "csv")]
        format: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Re-check every question in a saved quiz
    Validate {
        /// Saved quiz JSON
        #[arg(long)]
        quiz: PathBuf,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("quizgen=info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            quiz,
            output,
            config,
        } => commands::generate::execute(quiz, output, config).await,
        Commands::Take {
            quiz_file,
            quiz,
            output,
            format,
            config,
        } => commands::take::execute(quiz_file, quiz, output, format, config).await,
        Commands::Grade {
            quiz,
            answers,
            output,
            format,
            config,
        } => commands::grade::execute(quiz, answers, output, format, config),
        Commands::Validate { quiz } => commands::validate::execute(quiz),
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
