//! The `quizgen init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizgen.toml").exists() {
        println!("quizgen.toml already exists, skipping.");
    } else {
        std::fs::write("quizgen.toml", SAMPLE_CONFIG)?;
        println!("Created quizgen.toml");
    }

    println!("\nNext steps:");
    println!("  1. Export GROQ_API_KEY (or edit quizgen.toml)");
    println!("  2. Run: quizgen generate --subject \"Computer Networks\" --topic \"TCP\" --count 5");
    println!("  3. Run: quizgen take --quiz quiz.json");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizgen configuration

default_provider = "groq"
default_model = "llama-3.1-8b-instant"
temperature = 0.9
max_retries = 3
retry_delay_ms = 0
max_tokens = 1024
output_dir = "./results"
results_prefix = "quiz_results"

[providers.groq]
type = "groq"
api_key = "${GROQ_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"
"#;
