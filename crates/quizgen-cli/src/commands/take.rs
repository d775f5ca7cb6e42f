//! The `quizgen take` command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizgen_core::model::{Question, UserAnswer};
use quizgen_core::session::QuizSession;
use quizgen_providers::config::load_config_from;

use super::{build_generator, generate_session, print_question, print_summary, save_results};
use crate::QuizArgs;

pub async fn execute(
    quiz_file: Option<PathBuf>,
    quiz: QuizArgs,
    output: Option<PathBuf>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, mut session) = match quiz_file {
        Some(path) => {
            let config = load_config_from(config_path.as_deref())?;
            let session = QuizSession::load_json(&path)
                .with_context(|| format!("failed to load quiz: {}", path.display()))?;
            (config, session)
        }
        None => {
            quiz.request()?;
            let (config, generator) = build_generator(&quiz, config_path.as_deref())?;
            let session = generate_session(&quiz, &generator).await?;
            (config, session)
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut stdout = io::stdout();

    let mut answers = Vec::with_capacity(session.questions().len());
    for (i, question) in session.questions().iter().enumerate() {
        print_question(i + 1, question);
        answers.push(prompt_answer(question, &mut input, &mut stdout)?);
    }

    session.record_answers(answers)?;
    session.grade()?;

    print_summary(&session);
    save_results(&session, &config, output, &format)
}

/// Read lines until one is a usable answer for `question`.
fn prompt_answer<R: BufRead, W: Write>(
    question: &Question,
    input: &mut R,
    out: &mut W,
) -> Result<UserAnswer> {
    loop {
        write!(out, "{}", hint(question))?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            anyhow::bail!("input ended before all questions were answered");
        }

        match interpret_answer(question, &line) {
            Some(answer) => return Ok(answer),
            None if line.trim().is_empty() => writeln!(out, "Please enter an answer.")?,
            None => writeln!(out, "Not a valid answer for this question, try again.")?,
        }
    }
}

fn hint(question: &Question) -> &'static str {
    match question {
        Question::Mcq(_) => "Your answer (1-4 or option text): ",
        Question::TrueFalse(_) => "True or false? ",
        Question::FillBlank(_) | Question::Numeric(_) => "Your answer: ",
    }
}

/// Map raw input to an answer, or `None` if the input cannot answer this
/// question.
///
/// MCQ input may be the option number or the option text (any case); the
/// stored answer is always the option text. True/false accepts
/// `true/false/t/f/yes/no`.
fn interpret_answer(question: &Question, raw: &str) -> Option<UserAnswer> {
    let input = raw.trim();
    if input.is_empty() {
        return None;
    }

    match question {
        Question::Mcq(mcq) => {
            if let Ok(n) = input.parse::<usize>() {
                return n
                    .checked_sub(1)
                    .and_then(|i| mcq.options.get(i))
                    .map(|o| UserAnswer::from(o.as_str()));
            }
            mcq.options
                .iter()
                .find(|o| o.trim().eq_ignore_ascii_case(input))
                .map(|o| UserAnswer::from(o.as_str()))
        }
        Question::TrueFalse(_) => match input.to_lowercase().as_str() {
            "true" | "t" | "yes" | "y" => Some(UserAnswer::from(true)),
            "false" | "f" | "no" | "n" => Some(UserAnswer::from(false)),
            _ => None,
        },
        Question::FillBlank(_) | Question::Numeric(_) => Some(UserAnswer::from(input)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizgen_core::model::{FillBlankQuestion, McqQuestion, TrueFalseQuestion};

    fn mcq() -> Question {
        McqQuestion {
            question: "Which layer does IP belong to?".into(),
            options: vec![
                "Physical".into(),
                "Data link".into(),
                "Network".into(),
                "Transport".into(),
            ],
            correct_answer: "Network".into(),
            explanation: None,
        }
        .into()
    }

    fn true_false() -> Question {
        TrueFalseQuestion {
            question: "UDP is connection-oriented.".into(),
            answer: false,
            explanation: None,
        }
        .into()
    }

    #[test]
    fn mcq_by_number_or_text() {
        let q = mcq();
        assert_eq!(interpret_answer(&q, "3\n"), Some(UserAnswer::from("Network")));
        assert_eq!(interpret_answer(&q, " network "), Some(UserAnswer::from("Network")));
        assert_eq!(interpret_answer(&q, "0"), None);
        assert_eq!(interpret_answer(&q, "5"), None);
        assert_eq!(interpret_answer(&q, "Session"), None);
    }

    #[test]
    fn true_false_aliases() {
        let q = true_false();
        for input in ["true", "T", "yes"] {
            assert_eq!(interpret_answer(&q, input), Some(UserAnswer::from(true)));
        }
        for input in ["False", "f", "NO"] {
            assert_eq!(interpret_answer(&q, input), Some(UserAnswer::from(false)));
        }
        assert_eq!(interpret_answer(&q, "maybe"), None);
    }

    #[test]
    fn free_text_is_trimmed() {
        let q: Question = FillBlankQuestion {
            question: "The ___ protocol resolves IP to MAC.".into(),
            answer: "ARP".into(),
            explanation: None,
        }
        .into();
        assert_eq!(interpret_answer(&q, "  arp \n"), Some(UserAnswer::from("arp")));
    }

    #[test]
    fn empty_answers_are_reprompted() {
        let q = mcq();
        let mut input = io::Cursor::new("\n   \n2\n");
        let mut out = Vec::new();

        let answer = prompt_answer(&q, &mut input, &mut out).unwrap();
        assert_eq!(answer, UserAnswer::from("Data link"));

        let printed = String::from_utf8(out).unwrap();
        assert_eq!(printed.matches("Please enter an answer.").count(), 2);
    }

    #[test]
    fn end_of_input_is_an_error() {
        let q = true_false();
        let mut input = io::Cursor::new("");
        let mut out = Vec::new();
        let err = prompt_answer(&q, &mut input, &mut out).unwrap_err();
        assert!(err.to_string().contains("input ended"));
    }
}
