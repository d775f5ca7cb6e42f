//! Prompt templates, one per question kind.
//!
//! Templates use `{subject}`, `{topic}`, `{difficulty}` and `{exam_type}`
//! placeholders. Each asks for a single JSON object with the exact field set
//! the parser accepts and shows one example.

use crate::model::{QuestionKind, QuestionRequest};

const MCQ_TEMPLATE: &str = r#"Write one {difficulty} multiple-choice question on the topic '{topic}' from the subject '{subject}', in the style of the {exam_type} exam.

Reply with ONLY a JSON object containing exactly these fields:
- "question": the question text
- "options": an array of exactly 4 distinct options
- "correct_answer": the correct option, copied exactly from "options"
- "explanation": a short justification of the correct answer

Example:
{
  "question": "Which law explains the conservation of momentum?",
  "options": ["Newton's First Law", "Newton's Second Law", "Newton's Third Law", "Law of Gravitation"],
  "correct_answer": "Newton's Third Law",
  "explanation": "Equal and opposite forces produce equal and opposite changes in momentum."
}

Your response:"#;

const FILL_BLANK_TEMPLATE: &str = r#"Write one {difficulty} fill-in-the-blank question on the topic '{topic}' from the subject '{subject}', in the style of the {exam_type} exam.

Reply with ONLY a JSON object containing exactly these fields:
- "question": a sentence that uses "_____" where the missing word or phrase goes
- "answer": the word or phrase that fills the blank
- "explanation": a short justification of the answer

Example:
{
  "question": "Ohm's law states that V = _____ * I.",
  "answer": "R",
  "explanation": "Voltage equals current times resistance."
}

Your response:"#;

const NUMERIC_TEMPLATE: &str = r#"Write one {difficulty} numerical problem on the topic '{topic}' from the subject '{subject}', in the style of the {exam_type} exam.

Reply with ONLY a JSON object containing exactly these fields:
- "question": the problem statement
- "answer": the numeric result as a JSON number
- "explanation": the calculation that leads to the result

Example:
{
  "question": "Calculate the resistance if V = 10 V and I = 2 A.",
  "answer": 5,
  "explanation": "R = V / I = 10 / 2 = 5 ohms."
}

Your response:"#;

const TRUE_FALSE_TEMPLATE: &str = r#"Write one {difficulty} true/false statement on the topic '{topic}' from the subject '{subject}', relevant to the {exam_type} exam.

Reply with ONLY a JSON object containing exactly these fields:
- "question": a factual or conceptual statement
- "answer": true or false, as a JSON boolean
- "explanation": why the statement is true or false

Example:
{
  "question": "In a vacuum, all objects fall at the same rate.",
  "answer": true,
  "explanation": "Without air resistance only gravity acts, and it accelerates every mass equally."
}

Your response:"#;

/// The raw template for a question kind.
pub fn template(kind: QuestionKind) -> &'static str {
    match kind {
        QuestionKind::Mcq => MCQ_TEMPLATE,
        QuestionKind::FillBlank => FILL_BLANK_TEMPLATE,
        QuestionKind::Numeric => NUMERIC_TEMPLATE,
        QuestionKind::TrueFalse => TRUE_FALSE_TEMPLATE,
    }
}

/// Substitute the request into the template for `kind`.
///
/// Placeholders are replaced in a single pass over the template, so request
/// text that itself looks like `{topic}` reaches the model unchanged. Braces
/// that do not name a placeholder (the JSON examples) are copied as-is.
pub fn render_prompt(kind: QuestionKind, request: &QuestionRequest) -> String {
    let template = template(kind);
    let difficulty = request.difficulty.to_string();
    let mut out = String::with_capacity(template.len() + 64);

    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let value = after.find('}').and_then(|close| {
            let value = match &after[..close] {
                "subject" => request.subject.as_str(),
                "topic" => request.topic.as_str(),
                "difficulty" => difficulty.as_str(),
                "exam_type" => request.exam_type.as_str(),
                _ => return None,
            };
            Some((value, close))
        });
        match value {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
