//! End-to-end session tests driven by the mock provider.
//!
//! These cover generate → answer → grade → persist without any network
//! access, including malformed replies that the generator must retry.

use std::sync::Arc;

use quizgen_core::error::SessionError;
use quizgen_core::generator::{GeneratorConfig, NoopReporter, QuestionGenerator};
use quizgen_core::model::{Difficulty, QuestionKind, QuestionRequest, UserAnswer};
use quizgen_core::session::{QuizSession, SessionState};
use quizgen_providers::MockProvider;

const MCQ_REPLY: &str = r#"Here you go:
```json
{
  "question": "Which algorithm does TCP use to recover from a single lost segment without a timeout?",
  "options": ["Slow start", "Fast retransmit", "Nagle's algorithm", "Go-back-N"],
  "correct_answer": "Fast retransmit",
  "explanation": "Three duplicate ACKs trigger fast retransmit."
}
```"#;

const TF_REPLY: &str =
    r#"{"question": "ARP maps IP addresses to MAC addresses.", "answer": true, "explanation": "ARP resolves link-layer addresses."}"#;

fn request() -> QuestionRequest {
    QuestionRequest::new("Computer Networks", "TCP")
        .with_difficulty(Difficulty::Hard)
        .with_exam_type("GATE")
}

fn generator(provider: Arc<MockProvider>) -> QuestionGenerator {
    QuestionGenerator::new(provider, GeneratorConfig::default())
}

#[tokio::test]
async fn full_session_with_retries() {
    let provider = Arc::new(
        MockProvider::with_sequence(["not json at all", MCQ_REPLY]).failing_first(1),
    );
    let generator = generator(provider.clone());

    let mut session = QuizSession::new();
    session
        .generate(&generator, &request(), QuestionKind::Mcq, 2, &NoopReporter)
        .await
        .unwrap();

    // transport failure, malformed reply, then one good reply per question
    assert_eq!(provider.call_count(), 4);
    assert_eq!(session.state(), SessionState::Generated);
    assert_eq!(session.questions().len(), 2);

    let last = provider.last_request().unwrap();
    assert!(last.prompt.contains("TCP"));
    assert!(last.prompt.contains("hard"));
    assert_eq!(last.model, "llama-3.1-8b-instant");

    session
        .record_answers(vec![
            UserAnswer::from("Fast retransmit"),
            UserAnswer::from("Slow start"),
        ])
        .unwrap();
    let results = session.grade().unwrap();
    assert!(results[0].is_correct);
    assert!(!results[1].is_correct);
    assert_eq!(results[1].options.len(), 4);

    let score = session.score();
    assert_eq!((score.correct, score.total), (1, 2));

    let dir = tempfile::tempdir().unwrap();
    let path = session.persist(dir.path(), "quiz_results").unwrap();
    let csv = std::fs::read_to_string(&path).unwrap();
    assert_eq!(csv.lines().count(), 3);
    assert!(csv.contains("Fast retransmit"));
}

#[tokio::test]
async fn exhausted_retries_leave_session_empty() {
    let provider = Arc::new(MockProvider::with_sequence([TF_REPLY, "{\"question\": 1}"]));
    let generator = generator(provider.clone());

    let mut session = QuizSession::new();
    let err = session
        .generate(&generator, &request(), QuestionKind::TrueFalse, 3, &NoopReporter)
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Generation(ref f) if f.attempts == 3));
    // one good question, then three failed attempts on the second
    assert_eq!(provider.call_count(), 4);
    assert_eq!(session.state(), SessionState::Empty);
    assert!(session.questions().is_empty());
}

#[tokio::test]
async fn saved_session_round_trips_through_json() {
    let provider = Arc::new(MockProvider::with_fixed_response(TF_REPLY));
    let generator = generator(provider);

    let mut session = QuizSession::new();
    session
        .generate(&generator, &request(), QuestionKind::TrueFalse, 2, &NoopReporter)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quiz.json");
    session.save_json(&path).unwrap();

    let mut loaded = QuizSession::load_json(&path).unwrap();
    assert_eq!(loaded.id(), session.id());
    assert_eq!(loaded.request(), Some(&request()));
    assert_eq!(loaded.questions(), session.questions());

    loaded
        .record_answers(vec![UserAnswer::from(true), UserAnswer::from(false)])
        .unwrap();
    loaded.grade().unwrap();
    assert_eq!(loaded.score().correct, 1);

    let html = quizgen_report::generate_html(&loaded);
    assert!(html.contains("ARP maps IP addresses"));
}
