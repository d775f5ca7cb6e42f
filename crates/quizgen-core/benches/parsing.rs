use criterion::{black_box, criterion_group, criterion_main, Criterion};

use quizgen_core::model::QuestionKind;
use quizgen_core::parser::parse_question;
use quizgen_core::traits::extract_json_block;

const RAW_MCQ: &str = r#"{
  "question": "Which TCP phase doubles cwnd every RTT?",
  "options": ["Slow start", "Congestion avoidance", "Fast recovery", "Fast retransmit"],
  "correct_answer": "Slow start",
  "explanation": "cwnd grows exponentially during slow start."
}"#;

fn bench_extract_json(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_json");

    let fenced = format!("Here is your question:\n\n```json\n{RAW_MCQ}\n```\n\nGood luck!");
    let prose = format!("Sure, here it is: {RAW_MCQ} Let me know if you need more.");

    let many_blocks = {
        let mut s = String::new();
        for i in 0..50 {
            s.push_str(&format!("\n```python\nprint({i})\n```\n"));
        }
        s.push_str(&format!("\n```json\n{RAW_MCQ}\n```\n"));
        s
    };

    group.bench_function("raw", |b| b.iter(|| extract_json_block(black_box(RAW_MCQ))));

    group.bench_function("fenced", |b| {
        b.iter(|| extract_json_block(black_box(&fenced)))
    });

    group.bench_function("prose", |b| b.iter(|| extract_json_block(black_box(&prose))));

    group.bench_function("50_blocks", |b| {
        b.iter(|| extract_json_block(black_box(&many_blocks)))
    });

    group.finish();
}

fn bench_parse_question(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_question");

    let nested = r#"{
  "question": {"description": "Light travels faster in glass than in air."},
  "answer": false,
  "explanation": "Glass has a higher refractive index."
}"#;

    group.bench_function("mcq", |b| {
        b.iter(|| parse_question(QuestionKind::Mcq, black_box(RAW_MCQ)))
    });

    group.bench_function("true_false_nested", |b| {
        b.iter(|| parse_question(QuestionKind::TrueFalse, black_box(nested)))
    });

    group.bench_function("malformed", |b| {
        b.iter(|| parse_question(QuestionKind::Mcq, black_box("{\"question\": ")))
    });

    group.finish();
}

criterion_group!(benches, bench_extract_json, bench_parse_question);
criterion_main!(benches);
