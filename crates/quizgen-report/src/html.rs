//! HTML results page.
//!
//! Produces a self-contained HTML file with all CSS/JS inlined.

use anyhow::Result;
use std::path::Path;

use quizgen_core::report::{ResultRecord, ScoreSummary};
use quizgen_core::session::QuizSession;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML results page from a graded session.
///
/// An ungraded session renders with an empty results section.
pub fn generate_html(session: &QuizSession) -> String {
    let topic = session
        .request()
        .map(|r| r.topic.as_str())
        .unwrap_or("Quiz");
    let summary = session.score();

    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str(&format!(
        "<title>quizgen results: {}</title>\n",
        html_escape(topic)
    ));
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Quiz results</h1>\n");
    match session.request() {
        Some(request) => html.push_str(&format!(
            "<p class=\"meta\">{} | <strong>{}</strong> | {} | {} | {}</p>\n",
            html_escape(&request.subject),
            html_escape(&request.topic),
            request.difficulty,
            html_escape(&request.exam_type),
            session.created_at().format("%Y-%m-%d %H:%M:%S UTC")
        )),
        None => html.push_str(&format!(
            "<p class=\"meta\">{}</p>\n",
            session.created_at().format("%Y-%m-%d %H:%M:%S UTC")
        )),
    }
    html.push_str("</header>\n");

    // Summary dashboard
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<h2>Summary</h2>\n");
    html.push_str("<table class=\"summary\">\n");
    html.push_str("<thead><tr><th>Questions</th><th>Correct</th><th>Score</th></tr></thead>\n");
    html.push_str(&format!(
        "<tbody><tr><td>{}</td><td>{}</td><td>{:.1}%</td></tr></tbody></table>\n",
        summary.total, summary.correct, summary.percentage
    ));
    html.push_str(&score_bar(&summary));
    html.push_str(&format!(
        "<p class=\"verdict\">{}</p>\n",
        html_escape(summary.performance().message())
    ));
    html.push_str("</section>\n");

    // Per-question results
    html.push_str("<section class=\"results\">\n");
    html.push_str("<h2>Questions</h2>\n");
    html.push_str("<table class=\"results-table\" id=\"results\">\n");
    html.push_str("<thead><tr><th onclick=\"sortTable(0)\">#</th><th onclick=\"sortTable(1)\">Type</th><th onclick=\"sortTable(2)\">Your answer</th><th onclick=\"sortTable(3)\">Result</th></tr></thead>\n");
    html.push_str("<tbody>\n");
    for r in session.export() {
        let class = result_class(r);
        html.push_str(&format!(
            "<tr class=\"{class}\"><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            r.question_number,
            r.kind,
            html_escape(&r.user_answer),
            if r.is_correct { "Correct" } else { "Incorrect" },
        ));
    }
    html.push_str("</tbody></table>\n");

    for r in session.export() {
        html.push_str(&question_block(r));
    }
    html.push_str("</section>\n");

    // JavaScript for sorting
    html.push_str("<script>\n");
    html.push_str(JS);
    html.push_str("</script>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML results page to a file.
pub fn write_html_report(session: &QuizSession, path: &Path) -> Result<()> {
    let html = generate_html(session);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn result_class(r: &ResultRecord) -> &'static str {
    if r.is_correct {
        "pass"
    } else {
        "fail"
    }
}

fn question_block(r: &ResultRecord) -> String {
    let mut block = String::new();
    block.push_str(&format!("<details class=\"{}\">\n", result_class(r)));
    block.push_str(&format!(
        "<summary>Question {} ({}): {}</summary>\n",
        r.question_number,
        r.kind,
        html_escape(&r.question)
    ));
    if !r.options.is_empty() {
        block.push_str("<ol class=\"options\">\n");
        for option in &r.options {
            block.push_str(&format!("<li>{}</li>\n", html_escape(option)));
        }
        block.push_str("</ol>\n");
    }
    block.push_str(&format!(
        "<p><strong>Your answer:</strong> {}</p>\n<p><strong>Correct answer:</strong> {}</p>\n",
        html_escape(&r.user_answer),
        html_escape(&r.correct_answer)
    ));
    block.push_str(&format!(
        "<p class=\"explanation\">{}</p>\n",
        html_escape(&r.explanation)
    ));
    block.push_str("</details>\n");
    block
}

fn score_bar(summary: &ScoreSummary) -> String {
    let max_width = 400.0;
    let height = 24;
    let filled = (summary.percentage / 100.0 * max_width).round();

    let mut svg = format!(
        "<svg width=\"{}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\" role=\"img\" aria-label=\"score\">\n",
        max_width + 60.0
    );
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{max_width}\" height=\"{height}\" fill=\"#e5e7eb\" rx=\"3\"/>\n"
    ));
    svg.push_str(&format!(
        "<rect x=\"0\" y=\"0\" width=\"{filled}\" height=\"{height}\" fill=\"#22c55e\" rx=\"3\"/>\n"
    ));
    svg.push_str(&format!(
        "<text x=\"{}\" y=\"17\" font-size=\"12\" fill=\"currentColor\">{:.0}%</text>\n",
        max_width + 8.0,
        summary.percentage
    ));
    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --pass: #dcfce7; --fail: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --pass: #064e3b; --fail: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
.verdict { font-weight: bold; }
table { border-collapse: collapse; width: 100%; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); cursor: pointer; }
.pass { background: var(--pass); }
.fail { background: var(--fail); }
details { margin: 1rem 0; padding: 0.5rem 1rem; border-radius: 8px; }
summary { cursor: pointer; font-weight: bold; }
.explanation { font-style: italic; }
svg { margin: 1rem 0; }
"#;

const JS: &str = r#"
function sortTable(col) {
  const table = document.getElementById('results');
  const tbody = table.querySelector('tbody');
  const rows = Array.from(tbody.querySelectorAll('tr'));
  const asc = table.dataset.sortCol == col && table.dataset.sortDir == 'asc' ? false : true;
  rows.sort((a, b) => {
    const va = a.cells[col].textContent;
    const vb = b.cells[col].textContent;
    return asc ? va.localeCompare(vb, undefined, {numeric: true}) : vb.localeCompare(va, undefined, {numeric: true});
  });
  table.dataset.sortCol = col;
  table.dataset.sortDir = asc ? 'asc' : 'desc';
  rows.forEach(r => tbody.appendChild(r));
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use quizgen_core::model::{McqQuestion, NumericQuestion, Question, UserAnswer};

    fn make_graded_session() -> QuizSession {
        let questions: Vec<Question> = vec![
            McqQuestion {
                question: "Which gate is universal?".into(),
                options: vec!["AND".into(), "OR".into(), "NAND".into(), "XOR".into()],
                correct_answer: "NAND".into(),
                explanation: Some("NAND alone can build any boolean function.".into()),
            }
            .into(),
            NumericQuestion {
                question: "How many bits in a byte?".into(),
                answer: 8.0,
                explanation: None,
            }
            .into(),
        ];
        let mut session = QuizSession::from_questions(questions).unwrap();
        session
            .record_answers(vec![UserAnswer::from("NAND"), UserAnswer::from("<script>")])
            .unwrap();
        session.grade().unwrap();
        session
    }

    #[test]
    fn html_report_contains_required_elements() {
        let session = make_graded_session();
        let html = generate_html(&session);

        assert!(html.contains("<html"));
        assert!(html.contains("</html>"));
        assert!(html.contains("Which gate is universal?"));
        assert!(html.contains("<li>NAND</li>"));
        assert!(html.contains("50.0%"));
        assert!(html.contains("Keep practicing!"));
        assert!(html.contains("No explanation provided."));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = generate_html(&make_graded_session());
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<td><script></td>"));
    }

    #[test]
    fn ungraded_session_renders_empty_results() {
        let html = generate_html(&QuizSession::new());
        assert!(html.contains("0.0%"));
        assert!(!html.contains("<details"));
    }

    #[test]
    fn html_report_write_to_file() {
        let session = make_graded_session();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("results.html");

        write_html_report(&session, &path).unwrap();
        assert!(path.exists());

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<html"));
    }
}
