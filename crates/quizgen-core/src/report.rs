//! Graded result records, score summary, and CSV output.

use std::io::Write;
use std::path::Path;

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::model::QuestionKind;

/// Explanation used when the model did not provide one.
pub const NO_EXPLANATION: &str = "No explanation provided.";

/// The graded outcome for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// 1-based position in the quiz.
    pub question_number: usize,
    pub question: String,
    pub kind: QuestionKind,
    /// Options shown to the user (MCQ only).
    #[serde(default)]
    pub options: Vec<String>,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub explanation: String,
}

/// One CSV row. Options are stored as a JSON array so they survive commas.
#[derive(Serialize)]
struct CsvRow<'a> {
    question_number: usize,
    question: &'a str,
    #[serde(rename = "type")]
    kind: String,
    options: String,
    user_answer: &'a str,
    correct_answer: &'a str,
    is_correct: bool,
    explanation: &'a str,
}

impl<'a> CsvRow<'a> {
    fn from_record(record: &'a ResultRecord) -> Result<Self, serde_json::Error> {
        let options = if record.options.is_empty() {
            String::new()
        } else {
            serde_json::to_string(&record.options)?
        };
        Ok(Self {
            question_number: record.question_number,
            question: &record.question,
            kind: record.kind.to_string(),
            options,
            user_answer: &record.user_answer,
            correct_answer: &record.correct_answer,
            is_correct: record.is_correct,
            explanation: &record.explanation,
        })
    }
}

/// Column order of the result file.
pub const CSV_HEADER: [&str; 8] = [
    "question_number",
    "question",
    "type",
    "options",
    "user_answer",
    "correct_answer",
    "is_correct",
    "explanation",
];

/// Write result records as CSV, header first.
pub fn write_csv<W: Write>(records: &[ResultRecord], writer: W) -> Result<(), csv::Error> {
    // Header written by hand so an empty record set still gets one.
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for record in records {
        let row = CsvRow::from_record(record).map_err(std::io::Error::from)?;
        wtr.serialize(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// `<prefix>_<YYYYMMDD_HHMMSS>.csv`
pub fn results_filename<Tz: TimeZone>(prefix: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{prefix}_{}.csv", at.format("%Y%m%d_%H%M%S"))
}

/// Write result records to a CSV file, creating parent directories.
pub fn write_csv_file(records: &[ResultRecord], path: &Path) -> Result<(), csv::Error> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)?;
    write_csv(records, file)
}

/// Score bands shown after grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Performance {
    Excellent,
    Good,
    NeedsPractice,
}

impl Performance {
    pub fn message(&self) -> &'static str {
        match self {
            Performance::Excellent => "Excellent performance! Keep it up!",
            Performance::Good => "Good job! There's room for improvement.",
            Performance::NeedsPractice => "Keep practicing! Review the explanations below.",
        }
    }
}

/// Totals over a graded quiz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub total: usize,
    pub correct: usize,
    /// 0-100; 0 for an empty quiz.
    pub percentage: f64,
}

impl ScoreSummary {
    pub fn from_results(results: &[ResultRecord]) -> Self {
        let total = results.len();
        let correct = results.iter().filter(|r| r.is_correct).count();
        let percentage = if total == 0 {
            0.0
        } else {
            correct as f64 / total as f64 * 100.0
        };
        Self {
            total,
            correct,
            percentage,
        }
    }

    pub fn performance(&self) -> Performance {
        if self.percentage >= 80.0 {
            Performance::Excellent
        } else if self.percentage >= 60.0 {
            Performance::Good
        } else {
            Performance::NeedsPractice
        }
    }
}
