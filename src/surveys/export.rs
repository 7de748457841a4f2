use super::domain::NO_ANSWER;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::io::Write;

const FIXED_COLUMNS: [&str; 5] = [
    "Survey Title",
    "Department",
    "Employee Name",
    "Submission Date",
    "Submission Time",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question: String,
    #[serde(default)]
    pub answer: Option<String>,
}

impl SubmittedAnswer {
    pub fn answered(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: Some(answer.into()),
        }
    }

    pub fn unanswered(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: None,
        }
    }
}

/// One employee submission as held by the survey store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub survey_title: String,
    #[serde(default)]
    pub department: Option<String>,
    pub employee_name: String,
    pub submitted_at: NaiveDateTime,
    pub answers: Vec<SubmittedAnswer>,
}

/// Writes one row per submission. Every row is padded to the widest
/// submission so the `Question N` / `Answer N` columns line up.
pub fn write_submissions<W: Write>(
    writer: W,
    submissions: &[SubmissionRecord],
) -> Result<(), csv::Error> {
    let question_columns = submissions
        .iter()
        .map(|submission| submission.answers.len())
        .max()
        .unwrap_or(0);

    let mut csv_writer = csv::Writer::from_writer(writer);

    let mut header: Vec<String> = FIXED_COLUMNS.iter().map(|column| column.to_string()).collect();
    for number in 1..=question_columns {
        header.push(format!("Question {number}"));
        header.push(format!("Answer {number}"));
    }
    csv_writer.write_record(&header)?;

    for submission in submissions {
        let mut record = vec![
            submission.survey_title.clone(),
            submission.department.clone().unwrap_or_default(),
            submission.employee_name.clone(),
            submission.submitted_at.format("%Y-%m-%d").to_string(),
            submission.submitted_at.format("%H:%M:%S").to_string(),
        ];
        for answer in &submission.answers {
            record.push(answer.question.clone());
            record.push(
                answer
                    .answer
                    .clone()
                    .filter(|value| !value.trim().is_empty())
                    .unwrap_or_else(|| NO_ANSWER.to_string()),
            );
        }
        record.resize(FIXED_COLUMNS.len() + question_columns * 2, String::new());
        csv_writer.write_record(&record)?;
    }

    csv_writer.flush()?;
    Ok(())
}
