use serde::{Deserialize, Serialize};
use std::fmt;

/// Label applied to rows whose department is absent or blank.
pub const UNKNOWN_DEPARTMENT: &str = "Unknown Department";

/// Placeholder written by the export for unanswered questions.
pub const NO_ANSWER: &str = "No answer";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerPair {
    pub question: String,
    pub answer: String,
}

impl AnswerPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// One survey submission. Position `i` in `answers` is question number `i + 1`;
/// `None` marks an index whose question/answer pairing could not be read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseRow {
    pub department: Option<String>,
    pub answers: Vec<Option<AnswerPair>>,
}

impl ResponseRow {
    pub fn new(department: impl Into<String>) -> Self {
        Self {
            department: Some(department.into()),
            answers: Vec::new(),
        }
    }

    pub fn without_department() -> Self {
        Self::default()
    }

    pub fn with_answer(mut self, question: impl Into<String>, answer: impl Into<String>) -> Self {
        self.answers.push(Some(AnswerPair::new(question, answer)));
        self
    }

    pub fn with_missing_answer(mut self) -> Self {
        self.answers.push(None);
        self
    }

    /// Department exactly as submitted; no case or whitespace folding.
    pub fn department_label(&self) -> &str {
        match self.department.as_deref() {
            Some(value) if !value.trim().is_empty() => value,
            _ => UNKNOWN_DEPARTMENT,
        }
    }

    /// Yields `(question_number, pair)` with question numbers starting at 1.
    pub fn entries(&self) -> impl Iterator<Item = (usize, Option<&AnswerPair>)> {
        self.answers
            .iter()
            .enumerate()
            .map(|(index, pair)| (index + 1, pair.as_ref()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    StarRating,
    Checkbox,
    Mcq,
    Text,
}

impl QuestionCategory {
    pub const fn label(self) -> &'static str {
        match self {
            Self::StarRating => "Star Rating",
            Self::Checkbox => "Checkbox",
            Self::Mcq => "MCQ",
            Self::Text => "Text",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SatisfactionLabel {
    VerySatisfied,
    Satisfied,
    Neutral,
    Dissatisfied,
    VeryDissatisfied,
}

impl SatisfactionLabel {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::VerySatisfied,
            Self::Satisfied,
            Self::Neutral,
            Self::Dissatisfied,
            Self::VeryDissatisfied,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::VerySatisfied => "Very Satisfied",
            Self::Satisfied => "Satisfied",
            Self::Neutral => "Neutral",
            Self::Dissatisfied => "Dissatisfied",
            Self::VeryDissatisfied => "Very Dissatisfied",
        }
    }

    /// Fixed 0-100 table value for the label.
    pub const fn table_value(self) -> u8 {
        match self {
            Self::VerySatisfied => 100,
            Self::Satisfied => 75,
            Self::Neutral => 50,
            Self::Dissatisfied => 25,
            Self::VeryDissatisfied => 0,
        }
    }

    /// Exact (case-sensitive) match against the trimmed text.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|label| label.label() == trimmed)
    }
}

/// How a question's category is settled while answers stream in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryPolicy {
    /// The first answer other than the "No answer" placeholder fixes the
    /// category; later answers are tallied and scored under it.
    #[default]
    FirstAnswer,
    /// Every answer re-derives the category and overwrites the stored one.
    EveryAnswer,
}

impl CategoryPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "first-answer" | "first_answer" | "first" => Some(Self::FirstAnswer),
            "every-answer" | "every_answer" | "every" => Some(Self::EveryAnswer),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::FirstAnswer => "first-answer",
            Self::EveryAnswer => "every-answer",
        }
    }
}

/// A row field that was skipped during aggregation. Never aborts a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartialDataWarning {
    pub row: usize,
    pub department: String,
    pub question_number: usize,
}

impl fmt::Display for PartialDataWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "row {} ({}) has no question/answer pair for question {}",
            self.row, self.department, self.question_number
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("no survey responses to analyze")]
    NoResponses,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_label_falls_back_for_missing_and_blank_values() {
        assert_eq!(
            ResponseRow::without_department().department_label(),
            UNKNOWN_DEPARTMENT
        );
        assert_eq!(ResponseRow::new("   ").department_label(), UNKNOWN_DEPARTMENT);
        assert_eq!(ResponseRow::new("sales").department_label(), "sales");
    }

    #[test]
    fn entries_number_questions_from_one() {
        let row = ResponseRow::new("Sales")
            .with_answer("Q1", "Satisfied")
            .with_missing_answer()
            .with_answer("Q3", "4 stars");
        let numbers: Vec<(usize, bool)> = row
            .entries()
            .map(|(number, pair)| (number, pair.is_some()))
            .collect();
        assert_eq!(numbers, vec![(1, true), (2, false), (3, true)]);
    }

    #[test]
    fn satisfaction_labels_match_exactly_after_trimming() {
        assert_eq!(
            SatisfactionLabel::parse("  Very Satisfied "),
            Some(SatisfactionLabel::VerySatisfied)
        );
        assert_eq!(SatisfactionLabel::parse("very satisfied"), None);
        assert_eq!(SatisfactionLabel::parse("Satisfied!"), None);
    }

    #[test]
    fn category_policy_parses_known_spellings() {
        assert_eq!(
            CategoryPolicy::parse("First-Answer"),
            Some(CategoryPolicy::FirstAnswer)
        );
        assert_eq!(
            CategoryPolicy::parse("every_answer"),
            Some(CategoryPolicy::EveryAnswer)
        );
        assert_eq!(CategoryPolicy::parse("whenever"), None);
    }
}
