pub mod analysis;
pub mod classifier;
pub mod domain;
pub mod export;
pub mod import;
pub mod report;
pub mod scoring;

pub use analysis::{
    aggregate, aggregate_with, analyze, AnalysisBuilder, DepartmentStats, OverviewStats,
    QuestionAnalysis, SatisfactionTally, SurveyAnalysis,
};
pub use classifier::classify;
pub use domain::{
    AnalysisError, AnswerPair, CategoryPolicy, PartialDataWarning, QuestionCategory,
    ResponseRow, SatisfactionLabel, NO_ANSWER, UNKNOWN_DEPARTMENT,
};
pub use export::{write_submissions, SubmissionRecord, SubmittedAnswer};
pub use import::{SurveyImportError, SurveyResponseImporter};
pub use report::{parse_overview, render, render_document, RenderError, ReportMetadata};
pub use scoring::{score, AnswerScore};
