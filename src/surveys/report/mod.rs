//! Renders a [`SurveyAnalysis`] into a paginated plain-text report.
//!
//! Page order is fixed: title, overview, one page per department (questions
//! in ascending number), then the satisfaction distribution chart. Pages are
//! separated by form feeds and rendering is deterministic for identical input.

mod chart;
mod document;

pub use chart::{pie_slices, PieSlice};
pub use document::parse_overview;

use crate::surveys::analysis::SurveyAnalysis;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub title: String,
    pub generated_on: NaiveDate,
}

impl ReportMetadata {
    pub fn new(title: impl Into<String>, generated_on: NaiveDate) -> Self {
        Self {
            title: title.into(),
            generated_on,
        }
    }

    pub fn file_name(&self) -> String {
        format!("survey-report-{}.txt", self.generated_on.format("%Y-%m-%d"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("could not create report directory {}: {source}", .path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not write report {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Document bytes without touching the filesystem.
pub fn render_document(analysis: &SurveyAnalysis, metadata: &ReportMetadata) -> Vec<u8> {
    document::render_pages(analysis, metadata).into_bytes()
}

/// Writes the document under `destination` (created if needed) and returns
/// the file path. An empty analysis still produces a valid document.
pub fn render(
    analysis: &SurveyAnalysis,
    metadata: &ReportMetadata,
    destination: &Path,
) -> Result<PathBuf, RenderError> {
    fs::create_dir_all(destination).map_err(|source| RenderError::CreateDirectory {
        path: destination.to_path_buf(),
        source,
    })?;

    let path = destination.join(metadata.file_name());
    let bytes = render_document(analysis, metadata);
    fs::write(&path, &bytes).map_err(|source| RenderError::Write {
        path: path.clone(),
        source,
    })?;

    info!(
        path = %path.display(),
        bytes = bytes.len(),
        total_responses = analysis.overview.total_responses,
        "survey report written"
    );
    Ok(path)
}
