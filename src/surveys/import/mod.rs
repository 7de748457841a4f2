mod normalizer;
mod parser;

use crate::surveys::domain::ResponseRow;
use std::io::Read;
use std::path::Path;
use tracing::debug;

#[derive(Debug, thiserror::Error)]
pub enum SurveyImportError {
    #[error("failed to read survey export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid survey export CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads the tabular submission export (`Department`, `Question N`,
/// `Answer N`, ...) into response rows. Unrelated columns are ignored.
pub struct SurveyResponseImporter;

impl SurveyResponseImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ResponseRow>, SurveyImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ResponseRow>, SurveyImportError> {
        let rows = parser::parse_rows(reader)?;
        debug!(rows = rows.len(), "survey export parsed");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = SurveyResponseImporter::from_path("./does-not-exist.csv")
            .expect_err("expected io error");

        match error {
            SurveyImportError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn importer_reports_malformed_utf8_as_csv_error() {
        let bytes: &[u8] = b"Department,Question 1,Answer 1\nOps,Mood?,\xff\xfe\n";
        let error = SurveyResponseImporter::from_reader(Cursor::new(bytes))
            .expect_err("invalid utf-8 rejected");
        assert!(matches!(error, SurveyImportError::Csv(_)));
    }

    #[test]
    fn importer_reads_header_only_export_as_empty() {
        let rows = SurveyResponseImporter::from_reader(Cursor::new(
            "Survey Title,Department,Employee Name,Submission Date,Submission Time\n",
        ))
        .expect("import succeeds");
        assert!(rows.is_empty());
    }
}
