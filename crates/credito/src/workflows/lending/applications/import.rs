use std::io::Read;
use std::path::Path;

use super::domain::ApplicantSubmission;

/// Errors raised while reading an applicant batch export.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("failed to read applicant export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid applicant CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Reads applicant submissions from CSV exports whose headers use the wire field names.
///
/// Cells are trimmed and empty cells become absent fields, so a batch row with a
/// blank column is reported by intake like a request body missing that key.
pub struct ApplicantCsvImporter;

/// One CSV row: the parsed submission, or why that row could not be read.
pub type ImportedRow = Result<ApplicantSubmission, ImportError>;

impl ApplicantCsvImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ApplicantSubmission>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Strict import: the first malformed row fails the whole export.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<ApplicantSubmission>, ImportError> {
        Self::rows_from_reader(reader)?.into_iter().collect()
    }

    pub fn rows_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<ImportedRow>, ImportError> {
        let file = std::fs::File::open(path)?;
        Self::rows_from_reader(file)
    }

    /// Lenient import: only an unreadable header fails; each data row keeps its own error.
    pub fn rows_from_reader<R: Read>(reader: R) -> Result<Vec<ImportedRow>, ImportError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        csv_reader.headers()?;

        Ok(csv_reader
            .deserialize::<ApplicantSubmission>()
            .map(|record| record.map_err(ImportError::from))
            .collect())
    }
}
