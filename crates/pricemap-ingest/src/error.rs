//! Error types for reading and writing tabular files.

use thiserror::Error;

/// Errors that can occur while parsing or serializing a table.
#[derive(Debug, Error)]
pub enum IngestError {
    // === Container Errors ===
    /// File extension is not a supported spreadsheet or CSV type.
    #[error("unsupported file type: .{extension}")]
    UnsupportedFormat { extension: String },

    /// The spreadsheet reader rejected the bytes.
    #[error("failed to open workbook: {message}")]
    Workbook { message: String },

    /// The workbook has no worksheet to read.
    #[error("workbook has no worksheets")]
    NoWorksheet,

    /// The input holds no rows at all.
    #[error("input is empty")]
    EmptyInput,

    // === CSV Errors ===
    /// UTF-16 input is detected from its BOM and rejected up front.
    #[error("unsupported encoding: {encoding}")]
    UnsupportedEncoding { encoding: &'static str },

    /// None of the configured encodings produced a parseable CSV.
    #[error("could not decode CSV with any of: {}", tried.join(", "))]
    Undecodable { tried: Vec<String> },

    // === Output Errors ===
    /// Serializing the workbook failed.
    #[error("failed to write workbook: {message}")]
    WriteWorkbook { message: String },

    /// Serializing CSV failed.
    #[error("failed to write CSV: {source}")]
    WriteCsv {
        #[source]
        source: csv::Error,
    },

    /// A cell edit points outside the sheet coordinate space.
    #[error("cell ({row}, {column}) is out of range")]
    CellOutOfRange { row: u32, column: u32 },
}

impl IngestError {
    /// True for errors caused by the input bytes themselves.
    pub fn is_unreadable(&self) -> bool {
        matches!(
            self,
            IngestError::UnsupportedFormat { .. }
                | IngestError::Workbook { .. }
                | IngestError::NoWorksheet
                | IngestError::EmptyInput
                | IngestError::UnsupportedEncoding { .. }
                | IngestError::Undecodable { .. }
        )
    }
}

impl From<calamine::Error> for IngestError {
    fn from(err: calamine::Error) -> Self {
        Self::Workbook {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::Undecodable {
            tried: vec!["UTF-8".into(), "windows-1251".into()],
        };
        assert_eq!(
            err.to_string(),
            "could not decode CSV with any of: UTF-8, windows-1251"
        );
        let err = IngestError::UnsupportedFormat {
            extension: "pdf".into(),
        };
        assert_eq!(err.to_string(), "unsupported file type: .pdf");
    }

    #[test]
    fn test_unreadable_classification() {
        assert!(IngestError::NoWorksheet.is_unreadable());
        assert!(
            !IngestError::WriteWorkbook {
                message: "disk".into()
            }
            .is_unreadable()
        );
    }
}
