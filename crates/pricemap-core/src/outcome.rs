use pricemap_model::FileReport;

use crate::error::ProcessingError;

/// Output bytes plus the report describing how they were produced.
///
/// On failure `bytes` is the unchanged input and the report carries the
/// typed failure.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessOutcome {
    pub bytes: Vec<u8>,
    pub report: FileReport,
}

impl ProcessOutcome {
    pub fn success(&self) -> bool {
        self.report.success()
    }

    /// Name to store the bytes under: the new name on success, the input
    /// name otherwise.
    pub fn file_name(&self) -> &str {
        self.report
            .output_file_name
            .as_deref()
            .unwrap_or(&self.report.file_name)
    }

    pub(crate) fn settle(
        input: &[u8],
        mut report: FileReport,
        result: Result<Vec<u8>, ProcessingError>,
    ) -> Self {
        match result {
            Ok(bytes) => Self { bytes, report },
            Err(error) => {
                let failure = error.to_failure();
                tracing::warn!(
                    file = report.file_name.as_str(),
                    kind = %failure.kind,
                    error = %error,
                    "processing failed, passing input through"
                );
                report.fail(failure);
                Self {
                    bytes: input.to_vec(),
                    report,
                }
            }
        }
    }
}
