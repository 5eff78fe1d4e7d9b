//! Dispatching files to a processor.

use pricemap_model::{FileReport, ProcessorKind};
use pricemap_standards::Standards;

use crate::processor::{FileProcessor, ProcessorRegistry};

/// Runs files of one kind through the registered processor.
pub struct ProcessingPipeline<'a> {
    processor: &'a dyn FileProcessor,
    standards: &'a Standards,
}

impl<'a> ProcessingPipeline<'a> {
    /// Builds a pipeline for `kind`, or `None` when the registry has no
    /// processor for it.
    pub fn new(
        registry: &'a ProcessorRegistry,
        kind: ProcessorKind,
        standards: &'a Standards,
    ) -> Option<Self> {
        let processor = registry.get(kind)?;
        Some(Self {
            processor,
            standards,
        })
    }

    pub fn kind(&self) -> ProcessorKind {
        self.processor.kind()
    }

    /// Processes one file.
    ///
    /// The processed bytes and new file name are adopted only on success;
    /// a failed run hands back the input bytes unchanged.
    pub fn run(&self, bytes: &[u8], file_name: &str) -> (Vec<u8>, FileReport) {
        let span = tracing::info_span!("process", processor = %self.kind(), file = file_name);
        let _guard = span.enter();
        let outcome = self.processor.process(bytes, file_name, self.standards);
        if outcome.success() {
            tracing::info!(
                output = outcome.file_name(),
                changed = outcome.report.cells_changed,
                rows = outcome.report.rows_written,
                "file processed"
            );
        }
        (outcome.bytes, outcome.report)
    }
}
