use std::path::PathBuf;

use pricemap_model::FileReport;

/// One processed input file.
#[derive(Debug, Clone)]
pub struct FileRun {
    pub input: PathBuf,
    /// Where the output was written; `None` when the file failed.
    pub output: Option<PathBuf>,
    pub report: FileReport,
}

#[derive(Debug, Clone, Default)]
pub struct RunResult {
    pub files: Vec<FileRun>,
}

impl RunResult {
    pub fn has_failures(&self) -> bool {
        self.files.iter().any(|run| !run.report.success())
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|run| !run.report.success()).count()
    }
}
