use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// Named columns the report must have.
    #[error("missing required columns: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    /// Rewriting needs a header row to find columns by name.
    #[error("the sheet has no header row")]
    NoHeader,
}

pub type Result<T> = std::result::Result<T, RewriteError>;
