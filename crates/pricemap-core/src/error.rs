//! Failure folding for every pipeline.

use pricemap_ingest::IngestError;
use pricemap_map::MapError;
use pricemap_model::{Failure, FailureKind};
use pricemap_report::RewriteError;
use pricemap_transform::ProjectionError;
use thiserror::Error;

/// Anything that can stop a file from being processed.
#[derive(Debug, Error)]
pub enum ProcessingError {
    /// The input could not be read.
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Projection(#[from] ProjectionError),

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error("no supplier schema matches '{key}'")]
    UnknownSchema { key: String },

    /// Producing the output bytes failed.
    #[error("failed to produce output: {source}")]
    Output {
        #[source]
        source: IngestError,
    },
}

impl ProcessingError {
    pub(crate) fn output(source: IngestError) -> Self {
        Self::Output { source }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            ProcessingError::Ingest(err) if err.is_unreadable() => FailureKind::UnreadableInput,
            ProcessingError::Ingest(_) | ProcessingError::Output { .. } => FailureKind::Transient,
            ProcessingError::Map(MapError::UninterpretableColumns { .. }) => {
                FailureKind::UninterpretableColumn
            }
            ProcessingError::Map(
                MapError::AmbiguousRole { .. }
                | MapError::ConfirmationRejected
                | MapError::RemapOutOfRange { .. },
            ) => FailureKind::AmbiguousRoleUnresolved,
            ProcessingError::Projection(ProjectionError::MissingRequiredRoles { .. })
            | ProcessingError::Rewrite(_) => FailureKind::MissingRequiredColumn,
            ProcessingError::Projection(ProjectionError::DuplicateAssignment { .. }) => {
                FailureKind::AmbiguousRoleUnresolved
            }
            ProcessingError::UnknownSchema { .. } => FailureKind::UnknownSchema,
        }
    }

    /// Report form of the error, carrying the columns or names involved.
    pub fn to_failure(&self) -> Failure {
        let failure = Failure::new(self.kind(), self.to_string());
        match self {
            ProcessingError::Map(MapError::UninterpretableColumns { indices }) => {
                failure.with_columns(indices.clone())
            }
            ProcessingError::Map(MapError::AmbiguousRole { columns, .. }) => {
                failure.with_columns(columns.clone())
            }
            ProcessingError::Projection(ProjectionError::MissingRequiredRoles { roles }) => {
                failure.with_missing(roles.iter().map(ToString::to_string).collect())
            }
            ProcessingError::Rewrite(RewriteError::MissingColumns { columns }) => {
                failure.with_missing(columns.clone())
            }
            _ => failure,
        }
    }
}

pub type Result<T> = std::result::Result<T, ProcessingError>;
