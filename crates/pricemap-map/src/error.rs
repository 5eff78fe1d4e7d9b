//! Error types for column inference.

use pricemap_model::Role;
use thiserror::Error;

/// Raised by the content classifier for a single column.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    /// The column has values but none of them fit any routed role.
    #[error("column {index} matches no known role")]
    Uninterpretable { index: usize },
}

/// Errors that stop inference for a whole file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    // === Classification ===
    /// Columns with values and no evidence for any role (strict mode only).
    #[error("uninterpretable columns: {}", join_indices(indices))]
    UninterpretableColumns { indices: Vec<usize> },

    // === Resolution ===
    /// Several columns claim a role and the resolver policy will not pick one.
    #[error("role {role} is claimed by columns {}", join_indices(columns))]
    AmbiguousRole { role: Role, columns: Vec<usize> },

    /// The confirmation hook rejected the proposed assignment.
    #[error("column assignment was rejected during confirmation")]
    ConfirmationRejected,

    /// A remap pointed at a column the table does not have.
    #[error("remap refers to column {index}, but the table has {width} columns")]
    RemapOutOfRange { index: usize, width: usize },
}

fn join_indices(indices: &[usize]) -> String {
    indices
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result type for inference.
pub type Result<T> = std::result::Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MapError::AmbiguousRole {
            role: Role::Price,
            columns: vec![2, 5],
        };
        assert_eq!(err.to_string(), "role price is claimed by columns 2, 5");
        let err = ClassificationError::Uninterpretable { index: 3 };
        assert_eq!(err.to_string(), "column 3 matches no known role");
    }
}
