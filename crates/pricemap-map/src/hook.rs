//! Optional human confirmation of a proposed column assignment.

use std::collections::BTreeMap;

use pricemap_model::{ColumnProfile, Role};

/// Outcome of reviewing an assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Confirmation {
    /// Keep the assignment as proposed.
    Accept,
    /// Force the given columns to the given roles; `Undefined` clears a column.
    Remap(BTreeMap<usize, Role>),
    /// Abandon the file.
    Reject,
}

/// Reviews low-confidence assignments before projection.
///
/// Called at most once per file, only when some assigned column falls below
/// the confirmation threshold.
pub trait ConfirmationHook {
    fn review(&self, profiles: &[ColumnProfile]) -> Confirmation;
}

/// Accepts everything. Used when no reviewer is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfirmation;

impl ConfirmationHook for NoConfirmation {
    fn review(&self, _profiles: &[ColumnProfile]) -> Confirmation {
        Confirmation::Accept
    }
}

impl<F> ConfirmationHook for F
where
    F: Fn(&[ColumnProfile]) -> Confirmation,
{
    fn review(&self, profiles: &[ColumnProfile]) -> Confirmation {
        self(profiles)
    }
}
