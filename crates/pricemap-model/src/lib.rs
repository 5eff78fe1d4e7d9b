//! Shared data model for price-list normalization.
//!
//! Every crate in the workspace speaks in these types: typed cells and
//! tables produced by ingestion, [`ColumnProfile`]s built by the classifiers,
//! [`SupplierSchema`] layouts loaded from configuration, and the
//! [`FileReport`] handed back to callers.

pub mod cell;
pub mod profile;
pub mod report;
pub mod role;
pub mod schema;
pub mod table;

pub use cell::{CellValue, NumberKind, parse_number};
pub use profile::ColumnProfile;
pub use report::{
    ColumnAssignment, Failure, FailureKind, FileReport, ProcessorKind, RoleScore,
};
pub use role::Role;
pub use schema::{SchemaColumn, SupplierSchema};
pub use table::{SheetOrigin, Table};
