#![deny(unsafe_code)]

//! Domain knowledge for price-list normalization.
//!
//! Everything here is configuration: the pattern/keyword catalog that drives
//! column classification, the supplier layouts files are projected onto, and
//! the column names and rules of the row-level pipelines. The defaults live
//! in `standards/*.toml` at the workspace root and are embedded at build time;
//! a directory with the same files can replace them at runtime.

pub mod catalog;
pub mod error;
pub mod loader;
pub mod paths;
pub mod rules;
pub mod suppliers;

pub use crate::catalog::{PatternCatalog, RoleCatalog, Thresholds, keyword_matches};
pub use crate::error::{Result, StandardsError};
pub use crate::loader::{Standards, embedded_standards, load_standards};
pub use crate::paths::{STANDARDS_ENV_VAR, workspace_standards_dir};
pub use crate::rules::{KeywordGroup, MovementColumns, MultiplicityColumns, MultiplicityRules};
pub use crate::suppliers::{SchemaRegistry, normalize_key};
