//! Projection of classified source tables onto supplier layouts.
//!
//! The projector assembles a fresh table: schema positions first (with the
//! schema's titles), unclaimed source columns after them, and constant
//! columns for required roles the source lacks when the catalog has a
//! default for them.

pub mod error;
pub mod project;
pub mod rows;

pub use error::{ProjectionError, Result};
pub use project::{OutputSource, Projection, project};
pub use rows::{MIN_FILLED_CELLS, is_data_row};
