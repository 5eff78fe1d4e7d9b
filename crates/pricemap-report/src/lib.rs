//! Row-level report pipelines.
//!
//! Both pipelines read a header-addressed [`Table`](pricemap_model::Table),
//! mutate cells by (row, named column) and hand back the list of changed
//! cells so callers can patch the original workbook instead of rebuilding it.

pub mod edits;
pub mod error;
pub mod movement;
pub mod multiplicity;

pub use edits::{CellChange, TableEditor};
pub use error::{Result, RewriteError};
pub use movement::{
    MovementRow, MovementSummary, movement_quantity, rewrite_movement, round_down_to_multiple,
};
pub use multiplicity::{MultiplicitySummary, annotate, multiple_for};
