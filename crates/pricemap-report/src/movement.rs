//! Goods-movement report rewriting.
//!
//! For every row with a quantity to move, the quantity is copied to the
//! output column, rounded down to the sale multiple, and cleared again when
//! the sending warehouse cannot spare a full multiple.

use pricemap_model::{CellValue, Table};
use pricemap_standards::MovementColumns;

use crate::edits::{CellChange, TableEditor};
use crate::error::Result;

/// Counters and changed cells of one rewrite.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovementSummary {
    pub rows_read: usize,
    pub rows_processed: usize,
    pub rows_cleared: usize,
    pub changes: Vec<CellChange>,
    pub warnings: Vec<String>,
}

/// Inputs of the per-row rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementRow {
    pub requested: f64,
    pub multiple: f64,
    pub stock: f64,
    /// `None` skips the available-stock check.
    pub available: Option<f64>,
}

/// Rounds `value` down to a multiple of `multiple`. Zero and a multiple of
/// one leave the value unchanged.
pub fn round_down_to_multiple(value: f64, multiple: f64) -> f64 {
    if multiple == 1.0 || multiple <= 0.0 || value == 0.0 || value % multiple == 0.0 {
        value
    } else {
        (value / multiple).floor() * multiple
    }
}

/// Quantity to write, or `None` when the row must be left empty.
pub fn movement_quantity(row: MovementRow) -> Option<f64> {
    let computed = round_down_to_multiple(row.requested, row.multiple);
    let short_stock = row.stock < row.multiple || row.stock < 2.0 * row.multiple;
    let short_available = row.available.is_some_and(|available| available < row.multiple);
    if short_stock || short_available {
        None
    } else {
        Some(computed)
    }
}

/// Applies the movement rules to `table` in place.
///
/// The quantity-to-move and output columns are required. A missing
/// sale-multiple column counts as a multiple of 1; missing stock columns skip
/// their checks.
pub fn rewrite_movement(table: &mut Table, columns: &MovementColumns) -> Result<MovementSummary> {
    let mut editor = TableEditor::new(table);
    let [requested_column, output_column] =
        editor.require([columns.quantity_to_move.as_str(), columns.output.as_str()])?;
    let multiple_column = editor.find(&columns.sale_multiple);
    let stock_column = editor.find(&columns.stock);
    let available_column = editor.find(&columns.available_stock);
    for (name, found) in [
        (&columns.sale_multiple, multiple_column),
        (&columns.stock, stock_column),
        (&columns.available_stock, available_column),
    ] {
        if found.is_none() {
            tracing::warn!(column = name.as_str(), "optional movement column is missing");
        }
    }

    let mut summary = MovementSummary {
        rows_read: editor.height(),
        ..MovementSummary::default()
    };
    for row in 0..editor.height() {
        let requested_cell = editor.get(row, requested_column);
        if requested_cell.is_empty() {
            continue;
        }
        let Some(requested) = requested_cell.as_f64() else {
            summary.warnings.push(format!(
                "row {}: quantity to move '{requested_cell}' is not a number",
                row + 1
            ));
            continue;
        };
        let multiple = multiple_column
            .and_then(|column| editor.get(row, column).as_f64())
            .filter(|multiple| *multiple > 0.0)
            .unwrap_or(1.0);
        let stock = match stock_column {
            Some(column) => editor.get(row, column).as_f64().unwrap_or(0.0),
            None => f64::INFINITY,
        };
        let available = available_column.and_then(|column| editor.get(row, column).as_f64());

        summary.rows_processed += 1;
        let value = match movement_quantity(MovementRow {
            requested,
            multiple,
            stock,
            available,
        }) {
            Some(quantity) => number_cell(quantity),
            None => {
                summary.rows_cleared += 1;
                CellValue::Empty
            }
        };
        tracing::trace!(row, requested, multiple, stock, ?available, %value, "movement row");
        editor.set(row, output_column, value);
    }
    summary.changes = editor.into_changes();
    tracing::info!(
        rows = summary.rows_read,
        processed = summary.rows_processed,
        cleared = summary.rows_cleared,
        changed = summary.changes.len(),
        "rewrote movement report"
    );
    Ok(summary)
}

fn number_cell(value: f64) -> CellValue {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        CellValue::Int(value as i64)
    } else {
        CellValue::Float(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn row(requested: f64, multiple: f64, stock: f64, available: Option<f64>) -> MovementRow {
        MovementRow {
            requested,
            multiple,
            stock,
            available,
        }
    }

    #[test]
    fn stock_below_multiple_clears_quantity() {
        assert_eq!(movement_quantity(row(7.0, 5.0, 3.0, None)), None);
    }

    #[test]
    fn rounds_down_when_stock_allows() {
        assert_eq!(movement_quantity(row(7.0, 5.0, 12.0, None)), Some(5.0));
    }

    #[test]
    fn stock_must_cover_two_multiples() {
        assert_eq!(movement_quantity(row(5.0, 5.0, 9.0, None)), None);
        assert_eq!(movement_quantity(row(5.0, 5.0, 10.0, Some(4.0))), None);
        assert_eq!(movement_quantity(row(5.0, 5.0, 10.0, Some(5.0))), Some(5.0));
    }

    #[test]
    fn multiple_of_one_keeps_request() {
        assert_eq!(movement_quantity(row(3.0, 1.0, 2.0, None)), Some(3.0));
        assert_eq!(round_down_to_multiple(0.0, 4.0), 0.0);
    }

    proptest! {
        #[test]
        fn rounding_is_idempotent(value in 0u32..100_000, multiple in 1u32..50) {
            let once = round_down_to_multiple(f64::from(value), f64::from(multiple));
            let twice = round_down_to_multiple(once, f64::from(multiple));
            prop_assert_eq!(once, twice);
            prop_assert!(once <= f64::from(value));
            prop_assert_eq!(once % f64::from(multiple), 0.0);
        }
    }
}
