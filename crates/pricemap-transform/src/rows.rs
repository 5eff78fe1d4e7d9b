//! Row filtering.

use pricemap_model::CellValue;

/// Rows with fewer filled source cells than this are treated as noise
/// (section titles, totals, blank separators).
pub const MIN_FILLED_CELLS: usize = 2;

/// True when the row carries enough data to keep.
pub fn is_data_row(row: &[CellValue]) -> bool {
    row.iter().filter(|cell| !cell.is_empty()).count() >= MIN_FILLED_CELLS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_filled_cell_is_noise() {
        assert!(!is_data_row(&[
            CellValue::from("Фильтры"),
            CellValue::Empty,
            CellValue::Empty
        ]));
        assert!(is_data_row(&[
            CellValue::from("A1"),
            CellValue::Int(3),
            CellValue::Empty
        ]));
        assert!(!is_data_row(&[CellValue::Empty, CellValue::from(" ")]));
    }
}
