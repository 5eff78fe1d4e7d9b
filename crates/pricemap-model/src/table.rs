use serde::{Deserialize, Serialize};

use crate::CellValue;

/// Absolute 0-based sheet coordinates of a table's header cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SheetOrigin {
    pub row: u32,
    pub column: u32,
}

/// A header row plus data rows, all padded to the same width.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<Option<String>>,
    pub rows: Vec<Vec<CellValue>>,
    pub origin: SheetOrigin,
}

impl Table {
    /// Builds a table from a header row and data rows.
    ///
    /// Blank headers become `None`. Rows shorter than the widest row (or the
    /// header) are padded with [`CellValue::Empty`].
    pub fn new(headers: Vec<Option<String>>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(headers.len()))
            .max()
            .unwrap_or(0);
        let mut headers: Vec<Option<String>> = headers
            .into_iter()
            .map(|header| header.filter(|text| !text.trim().is_empty()))
            .collect();
        headers.resize(width, None);
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self {
            headers,
            rows,
            origin: SheetOrigin::default(),
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: SheetOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Convenience constructor used heavily in tests.
    pub fn from_strings(headers: &[&str], rows: Vec<Vec<CellValue>>) -> Self {
        Self::new(
            headers.iter().map(|h| Some((*h).to_string())).collect(),
            rows,
        )
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn header(&self, index: usize) -> Option<&str> {
        self.headers.get(index).and_then(|h| h.as_deref())
    }

    /// Cells of one column, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// Finds a column by header text, ignoring surrounding whitespace and case.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let wanted = name.trim().to_lowercase();
        self.headers.iter().position(|header| {
            header
                .as_deref()
                .is_some_and(|h| h.trim().to_lowercase() == wanted)
        })
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        self.rows.get(row).and_then(|cells| cells.get(column))
    }

    /// Absolute 0-based sheet coordinates `(row, column)` of a data cell.
    pub fn sheet_position(&self, row: usize, column: usize) -> (u32, u32) {
        (
            self.origin.row + 1 + row as u32,
            self.origin.column + column as u32,
        )
    }

    /// Appends a column and returns its index.
    pub fn push_column(&mut self, header: impl Into<String>) -> usize {
        self.headers.push(Some(header.into()));
        for row in &mut self.rows {
            row.push(CellValue::Empty);
        }
        self.headers.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_ragged_rows() {
        let table = Table::new(
            vec![Some("a".into()), Some(" ".into())],
            vec![
                vec![CellValue::Int(1)],
                vec![CellValue::Int(1), CellValue::Int(2), CellValue::Int(3)],
            ],
        );
        assert_eq!(table.width(), 3);
        assert_eq!(table.header(1), None);
        assert_eq!(table.rows[0].len(), 3);
        assert_eq!(table.cell(0, 2), Some(&CellValue::Empty));
    }

    #[test]
    fn finds_columns_by_trimmed_header() {
        let table = Table::from_strings(&["Артикул", " Цена "], vec![]);
        assert_eq!(table.column_index("цена"), Some(1));
        assert_eq!(table.column_index("Бренд"), None);
    }

    #[test]
    fn maps_data_cells_to_sheet_coordinates() {
        let table = Table::from_strings(&["a"], vec![vec![CellValue::Int(1)]])
            .with_origin(SheetOrigin { row: 2, column: 1 });
        assert_eq!(table.sheet_position(0, 0), (3, 1));
    }
}
