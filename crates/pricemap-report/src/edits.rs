//! Named-column row access that records what it changes.

use pricemap_model::{CellValue, Table};

use crate::error::{Result, RewriteError};

/// A cell whose value changed, in table coordinates (data row, column).
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    pub row: usize,
    pub column: usize,
    pub before: CellValue,
    pub after: CellValue,
}

/// Mutable view over a table that tracks changed cells.
#[derive(Debug)]
pub struct TableEditor<'a> {
    table: &'a mut Table,
    changes: Vec<CellChange>,
}

impl<'a> TableEditor<'a> {
    pub fn new(table: &'a mut Table) -> Self {
        Self {
            table,
            changes: Vec::new(),
        }
    }

    pub fn table(&self) -> &Table {
        self.table
    }

    pub fn height(&self) -> usize {
        self.table.height()
    }

    /// Index of the column titled `name`, or `None`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.table.column_index(name)
    }

    /// Resolves every name or reports all that are missing.
    pub fn require<const N: usize>(&self, names: [&str; N]) -> Result<[usize; N]> {
        if self.table.headers.iter().all(Option::is_none) {
            return Err(RewriteError::NoHeader);
        }
        let found = names.map(|name| self.find(name));
        let missing: Vec<String> = names
            .iter()
            .zip(&found)
            .filter(|(_, index)| index.is_none())
            .map(|(name, _)| (*name).to_string())
            .collect();
        if !missing.is_empty() {
            return Err(RewriteError::MissingColumns { columns: missing });
        }
        Ok(found.map(|index| index.unwrap_or_default()))
    }

    /// Finds `name`, appending an empty column with that title when absent.
    pub fn find_or_append(&mut self, name: &str) -> usize {
        match self.find(name) {
            Some(index) => index,
            None => {
                tracing::debug!(column = name, "appending output column");
                self.table.push_column(name)
            }
        }
    }

    pub fn get(&self, row: usize, column: usize) -> &CellValue {
        self.table.cell(row, column).unwrap_or(&CellValue::Empty)
    }

    /// Stores `value`, recording a change only when the cell differs.
    pub fn set(&mut self, row: usize, column: usize, value: CellValue) {
        let Some(cell) = self
            .table
            .rows
            .get_mut(row)
            .and_then(|cells| cells.get_mut(column))
        else {
            return;
        };
        if same_value(cell, &value) {
            return;
        }
        let before = std::mem::replace(cell, value.clone());
        self.changes.push(CellChange {
            row,
            column,
            before,
            after: value,
        });
    }

    pub fn into_changes(self) -> Vec<CellChange> {
        self.changes
    }
}

/// Numeric cells compare by value so `5` and `5.0` are not a change.
fn same_value(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Int(_) | CellValue::Float(_), CellValue::Int(_) | CellValue::Float(_)) => {
            a.as_f64() == b.as_f64()
        }
        _ => (a.is_empty() && b.is_empty()) || a == b,
    }
}
