//! Header row handling.

use pricemap_model::{CellValue, Table};

/// Share of non-numeric text a first row needs to be taken as a header.
pub const HEADER_TEXT_SHARE: f64 = 0.7;

/// How the first row of a sheet is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaderMode {
    /// The first row is always the header.
    FirstRow,
    /// The first row is the header when it reads as text and the row below
    /// it reads as data.
    #[default]
    Detect,
}

/// Returns true when more than [`HEADER_TEXT_SHARE`] of the row's non-empty
/// cells are non-numeric text.
pub fn looks_like_header(row: &[CellValue]) -> bool {
    let filled: Vec<&CellValue> = row.iter().filter(|cell| !cell.is_empty()).collect();
    if filled.is_empty() {
        return false;
    }
    let text = filled
        .iter()
        .filter(|cell| matches!(cell, CellValue::Text(_)) && cell.number_kind().is_none())
        .count();
    text as f64 / filled.len() as f64 > HEADER_TEXT_SHARE
}

/// Splits raw rows into a [`Table`], taking the header from the first row
/// according to `mode`. A header-less table gets `None` for every header.
pub fn build_table(mut rows: Vec<Vec<CellValue>>, mode: HeaderMode) -> Table {
    let has_header = match mode {
        HeaderMode::FirstRow => !rows.is_empty(),
        HeaderMode::Detect => match rows.as_slice() {
            [first] => looks_like_header(first),
            [first, second, ..] => looks_like_header(first) && !looks_like_header(second),
            [] => false,
        },
    };
    if !has_header {
        tracing::debug!(rows = rows.len(), "no header row detected");
        return Table::new(Vec::new(), rows);
    }
    let header_row = rows.remove(0);
    let headers = header_row
        .iter()
        .map(|cell| {
            let text = cell.to_string();
            if text.is_empty() { None } else { Some(text) }
        })
        .collect();
    Table::new(headers, rows)
}
