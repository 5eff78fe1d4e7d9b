//! Spreadsheet reading (calamine) and writing (umya-spreadsheet).

use std::io::Cursor;

use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::NaiveTime;
use pricemap_model::{CellValue, SheetOrigin, Table};
use umya_spreadsheet::{Cell, Spreadsheet};

use crate::error::{IngestError, Result};

/// Rows of the first worksheet plus the sheet position of the first one.
#[derive(Debug, Clone, Default)]
pub struct SheetRows {
    pub rows: Vec<Vec<CellValue>>,
    pub origin: SheetOrigin,
}

/// Reads the first worksheet of an xlsx/xlsm/xlsb/xls/ods workbook.
///
/// The container is detected from the bytes, so a mislabeled extension still
/// reads. Only the used range is returned.
pub fn read_first_sheet(bytes: &[u8]) -> Result<SheetRows> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::NoWorksheet)??;
    let origin = range
        .start()
        .map(|(row, column)| SheetOrigin { row, column })
        .unwrap_or_default();
    let rows: Vec<Vec<CellValue>> = range
        .rows()
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();
    tracing::debug!(
        rows = rows.len(),
        start_row = origin.row,
        start_column = origin.column,
        "read worksheet"
    );
    Ok(SheetRows { rows, origin })
}

fn convert_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::Int(value) => CellValue::Int(*value),
        Data::Float(value) => CellValue::Float(*value),
        Data::Bool(value) => CellValue::Bool(*value),
        Data::String(text) if text.trim().is_empty() => CellValue::Empty,
        Data::String(text) => CellValue::Text(text.clone()),
        Data::DateTime(value) => match value.as_datetime() {
            Some(datetime) if datetime.time() == NaiveTime::MIN => {
                CellValue::Text(datetime.date().format("%Y-%m-%d").to_string())
            }
            Some(datetime) => CellValue::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Float(value.as_f64()),
        },
        Data::DateTimeIso(text) | Data::DurationIso(text) => CellValue::Text(text.clone()),
    }
}

/// Writes a table to a fresh single-sheet xlsx, header row first.
pub fn write_xlsx(table: &Table) -> Result<Vec<u8>> {
    let mut book = umya_spreadsheet::new_file();
    let sheet = book
        .get_sheet_mut(&0)
        .ok_or_else(|| IngestError::WriteWorkbook {
            message: "new workbook has no sheet".to_string(),
        })?;
    for (column, header) in table.headers.iter().enumerate() {
        if let Some(header) = header {
            sheet
                .get_cell_mut((column as u32 + 1, 1))
                .set_value_string(header.clone());
        }
    }
    for (row_index, row) in table.rows.iter().enumerate() {
        for (column, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let cell = sheet.get_cell_mut((column as u32 + 1, row_index as u32 + 2));
            apply_value(cell, value);
        }
    }
    serialize(&book)
}

/// A value to store at absolute 0-based sheet coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct CellEdit {
    pub row: u32,
    pub column: u32,
    pub value: CellValue,
}

/// Applies edits to the first worksheet of an xlsx/xlsm workbook, leaving
/// every other cell, style and sheet untouched. Empty values clear the cell
/// but keep its formatting.
pub fn patch_first_sheet(bytes: &[u8], edits: &[CellEdit]) -> Result<Vec<u8>> {
    let mut book = umya_spreadsheet::reader::xlsx::read_reader(Cursor::new(bytes), true)
        .map_err(|err| IngestError::Workbook {
            message: err.to_string(),
        })?;
    let sheet = book.get_sheet_mut(&0).ok_or(IngestError::NoWorksheet)?;
    for edit in edits {
        let (Some(column), Some(row)) = (edit.column.checked_add(1), edit.row.checked_add(1))
        else {
            return Err(IngestError::CellOutOfRange {
                row: edit.row,
                column: edit.column,
            });
        };
        apply_value(sheet.get_cell_mut((column, row)), &edit.value);
    }
    tracing::debug!(edits = edits.len(), "patched worksheet");
    serialize(&book)
}

fn apply_value(cell: &mut Cell, value: &CellValue) {
    match value {
        CellValue::Empty => {
            cell.set_blank();
        }
        CellValue::Int(v) => {
            cell.set_value_number(*v as f64);
        }
        CellValue::Float(v) => {
            cell.set_value_number(*v);
        }
        CellValue::Bool(v) => {
            cell.set_value_bool(*v);
        }
        CellValue::Text(text) => {
            cell.set_value_string(text.clone());
        }
    }
}

fn serialize(book: &Spreadsheet) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(book, &mut out).map_err(|err| {
        IngestError::WriteWorkbook {
            message: err.to_string(),
        }
    })?;
    Ok(out.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> Table {
        Table::from_strings(
            &["Art", "Brand", "RUB", "Qty"],
            vec![vec![
                CellValue::from("A1-123"),
                CellValue::from("SAMSUNG"),
                CellValue::Float(1999.99),
                CellValue::Int(5),
            ]],
        )
    }

    #[test]
    fn written_workbook_reads_back() {
        let bytes = write_xlsx(&sample_table()).unwrap();
        let sheet = read_first_sheet(&bytes).unwrap();
        assert_eq!(sheet.origin, SheetOrigin::default());
        assert_eq!(sheet.rows[0][0], CellValue::from("Art"));
        assert_eq!(sheet.rows[1][1], CellValue::from("SAMSUNG"));
        assert_eq!(sheet.rows[1][2].as_f64(), Some(1999.99));
        assert_eq!(sheet.rows[1][3].as_f64(), Some(5.0));
    }

    #[test]
    fn patch_changes_only_edited_cells() {
        let bytes = write_xlsx(&sample_table()).unwrap();
        let patched = patch_first_sheet(
            &bytes,
            &[
                CellEdit {
                    row: 1,
                    column: 3,
                    value: CellValue::Int(7),
                },
                CellEdit {
                    row: 1,
                    column: 2,
                    value: CellValue::Empty,
                },
            ],
        )
        .unwrap();
        let sheet = read_first_sheet(&patched).unwrap();
        assert_eq!(sheet.rows[0][2], CellValue::from("RUB"));
        assert_eq!(sheet.rows[1][0], CellValue::from("A1-123"));
        assert!(sheet.rows[1][2].is_empty());
        assert_eq!(sheet.rows[1][3].as_f64(), Some(7.0));
    }

    #[test]
    fn garbage_is_not_a_workbook() {
        let err = read_first_sheet(b"definitely not a spreadsheet").unwrap_err();
        assert!(err.is_unreadable());
    }
}
