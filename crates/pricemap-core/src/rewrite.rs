//! Row-level pipelines: goods-movement rewriting and sale-multiple
//! annotation.
//!
//! Both read the first sheet with its first row as header, edit cells by
//! column name and write the result back into the original container when
//! it can be patched.

use encoding_rs::UTF_8;
use pricemap_ingest::{
    CellEdit, ContainerFormat, HeaderMode, ParsedTable, ReadOptions, derive_file_name,
    patch_first_sheet, read_table, write_csv, write_xlsx,
};
use pricemap_model::{CellValue, FileReport, ProcessorKind};
use pricemap_report::{CellChange, annotate, rewrite_movement};
use pricemap_standards::Standards;

use crate::error::{ProcessingError, Result};
use crate::outcome::ProcessOutcome;

/// Suffix appended to annotated file stems.
pub const MULTIPLICITY_SUFFIX: &str = "_кратность";

/// Rewrites the "to move" column of a goods-movement report.
pub fn rewrite_report(bytes: &[u8], file_name: &str, standards: &Standards) -> ProcessOutcome {
    let span = tracing::info_span!("rewrite", file = file_name);
    let _guard = span.enter();
    let mut report = FileReport::new(ProcessorKind::GoodsMovement, file_name);
    let result = read_report(bytes, file_name).and_then(|mut parsed| {
        let original_width = parsed.table.width();
        let summary = rewrite_movement(&mut parsed.table, &standards.movement)?;
        report.rows_read = summary.rows_read;
        report.rows_written = summary.rows_processed;
        report.cells_changed = summary.changes.len();
        report.warnings.extend(summary.warnings);
        let (output, format) = write_back(bytes, &parsed, original_width, &summary.changes)?;
        report.output_file_name = Some(if format == parsed.format {
            file_name.to_string()
        } else {
            derive_file_name(file_name, "", format)
        });
        Ok(output)
    });
    ProcessOutcome::settle(bytes, report, result)
}

/// Adds the sale multiple of every row to a product list.
pub fn annotate_multiplicity(
    bytes: &[u8],
    file_name: &str,
    standards: &Standards,
) -> ProcessOutcome {
    let span = tracing::info_span!("multiplicity", file = file_name);
    let _guard = span.enter();
    let mut report = FileReport::new(ProcessorKind::Multiplicity, file_name);
    let result = read_report(bytes, file_name).and_then(|mut parsed| {
        let original_width = parsed.table.width();
        let summary = annotate(&mut parsed.table, &standards.multiplicity)?;
        report.rows_read = summary.rows_read;
        report.rows_written = summary.rows_read;
        report.cells_changed = summary.changes.len();
        let (output, format) = write_back(bytes, &parsed, original_width, &summary.changes)?;
        report.output_file_name = Some(derive_file_name(file_name, MULTIPLICITY_SUFFIX, format));
        Ok(output)
    });
    ProcessOutcome::settle(bytes, report, result)
}

fn read_report(bytes: &[u8], file_name: &str) -> Result<ParsedTable> {
    let options = ReadOptions {
        header: HeaderMode::FirstRow,
        ..ReadOptions::default()
    };
    Ok(read_table(bytes, file_name, &options)?)
}

/// Serializes the edited table, patching xlsx/xlsm in place.
///
/// Columns at or beyond `original_width` were appended by the pipeline and
/// get their header written too. Formats that cannot be patched fall back to
/// a fresh xlsx.
fn write_back(
    original: &[u8],
    parsed: &ParsedTable,
    original_width: usize,
    changes: &[CellChange],
) -> Result<(Vec<u8>, ContainerFormat)> {
    let table = &parsed.table;
    if parsed.format.supports_in_place_edit() {
        let mut edits: Vec<CellEdit> = (original_width..table.width())
            .filter_map(|column| {
                let header = table.header(column)?;
                Some(CellEdit {
                    row: table.origin.row,
                    column: table.origin.column + column as u32,
                    value: CellValue::from(header),
                })
            })
            .collect();
        edits.extend(changes.iter().map(|change| {
            let (row, column) = table.sheet_position(change.row, change.column);
            CellEdit {
                row,
                column,
                value: change.after.clone(),
            }
        }));
        tracing::debug!(edits = edits.len(), "patching workbook in place");
        let output = patch_first_sheet(original, &edits).map_err(ProcessingError::output)?;
        return Ok((output, parsed.format));
    }

    let output = match parsed.format {
        ContainerFormat::Csv => write_csv(
            table,
            ReadOptions::default().csv.delimiter,
            parsed.encoding.unwrap_or(UTF_8),
        ),
        _ => {
            tracing::warn!(
                format = %parsed.format,
                "format cannot be patched, writing a new xlsx workbook"
            );
            write_xlsx(table)
        }
    }
    .map_err(ProcessingError::output)?;
    Ok((output, parsed.format.output_format()))
}
