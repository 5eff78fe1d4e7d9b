//! Reading supplier files into [`Table`]s and writing them back out.
//!
//! Spreadsheets (xlsx, xlsm, xlsb, xls, ods) are read with `calamine`; CSV is
//! decoded with `encoding_rs` and parsed with `csv`. Output workbooks are
//! produced with `umya-spreadsheet`, which can also patch cells of an existing
//! xlsx in place.

pub mod delimited;
pub mod error;
pub mod format;
pub mod header;
pub mod workbook;

use encoding_rs::Encoding;
use pricemap_model::{SheetOrigin, Table};

pub use delimited::{CsvOptions, DecodedCsv, read_csv, write_csv};
pub use error::{IngestError, Result};
pub use format::{ContainerFormat, derive_file_name, extension_of};
pub use header::{HeaderMode, build_table, looks_like_header};
pub use workbook::{CellEdit, SheetRows, patch_first_sheet, read_first_sheet, write_xlsx};

/// Options for [`read_table`].
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    pub csv: CsvOptions,
    pub header: HeaderMode,
}

/// A parsed input file.
#[derive(Debug, Clone)]
pub struct ParsedTable {
    pub table: Table,
    pub format: ContainerFormat,
    /// Encoding the CSV was decoded with; `None` for spreadsheets.
    pub encoding: Option<&'static Encoding>,
}

impl ParsedTable {
    /// True when the first row was taken as the header.
    pub fn has_header(&self) -> bool {
        self.table.headers.iter().any(Option::is_some)
    }
}

/// Reads the first worksheet (or the CSV body) of `bytes`.
///
/// `file_name` selects the container by extension; without an extension the
/// bytes are sniffed.
pub fn read_table(bytes: &[u8], file_name: &str, options: &ReadOptions) -> Result<ParsedTable> {
    if bytes.is_empty() {
        return Err(IngestError::EmptyInput);
    }
    let format = ContainerFormat::detect(file_name, bytes)?;
    let parsed = match format {
        ContainerFormat::Csv => {
            let decoded = read_csv(bytes, &options.csv)?;
            let encoding = decoded.encoding;
            let table = build_table(decoded.into_rows(), options.header);
            ParsedTable {
                table,
                format,
                encoding: Some(encoding),
            }
        }
        _ => {
            let sheet = read_first_sheet(bytes)?;
            if sheet.rows.is_empty() {
                return Err(IngestError::EmptyInput);
            }
            let table = build_table(sheet.rows, options.header);
            let origin = if table.headers.iter().any(Option::is_some) {
                sheet.origin
            } else {
                // Data starts on the first used row; the origin names the row above it.
                SheetOrigin {
                    row: sheet.origin.row.saturating_sub(1),
                    column: sheet.origin.column,
                }
            };
            ParsedTable {
                table: table.with_origin(origin),
                format,
                encoding: None,
            }
        }
    };
    tracing::debug!(
        file = file_name,
        format = %parsed.format,
        columns = parsed.table.width(),
        rows = parsed.table.height(),
        "parsed input"
    );
    Ok(parsed)
}

/// Serializes `table` in `format`.
///
/// Any spreadsheet format is written as xlsx; CSV uses `delimiter` and
/// `encoding`.
pub fn write_table(
    table: &Table,
    format: ContainerFormat,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<Vec<u8>> {
    match format {
        ContainerFormat::Csv => write_csv(table, delimiter, encoding),
        _ => write_xlsx(table),
    }
}
