//! Delimited text (CSV) reading and writing.
//!
//! Supplier CSV exports use `;` as the delimiter and arrive either as UTF-8 or
//! as windows-1251. Encodings are tried in order; the first one that decodes
//! without errors and yields more than one column wins, falling back to the
//! first one that decoded at all.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1251};
use pricemap_model::{CellValue, Table};

use crate::error::{IngestError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// CSV parsing options.
#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub delimiter: u8,
    /// Encodings tried in order.
    pub encodings: Vec<&'static Encoding>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            encodings: vec![UTF_8, WINDOWS_1251],
        }
    }
}

impl CsvOptions {
    /// Replaces the encoding list from labels such as `utf-8` or `cp1251`.
    ///
    /// Unknown labels are returned as the error value.
    pub fn with_encoding_labels<S: AsRef<str>>(
        mut self,
        labels: &[S],
    ) -> std::result::Result<Self, String> {
        let mut encodings = Vec::with_capacity(labels.len());
        for label in labels {
            let label = label.as_ref();
            let encoding = Encoding::for_label(label.trim().as_bytes())
                .ok_or_else(|| label.to_string())?;
            encodings.push(encoding);
        }
        self.encodings = encodings;
        Ok(self)
    }
}

/// Raw CSV records and the encoding they were decoded with.
#[derive(Debug, Clone)]
pub struct DecodedCsv {
    pub records: Vec<Vec<String>>,
    pub encoding: &'static Encoding,
}

impl DecodedCsv {
    pub fn width(&self) -> usize {
        self.records.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Converts the records to typed rows.
    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.records
            .into_iter()
            .map(|record| record.iter().map(|raw| CellValue::infer(raw)).collect())
            .collect()
    }
}

/// Decodes and parses CSV bytes, trying each configured encoding.
pub fn read_csv(bytes: &[u8], options: &CsvOptions) -> Result<DecodedCsv> {
    if bytes.starts_with(&[0xFF, 0xFE]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 LE",
        });
    }
    if bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(IngestError::UnsupportedEncoding {
            encoding: "UTF-16 BE",
        });
    }
    let body = bytes.strip_prefix(&UTF8_BOM).unwrap_or(bytes);

    let mut fallback: Option<DecodedCsv> = None;
    for &encoding in &options.encodings {
        let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(body) else {
            tracing::debug!(encoding = encoding.name(), "CSV does not decode");
            continue;
        };
        let records = match parse_records(&text, options.delimiter) {
            Ok(records) => records,
            Err(error) => {
                tracing::debug!(encoding = encoding.name(), %error, "CSV does not parse");
                continue;
            }
        };
        let decoded = DecodedCsv {
            records,
            encoding,
        };
        if decoded.width() > 1 {
            tracing::debug!(encoding = encoding.name(), "decoded CSV");
            return Ok(decoded);
        }
        if fallback.is_none() {
            fallback = Some(decoded);
        }
    }

    match fallback {
        Some(decoded) if !decoded.records.is_empty() => {
            tracing::warn!(
                encoding = decoded.encoding.name(),
                "CSV has a single column; check the delimiter"
            );
            Ok(decoded)
        }
        Some(_) => Err(IngestError::EmptyInput),
        None => Err(IngestError::Undecodable {
            tried: options
                .encodings
                .iter()
                .map(|encoding| encoding.name().to_string())
                .collect(),
        }),
    }
}

fn parse_records(text: &str, delimiter: u8) -> std::result::Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        records.push(record.iter().map(str::to_string).collect());
    }
    Ok(records)
}

/// Serializes a table as delimited text in `encoding`.
///
/// Characters the encoding cannot represent are written as HTML numeric
/// character references by `encoding_rs`.
pub fn write_csv(table: &Table, delimiter: u8, encoding: &'static Encoding) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    let header: Vec<&str> = table
        .headers
        .iter()
        .map(|header| header.as_deref().unwrap_or(""))
        .collect();
    writer
        .write_record(&header)
        .map_err(|source| IngestError::WriteCsv { source })?;
    for row in &table.rows {
        let fields: Vec<String> = row.iter().map(csv_field).collect();
        writer
            .write_record(&fields)
            .map_err(|source| IngestError::WriteCsv { source })?;
    }
    let utf8 = writer
        .into_inner()
        .map_err(|err| IngestError::WriteCsv {
            source: err.into_error().into(),
        })?;
    if encoding == UTF_8 {
        return Ok(utf8);
    }
    let text = String::from_utf8_lossy(&utf8);
    let (encoded, _, _) = encoding.encode(&text);
    Ok(encoded.into_owned())
}

fn csv_field(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(text) => text.clone(),
        other => other.to_string(),
    }
}
