//! Container detection.

use std::fmt;

use crate::error::{IngestError, Result};

const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Container family of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerFormat {
    Xlsx,
    Xlsm,
    Xlsb,
    Xls,
    Ods,
    Csv,
}

impl ContainerFormat {
    /// Maps a file extension (without dot, any case).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "xlsx" => Some(Self::Xlsx),
            "xlsm" => Some(Self::Xlsm),
            "xlsb" => Some(Self::Xlsb),
            "xls" => Some(Self::Xls),
            "ods" => Some(Self::Ods),
            "csv" | "txt" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Picks the container for `file_name`, sniffing `bytes` when the name has
    /// no extension (for example when a schema key is passed instead).
    pub fn detect(file_name: &str, bytes: &[u8]) -> Result<Self> {
        match extension_of(file_name) {
            Some(extension) => {
                Self::from_extension(extension).ok_or_else(|| IngestError::UnsupportedFormat {
                    extension: extension.to_string(),
                })
            }
            None => Ok(Self::sniff(bytes)),
        }
    }

    /// Guesses the container from magic bytes. Zip archives are treated as
    /// xlsx (the reader re-detects ods), OLE compound files as xls, anything
    /// else as CSV.
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(&ZIP_MAGIC) {
            Self::Xlsx
        } else if bytes.starts_with(&OLE_MAGIC) {
            Self::Xls
        } else {
            Self::Csv
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Xlsm => "xlsm",
            Self::Xlsb => "xlsb",
            Self::Xls => "xls",
            Self::Ods => "ods",
            Self::Csv => "csv",
        }
    }

    pub fn is_spreadsheet(&self) -> bool {
        !matches!(self, Self::Csv)
    }

    /// Format written for normalized output of this input family.
    pub fn output_format(&self) -> Self {
        match self {
            Self::Csv => Self::Csv,
            _ => Self::Xlsx,
        }
    }

    /// True when cells can be patched inside the original workbook.
    pub fn supports_in_place_edit(&self) -> bool {
        matches!(self, Self::Xlsx | Self::Xlsm)
    }
}

impl fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Extension of the last path component, if it has one.
pub fn extension_of(file_name: &str) -> Option<&str> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let (stem, extension) = base.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() || extension.contains(' ') {
        None
    } else {
        Some(extension)
    }
}

/// Replaces the extension of `file_name` and appends `suffix` to its stem.
pub fn derive_file_name(file_name: &str, suffix: &str, format: ContainerFormat) -> String {
    let stem = match extension_of(file_name) {
        Some(extension) => &file_name[..file_name.len() - extension.len() - 1],
        None => file_name,
    };
    format!("{stem}{suffix}.{}", format.extension())
}
