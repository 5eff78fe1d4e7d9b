//! Typed cell values.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest magnitude at which an integral `f64` is still printed without a
/// fractional part.
const INTEGRAL_DISPLAY_LIMIT: f64 = 1e15;

/// A single spreadsheet cell.
///
/// Spreadsheet readers keep the native cell type. CSV cells arrive as text
/// and go through [`CellValue::infer`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    #[default]
    Empty,
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
}

/// Numeric shape of a value, used by the type pre-filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Integer,
    Fractional,
}

impl CellValue {
    /// Builds a cell from raw CSV text.
    ///
    /// Plain integers become [`CellValue::Int`], plain decimals (with `.` or a
    /// single `,` as separator) become [`CellValue::Float`]. Values with a
    /// leading zero such as `00123` stay text so catalog codes keep their
    /// digits.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Empty;
        }
        let unsigned = trimmed.strip_prefix('-').unwrap_or(trimmed);
        if unsigned.is_empty() || has_padding_zero(unsigned) {
            return CellValue::Text(raw.to_string());
        }
        if unsigned.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(value) = trimmed.parse::<i64>() {
                return CellValue::Int(value);
            }
            return CellValue::Text(raw.to_string());
        }
        if is_plain_decimal(unsigned) {
            if let Ok(value) = trimmed.replace(',', ".").parse::<f64>() {
                return CellValue::Float(value);
            }
        }
        CellValue::Text(raw.to_string())
    }

    /// Returns true for empty cells and whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric value of the cell. Text is parsed leniently with
    /// [`parse_number`].
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(value) => Some(*value as f64),
            CellValue::Float(value) if value.is_finite() => Some(*value),
            CellValue::Text(text) => parse_number(text),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Classifies the cell as integer-like or fractional, or `None` when it
    /// is not a number.
    pub fn number_kind(&self) -> Option<NumberKind> {
        let value = self.as_f64()?;
        if value.fract() == 0.0 {
            Some(NumberKind::Integer)
        } else {
            Some(NumberKind::Fractional)
        }
    }

    /// Length of the stringified value in characters.
    pub fn display_len(&self) -> usize {
        self.to_string().chars().count()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(value) => write!(f, "{value}"),
            CellValue::Float(value) => {
                if value.fract() == 0.0 && value.abs() < INTEGRAL_DISPLAY_LIMIT {
                    write!(f, "{value:.0}")
                } else {
                    write!(f, "{value}")
                }
            }
            CellValue::Text(text) => f.write_str(text.trim()),
            CellValue::Bool(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

/// Parses a number written the way price lists write them.
///
/// Accepts thousands separators (space, no-break space, and `,` when a `.`
/// is also present) and a comma decimal separator. Returns `None` for
/// anything that is not entirely numeric.
pub fn parse_number(text: &str) -> Option<f64> {
    let compact: String = text
        .trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '\u{a0}' | '\u{202f}'))
        .collect();
    if compact.is_empty() {
        return None;
    }
    let normalized = match (compact.rfind('.'), compact.rfind(',')) {
        (Some(dot), Some(comma)) if comma > dot => compact.replace('.', "").replace(',', "."),
        (Some(_), _) => compact.replace(',', ""),
        (None, _) => compact.replace(',', "."),
    };
    let unsigned = normalized.strip_prefix('-').unwrap_or(&normalized);
    if unsigned.is_empty()
        || !unsigned.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        || unsigned.bytes().filter(|b| *b == b'.').count() > 1
    {
        return None;
    }
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn has_padding_zero(unsigned: &str) -> bool {
    let bytes = unsigned.as_bytes();
    bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit()
}

fn is_plain_decimal(unsigned: &str) -> bool {
    let mut separators = 0;
    let mut digits_before = 0;
    let mut digits_after = 0;
    for byte in unsigned.bytes() {
        match byte {
            b'0'..=b'9' if separators == 0 => digits_before += 1,
            b'0'..=b'9' => digits_after += 1,
            b'.' | b',' => separators += 1,
            _ => return false,
        }
    }
    separators == 1 && digits_before > 0 && digits_after > 0
}
