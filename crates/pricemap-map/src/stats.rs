//! Statistical signals computed over a column sample.

use std::collections::BTreeSet;

use pricemap_model::{CellValue, NumberKind};
use pricemap_standards::Thresholds;

/// Endings (last two digits or cents) typical for retail prices.
const PRICE_ENDINGS: [i64; 4] = [0, 50, 90, 99];

/// Numeric values in the sample, in sample order.
pub fn numeric_values(sample: &[CellValue]) -> Vec<f64> {
    sample.iter().filter_map(CellValue::as_f64).collect()
}

pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median of the numeric values in the sample.
pub fn sample_median(sample: &[CellValue]) -> Option<f64> {
    median(&numeric_values(sample))
}

fn fraction(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64
    }
}

/// True when the numeric part of the sample looks like prices: enough values
/// with cents, or enough values with a retail ending, or a median in the
/// plausible price band.
pub fn price_signal(sample: &[CellValue], thresholds: &Thresholds) -> bool {
    let values = numeric_values(sample);
    if values.len() < thresholds.min_numeric_values {
        return false;
    }
    let cents = values.iter().filter(|v| cents_of(**v) != 0).count();
    if fraction(cents, values.len()) > thresholds.cents_fraction {
        return true;
    }
    let endings = values
        .iter()
        .filter(|v| PRICE_ENDINGS.contains(&price_ending(**v)))
        .count();
    if fraction(endings, values.len()) > thresholds.round_ending_fraction {
        return true;
    }
    median(&values).is_some_and(|m| in_price_band(m, thresholds))
}

pub fn in_price_band(value: f64, thresholds: &Thresholds) -> bool {
    (thresholds.price_median_min..=thresholds.price_median_max).contains(&value)
}

fn cents_of(value: f64) -> i64 {
    ((value.abs() * 100.0).round() as i64) % 100
}

/// Cents for fractional values, the last two integer digits otherwise.
fn price_ending(value: f64) -> i64 {
    let cents = cents_of(value);
    if cents != 0 {
        cents
    } else {
        (value.abs().round() as i64) % 100
    }
}

/// True when the sample is mostly small whole numbers. Whole-number prices
/// (price signal with a median inside the price band) do not count.
pub fn quantity_signal(sample: &[CellValue], thresholds: &Thresholds) -> bool {
    if sample.is_empty() {
        return false;
    }
    let integers = sample
        .iter()
        .filter(|cell| cell.number_kind() == Some(NumberKind::Integer))
        .count();
    if fraction(integers, sample.len()) <= thresholds.quantity_integer_fraction {
        return false;
    }
    let Some(median) = sample_median(sample) else {
        return false;
    };
    if median > thresholds.quantity_median_max {
        return false;
    }
    !(median >= thresholds.price_median_min && price_signal(sample, thresholds))
}

/// True when most values look like catalog codes.
pub fn article_signal(sample: &[CellValue], thresholds: &Thresholds) -> bool {
    if sample.is_empty() {
        return false;
    }
    let codes = sample
        .iter()
        .filter(|cell| looks_like_code(&cell.to_string()))
        .count();
    fraction(codes, sample.len()) > thresholds.article_code_fraction
}

/// A code mixes letters and digits, or is 6 to 12 digits long.
pub fn looks_like_code(text: &str) -> bool {
    let text = text.trim();
    let has_letter = text.chars().any(char::is_alphabetic);
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    if has_letter && has_digit {
        return true;
    }
    text.chars().all(|c| c.is_ascii_digit()) && (6..=12).contains(&text.len())
}

pub fn average_length(sample: &[CellValue]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    let total: usize = sample.iter().map(CellValue::display_len).sum();
    total as f64 / sample.len() as f64
}

/// Distinct stringified values divided by sample size.
pub fn unique_ratio(sample: &[CellValue]) -> f64 {
    if sample.is_empty() {
        return 0.0;
    }
    let distinct: BTreeSet<String> = sample
        .iter()
        .map(|cell| cell.to_string().to_lowercase())
        .collect();
    fraction(distinct.len(), sample.len())
}
