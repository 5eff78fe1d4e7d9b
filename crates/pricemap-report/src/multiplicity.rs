//! Sale-multiple annotation.

use pricemap_model::{CellValue, Table};
use pricemap_standards::MultiplicityRules;

use crate::edits::{CellChange, TableEditor};
use crate::error::Result;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiplicitySummary {
    pub rows_read: usize,
    /// Rows whose multiple differs from the default.
    pub rows_above_default: usize,
    pub output_column: usize,
    pub changes: Vec<CellChange>,
}

/// Sale multiple for one product.
///
/// Kit products and one-sided parts (catalog number ending in `l` or `r`)
/// sell singly, paired parts (`lr`) in twos. Otherwise keyword groups are
/// scanned in order: an anti-keyword word in the name sells singly, and a
/// group carrying anti-keywords ends the scan once it matches.
pub fn multiple_for(name: &str, catalog_number: &str, rules: &MultiplicityRules) -> u32 {
    let name = name.trim().to_lowercase();
    let number = catalog_number.trim().to_lowercase();

    if rules.kit_words.iter().any(|word| name.contains(word.as_str())) {
        return rules.default_multiple;
    }
    if number.ends_with("lr") {
        return 2;
    }
    if number.ends_with('l') || number.ends_with('r') {
        return rules.default_multiple;
    }

    let unbracketed = name.replace(['(', ')'], "");
    let words: Vec<&str> = unbracketed.split(' ').collect();
    let mut multiple = rules.default_multiple;
    for group in &rules.groups {
        if !group.keywords.iter().any(|keyword| name.contains(keyword.as_str())) {
            continue;
        }
        if group.anti_keywords.is_empty() {
            multiple = group.multiple;
            continue;
        }
        let cancelled = group
            .anti_keywords
            .iter()
            .any(|anti| words.contains(&anti.as_str()));
        return if cancelled {
            rules.default_multiple
        } else {
            group.multiple
        };
    }
    multiple
}

/// Writes the sale multiple of every row into the output column, appending
/// the column when the table lacks it.
pub fn annotate(table: &mut Table, rules: &MultiplicityRules) -> Result<MultiplicitySummary> {
    let mut editor = TableEditor::new(table);
    let [name_column] = editor.require([rules.columns.product_name.as_str()])?;
    let number_column = editor.find(&rules.columns.catalog_number);
    if number_column.is_none() {
        tracing::warn!(
            column = rules.columns.catalog_number.as_str(),
            "catalog number column is missing, side suffixes are ignored"
        );
    }
    let output_column = editor.find_or_append(&rules.columns.output);

    let mut summary = MultiplicitySummary {
        rows_read: editor.height(),
        output_column,
        ..MultiplicitySummary::default()
    };
    for row in 0..editor.height() {
        let name = editor.get(row, name_column).to_string();
        let number = number_column
            .map(|column| editor.get(row, column).to_string())
            .unwrap_or_default();
        let multiple = multiple_for(&name, &number, rules);
        if multiple != rules.default_multiple {
            summary.rows_above_default += 1;
        }
        editor.set(row, output_column, CellValue::Int(i64::from(multiple)));
    }
    summary.changes = editor.into_changes();
    tracing::info!(
        rows = summary.rows_read,
        above_default = summary.rows_above_default,
        changed = summary.changes.len(),
        "annotated sale multiples"
    );
    Ok(summary)
}
