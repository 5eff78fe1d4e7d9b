//! Terminal tables.

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use pricemap_model::{ColumnAssignment, FileReport, Role};
use pricemap_standards::SchemaRegistry;

use crate::types::RunResult;

/// Candidates shown per column.
const MAX_CANDIDATES: usize = 3;

pub fn print_summary(result: &RunResult) {
    println!("{}", run_table(result));
    for run in &result.files {
        print_messages(&run.report);
    }
    if result.has_failures() {
        eprintln!("{} of {} files failed", result.failed(), result.files.len());
    }
}

pub fn print_analysis(report: &FileReport) {
    if let Some(schema) = &report.schema {
        println!("Schema: {schema}");
    }
    println!("Rows: {}", report.rows_read);
    println!("{}", column_table(&report.columns));
    print_messages(report);
}

fn print_messages(report: &FileReport) {
    if let Some(failure) = &report.failure {
        eprintln!("{}: {} ({})", report.file_name, failure.message, failure.kind);
    }
    for warning in &report.warnings {
        eprintln!("{}: warning: {warning}", report.file_name);
    }
}

/// One row per processed file.
pub fn run_table(result: &RunResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Processor"),
        header_cell("Status"),
        header_cell("Rows"),
        header_cell("Changed"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for run in &result.files {
        let report = &run.report;
        let status = match &report.failure {
            None => Cell::new("ok").fg(Color::Green).add_attribute(Attribute::Bold),
            Some(failure) => Cell::new(failure.kind).fg(Color::Red).add_attribute(Attribute::Bold),
        };
        let output = match &run.output {
            Some(path) => Cell::new(path.display()),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(&report.file_name),
            Cell::new(report.processor),
            status,
            Cell::new(report.rows_written),
            Cell::new(report.cells_changed),
            output,
        ]);
    }
    table
}

/// Inferred role of every source column.
pub fn column_table(columns: &[ColumnAssignment]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Header"),
        header_cell("Role"),
        header_cell("Confidence"),
        header_cell("Candidates"),
        header_cell("Output"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for column in columns {
        let candidates = column
            .candidates
            .iter()
            .take(MAX_CANDIDATES)
            .map(|score| format!("{} {:.2}", score.role, score.confidence))
            .collect::<Vec<_>>()
            .join(", ");
        let mut role = Cell::new(if column.pinned {
            format!("{} (pinned)", column.role)
        } else {
            column.role.to_string()
        });
        role = if column.role == Role::Undefined {
            role.fg(Color::DarkGrey)
        } else {
            role.add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(column.index),
            Cell::new(column.header.as_deref().unwrap_or("-")),
            role,
            confidence_cell(column.confidence),
            Cell::new(candidates),
            match column.output_position {
                Some(position) => Cell::new(position),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

pub fn schema_table(registry: &SchemaRegistry) -> Table {
    let default_key = registry.default_schema().map(|schema| schema.key.as_str());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Key"),
        header_cell("Name"),
        header_cell("Version"),
        header_cell("Columns"),
        header_cell("File patterns"),
    ]);
    apply_table_style(&mut table);
    for schema in registry.schemas() {
        let key = if Some(schema.key.as_str()) == default_key {
            format!("{} (default)", schema.key)
        } else {
            schema.key.clone()
        };
        let columns = schema
            .ordered_columns()
            .iter()
            .map(|column| format!("{}:{}", column.position, column.role))
            .collect::<Vec<_>>()
            .join(" ");
        table.add_row(vec![
            Cell::new(key),
            Cell::new(&schema.name),
            Cell::new(schema.version),
            Cell::new(columns),
            Cell::new(schema.file_patterns.join(", ")),
        ]);
    }
    table
}

fn confidence_cell(confidence: f64) -> Cell {
    let cell = Cell::new(format!("{confidence:.2}"));
    if confidence >= 0.7 {
        cell.fg(Color::Green)
    } else if confidence > 0.0 {
        cell.fg(Color::Yellow)
    } else {
        cell.fg(Color::DarkGrey)
    }
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Bold)
}

fn dim_cell(text: &str) -> Cell {
    Cell::new(text).fg(Color::DarkGrey)
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}
