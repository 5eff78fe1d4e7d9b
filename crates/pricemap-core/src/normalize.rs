//! Price-list normalization: read, infer, project, write.

use encoding_rs::UTF_8;
use pricemap_ingest::{derive_file_name, read_table, write_table};
use pricemap_map::{ConfirmationHook, Inference, InferenceEngine, NoConfirmation};
use pricemap_model::{ColumnAssignment, FileReport, ProcessorKind};
use pricemap_standards::Standards;
use pricemap_transform::project;

use crate::error::{ProcessingError, Result};
use crate::options::{NORMALIZED_SUFFIX, NormalizeOptions};
use crate::outcome::ProcessOutcome;

/// Normalizes one price list onto its supplier layout.
///
/// `file_name_or_schema_key` selects the supplier schema (by key, then by
/// file pattern, then the configured default) and, through its extension,
/// the container format. Failures never escape: the outcome then holds the
/// original bytes and a typed failure.
pub fn infer_and_normalize(
    bytes: &[u8],
    file_name_or_schema_key: &str,
    standards: &Standards,
    options: &NormalizeOptions,
) -> ProcessOutcome {
    infer_and_normalize_with(
        bytes,
        file_name_or_schema_key,
        standards,
        options,
        &NoConfirmation,
    )
}

/// [`infer_and_normalize`] with a reviewer for low-confidence assignments.
pub fn infer_and_normalize_with(
    bytes: &[u8],
    file_name_or_schema_key: &str,
    standards: &Standards,
    options: &NormalizeOptions,
    hook: &dyn ConfirmationHook,
) -> ProcessOutcome {
    let span = tracing::info_span!("normalize", file = file_name_or_schema_key);
    let _guard = span.enter();
    let mut report = FileReport::new(ProcessorKind::PriceList, file_name_or_schema_key);
    let result = normalize(
        bytes,
        file_name_or_schema_key,
        standards,
        options,
        hook,
        &mut report,
    );
    ProcessOutcome::settle(bytes, report, result)
}

/// Runs inference only and reports the column table without projecting.
///
/// The supplier schema is used for pinned headers when one matches; a
/// missing schema is not an error here.
pub fn analyze(
    bytes: &[u8],
    file_name: &str,
    standards: &Standards,
    options: &NormalizeOptions,
) -> FileReport {
    let span = tracing::info_span!("analyze", file = file_name);
    let _guard = span.enter();
    let mut report = FileReport::new(ProcessorKind::PriceList, file_name);
    let schema = standards.suppliers.find(file_name);
    report.schema = schema.map(|schema| schema.key.clone());
    let result = read_table(bytes, file_name, &options.read)
        .map_err(ProcessingError::from)
        .and_then(|parsed| {
            report.rows_read = parsed.table.height();
            InferenceEngine::new(&standards.catalog, options.inference)
                .infer(&parsed.table, schema, &NoConfirmation)
                .map_err(ProcessingError::from)
        });
    match result {
        Ok(inference) => record_inference(&mut report, &inference),
        Err(error) => report.fail(error.to_failure()),
    }
    report
}

fn normalize(
    bytes: &[u8],
    file_name: &str,
    standards: &Standards,
    options: &NormalizeOptions,
    hook: &dyn ConfirmationHook,
    report: &mut FileReport,
) -> Result<Vec<u8>> {
    let parsed = read_table(bytes, file_name, &options.read)?;
    let schema = standards
        .suppliers
        .resolve(file_name)
        .ok_or_else(|| ProcessingError::UnknownSchema {
            key: file_name.to_string(),
        })?;
    report.schema = Some(schema.key.clone());
    report.rows_read = parsed.table.height();
    tracing::info!(
        schema = schema.key.as_str(),
        format = %parsed.format,
        columns = parsed.table.width(),
        rows = parsed.table.height(),
        "read price list"
    );

    let inference = InferenceEngine::new(&standards.catalog, options.inference).infer(
        &parsed.table,
        Some(schema),
        hook,
    )?;
    record_inference(report, &inference);

    let projection = project(
        &parsed.table,
        &inference.profiles,
        schema,
        &standards.catalog,
    )?;
    for column in &mut report.columns {
        column.output_position = projection.output_positions.get(&column.index).copied();
    }
    for role in &projection.synthesized {
        report
            .warnings
            .push(format!("no {role} column found, filled with the default value"));
    }
    if projection.rows_dropped > 0 {
        report.warnings.push(format!(
            "{} sparse rows dropped",
            projection.rows_dropped
        ));
    }
    report.rows_written = projection.table.height();

    let format = parsed.format.output_format();
    let output = write_table(
        &projection.table,
        format,
        options.read.csv.delimiter,
        UTF_8,
    )
    .map_err(ProcessingError::output)?;
    report.output_file_name = Some(derive_file_name(file_name, NORMALIZED_SUFFIX, format));
    tracing::info!(
        rows = report.rows_written,
        dropped = projection.rows_dropped,
        synthesized = projection.synthesized.len(),
        bytes = output.len(),
        "normalized price list"
    );
    Ok(output)
}

fn record_inference(report: &mut FileReport, inference: &Inference) {
    report.columns = inference
        .profiles
        .iter()
        .map(ColumnAssignment::from)
        .collect();
    report.warnings.extend(inference.warnings.iter().cloned());
}
