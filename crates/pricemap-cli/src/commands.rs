use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use pricemap_core::{
    NORMALIZED_SUFFIX, NormalizeOptions, PriceListProcessor, ProcessingPipeline,
    ProcessorRegistry, analyze,
};
use pricemap_ingest::{ContainerFormat, derive_file_name, extension_of};
use pricemap_model::{Failure, FailureKind, FileReport, ProcessorKind};
use pricemap_standards::{Standards, load_standards};
use tracing::{debug, info, warn};

use pricemap_cli::interactive::TerminalConfirmation;
use pricemap_cli::summary::schema_table;
use pricemap_cli::types::{FileRun, RunResult};

use crate::cli::{AnalyzeArgs, FilesArgs, InferenceArgs, NormalizeArgs};

/// Directory created next to the input when `--output-dir` is not given.
const DEFAULT_OUTPUT_DIR: &str = "output";

pub fn load(dir: Option<&Path>) -> Result<Standards> {
    let standards = load_standards(dir).context("load standards")?;
    debug!(
        catalog = standards.catalog.version.as_str(),
        suppliers = standards.suppliers.schemas().len(),
        "standards loaded"
    );
    Ok(standards)
}

pub fn run_normalize(args: &NormalizeArgs, standards: &Standards) -> Result<RunResult> {
    let mut processor = PriceListProcessor::new(normalize_options(&args.inference));
    if args.interactive {
        processor = processor.with_hook(Arc::new(TerminalConfirmation));
    }
    let mut registry = ProcessorRegistry::new();
    registry.register(Box::new(processor));
    let schema = args.inference.schema.as_deref();
    if let Some(key) = schema {
        if standards.suppliers.get(key).is_none() {
            anyhow::bail!("unknown supplier schema: {key}");
        }
    }
    run_files(
        &args.files,
        &registry,
        ProcessorKind::PriceList,
        standards,
        schema,
    )
}

pub fn run_rows(args: &FilesArgs, kind: ProcessorKind, standards: &Standards) -> Result<RunResult> {
    run_files(args, &ProcessorRegistry::default(), kind, standards, None)
}

pub fn run_analyze(args: &AnalyzeArgs, standards: &Standards) -> Result<FileReport> {
    let bytes = read_input(&args.file)?;
    let file_name = file_name_of(&args.file);
    let lookup = args.inference.schema.as_deref().unwrap_or(&file_name);
    let mut report = analyze(
        &bytes,
        &name_for_lookup(&file_name, lookup),
        standards,
        &normalize_options(&args.inference),
    );
    report.file_name = file_name;
    Ok(report)
}

pub fn run_schemas(standards: &Standards) {
    println!("{}", schema_table(&standards.suppliers));
}

fn run_files(
    args: &FilesArgs,
    registry: &ProcessorRegistry,
    kind: ProcessorKind,
    standards: &Standards,
    schema: Option<&str>,
) -> Result<RunResult> {
    let pipeline = ProcessingPipeline::new(registry, kind, standards)
        .with_context(|| format!("no processor registered for {kind}"))?;
    let progress = progress_bar(args.files.len())?;
    let mut result = RunResult::default();
    for input in &args.files {
        let file_name = file_name_of(input);
        progress.set_message(file_name.clone());
        let bytes = match read_input(input) {
            Ok(bytes) => bytes,
            Err(error) => {
                let message = format!("{error:#}");
                warn!(file = file_name.as_str(), error = message.as_str(), "input not readable");
                let mut report = FileReport::new(kind, file_name);
                report.fail(Failure::new(FailureKind::UnreadableInput, message));
                result.files.push(FileRun {
                    input: input.clone(),
                    output: None,
                    report,
                });
                progress.inc(1);
                continue;
            }
        };
        let lookup = name_for_lookup(&file_name, schema.unwrap_or(&file_name));
        let (output_bytes, mut report) = pipeline.run(&bytes, &lookup);
        report.file_name = file_name.clone();

        let output = match report.output_file_name.as_deref() {
            Some(produced) if report.success() => {
                let name = output_name(&file_name, produced, schema.is_some());
                let dir = output_dir(args.output_dir.as_deref(), input);
                let path = write_output(&dir, &name, &output_bytes)?;
                report.output_file_name = Some(name);
                Some(path)
            }
            _ => None,
        };
        result.files.push(FileRun {
            input: input.clone(),
            output,
            report,
        });
        progress.inc(1);
    }
    progress.finish_and_clear();
    if let Some(path) = &args.report {
        write_reports(path, &result)?;
    }
    info!(
        files = result.files.len(),
        failed = result.failed(),
        processor = %kind,
        "run finished"
    );
    Ok(result)
}

fn normalize_options(args: &InferenceArgs) -> NormalizeOptions {
    let mut options = NormalizeOptions::default()
        .with_price_policy(args.price_policy.into())
        .with_strict_columns(args.strict_columns);
    if let Some(size) = args.sample_size {
        options = options.with_sample_size(size);
    }
    if let Some(seed) = args.seed {
        options = options.with_seed(seed);
    }
    options
}

/// Name passed to the core: the file name itself, or the schema key with the
/// file's extension so the container is still chosen by extension.
fn name_for_lookup(file_name: &str, lookup: &str) -> String {
    if lookup == file_name {
        return file_name.to_string();
    }
    match extension_of(file_name) {
        Some(extension) => format!("{lookup}.{extension}"),
        None => lookup.to_string(),
    }
}

/// Output file name, keeping the input stem when the schema was forced.
fn output_name(file_name: &str, produced: &str, schema_forced: bool) -> String {
    if !schema_forced {
        return produced.to_string();
    }
    let format = extension_of(produced)
        .and_then(ContainerFormat::from_extension)
        .unwrap_or(ContainerFormat::Xlsx);
    derive_file_name(file_name, NORMALIZED_SUFFIX, format)
}

fn output_dir(explicit: Option<&Path>, input: &Path) -> PathBuf {
    match explicit {
        Some(dir) => dir.to_path_buf(),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_OUTPUT_DIR),
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_input(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).with_context(|| format!("read {}", path.display()))
}

fn write_output(dir: &Path, name: &str, bytes: &[u8]) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let path = dir.join(name);
    fs::write(&path, bytes).with_context(|| format!("write {}", path.display()))?;
    debug!(path = %path.display(), bytes = bytes.len(), "output written");
    Ok(path)
}

fn write_reports(path: &Path, result: &RunResult) -> Result<()> {
    let reports: Vec<&FileReport> = result.files.iter().map(|run| &run.report).collect();
    let json = serde_json::to_vec_pretty(&reports).context("serialize reports")?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))
}

fn progress_bar(len: usize) -> Result<ProgressBar> {
    let progress = ProgressBar::new(len as u64);
    if len < 2 || !io::stderr().is_terminal() {
        progress.set_draw_target(ProgressDrawTarget::hidden());
    }
    let style = ProgressStyle::with_template("{bar:30} {pos}/{len} {wide_msg}")
        .context("progress bar template")?;
    progress.set_style(style);
    Ok(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_name_keeps_extension() {
        assert_eq!(name_for_lookup("Прайс.xlsx", "Прайс.xlsx"), "Прайс.xlsx");
        assert_eq!(name_for_lookup("Прайс.xlsx", "sputnik"), "sputnik.xlsx");
        assert_eq!(name_for_lookup("prices", "sputnik"), "sputnik");
    }

    #[test]
    fn forced_schema_keeps_input_stem() {
        assert_eq!(
            output_name("Прайс.xls", "sputnik_normalized.xlsx", true),
            "Прайс_normalized.xlsx"
        );
        assert_eq!(
            output_name("Прайс.xls", "Прайс_normalized.xlsx", false),
            "Прайс_normalized.xlsx"
        );
    }

    #[test]
    fn default_output_dir_is_next_to_input() {
        assert_eq!(
            output_dir(None, Path::new("in/prices.csv")),
            PathBuf::from("in/output")
        );
        assert_eq!(
            output_dir(Some(Path::new("out")), Path::new("in/prices.csv")),
            PathBuf::from("out")
        );
    }
}
