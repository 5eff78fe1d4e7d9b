//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use pricemap_map::PricePolicy;

#[derive(Parser)]
#[command(
    name = "pricemap",
    version,
    about = "Normalize supplier price lists and rewrite stock reports",
    long_about = "Normalize supplier price lists onto a fixed column layout.\n\n\
                  Column roles (article, brand, price, quantity, ...) are inferred from\n\
                  cell contents and headers. Goods-movement reports and product lists\n\
                  can be rewritten row by row."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Directory with catalog.toml, suppliers.toml, rewriter.toml and
    /// multiplicity.toml (default: PRICEMAP_STANDARDS_DIR or built-in).
    #[arg(long = "standards", value_name = "DIR", global = true)]
    pub standards: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Infer column roles and project price lists onto their supplier layout.
    Normalize(NormalizeArgs),

    /// Round goods-movement quantities down to the sale multiple.
    Rewrite(FilesArgs),

    /// Add the sale multiple of every product.
    Multiplicity(FilesArgs),

    /// Print the inferred column roles of a file without writing output.
    Analyze(AnalyzeArgs),

    /// List configured supplier schemas.
    Schemas,
}

#[derive(Args)]
pub struct FilesArgs {
    /// Input files.
    #[arg(value_name = "FILES", required = true)]
    pub files: Vec<PathBuf>,

    /// Output directory (default: <FILE_DIR>/output).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write the per-file reports as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,
}

#[derive(Args)]
pub struct InferenceArgs {
    /// Supplier schema key; by default the schema is matched by file name.
    #[arg(long = "schema", value_name = "KEY")]
    pub schema: Option<String>,

    /// How competing price columns are settled.
    #[arg(long = "price-policy", value_enum, default_value = "header-evidence")]
    pub price_policy: PricePolicyArg,

    /// Fail files with columns that match no role.
    #[arg(long = "strict-columns")]
    pub strict_columns: bool,

    /// Values sampled per column.
    #[arg(long = "sample-size", value_name = "N")]
    pub sample_size: Option<usize>,

    /// Seed for sampling large columns.
    #[arg(long = "seed", value_name = "SEED")]
    pub seed: Option<u64>,
}

#[derive(Args)]
pub struct NormalizeArgs {
    #[command(flatten)]
    pub files: FilesArgs,

    #[command(flatten)]
    pub inference: InferenceArgs,

    /// Ask on the terminal before using low-confidence column roles.
    #[arg(long = "interactive")]
    pub interactive: bool,
}

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Input file.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub inference: InferenceArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum PricePolicyArg {
    HeaderEvidence,
    Surface,
    PlausibleMedian,
}

impl From<PricePolicyArg> for PricePolicy {
    fn from(arg: PricePolicyArg) -> Self {
        match arg {
            PricePolicyArg::HeaderEvidence => PricePolicy::HeaderEvidence,
            PricePolicyArg::Surface => PricePolicy::Surface,
            PricePolicyArg::PlausibleMedian => PricePolicy::PlausibleMedian,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
