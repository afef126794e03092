//! Command-line parsing for the economic risk dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! loading and scoring.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::Indicator;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dashonomics", version, about = "Macroeconomic risk dashboard (Eurostat-based)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the three indicators, print the risk score and indicator summaries.
    Score(RunArgs),
    /// Print one indicator's series within the display window.
    Series(SeriesArgs),
    /// Write per-indicator CSVs and a JSON report to a directory.
    Export(ExportArgs),
}

/// Where observations come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceKind {
    /// Eurostat dissemination API (JSON-stat).
    Eurostat,
    /// Bulk-download TSV files in `--tsv-dir`.
    Tsv,
    /// Deterministic synthetic data (offline).
    Sample,
}

/// Options shared by every subcommand.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Observation source.
    #[arg(long, value_enum, default_value_t = SourceKind::Eurostat)]
    pub source: SourceKind,

    /// Country code (overrides DASHONOMICS_GEO).
    #[arg(short = 'g', long)]
    pub geo: Option<String>,

    /// First year to retrieve.
    #[arg(long)]
    pub since: Option<i32>,

    /// Directory holding `<dataset>.tsv` bulk files (overrides DASHONOMICS_TSV_DIR).
    #[arg(long, value_name = "DIR")]
    pub tsv_dir: Option<PathBuf>,

    /// Seed for `--source sample`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// First year of the display window (default: last five years of data).
    #[arg(long)]
    pub from: Option<i32>,

    /// Last year of the display window.
    #[arg(long)]
    pub to: Option<i32>,

    /// Show unemployment and inflation as annual averages.
    #[arg(long)]
    pub annual: bool,

    /// Print JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Log progress to stderr (RUST_LOG takes precedence).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Options for `series`.
#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// Indicator to print.
    #[arg(short = 'i', long, value_enum)]
    pub indicator: Indicator,

    #[command(flatten)]
    pub run: RunArgs,
}

/// Options for `export`.
#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Output directory (created if missing).
    #[arg(long, value_name = "DIR")]
    pub out_dir: PathBuf,

    #[command(flatten)]
    pub run: RunArgs,
}

impl Command {
    pub fn run_args(&self) -> &RunArgs {
        match self {
            Command::Score(args) => args,
            Command::Series(args) => &args.run,
            Command::Export(args) => &args.run,
        }
    }
}
