//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and environment settings
//! - initializes logging
//! - picks the observation source
//! - runs the dashboard pipeline
//! - prints reports or writes exports

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ExportArgs, RunArgs, SeriesArgs, SourceKind};
use crate::config::Settings;
use crate::data::{EurostatClient, ObservationSource, SampleSource, SeriesCache, TsvDirSource};
use crate::error::AppError;
use crate::report::ReportFile;

pub mod pipeline;

use pipeline::{DashboardConfig, DashboardRun};

/// Years covered by `--source sample`.
const SAMPLE_FIRST_YEAR: i32 = 2005;
const SAMPLE_LAST_YEAR: i32 = 2024;

/// Entry point for the `dashonomics` binary.
pub fn run() -> Result<(), AppError> {
    // `dashonomics` and `dashonomics --geo PT` behave like `dashonomics score ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    init_tracing(cli.command.run_args().verbose);
    let settings = Settings::from_env()?;

    match cli.command {
        Command::Score(args) => handle_score(&args, &settings),
        Command::Series(args) => handle_series(&args, &settings),
        Command::Export(args) => handle_export(&args, &settings),
    }
}

fn handle_score(args: &RunArgs, settings: &Settings) -> Result<(), AppError> {
    let run = run_from_args(args, settings)?;
    if args.json {
        println!("{}", to_json(&ReportFile::from_run(&run))?);
    } else {
        print!("{}", crate::report::format_dashboard(&run));
    }
    Ok(())
}

fn handle_series(args: &SeriesArgs, settings: &Settings) -> Result<(), AppError> {
    let run = run_from_args(&args.run, settings)?;
    let entry = run
        .indicator(args.indicator)
        .ok_or_else(|| AppError::new(3, format!("No data for {}.", args.indicator.slug())))?;
    if let Some(err) = &entry.error {
        return Err(AppError::new(4, format!("{} unavailable: {err}", args.indicator.display_name())));
    }

    if args.run.json {
        println!("{}", to_json(&entry.display)?);
    } else {
        let title = format!(
            "{} ({}) - {}",
            args.indicator.display_name(),
            args.indicator.unit_label(),
            run.geo
        );
        print!("{}", crate::report::format_series_table(&title, &entry.display));
    }
    Ok(())
}

fn handle_export(args: &ExportArgs, settings: &Settings) -> Result<(), AppError> {
    let run = run_from_args(&args.run, settings)?;
    let written = crate::io::export_run(&args.out_dir, &run)?;
    for path in written {
        println!("wrote {}", path.display());
    }
    Ok(())
}

fn run_from_args(args: &RunArgs, settings: &Settings) -> Result<DashboardRun, AppError> {
    let source = build_source(args, settings)?;
    let config = dashboard_config_from_args(args, settings);
    // Lives for this invocation only; nothing persists between runs.
    let cache = SeriesCache::new();
    pipeline::run_dashboard(&config, source.as_ref(), &cache)
}

pub fn build_source(args: &RunArgs, settings: &Settings) -> Result<Box<dyn ObservationSource>, AppError> {
    Ok(match args.source {
        SourceKind::Eurostat => Box::new(EurostatClient::from_settings(settings)?),
        SourceKind::Tsv => {
            let dir = args
                .tsv_dir
                .clone()
                .or_else(|| settings.tsv_dir.clone())
                .ok_or_else(|| AppError::new(2, "--source tsv requires --tsv-dir or DASHONOMICS_TSV_DIR."))?;
            Box::new(TsvDirSource::new(dir))
        }
        SourceKind::Sample => Box::new(SampleSource::new(args.seed, SAMPLE_FIRST_YEAR, SAMPLE_LAST_YEAR)),
    })
}

pub fn dashboard_config_from_args(args: &RunArgs, settings: &Settings) -> DashboardConfig {
    DashboardConfig {
        geo: args
            .geo
            .as_deref()
            .map(|g| g.trim().to_uppercase())
            .unwrap_or_else(|| settings.geo.clone()),
        since: args.since,
        from: args.from,
        to: args.to,
        annual: args.annual,
    }
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::new(2, format!("Failed to serialize JSON: {e}")))
}

/// Logs go to stderr so stdout stays a clean report.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Rewrite argv so `dashonomics` defaults to `dashonomics score`.
///
/// Rules:
/// - `dashonomics`                      -> `dashonomics score`
/// - `dashonomics --geo PT ...`         -> `dashonomics score --geo PT ...`
/// - `dashonomics --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("score".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "score" | "series" | "export");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "score".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_scores() {
        assert_eq!(rewrite_args(argv(&["dashonomics"])), argv(&["dashonomics", "score"]));
    }

    #[test]
    fn leading_flags_go_to_score() {
        assert_eq!(
            rewrite_args(argv(&["dashonomics", "--geo", "PT"])),
            argv(&["dashonomics", "score", "--geo", "PT"])
        );
    }

    #[test]
    fn help_and_subcommands_untouched() {
        assert_eq!(rewrite_args(argv(&["dashonomics", "--help"])), argv(&["dashonomics", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["dashonomics", "export", "--out-dir", "x"])),
            argv(&["dashonomics", "export", "--out-dir", "x"])
        );
    }

    #[test]
    fn geo_flag_overrides_settings() {
        let cli = crate::cli::Cli::parse_from(argv(&["dashonomics", "score", "--geo", "fr", "--since", "2015"]));
        let config = dashboard_config_from_args(cli.command.run_args(), &Settings::default());
        assert_eq!(config.geo, "FR");
        assert_eq!(config.since, Some(2015));

        let cli = crate::cli::Cli::parse_from(argv(&["dashonomics", "score"]));
        let config = dashboard_config_from_args(cli.command.run_args(), &Settings::default());
        assert_eq!(config.geo, "ES");
    }

    #[test]
    fn tsv_source_needs_a_directory() {
        let cli = crate::cli::Cli::parse_from(argv(&["dashonomics", "score", "--source", "tsv"]));
        let err = build_source(cli.command.run_args(), &Settings::default()).err().unwrap();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn sample_source_runs_offline() {
        let cli = crate::cli::Cli::parse_from(argv(&["dashonomics", "score", "--source", "sample"]));
        let run = run_from_args(cli.command.run_args(), &Settings::default()).unwrap();
        assert_eq!(run.source, "sample");
        assert_eq!(run.window.map(|w| w.max), Some(SAMPLE_LAST_YEAR));
    }
}
