//! Export series to CSV and the run report to JSON.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app::pipeline::DashboardRun;
use crate::domain::{IndicatorSeries, format_date_code};
use crate::error::AppError;
use crate::report::ReportFile;

/// Write one series as `date,code,value`.
pub fn write_series_csv(path: &Path, series: &IndicatorSeries) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    writeln!(file, "date,code,value")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in series.points() {
        writeln!(
            file,
            "{},{},{}",
            p.date,
            format_date_code(series.frequency(), p.date),
            p.value
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the run report as pretty JSON.
pub fn write_report_json(path: &Path, run: &DashboardRun) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, &ReportFile::from_run(run))
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    Ok(())
}

/// Write `<indicator>.csv` for each displayed series plus `report.json` into `dir`.
///
/// Returns the written paths.
pub fn export_run(dir: &Path, run: &DashboardRun) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let mut written = Vec::with_capacity(run.indicators.len() + 1);
    for indicator in &run.indicators {
        if indicator.error.is_some() {
            continue;
        }
        let path = dir.join(format!("{}.csv", indicator.indicator.slug()));
        write_series_csv(&path, &indicator.display)?;
        written.push(path);
    }

    let report = dir.join("report.json");
    write_report_json(&report, run)?;
    written.push(report);

    tracing::info!(dir = %dir.display(), files = written.len(), "export written");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;

    use super::*;
    use crate::app::pipeline::{DashboardConfig, run_dashboard};
    use crate::data::{SampleSource, SeriesCache};
    use crate::domain::{Frequency, IndicatorPoint};

    #[test]
    fn series_csv_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cpi.csv");
        let series = IndicatorSeries::new(
            Frequency::Monthly,
            vec![IndicatorPoint::new(NaiveDate::from_ymd_opt(2023, 7, 1).unwrap(), 101.5)],
        );
        write_series_csv(&path, &series).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "date,code,value\n2023-07-01,2023M07,101.5\n");
    }

    #[test]
    fn export_writes_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested");
        let config = DashboardConfig {
            geo: "ES".to_string(),
            since: None,
            from: None,
            to: None,
            annual: false,
        };
        let run = run_dashboard(&config, &SampleSource::new(5, 2019, 2020), &SeriesCache::new()).unwrap();

        let written = export_run(&out, &run).unwrap();
        assert_eq!(written.len(), 4);
        assert!(out.join("gdp.csv").exists());
        assert!(out.join("unemployment.csv").exists());
        assert!(out.join("inflation.csv").exists());

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("report.json")).unwrap()).unwrap();
        assert_eq!(report["tool"], "dashonomics");
        assert_eq!(report["score"], run.report.score);
    }
}
