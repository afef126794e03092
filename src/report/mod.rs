//! Reporting: terminal text and the serializable report file.

pub mod format;

pub use format::*;

use chrono::NaiveDate;
use serde::Serialize;

use crate::app::pipeline::DashboardRun;
use crate::domain::{Frequency, Indicator, RiskReason, YearRange, format_date_code};

/// JSON shape for `--json` output and exported report files.
#[derive(Debug, Clone, Serialize)]
pub struct ReportFile {
    pub tool: String,
    pub geo: String,
    pub source: String,
    pub score: u8,
    pub reasons: Vec<String>,
    pub signals: Vec<RiskReason>,
    pub window: Option<YearRange>,
    pub indicators: Vec<IndicatorSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorSummary {
    pub indicator: Indicator,
    pub frequency: Frequency,
    pub points: usize,
    pub latest_period: Option<String>,
    pub latest_date: Option<NaiveDate>,
    pub latest_value: Option<f64>,
    pub error: Option<String>,
    pub rejected_codes: Vec<String>,
}

impl ReportFile {
    pub fn from_run(run: &DashboardRun) -> Self {
        let indicators = run
            .indicators
            .iter()
            .map(|r| {
                let latest = r.display.latest();
                IndicatorSummary {
                    indicator: r.indicator,
                    frequency: r.display.frequency(),
                    points: r.display.len(),
                    latest_period: latest.map(|p| format_date_code(r.display.frequency(), p.date)),
                    latest_date: latest.map(|p| p.date),
                    latest_value: latest.map(|p| p.value),
                    error: r.error.clone(),
                    rejected_codes: r
                        .loaded
                        .as_ref()
                        .map(|l| l.rejected.iter().map(|e| e.to_string()).collect())
                        .unwrap_or_default(),
                }
            })
            .collect();

        Self {
            tool: "dashonomics".to_string(),
            geo: run.geo.clone(),
            source: run.source.to_string(),
            score: run.report.score,
            reasons: run.report.reason_texts(),
            signals: run.report.reasons.clone(),
            window: run.window,
            indicators,
        }
    }
}
