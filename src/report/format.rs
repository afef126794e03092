//! Formatted terminal output.
//!
//! We keep formatting code in one place so scoring and loading stay free of
//! presentation concerns.

use crate::app::pipeline::{DashboardRun, IndicatorRun};
use crate::domain::{IndicatorSeries, RiskReport, format_date_code};

/// Full dashboard: risk score, signals, then one summary line per indicator.
pub fn format_dashboard(run: &DashboardRun) -> String {
    let mut out = String::new();

    out.push_str("=== dashonomics - Economic Risk Dashboard ===\n");
    out.push_str(&format!("Country: {} | Source: {}\n", run.geo, run.source));
    match (run.span, run.window) {
        (Some(span), Some(window)) => {
            out.push_str(&format!("Data: {span} | Window: {window}\n"));
        }
        (None, Some(window)) => out.push_str(&format!("Window: {window}\n")),
        _ => out.push_str("Data: none\n"),
    }
    out.push('\n');

    out.push_str(&format_risk_report(&run.report));
    out.push('\n');

    out.push_str("Indicators:\n");
    for indicator in &run.indicators {
        out.push_str(&format_indicator_line(indicator));
        out.push('\n');
    }

    out
}

/// Score plus the triggered reasons, or a calm message.
pub fn format_risk_report(report: &RiskReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("Economic risk index: {}/100\n", report.score));
    if report.is_calm() {
        out.push_str("All calm. No economic warning signals detected.\n");
    } else {
        out.push_str("Signals detected:\n");
        for reason in &report.reasons {
            out.push_str(&format!("- {reason}\n"));
        }
    }
    out
}

fn format_indicator_line(run: &IndicatorRun) -> String {
    let name = run.indicator.display_name();
    if let Some(err) = &run.error {
        return format!("  {name:<22} unavailable: {err}");
    }

    let shown = &run.display;
    let Some(latest) = shown.latest() else {
        return format!("  {name:<22} no observations in window");
    };
    let first = shown.points().first().map(|p| p.date).unwrap_or(latest.date);
    let skipped = run
        .loaded
        .as_ref()
        .map(|l| l.rejected.len() + l.unresolved)
        .unwrap_or(0);

    let mut line = format!(
        "  {name:<22} n={:<4} {} .. {} | latest {:.2} {}",
        shown.len(),
        format_date_code(shown.frequency(), first),
        format_date_code(shown.frequency(), latest.date),
        latest.value,
        run.indicator.unit_label(),
    );
    if skipped > 0 {
        line.push_str(&format!(" ({skipped} skipped)"));
    }
    line
}

/// Two-column table of one series (`period  value`).
pub fn format_series_table(title: &str, series: &IndicatorSeries) -> String {
    let mut out = String::new();
    out.push_str(&format!("{title}\n"));
    if series.is_empty() {
        out.push_str("(no observations)\n");
        return out;
    }

    out.push_str(&format!("{:<10} {:>12}\n", "period", "value"));
    for p in series.points() {
        out.push_str(&format!(
            "{:<10} {:>12.2}\n",
            format_date_code(series.frequency(), p.date),
            p.value
        ));
    }
    out
}
