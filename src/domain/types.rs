//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by any retrieval source
//! - scored and filtered without knowing where they came from
//! - exported to JSON/CSV

use chrono::{Datelike, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One of the three macroeconomic measures the dashboard tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Indicator {
    /// Quarterly GDP per capita.
    Gdp,
    /// Monthly harmonised consumer price index.
    Inflation,
    /// Monthly unemployment rate.
    Unemployment,
}

impl Indicator {
    /// Statistics dataset code.
    pub fn dataset(self) -> &'static str {
        match self {
            Indicator::Gdp => "namq_10_pc",
            Indicator::Inflation => "prc_hicp_midx",
            Indicator::Unemployment => "une_rt_m",
        }
    }

    /// Dimension filters that select a single series within the dataset.
    ///
    /// `geo` is not included; it is a run parameter. `s_adj` is pinned for the
    /// datasets that publish several seasonal adjustments side by side.
    pub fn filters(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Indicator::Gdp => &[("unit", "CP_EUR_HAB"), ("na_item", "B1GQ"), ("s_adj", "SCA")],
            Indicator::Inflation => &[("coicop", "CP00"), ("unit", "I15")],
            Indicator::Unemployment => &[("sex", "T"), ("age", "TOTAL"), ("unit", "PC_ACT"), ("s_adj", "SA")],
        }
    }

    /// Native publication frequency.
    pub fn frequency(self) -> Frequency {
        match self {
            Indicator::Gdp => Frequency::Quarterly,
            Indicator::Inflation | Indicator::Unemployment => Frequency::Monthly,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Indicator::Gdp => "GDP per capita",
            Indicator::Inflation => "Consumer price index",
            Indicator::Unemployment => "Unemployment rate",
        }
    }

    pub fn unit_label(self) -> &'static str {
        match self {
            Indicator::Gdp => "EUR/hab",
            Indicator::Inflation => "index 2015=100",
            Indicator::Unemployment => "% active pop.",
        }
    }

    /// Short lowercase id used in file names and cache keys.
    pub fn slug(self) -> &'static str {
        match self {
            Indicator::Gdp => "gdp",
            Indicator::Inflation => "inflation",
            Indicator::Unemployment => "unemployment",
        }
    }
}

/// Observation frequency of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    Monthly,
    Quarterly,
    Annual,
}

/// A single dated observation. Day-of-month is always 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: f64,
}

impl IndicatorPoint {
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A chronologically ordered series with unique dates and finite values.
///
/// The only way to build one is through [`IndicatorSeries::new`], which
/// establishes the ordering invariants; consumers only get read access.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    frequency: Frequency,
    points: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    /// Sort by date, drop non-finite values and keep the first point per date.
    pub fn new(frequency: Frequency, mut points: Vec<IndicatorPoint>) -> Self {
        points.retain(|p| p.value.is_finite());
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { frequency, points }
    }

    pub fn empty(frequency: Frequency) -> Self {
        Self {
            frequency,
            points: Vec::new(),
        }
    }

    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn points(&self) -> &[IndicatorPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest(&self) -> Option<&IndicatorPoint> {
        self.points.last()
    }

    /// The point `k` positions before the latest (`0` is the latest).
    pub fn nth_from_end(&self, k: usize) -> Option<&IndicatorPoint> {
        self.points.len().checked_sub(k + 1).map(|idx| &self.points[idx])
    }

    pub fn first_year(&self) -> Option<i32> {
        self.points.first().map(|p| p.date.year())
    }

    pub fn last_year(&self) -> Option<i32> {
        self.points.last().map(|p| p.date.year())
    }
}

/// An inclusive calendar-year window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    pub min: i32,
    pub max: i32,
}

impl YearRange {
    pub fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.min <= year && year <= self.max
    }

    /// The trailing five-year window of `span`, clamped to its start.
    pub fn default_window(span: YearRange) -> YearRange {
        YearRange {
            min: (span.max - 5).max(span.min),
            max: span.max,
        }
    }
}

impl std::fmt::Display for YearRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.min, self.max)
    }
}

/// Why a risk rule fired. Renders as a human-readable sentence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RiskReason {
    GdpContraction { previous: f64, latest: f64 },
    UnemploymentSurge { earlier: f64, latest: f64 },
    InflationSpike { change: f64 },
    DeflationRisk { change: f64 },
}

impl std::fmt::Display for RiskReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskReason::GdpContraction { previous, latest } => write!(
                f,
                "GDP fell vs previous quarter ({previous:.2} -> {latest:.2})."
            ),
            RiskReason::UnemploymentSurge { earlier, latest } => write!(
                f,
                "Unemployment rose significantly over the last 3 periods ({earlier:.2}% -> {latest:.2}%)."
            ),
            RiskReason::InflationSpike { change } => write!(
                f,
                "Inflation spike: consumer prices jumped {change:+.2} index points in one period."
            ),
            RiskReason::DeflationRisk { change } => write!(
                f,
                "Deflation risk: consumer prices dropped {change:+.2} index points in one period."
            ),
        }
    }
}

/// Composite risk score plus the reasons that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskReport {
    /// Sum of triggered rule weights, capped at 100.
    pub score: u8,
    /// Triggered rules in evaluation order (GDP, unemployment, inflation).
    pub reasons: Vec<RiskReason>,
}

impl RiskReport {
    pub fn reason_texts(&self) -> Vec<String> {
        self.reasons.iter().map(|r| r.to_string()).collect()
    }

    pub fn is_calm(&self) -> bool {
        self.reasons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    #[test]
    fn series_new_sorts_and_dedups() {
        let series = IndicatorSeries::new(
            Frequency::Monthly,
            vec![
                IndicatorPoint::new(d(2023, 3), 3.0),
                IndicatorPoint::new(d(2023, 1), 1.0),
                IndicatorPoint::new(d(2023, 3), 99.0),
                IndicatorPoint::new(d(2023, 2), f64::NAN),
            ],
        );
        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2023, 1), d(2023, 3)]);
        // Stable sort keeps the first occurrence of a duplicate date.
        assert_eq!(series.latest().unwrap().value, 3.0);
    }

    #[test]
    fn nth_from_end_indexes_backwards() {
        let series = IndicatorSeries::new(
            Frequency::Monthly,
            (1..=4).map(|m| IndicatorPoint::new(d(2024, m), m as f64)).collect(),
        );
        assert_eq!(series.nth_from_end(0).unwrap().value, 4.0);
        assert_eq!(series.nth_from_end(3).unwrap().value, 1.0);
        assert!(series.nth_from_end(4).is_none());
    }

    #[test]
    fn default_window_is_last_five_years() {
        assert_eq!(
            YearRange::default_window(YearRange::new(2000, 2024)),
            YearRange::new(2019, 2024)
        );
        assert_eq!(
            YearRange::default_window(YearRange::new(2022, 2024)),
            YearRange::new(2022, 2024)
        );
    }

    #[test]
    fn reason_text_mentions_direction() {
        let spike = RiskReason::InflationSpike { change: 1.0 }.to_string();
        assert!(spike.starts_with("Inflation spike"));
        let deflation = RiskReason::DeflationRisk { change: -1.2 }.to_string();
        assert!(deflation.contains("-1.20"));
    }
}
