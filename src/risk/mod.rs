//! Rule-based composite economic risk score.
//!
//! Three independent rules, each with a fixed weight:
//!
//! | rule               | needs | fires when                              | weight |
//! |--------------------|-------|-----------------------------------------|--------|
//! | GDP contraction    | 2     | latest < previous                       | 40     |
//! | unemployment surge | 4     | latest > value 3 periods back + 0.5     | 30     |
//! | inflation shock    | 2     | \|latest - previous\| > 0.8             | 30     |
//!
//! A rule without enough points contributes nothing. Rules are evaluated on
//! native-frequency series: the unemployment lookback is 3 observations, which
//! means 3 months for the monthly source.

use crate::domain::{IndicatorSeries, RiskReason, RiskReport};

pub const GDP_CONTRACTION_WEIGHT: u32 = 40;
pub const UNEMPLOYMENT_SURGE_WEIGHT: u32 = 30;
pub const INFLATION_SHOCK_WEIGHT: u32 = 30;
pub const MAX_SCORE: u32 = 100;

/// Number of observations the unemployment rule looks back.
pub const UNEMPLOYMENT_LOOKBACK: usize = 3;
/// Percentage-point rise over the lookback that counts as a surge.
pub const UNEMPLOYMENT_SURGE_THRESHOLD: f64 = 0.5;
/// Absolute one-period index change that counts as a shock.
pub const INFLATION_SHOCK_THRESHOLD: f64 = 0.8;

/// Score the three series. Pure; every call builds a fresh report.
pub fn score(
    gdp: &IndicatorSeries,
    unemployment: &IndicatorSeries,
    inflation: &IndicatorSeries,
) -> RiskReport {
    let triggered = [
        gdp_contraction(gdp).map(|r| (GDP_CONTRACTION_WEIGHT, r)),
        unemployment_surge(unemployment).map(|r| (UNEMPLOYMENT_SURGE_WEIGHT, r)),
        inflation_shock(inflation).map(|r| (INFLATION_SHOCK_WEIGHT, r)),
    ];

    let mut total = 0u32;
    let mut reasons = Vec::new();
    for (weight, reason) in triggered.into_iter().flatten() {
        total += weight;
        reasons.push(reason);
    }

    let score = total.min(MAX_SCORE) as u8;
    tracing::debug!(score, triggered = reasons.len(), "risk score computed");

    RiskReport { score, reasons }
}

fn gdp_contraction(gdp: &IndicatorSeries) -> Option<RiskReason> {
    let latest = gdp.nth_from_end(0)?.value;
    let previous = gdp.nth_from_end(1)?.value;
    (latest < previous).then_some(RiskReason::GdpContraction { previous, latest })
}

fn unemployment_surge(unemployment: &IndicatorSeries) -> Option<RiskReason> {
    let latest = unemployment.nth_from_end(0)?.value;
    let earlier = unemployment.nth_from_end(UNEMPLOYMENT_LOOKBACK)?.value;
    (latest > earlier + UNEMPLOYMENT_SURGE_THRESHOLD)
        .then_some(RiskReason::UnemploymentSurge { earlier, latest })
}

fn inflation_shock(inflation: &IndicatorSeries) -> Option<RiskReason> {
    let latest = inflation.nth_from_end(0)?.value;
    let previous = inflation.nth_from_end(1)?.value;
    let change = latest - previous;
    if change.abs() <= INFLATION_SHOCK_THRESHOLD {
        return None;
    }
    Some(if change > 0.0 {
        RiskReason::InflationSpike { change }
    } else {
        RiskReason::DeflationRisk { change }
    })
}
