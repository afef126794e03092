//! Raw observations → `IndicatorSeries`.
//!
//! Steps:
//! 1. resolve each observation key's trailing time index to a date code
//!    (unresolvable keys are skipped)
//! 2. parse the code with the indicator's frequency
//! 3. drop points whose code fails to parse
//! 4. sort ascending by date
//!
//! An empty result is a valid, empty series.

use crate::data::{FetchRequest, ObservationSource, RawObservations};
use crate::domain::{Frequency, IndicatorPoint, IndicatorSeries, parse_date_code};
use crate::error::{DateCodeError, LoadError};

/// A normalized series plus what was skipped while building it.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedSeries {
    pub series: IndicatorSeries,
    /// Observations whose key did not resolve to a date code.
    pub unresolved: usize,
    /// Date codes that failed to parse.
    pub rejected: Vec<DateCodeError>,
}

/// Build a series from already-retrieved observations.
pub fn build_series(raw: &RawObservations, frequency: Frequency) -> LoadedSeries {
    let mut points = Vec::with_capacity(raw.values.len());
    let mut unresolved = 0usize;
    let mut rejected = Vec::new();

    for (key, value) in &raw.values {
        let Some(code) = raw.resolve(key) else {
            unresolved += 1;
            continue;
        };
        match parse_date_code(frequency, code) {
            Ok(date) => points.push(IndicatorPoint::new(date, *value)),
            Err(err) => rejected.push(err),
        }
    }

    LoadedSeries {
        series: IndicatorSeries::new(frequency, points),
        unresolved,
        rejected,
    }
}

/// Fetch one indicator from `source` and normalize it.
pub fn load_series(
    source: &dyn ObservationSource,
    request: &FetchRequest,
) -> Result<LoadedSeries, LoadError> {
    let frequency = request.indicator.frequency();
    let raw = source.fetch(request)?;
    let loaded = build_series(&raw, frequency);

    let indicator = request.indicator.slug();
    if !loaded.rejected.is_empty() {
        // Monthly codes have a known alternate spelling, so misses there are
        // routine; quarterly codes have one canonical form.
        if frequency == Frequency::Quarterly {
            for err in &loaded.rejected {
                tracing::warn!(indicator, error = %err, "dropping observation with malformed date code");
            }
        } else {
            tracing::debug!(
                indicator,
                rejected = loaded.rejected.len(),
                "dropped observations with malformed date codes"
            );
        }
    }
    if loaded.unresolved > 0 {
        tracing::debug!(indicator, unresolved = loaded.unresolved, "skipped observations without a date code");
    }
    tracing::info!(
        indicator,
        source = source.name(),
        geo = %request.geo,
        points = loaded.series.len(),
        "indicator loaded"
    );

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Indicator;

    struct FixedSource(Result<RawObservations, &'static str>);

    impl ObservationSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn fetch(&self, _request: &FetchRequest) -> Result<RawObservations, LoadError> {
            self.0.clone().map_err(|message| LoadError::Payload {
                source_name: "fixed",
                message: message.to_string(),
            })
        }
    }

    fn d(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn raw(codes: &[&str], values: &[(&str, f64)]) -> RawObservations {
        RawObservations::from_code_index(
            codes.iter().enumerate().map(|(i, c)| (c.to_string(), i)),
            values.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        )
    }

    #[test]
    fn monthly_points_are_sorted() {
        let raw = raw(
            &["2023M01", "2023M02", "2023-03"],
            &[("0:2", 3.0), ("0:0", 1.0), ("0:1", 2.0)],
        );
        let loaded = build_series(&raw, Frequency::Monthly);
        let dates: Vec<_> = loaded.series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d(2023, 1), d(2023, 2), d(2023, 3)]);
        assert!(loaded.rejected.is_empty());
    }

    #[test]
    fn bad_codes_and_unknown_indices_are_dropped() {
        let raw = raw(
            &["2021-Q1", "2021-Q5", "2021-Q2"],
            &[("0:0", 1.0), ("0:1", 2.0), ("0:2", 3.0), ("0:7", 4.0)],
        );
        let loaded = build_series(&raw, Frequency::Quarterly);
        assert_eq!(loaded.series.len(), 2);
        assert_eq!(loaded.unresolved, 1);
        assert!(matches!(
            loaded.rejected[..],
            [DateCodeError::QuarterOutOfRange { quarter: 5, .. }]
        ));
    }

    #[test]
    fn empty_payload_is_an_empty_series() {
        let source = FixedSource(Ok(RawObservations::default()));
        let request = FetchRequest::new(Indicator::Unemployment, "ES", None);
        let loaded = load_series(&source, &request).unwrap();
        assert!(loaded.series.is_empty());
        assert_eq!(loaded.series.frequency(), Frequency::Monthly);
    }

    #[test]
    fn no_valid_observations_is_not_an_error() {
        let source = FixedSource(Ok(raw(&["garbage"], &[("0:0", 1.0)])));
        let request = FetchRequest::new(Indicator::Inflation, "ES", None);
        let loaded = load_series(&source, &request).unwrap();
        assert!(loaded.series.is_empty());
        assert_eq!(loaded.rejected.len(), 1);
    }

    #[test]
    fn source_failure_surfaces_as_load_error() {
        let source = FixedSource(Err("truncated body"));
        let request = FetchRequest::new(Indicator::Gdp, "ES", None);
        let err = load_series(&source, &request).unwrap_err();
        assert!(err.to_string().contains("truncated body"));
    }

    #[test]
    fn frequency_follows_indicator() {
        let source = FixedSource(Ok(raw(&["2020-Q4"], &[("5", 27000.0)])));
        let gdp = load_series(&source, &FetchRequest::new(Indicator::Gdp, "ES", None)).unwrap();
        // Index 5 is not in the table; nothing resolves.
        assert!(gdp.series.is_empty());

        let source = FixedSource(Ok(raw(&["2020-Q4"], &[("0", 27000.0)])));
        let gdp = load_series(&source, &FetchRequest::new(Indicator::Gdp, "ES", None)).unwrap();
        assert_eq!(gdp.series.latest().unwrap().date, d(2020, 10));
    }
}
