//! Pure transformations over loaded series: year filtering and annual aggregation.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};

use crate::domain::{Frequency, IndicatorPoint, IndicatorSeries, YearRange};

/// Keep the points whose calendar year lies in `[year_min, year_max]`.
///
/// An inverted range yields an empty series.
pub fn filter_years(series: &IndicatorSeries, year_min: i32, year_max: i32) -> IndicatorSeries {
    let range = YearRange::new(year_min, year_max);
    let points = series
        .points()
        .iter()
        .filter(|p| range.contains(p.date.year()))
        .copied()
        .collect();
    IndicatorSeries::new(series.frequency(), points)
}

/// Calendar-year span covered by all non-empty `series`.
pub fn year_span<'a>(series: impl IntoIterator<Item = &'a IndicatorSeries>) -> Option<YearRange> {
    series
        .into_iter()
        .filter_map(|s| Some(YearRange::new(s.first_year()?, s.last_year()?)))
        .reduce(|a, b| YearRange::new(a.min.min(b.min), a.max.max(b.max)))
}

/// Average each calendar year into one point dated January 1st.
pub fn aggregate_annual(series: &IndicatorSeries) -> IndicatorSeries {
    let mut groups: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
    for p in series.points() {
        let entry = groups.entry(p.date.year()).or_insert((0.0, 0));
        entry.0 += p.value;
        entry.1 += 1;
    }

    let points = groups
        .into_iter()
        .filter_map(|(year, (sum, n))| {
            let date = NaiveDate::from_ymd_opt(year, 1, 1)?;
            Some(IndicatorPoint::new(date, sum / n as f64))
        })
        .collect();

    IndicatorSeries::new(Frequency::Annual, points)
}
