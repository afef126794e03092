//! Indicator retrieval and normalization.
//!
//! Every source produces the same post-retrieval shape (`RawObservations`):
//! a time-axis index → date-code table plus `(observation key, value)` pairs.
//! `loader` turns that shape into an `IndicatorSeries`; nothing downstream
//! knows which transport was used.

use std::collections::BTreeMap;

use crate::domain::{Frequency, Indicator};
use crate::error::LoadError;

pub mod cache;
pub mod eurostat;
pub mod jsonstat;
pub mod loader;
pub mod sample;
pub mod tsv;

pub use cache::{CacheKey, SeriesCache};
pub use eurostat::EurostatClient;
pub use loader::{LoadedSeries, build_series, load_series};
pub use sample::SampleSource;
pub use tsv::TsvDirSource;

/// What to retrieve: one indicator for one country, optionally from a start year.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchRequest {
    pub indicator: Indicator,
    pub geo: String,
    /// First calendar year of the retrieval window.
    pub since: Option<i32>,
}

impl FetchRequest {
    pub fn new(indicator: Indicator, geo: impl Into<String>, since: Option<i32>) -> Self {
        Self {
            indicator,
            geo: geo.into(),
            since,
        }
    }

    /// Dimension filters including `geo`.
    pub fn selector(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = self.indicator.filters().to_vec();
        out.push(("geo", self.geo.as_str()));
        out
    }
}

/// Anything that can produce raw observations for an indicator.
///
/// Implementations report transport and payload failures as `LoadError` and
/// do not retry.
pub trait ObservationSource: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch(&self, request: &FetchRequest) -> Result<RawObservations, LoadError>;
}

/// Retrieved observations before date parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawObservations {
    /// Time-axis index → date code.
    pub time_codes: BTreeMap<usize, String>,
    /// Observation key (colon-separated, last segment is the time index) → value.
    pub values: Vec<(String, f64)>,
}

impl RawObservations {
    /// Build from a date-code → time-index table, inverting it.
    pub fn from_code_index(
        code_index: impl IntoIterator<Item = (String, usize)>,
        values: Vec<(String, f64)>,
    ) -> Self {
        let time_codes = code_index.into_iter().map(|(code, idx)| (idx, code)).collect();
        Self { time_codes, values }
    }

    /// Date code for an observation key, if its trailing index is known.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        let idx = time_index_of(key)?;
        self.time_codes.get(&idx).map(String::as_str)
    }

    /// Drop periods (and their values) before `year`.
    ///
    /// Periods whose code does not start with a 4-digit year are kept; the
    /// loader will reject them later.
    pub fn retain_since(&mut self, year: i32) {
        self.time_codes
            .retain(|_, code| code_year(code).is_none_or(|y| y >= year));
        let codes = &self.time_codes;
        self.values.retain(|(key, _)| {
            time_index_of(key).is_some_and(|idx| codes.contains_key(&idx))
        });
    }
}

/// Trailing time-axis index of an observation key (`"0:3:17"` → `17`).
pub fn time_index_of(key: &str) -> Option<usize> {
    key.rsplit(':').next()?.trim().parse().ok()
}

/// Period code used for a retrieval window start.
pub fn since_period_code(frequency: Frequency, year: i32) -> String {
    match frequency {
        Frequency::Monthly => format!("{year:04}-01"),
        Frequency::Quarterly => format!("{year:04}-Q1"),
        Frequency::Annual => format!("{year:04}"),
    }
}

fn code_year(code: &str) -> Option<i32> {
    let head = code.get(..4)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}
