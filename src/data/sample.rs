//! Synthetic indicator observations for offline runs.
//!
//! Each indicator is a seeded random walk emitted in the same raw shape a
//! statistics API returns, so it goes through the regular loader.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::{FetchRequest, ObservationSource, RawObservations};
use crate::domain::{Frequency, Indicator, format_date_code};
use crate::error::LoadError;

const SOURCE_NAME: &str = "sample";

/// Random-walk parameters per indicator.
struct WalkSpec {
    start: f64,
    drift: f64,
    sigma: f64,
    floor: f64,
    decimals: i32,
}

fn walk_spec(indicator: Indicator) -> WalkSpec {
    match indicator {
        // Multiplicative: drift/sigma are per-quarter log changes.
        Indicator::Gdp => WalkSpec {
            start: 6000.0,
            drift: 0.004,
            sigma: 0.012,
            floor: 1000.0,
            decimals: 1,
        },
        Indicator::Inflation => WalkSpec {
            start: 100.0,
            drift: 0.15,
            sigma: 0.4,
            floor: 50.0,
            decimals: 2,
        },
        Indicator::Unemployment => WalkSpec {
            start: 14.0,
            drift: -0.03,
            sigma: 0.18,
            floor: 2.0,
            decimals: 1,
        },
    }
}

/// Deterministic synthetic source covering `first_year..=last_year`.
#[derive(Debug, Clone)]
pub struct SampleSource {
    seed: u64,
    first_year: i32,
    last_year: i32,
}

impl SampleSource {
    pub fn new(seed: u64, first_year: i32, last_year: i32) -> Self {
        Self {
            seed,
            first_year,
            last_year,
        }
    }

    fn rng_for(&self, request: &FetchRequest) -> StdRng {
        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        request.indicator.hash(&mut hasher);
        request.geo.hash(&mut hasher);
        StdRng::seed_from_u64(hasher.finish())
    }

    fn period_starts(&self, frequency: Frequency) -> Vec<chrono::NaiveDate> {
        let step = match frequency {
            Frequency::Monthly => 1,
            Frequency::Quarterly => 3,
            Frequency::Annual => 12,
        };
        (self.first_year..=self.last_year)
            .flat_map(|year| {
                (1..=12)
                    .step_by(step)
                    .filter_map(move |month| chrono::NaiveDate::from_ymd_opt(year, month as u32, 1))
            })
            .collect()
    }
}

impl ObservationSource for SampleSource {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn fetch(&self, request: &FetchRequest) -> Result<RawObservations, LoadError> {
        let spec = walk_spec(request.indicator);
        let normal = Normal::new(spec.drift, spec.sigma).map_err(|e| LoadError::Payload {
            source_name: SOURCE_NAME,
            message: format!("noise distribution error: {e}"),
        })?;
        let mut rng = self.rng_for(request);
        let frequency = request.indicator.frequency();
        let scale = 10f64.powi(spec.decimals);

        let mut level = spec.start;
        let mut time_codes = std::collections::BTreeMap::new();
        let mut values = Vec::new();
        for (idx, date) in self.period_starts(frequency).into_iter().enumerate() {
            let shock = normal.sample(&mut rng);
            level = match request.indicator {
                Indicator::Gdp => level * shock.exp(),
                _ => level + shock,
            }
            .max(spec.floor);

            time_codes.insert(idx, format_date_code(frequency, date));
            values.push((format!("0:0:{idx}"), (level * scale).round() / scale));
        }

        let mut raw = RawObservations { time_codes, values };
        if let Some(year) = request.since {
            raw.retain_since(year);
        }
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::load_series;

    #[test]
    fn same_seed_same_observations() {
        let source = SampleSource::new(7, 2018, 2020);
        let request = FetchRequest::new(Indicator::Inflation, "ES", None);
        assert_eq!(source.fetch(&request).unwrap(), source.fetch(&request).unwrap());
    }

    #[test]
    fn indicators_get_independent_walks() {
        let source = SampleSource::new(7, 2018, 2020);
        let cpi = source.fetch(&FetchRequest::new(Indicator::Inflation, "ES", None)).unwrap();
        let une = source.fetch(&FetchRequest::new(Indicator::Unemployment, "ES", None)).unwrap();
        assert_ne!(cpi.values, une.values);
    }

    #[test]
    fn frequency_sets_period_count() {
        let source = SampleSource::new(1, 2019, 2020);
        let gdp = load_series(&source, &FetchRequest::new(Indicator::Gdp, "ES", None)).unwrap();
        assert_eq!(gdp.series.len(), 8);
        assert!(gdp.rejected.is_empty());

        let cpi = load_series(&source, &FetchRequest::new(Indicator::Inflation, "ES", None)).unwrap();
        assert_eq!(cpi.series.len(), 24);
    }

    #[test]
    fn window_start_is_honoured() {
        let source = SampleSource::new(1, 2015, 2020);
        let loaded = load_series(
            &source,
            &FetchRequest::new(Indicator::Unemployment, "ES", Some(2019)),
        )
        .unwrap();
        assert_eq!(loaded.series.first_year(), Some(2019));
        assert_eq!(loaded.series.len(), 24);
    }

    #[test]
    fn values_respect_floor() {
        let source = SampleSource::new(99, 2000, 2024);
        let raw = source.fetch(&FetchRequest::new(Indicator::Unemployment, "ES", None)).unwrap();
        assert!(raw.values.iter().all(|(_, v)| *v >= 2.0));
    }
}
