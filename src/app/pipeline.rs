//! Shared dashboard workflow used by every CLI subcommand.
//!
//! load (3 indicators, concurrently) -> score on native series -> pick display
//! window -> filter / annualize for display
//!
//! A failed indicator is recorded and scored as an empty series; the run only
//! fails when no indicator could be loaded.

use crate::data::{CacheKey, FetchRequest, LoadedSeries, ObservationSource, SeriesCache, load_series};
use crate::domain::{Indicator, IndicatorSeries, RiskReport, YearRange};
use crate::error::AppError;
use crate::series::{aggregate_annual, filter_years, year_span};

/// Parameters of one dashboard run.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub geo: String,
    /// Retrieval window start year.
    pub since: Option<i32>,
    /// Display window bounds; a missing bound falls back to the data span.
    pub from: Option<i32>,
    pub to: Option<i32>,
    /// Show unemployment and inflation as annual means.
    pub annual: bool,
}

/// Outcome for a single indicator.
#[derive(Debug, Clone)]
pub struct IndicatorRun {
    pub indicator: Indicator,
    pub loaded: Option<LoadedSeries>,
    pub error: Option<String>,
    /// Series prepared for display (windowed, possibly annualized).
    pub display: IndicatorSeries,
}

impl IndicatorRun {
    /// Native series, or an empty one if loading failed.
    pub fn native(&self) -> IndicatorSeries {
        self.loaded
            .as_ref()
            .map(|l| l.series.clone())
            .unwrap_or_else(|| IndicatorSeries::empty(self.indicator.frequency()))
    }
}

/// All computed outputs of a dashboard run.
#[derive(Debug, Clone)]
pub struct DashboardRun {
    pub geo: String,
    pub source: &'static str,
    pub report: RiskReport,
    pub span: Option<YearRange>,
    pub window: Option<YearRange>,
    /// In scoring order: GDP, unemployment, inflation.
    pub indicators: Vec<IndicatorRun>,
}

impl DashboardRun {
    pub fn indicator(&self, indicator: Indicator) -> Option<&IndicatorRun> {
        self.indicators.iter().find(|r| r.indicator == indicator)
    }
}

/// Execute the dashboard pipeline against `source`, memoizing through `cache`.
pub fn run_dashboard(
    config: &DashboardConfig,
    source: &dyn ObservationSource,
    cache: &SeriesCache,
) -> Result<DashboardRun, AppError> {
    let load = |indicator: Indicator| {
        let request = FetchRequest::new(indicator, config.geo.clone(), config.since);
        let key = CacheKey::new(source.name(), &request);
        let result = cache.get_or_load(key, || load_series(source, &request));
        if let Err(err) = &result {
            tracing::warn!(indicator = indicator.slug(), error = %err, "indicator unavailable");
        }
        result
    };

    // Loads are independent of each other.
    let (gdp, (unemployment, inflation)) = rayon::join(
        || load(Indicator::Gdp),
        || rayon::join(|| load(Indicator::Unemployment), || load(Indicator::Inflation)),
    );

    let outcomes = [
        (Indicator::Gdp, gdp),
        (Indicator::Unemployment, unemployment),
        (Indicator::Inflation, inflation),
    ];

    if outcomes.iter().all(|(_, r)| r.is_err()) {
        let details: Vec<String> = outcomes
            .iter()
            .filter_map(|(ind, r)| r.as_ref().err().map(|e| format!("{}: {e}", ind.slug())))
            .collect();
        return Err(AppError::new(
            4,
            format!("No indicator could be loaded ({}).", details.join("; ")),
        ));
    }

    let mut indicators: Vec<IndicatorRun> = outcomes
        .into_iter()
        .map(|(indicator, result)| {
            let (loaded, error) = match result {
                Ok(loaded) => (Some(loaded), None),
                Err(err) => (None, Some(err.to_string())),
            };
            IndicatorRun {
                indicator,
                loaded,
                error,
                display: IndicatorSeries::empty(indicator.frequency()),
            }
        })
        .collect();

    let natives: Vec<IndicatorSeries> = indicators.iter().map(IndicatorRun::native).collect();
    let report = crate::risk::score(&natives[0], &natives[1], &natives[2]);

    let span = year_span(&natives);
    let window = resolve_window(config, span);

    for (run, native) in indicators.iter_mut().zip(&natives) {
        run.display = display_series(run.indicator, native, window, config.annual);
    }

    Ok(DashboardRun {
        geo: config.geo.clone(),
        source: source.name(),
        report,
        span,
        window,
        indicators,
    })
}

/// Explicit bounds win; otherwise the trailing five years of the data span.
pub fn resolve_window(config: &DashboardConfig, span: Option<YearRange>) -> Option<YearRange> {
    match (config.from, config.to, span) {
        (None, None, Some(span)) => Some(YearRange::default_window(span)),
        (None, None, None) => None,
        (from, to, span) => {
            let min = from.or(span.map(|s| s.min))?;
            let max = to.or(span.map(|s| s.max))?;
            Some(YearRange::new(min, max))
        }
    }
}

fn display_series(
    indicator: Indicator,
    native: &IndicatorSeries,
    window: Option<YearRange>,
    annual: bool,
) -> IndicatorSeries {
    let base = if annual && indicator != Indicator::Gdp {
        aggregate_annual(native)
    } else {
        native.clone()
    };
    match window {
        Some(w) => filter_years(&base, w.min, w.max),
        None => base,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{RawObservations, SampleSource};
    use crate::domain::Frequency;
    use crate::error::LoadError;

    fn config() -> DashboardConfig {
        DashboardConfig {
            geo: "ES".to_string(),
            since: None,
            from: None,
            to: None,
            annual: false,
        }
    }

    /// Serves GDP only; the monthly indicators fail.
    struct GdpOnly;

    impl ObservationSource for GdpOnly {
        fn name(&self) -> &'static str {
            "gdp-only"
        }

        fn fetch(&self, request: &FetchRequest) -> Result<RawObservations, LoadError> {
            match request.indicator {
                Indicator::Gdp => Ok(RawObservations::from_code_index(
                    [("2022-Q4".to_string(), 0), ("2023-Q1".to_string(), 1)],
                    vec![("0".to_string(), 7000.0), ("1".to_string(), 6900.0)],
                )),
                _ => Err(LoadError::Status {
                    source_name: "gdp-only",
                    status: 503,
                }),
            }
        }
    }

    struct AlwaysDown;

    impl ObservationSource for AlwaysDown {
        fn name(&self) -> &'static str {
            "down"
        }

        fn fetch(&self, _request: &FetchRequest) -> Result<RawObservations, LoadError> {
            Err(LoadError::Transport {
                source_name: "down",
                message: "connection refused".to_string(),
            })
        }
    }

    #[test]
    fn sample_run_scores_and_windows() {
        let source = SampleSource::new(3, 2010, 2024);
        let cache = SeriesCache::new();
        let run = run_dashboard(&config(), &source, &cache).unwrap();

        assert!(run.report.score <= 100);
        assert_eq!(run.span, Some(YearRange::new(2010, 2024)));
        assert_eq!(run.window, Some(YearRange::new(2019, 2024)));
        assert_eq!(cache.len(), 3);

        let cpi = run.indicator(Indicator::Inflation).unwrap();
        assert_eq!(cpi.display.len(), 6 * 12);
        assert_eq!(cpi.loaded.as_ref().unwrap().series.len(), 15 * 12);
    }

    #[test]
    fn partial_failure_still_scores_available_rules() {
        let cache = SeriesCache::new();
        let run = run_dashboard(&config(), &GdpOnly, &cache).unwrap();
        assert_eq!(run.report.score, 40);
        assert!(run.indicator(Indicator::Unemployment).unwrap().error.is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn total_failure_is_an_upstream_error() {
        let err = run_dashboard(&config(), &AlwaysDown, &SeriesCache::new()).unwrap_err();
        assert_eq!(err.exit_code(), 4);
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn annual_display_keeps_gdp_quarterly() {
        let source = SampleSource::new(3, 2018, 2020);
        let mut cfg = config();
        cfg.annual = true;
        let run = run_dashboard(&cfg, &source, &SeriesCache::new()).unwrap();

        let une = run.indicator(Indicator::Unemployment).unwrap();
        assert_eq!(une.display.frequency(), Frequency::Annual);
        assert_eq!(une.display.len(), 3);
        let gdp = run.indicator(Indicator::Gdp).unwrap();
        assert_eq!(gdp.display.frequency(), Frequency::Quarterly);
    }

    #[test]
    fn explicit_window_bounds() {
        let span = Some(YearRange::new(2000, 2024));
        let mut cfg = config();
        cfg.from = Some(2010);
        assert_eq!(resolve_window(&cfg, span), Some(YearRange::new(2010, 2024)));
        cfg.to = Some(2005);
        // Inverted windows are allowed and simply show nothing.
        assert_eq!(resolve_window(&cfg, span), Some(YearRange::new(2010, 2005)));
        cfg.from = None;
        cfg.to = None;
        assert_eq!(resolve_window(&cfg, None), None);
    }

    #[test]
    fn cached_series_are_reused_across_runs() {
        let source = SampleSource::new(3, 2018, 2020);
        let cache = SeriesCache::new();
        let first = run_dashboard(&config(), &source, &cache).unwrap();
        let second = run_dashboard(&config(), &source, &cache).unwrap();
        assert_eq!(first.report, second.report);
        assert_eq!(cache.len(), 3);
    }
}
