//! Environment-driven settings.
//!
//! `.env` is loaded first (if present); CLI flags override these values.

use std::path::PathBuf;
use std::time::Duration;

use crate::data::eurostat::DEFAULT_BASE_URL;
use crate::error::AppError;

pub const DEFAULT_GEO: &str = "ES";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: String,
    pub geo: String,
    pub timeout: Duration,
    pub tsv_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            geo: DEFAULT_GEO.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            tsv_dir: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let timeout = match non_empty("DASHONOMICS_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    AppError::new(2, format!("Invalid DASHONOMICS_TIMEOUT_SECS '{raw}': expected seconds."))
                })?;
                Duration::from_secs(secs)
            }
            None => defaults.timeout,
        };

        Ok(Self {
            base_url: non_empty("EUROSTAT_BASE_URL").unwrap_or(defaults.base_url),
            geo: non_empty("DASHONOMICS_GEO")
                .map(|g| g.trim().to_uppercase())
                .unwrap_or(defaults.geo),
            timeout,
            tsv_dir: non_empty("DASHONOMICS_TSV_DIR").map(PathBuf::from),
        })
    }
}
