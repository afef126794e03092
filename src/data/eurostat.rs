//! Eurostat dissemination API (JSON-stat) client.

use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::Settings;
use crate::data::jsonstat::JsonStatPayload;
use crate::data::{FetchRequest, ObservationSource, RawObservations, since_period_code};
use crate::error::{AppError, LoadError};

pub const DEFAULT_BASE_URL: &str = "https://ec.europa.eu/eurostat/api/dissemination/statistics/1.0/data";

const SOURCE_NAME: &str = "eurostat";

pub struct EurostatClient {
    client: Client,
    base_url: String,
}

impl EurostatClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::new(2, format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        Self::new(settings.base_url.clone(), settings.timeout)
    }

    /// Dataset URL for a request.
    pub fn url(&self, request: &FetchRequest) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            request.indicator.dataset()
        )
    }

    /// Query parameters: dimension filters, geo, optional window start, format.
    pub fn query(&self, request: &FetchRequest) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = request
            .selector()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        if let Some(year) = request.since {
            params.push((
                "sinceTimePeriod".to_string(),
                since_period_code(request.indicator.frequency(), year),
            ));
        }
        params.push(("format".to_string(), "JSON".to_string()));
        params.push(("lang".to_string(), "EN".to_string()));
        params
    }
}

impl ObservationSource for EurostatClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn fetch(&self, request: &FetchRequest) -> Result<RawObservations, LoadError> {
        let url = self.url(request);
        tracing::debug!(%url, indicator = request.indicator.slug(), "requesting dataset");

        let resp = self
            .client
            .get(&url)
            .query(&self.query(request))
            .send()
            .map_err(|e| LoadError::Transport {
                source_name: SOURCE_NAME,
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(LoadError::Status {
                source_name: SOURCE_NAME,
                status: resp.status().as_u16(),
            });
        }

        let body: JsonStatPayload = resp.json().map_err(|e| LoadError::Payload {
            source_name: SOURCE_NAME,
            message: e.to_string(),
        })?;

        Ok(body.into_raw())
    }
}
