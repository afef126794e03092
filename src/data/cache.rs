//! In-memory memoization of loaded series.
//!
//! Entries never expire on their own; callers invalidate explicitly.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::data::{FetchRequest, LoadedSeries};
use crate::domain::Indicator;
use crate::error::LoadError;

/// Identifies one retrieval: source, indicator, country and window start.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub source: &'static str,
    pub indicator: Indicator,
    pub geo: String,
    pub since: Option<i32>,
}

impl CacheKey {
    pub fn new(source: &'static str, request: &FetchRequest) -> Self {
        Self {
            source,
            indicator: request.indicator,
            geo: request.geo.clone(),
            since: request.since,
        }
    }
}

/// Thread-safe series cache. Failed loads are never stored.
#[derive(Debug, Default)]
pub struct SeriesCache {
    inner: RwLock<HashMap<CacheKey, LoadedSeries>>,
}

impl SeriesCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<LoadedSeries> {
        let map = self.inner.read().unwrap_or_else(|e| e.into_inner());
        map.get(key).cloned()
    }

    pub fn insert(&self, key: CacheKey, loaded: LoadedSeries) {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.insert(key, loaded);
    }

    /// Return the cached entry or run `load` and store its success.
    pub fn get_or_load<F>(&self, key: CacheKey, load: F) -> Result<LoadedSeries, LoadError>
    where
        F: FnOnce() -> Result<LoadedSeries, LoadError>,
    {
        if let Some(hit) = self.get(&key) {
            tracing::info!(indicator = key.indicator.slug(), source = key.source, "series cache hit");
            return Ok(hit);
        }
        let loaded = load()?;
        self.insert(key, loaded.clone());
        Ok(loaded)
    }

    /// Drop one entry. Returns whether it was present.
    pub fn invalidate(&self, key: &CacheKey) -> bool {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.remove(key).is_some()
    }

    pub fn clear(&self) {
        let mut map = self.inner.write().unwrap_or_else(|e| e.into_inner());
        map.clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
