//! The tracker: fetches, caches, ranks, summarizes and charts.
//!
//! Every fetch is best-effort. A failure is logged once, here, and the
//! caller gets `None`; nothing in this module turns a failed fetch into an
//! error of its own.

use crate::api::{Client, CovidSource};
use crate::cache::{CountryCache, CountryTable};
use crate::error::{FetchError, QueryError};
use crate::models::{GlobalSnapshot, HistoricalSeries, Metric};
use crate::query::{self, RankedRow};
use crate::report;
use crate::viz;
use anyhow::Result;
use std::num::NonZeroU32;
use std::path::Path;

/// Log a failed fetch and degrade it to `None`.
fn soft<T>(what: &str, result: Result<T, FetchError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            log::error!("Error fetching {what}: {e}");
            None
        }
    }
}

#[derive(Debug)]
pub struct Tracker<S = Client> {
    source: S,
    cache: CountryCache,
}

impl Default for Tracker<Client> {
    fn default() -> Self {
        Self::with_source(Client::default())
    }
}

impl Tracker<Client> {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_source(Client::with_base_url(base_url))
    }
}

impl<S: CovidSource> Tracker<S> {
    pub fn with_source(source: S) -> Self {
        Self {
            source,
            cache: CountryCache::default(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &CountryCache {
        &self.cache
    }

    /// Current global snapshot, or `None` if the fetch failed.
    pub fn fetch_global(&self) -> Option<GlobalSnapshot> {
        soft("global data", self.source.global())
    }

    /// Historical series for the last `days` days, or `None` if the fetch failed.
    pub fn fetch_historical(&self, days: NonZeroU32) -> Option<HistoricalSeries> {
        soft("historical data", self.source.historical(days))
    }

    /// Fetch `/countries` and replace the cached table with the result.
    ///
    /// On failure the cache is left empty and `None` is returned.
    pub fn refresh(&mut self) -> Option<&CountryTable> {
        let table = soft("country data", self.source.countries()).map(CountryTable::new);
        if let Some(t) = &table {
            log::debug!("country table refreshed: {} rows at {}", t.len(), t.fetched_at);
        }
        self.cache.store(table);
        self.cache.get()
    }

    /// Cached table, fetching it once if the cache is empty.
    pub fn get_or_fetch(&mut self) -> Option<&CountryTable> {
        if !self.cache.is_populated() {
            self.refresh();
        }
        self.cache.get()
    }

    /// Top `n` countries by the metric named `metric` (API key, e.g. `"cases"`).
    pub fn top_n(&mut self, metric: &str, n: usize) -> Result<Vec<RankedRow>, QueryError> {
        let metric: Metric = metric.parse()?;
        self.top_n_by(metric, n)
    }

    /// Top `n` countries by `metric`, materializing the table if needed.
    ///
    /// Returns `QueryError::NoData` when the table cannot be fetched.
    pub fn top_n_by(&mut self, metric: Metric, n: usize) -> Result<Vec<RankedRow>, QueryError> {
        let table = self.get_or_fetch().ok_or(QueryError::NoData)?;
        Ok(query::top_n(&table.rows, metric, n))
    }

    /// Formatted global summary, or `None` if the snapshot could not be fetched.
    pub fn summarize(&self) -> Option<String> {
        self.fetch_global().map(|g| report::summary_text(&g))
    }

    /// Render the cases map from the cached table (fetching it if needed).
    ///
    /// Returns `Ok(false)` when there is no table to draw.
    pub fn render_cases_map<P: AsRef<Path>>(&mut self, out_path: P, width: u32, height: u32) -> Result<bool> {
        let Some(table) = self.get_or_fetch() else {
            return Ok(false);
        };
        viz::plot_choropleth(&table.rows, out_path, width, height)?;
        Ok(true)
    }

    /// Fetch the last `days` days and render the trend chart.
    ///
    /// Returns `Ok(false)` when the series could not be fetched.
    pub fn render_trends<P: AsRef<Path>>(
        &self,
        days: NonZeroU32,
        out_path: P,
        width: u32,
        height: u32,
    ) -> Result<bool> {
        let Some(series) = self.fetch_historical(days) else {
            return Ok(false);
        };
        viz::plot_trends(&series, days, out_path, width, height)?;
        Ok(true)
    }
}
