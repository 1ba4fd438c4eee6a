//! Synchronous client for the **disease.sh COVID-19 API (v3)**.
//!
//! Three fixed endpoints are used: `/all` (global snapshot), `/countries`
//! (per-country snapshot) and `/historical/all?lastdays=N` (time series).
//!
//! ### Notes
//! - Every call is a single blocking GET. There is no retry and no backoff.
//! - No request timeout is set: a hung endpoint blocks the caller.
//! - Non-2xx statuses are errors; bodies of failed responses are not read.
//!
//! Typical usage:
//! ```no_run
//! # use covid_tracker::api::{Client, CovidSource};
//! let client = Client::default();
//! let snapshot = client.global()?;
//! println!("{} cases", snapshot.cases);
//! # Ok::<(), covid_tracker::error::FetchError>(())
//! ```

use crate::error::FetchError;
use crate::models::{CountryRecord, GlobalSnapshot, HistoricalSeries};
use reqwest::blocking::Client as HttpClient;
use reqwest::redirect::Policy;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://disease.sh/v3/covid-19";

pub const GLOBAL_ENDPOINT: &str = "/all";
pub const COUNTRIES_ENDPOINT: &str = "/countries";

/// Relative path of the historical endpoint for the last `days` days.
pub fn historical_endpoint(days: NonZeroU32) -> String {
    format!("/historical/all?lastdays={days}")
}

/// Where the tracker gets its data from.
///
/// `Client` is the production implementation; tests substitute in-memory sources.
pub trait CovidSource {
    fn global(&self) -> Result<GlobalSnapshot, FetchError>;
    fn countries(&self) -> Result<Vec<CountryRecord>, FetchError>;
    fn historical(&self, days: NonZeroU32) -> Result<HistoricalSeries, FetchError>;
}

#[derive(Debug, Clone)]
pub struct Client {
    pub base_url: String,
    http: HttpClient,
}

impl Default for Client {
    fn default() -> Self {
        let http = HttpClient::builder()
            .timeout(None::<Duration>) // no deadline, blocking until the peer answers
            .redirect(Policy::limited(5)) // cap redirects
            .user_agent(concat!("covid-tracker/", env!("CARGO_PKG_VERSION"))) // set user agent
            .build()
            .expect("reqwest client build");
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            http,
        }
    }
}

impl Client {
    /// Client with default HTTP settings against another base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::from_http(base_url, Self::default().http)
    }

    /// Client using a caller-configured `reqwest` client (proxy settings, TLS roots, …).
    pub fn from_http(base_url: impl Into<String>, http: HttpClient) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    /// Absolute URL for a relative endpoint path.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// GET `base_url + endpoint` and parse the body as JSON.
    ///
    /// ### Errors
    /// - `Transport`: connection failure or the body could not be read
    /// - `Status`: any non-2xx response
    /// - `Decode`: the body is not JSON
    pub fn get_json(&self, endpoint: &str) -> Result<Value, FetchError> {
        let url = self.url(endpoint);
        log::debug!("GET {url}");
        let resp = self
            .http
            .get(&url)
            .send()
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }
        let body = resp.text().map_err(|source| FetchError::Transport {
            url: url.clone(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|source| FetchError::Decode { url, source })
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, FetchError> {
        let v = self.get_json(endpoint)?;
        serde_json::from_value(v).map_err(|source| FetchError::Decode {
            url: self.url(endpoint),
            source,
        })
    }
}

impl CovidSource for Client {
    fn global(&self) -> Result<GlobalSnapshot, FetchError> {
        self.get(GLOBAL_ENDPOINT)
    }

    fn countries(&self) -> Result<Vec<CountryRecord>, FetchError> {
        self.get(COUNTRIES_ENDPOINT)
    }

    fn historical(&self, days: NonZeroU32) -> Result<HistoricalSeries, FetchError> {
        self.get(&historical_endpoint(days))
    }
}
