use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single GET against the API.
///
/// Callers in this crate never branch on the variant: every fetch error is
/// logged and turned into "no data". The variants exist so the diagnostic
/// says what actually went wrong.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("request to {url} failed with HTTP {status}")]
    Status { url: String, status: StatusCode },
    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised by derived views over the country table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("unknown metric `{0}`")]
    UnknownMetric(String),
    #[error("no country data available")]
    NoData,
}
