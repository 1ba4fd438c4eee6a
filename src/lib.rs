//! covid-tracker
//!
//! A small Rust library for retrieving, ranking, summarizing, and charting
//! COVID-19 statistics from the disease.sh API. Pairs with the `covid-tracker` CLI.
//!
//! ### Features
//! - Fetch the global snapshot, the per-country table and the historical series
//! - Top-N ranking of countries by any numeric metric
//! - Human-readable global summary with thousands grouping
//! - SVG/PNG cases map (log scale) and trend chart
//!
//! ### Example
//! ```no_run
//! use covid_tracker::Tracker;
//!
//! let mut tracker = Tracker::default();
//! if let Some(text) = tracker.summarize() {
//!     print!("{text}");
//! }
//! let top = tracker.top_n("deaths", 5)?;
//! println!("{:#?}", top);
//! # Ok::<(), covid_tracker::error::QueryError>(())
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod report;
pub mod storage;
pub mod tracker;
pub mod viz;

pub use api::{Client, CovidSource};
pub use cache::{CountryCache, CountryTable};
pub use error::{FetchError, QueryError};
pub use models::{CountryRecord, GlobalSnapshot, HistoricalSeries, Metric};
pub use tracker::Tracker;
