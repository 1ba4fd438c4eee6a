mod common;

use common::{COUNTRIES_JSON, GLOBAL_JSON, closed_base_url, local_client, serve};
use covid_tracker::models::{CountryRecord, GlobalSnapshot, HistoricalSeries};
use covid_tracker::query::RankedRow;
use covid_tracker::{CovidSource, FetchError, Metric, QueryError, Tracker};
use reqwest::StatusCode;
use std::cell::{Cell, RefCell};
use std::num::NonZeroU32;

/// In-memory source that serves a queue of `/countries` outcomes.
#[derive(Default)]
struct StubSource {
    countries: RefCell<Vec<Option<Vec<CountryRecord>>>>,
    country_calls: Cell<usize>,
}

impl StubSource {
    fn with_countries(outcomes: Vec<Option<Vec<CountryRecord>>>) -> Self {
        Self {
            countries: RefCell::new(outcomes),
            country_calls: Cell::new(0),
        }
    }
}

fn unavailable(endpoint: &str) -> FetchError {
    FetchError::Status {
        url: format!("http://stub{endpoint}"),
        status: StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl CovidSource for StubSource {
    fn global(&self) -> Result<GlobalSnapshot, FetchError> {
        Err(unavailable("/all"))
    }

    fn countries(&self) -> Result<Vec<CountryRecord>, FetchError> {
        self.country_calls.set(self.country_calls.get() + 1);
        let mut queue = self.countries.borrow_mut();
        let next = if queue.len() > 1 {
            queue.remove(0)
        } else {
            queue.first().cloned().flatten()
        };
        next.ok_or_else(|| unavailable("/countries"))
    }

    fn historical(&self, _days: NonZeroU32) -> Result<HistoricalSeries, FetchError> {
        Err(unavailable("/historical/all"))
    }
}

fn row(country: &str, cases: f64) -> CountryRecord {
    CountryRecord {
        country: country.into(),
        cases: Some(cases),
        ..Default::default()
    }
}

#[test]
fn top_n_materializes_lazily_once() {
    let stub = StubSource::with_countries(vec![Some(vec![
        row("A", 10.0),
        row("B", 30.0),
        row("C", 20.0),
    ])]);
    let mut tracker = Tracker::with_source(stub);
    assert!(!tracker.cache().is_populated());

    let top = tracker.top_n("cases", 2).unwrap();
    assert_eq!(
        top,
        vec![
            RankedRow { country: "B".into(), value: Some(30.0) },
            RankedRow { country: "C".into(), value: Some(20.0) },
        ]
    );
    tracker.top_n("cases", 1).unwrap();
    assert_eq!(tracker.source().country_calls.get(), 1);
    assert_eq!(tracker.cache().fetch_attempts(), 1);
}

#[test]
fn failed_materialization_reports_no_data() {
    let mut tracker = Tracker::with_source(StubSource::with_countries(vec![None]));
    assert_eq!(tracker.top_n("cases", 10), Err(QueryError::NoData));
    assert_eq!(tracker.source().country_calls.get(), 1);
    assert!(!tracker.cache().is_populated());
}

#[test]
fn unknown_metric_is_rejected_before_fetching() {
    let mut tracker = Tracker::with_source(StubSource::with_countries(vec![Some(vec![row("A", 1.0)])]));
    assert_eq!(
        tracker.top_n("vaccinations", 3),
        Err(QueryError::UnknownMetric("vaccinations".into()))
    );
    assert_eq!(tracker.source().country_calls.get(), 0);
}

#[test]
fn refresh_replaces_the_cached_table() {
    let stub = StubSource::with_countries(vec![
        Some(vec![row("A", 1.0), row("B", 2.0)]),
        Some(vec![row("C", 3.0)]),
    ]);
    let mut tracker = Tracker::with_source(stub);
    assert_eq!(tracker.refresh().unwrap().len(), 2);
    assert_eq!(tracker.refresh().unwrap().rows, vec![row("C", 3.0)]);
    // get_or_fetch serves the cache without another request
    assert_eq!(tracker.get_or_fetch().unwrap().len(), 1);
    assert_eq!(tracker.source().country_calls.get(), 2);
}

#[test]
fn failed_refresh_clears_previous_table() {
    let stub = StubSource::with_countries(vec![Some(vec![row("A", 1.0)]), None]);
    let mut tracker = Tracker::with_source(stub);
    assert!(tracker.refresh().is_some());
    assert!(tracker.refresh().is_none());
    assert!(tracker.cache().get().is_none());
}

#[test]
fn refresh_is_idempotent_for_unchanged_data() {
    let (base, _requests) = serve(vec![
        (200, COUNTRIES_JSON.into()),
        (200, COUNTRIES_JSON.into()),
    ]);
    let mut tracker = Tracker::with_source(local_client(&base));
    let first = tracker.refresh().cloned().unwrap();
    let second = tracker.refresh().cloned().unwrap();
    assert_eq!(first.rows, second.rows);
    assert_eq!(first.len(), 3);
}

#[test]
fn summarize_formats_fetched_snapshot() {
    let (base, _requests) = serve(vec![(200, GLOBAL_JSON.into())]);
    let tracker = Tracker::with_source(local_client(&base));
    let text = tracker.summarize().unwrap();
    assert!(text.contains("Total Cases: 1,234,567\n"));
}

#[test]
fn failed_fetches_degrade_to_none() {
    let mut tracker = Tracker::with_source(local_client(&closed_base_url()));
    assert!(tracker.summarize().is_none());
    assert!(tracker.fetch_historical(NonZeroU32::new(30).unwrap()).is_none());
    assert!(tracker.refresh().is_none());
    assert_eq!(tracker.top_n_by(Metric::Deaths, 5), Err(QueryError::NoData));
}

#[test]
fn charts_are_skipped_without_data() {
    let dir = tempfile::tempdir().unwrap();
    let mut tracker = Tracker::with_source(StubSource::with_countries(vec![None]));
    let map = dir.path().join("map.svg");
    let trends = dir.path().join("trends.svg");
    assert!(!tracker.render_cases_map(&map, 800, 480).unwrap());
    assert!(!tracker
        .render_trends(NonZeroU32::new(30).unwrap(), &trends, 800, 480)
        .unwrap());
    assert!(!map.exists());
    assert!(!trends.exists());
}
