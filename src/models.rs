use crate::error::QueryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Global aggregate returned by `/all`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSnapshot {
    /// Milliseconds since the epoch of the API's last update.
    #[serde(default, deserialize_with = "de_count")]
    pub updated: u64,
    #[serde(deserialize_with = "de_count")]
    pub cases: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub today_cases: u64,
    #[serde(deserialize_with = "de_count")]
    pub deaths: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub today_deaths: u64,
    #[serde(deserialize_with = "de_count")]
    pub recovered: u64,
    #[serde(default, deserialize_with = "de_count")]
    pub today_recovered: u64,
    #[serde(deserialize_with = "de_count")]
    pub active: u64,
    #[serde(deserialize_with = "de_count")]
    pub critical: u64,
    pub cases_per_one_million: f64,
    pub deaths_per_one_million: f64,
    #[serde(deserialize_with = "de_count")]
    pub tests: u64,
    pub tests_per_one_million: f64,
    #[serde(deserialize_with = "de_count")]
    pub population: u64,
    #[serde(deserialize_with = "de_count")]
    pub affected_countries: u64,
}

/// Nested `countryInfo` object of a `/countries` row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryInfo {
    #[serde(rename = "_id")]
    pub id: Option<i64>,
    pub iso2: Option<String>,
    pub iso3: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
    pub flag: Option<String>,
}

/// One row of the country table (one row = one country snapshot).
///
/// Every metric is optional: the API emits `null` for figures a country
/// stopped reporting. Views that need a metric go through
/// [`CountryRecord::value`] and fail loudly when it is absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryRecord {
    pub country: String,
    #[serde(default)]
    pub country_info: CountryInfo,
    pub continent: Option<String>,
    pub updated: Option<u64>,
    pub cases: Option<f64>,
    pub today_cases: Option<f64>,
    pub deaths: Option<f64>,
    pub today_deaths: Option<f64>,
    pub recovered: Option<f64>,
    pub today_recovered: Option<f64>,
    pub active: Option<f64>,
    pub critical: Option<f64>,
    pub cases_per_one_million: Option<f64>,
    pub deaths_per_one_million: Option<f64>,
    pub tests: Option<f64>,
    pub tests_per_one_million: Option<f64>,
    pub population: Option<f64>,
    pub active_per_one_million: Option<f64>,
    pub recovered_per_one_million: Option<f64>,
    pub critical_per_one_million: Option<f64>,
}

impl CountryRecord {
    /// Validated lookup of a named metric.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Cases => self.cases,
            Metric::TodayCases => self.today_cases,
            Metric::Deaths => self.deaths,
            Metric::TodayDeaths => self.today_deaths,
            Metric::Recovered => self.recovered,
            Metric::TodayRecovered => self.today_recovered,
            Metric::Active => self.active,
            Metric::Critical => self.critical,
            Metric::CasesPerOneMillion => self.cases_per_one_million,
            Metric::DeathsPerOneMillion => self.deaths_per_one_million,
            Metric::Tests => self.tests,
            Metric::TestsPerOneMillion => self.tests_per_one_million,
            Metric::Population => self.population,
            Metric::ActivePerOneMillion => self.active_per_one_million,
            Metric::RecoveredPerOneMillion => self.recovered_per_one_million,
            Metric::CriticalPerOneMillion => self.critical_per_one_million,
        }
    }

    pub fn iso3(&self) -> Option<&str> {
        self.country_info
            .iso3
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

/// Numeric columns of the country table that can be ranked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    Cases,
    TodayCases,
    Deaths,
    TodayDeaths,
    Recovered,
    TodayRecovered,
    Active,
    Critical,
    CasesPerOneMillion,
    DeathsPerOneMillion,
    Tests,
    TestsPerOneMillion,
    Population,
    ActivePerOneMillion,
    RecoveredPerOneMillion,
    CriticalPerOneMillion,
}

impl Metric {
    pub const ALL: [Metric; 16] = [
        Metric::Cases,
        Metric::TodayCases,
        Metric::Deaths,
        Metric::TodayDeaths,
        Metric::Recovered,
        Metric::TodayRecovered,
        Metric::Active,
        Metric::Critical,
        Metric::CasesPerOneMillion,
        Metric::DeathsPerOneMillion,
        Metric::Tests,
        Metric::TestsPerOneMillion,
        Metric::Population,
        Metric::ActivePerOneMillion,
        Metric::RecoveredPerOneMillion,
        Metric::CriticalPerOneMillion,
    ];

    /// JSON key used by the API, e.g. `casesPerOneMillion`.
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Cases => "cases",
            Metric::TodayCases => "todayCases",
            Metric::Deaths => "deaths",
            Metric::TodayDeaths => "todayDeaths",
            Metric::Recovered => "recovered",
            Metric::TodayRecovered => "todayRecovered",
            Metric::Active => "active",
            Metric::Critical => "critical",
            Metric::CasesPerOneMillion => "casesPerOneMillion",
            Metric::DeathsPerOneMillion => "deathsPerOneMillion",
            Metric::Tests => "tests",
            Metric::TestsPerOneMillion => "testsPerOneMillion",
            Metric::Population => "population",
            Metric::ActivePerOneMillion => "activePerOneMillion",
            Metric::RecoveredPerOneMillion => "recoveredPerOneMillion",
            Metric::CriticalPerOneMillion => "criticalPerOneMillion",
        }
    }

    /// Human label, matching the summary report wording where both exist.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Cases => "Total Cases",
            Metric::TodayCases => "Cases Today",
            Metric::Deaths => "Total Deaths",
            Metric::TodayDeaths => "Deaths Today",
            Metric::Recovered => "Total Recovered",
            Metric::TodayRecovered => "Recovered Today",
            Metric::Active => "Active Cases",
            Metric::Critical => "Critical Cases",
            Metric::CasesPerOneMillion => "Cases Per Million",
            Metric::DeathsPerOneMillion => "Deaths Per Million",
            Metric::Tests => "Tests",
            Metric::TestsPerOneMillion => "Tests Per Million",
            Metric::Population => "Population",
            Metric::ActivePerOneMillion => "Active Per Million",
            Metric::RecoveredPerOneMillion => "Recovered Per Million",
            Metric::CriticalPerOneMillion => "Critical Per Million",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Accepts the API key in any case, with or without `-`/`_` separators
/// (`casesPerOneMillion`, `cases-per-one-million`, `CASES_PER_ONE_MILLION`).
impl FromStr for Metric {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Metric::ALL
            .into_iter()
            .find(|m| m.key().to_lowercase() == wanted)
            .ok_or_else(|| QueryError::UnknownMetric(s.to_string()))
    }
}

/// One observation of a historical timeline, keyed as the API keys it (`M/D/YY`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub key: String,
    pub count: u64,
}

/// Ordered sequence of observations, in the order the API sent them.
pub type Timeline = Vec<TimelinePoint>;

/// Series returned by `/historical/all?lastdays=N`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HistoricalSeries {
    #[serde(default, deserialize_with = "de_timeline")]
    pub cases: Timeline,
    #[serde(default, deserialize_with = "de_timeline")]
    pub deaths: Timeline,
    #[serde(default, deserialize_with = "de_timeline")]
    pub recovered: Timeline,
}

impl HistoricalSeries {
    /// Number of positions in the series (the longest of the three timelines).
    pub fn len(&self) -> usize {
        self.cases
            .len()
            .max(self.deaths.len())
            .max(self.recovered.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Keys of the longest timeline, used to label positions.
    pub fn keys(&self) -> Vec<&str> {
        [&self.cases, &self.deaths, &self.recovered]
            .into_iter()
            .max_by_key(|t| t.len())
            .map(|t| t.iter().map(|p| p.key.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Visitor accepting a non-negative count as integer, float, or numeric string.
struct CountVisitor;

impl<'de> serde::de::Visitor<'de> for CountVisitor {
    type Value = u64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a non-negative number or numeric string")
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(v)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        u64::try_from(v).map_err(|_| E::custom("negative value for a count"))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        if v.is_finite() && v >= 0.0 {
            Ok(v.round() as u64)
        } else {
            Err(E::custom("count must be a finite, non-negative number"))
        }
    }

    fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        s.trim().parse::<u64>().map_err(E::custom)
    }

    // `null` counts as zero; the API uses it for figures that were never reported.
    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(0)
    }
}

/// Serde helper: parse a count from a JSON number, numeric string, or `null`.
fn de_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    deserializer.deserialize_any(CountVisitor)
}

struct Count(u64);

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(CountVisitor).map(Count)
    }
}

/// Serde helper: read a `{ "date": count, ... }` object into a `Timeline`,
/// keeping the entries in document order.
fn de_timeline<'de, D>(deserializer: D) -> Result<Timeline, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{MapAccess, Visitor};
    struct TimelineVisitor;

    impl<'de> Visitor<'de> for TimelineVisitor {
        type Value = Timeline;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "an object mapping dates to counts")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, Count(count))) = map.next_entry::<String, Count>()? {
                out.push(TimelinePoint { key, count });
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(TimelineVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_parses_api_and_cli_spellings() {
        assert_eq!("cases".parse::<Metric>().unwrap(), Metric::Cases);
        assert_eq!(
            "casesPerOneMillion".parse::<Metric>().unwrap(),
            Metric::CasesPerOneMillion
        );
        assert_eq!(
            "cases-per-one-million".parse::<Metric>().unwrap(),
            Metric::CasesPerOneMillion
        );
        assert_eq!(
            "TODAY_DEATHS".parse::<Metric>().unwrap(),
            Metric::TodayDeaths
        );
        assert_eq!(
            "vaccinations".parse::<Metric>(),
            Err(QueryError::UnknownMetric("vaccinations".into()))
        );
    }

    #[test]
    fn every_metric_round_trips_through_its_key() {
        for m in Metric::ALL {
            assert_eq!(m.key().parse::<Metric>().unwrap(), m);
        }
    }
}
