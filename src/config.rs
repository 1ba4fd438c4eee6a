use crate::api::DEFAULT_BASE_URL;
use crate::models::Metric;
use crate::query::DEFAULT_TOP_N;
use std::num::{NonZeroU32, NonZeroUsize};
use std::path::PathBuf;

pub const DEFAULT_DAYS: u32 = 30;
pub const MAP_STEM: &str = "covid_cases_map";
pub const TRENDS_STEM: &str = "covid_trends";

/// Image format of the rendered charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartFormat {
    #[default]
    Svg,
    Png,
}

impl ChartFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Svg => "svg",
            ChartFormat::Png => "png",
        }
    }
}

/// Settings of one run of the fixed report sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub base_url: String,
    pub days: NonZeroU32,
    pub top: NonZeroUsize,
    pub metric: Metric,
    pub out_dir: PathBuf,
    pub format: ChartFormat,
    pub width: u32,
    pub height: u32,
    /// Also write the map frame as CSV here.
    pub map_csv: Option<PathBuf>,
    /// Also write the country table as JSON here.
    pub countries_json: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            days: NonZeroU32::MIN.saturating_add(DEFAULT_DAYS - 1),
            top: NonZeroUsize::MIN.saturating_add(DEFAULT_TOP_N - 1),
            metric: Metric::Cases,
            out_dir: PathBuf::from("."),
            format: ChartFormat::Svg,
            width: 1000,
            height: 600,
            map_csv: None,
            countries_json: None,
        }
    }
}

impl RunConfig {
    /// Output path for a chart, e.g. `out_dir/covid_trends.svg`.
    pub fn chart_path(&self, stem: &str) -> PathBuf {
        self.out_dir
            .join(format!("{stem}.{}", self.format.extension()))
    }
}
