use anyhow::Result;
use clap::{Parser, ValueEnum};
use covid_tracker::config::{ChartFormat, MAP_STEM, RunConfig, TRENDS_STEM};
use covid_tracker::query::render_table;
use covid_tracker::{Metric, QueryError, Tracker, storage, viz};
use std::num::{NonZeroU32, NonZeroUsize};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "covid-tracker",
    version,
    about = "Summarize, rank & chart COVID-19 statistics from disease.sh"
)]
struct Cli {
    /// API base URL.
    #[arg(long, default_value = covid_tracker::api::DEFAULT_BASE_URL)]
    base_url: String,
    /// Number of days for the trend chart.
    #[arg(long, default_value = "30")]
    days: NonZeroU32,
    /// How many countries to list in the ranking.
    #[arg(long, default_value = "10")]
    top: NonZeroUsize,
    /// Metric to rank countries by (API key, e.g. cases, deaths, casesPerOneMillion).
    #[arg(long, default_value = "cases")]
    metric: Metric,
    /// Directory the charts are written to.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Chart image format.
    #[arg(long, value_enum, default_value_t = ImageFormat::Svg)]
    format: ImageFormat,
    /// Width of the charts (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the charts (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
    /// Also save the map data (iso3, cases, log scale, …) as CSV.
    #[arg(long)]
    map_csv: Option<PathBuf>,
    /// Also save the per-country table as JSON.
    #[arg(long)]
    countries_json: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ImageFormat {
    Svg,
    Png,
}

impl From<Cli> for RunConfig {
    fn from(cli: Cli) -> Self {
        RunConfig {
            base_url: cli.base_url,
            days: cli.days,
            top: cli.top,
            metric: cli.metric,
            out_dir: cli.out_dir,
            format: match cli.format {
                ImageFormat::Svg => ChartFormat::Svg,
                ImageFormat::Png => ChartFormat::Png,
            },
            width: cli.width,
            height: cli.height,
            map_csv: cli.map_csv,
            countries_json: cli.countries_json,
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let config = RunConfig::from(Cli::parse());
    run(&config);
    Ok(())
}

/// Summary, cases map, trend chart, ranking, in that order.
/// Individual failures are logged and never stop the sequence.
fn run(config: &RunConfig) {
    let mut tracker = Tracker::with_base_url(config.base_url.as_str());

    if let Some(text) = tracker.summarize() {
        print!("{text}");
    }

    let map_path = config.chart_path(MAP_STEM);
    match tracker.render_cases_map(&map_path, config.width, config.height) {
        Ok(true) => eprintln!("Wrote cases map to {}", map_path.display()),
        Ok(false) => {}
        Err(e) => log::error!("could not render cases map: {e:#}"),
    }

    let trends_path = config.chart_path(TRENDS_STEM);
    match tracker.render_trends(config.days, &trends_path, config.width, config.height) {
        Ok(true) => eprintln!("Wrote trend chart to {}", trends_path.display()),
        Ok(false) => {}
        Err(e) => log::error!("could not render trend chart: {e:#}"),
    }

    export(&tracker, config);

    println!(
        "\nTop {} Countries by {}:",
        config.top,
        config.metric.label()
    );
    match tracker.top_n_by(config.metric, config.top.get()) {
        Ok(rows) => print!("{}", render_table(&rows, config.metric)),
        Err(QueryError::NoData) => println!("No country data available."),
        Err(e) => log::error!("could not rank countries: {e}"),
    }
}

/// Optional file exports of the cached country table.
fn export(tracker: &Tracker, config: &RunConfig) {
    let Some(table) = tracker.cache().get() else {
        return;
    };
    if let Some(path) = config.map_csv.as_ref() {
        let frame = viz::choropleth_frame(&table.rows);
        match storage::save_choropleth_csv(&frame, path) {
            Ok(()) => eprintln!("Saved {} map rows to {}", frame.rows.len(), path.display()),
            Err(e) => log::error!("could not save map data: {e:#}"),
        }
    }
    if let Some(path) = config.countries_json.as_ref() {
        match storage::save_countries_json(table, path) {
            Ok(()) => eprintln!("Saved {} countries to {}", table.len(), path.display()),
            Err(e) => log::error!("could not save country table: {e:#}"),
        }
    }
}
