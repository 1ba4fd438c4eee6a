//! Cases map colored by `log10(cases)`.
//!
//! Countries are placed by their `countryInfo` centroid on an
//! equirectangular frame. Rows the log scale cannot represent are dropped
//! before the transform, never plotted as NaN/-inf.

use super::util::{normalize, viridis};
use super::{ensure_fonts_registered, is_svg};
use crate::models::CountryRecord;
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use serde::Serialize;
use std::path::Path;

pub const MAP_TITLE: &str = "Global COVID-19 Cases (Log Scale)";

/// Number of bands in the color bar.
const COLOR_BAR_STEPS: usize = 64;

/// One plottable country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethRow {
    pub iso3: String,
    pub country: String,
    pub lat: f64,
    pub long: f64,
    pub cases: f64,
    pub deaths: Option<f64>,
    pub recovered: Option<f64>,
    pub log_cases: f64,
}

/// Rows ready for the map plus how many source rows were left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChoroplethFrame {
    pub rows: Vec<ChoroplethRow>,
    pub dropped: usize,
}

impl ChoroplethFrame {
    /// Min and max of `log_cases`, or `None` when the frame is empty.
    pub fn log_range(&self) -> Option<(f64, f64)> {
        let mut it = self.rows.iter().map(|r| r.log_cases);
        let first = it.next()?;
        Some(it.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}

/// Build the map frame from the country table.
///
/// A row is dropped when `cases` is missing or `<= 0`, or when it has no
/// iso3 code or coordinates.
pub fn choropleth_frame(rows: &[CountryRecord]) -> ChoroplethFrame {
    let mut frame = ChoroplethFrame::default();
    for r in rows {
        let info = &r.country_info;
        match (r.cases, r.iso3(), info.lat, info.long) {
            (Some(cases), Some(iso3), Some(lat), Some(long)) if cases > 0.0 && cases.is_finite() => {
                frame.rows.push(ChoroplethRow {
                    iso3: iso3.to_string(),
                    country: r.country.clone(),
                    lat,
                    long,
                    cases,
                    deaths: r.deaths,
                    recovered: r.recovered,
                    log_cases: cases.log10(),
                });
            }
            _ => frame.dropped += 1,
        }
    }
    frame
}

/// Render the cases map for `rows` to `out_path` (`.svg` or `.png`).
pub fn plot_choropleth<P: AsRef<Path>>(
    rows: &[CountryRecord],
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    let frame = choropleth_frame(rows);
    if frame.dropped > 0 {
        log::warn!(
            "cases map: dropped {} of {} countries without positive cases, iso3 code or coordinates",
            frame.dropped,
            rows.len()
        );
    }
    let (lo, hi) = frame.log_range().ok_or_else(|| anyhow!("no data to plot"))?;
    let (lo, hi) = if (hi - lo).abs() < f64::EPSILON {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    };

    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();

    if is_svg(out_path) {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_map(root, &frame, lo, hi)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_map(root, &frame, lo, hi)
    }
}

fn draw_map<DB>(root: DrawingArea<DB, Shift>, frame: &ChoroplethFrame, lo: f64, hi: f64) -> Result<()>
where
    DB: DrawingBackend,
{
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let (map_area, bar_area) = root.split_horizontally((88).percent_width());

    let mut chart = ChartBuilder::on(&map_area)
        .margin(16)
        .caption(MAP_TITLE, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, 48)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(-180f64..180f64, -90f64..90f64)
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .configure_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .x_labels(13)
        .y_labels(7)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    // Smaller countries first so large markers stay on top.
    let mut rows: Vec<&ChoroplethRow> = frame.rows.iter().collect();
    rows.sort_by(|a, b| a.log_cases.total_cmp(&b.log_cases));

    chart
        .draw_series(rows.iter().map(|r| {
            let t = normalize(r.log_cases, lo, hi);
            let radius = 3 + (t * 6.0).round() as i32;
            Circle::new((r.long, r.lat), radius, viridis(t).mix(0.85).filled())
        }))
        .map_err(|e| anyhow!("{:?}", e))?;

    draw_color_bar(&bar_area, lo, hi)?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

fn draw_color_bar<DB>(area: &DrawingArea<DB, Shift>, lo: f64, hi: f64) -> Result<()>
where
    DB: DrawingBackend,
{
    let mut bar = ChartBuilder::on(area)
        .margin_top(56)
        .margin_bottom(56)
        .margin_right(12)
        .set_label_area_size(LabelAreaPosition::Left, 44)
        .build_cartesian_2d(0f64..1f64, lo..hi)
        .map_err(|e| anyhow!("{:?}", e))?;

    let tick_fmt = |v: &f64| format!("{v:.1}");
    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .y_labels(6)
        .y_label_formatter(&tick_fmt)
        .y_desc("log10(cases)")
        .label_style((FontFamily::SansSerif, 11))
        .axis_desc_style((FontFamily::SansSerif, 12))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let step = (hi - lo) / COLOR_BAR_STEPS as f64;
    bar.draw_series((0..COLOR_BAR_STEPS).map(|i| {
        let y0 = lo + step * i as f64;
        let t = (i as f64 + 0.5) / COLOR_BAR_STEPS as f64;
        Rectangle::new([(0.0, y0), (1.0, y0 + step)], viridis(t).filled())
    }))
    .map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
