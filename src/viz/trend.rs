//! Line chart of the historical series.
//!
//! The x axis is the position of an observation in the series as the API
//! returned it; tick labels show the API's date key for that position.

use super::util::{choose_axis_scale, compute_left_label_area_px, office_color, y_tick_label};
use super::{ensure_fonts_registered, is_svg};
use crate::models::{HistoricalSeries, Timeline};
use anyhow::{Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::num::NonZeroU32;
use std::path::Path;

pub fn trend_title(days: NonZeroU32) -> String {
    format!("COVID-19 Trends (Last {days} Days)")
}

/// Render cases, deaths and recovered of `series` to `out_path` (`.svg` or `.png`).
///
/// `days` is the day count the series was requested for; it only feeds the title.
pub fn plot_trends<P: AsRef<Path>>(
    series: &HistoricalSeries,
    days: NonZeroU32,
    out_path: P,
    width: u32,
    height: u32,
) -> Result<()> {
    if series.is_empty() {
        return Err(anyhow!("no data to plot"));
    }
    ensure_fonts_registered();
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let title = trend_title(days);

    if is_svg(out_path) {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_trends(root, series, &title)
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_trends(root, series, &title)
    }
}

fn draw_trends<DB>(root: DrawingArea<DB, Shift>, series: &HistoricalSeries, title: &str) -> Result<()>
where
    DB: DrawingBackend,
{
    const Y_LABELS: usize = 10;

    let lines: [(&str, &Timeline); 3] = [
        ("Cases", &series.cases),
        ("Deaths", &series.deaths),
        ("Recovered", &series.recovered),
    ];

    let max_val = lines
        .iter()
        .flat_map(|(_, t)| t.iter().map(|p| p.count as f64))
        .fold(0.0f64, f64::max);
    let (yscale, scale_word) = choose_axis_scale(max_val);
    let y_axis_title = if scale_word.is_empty() {
        "Count".to_string()
    } else {
        format!("Count ({scale_word})")
    };
    let y_max = if max_val > 0.0 { max_val / yscale * 1.05 } else { 1.0 };
    let x_max = (series.len().saturating_sub(1)).max(1) as f64;

    let keys = series.keys();
    let x_label_fmt = |x: &f64| {
        let i = x.round();
        if i >= 0.0 && (i as usize) < keys.len() && (x - i).abs() < 1e-6 {
            keys[i as usize].to_string()
        } else {
            String::new()
        }
    };
    let y_label_fmt = |v: &f64| y_tick_label(*v);

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let left_label_width_px = compute_left_label_area_px(0.0, y_max, Y_LABELS, 12);
    let mut chart = ChartBuilder::on(&root)
        .margin(16)
        .caption(title, (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, left_label_width_px)
        .set_label_area_size(LabelAreaPosition::Bottom, 56)
        .build_cartesian_2d(0f64..x_max, 0f64..y_max)
        .map_err(|e| anyhow!("{:?}", e))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(y_axis_title)
        .x_labels(series.len().min(10))
        .y_labels(Y_LABELS)
        .x_label_formatter(&x_label_fmt)
        .y_label_formatter(&y_label_fmt)
        .label_style((FontFamily::SansSerif, 12))
        .axis_desc_style((FontFamily::SansSerif, 16))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    for (idx, (name, timeline)) in lines.iter().enumerate() {
        let color = office_color(idx);
        let style = ShapeStyle {
            color,
            filled: false,
            stroke_width: 2,
        };
        let points: Vec<(f64, f64)> = timeline
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.count as f64 / yscale))
            .collect();
        chart
            .draw_series(LineSeries::new(points, style))
            .map_err(|e| anyhow!("{:?}", e))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.85))
        .label_font((FontFamily::SansSerif, 14))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
