use crate::models::{CountryRecord, Metric};
use crate::report::format_number;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::Write;

pub const DEFAULT_TOP_N: usize = 10;

/// Cell text for a row without a value.
pub const MISSING: &str = "N/A";

/// Projection of a country row onto `country` and one metric.
///
/// `value` is `None` when the API sent `null` for the metric on that row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedRow {
    pub country: String,
    pub value: Option<f64>,
}

/// The `n` rows with the largest `metric`, descending.
///
/// Rows without a value rank after every row that has one. Ties keep the
/// order in which the rows appear in `rows` (stable sort).
/// Returns fewer than `n` rows when the table is smaller, and an empty vec for `n == 0`.
pub fn top_n(rows: &[CountryRecord], metric: Metric, n: usize) -> Vec<RankedRow> {
    let mut ranked: Vec<RankedRow> = rows
        .iter()
        .map(|r| RankedRow {
            country: r.country.clone(),
            value: r.value(metric),
        })
        .collect();
    ranked.sort_by(|a, b| match (a.value, b.value) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    ranked.truncate(n);
    ranked
}

/// Aligned text table with a 1-based rank, the country and the metric column.
pub fn render_table(rows: &[RankedRow], metric: Metric) -> String {
    let values: Vec<String> = rows
        .iter()
        .map(|r| r.value.map_or_else(|| MISSING.to_string(), format_number))
        .collect();
    let country_w = rows
        .iter()
        .map(|r| r.country.chars().count())
        .chain(std::iter::once("country".len()))
        .max()
        .unwrap_or(0);
    let value_w = values
        .iter()
        .map(|v| v.len())
        .chain(std::iter::once(metric.key().len()))
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<country_w$}  {:>value_w$}",
        "",
        "country",
        metric.key()
    );
    for (i, (row, value)) in rows.iter().zip(&values).enumerate() {
        let _ = writeln!(
            out,
            "{:>4}  {:<country_w$}  {:>value_w$}",
            i + 1,
            row.country,
            value
        );
    }
    out
}
