//! Text rendering of the global snapshot.

use crate::models::GlobalSnapshot;
use num_format::{Locale, ToFormattedString};
use std::fmt::Write;

pub const SUMMARY_TITLE: &str = "GLOBAL COVID-19 SUMMARY";

/// Format a count with `,` thousands separators: `1234567` -> `1,234,567`.
pub fn format_count(v: u64) -> String {
    v.to_formatted_string(&Locale::en)
}

/// Format a number with `,` thousands separators, keeping any fractional
/// digits in their shortest form: `90057.1` -> `90,057.1`, `12.0` -> `12`.
pub fn format_number(v: f64) -> String {
    if !v.is_finite() {
        return v.to_string();
    }
    let s = v.to_string();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };
    let grouped = group_digits(int_part);
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Insert `,` every three digits from the right of an unsigned digit string.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// The eleven summary lines as (label, formatted value), in report order.
pub fn summary_lines(g: &GlobalSnapshot) -> [(&'static str, String); 11] {
    [
        ("Total Cases", format_count(g.cases)),
        ("Total Deaths", format_count(g.deaths)),
        ("Total Recovered", format_count(g.recovered)),
        ("Active Cases", format_count(g.active)),
        ("Critical Cases", format_count(g.critical)),
        ("Cases Per Million", format_number(g.cases_per_one_million)),
        ("Deaths Per Million", format_number(g.deaths_per_one_million)),
        ("Tests", format_count(g.tests)),
        ("Tests Per Million", format_number(g.tests_per_one_million)),
        ("Population", format_count(g.population)),
        ("Affected Countries", format_count(g.affected_countries)),
    ]
}

/// Full report: blank line, title, a rule of 30 `=`, then one `Label: value` per line.
pub fn summary_text(g: &GlobalSnapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(out);
    let _ = writeln!(out, "{SUMMARY_TITLE}");
    let _ = writeln!(out, "{}", "=".repeat(30));
    for (label, value) in summary_lines(g) {
        let _ = writeln!(out, "{label}: {value}");
    }
    out
}
