use crate::cache::CountryTable;
use crate::viz::ChoroplethFrame;
use anyhow::Result;
use csv::WriterBuilder;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Prefix text cells that a spreadsheet would evaluate as a formula.
fn guard_cell(s: &str) -> Cow<'_, str> {
    match s.chars().next() {
        Some('=' | '+' | '-' | '@' | '\t' | '\r') => Cow::Owned(format!("'{s}")),
        _ => Cow::Borrowed(s),
    }
}

/// Save the map frame as CSV with header, for external map renderers.
pub fn save_choropleth_csv<P: AsRef<Path>>(frame: &ChoroplethFrame, path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    wtr.serialize(("iso3", "country", "lat", "long", "cases", "deaths", "recovered", "log_cases"))?;
    for r in &frame.rows {
        wtr.serialize((
            guard_cell(&r.iso3),
            guard_cell(&r.country),
            r.lat,
            r.long,
            r.cases,
            r.deaths,
            r.recovered,
            r.log_cases,
        ))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save the country table rows as a pretty JSON array.
pub fn save_countries_json<P: AsRef<Path>>(table: &CountryTable, path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(&table.rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_starters_are_quoted() {
        assert_eq!(guard_cell("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(guard_cell("@foo"), "'@foo");
        assert_eq!(guard_cell("Germany"), "Germany");
        assert_eq!(guard_cell(""), "");
    }
}
