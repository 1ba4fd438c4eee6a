//! Visualization: render COVID-19 charts to **SVG** or **PNG**.
//!
//! - Cases map: one marker per country at its coordinates, colored on a
//!   Viridis scale of `log10(cases)`
//! - Trend chart: cases, deaths and recovered over the last N days
//!
//! The output backend follows the file extension: `.svg` renders with the
//! SVG backend, anything else with the bitmap backend.

pub mod choropleth;
pub mod trend;
pub mod util;

pub use choropleth::{ChoroplethFrame, ChoroplethRow, choropleth_frame, plot_choropleth};
pub use trend::plot_trends;

use std::path::Path;
use std::sync::Once;

/// One-time registration for a fallback "sans-serif" font when using the `ab_glyph` text path.
/// Required because `ab_glyph` doesn't discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        // From `src/viz/mod.rs` → project root → `assets/DejaVuSans.ttf`
        let _ = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
    });
}

fn is_svg(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"))
}
