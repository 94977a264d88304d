//! Plain-text rendering of a [`Dashboard`].
//!
//! Mirrors the dashboard page top to bottom: title, captions, category
//! bars, monthly series, map centre, then the raw table.

use std::fmt::{self, Write};

use police_postcode_analytics::clean_category;
use police_postcode_dashboard::Dashboard;

/// Widest bar drawn for the largest category or month.
const BAR_WIDTH: u64 = 40;

/// Writes the full text report for `dashboard` to `out`.
///
/// # Errors
///
/// Returns [`fmt::Error`] if writing to `out` fails.
pub fn render_text(dashboard: &Dashboard, out: &mut impl Write) -> fmt::Result {
    writeln!(out, "Crime by Postcode")?;
    writeln!(out)?;
    writeln!(out, "Total Crimes {}", dashboard.total_crimes)?;
    writeln!(out, "{}", dashboard.insight.date_range_text)?;
    writeln!(out, "{}", dashboard.insight.summary)?;

    writeln!(out)?;
    writeln!(out, "Crimes by category")?;
    let labels: Vec<String> = dashboard
        .by_category
        .iter()
        .map(|c| clean_category(&c.category))
        .collect();
    let label_width = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let max_count = dashboard.by_category.iter().map(|c| c.count).max().unwrap_or(0);
    for (label, count) in labels.iter().zip(&dashboard.by_category) {
        writeln!(
            out,
            "  {label:<label_width$}  {} {}",
            bar(count.count, max_count),
            count.count
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Crimes per month")?;
    let max_monthly = dashboard.monthly.iter().map(|p| p.count).max().unwrap_or(0);
    for point in &dashboard.monthly {
        writeln!(
            out,
            "  {}  {} {}",
            point.month,
            bar(point.count, max_monthly),
            point.count
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Map")?;
    writeln!(
        out,
        "  Centre {:.5}, {:.5} (zoom {}), {} points",
        dashboard.map.centre.latitude,
        dashboard.map.centre.longitude,
        dashboard.map.zoom,
        dashboard.records.len()
    )?;

    writeln!(out)?;
    writeln!(out, "Table")?;
    writeln!(
        out,
        "  {:<12} {:<24} {:<8} {:<32} {:>10} {:>10} {:<6} Location subtype",
        "ID", "Crime category", "Month", "Outcome", "Latitude", "Longitude", "Type"
    )?;
    for record in &dashboard.records {
        writeln!(
            out,
            "  {:<12} {:<24} {:<8} {:<32} {:>10.6} {:>10.6} {:<6} {}",
            record.id,
            record.category,
            record.month,
            record.category_code,
            record.latitude,
            record.longitude,
            record.location_type.as_deref().unwrap_or("-"),
            record.location_subtype.as_deref().unwrap_or("-"),
        )?;
    }

    Ok(())
}

/// A bar of `#` scaled so that `max` fills [`BAR_WIDTH`]. Non-zero counts
/// always get at least one mark.
fn bar(count: u64, max: u64) -> String {
    if count == 0 || max == 0 {
        return String::new();
    }
    let width = (count * BAR_WIDTH / max).max(1);
    "#".repeat(usize::try_from(width).unwrap_or(usize::MAX))
}
