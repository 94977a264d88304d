#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregations over a [`CrimeTable`].
//!
//! All functions are pure and deterministic: the same table always gives
//! the same output. Counts are distinct-id counts, since one crime can have
//! several outcome rows.
//!
//! Ties are broken by category name, ascending, both in
//! [`count_by_category`] and when [`insight`] picks the top category.

use std::collections::{BTreeMap, BTreeSet};

use police_postcode_analytics_models::{CategoryCount, Insight, MapView, MonthlyCount};
use police_postcode_crime_models::{CrimeTable, Location, YearMonth};
use regex::Regex;

/// Initial zoom for the point map; roughly a neighbourhood.
pub const MAP_ZOOM: u8 = 13;

/// Errors from aggregations that need at least one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AnalyticsError {
    /// The table has no records.
    #[error("no crime records to aggregate")]
    EmptyTable,
}

/// Number of distinct crime ids in the table.
#[must_use]
pub fn total_crimes(table: &CrimeTable) -> u64 {
    let ids: BTreeSet<&str> = table.iter().map(|r| r.id.as_str()).collect();
    ids.len() as u64
}

/// Distinct crime ids per category, ascending by count, then by category
/// name.
#[must_use]
pub fn count_by_category(table: &CrimeTable) -> Vec<CategoryCount> {
    let mut ids_by_category: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for record in table {
        ids_by_category
            .entry(record.category.as_str())
            .or_default()
            .insert(record.id.as_str());
    }

    let mut counts: Vec<CategoryCount> = ids_by_category
        .into_iter()
        .map(|(category, ids)| CategoryCount {
            category: category.to_string(),
            count: ids.len() as u64,
        })
        .collect();

    counts.sort_by(|a, b| {
        a.count
            .cmp(&b.count)
            .then_with(|| a.category.cmp(&b.category))
    });
    counts
}

/// Builds the caption facts for `postcode`.
///
/// The top category is the one with the most distinct crimes; its share is
/// taken against the sum of every category's distinct count.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyTable`] if the table has no records.
#[allow(clippy::cast_precision_loss)]
pub fn insight(table: &CrimeTable, postcode: &str) -> Result<Insight, AnalyticsError> {
    let counts = count_by_category(table);

    let top = counts
        .iter()
        .min_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.category.cmp(&b.category))
        })
        .ok_or(AnalyticsError::EmptyTable)?;

    let (first_month, last_month) = month_bounds(table).ok_or(AnalyticsError::EmptyTable)?;

    let category_total: u64 = counts.iter().map(|c| c.count).sum();
    let top_share_percent = top.count as f64 / category_total as f64 * 100.0;

    let date_range_text = format!("Time Period {first_month} to {last_month}");
    let summary = format!(
        "In {}, the crime reported the most is {} with {} recorded. \
         That accounts for {top_share_percent:.2}% of all crimes in the area.",
        postcode.to_uppercase(),
        top.category,
        top.count,
    );

    Ok(Insight {
        top_category: top.category.clone(),
        top_count: top.count,
        top_share_percent,
        first_month,
        last_month,
        date_range_text,
        summary,
    })
}

/// Distinct crime ids per month over the full range from the earliest to
/// the latest month in the table, with zero for months that have no
/// records.
///
/// An empty table gives an empty series.
#[must_use]
pub fn monthly_series(table: &CrimeTable) -> Vec<MonthlyCount> {
    let mut ids_by_month: BTreeMap<YearMonth, BTreeSet<&str>> = BTreeMap::new();
    for record in table {
        ids_by_month
            .entry(record.month)
            .or_default()
            .insert(record.id.as_str());
    }

    let (Some(first), Some(last)) = (
        ids_by_month.keys().next().copied(),
        ids_by_month.keys().next_back().copied(),
    ) else {
        return Vec::new();
    };

    first
        .range_inclusive(last)
        .map(|month| MonthlyCount {
            month,
            count: ids_by_month.get(&month).map_or(0, |ids| ids.len() as u64),
        })
        .collect()
}

/// Map view centred on the mean record coordinate.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyTable`] if the table has no records.
#[allow(clippy::cast_precision_loss)]
pub fn map_view(table: &CrimeTable) -> Result<MapView, AnalyticsError> {
    if table.is_empty() {
        return Err(AnalyticsError::EmptyTable);
    }

    let n = table.len() as f64;
    let (lat_sum, lng_sum) = table
        .iter()
        .fold((0.0, 0.0), |(lat, lng), r| (lat + r.latitude, lng + r.longitude));

    Ok(MapView {
        centre: Location::new(lat_sum / n, lng_sum / n),
        zoom: MAP_ZOOM,
    })
}

/// Turns a category slug into a display label.
///
/// Runs of non-word characters become a single space, then the first
/// character is upper-cased and the rest lower-cased:
/// `"anti-social-behaviour"` becomes `"Anti social behaviour"`.
#[must_use]
pub fn clean_category(category: &str) -> String {
    let re = Regex::new(r"\W+").unwrap_or_else(|_| unreachable!());
    let spaced = re.replace_all(category, " ");

    let mut chars = spaced.chars();
    chars.next().map_or_else(String::new, |first| {
        first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect()
    })
}

fn month_bounds(table: &CrimeTable) -> Option<(YearMonth, YearMonth)> {
    let first = table.iter().map(|r| r.month).min()?;
    let last = table.iter().map(|r| r.month).max()?;
    Some((first, last))
}
