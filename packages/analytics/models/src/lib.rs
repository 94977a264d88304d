#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregation result types.
//!
//! Every count here is a distinct-id count: crimes with several outcome
//! rows are counted once.

use police_postcode_crime_models::{Location, YearMonth};
use serde::{Deserialize, Serialize};

/// Count of distinct crimes in a single category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    /// Crime category slug (e.g. `"anti-social-behaviour"`).
    pub category: String,
    /// Number of distinct crime ids.
    pub count: u64,
}

/// A monthly time-series data point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    /// Calendar month.
    pub month: YearMonth,
    /// Distinct crime ids recorded that month; zero for gap months.
    pub count: u64,
}

/// Headline facts for the dashboard caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    /// Category with the most distinct crimes.
    pub top_category: String,
    /// Distinct crimes in [`Self::top_category`].
    pub top_count: u64,
    /// Share of [`Self::top_count`] in the sum of all category counts, in
    /// percent.
    pub top_share_percent: f64,
    /// Earliest month in the table.
    pub first_month: YearMonth,
    /// Latest month in the table.
    pub last_month: YearMonth,
    /// `"Time Period <first> to <last>"`.
    pub date_range_text: String,
    /// One-sentence summary naming the postcode and the top category.
    pub summary: String,
}

/// Initial view for the point map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    /// Mean of all record coordinates.
    pub centre: Location,
    /// Web-map zoom level.
    pub zoom: u8,
}
