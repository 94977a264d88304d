#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Postcode to crime dashboard pipeline.
//!
//! One run is strictly linear: resolve the postcode, fetch the outcomes
//! near it, aggregate, and hand back a [`Dashboard`] holding everything a
//! presentation layer needs to draw the page. Nothing is cached between
//! runs.

use police_postcode_analytics as analytics;
use police_postcode_analytics::AnalyticsError;
use police_postcode_analytics_models::{CategoryCount, Insight, MapView, MonthlyCount};
use police_postcode_crime_models::{CrimeTable, Location};
use police_postcode_geocoder::{GeocodeError, PostcodeResolver};
use police_postcode_source::{CrimeSource, SourceError};
use serde::{Deserialize, Serialize};

/// Everything shown on the dashboard for one postcode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    /// The postcode as submitted.
    pub postcode: String,
    /// Where the postcode resolved to.
    pub location: Location,
    /// Distinct crimes in [`Self::records`]; shown in the title.
    pub total_crimes: u64,
    /// Date range and summary captions.
    pub insight: Insight,
    /// Bar chart series, ascending by count.
    pub by_category: Vec<CategoryCount>,
    /// Gap-free monthly time series.
    pub monthly: Vec<MonthlyCount>,
    /// Initial map view.
    pub map: MapView,
    /// Every parsed outcome row, in service order.
    pub records: CrimeTable,
}

/// Errors that stop a dashboard run before anything is shown.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    /// The geocoder could not resolve the postcode.
    #[error("Invalid postcode or unable to retrieve location information.")]
    PostcodeNotFound {
        /// The postcode as submitted.
        postcode: String,
        /// Why the lookup failed.
        #[source]
        source: GeocodeError,
    },

    /// The crime service request or a record failed.
    #[error("Failed to fetch crime data: {0}")]
    Source(#[from] SourceError),

    /// The crime service returned no outcomes for the location.
    #[error("No crimes recorded near {postcode}.")]
    NoCrimes {
        /// Upper-cased postcode, for display.
        postcode: String,
    },

    /// An aggregation could not be computed.
    #[error("Aggregation failed: {0}")]
    Analytics(#[from] AnalyticsError),
}

impl DashboardError {
    /// Whether the error is about the user's input or its surroundings
    /// rather than a failure of the services.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::PostcodeNotFound { .. } | Self::NoCrimes { .. })
    }
}

/// Runs the full pipeline for `postcode`.
///
/// The crime source is never called if the postcode does not resolve.
///
/// # Errors
///
/// * [`DashboardError::PostcodeNotFound`] if geocoding fails for any reason
/// * [`DashboardError::Source`] if fetching or parsing the outcomes fails
/// * [`DashboardError::NoCrimes`] if the location has no recorded outcomes
pub async fn build_dashboard(
    resolver: &dyn PostcodeResolver,
    source: &dyn CrimeSource,
    postcode: &str,
) -> Result<Dashboard, DashboardError> {
    let location = match resolver.resolve(postcode).await {
        Ok(location) => location,
        Err(e) => {
            log::warn!("Could not resolve postcode {postcode:?}: {e}");
            return Err(DashboardError::PostcodeNotFound {
                postcode: postcode.to_string(),
                source: e,
            });
        }
    };
    log::info!(
        "Resolved {postcode:?} to ({}, {})",
        location.latitude,
        location.longitude
    );

    let records = source.fetch(location).await?;
    log::info!("Fetched {} outcome rows from {}", records.len(), source.id());

    if records.is_empty() {
        return Err(DashboardError::NoCrimes {
            postcode: postcode.to_uppercase(),
        });
    }

    summarize(postcode, location, records)
}

/// Aggregates an already-fetched table.
///
/// # Errors
///
/// Returns [`DashboardError::Analytics`] if the table is empty.
pub fn summarize(
    postcode: &str,
    location: Location,
    records: CrimeTable,
) -> Result<Dashboard, DashboardError> {
    let insight = analytics::insight(&records, postcode)?;
    let map = analytics::map_view(&records)?;

    Ok(Dashboard {
        postcode: postcode.to_string(),
        location,
        total_crimes: analytics::total_crimes(&records),
        insight,
        by_category: analytics::count_by_category(&records),
        monthly: analytics::monthly_series(&records),
        map,
        records,
    })
}
