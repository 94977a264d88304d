#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! UK postcode geocoding.
//!
//! Resolves a postcode to a latitude/longitude pair. Callers depend on the
//! [`PostcodeResolver`] capability rather than a concrete client so that
//! everything downstream of the lookup can be exercised without network
//! access. [`postcodes_io::PostcodesIo`] is the production implementation.

pub mod postcodes_io;
pub mod service;

use async_trait::async_trait;
use police_postcode_crime_models::Location;
use thiserror::Error;

pub use postcodes_io::PostcodesIo;
pub use service::GeocodingService;

/// Errors from geocoding operations.
///
/// Every variant means "no location for this postcode"; the variants only
/// exist so the reason can be logged.
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-200 HTTP status.
    #[error("Geocoding service returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// The response body carried a non-200 `status` field.
    #[error("Geocoding service rejected the postcode (status {status})")]
    Rejected {
        /// Value of the body's `status` field.
        status: i64,
    },

    /// The response body was not valid JSON.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Response parsing failed.
    #[error("Parse error: {message}")]
    Parse {
        /// Description of the parsing failure.
        message: String,
    },

    /// The configured base URL cannot take a postcode path segment.
    #[error("Invalid geocoding base URL: {message}")]
    InvalidBaseUrl {
        /// Description of the problem.
        message: String,
    },
}

/// Capability: resolve a postcode to a [`Location`].
#[async_trait]
pub trait PostcodeResolver: Send + Sync {
    /// Looks up `postcode` exactly as given.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError`] if the postcode cannot be resolved for any
    /// reason.
    async fn resolve(&self, postcode: &str) -> Result<Location, GeocodeError>;
}
