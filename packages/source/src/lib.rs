#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime outcome data source trait and record parsing.
//!
//! A [`CrimeSource`] fetches every crime outcome recorded near a
//! [`Location`] and returns them as a [`CrimeTable`]. [`PoliceUk`] talks to
//! the data.police.uk `outcomes-at-location` endpoint; [`parsing`] turns
//! each raw outcome object into a typed [`CrimeRecord`].
//!
//! [`CrimeRecord`]: police_postcode_crime_models::CrimeRecord

pub mod parsing;
pub mod police_uk;
pub mod service;

use async_trait::async_trait;
use police_postcode_crime_models::{CrimeTable, Location};

pub use police_uk::PoliceUk;
pub use service::CrimeService;

/// Errors that can occur during data source operations.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success HTTP status.
    #[error("Crime service returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A raw record could not be turned into a [`CrimeRecord`].
    ///
    /// [`CrimeRecord`]: police_postcode_crime_models::CrimeRecord
    #[error("Parse error: {message}")]
    Parse {
        /// Description of what went wrong.
        message: String,
    },
}

/// Capability: fetch crime outcome records near a location.
#[async_trait]
pub trait CrimeSource: Send + Sync {
    /// Returns a unique identifier for this source (e.g., `"police_uk"`).
    fn id(&self) -> &str;

    /// Fetches and parses every outcome recorded near `location`, in the
    /// order the service returns them.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the request fails or any record is
    /// malformed. There is no partial result.
    async fn fetch(&self, location: Location) -> Result<CrimeTable, SourceError>;
}
