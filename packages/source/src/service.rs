//! Crime data service configuration.
//!
//! Defaults come from `services/police_uk.toml`, embedded at compile time.
//! `POLICE_API_BASE_URL` overrides the base URL at runtime.

use serde::Deserialize;

/// Environment variable overriding [`CrimeService::base_url`].
pub const BASE_URL_ENV: &str = "POLICE_API_BASE_URL";

const DEFAULT_SERVICE_TOML: &str = include_str!("../services/police_uk.toml");

/// A crime data service configuration loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct CrimeService {
    /// Unique identifier (e.g., `"police_uk"`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// API root; endpoint paths are appended to it.
    pub base_url: String,
}

impl CrimeService {
    /// Returns the embedded default service configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML is malformed.
    #[must_use]
    pub fn embedded() -> Self {
        toml::de::from_str(DEFAULT_SERVICE_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded crime service: {e}"))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_service_parses() {
        let service = CrimeService::embedded();
        assert_eq!(service.id, "police_uk");
        assert!(!service.name.is_empty());
        assert!(service.base_url.starts_with("https://"));
        assert!(!service.base_url.ends_with('/'));
    }
}
