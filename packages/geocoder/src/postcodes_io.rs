//! postcodes.io client.
//!
//! `GET <base_url>/<postcode>` returns
//! `{"status": 200, "result": {"latitude": .., "longitude": ..}}` for a
//! known postcode and `{"status": 404, "error": ".."}` otherwise.
//!
//! See <https://postcodes.io/docs>

use async_trait::async_trait;
use police_postcode_crime_models::Location;
use reqwest::{StatusCode, Url};

use crate::{GeocodeError, GeocodingService, PostcodeResolver};

/// Geocoder backed by the postcodes.io lookup endpoint.
#[derive(Debug, Clone)]
pub struct PostcodesIo {
    client: reqwest::Client,
    base_url: String,
}

impl PostcodesIo {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Creates a client for the given service configuration.
    #[must_use]
    pub fn from_service(client: reqwest::Client, service: &GeocodingService) -> Self {
        Self::new(client, service.base_url.clone())
    }

    /// Builds the lookup URL for `postcode`.
    ///
    /// The postcode becomes a single percent-encoded path segment; it is
    /// not trimmed or re-cased.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::InvalidBaseUrl`] if the base URL does not
    /// parse or cannot have path segments.
    pub fn lookup_url(&self, postcode: &str) -> Result<Url, GeocodeError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| GeocodeError::InvalidBaseUrl {
            message: format!("{}: {e}", self.base_url),
        })?;

        url.path_segments_mut()
            .map_err(|()| GeocodeError::InvalidBaseUrl {
                message: format!("{} cannot be a base", self.base_url),
            })?
            .pop_if_empty()
            .push(postcode);

        Ok(url)
    }
}

#[async_trait]
impl PostcodeResolver for PostcodesIo {
    async fn resolve(&self, postcode: &str) -> Result<Location, GeocodeError> {
        let url = self.lookup_url(postcode)?;
        log::debug!("Geocoding postcode via {url}");

        let resp = self.client.get(url).send().await?;

        if resp.status() != StatusCode::OK {
            return Err(GeocodeError::Status {
                status: resp.status().as_u16(),
            });
        }

        let body: serde_json::Value = serde_json::from_str(&resp.text().await?)?;
        parse_response(&body)
    }
}

/// Parses a postcodes.io lookup response.
fn parse_response(body: &serde_json::Value) -> Result<Location, GeocodeError> {
    let status = body["status"].as_i64().ok_or_else(|| GeocodeError::Parse {
        message: "Missing status in postcodes.io response".to_string(),
    })?;

    if status != 200 {
        return Err(GeocodeError::Rejected { status });
    }

    let latitude = body["result"]["latitude"]
        .as_f64()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing latitude in postcodes.io response".to_string(),
        })?;

    let longitude = body["result"]["longitude"]
        .as_f64()
        .ok_or_else(|| GeocodeError::Parse {
            message: "Missing longitude in postcodes.io response".to_string(),
        })?;

    Ok(Location {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    #[test]
    fn parses_lookup_result() {
        let body = serde_json::json!({
            "status": 200,
            "result": { "postcode": "SW1A 1AA", "latitude": 51.501_009, "longitude": -0.141_588 }
        });
        let location = parse_response(&body).unwrap();
        assert!((location.latitude - 51.501_009).abs() < 1e-6);
        assert!((location.longitude - -0.141_588).abs() < 1e-6);
    }

    #[test]
    fn rejects_non_200_body_status() {
        let body = serde_json::json!({ "status": 404, "error": "Invalid postcode" });
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Rejected { status: 404 })
        ));
    }

    #[test]
    fn rejects_null_coordinates() {
        let body = serde_json::json!({
            "status": 200,
            "result": { "latitude": null, "longitude": null }
        });
        assert!(matches!(
            parse_response(&body),
            Err(GeocodeError::Parse { .. })
        ));
    }

    #[test]
    fn lookup_url_encodes_postcode_segment() {
        let geocoder = PostcodesIo::new(
            reqwest::Client::new(),
            "https://api.postcodes.io/postcodes",
        );
        let url = geocoder.lookup_url("SW1A 1AA").unwrap();
        assert_eq!(url.as_str(), "https://api.postcodes.io/postcodes/SW1A%201AA");

        let url = geocoder.lookup_url("a/b").unwrap();
        assert_eq!(url.as_str(), "https://api.postcodes.io/postcodes/a%2Fb");
    }

    #[test]
    fn lookup_url_tolerates_trailing_slash() {
        let geocoder = PostcodesIo::new(reqwest::Client::new(), "https://example.com/postcodes/");
        let url = geocoder.lookup_url("M1 1AE").unwrap();
        assert_eq!(url.as_str(), "https://example.com/postcodes/M1%201AE");
    }

    #[test]
    fn lookup_url_rejects_bad_base() {
        let geocoder = PostcodesIo::new(reqwest::Client::new(), "not a url");
        assert!(matches!(
            geocoder.lookup_url("M1 1AE"),
            Err(GeocodeError::InvalidBaseUrl { .. })
        ));
    }

    #[tokio::test]
    async fn resolves_known_postcode() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET).path("/postcodes/M11AE");
                then.status(200).json_body(serde_json::json!({
                    "status": 200,
                    "result": { "latitude": 53.480_7, "longitude": -2.234_3 }
                }));
            })
            .await;

        let geocoder = PostcodesIo::new(reqwest::Client::new(), server.url("/postcodes"));
        let location = geocoder.resolve("M11AE").await.unwrap();

        mock.assert_async().await;
        assert!((location.latitude - 53.480_7).abs() < 1e-6);
        assert!((location.longitude - -2.234_3).abs() < 1e-6);
    }

    #[tokio::test]
    async fn http_404_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/postcodes/NOPE");
                then.status(404).json_body(serde_json::json!({
                    "status": 404,
                    "error": "Invalid postcode"
                }));
            })
            .await;

        let geocoder = PostcodesIo::new(reqwest::Client::new(), server.url("/postcodes"));
        let err = geocoder.resolve("NOPE").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Status { status: 404 }));
    }

    #[tokio::test]
    async fn body_status_must_be_200() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/postcodes/ODD");
                then.status(200)
                    .json_body(serde_json::json!({ "status": 500, "result": null }));
            })
            .await;

        let geocoder = PostcodesIo::new(reqwest::Client::new(), server.url("/postcodes"));
        let err = geocoder.resolve("ODD").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Rejected { status: 500 }));
    }

    #[tokio::test]
    async fn malformed_body_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/postcodes/GARBLED");
                then.status(200).body("<html>not json</html>");
            })
            .await;

        let geocoder = PostcodesIo::new(reqwest::Client::new(), server.url("/postcodes"));
        let err = geocoder.resolve("GARBLED").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Json(_)));
    }

    #[tokio::test]
    async fn unreachable_service_is_an_error() {
        // Port 9 (discard) on localhost is not expected to be listening.
        let geocoder = PostcodesIo::new(reqwest::Client::new(), "http://127.0.0.1:9/postcodes");
        let err = geocoder.resolve("M11AE").await.unwrap_err();
        assert!(matches!(err, GeocodeError::Http(_)));
    }
}
