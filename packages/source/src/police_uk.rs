//! data.police.uk client.
//!
//! Uses the `outcomes-at-location` endpoint, which returns every outcome
//! recorded at the anonymised location nearest the given point.
//!
//! See <https://data.police.uk/docs/method/outcomes-at-location/>

use async_trait::async_trait;
use police_postcode_crime_models::{CrimeTable, Location};

use crate::{CrimeService, CrimeSource, SourceError, parsing};

/// Maximum length of the response body preview included in error logs.
const BODY_PREVIEW_LEN: usize = 500;

/// Crime source backed by the data.police.uk API.
#[derive(Debug, Clone)]
pub struct PoliceUk {
    client: reqwest::Client,
    base_url: String,
}

impl PoliceUk {
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Creates a client for the given service configuration.
    #[must_use]
    pub fn from_service(client: reqwest::Client, service: &CrimeService) -> Self {
        Self::new(client, service.base_url.clone())
    }

    fn outcomes_url(&self) -> String {
        format!(
            "{}/outcomes-at-location",
            self.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl CrimeSource for PoliceUk {
    fn id(&self) -> &str {
        "police_uk"
    }

    async fn fetch(&self, location: Location) -> Result<CrimeTable, SourceError> {
        let url = self.outcomes_url();
        log::debug!(
            "Fetching outcomes from {url} at ({}, {})",
            location.latitude,
            location.longitude
        );

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("lat", location.latitude.to_string()),
                ("lng", location.longitude.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        let text = resp.text().await?;
        let body: serde_json::Value = serde_json::from_str(&text).inspect_err(|e| {
            log::error!(
                "JSON parse failed.\n  \
                 url: {url}\n  \
                 status: {status}\n  \
                 received: {} bytes\n  \
                 parse error: {e}\n  \
                 body preview: {}",
                text.len(),
                preview(&text),
            );
        })?;

        let table = parse_outcomes(&body)?;
        log::debug!("Parsed {} outcome rows", table.len());
        Ok(table)
    }
}

/// Parses a full `outcomes-at-location` response body.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] if the body is not an array or any
/// element fails [`parsing::parse_outcome`].
pub fn parse_outcomes(body: &serde_json::Value) -> Result<CrimeTable, SourceError> {
    let outcomes = body.as_array().ok_or_else(|| SourceError::Parse {
        message: "outcomes-at-location response is not an array".to_string(),
    })?;

    outcomes
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            parsing::parse_outcome(raw).map_err(|e| SourceError::Parse {
                message: format!("outcome #{index}: {e}"),
            })
        })
        .collect()
}

fn preview(text: &str) -> String {
    if text.len() > BODY_PREVIEW_LEN {
        let end = (0..=BODY_PREVIEW_LEN)
            .rev()
            .find(|&i| text.is_char_boundary(i))
            .unwrap_or(0);
        format!("{}...", &text[..end])
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    fn outcome(id: u64, category: &str, month: &str) -> serde_json::Value {
        serde_json::json!({
            "category": { "code": "under-investigation", "name": "Under investigation" },
            "date": month,
            "person_id": null,
            "crime": {
                "id": id,
                "category": category,
                "month": month,
                "location_type": "Force",
                "location_subtype": "",
                "location": { "latitude": "51.5", "longitude": "-0.12" },
                "context": "",
                "persistent_id": ""
            }
        })
    }

    #[test]
    fn parses_outcome_list_in_order() {
        let body = serde_json::json!([
            outcome(3, "burglary", "2024-02"),
            outcome(1, "robbery", "2024-01"),
        ]);
        let table = parse_outcomes(&body).unwrap();
        let ids: Vec<&str> = table.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "1"]);
    }

    #[test]
    fn empty_array_is_empty_table() {
        let table = parse_outcomes(&serde_json::json!([])).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn non_array_body_fails() {
        assert!(parse_outcomes(&serde_json::json!({ "error": "nope" })).is_err());
    }

    #[test]
    fn bad_element_names_its_index() {
        let mut bad = outcome(2, "burglary", "2024-01");
        bad["crime"]["month"] = serde_json::Value::Null;
        let body = serde_json::json!([outcome(1, "burglary", "2024-01"), bad]);
        let err = parse_outcomes(&body).unwrap_err();
        assert!(err.to_string().contains("outcome #1"), "{err}");
    }

    #[test]
    fn preview_truncates_on_char_boundary() {
        let text = "é".repeat(BODY_PREVIEW_LEN);
        let p = preview(&text);
        assert!(p.ends_with("..."));
        assert!(p.len() <= BODY_PREVIEW_LEN + 3);
        assert_eq!(preview("short"), "short");
    }

    #[tokio::test]
    async fn fetches_outcomes_for_location() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/outcomes-at-location")
                    .query_param("lat", "52.6")
                    .query_param("lng", "-1.1");
                then.status(200).json_body(serde_json::json!([
                    outcome(10, "violent-crime", "2024-01"),
                    outcome(10, "violent-crime", "2024-01"),
                    outcome(11, "shoplifting", "2024-03"),
                ]));
            })
            .await;

        let source = PoliceUk::new(reqwest::Client::new(), server.url("/api"));
        let table = source.fetch(Location::new(52.6, -1.1)).await.unwrap();

        mock.assert_async().await;
        assert_eq!(table.len(), 3);
        assert_eq!(table.records()[2].category, "shoplifting");
    }

    #[tokio::test]
    async fn server_error_is_status_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/outcomes-at-location");
                then.status(503);
            })
            .await;

        let source = PoliceUk::new(reqwest::Client::new(), server.url("/api"));
        let err = source.fetch(Location::new(52.6, -1.1)).await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 503 }));
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/outcomes-at-location");
                then.status(200).body("[{\"crime\":");
            })
            .await;

        let source = PoliceUk::new(reqwest::Client::new(), format!("{}/", server.url("/api")));
        let err = source.fetch(Location::new(52.6, -1.1)).await.unwrap_err();
        assert!(matches!(err, SourceError::Json(_)));
    }
}
