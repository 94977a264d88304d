//! Parsing of raw data.police.uk outcome objects.
//!
//! Each element of an `outcomes-at-location` response looks like:
//!
//! ```json
//! {
//!   "category": { "code": "unable-to-prosecute", "name": "Unable to prosecute suspect" },
//!   "date": "2024-01",
//!   "person_id": null,
//!   "crime": {
//!     "id": 116208998,
//!     "category": "violent-crime",
//!     "month": "2024-01",
//!     "location_type": "Force",
//!     "location_subtype": "",
//!     "location": { "latitude": "52.6389", "longitude": "-1.1350", "street": { ... } },
//!     "context": "",
//!     "persistent_id": "..."
//!   }
//! }
//! ```
//!
//! Every field read here is required. Nothing is defaulted: a missing key,
//! a wrong type, or an unparseable value fails the whole record.

use police_postcode_crime_models::{CrimeRecord, YearMonth};
use serde_json::Value;

use crate::SourceError;

/// Parses one raw outcome object into a [`CrimeRecord`].
///
/// # Errors
///
/// Returns [`SourceError::Parse`] naming the offending field if any
/// required key is missing or holds an unusable value.
pub fn parse_outcome(raw: &Value) -> Result<CrimeRecord, SourceError> {
    let month_str = required_str(raw, &["crime", "month"])?;
    let month = month_str
        .parse::<YearMonth>()
        .map_err(|e| SourceError::Parse {
            message: format!("crime.month: {e}"),
        })?;

    Ok(CrimeRecord {
        id: crime_id(raw)?,
        category: required_str(raw, &["crime", "category"])?,
        month,
        category_code: required_str(raw, &["category", "code"])?,
        category_name: required_str(raw, &["category", "name"])?,
        longitude: coordinate(raw, &["crime", "location", "longitude"])?,
        latitude: coordinate(raw, &["crime", "location", "latitude"])?,
        location_type: nullable_str(raw, &["crime", "location_type"])?,
        location_subtype: nullable_str(raw, &["crime", "location_subtype"])?,
    })
}

/// Walks `path` through nested objects, failing on the first missing key.
fn field<'a>(raw: &'a Value, path: &[&str]) -> Result<&'a Value, SourceError> {
    path.iter().try_fold(raw, |value, key| {
        value.get(*key).ok_or_else(|| SourceError::Parse {
            message: format!("missing field {}", path.join(".")),
        })
    })
}

fn required_str(raw: &Value, path: &[&str]) -> Result<String, SourceError> {
    field(raw, path)?
        .as_str()
        .map(String::from)
        .ok_or_else(|| SourceError::Parse {
            message: format!("{} is not a string", path.join(".")),
        })
}

/// The key must be present; `null` maps to `None`.
fn nullable_str(raw: &Value, path: &[&str]) -> Result<Option<String>, SourceError> {
    match field(raw, path)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        _ => Err(SourceError::Parse {
            message: format!("{} is not a string or null", path.join(".")),
        }),
    }
}

/// Crime ids are integers on the wire; string ids are accepted as-is.
fn crime_id(raw: &Value) -> Result<String, SourceError> {
    match field(raw, &["crime", "id"])? {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) if !s.is_empty() => Ok(s.clone()),
        _ => Err(SourceError::Parse {
            message: "crime.id is not a number or non-empty string".to_string(),
        }),
    }
}

/// Coordinates arrive as decimal strings; plain numbers are accepted too.
fn coordinate(raw: &Value, path: &[&str]) -> Result<f64, SourceError> {
    let value = field(raw, path)?;
    let parsed = match value {
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    };
    parsed
        .filter(|v| v.is_finite())
        .ok_or_else(|| SourceError::Parse {
            message: format!("{} is not a coordinate: {value}", path.join(".")),
        })
}
