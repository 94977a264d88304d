#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Crime outcome data model shared across the police postcode toolchain.
//!
//! A single query (one postcode, one point in time) produces a
//! [`CrimeTable`] of [`CrimeRecord`] rows. Several outcome rows can refer
//! to the same reported crime, so anything that counts crimes must
//! de-duplicate by [`CrimeRecord::id`] rather than count rows.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike as _, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
}

impl Location {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Error returned when a month string is not in `YYYY-MM` form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid month '{value}': expected YYYY-MM")]
pub struct InvalidMonthError {
    /// The rejected input.
    pub value: String,
}

/// A calendar month, e.g. `2024-03`.
///
/// Stored as the first day of the month so ordering and month arithmetic
/// come from [`NaiveDate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    /// Creates a month from its year and 1-based month number.
    ///
    /// Returns `None` if `month` is outside `1..=12`.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Returns the following calendar month, or `None` past the end of
    /// the representable date range.
    #[must_use]
    pub fn succ(self) -> Option<Self> {
        self.0.checked_add_months(Months::new(1)).map(Self)
    }

    /// Iterates every month from `self` to `end`, both inclusive.
    ///
    /// Yields nothing when `end` is before `self`.
    pub fn range_inclusive(self, end: Self) -> impl Iterator<Item = Self> {
        std::iter::successors(Some(self), move |m| m.succ().filter(|next| *next <= end))
            .take_while(move |m| *m <= end)
    }
}

impl FromStr for YearMonth {
    type Err = InvalidMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidMonthError {
            value: s.to_string(),
        };

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || month.len() != 2 || !all_digits(year) || !all_digits(month) {
            return Err(invalid());
        }
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;

        Self::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = InvalidMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// One parsed crime outcome row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrimeRecord {
    /// Identifier of the reported crime. Not unique per row: one crime can
    /// have several outcome rows.
    pub id: String,
    /// Crime category slug (e.g. `"burglary"`).
    pub category: String,
    /// Month the crime was recorded in.
    pub month: YearMonth,
    /// Outcome category code (e.g. `"under-investigation"`).
    pub category_code: String,
    /// Human-readable outcome category name.
    pub category_name: String,
    /// Longitude of the (anonymised) crime location.
    pub longitude: f64,
    /// Latitude of the (anonymised) crime location.
    pub latitude: f64,
    /// Location type, `"Force"` or `"BTP"`.
    pub location_type: Option<String>,
    /// Location subtype, e.g. a station name for BTP records.
    pub location_subtype: Option<String>,
}

/// The ordered set of records returned for one query.
///
/// Rows keep the order the crime service returned them in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrimeTable {
    records: Vec<CrimeRecord>,
}

impl CrimeTable {
    #[must_use]
    pub const fn new(records: Vec<CrimeRecord>) -> Self {
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[CrimeRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CrimeRecord> {
        self.records.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<CrimeRecord> {
        self.records
    }
}

impl FromIterator<CrimeRecord> for CrimeTable {
    fn from_iter<T: IntoIterator<Item = CrimeRecord>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a CrimeTable {
    type Item = &'a CrimeRecord;
    type IntoIter = std::slice::Iter<'a, CrimeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
