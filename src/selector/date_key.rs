use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::{fmt::Display, str::FromStr};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical UTC calendar day, rendered as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateKey(NaiveDate);

impl DateKey {
    /// Normalizes a point in time to its UTC calendar day
    ///
    /// `None` means "now". Time of day is discarded, so every timestamp on the
    /// same UTC day yields the same key.
    pub fn normalize(timestamp: Option<DateTime<Utc>>) -> Self {
        let timestamp = timestamp.unwrap_or_else(Utc::now);
        Self(timestamp.date_naive())
    }

    /// 2000-01-01, the default seed epoch
    pub fn default_epoch() -> Self {
        Self(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default())
    }

    pub fn today() -> Self {
        Self::normalize(None)
    }

    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Signed number of days from `epoch` to this key
    pub fn days_since(&self, epoch: DateKey) -> i64 {
        (self.0 - epoch.0).num_days()
    }

    pub fn plus_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    pub fn minus_days(&self, days: i64) -> Self {
        Self(self.0 - Duration::days(days))
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<DateTime<Utc>> for DateKey {
    fn from(timestamp: DateTime<Utc>) -> Self {
        Self::normalize(Some(timestamp))
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

/// Error returned when text is neither a `YYYY-MM-DD` date nor an RFC 3339 timestamp
#[derive(Debug, thiserror::Error)]
#[error("invalid date key `{0}`: expected YYYY-MM-DD or an RFC 3339 timestamp")]
pub struct DateKeyParseError(pub String);

impl FromStr for DateKey {
    type Err = DateKeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            return Ok(Self(date));
        }
        DateTime::parse_from_rfc3339(trimmed)
            .map(|ts| Self::normalize(Some(ts.with_timezone(&Utc))))
            .map_err(|_| DateKeyParseError(s.to_string()))
    }
}

impl Serialize for DateKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DateKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
