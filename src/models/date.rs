//! Lenient timestamp parsing for request payloads.
//!
//! Clients send either a full RFC 3339 timestamp or a bare calendar date
//! (`2022-02-10`); the latter is taken as midnight UTC.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(raw) => parse(&raw).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "invalid date {:?}, expected YYYY-MM-DD or RFC 3339",
                raw
            ))
        }),
    }
}
