//! Stored timestamps
//!
//! Records written by earlier deployments hold a mix of ISO 8601 strings and
//! native BSON dates for the same field. These deserializers accept both;
//! serialization is left to chrono.

use bson::Bson;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{Deserializer, Error};
use serde::Deserialize;

pub fn stored_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Bson::deserialize(deserializer)?;
    from_bson(&value)?.ok_or_else(|| D::Error::custom("expected a timestamp, found null"))
}

pub fn optional_stored_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Bson>::deserialize(deserializer)? {
        Some(value) => from_bson(&value),
        None => Ok(None),
    }
}

fn from_bson<E: Error>(value: &Bson) -> Result<Option<DateTime<Utc>>, E> {
    match value {
        Bson::DateTime(at) => Ok(Some(at.to_chrono())),
        Bson::String(text) => parse_text(text).map(Some),
        Bson::Null => Ok(None),
        other => Err(E::custom(format!("expected a timestamp, found {:?}", other.element_type()))),
    }
}

/// RFC 3339, or a naive ISO 8601 value taken as UTC.
fn parse_text<E: Error>(text: &str) -> Result<DateTime<Utc>, E> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| E::custom(format!("invalid timestamp: {}", text)))
}
