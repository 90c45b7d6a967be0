//! Lenient timestamp decoding for backend payloads.
//!
//! The backend emits either RFC 3339 strings with an offset or naive ISO-8601
//! date-times without one. Naive values are taken as UTC. Serialization always
//! writes RFC 3339.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).ok_or_else(|| D::Error::custom(format!("unrecognized timestamp '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn accepts_rfc3339_with_offset() {
        let parsed = parse("2024-03-05T10:15:00+02:00").expect("rfc3339");
        assert_eq!(parsed.hour(), 8);
    }

    #[test]
    fn treats_naive_datetime_as_utc() {
        let parsed = parse("2024-03-05T10:15:00.1234567").expect("naive");
        assert_eq!(parsed.day(), 5);
        assert_eq!(parsed.hour(), 10);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("last tuesday").is_none());
    }
}
