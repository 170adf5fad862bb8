//! `updated_at` values arrive either with an offset or as naive UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

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
    parse(&raw).map_err(serde::de::Error::custom)
}

pub(crate) fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp `{}`: {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::parse;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_parse_with_offset() {
        let ts = parse("2024-03-01T12:34:56.123456+09:00").unwrap();
        assert_eq!(ts.hour(), 3);
    }

    #[test]
    fn test_parse_naive_as_utc() {
        let ts = parse("2024-03-01T12:34:56.123456").unwrap();
        assert_eq!((ts.day(), ts.hour()), (1, 12));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("yesterday").is_err());
    }
}
