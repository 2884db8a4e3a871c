//! Row timestamps as the backend writes them.
//!
//! Most rows carry an RFC 3339 instant, but older tables store wall-clock
//! time without an offset. Those stay naive until a report resolves them in
//! its reporting offset.

use std::fmt;

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    /// Instant with a known offset.
    Zoned(DateTime<Utc>),
    /// Wall-clock time with no offset attached.
    Naive(NaiveDateTime),
}

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

impl Timestamp {
    /// Parse the text forms the backend emits. Returns `None` for anything
    /// else.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self::Zoned(at.with_timezone(&Utc)));
        }
        // Postgres text output: space separator, short offset ("+03").
        if let Ok(at) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%#z") {
            return Some(Self::Zoned(at.with_timezone(&Utc)));
        }
        if let Some(naive) = NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        {
            return Some(Self::Naive(naive));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|date| Self::Naive(date.and_time(chrono::NaiveTime::MIN)))
    }

    /// The instant this timestamp denotes, reading naive wall-clock time in
    /// `offset`.
    pub fn resolve(&self, offset: FixedOffset) -> DateTime<Utc> {
        match *self {
            Self::Zoned(at) => at,
            Self::Naive(local) => local
                .checked_sub_signed(Duration::seconds(i64::from(offset.local_minus_utc())))
                .unwrap_or(local)
                .and_utc(),
        }
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self::Zoned(at)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zoned(at) => write!(f, "{}", at.to_rfc3339()),
            Self::Naive(local) => write!(f, "{}", local.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| de::Error::custom(format!("unrecognised timestamp '{raw}'")))
    }
}

struct LenientVisitor;

impl<'de> Visitor<'de> for LenientVisitor {
    type Value = Option<Timestamp>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a timestamp string or null")
    }

    fn visit_str<E: de::Error>(self, raw: &str) -> Result<Self::Value, E> {
        Ok(Timestamp::parse(raw))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        deserializer.deserialize_any(self)
    }

    // Epoch numbers and other shapes are not timestamps this pipeline knows.
    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(None)
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(None)
    }
}

/// Deserialize a timestamp column, reading anything unrecognised as `None`
/// so the row itself still decodes.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(LenientVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn istanbul() -> FixedOffset {
        FixedOffset::east_opt(3 * 3600).unwrap()
    }

    #[test]
    fn zoned_forms_resolve_to_the_same_instant() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap();
        for raw in [
            "2024-03-10T09:00:00+03:00",
            "2024-03-10T06:00:00Z",
            "2024-03-10 09:00:00+03",
            "2024-03-10 06:00:00.000+00",
        ] {
            let ts = Timestamp::parse(raw).unwrap();
            assert_eq!(ts.resolve(istanbul()), expected, "{raw}");
        }
    }

    #[test]
    fn naive_time_is_read_in_the_given_offset() {
        let ts = Timestamp::parse("2024-03-10T09:00:00").unwrap();
        assert!(matches!(ts, Timestamp::Naive(_)));
        assert_eq!(
            ts.resolve(istanbul()),
            Utc.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap()
        );
        assert_eq!(
            ts.resolve(FixedOffset::east_opt(0).unwrap()),
            Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()
        );

        let spaced = Timestamp::parse("2024-03-10 09:00:00.250").unwrap();
        assert!(matches!(spaced, Timestamp::Naive(_)));
        assert!(Timestamp::parse("2024-03-10").is_some());
    }

    #[test]
    fn garbage_is_not_a_timestamp() {
        assert_eq!(Timestamp::parse("yesterday"), None);
        assert_eq!(Timestamp::parse(""), None);
    }

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "super::lenient_timestamp")]
        created_at: Option<Timestamp>,
    }

    #[test]
    fn lenient_column_never_rejects_the_row() {
        let row: Row = serde_json::from_str(r#"{"created_at": "not a date"}"#).unwrap();
        assert_eq!(row.created_at, None);

        let row: Row = serde_json::from_str(r#"{"created_at": 1710054000}"#).unwrap();
        assert_eq!(row.created_at, None);

        let row: Row = serde_json::from_str(r#"{"created_at": null}"#).unwrap();
        assert_eq!(row.created_at, None);

        let row: Row = serde_json::from_str("{}").unwrap();
        assert_eq!(row.created_at, None);

        let row: Row = serde_json::from_str(r#"{"created_at": "2024-03-10T09:00:00"}"#).unwrap();
        assert!(matches!(row.created_at, Some(Timestamp::Naive(_))));
    }

    #[test]
    fn serializes_back_to_text() {
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap();
        assert_eq!(
            serde_json::to_value(Timestamp::from(at)).unwrap(),
            serde_json::json!("2024-03-10T06:00:00+00:00")
        );
        let naive = Timestamp::parse("2024-03-10T09:00:00").unwrap();
        assert_eq!(
            serde_json::to_value(naive).unwrap(),
            serde_json::json!("2024-03-10T09:00:00")
        );
    }
}
