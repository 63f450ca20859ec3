//! Lenient date-time parsing for stored records.
//!
//! Interview and assignment times are saved as entered in the browser, which
//! gives wall-clock values without an offset (`2024-06-12T14:30`). Those are
//! read as local time. Values with an offset parse as RFC 3339.

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

/// Parse an RFC 3339 instant or an offset-less local date-time.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())?;

    // Wall-clock times skipped by a DST change fall back to UTC.
    Some(
        Local
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    )
}

/// `deserialize_with` helper for optional date-times. Missing, null and
/// blank values become `None`.
pub(crate) fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => parse_datetime(value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date-time: {}", value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339_keeps_offset() {
        let parsed = parse_datetime("2024-06-12T14:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 6, 12, 12, 30, 0).unwrap());
        assert_eq!(
            parse_datetime("2024-06-12T14:30:00.000Z"),
            Some(Utc.with_ymd_and_hms(2024, 6, 12, 14, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_browser_local_value_is_local_time() {
        let parsed = parse_datetime("2024-06-12T14:30").unwrap();
        let expected = Local
            .with_ymd_and_hms(2024, 6, 12, 14, 30, 0)
            .earliest()
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(parsed, expected);
        assert_eq!(parse_datetime("2024-06-12T14:30:15"), Some(expected + chrono::Duration::seconds(15)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_datetime("next tuesday").is_none());
        assert!(parse_datetime("").is_none());
    }
}
