//! Period key derivation.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Format of daily and weekly keys.
pub const KEY_FORMAT: &str = "%Y-%m-%d";

/// Digest period type.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PeriodKind {
    Daily,
    Weekly,
}

impl PeriodKind {
    /// Key identifying the period that contains `now`.
    pub fn key_for<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> String {
        match self {
            PeriodKind::Daily => daily_key(now),
            PeriodKind::Weekly => weekly_key(now),
        }
    }
}

/// Local calendar date of `now`, e.g. `2024-06-03`.
pub fn daily_key<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    now.date_naive().format(KEY_FORMAT).to_string()
}

/// Date of the Monday on or before `now`.
pub fn weekly_key<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    week_anchor(now.date_naive()).format(KEY_FORMAT).to_string()
}

/// Monday on or before `date`.
pub fn week_anchor(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Parse a stored key. Unpadded keys such as `2024-6-3` are accepted.
pub fn parse_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), KEY_FORMAT).ok()
}

/// Whether a send recorded under `stored` accounts for the period `key`.
///
/// True when `stored` names the same period or a later one. Keys that do not
/// parse only match themselves.
pub fn covers(stored: &str, key: &str) -> bool {
    match (parse_key(stored), parse_key(key)) {
        (Some(stored), Some(key)) => stored >= key,
        _ => stored == key,
    }
}
