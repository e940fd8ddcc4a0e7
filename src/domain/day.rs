//! UTC calendar day, the unit of export

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar date in UTC
///
/// Ordering is chronological. Serializes as `YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use almanac::domain::day::UtcDay;
/// use std::str::FromStr;
///
/// let day = UtcDay::from_str("20240229").unwrap();
/// assert_eq!(day.to_string(), "2024-02-29");
/// assert_eq!(day.succ().unwrap().to_string(), "2024-03-01");
/// assert_eq!(day.compact(), "20240229");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UtcDay(NaiveDate);

/// The earliest day the exporter will ever consider (2000-01-01)
pub fn earliest_day() -> UtcDay {
    UtcDay(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or(NaiveDate::MIN))
}

impl UtcDay {
    /// Creates a day from its calendar components
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// The UTC day containing `instant`
    pub fn from_datetime(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }

    /// The day before the UTC day containing `now`
    pub fn yesterday_of(now: DateTime<Utc>) -> Option<Self> {
        Self::from_datetime(now).pred()
    }

    /// The following day, handling month and year rollover
    pub fn succ(&self) -> Option<Self> {
        self.0.succ_opt().map(Self)
    }

    /// The preceding day
    pub fn pred(&self) -> Option<Self> {
        self.0.pred_opt().map(Self)
    }

    /// 00:00:00 UTC on this day
    pub fn start(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::default()).and_utc()
    }

    /// 00:00:00 UTC on the following day (exclusive end of this day)
    pub fn end(&self) -> DateTime<Utc> {
        self.start() + chrono::Duration::days(1)
    }

    /// Whether `instant` falls inside this day
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start() && instant < self.end()
    }

    /// First day of this day's month
    pub fn month_start(&self) -> Self {
        Self(self.0.with_day(1).unwrap_or(self.0))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// `YYYYMMDD`
    pub fn compact(&self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// Underlying calendar date
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for UtcDay {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for UtcDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for UtcDay {
    type Err = String;

    /// Accepts `YYYYMMDD` or `YYYY-MM-DD`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let format = if s.len() == 8 { "%Y%m%d" } else { "%Y-%m-%d" };
        NaiveDate::parse_from_str(s, format)
            .map(Self)
            .map_err(|e| format!("'{s}' is not a day of the form YYYYMMDD: {e}"))
    }
}

/// Every day from `first` through `last` inclusive, ascending
///
/// Empty when `first > last`.
pub fn day_range(first: UtcDay, last: UtcDay) -> Vec<UtcDay> {
    std::iter::successors(Some(first), |day| day.succ())
        .take_while(|day| *day <= last)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn day(s: &str) -> UtcDay {
        UtcDay::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_both_formats() {
        assert_eq!(day("20240311"), day("2024-03-11"));
        assert!(UtcDay::from_str("2024-13-01").is_err());
        assert!(UtcDay::from_str("yesterday").is_err());
    }

    #[test]
    fn test_succ_rolls_over_month_and_year() {
        assert_eq!(day("2024-01-31").succ(), Some(day("2024-02-01")));
        assert_eq!(day("2023-02-28").succ(), Some(day("2023-03-01")));
        assert_eq!(day("2023-12-31").succ(), Some(day("2024-01-01")));
        assert_eq!(day("2024-01-01").pred(), Some(day("2023-12-31")));
    }

    #[test]
    fn test_start_end_contains() {
        let d = day("2024-03-15");
        assert_eq!(d.start(), Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap());
        assert_eq!(d.end(), Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap());
        assert!(d.contains(Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap()));
        assert!(!d.contains(d.end()));
    }

    #[test]
    fn test_yesterday_of() {
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 10, 0, 0).unwrap();
        assert_eq!(UtcDay::yesterday_of(now), Some(day("2024-03-14")));
        let midnight = Utc.with_ymd_and_hms(2024, 1, 2, 0, 10, 0).unwrap();
        assert_eq!(UtcDay::yesterday_of(midnight), Some(day("2024-01-01")));
    }

    #[test]
    fn test_month_start() {
        assert_eq!(day("2024-03-15").month_start(), day("2024-03-01"));
    }

    #[test]
    fn test_day_range() {
        let days = day_range(day("2024-02-28"), day("2024-03-01"));
        assert_eq!(days, vec![day("2024-02-28"), day("2024-02-29"), day("2024-03-01")]);
        assert!(day_range(day("2024-03-02"), day("2024-03-01")).is_empty());
    }

    #[test]
    fn test_serde_format() {
        let json = serde_json::to_string(&day("2024-03-12")).unwrap();
        assert_eq!(json, "\"2024-03-12\"");
        let back: UtcDay = serde_json::from_str(&json).unwrap();
        assert_eq!(back, day("2024-03-12"));
        assert!(serde_json::from_str::<UtcDay>("\"2024-02-30\"").is_err());
    }

    #[test]
    fn test_earliest_day() {
        assert_eq!(earliest_day(), day("2000-01-01"));
    }
}
