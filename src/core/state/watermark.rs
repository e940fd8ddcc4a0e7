//! Watermark model for tracking export state
//!
//! The watermark records the last UTC day whose archive file was durably
//! written. It only ever moves forward one day at a time during an export run.

use crate::domain::UtcDay;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version of the persisted watermark document
pub const WATERMARK_VERSION: u32 = 1;

/// Persisted watermark document
///
/// # Examples
///
/// ```
/// use almanac::core::state::watermark::Watermark;
/// use almanac::domain::UtcDay;
///
/// let day = UtcDay::from_ymd(2024, 3, 12).unwrap();
/// let watermark = Watermark::new(day);
/// assert_eq!(watermark.last_exported_day, day);
/// assert_eq!(watermark.days_exported_count, 0);
///
/// let next = watermark.advanced_to(day.succ().unwrap());
/// assert_eq!(next.days_exported_count, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Watermark {
    /// Document format version
    pub version: u32,

    /// Last day successfully exported
    pub last_exported_day: UtcDay,

    /// When this document was written
    pub updated_at: DateTime<Utc>,

    /// Days exported since the state was created or reset
    #[serde(default)]
    pub days_exported_count: u64,
}

impl Watermark {
    /// Create a fresh watermark at `day`
    pub fn new(day: UtcDay) -> Self {
        Self {
            version: WATERMARK_VERSION,
            last_exported_day: day,
            updated_at: Utc::now(),
            days_exported_count: 0,
        }
    }

    /// The watermark after exporting `day`
    pub fn advanced_to(&self, day: UtcDay) -> Self {
        Self {
            version: WATERMARK_VERSION,
            last_exported_day: day,
            updated_at: Utc::now(),
            days_exported_count: self.days_exported_count + 1,
        }
    }

    /// First day that has not been exported yet
    pub fn next_day(&self) -> Option<UtcDay> {
        self.last_exported_day.succ()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_advance_increments_count() {
        let d1 = UtcDay::from_str("2024-03-10").unwrap();
        let d2 = UtcDay::from_str("2024-03-11").unwrap();

        let watermark = Watermark::new(d1).advanced_to(d2);
        assert_eq!(watermark.last_exported_day, d2);
        assert_eq!(watermark.days_exported_count, 1);
        assert_eq!(watermark.next_day(), UtcDay::from_str("2024-03-12").ok());
    }

    #[test]
    fn test_watermark_serialization() {
        let day = UtcDay::from_str("2024-03-12").unwrap();
        let watermark = Watermark::new(day);

        let json = serde_json::to_string(&watermark).unwrap();
        assert!(json.contains("\"last_exported_day\":\"2024-03-12\""));

        let back: Watermark = serde_json::from_str(&json).unwrap();
        assert_eq!(back, watermark);
    }

    #[test]
    fn test_missing_count_defaults_to_zero() {
        let json = r#"{"version":1,"last_exported_day":"2024-03-12","updated_at":"2024-03-13T00:05:00Z"}"#;
        let watermark: Watermark = serde_json::from_str(json).unwrap();
        assert_eq!(watermark.days_exported_count, 0);
    }
}
