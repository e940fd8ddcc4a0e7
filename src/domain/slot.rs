//! Five-minute sample slots within a UTC day

use super::day::UtcDay;
use chrono::{DateTime, Utc};

/// Width of one slot
pub const SLOT_SECONDS: i64 = 300;

/// Slots in one UTC day: 1440 minutes / 5
pub const SLOTS_PER_DAY: usize = 288;

/// Slot index of `timestamp` within `day`, by truncation to the 5-minute grid
///
/// Returns `None` when the timestamp lies outside the day.
///
/// # Examples
///
/// ```
/// use almanac::domain::day::UtcDay;
/// use almanac::domain::slot::slot_of;
/// use chrono::{TimeZone, Utc};
///
/// let day = UtcDay::from_ymd(2024, 3, 11).unwrap();
/// let ts = Utc.with_ymd_and_hms(2024, 3, 11, 0, 7, 59).unwrap();
/// assert_eq!(slot_of(day, ts), Some(1));
/// ```
pub fn slot_of(day: UtcDay, timestamp: DateTime<Utc>) -> Option<usize> {
    if !day.contains(timestamp) {
        return None;
    }
    let offset = (timestamp - day.start()).num_seconds();
    usize::try_from(offset / SLOT_SECONDS).ok()
}

/// Start time of slot `index` within `day`
pub fn slot_start(day: UtcDay, index: usize) -> DateTime<Utc> {
    day.start() + chrono::Duration::seconds(index as i64 * SLOT_SECONDS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_case::test_case;

    fn day() -> UtcDay {
        UtcDay::from_ymd(2024, 3, 11).unwrap()
    }

    #[test_case(0, 0, 0 => Some(0); "midnight")]
    #[test_case(0, 4, 59 => Some(0); "end of first slot")]
    #[test_case(0, 5, 0 => Some(1); "second slot boundary")]
    #[test_case(12, 0, 1 => Some(144); "jittered noon")]
    #[test_case(23, 55, 0 => Some(287); "last slot")]
    #[test_case(23, 59, 59 => Some(287); "last second")]
    fn test_slot_of(h: u32, m: u32, s: u32) -> Option<usize> {
        slot_of(day(), Utc.with_ymd_and_hms(2024, 3, 11, h, m, s).unwrap())
    }

    #[test]
    fn test_slot_of_outside_day() {
        let before = Utc.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();
        let after = Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap();
        assert_eq!(slot_of(day(), before), None);
        assert_eq!(slot_of(day(), after), None);
    }

    #[test]
    fn test_slot_start() {
        assert_eq!(
            slot_start(day(), 287),
            Utc.with_ymd_and_hms(2024, 3, 11, 23, 55, 0).unwrap()
        );
    }
}
