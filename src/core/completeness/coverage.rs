//! Slot coverage of one station's samples for one day

use crate::domain::{slot_of, Sample, StationId, UtcDay, SLOTS_PER_DAY};
use std::collections::{BTreeSet, HashSet};

/// Which of a day's 288 slots a station has samples for
#[derive(Debug, Clone, PartialEq)]
pub struct StationCoverage {
    pub station: StationId,
    slots: HashSet<usize>,
    /// Samples returned for the day, duplicates included
    pub sample_count: usize,
    /// Samples whose timestamp lies outside the day
    pub out_of_day: usize,
}

impl StationCoverage {
    /// Bucket `samples` into slots of `day`
    ///
    /// Order and duplicates do not matter; only slot presence counts.
    pub fn from_samples(station: StationId, day: UtcDay, samples: &[Sample]) -> Self {
        let mut slots = HashSet::with_capacity(SLOTS_PER_DAY);
        let mut out_of_day = 0;

        for sample in samples {
            match slot_of(day, sample.timestamp) {
                Some(slot) => {
                    slots.insert(slot);
                }
                None => out_of_day += 1,
            }
        }

        Self {
            station,
            slots,
            sample_count: samples.len(),
            out_of_day,
        }
    }

    pub fn slots_covered(&self) -> usize {
        self.slots.len()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.len() == SLOTS_PER_DAY
    }

    /// Slot indices without a sample, ascending
    pub fn missing_slots(&self) -> BTreeSet<usize> {
        (0..SLOTS_PER_DAY)
            .filter(|slot| !self.slots.contains(slot))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{slot_start, UnitSystem};
    use chrono::Duration;

    fn day() -> UtcDay {
        UtcDay::from_ymd(2024, 3, 13).unwrap()
    }

    fn sample_at(ts: chrono::DateTime<chrono::Utc>) -> Sample {
        Sample::empty(ts, UnitSystem::Us)
    }

    fn station() -> StationId {
        StationId::new("roof").unwrap()
    }

    #[test]
    fn test_full_day_is_complete() {
        let samples: Vec<_> = (0..SLOTS_PER_DAY)
            .map(|slot| sample_at(slot_start(day(), slot)))
            .collect();
        let coverage = StationCoverage::from_samples(station(), day(), &samples);
        assert!(coverage.is_complete());
        assert!(coverage.missing_slots().is_empty());
    }

    #[test]
    fn test_duplicates_do_not_fill_gaps() {
        // 288 samples but slot 287 missing and slot 0 doubled
        let mut samples: Vec<_> = (0..SLOTS_PER_DAY - 1)
            .map(|slot| sample_at(slot_start(day(), slot)))
            .collect();
        samples.push(sample_at(day().start() + Duration::seconds(90)));

        let coverage = StationCoverage::from_samples(station(), day(), &samples);
        assert_eq!(coverage.sample_count, SLOTS_PER_DAY);
        assert_eq!(coverage.slots_covered(), SLOTS_PER_DAY - 1);
        assert!(!coverage.is_complete());
        assert_eq!(coverage.missing_slots().into_iter().collect::<Vec<_>>(), vec![287]);
    }

    #[test]
    fn test_jittered_samples_truncate_into_slot() {
        let samples: Vec<_> = (0..SLOTS_PER_DAY)
            .map(|slot| sample_at(slot_start(day(), slot) + Duration::seconds(299)))
            .rev()
            .collect();
        let coverage = StationCoverage::from_samples(station(), day(), &samples);
        assert!(coverage.is_complete());
    }

    #[test]
    fn test_out_of_day_samples_are_counted_not_covered() {
        let samples = vec![
            sample_at(day().start() - Duration::seconds(1)),
            sample_at(day().end()),
            sample_at(day().start()),
        ];
        let coverage = StationCoverage::from_samples(station(), day(), &samples);
        assert_eq!(coverage.out_of_day, 2);
        assert_eq!(coverage.slots_covered(), 1);
    }
}
