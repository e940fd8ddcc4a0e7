//! In-memory sample source
//!
//! Holds samples in a vector and serves day queries from it. Used by tests
//! and for replaying captured data.

use crate::adapters::source::traits::SampleSource;
use crate::domain::{slot_start, QueryError, Sample, StationId, UnitSystem, UtcDay, SLOTS_PER_DAY};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Mutex;

/// Sample source backed by a vector
pub struct MemorySampleSource {
    station: StationId,
    samples: Mutex<Vec<Sample>>,
    failing_days: Mutex<HashSet<UtcDay>>,
    queried: Mutex<Vec<UtcDay>>,
}

impl MemorySampleSource {
    pub fn new(station: StationId) -> Self {
        Self {
            station,
            samples: Mutex::new(Vec::new()),
            failing_days: Mutex::new(HashSet::new()),
            queried: Mutex::new(Vec::new()),
        }
    }

    /// Add arbitrary samples
    pub fn push_samples(&self, samples: impl IntoIterator<Item = Sample>) {
        self.samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend(samples);
    }

    /// Add one metric sample at the start of each of the first `slots` slots of `day`
    pub fn fill_day(&self, day: UtcDay, slots: usize) {
        let samples = (0..slots.min(SLOTS_PER_DAY)).map(|slot| {
            let mut sample = Sample::empty(slot_start(day, slot), UnitSystem::Metric);
            sample.values[4] = Some(slot as f64 / 10.0);
            sample
        });
        self.push_samples(samples);
    }

    /// Add samples for every slot of `day` except those in `missing`
    pub fn fill_day_except(&self, day: UtcDay, missing: &[usize]) {
        let samples = (0..SLOTS_PER_DAY)
            .filter(|slot| !missing.contains(slot))
            .map(|slot| Sample::empty(slot_start(day, slot), UnitSystem::Metric));
        self.push_samples(samples);
    }

    /// Make queries for `day` fail
    pub fn fail_on(&self, day: UtcDay) {
        self.failing_days
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(day);
    }

    /// Days queried so far, in call order
    pub fn queried_days(&self) -> Vec<UtcDay> {
        self.queried
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl SampleSource for MemorySampleSource {
    fn station(&self) -> &StationId {
        &self.station
    }

    async fn earliest_sample(&self) -> Result<Option<DateTime<Utc>>, QueryError> {
        Ok(self
            .samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|s| s.timestamp)
            .min())
    }

    async fn query_samples(&self, day: UtcDay) -> Result<Vec<Sample>, QueryError> {
        self.queried
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(day);

        if self
            .failing_days
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&day)
        {
            return Err(QueryError::ConnectionFailed {
                station: self.station.to_string(),
                message: format!("simulated failure for {day}"),
            });
        }

        Ok(self
            .samples
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|s| day.contains(s.timestamp))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_memory_source_filters_by_day() {
        let source = MemorySampleSource::new(StationId::new("roof").unwrap());
        let d1 = UtcDay::from_str("2024-03-11").unwrap();
        let d2 = UtcDay::from_str("2024-03-12").unwrap();
        source.fill_day(d1, 288);
        source.fill_day(d2, 10);

        assert_eq!(source.query_samples(d1).await.unwrap().len(), 288);
        assert_eq!(source.query_samples(d2).await.unwrap().len(), 10);
        assert_eq!(source.earliest_sample().await.unwrap(), Some(d1.start()));
        assert_eq!(source.queried_days(), vec![d1, d2]);
    }

    #[tokio::test]
    async fn test_memory_source_failure() {
        let source = MemorySampleSource::new(StationId::new("roof").unwrap());
        let day = UtcDay::from_str("2024-03-11").unwrap();
        source.fail_on(day);

        assert!(source.query_samples(day).await.is_err());
    }

    #[tokio::test]
    async fn test_memory_source_empty() {
        let source = MemorySampleSource::new(StationId::new("roof").unwrap());
        assert_eq!(source.earliest_sample().await.unwrap(), None);
    }
}
