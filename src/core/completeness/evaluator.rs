//! Completeness evaluator
//!
//! Enumerates the days a run should look at and decides, per day, whether
//! every station has a sample in every five-minute slot.

use crate::adapters::source::SampleSource;
use crate::core::completeness::coverage::StationCoverage;
use crate::domain::{day_range, earliest_day, QueryError, StationId, StationSamples, UtcDay};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Result of evaluating one day across all stations
#[derive(Debug, Clone)]
pub struct DayEvaluation {
    pub day: UtcDay,
    pub coverage: Vec<StationCoverage>,
    samples: Vec<StationSamples>,
}

impl DayEvaluation {
    /// Complete when there is at least one station and every station covers every slot
    pub fn is_complete(&self) -> bool {
        !self.coverage.is_empty() && self.coverage.iter().all(StationCoverage::is_complete)
    }

    /// Slots missing on any station, ascending
    pub fn missing_slots(&self) -> BTreeSet<usize> {
        self.coverage
            .iter()
            .flat_map(StationCoverage::missing_slots)
            .collect()
    }

    /// Samples across all stations, duplicates and out-of-day included
    pub fn sample_count(&self) -> usize {
        self.coverage.iter().map(|c| c.sample_count).sum()
    }

    /// Whether any station returned a sample inside the day
    pub fn has_samples(&self) -> bool {
        self.coverage.iter().any(|c| c.slots_covered() > 0)
    }

    /// Per-station samples for the archive, restricted to the day
    pub fn samples(&self) -> Vec<StationSamples> {
        self.samples
            .iter()
            .map(|s| {
                StationSamples::new(
                    s.station.clone(),
                    s.samples
                        .iter()
                        .filter(|sample| self.day.contains(sample.timestamp))
                        .cloned()
                        .collect(),
                )
            })
            .collect()
    }
}

/// Last day a run may consider: yesterday relative to `now`, or `stop` if earlier
pub fn last_candidate(now: DateTime<Utc>, stop: Option<UtcDay>) -> Option<UtcDay> {
    let yesterday = UtcDay::yesterday_of(now)?;
    Some(match stop {
        Some(stop) => stop.min(yesterday),
        None => yesterday,
    })
}

/// Candidate days from `first` through `last`, never before the earliest day
pub fn candidate_range(first: UtcDay, last: UtcDay) -> Vec<UtcDay> {
    day_range(first.max(earliest_day()), last)
}

/// Evaluates day completeness over a set of station sources
pub struct CompletenessEvaluator {
    sources: Vec<Arc<dyn SampleSource>>,
}

impl CompletenessEvaluator {
    pub fn new(sources: Vec<Arc<dyn SampleSource>>) -> Self {
        Self { sources }
    }

    pub fn stations(&self) -> Vec<StationId> {
        self.sources.iter().map(|s| s.station().clone()).collect()
    }

    /// Day of the oldest sample on any station, clamped to the earliest day
    ///
    /// # Errors
    ///
    /// Returns an error if a source cannot be queried.
    pub async fn origin(&self) -> Result<Option<UtcDay>, QueryError> {
        let mut origin: Option<UtcDay> = None;
        for source in &self.sources {
            if let Some(earliest) = source.earliest_sample().await? {
                let day = UtcDay::from_datetime(earliest);
                origin = Some(origin.map_or(day, |o| o.min(day)));
            }
        }
        Ok(origin.map(|day| day.max(earliest_day())))
    }

    /// Days to evaluate this run, ascending
    ///
    /// Starts after `watermark`, or at [`Self::origin`] when nothing has been
    /// exported yet. Ends at yesterday relative to `now` (or `stop`, if earlier).
    ///
    /// # Errors
    ///
    /// Returns an error if the origin has to be queried and the query fails.
    pub async fn candidate_days(
        &self,
        watermark: Option<UtcDay>,
        now: DateTime<Utc>,
        stop: Option<UtcDay>,
    ) -> Result<Vec<UtcDay>, QueryError> {
        let Some(last) = last_candidate(now, stop) else {
            return Ok(Vec::new());
        };

        let first = match watermark {
            Some(watermark) => watermark.succ(),
            None => self.origin().await?,
        };

        Ok(first
            .map(|first| candidate_range(first, last))
            .unwrap_or_default())
    }

    /// Query every station for `day` and compute slot coverage
    ///
    /// # Errors
    ///
    /// Returns an error if any source fails; an incomplete day is not an error.
    pub async fn evaluate(&self, day: UtcDay) -> Result<DayEvaluation, QueryError> {
        let mut coverage = Vec::with_capacity(self.sources.len());
        let mut samples = Vec::with_capacity(self.sources.len());

        for source in &self.sources {
            let station = source.station().clone();
            let day_samples = source.query_samples(day).await?;
            let station_coverage = StationCoverage::from_samples(station.clone(), day, &day_samples);

            if station_coverage.out_of_day > 0 {
                tracing::warn!(
                    station = %station,
                    day = %day,
                    out_of_day = station_coverage.out_of_day,
                    "Source returned samples outside the requested day; ignoring them"
                );
            }

            tracing::debug!(
                station = %station,
                day = %day,
                samples = station_coverage.sample_count,
                slots_covered = station_coverage.slots_covered(),
                "Evaluated station coverage"
            );

            coverage.push(station_coverage);
            samples.push(StationSamples::new(station, day_samples));
        }

        Ok(DayEvaluation {
            day,
            coverage,
            samples,
        })
    }

    /// Whether `day` is complete on every station
    ///
    /// # Errors
    ///
    /// Returns an error if any source fails.
    pub async fn is_complete(&self, day: UtcDay) -> Result<bool, QueryError> {
        Ok(self.evaluate(day).await?.is_complete())
    }
}
