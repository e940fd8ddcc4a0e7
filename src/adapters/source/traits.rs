//! Sample source abstraction
//!
//! This module defines the trait a station's sample store must implement
//! so the completeness evaluator can query it.

use crate::domain::{QueryError, Sample, StationId, UtcDay};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of timestamped samples for one station
///
/// Samples may come back in any order and may contain duplicates.
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Station this source serves
    fn station(&self) -> &StationId;

    /// Timestamp of the oldest sample, `None` when the source is empty
    ///
    /// # Errors
    ///
    /// Returns an error if the source is unreachable or returns malformed data.
    async fn earliest_sample(&self) -> Result<Option<DateTime<Utc>>, QueryError>;

    /// Every sample whose timestamp falls within `day`
    ///
    /// # Errors
    ///
    /// Returns an error if the source is unreachable or returns malformed data.
    async fn query_samples(&self, day: UtcDay) -> Result<Vec<Sample>, QueryError>;
}
