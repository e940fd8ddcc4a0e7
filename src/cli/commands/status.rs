//! Status command implementation
//!
//! This module implements the `status` command for displaying the
//! watermark and the days the next export run would evaluate.

use super::exit_code;
use crate::adapters::factory;
use crate::config::AlmanacConfig;
use crate::core::completeness::CompletenessEvaluator;
use crate::core::state::{StateManager, Watermark};
use crate::domain::{Result, UtcDay};
use chrono::{DateTime, Utc};
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug, Default)]
pub struct StatusArgs {
    /// Only read the watermark; do not query sources for the first day
    #[arg(long)]
    pub offline: bool,
}

/// Watermark and pending range at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub watermark: Option<Watermark>,
    /// First and last candidate day, if any day is pending
    pub pending: Option<(UtcDay, UtcDay)>,
    pub pending_days: usize,
}

impl StatusReport {
    /// Collect the status
    ///
    /// Without an evaluator, the pending range can only be computed when a
    /// watermark exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the watermark cannot be read or the origin query fails.
    pub async fn collect(
        state: &StateManager,
        evaluator: Option<&CompletenessEvaluator>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let watermark = state.load_watermark().await?;
        let watermark_day = watermark.as_ref().map(|w| w.last_exported_day);

        let days = match (evaluator, watermark_day) {
            (Some(evaluator), _) => evaluator.candidate_days(watermark_day, now, None).await?,
            (None, Some(_)) => CompletenessEvaluator::new(Vec::new())
                .candidate_days(watermark_day, now, None)
                .await?,
            (None, None) => Vec::new(),
        };

        Ok(Self {
            watermark,
            pending: days.first().copied().zip(days.last().copied()),
            pending_days: days.len(),
        })
    }
}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config: &AlmanacConfig) -> anyhow::Result<i32> {
        tracing::info!("Checking export status");

        println!("📊 Export Status");
        println!();

        let state = factory::create_state_manager(config);
        let evaluator = if self.offline {
            None
        } else {
            match factory::create_evaluator(config) {
                Ok(e) => Some(e),
                Err(e) => {
                    println!("❌ Failed to create sample sources");
                    println!("   Error: {e}");
                    return Ok(e.exit_code());
                }
            }
        };

        let report = match StatusReport::collect(&state, evaluator.as_ref(), Utc::now()).await {
            Ok(r) => r,
            Err(e) => {
                println!("❌ Failed to determine status");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        println!("  State: {}", state.location());
        match &report.watermark {
            Some(w) => {
                println!("  Last exported day: {}", w.last_exported_day);
                println!(
                    "  Updated at: {}",
                    w.updated_at.format("%Y-%m-%d %H:%M:%S UTC")
                );
                println!("  Days exported since reset: {}", w.days_exported_count);
            }
            None => {
                println!("  No export history found.");
                println!("  Run 'almanac export' to start exporting data.");
            }
        }

        match report.pending {
            Some((first, last)) => {
                println!(
                    "  Pending: {} day(s), {} .. {}",
                    report.pending_days, first, last
                )
            }
            None if self.offline && report.watermark.is_none() => {
                println!("  Pending: unknown without querying sources")
            }
            None => println!("  Pending: none"),
        }
        println!();

        Ok(exit_code::SUCCESS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::source::{MemorySampleSource, SampleSource};
    use crate::core::state::{MemoryWatermarkStore, WatermarkStore};
    use crate::domain::StationId;
    use chrono::TimeZone;
    use std::str::FromStr;
    use std::sync::Arc;

    fn day(s: &str) -> UtcDay {
        UtcDay::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_status_with_watermark() {
        let store = Arc::new(MemoryWatermarkStore::with_watermark(Watermark::new(day(
            "2024-03-10",
        ))));
        let state = StateManager::new(store as Arc<dyn WatermarkStore>);
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap();

        let report = StatusReport::collect(&state, None, now).await.unwrap();
        assert_eq!(report.pending, Some((day("2024-03-11"), day("2024-03-13"))));
        assert_eq!(report.pending_days, 3);
    }

    #[tokio::test]
    async fn test_status_without_watermark_uses_origin() {
        let source = Arc::new(MemorySampleSource::new(StationId::new("roof").unwrap()));
        source.fill_day(day("2024-03-12"), 5);
        let evaluator = CompletenessEvaluator::new(vec![source as Arc<dyn SampleSource>]);
        let state = StateManager::new(Arc::new(MemoryWatermarkStore::new()));
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).unwrap();

        let report = StatusReport::collect(&state, Some(&evaluator), now)
            .await
            .unwrap();
        assert!(report.watermark.is_none());
        assert_eq!(report.pending, Some((day("2024-03-12"), day("2024-03-13"))));
    }

    #[tokio::test]
    async fn test_status_up_to_date() {
        let store = Arc::new(MemoryWatermarkStore::with_watermark(Watermark::new(day(
            "2024-03-13",
        ))));
        let state = StateManager::new(store as Arc<dyn WatermarkStore>);
        let now = Utc.with_ymd_and_hms(2024, 3, 14, 0, 0, 0).unwrap();

        let report = StatusReport::collect(&state, None, now).await.unwrap();
        assert_eq!(report.pending, None);
        assert_eq!(report.pending_days, 0);
    }
}
