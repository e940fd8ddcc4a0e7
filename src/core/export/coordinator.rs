//! Export coordinator - main orchestrator for the export process
//!
//! One run loads the watermark, walks the candidate days in ascending order
//! and, for each complete day, writes the archive file and then commits the
//! day to the watermark before looking at the next one. The run stops at the
//! first incomplete day; any error stops it without touching state for the
//! day that failed.

use crate::adapters::archive::ArchiveWriter;
use crate::core::completeness::CompletenessEvaluator;
use crate::core::export::summary::{ExportSummary, RunOutcome};
use crate::core::state::StateManager;
use crate::core::verification::Verifier;
use crate::domain::{Result, UtcDay};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Operator controls for one run
///
/// The default runs the plain incremental export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Do not look at days after this one
    pub stop: Option<UtcDay>,
    /// Export incomplete days instead of halting on them
    pub force: bool,
    /// Evaluate only; write no archives and save no watermark
    pub dry_run: bool,
}

/// Export coordinator
pub struct ExportCoordinator {
    state: StateManager,
    evaluator: CompletenessEvaluator,
    writer: Arc<dyn ArchiveWriter>,
    verifier: Option<Verifier>,
    shutdown: Option<watch::Receiver<bool>>,
}

impl ExportCoordinator {
    /// Create a new export coordinator
    pub fn new(
        state: StateManager,
        evaluator: CompletenessEvaluator,
        writer: Arc<dyn ArchiveWriter>,
    ) -> Self {
        Self {
            state,
            evaluator,
            writer,
            verifier: None,
            shutdown: None,
        }
    }

    /// Verify every written file before committing its day
    pub fn with_verifier(mut self, verifier: Verifier) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Stop between days once `shutdown` turns true
    pub fn with_shutdown(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn evaluator(&self) -> &CompletenessEvaluator {
        &self.evaluator
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }

    /// Execute one export run
    ///
    /// `now` decides which day is today; today is never exported.
    ///
    /// # Errors
    ///
    /// Returns the first storage, query or export error. Days committed
    /// before the error stay committed; the failing day stays pending.
    pub async fn run(&self, now: DateTime<Utc>, options: &RunOptions) -> Result<ExportSummary> {
        let start_time = Instant::now();

        let mut watermark = self.state.load_watermark().await?;
        let watermark_day = watermark.as_ref().map(|w| w.last_exported_day);
        let mut summary = ExportSummary::new(watermark_day);
        summary.dry_run = options.dry_run;

        let days = self
            .evaluator
            .candidate_days(watermark_day, now, options.stop)
            .await?;
        summary.first_day = days.first().copied();
        summary.last_candidate = days.last().copied();

        tracing::info!(
            run_id = %summary.run_id,
            watermark = ?watermark_day.map(|d| d.to_string()),
            candidates = days.len(),
            first_day = ?summary.first_day.map(|d| d.to_string()),
            last_day = ?summary.last_candidate.map(|d| d.to_string()),
            force = options.force,
            dry_run = options.dry_run,
            "Starting export run"
        );

        if !days.is_empty() {
            summary.outcome = RunOutcome::Done;
        }

        for day in days {
            if self.shutdown_requested() {
                tracing::warn!(day = %day, "Shutdown requested; stopping before next day");
                summary.outcome = RunOutcome::Interrupted;
                break;
            }

            let evaluation = self.evaluator.evaluate(day).await?;

            if !evaluation.is_complete() {
                let missing_slots = evaluation.missing_slots().len();
                if !options.force {
                    summary.outcome = RunOutcome::Halted { day, missing_slots };
                    summary.last_evaluation = Some(evaluation);
                    break;
                }
                tracing::warn!(
                    day = %day,
                    missing_slots,
                    "Exporting incomplete day because force is set"
                );
            }

            if !evaluation.has_samples() {
                tracing::warn!(day = %day, "No samples on any station; skipping file");
                summary.days_skipped.push(day);
            } else if options.dry_run {
                tracing::info!(
                    day = %day,
                    samples = evaluation.sample_count(),
                    location = %self.writer.location(),
                    "Dry run: would export day"
                );
                summary.days_exported.push(day);
            } else {
                let record = self.writer.export(day, &evaluation.samples()).await?;
                if let Some(verifier) = &self.verifier {
                    verifier.verify(&record).await?;
                }
                crate::log_day_exported!(day, record.records, record.path.display());
                summary.add_archive(record);
            }

            if !options.dry_run {
                watermark = Some(self.state.checkpoint_day(watermark.as_ref(), day).await?);
                summary.watermark_after = Some(day);
            }

            summary.last_evaluation = Some(evaluation);
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::archive::MemoryArchiveWriter;
    use crate::adapters::source::{MemorySampleSource, SampleSource};
    use crate::core::state::{MemoryWatermarkStore, Watermark, WatermarkStore};
    use crate::domain::{AlmanacError, StationId};
    use chrono::TimeZone;
    use std::str::FromStr;

    fn day(s: &str) -> UtcDay {
        UtcDay::from_str(s).unwrap()
    }

    struct Fixture {
        source: Arc<MemorySampleSource>,
        store: Arc<MemoryWatermarkStore>,
        writer: Arc<MemoryArchiveWriter>,
    }

    impl Fixture {
        fn new(watermark: Option<&str>) -> Self {
            let store = match watermark {
                Some(d) => MemoryWatermarkStore::with_watermark(Watermark::new(day(d))),
                None => MemoryWatermarkStore::new(),
            };
            Self {
                source: Arc::new(MemorySampleSource::new(StationId::new("roof").unwrap())),
                store: Arc::new(store),
                writer: Arc::new(MemoryArchiveWriter::new()),
            }
        }

        fn coordinator(&self) -> ExportCoordinator {
            ExportCoordinator::new(
                StateManager::new(self.store.clone() as Arc<dyn WatermarkStore>),
                CompletenessEvaluator::new(vec![self.source.clone() as Arc<dyn SampleSource>]),
                self.writer.clone() as Arc<dyn ArchiveWriter>,
            )
        }

        fn watermark(&self) -> Option<UtcDay> {
            self.store.current().map(|w| w.last_exported_day)
        }
    }

    #[tokio::test]
    async fn test_halts_at_first_incomplete_day() {
        let fx = Fixture::new(Some("2024-03-10"));
        fx.source.fill_day(day("2024-03-11"), 288);
        fx.source.fill_day(day("2024-03-12"), 287);
        fx.source.fill_day(day("2024-03-13"), 288);
        let now = Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap();

        let summary = fx.coordinator().run(now, &RunOptions::default()).await.unwrap();

        assert_eq!(fx.writer.exported_days(), vec![day("2024-03-11")]);
        assert_eq!(
            summary.outcome,
            RunOutcome::Halted {
                day: day("2024-03-12"),
                missing_slots: 1
            }
        );
        assert_eq!(fx.watermark(), Some(day("2024-03-11")));
    }

    #[tokio::test]
    async fn test_force_exports_incomplete_and_skips_empty_days() {
        let fx = Fixture::new(Some("2024-03-10"));
        fx.source.fill_day(day("2024-03-11"), 10);
        let now = Utc.with_ymd_and_hms(2024, 3, 13, 0, 0, 0).unwrap();
        let options = RunOptions {
            force: true,
            ..RunOptions::default()
        };

        let summary = fx.coordinator().run(now, &options).await.unwrap();

        assert_eq!(summary.outcome, RunOutcome::Done);
        assert_eq!(summary.days_exported, vec![day("2024-03-11")]);
        assert_eq!(summary.days_skipped, vec![day("2024-03-12")]);
        assert_eq!(fx.watermark(), Some(day("2024-03-12")));
        assert_eq!(summary.records_written, 10);
    }

    #[tokio::test]
    async fn test_dry_run_writes_and_saves_nothing() {
        let fx = Fixture::new(Some("2024-03-10"));
        fx.source.fill_day(day("2024-03-11"), 288);
        fx.source.fill_day(day("2024-03-12"), 288);
        let now = Utc.with_ymd_and_hms(2024, 3, 13, 0, 0, 0).unwrap();
        let options = RunOptions {
            dry_run: true,
            ..RunOptions::default()
        };

        let summary = fx.coordinator().run(now, &options).await.unwrap();

        assert_eq!(summary.days_exported.len(), 2);
        assert!(fx.writer.exported_days().is_empty());
        assert!(fx.store.history().is_empty());
        assert_eq!(summary.watermark_after, Some(day("2024-03-10")));
    }

    #[tokio::test]
    async fn test_shutdown_before_first_day() {
        let fx = Fixture::new(Some("2024-03-10"));
        fx.source.fill_day(day("2024-03-11"), 288);
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 13, 0, 0, 0).unwrap();

        let summary = fx
            .coordinator()
            .with_shutdown(rx)
            .run(now, &RunOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.outcome, RunOutcome::Interrupted);
        assert!(fx.writer.exported_days().is_empty());
    }

    #[tokio::test]
    async fn test_failing_save_is_storage_error() {
        let source = Arc::new(MemorySampleSource::new(StationId::new("roof").unwrap()));
        source.fill_day(day("2024-03-11"), 288);
        let store = Arc::new(
            MemoryWatermarkStore::with_watermark(Watermark::new(day("2024-03-10"))).failing_saves(),
        );
        let writer = Arc::new(MemoryArchiveWriter::new());
        let coordinator = ExportCoordinator::new(
            StateManager::new(store.clone() as Arc<dyn WatermarkStore>),
            CompletenessEvaluator::new(vec![source as Arc<dyn SampleSource>]),
            writer as Arc<dyn ArchiveWriter>,
        );
        let now = Utc.with_ymd_and_hms(2024, 3, 13, 0, 0, 0).unwrap();

        let result = coordinator.run(now, &RunOptions::default()).await;
        assert!(matches!(result, Err(AlmanacError::Storage(_))));
        assert_eq!(
            store.current().map(|w| w.last_exported_day),
            Some(day("2024-03-10"))
        );
    }

    #[tokio::test]
    async fn test_nothing_to_do() {
        let fx = Fixture::new(Some("2024-03-12"));
        let now = Utc.with_ymd_and_hms(2024, 3, 13, 8, 0, 0).unwrap();

        let summary = fx.coordinator().run(now, &RunOptions::default()).await.unwrap();
        assert_eq!(summary.outcome, RunOutcome::NothingToDo);
        assert!(fx.source.queried_days().is_empty());
    }
}
