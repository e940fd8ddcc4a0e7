//! Export summary and reporting
//!
//! This module defines structures for tracking and reporting the result of
//! one export run. Failures are not recorded here: a failed run returns an
//! error instead of a summary.

use crate::adapters::archive::ArchiveRecord;
use crate::core::completeness::DayEvaluation;
use crate::domain::UtcDay;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every candidate day was exported
    Done,
    /// Stopped at the first incomplete day
    Halted { day: UtcDay, missing_slots: usize },
    /// Shutdown was requested between two days
    Interrupted,
    /// There were no candidate days
    NothingToDo,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Done => write!(f, "done"),
            RunOutcome::Halted { day, missing_slots } => {
                write!(f, "halted at {day} ({missing_slots} slots missing)")
            }
            RunOutcome::Interrupted => write!(f, "interrupted"),
            RunOutcome::NothingToDo => write!(f, "nothing to do"),
        }
    }
}

/// Summary of an export run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Correlates the log lines of one run
    pub run_id: Uuid,

    /// First and last candidate day, when there were any
    pub first_day: Option<UtcDay>,
    pub last_candidate: Option<UtcDay>,

    /// Watermark at the start and end of the run
    pub watermark_before: Option<UtcDay>,
    pub watermark_after: Option<UtcDay>,

    /// Days written to the archive, ascending
    pub days_exported: Vec<UtcDay>,

    /// Forced days with no samples anywhere; committed but not written
    pub days_skipped: Vec<UtcDay>,

    pub outcome: RunOutcome,

    pub duration: Duration,

    /// Samples written across all days and stations
    pub records_written: usize,

    pub archives: Vec<ArchiveRecord>,

    /// Evaluation of the last day looked at
    pub last_evaluation: Option<DayEvaluation>,

    /// Nothing was written or saved
    pub dry_run: bool,
}

impl ExportSummary {
    /// Create a new empty export summary
    pub fn new(watermark_before: Option<UtcDay>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            first_day: None,
            last_candidate: None,
            watermark_before,
            watermark_after: watermark_before,
            days_exported: Vec::new(),
            days_skipped: Vec::new(),
            outcome: RunOutcome::NothingToDo,
            duration: Duration::from_secs(0),
            records_written: 0,
            archives: Vec::new(),
            last_evaluation: None,
            dry_run: false,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a day file written for `day`
    pub fn add_archive(&mut self, record: ArchiveRecord) {
        self.records_written += record.records;
        self.days_exported.push(record.day);
        self.archives.push(record);
    }

    pub fn is_halted(&self) -> bool {
        matches!(self.outcome, RunOutcome::Halted { .. })
    }

    /// Days the watermark moved forward this run
    pub fn days_committed(&self) -> usize {
        match (self.watermark_before, self.watermark_after) {
            (_, None) => 0,
            (None, Some(_)) => self.days_exported.len() + self.days_skipped.len(),
            (Some(before), Some(after)) => {
                usize::try_from((after.date() - before.date()).num_days()).unwrap_or(0)
            }
        }
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            run_id = %self.run_id,
            outcome = %self.outcome,
            days_exported = self.days_exported.len(),
            days_skipped = self.days_skipped.len(),
            records_written = self.records_written,
            watermark_before = ?self.watermark_before.map(|d| d.to_string()),
            watermark_after = ?self.watermark_after.map(|d| d.to_string()),
            duration_ms = self.duration.as_millis() as u64,
            dry_run = self.dry_run,
            "Export run finished"
        );

        if let RunOutcome::Halted { day, missing_slots } = &self.outcome {
            tracing::info!(
                day = %day,
                missing_slots,
                "Day is not complete yet; it will be retried on the next run"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::str::FromStr;

    fn day(s: &str) -> UtcDay {
        UtcDay::from_str(s).unwrap()
    }

    #[test]
    fn test_export_summary_creation() {
        let summary = ExportSummary::new(Some(day("2024-03-10")));

        assert_eq!(summary.outcome, RunOutcome::NothingToDo);
        assert_eq!(summary.watermark_after, Some(day("2024-03-10")));
        assert!(summary.days_exported.is_empty());
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert_eq!(summary.days_committed(), 0);
    }

    #[test]
    fn test_add_archive() {
        let mut summary = ExportSummary::new(None);
        summary.add_archive(ArchiveRecord {
            day: day("2024-01-01"),
            path: PathBuf::from("a.json"),
            records: 288,
            checksum: String::new(),
        });
        summary.watermark_after = Some(day("2024-01-01"));

        assert_eq!(summary.records_written, 288);
        assert_eq!(summary.days_exported, vec![day("2024-01-01")]);
        assert_eq!(summary.days_committed(), 1);
    }

    #[test]
    fn test_outcome_display() {
        let outcome = RunOutcome::Halted {
            day: day("2024-03-13"),
            missing_slots: 1,
        };
        assert_eq!(outcome.to_string(), "halted at 2024-03-13 (1 slots missing)");
        assert_eq!(RunOutcome::NothingToDo.to_string(), "nothing to do");
    }

    #[test]
    fn test_days_committed_counts_skipped() {
        let mut summary = ExportSummary::new(Some(day("2024-03-10")));
        summary.watermark_after = Some(day("2024-03-13"));
        assert_eq!(summary.days_committed(), 3);
    }
}
