//! Export command implementation
//!
//! This module implements the `export` command: one incremental run from
//! the watermark up to yesterday, halting at the first incomplete day.

use super::exit_code;
use crate::adapters::factory;
use crate::config::AlmanacConfig;
use crate::core::completeness::CompletenessEvaluator;
use crate::core::export::{ExportCoordinator, ExportSummary, RunOptions, RunOutcome};
use crate::core::verification::Verifier;
use crate::domain::UtcDay;
use crate::metrics::{write_textfile, RunReport};
use chrono::Utc;
use clap::Args;
use tokio::sync::watch;

/// Arguments for the export command
#[derive(Args, Debug, Default)]
pub struct ExportArgs {
    /// Do not export days after this one (YYYYMMDD)
    #[arg(long, value_name = "YYYYMMDD")]
    pub stop: Option<UtcDay>,

    /// Export incomplete days instead of halting on them
    #[arg(long)]
    pub force: bool,

    /// Evaluate days without writing archives or saving the watermark
    #[arg(long)]
    pub dry_run: bool,
}

impl ExportArgs {
    fn run_options(&self) -> RunOptions {
        RunOptions {
            stop: self.stop,
            force: self.force,
            dry_run: self.dry_run,
        }
    }

    /// Execute the export command
    pub async fn execute(
        &self,
        config: &AlmanacConfig,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(
            stop = ?self.stop.map(|d| d.to_string()),
            force = self.force,
            dry_run = self.dry_run,
            "Starting export command"
        );

        let now = Utc::now();

        if let Some(stop) = self.stop {
            if stop.start() > now {
                eprintln!("Stop day {stop} is in the future");
                return Ok(exit_code::CONFIGURATION);
            }
        }

        if self.dry_run {
            println!("🔍 DRY RUN MODE - no archives will be written, no state saved");
            println!();
        }

        let coordinator = match build_coordinator(config, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                report(config, RunReport::failed(e.exit_code(), now)).await;
                return Ok(e.exit_code());
            }
        };

        let summary = match coordinator.run(now, &self.run_options()).await {
            Ok(s) => s,
            Err(e) => {
                crate::log_error_with_context!(e, "Export failed");
                eprintln!("Export failed: {e}");
                report(config, RunReport::failed(e.exit_code(), now)).await;
                return Ok(e.exit_code());
            }
        };

        print_summary(&summary);

        let code = outcome_exit_code(&summary.outcome);
        if !self.dry_run && config.metrics.textfile_dir.is_some() {
            let mut run_report = RunReport::from_summary(code, now, &summary);
            count_yesterday(coordinator.evaluator(), &summary, &mut run_report).await;
            report(config, run_report).await;
        }

        Ok(code)
    }
}

fn build_coordinator(
    config: &AlmanacConfig,
    shutdown_signal: watch::Receiver<bool>,
) -> crate::domain::Result<ExportCoordinator> {
    let evaluator = factory::create_evaluator(config)?;
    let writer = factory::create_archive_writer(config)?;
    let state = factory::create_state_manager(config);

    let mut coordinator =
        ExportCoordinator::new(state, evaluator, writer).with_shutdown(shutdown_signal);
    if config.verification.enable_verification {
        coordinator = coordinator.with_verifier(Verifier::new());
    }
    Ok(coordinator)
}

/// Exit code for a run that returned a summary
pub fn outcome_exit_code(outcome: &RunOutcome) -> i32 {
    match outcome {
        RunOutcome::Interrupted => exit_code::INTERRUPTED,
        RunOutcome::Done | RunOutcome::Halted { .. } | RunOutcome::NothingToDo => {
            exit_code::SUCCESS
        }
    }
}

/// Query yesterday's per-station counts when the run stopped before reaching it
async fn count_yesterday(
    evaluator: &CompletenessEvaluator,
    summary: &ExportSummary,
    report: &mut RunReport,
) {
    let Some(day) = report.uncounted_yesterday(summary) else {
        return;
    };
    match evaluator.evaluate(day).await {
        Ok(evaluation) => report.set_samples_yesterday(&evaluation),
        Err(e) => tracing::warn!(day = %day, error = %e, "Failed to count samples for yesterday"),
    }
}

/// Write the metrics textfile when configured; failures are logged only
async fn report(config: &AlmanacConfig, report: RunReport) {
    let Some(dir) = config.metrics.textfile_dir.as_deref() else {
        return;
    };
    match write_textfile(dir, &report).await {
        Ok(path) => tracing::debug!(path = %path.display(), "Wrote metrics textfile"),
        Err(e) => tracing::warn!(error = %e, dir = %dir.display(), "Failed to write metrics textfile"),
    }
}

fn fmt_day(day: Option<UtcDay>) -> String {
    day.map(|d| d.to_string()).unwrap_or_else(|| "none".to_string())
}

fn print_summary(summary: &ExportSummary) {
    println!();
    println!("📊 Export Summary:");
    println!("  Run: {}", summary.run_id);
    println!(
        "  Candidates: {} .. {}",
        fmt_day(summary.first_day),
        fmt_day(summary.last_candidate)
    );
    println!(
        "  Watermark: {} -> {}",
        fmt_day(summary.watermark_before),
        fmt_day(summary.watermark_after)
    );
    println!("  Days exported: {}", summary.days_exported.len());
    if !summary.days_skipped.is_empty() {
        println!("  Days skipped (no samples): {}", summary.days_skipped.len());
    }
    println!("  Records written: {}", summary.records_written);
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!();

    match &summary.outcome {
        RunOutcome::Done => println!("✅ Export completed successfully!"),
        RunOutcome::NothingToDo => println!("✅ Nothing to export"),
        RunOutcome::Halted { day, missing_slots } => {
            println!("⏸️  Halted at {day}: {missing_slots} slot(s) missing");
            if let Some(evaluation) = summary.last_evaluation.as_ref().filter(|e| e.day == *day) {
                for coverage in &evaluation.coverage {
                    println!(
                        "    {}: {}/{} slots, {} samples",
                        coverage.station,
                        coverage.slots_covered(),
                        crate::domain::SLOTS_PER_DAY,
                        coverage.sample_count
                    );
                }
            }
            println!("   The day will be retried on the next run.");
        }
        RunOutcome::Interrupted => {
            println!("⚠️  Export interrupted. Progress saved.");
            println!("   Run the same command to resume from the watermark.");
        }
    }
}
