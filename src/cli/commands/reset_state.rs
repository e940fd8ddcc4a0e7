//! Reset-state command implementation
//!
//! Rewrites the watermark so the next export starts at a chosen day. An
//! existing watermark is only overwritten with `--force`.

use super::exit_code;
use crate::adapters::factory;
use crate::config::AlmanacConfig;
use crate::core::completeness::CompletenessEvaluator;
use crate::core::state::{StateManager, Watermark};
use crate::domain::{earliest_day, AlmanacError, Result, UtcDay};
use chrono::{DateTime, Utc};
use clap::Args;

/// Arguments for the reset-state command
#[derive(Args, Debug, Default)]
pub struct ResetStateArgs {
    /// First day the next export should evaluate (YYYYMMDD); defaults to
    /// the first day with samples
    #[arg(value_name = "YYYYMMDD")]
    pub day: Option<UtcDay>,

    /// Overwrite an existing watermark
    #[arg(long)]
    pub force: bool,
}

/// What a reset did
#[derive(Debug, Clone, PartialEq)]
pub enum ResetOutcome {
    /// The watermark was written
    Written(Watermark),
    /// A watermark exists and `--force` was not given
    StatePresent(UtcDay),
}

/// Reject operator days outside `[earliest_day, today]`
///
/// # Errors
///
/// Returns a validation error naming the day.
pub fn check_requested_day(day: UtcDay, now: DateTime<Utc>) -> Result<()> {
    if day < earliest_day() || day > UtcDay::from_datetime(now) {
        return Err(AlmanacError::Validation(format!(
            "{} out of range ({} .. today)",
            day.compact(),
            earliest_day().compact()
        )));
    }
    Ok(())
}

/// Watermark day for a reset
///
/// The next export starts at `requested`, moved forward to `first_day` when
/// earlier. Without a request it starts at `first_day`.
///
/// # Errors
///
/// Returns an error if the resulting day has no predecessor.
pub fn reset_watermark_day(requested: Option<UtcDay>, first_day: UtcDay) -> Result<UtcDay> {
    let start = requested.map_or(first_day, |day| day.max(first_day));
    start
        .pred()
        .ok_or_else(|| AlmanacError::Validation(format!("no day before {start}")))
}

/// Reset the watermark through `state`
///
/// `first_day` is the first day with samples on any station, or today when
/// no station has any.
///
/// # Errors
///
/// Returns an error if the requested day is out of range, the existing
/// state cannot be read (without `force`), a source fails, or the new
/// watermark cannot be saved.
pub async fn reset_state(
    state: &StateManager,
    evaluator: &CompletenessEvaluator,
    requested: Option<UtcDay>,
    force: bool,
    now: DateTime<Utc>,
) -> Result<ResetOutcome> {
    if let Some(day) = requested {
        check_requested_day(day, now)?;
    }

    if !force {
        if let Some(existing) = state.load().await? {
            return Ok(ResetOutcome::StatePresent(existing));
        }
    }

    let first_day = evaluator
        .origin()
        .await?
        .unwrap_or_else(|| UtcDay::from_datetime(now));
    let day = reset_watermark_day(requested, first_day)?;

    Ok(ResetOutcome::Written(state.reset(day).await?))
}

impl ResetStateArgs {
    /// Execute the reset-state command
    pub async fn execute(&self, config: &AlmanacConfig) -> anyhow::Result<i32> {
        tracing::info!(
            day = ?self.day.map(|d| d.to_string()),
            force = self.force,
            "Resetting export state"
        );

        let state = factory::create_state_manager(config);
        let evaluator = match factory::create_evaluator(config) {
            Ok(e) => e,
            Err(e) => {
                eprintln!("Failed to create sample sources: {e}");
                return Ok(e.exit_code());
            }
        };

        match reset_state(&state, &evaluator, self.day, self.force, Utc::now()).await {
            Ok(ResetOutcome::Written(watermark)) => {
                println!(
                    "✅ State reset: last exported day is now {}",
                    watermark.last_exported_day
                );
                if let Some(next) = watermark.next_day() {
                    println!("   The next export starts at {next}");
                }
                Ok(exit_code::SUCCESS)
            }
            Ok(ResetOutcome::StatePresent(day)) => {
                println!("State present (last exported day {day}). Use --force to overwrite.");
                Ok(exit_code::SUCCESS)
            }
            Err(e) => {
                crate::log_error_with_context!(e, "Failed to reset state");
                eprintln!("Failed to reset state: {e}");
                Ok(e.exit_code())
            }
        }
    }
}
