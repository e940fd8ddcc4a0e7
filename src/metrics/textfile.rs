//! Prometheus textfile-collector output
//!
//! The node exporter picks up `*.prom` files from a directory. The report is
//! written to `almanac.prom.new` and renamed so the collector never reads a
//! partial file.

use crate::core::completeness::DayEvaluation;
use crate::core::export::ExportSummary;
use crate::domain::{AlmanacError, Result, StationId, UtcDay};
use chrono::{DateTime, Utc};
use prometheus::{Encoder, IntGauge, IntGaugeVec, Opts, Registry, TextEncoder};
use std::path::{Path, PathBuf};

/// File name inside the textfile directory
pub const TEXTFILE_NAME: &str = "almanac.prom";

/// Metric values for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    /// Process exit status
    pub status: i32,
    pub report_time: DateTime<Utc>,
    pub days_written: Option<usize>,
    pub yesterday: Option<UtcDay>,
    pub first_day: Option<UtcDay>,
    /// Samples per station for yesterday, when yesterday was evaluated
    pub samples_yesterday: Vec<(StationId, usize)>,
}

impl RunReport {
    /// Report for a run that failed before producing a summary
    pub fn failed(status: i32, now: DateTime<Utc>) -> Self {
        Self {
            status,
            report_time: now,
            days_written: None,
            yesterday: UtcDay::yesterday_of(now),
            first_day: None,
            samples_yesterday: Vec::new(),
        }
    }

    /// Report for a finished run
    pub fn from_summary(status: i32, now: DateTime<Utc>, summary: &ExportSummary) -> Self {
        let yesterday = UtcDay::yesterday_of(now);
        let samples_yesterday = summary
            .last_evaluation
            .as_ref()
            .filter(|evaluation| Some(evaluation.day) == yesterday)
            .map(station_counts)
            .unwrap_or_default();

        Self {
            status,
            report_time: now,
            days_written: Some(summary.days_exported.len()),
            yesterday,
            first_day: summary.first_day,
            samples_yesterday,
        }
    }

    /// Yesterday, when it was a candidate of `summary` that the run never evaluated
    ///
    /// A run that halts or stops early leaves these counts to be queried
    /// separately.
    pub fn uncounted_yesterday(&self, summary: &ExportSummary) -> Option<UtcDay> {
        let yesterday = self.yesterday?;
        let candidate = summary.first_day.is_some_and(|first| first <= yesterday)
            && summary.last_candidate.is_some_and(|last| yesterday <= last);
        (candidate && self.samples_yesterday.is_empty()).then_some(yesterday)
    }

    /// Take the per-station counts from an evaluation of yesterday
    pub fn set_samples_yesterday(&mut self, evaluation: &DayEvaluation) {
        if Some(evaluation.day) == self.yesterday {
            self.samples_yesterday = station_counts(evaluation);
        }
    }

    /// Render in the Prometheus text exposition format
    ///
    /// # Errors
    ///
    /// Returns an error if a gauge cannot be registered or encoded.
    pub fn render(&self) -> Result<String> {
        let registry = Registry::new();

        gauge(&registry, "status", "almanac exit status")?.set(i64::from(self.status));
        gauge(&registry, "report_time", "almanac.prom write time")?
            .set(self.report_time.timestamp());
        if let Some(days) = self.days_written {
            gauge(&registry, "days_written", "number of days written")?.set(days as i64);
        }
        if let Some(day) = self.yesterday {
            gauge(&registry, "yesterday", "yesterday's date")?.set(day.start().timestamp());
        }
        if let Some(day) = self.first_day {
            gauge(&registry, "first_day", "first day checked")?.set(day.start().timestamp());
        }
        if !self.samples_yesterday.is_empty() {
            let samples = IntGaugeVec::new(
                Opts::new(
                    "almanac_samples_yesterday",
                    "number of weather samples for yesterday",
                ),
                &["station"],
            )
            .map_err(metrics_error)?;
            registry
                .register(Box::new(samples.clone()))
                .map_err(metrics_error)?;
            for (station, count) in &self.samples_yesterday {
                samples
                    .with_label_values(&[station.as_str()])
                    .set(*count as i64);
            }
        }

        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&registry.gather(), &mut buffer)
            .map_err(metrics_error)?;
        String::from_utf8(buffer).map_err(|e| AlmanacError::Serialization(e.to_string()))
    }
}

fn gauge(registry: &Registry, name: &str, help: &str) -> Result<IntGauge> {
    let gauge = IntGauge::new(format!("almanac_{name}"), help).map_err(metrics_error)?;
    registry
        .register(Box::new(gauge.clone()))
        .map_err(metrics_error)?;
    Ok(gauge)
}

fn station_counts(evaluation: &DayEvaluation) -> Vec<(StationId, usize)> {
    evaluation
        .coverage
        .iter()
        .map(|c| (c.station.clone(), c.sample_count))
        .collect()
}

fn metrics_error(e: prometheus::Error) -> AlmanacError {
    AlmanacError::Other(format!("Metrics error: {e}"))
}

/// Write `report` into `dir`, replacing any previous report
///
/// # Errors
///
/// Returns an error if the file cannot be written or renamed.
pub async fn write_textfile(dir: &Path, report: &RunReport) -> Result<PathBuf> {
    let path = dir.join(TEXTFILE_NAME);
    let temp_path = dir.join(format!("{TEXTFILE_NAME}.new"));

    let text = report.render()?;
    if let Err(e) = tokio::fs::write(&temp_path, text).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(AlmanacError::Io(format!(
            "Failed to write {}: {e}",
            temp_path.display()
        )));
    }

    tokio::fs::rename(&temp_path, &path).await.map_err(|e| {
        AlmanacError::Io(format!("Failed to replace {}: {e}", path.display()))
    })?;

    tracing::debug!(path = %path.display(), status = report.status, "Metrics textfile written");
    Ok(path)
}
