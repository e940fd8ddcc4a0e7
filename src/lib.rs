// Almanac - Weather station samples to daily archive files
// Copyright (c) 2025 Almanac Contributors
// Licensed under the MIT License

//! # Almanac - weather station day-file exporter
//!
//! Almanac reads five-minute weather station samples from PostgreSQL and
//! writes one archive file per UTC day, but only once that day is complete
//! on every station.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Evaluating** whether every station has a sample in all 288 slots of a day
//! - **Exporting** complete days, in order, into a monthly archive tree
//! - **Managing** export state with a single-day watermark that only moves forward
//! - **Reporting** each run to a Prometheus textfile collector
//!
//! ## Architecture
//!
//! Almanac follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (completeness, export, state, transform, verification)
//! - [`adapters`] - External integrations (PostgreSQL sources, archive writer)
//! - [`domain`] - Days, slots, samples and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`metrics`] - Run report for the node exporter
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use almanac::adapters::factory;
//! use almanac::config::load_config;
//! use almanac::core::export::{ExportCoordinator, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("almanac.toml")?;
//!
//!     let coordinator = ExportCoordinator::new(
//!         factory::create_state_manager(&config),
//!         factory::create_evaluator(&config)?,
//!         factory::create_archive_writer(&config)?,
//!     );
//!
//!     let summary = coordinator
//!         .run(chrono::Utc::now(), &RunOptions::default())
//!         .await?;
//!
//!     println!("Exported {} day(s): {}", summary.days_exported.len(), summary.outcome);
//!     Ok(())
//! }
//! ```
//!
//! ## Completeness
//!
//! A UTC day is split into 288 five-minute slots. A day is exported only when
//! every configured station has at least one sample in every slot; the first
//! incomplete day halts the run and is retried next time.
//!
//! ```rust
//! use almanac::domain::{slot_of, UtcDay, SLOTS_PER_DAY};
//! use chrono::{TimeZone, Utc};
//!
//! let day = UtcDay::from_ymd(2024, 3, 11).unwrap();
//! let last = Utc.with_ymd_and_hms(2024, 3, 11, 23, 59, 59).unwrap();
//! assert_eq!(slot_of(day, last), Some(SLOTS_PER_DAY - 1));
//! assert_eq!(slot_of(day, last + chrono::Duration::seconds(1)), None);
//! ```
//!
//! ## Error Handling
//!
//! Almanac uses the [`domain::AlmanacError`] type for all errors. Storage,
//! query and export failures keep their own variants so the CLI can map them
//! to distinct exit codes:
//!
//! ```rust,no_run
//! use almanac::domain::AlmanacError;
//!
//! fn example() -> Result<(), AlmanacError> {
//!     let config = almanac::config::load_config("almanac.toml")?;
//!     println!("{} station(s)", config.stations.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Almanac uses structured logging with the `tracing` crate:
//!
//! ```rust
//! tracing::info!(day = "2024-03-11", records = 288, "Day exported");
//! tracing::warn!(station = "roof", out_of_day = 1, "Samples outside the day");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod metrics;
