//! Core business logic for Almanac.
//!
//! This module contains the core business logic and orchestration for exports.
//!
//! # Modules
//!
//! - [`completeness`] - Candidate days and per-day slot coverage
//! - [`export`] - Export coordination and run summary
//! - [`state`] - Watermark persistence
//! - [`transform`] - Unit conversion and columnar layout of samples
//! - [`verification`] - Post-write verification with checksums
//!
//! # Export Workflow
//!
//! One export run:
//!
//! 1. **Load State**: Read the watermark (last exported day)
//! 2. **Enumerate**: Every day after the watermark up to yesterday UTC
//! 3. **Evaluate**: Query each station for the day and check all 288 slots
//! 4. **Halt** at the first incomplete day, leaving it for the next run
//! 5. **Write** the day file for a complete day
//! 6. **Verify** (optional): Re-read the file and compare checksum and count
//! 7. **Checkpoint**: Advance the watermark to the day just written
//!
//! # Example
//!
//! ```rust,no_run
//! use almanac::adapters::archive::MemoryArchiveWriter;
//! use almanac::adapters::source::{MemorySampleSource, SampleSource};
//! use almanac::core::completeness::CompletenessEvaluator;
//! use almanac::core::export::{ExportCoordinator, RunOptions};
//! use almanac::core::state::{MemoryWatermarkStore, StateManager};
//! use almanac::domain::{StationId, UtcDay};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let source = Arc::new(MemorySampleSource::new(StationId::new("roof")?));
//! source.fill_day(UtcDay::from_ymd(2024, 3, 11).unwrap(), 288);
//!
//! let coordinator = ExportCoordinator::new(
//!     StateManager::new(Arc::new(MemoryWatermarkStore::new())),
//!     CompletenessEvaluator::new(vec![source as Arc<dyn SampleSource>]),
//!     Arc::new(MemoryArchiveWriter::new()),
//! );
//!
//! let summary = coordinator
//!     .run(chrono::Utc::now(), &RunOptions::default())
//!     .await?;
//! println!("{}", summary.outcome);
//! # Ok(())
//! # }
//! ```

pub mod completeness;
pub mod export;
pub mod state;
pub mod transform;
pub mod verification;
