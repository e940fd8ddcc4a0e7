//! Export orchestration
//!
//! This module provides the core export logic for Almanac:
//! - Export coordination, one day at a time
//! - Run options and summary reporting

pub mod coordinator;
pub mod summary;

pub use coordinator::{ExportCoordinator, RunOptions};
pub use summary::{ExportSummary, RunOutcome};
