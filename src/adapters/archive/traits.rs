//! Archive writer abstraction
//!
//! The coordinator hands each complete day to an [`ArchiveWriter`] and only
//! advances the watermark once `export` has returned successfully.

use crate::domain::{ExportError, StationSamples, UtcDay};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// What a successful export produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRecord {
    pub day: UtcDay,
    pub path: PathBuf,
    /// Samples written across all stations
    pub records: usize,
    /// SHA-256 of the file contents
    pub checksum: String,
}

/// Writes one file per UTC day
#[async_trait]
pub trait ArchiveWriter: Send + Sync {
    /// Write `stations`' samples for `day`, replacing any earlier file for that day
    ///
    /// The file either exists completely when this returns `Ok`, or the day
    /// must be treated as not exported.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive cannot be encoded or written.
    async fn export(
        &self,
        day: UtcDay,
        stations: &[StationSamples],
    ) -> Result<ArchiveRecord, ExportError>;

    /// Where day files are written, for logs and status output
    fn location(&self) -> String;
}
