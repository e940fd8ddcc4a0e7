//! Post-write verification of archive files
//!
//! Re-reads a freshly written day file and checks it against the
//! [`ArchiveRecord`] the writer returned. Runs before the watermark is
//! saved, so a bad file leaves the day pending.

use crate::adapters::archive::{ArchiveDocument, ArchiveRecord};
use crate::core::verification::checksum::calculate_checksum_bytes;
use crate::domain::ExportError;
use std::time::Instant;

/// Verifier for JSON archive files
#[derive(Debug, Clone, Copy, Default)]
pub struct Verifier;

impl Verifier {
    pub fn new() -> Self {
        Self
    }

    /// Verify one exported day file
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::VerificationFailed`] if the file cannot be read,
    /// its checksum differs, or it holds a different number of records.
    pub async fn verify(&self, record: &ArchiveRecord) -> Result<(), ExportError> {
        let start = Instant::now();
        let failed = |message: String| ExportError::VerificationFailed {
            path: record.path.clone(),
            message,
        };

        let bytes = tokio::fs::read(&record.path)
            .await
            .map_err(|e| failed(format!("cannot re-read file: {e}")))?;

        let actual = calculate_checksum_bytes(&bytes);
        if actual != record.checksum {
            return Err(failed(format!(
                "checksum mismatch: expected {}, found {actual}",
                record.checksum
            )));
        }

        let document: ArchiveDocument = serde_json::from_slice(&bytes)
            .map_err(|e| failed(format!("file does not decode: {e}")))?;
        if document.record_count() != record.records {
            return Err(failed(format!(
                "record count mismatch: expected {}, found {}",
                record.records,
                document.record_count()
            )));
        }

        tracing::debug!(
            day = %record.day,
            path = %record.path.display(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Archive file verified"
        );
        Ok(())
    }
}
