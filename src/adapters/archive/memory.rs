//! In-memory archive writer
//!
//! Keeps exported days in memory so tests can assert on exactly which days
//! reached the writer and in what order.

use crate::adapters::archive::traits::{ArchiveRecord, ArchiveWriter};
use crate::core::verification::checksum::calculate_checksum_bytes;
use crate::domain::{ExportError, StationSamples, UtcDay};
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

/// One recorded `export` call
#[derive(Debug, Clone, PartialEq)]
pub struct ExportCall {
    pub day: UtcDay,
    pub stations: Vec<StationSamples>,
}

#[derive(Default)]
pub struct MemoryArchiveWriter {
    calls: Mutex<Vec<ExportCall>>,
    failing_days: Mutex<HashSet<UtcDay>>,
}

impl MemoryArchiveWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make exports of `day` fail
    pub fn fail_on(&self, day: UtcDay) {
        self.failing_days
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(day);
    }

    /// Successful exports, in call order
    pub fn calls(&self) -> Vec<ExportCall> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn exported_days(&self) -> Vec<UtcDay> {
        self.calls().into_iter().map(|c| c.day).collect()
    }
}

#[async_trait]
impl ArchiveWriter for MemoryArchiveWriter {
    async fn export(
        &self,
        day: UtcDay,
        stations: &[StationSamples],
    ) -> Result<ArchiveRecord, ExportError> {
        let path = PathBuf::from(format!("memory/{}.json", day.compact()));

        if self
            .failing_days
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(&day)
        {
            return Err(ExportError::WriteFailed {
                path,
                message: "injected failure".to_string(),
            });
        }

        let records = stations.iter().map(|s| s.samples.len()).sum();
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ExportCall {
                day,
                stations: stations.to_vec(),
            });

        Ok(ArchiveRecord {
            day,
            path,
            records,
            checksum: calculate_checksum_bytes(day.compact().as_bytes()),
        })
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
