//! Archive tree layout
//!
//! Days are grouped into one acquisition directory per month:
//!
//! ```text
//! <root>/20240301T000000Z_aws-vienna_weather/20240311.json
//! ```

use crate::domain::UtcDay;
use std::path::{Path, PathBuf};

/// Acquisition type recorded in every directory name and file
pub const ACQUISITION_TYPE: &str = "weather";

/// Maps days to paths below an archive root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveLayout {
    root: PathBuf,
    instrument: String,
}

impl ArchiveLayout {
    pub fn new(root: impl Into<PathBuf>, instrument: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            instrument: instrument.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    /// Name of the monthly acquisition holding `day`
    pub fn acquisition_name(&self, day: UtcDay) -> String {
        format!(
            "{}T000000Z_{}_{}",
            day.month_start().compact(),
            self.instrument,
            ACQUISITION_TYPE
        )
    }

    pub fn acquisition_dir(&self, day: UtcDay) -> PathBuf {
        self.root.join(self.acquisition_name(day))
    }

    pub fn file_name(&self, day: UtcDay) -> String {
        format!("{}.json", day.compact())
    }

    pub fn day_file(&self, day: UtcDay) -> PathBuf {
        self.acquisition_dir(day).join(self.file_name(day))
    }

    /// Marker present while `day`'s file is being written
    pub fn lock_file(&self, day: UtcDay) -> PathBuf {
        self.acquisition_dir(day)
            .join(format!(".{}.lock", self.file_name(day)))
    }

    pub fn temp_file(&self, day: UtcDay) -> PathBuf {
        self.acquisition_dir(day)
            .join(format!(".{}.tmp", self.file_name(day)))
    }
}
