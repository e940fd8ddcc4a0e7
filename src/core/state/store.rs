//! Watermark persistence backends
//!
//! [`FileWatermarkStore`] keeps the watermark in a single JSON file that is
//! replaced atomically on every save. [`MemoryWatermarkStore`] is the
//! in-memory stand-in used by tests and dry runs.

use crate::core::state::watermark::{Watermark, WATERMARK_VERSION};
use crate::domain::StorageError;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::io::AsyncWriteExt;

/// Durable home of the single watermark value
#[async_trait]
pub trait WatermarkStore: Send + Sync {
    /// Read the persisted watermark
    ///
    /// Returns `Ok(None)` only when no state exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if state exists but cannot be read or decoded.
    async fn load(&self) -> Result<Option<Watermark>, StorageError>;

    /// Overwrite the persisted watermark
    ///
    /// After a failure or interruption either the previous or the new
    /// watermark must be readable.
    async fn save(&self, watermark: &Watermark) -> Result<(), StorageError>;

    /// Human-readable location, for logs
    fn location(&self) -> String;
}

/// Watermark stored as a JSON file
pub struct FileWatermarkStore {
    path: PathBuf,
}

impl FileWatermarkStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, e: impl std::fmt::Display) -> StorageError {
        StorageError::WriteFailed {
            path: self.path.clone(),
            message: e.to_string(),
        }
    }

    async fn write_atomically(&self, bytes: &[u8]) -> Result<(), StorageError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        tokio::fs::create_dir_all(&parent)
            .await
            .map_err(|e| self.write_error(e))?;

        let temp_path = self.temp_path();
        let mut file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| self.write_error(e))?;
        file.write_all(bytes).await.map_err(|e| self.write_error(e))?;
        file.sync_all().await.map_err(|e| self.write_error(e))?;
        drop(file);

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.write_error(e))?;

        // Persist the rename itself
        #[cfg(unix)]
        {
            let dir = tokio::fs::File::open(&parent)
                .await
                .map_err(|e| self.write_error(e))?;
            dir.sync_all().await.map_err(|e| self.write_error(e))?;
        }

        Ok(())
    }
}

#[async_trait]
impl WatermarkStore for FileWatermarkStore {
    async fn load(&self) -> Result<Option<Watermark>, StorageError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No watermark state file");
                return Ok(None);
            }
            Err(e) => {
                return Err(StorageError::ReadFailed {
                    path: self.path.clone(),
                    message: e.to_string(),
                })
            }
        };

        let watermark: Watermark =
            serde_json::from_str(&contents).map_err(|e| StorageError::Corrupt {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        if watermark.version != WATERMARK_VERSION {
            return Err(StorageError::Corrupt {
                path: self.path.clone(),
                message: format!(
                    "unsupported state version {} (expected {})",
                    watermark.version, WATERMARK_VERSION
                ),
            });
        }

        Ok(Some(watermark))
    }

    async fn save(&self, watermark: &Watermark) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec_pretty(watermark).map_err(|e| self.write_error(e))?;

        if let Err(e) = self.write_atomically(&bytes).await {
            let _ = tokio::fs::remove_file(self.temp_path()).await;
            return Err(e);
        }

        tracing::debug!(
            path = %self.path.display(),
            day = %watermark.last_exported_day,
            "Watermark saved"
        );
        Ok(())
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory watermark store
///
/// Records every saved watermark so tests can inspect the sequence of saves.
#[derive(Default)]
pub struct MemoryWatermarkStore {
    current: Mutex<Option<Watermark>>,
    history: Mutex<Vec<Watermark>>,
    fail_saves: bool,
}

impl MemoryWatermarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `watermark`
    pub fn with_watermark(watermark: Watermark) -> Self {
        Self {
            current: Mutex::new(Some(watermark)),
            ..Self::default()
        }
    }

    /// A store whose saves always fail
    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// Watermarks saved so far, oldest first
    pub fn history(&self) -> Vec<Watermark> {
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Current value without going through the async trait
    pub fn current(&self) -> Option<Watermark> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl WatermarkStore for MemoryWatermarkStore {
    async fn load(&self) -> Result<Option<Watermark>, StorageError> {
        Ok(self.current())
    }

    async fn save(&self, watermark: &Watermark) -> Result<(), StorageError> {
        if self.fail_saves {
            return Err(StorageError::WriteFailed {
                path: PathBuf::from(self.location()),
                message: "save rejected".to_string(),
            });
        }
        *self.current.lock().unwrap_or_else(|e| e.into_inner()) = Some(watermark.clone());
        self.history
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(watermark.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
