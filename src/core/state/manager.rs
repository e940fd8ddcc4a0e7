//! State manager for watermark persistence
//!
//! This module provides the StateManager, the Watermark Store seen by the
//! export coordinator: it loads the last exported day and commits one day
//! at a time.

use crate::core::state::store::WatermarkStore;
use crate::core::state::watermark::Watermark;
use crate::domain::{StorageError, UtcDay};
use std::sync::Arc;

/// State manager for watermark persistence
pub struct StateManager {
    /// State storage backend
    store: Arc<dyn WatermarkStore>,
}

impl StateManager {
    /// Create a new StateManager with a storage backend
    pub fn new(store: Arc<dyn WatermarkStore>) -> Self {
        Self { store }
    }

    /// Load the persisted watermark document
    ///
    /// # Errors
    ///
    /// Returns an error if state exists but is unreadable or malformed.
    pub async fn load_watermark(&self) -> Result<Option<Watermark>, StorageError> {
        self.store.load().await
    }

    /// Last exported day, or `None` before the first export
    ///
    /// # Errors
    ///
    /// Returns an error if state exists but is unreadable or malformed.
    pub async fn load(&self) -> Result<Option<UtcDay>, StorageError> {
        Ok(self.load_watermark().await?.map(|w| w.last_exported_day))
    }

    /// Commit `day` as exported
    ///
    /// `previous` is the watermark in effect before `day` was exported; the
    /// returned watermark must be threaded into the next call.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn checkpoint_day(
        &self,
        previous: Option<&Watermark>,
        day: UtcDay,
    ) -> Result<Watermark, StorageError> {
        let watermark = match previous {
            Some(previous) => previous.advanced_to(day),
            None => Watermark {
                days_exported_count: 1,
                ..Watermark::new(day)
            },
        };

        tracing::info!(
            day = %day,
            days_exported = watermark.days_exported_count,
            location = %self.store.location(),
            "Checkpointing watermark"
        );

        self.store.save(&watermark).await?;
        Ok(watermark)
    }

    /// Overwrite the watermark with `day`, resetting the export counter
    ///
    /// Operator action only; an export run never moves the watermark back.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub async fn reset(&self, day: UtcDay) -> Result<Watermark, StorageError> {
        let watermark = Watermark::new(day);
        tracing::warn!(
            day = %day,
            location = %self.store.location(),
            "Resetting watermark"
        );
        self.store.save(&watermark).await?;
        Ok(watermark)
    }

    pub fn location(&self) -> String {
        self.store.location()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::store::MemoryWatermarkStore;
    use std::str::FromStr;

    fn day(s: &str) -> UtcDay {
        UtcDay::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_checkpoint_from_nothing() {
        let store = Arc::new(MemoryWatermarkStore::new());
        let manager = StateManager::new(store.clone());

        assert_eq!(manager.load().await.unwrap(), None);

        let watermark = manager.checkpoint_day(None, day("2024-01-01")).await.unwrap();
        assert_eq!(watermark.days_exported_count, 1);
        assert_eq!(manager.load().await.unwrap(), Some(day("2024-01-01")));
    }

    #[tokio::test]
    async fn test_checkpoint_threads_previous() {
        let store = Arc::new(MemoryWatermarkStore::with_watermark(Watermark::new(day(
            "2024-03-10",
        ))));
        let manager = StateManager::new(store.clone());

        let previous = manager.load_watermark().await.unwrap();
        let w1 = manager
            .checkpoint_day(previous.as_ref(), day("2024-03-11"))
            .await
            .unwrap();
        let w2 = manager
            .checkpoint_day(Some(&w1), day("2024-03-12"))
            .await
            .unwrap();

        assert_eq!(w2.days_exported_count, 2);
        assert_eq!(store.history().len(), 2);
    }

    #[tokio::test]
    async fn test_reset_overwrites() {
        let store = Arc::new(MemoryWatermarkStore::with_watermark(Watermark::new(day(
            "2024-03-10",
        ))));
        let manager = StateManager::new(store);

        let watermark = manager.reset(day("2023-12-31")).await.unwrap();
        assert_eq!(watermark.days_exported_count, 0);
        assert_eq!(manager.load().await.unwrap(), Some(day("2023-12-31")));
    }
}
