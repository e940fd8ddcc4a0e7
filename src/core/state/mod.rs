//! State management and watermark tracking

pub mod manager;
pub mod store;
pub mod watermark;

pub use manager::StateManager;
pub use store::{FileWatermarkStore, MemoryWatermarkStore, WatermarkStore};
pub use watermark::Watermark;
