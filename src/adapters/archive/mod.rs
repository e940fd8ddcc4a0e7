//! Archive writers
//!
//! An archive is a tree of day files grouped into monthly acquisition
//! directories; see [`layout`] for the naming scheme.

pub mod json;
pub mod layout;
pub mod memory;
pub mod models;
pub mod traits;

pub use json::{JsonArchiveWriter, StationMetadata};
pub use layout::ArchiveLayout;
pub use memory::MemoryArchiveWriter;
pub use models::ArchiveDocument;
pub use traits::{ArchiveRecord, ArchiveWriter};
