//! Sample sources
//!
//! A sample source serves one station's five-minute samples per UTC day.

pub mod memory;
pub mod traits;

pub use memory::MemorySampleSource;
pub use traits::SampleSource;
