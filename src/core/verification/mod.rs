//! Data verification for post-export validation
//!
//! Archive files are hashed when written and can be re-read and checked
//! before the day is committed to the watermark.

pub mod checksum;
pub mod verify;

pub use checksum::calculate_checksum_bytes;
pub use verify::Verifier;
