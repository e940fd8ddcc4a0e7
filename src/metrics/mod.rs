//! Run metrics
//!
//! Each invocation can leave a Prometheus textfile describing how it went,
//! for alerting on stalled exports.

pub mod textfile;

pub use textfile::{write_textfile, RunReport, TEXTFILE_NAME};
