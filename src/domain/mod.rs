//! Domain models and types for Almanac.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Days and slots** ([`UtcDay`], [`slot_of`], [`SLOTS_PER_DAY`])
//! - **Samples** ([`Sample`], [`StationSamples`], [`OBSERVABLES`])
//! - **Strongly-typed identifiers** ([`StationId`])
//! - **Error types** ([`AlmanacError`], [`StorageError`], [`QueryError`], [`ExportError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, AlmanacError>`]. The three
//! failure kinds of an export run convert into [`AlmanacError`] with `?`:
//!
//! ```rust
//! use almanac::domain::{AlmanacError, QueryError, Result};
//!
//! fn query() -> std::result::Result<(), QueryError> {
//!     Err(QueryError::QueryFailed {
//!         station: "roof".to_string(),
//!         message: "connection reset".to_string(),
//!     })
//! }
//!
//! fn run() -> Result<()> {
//!     query()?;
//!     Ok(())
//! }
//!
//! assert!(matches!(run(), Err(AlmanacError::Query(_))));
//! ```

pub mod day;
pub mod errors;
pub mod ids;
pub mod result;
pub mod sample;
pub mod slot;

// Re-export commonly used types for convenience
pub use day::{day_range, earliest_day, UtcDay};
pub use errors::{AlmanacError, ExportError, QueryError, StorageError};
pub use ids::StationId;
pub use result::Result;
pub use sample::{Observable, Quantity, Sample, StationSamples, UnitSystem, OBSERVABLES};
pub use slot::{slot_of, slot_start, SLOTS_PER_DAY, SLOT_SECONDS};
