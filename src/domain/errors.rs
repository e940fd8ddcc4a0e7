//! Domain error types
//!
//! This module defines the error hierarchy for Almanac. The three failure
//! kinds of an export run (storage, query, export) are separate enums so a
//! caller can tell them apart; [`AlmanacError`] wraps them for propagation.
//! None of these types expose third-party error types.

use std::path::PathBuf;
use thiserror::Error;

/// Main Almanac error type
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
pub enum AlmanacError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Watermark persistence errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Sample source errors
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Archive writer errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// Validation errors (bad operator input, out-of-range days)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl AlmanacError {
    /// Process exit code for this error, as reported by the CLI
    pub fn exit_code(&self) -> i32 {
        match self {
            AlmanacError::Configuration(_) | AlmanacError::Validation(_) => 2,
            AlmanacError::Storage(_) => 3,
            AlmanacError::Query(_) => 4,
            _ => 5,
        }
    }
}

/// Watermark persistence errors
///
/// A corrupt or unreadable watermark is never treated as "no watermark".
#[derive(Debug, Error)]
pub enum StorageError {
    /// The state exists but could not be read
    #[error("Failed to read state {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    /// The state was read but does not decode to a watermark
    #[error("Corrupt state {path}: {message}")]
    Corrupt { path: PathBuf, message: String },

    /// The state could not be written
    #[error("Failed to write state {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },
}

/// Sample source errors
///
/// Distinct from an incomplete day: a query error never advances state.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Failed to reach the source
    #[error("Failed to connect to sample source for station {station}: {message}")]
    ConnectionFailed { station: String, message: String },

    /// The query itself failed
    #[error("Query failed for station {station}: {message}")]
    QueryFailed { station: String, message: String },

    /// A returned timestamp cannot be represented
    #[error("Malformed timestamp {value} from station {station}")]
    MalformedTimestamp { station: String, value: i64 },

    /// A returned row does not match the expected layout
    #[error("Malformed row from station {station}: {message}")]
    MalformedRow { station: String, message: String },

    /// The row declares a unit system we do not know
    #[error("Unknown unit system {code} from station {station}")]
    UnknownUnitSystem { station: String, code: i32 },
}

/// Archive writer errors
#[derive(Debug, Error)]
pub enum ExportError {
    /// The archive root directory is missing
    #[error("Archive root not found: {0}")]
    ArchiveRootMissing(PathBuf),

    /// Writing the day file failed
    #[error("Failed to write archive {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    /// Encoding the day file failed
    #[error("Failed to encode archive for {day}: {message}")]
    EncodeFailed { day: String, message: String },

    /// The written file does not match what was written
    #[error("Verification failed for {path}: {message}")]
    VerificationFailed { path: PathBuf, message: String },
}

// Conversion from std::io::Error
impl From<std::io::Error> for AlmanacError {
    fn from(err: std::io::Error) -> Self {
        AlmanacError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for AlmanacError {
    fn from(err: serde_json::Error) -> Self {
        AlmanacError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for AlmanacError {
    fn from(err: toml::de::Error) -> Self {
        AlmanacError::Configuration(format!("TOML parse error: {err}"))
    }
}
