//! CLI command implementations
//!
//! This module contains all CLI command implementations. Every command
//! returns the process exit code; see [`exit_code`].

pub mod export;
pub mod init;
pub mod reset_state;
pub mod status;
pub mod validate;

/// Process exit codes
pub mod exit_code {
    /// Success, including a run halted at an incomplete day
    pub const SUCCESS: i32 = 0;
    /// Invalid configuration or operator input
    pub const CONFIGURATION: i32 = 2;
    /// Watermark could not be read or written
    pub const STORAGE: i32 = 3;
    /// A sample source failed
    pub const QUERY: i32 = 4;
    /// Archive export failed, or any other fatal error
    pub const FATAL: i32 = 5;
    /// Stopped by a shutdown signal between days
    pub const INTERRUPTED: i32 = 130;
}
