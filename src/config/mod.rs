//! Configuration management for Almanac.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! Almanac uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `ALMANAC_*` environment overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use almanac::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("almanac.toml")?;
//!
//! println!("Archive root: {}", config.archive.root.display());
//! for station in &config.stations {
//!     println!("Station {} reads table {}", station.name, station.table);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and instrument name
//! - [`StateConfig`] - Watermark file location
//! - [`ArchiveConfig`] - Archive tree root
//! - [`StationConfig`] - One entry per station, each with a [`PostgreSQLConfig`]
//! - [`VerificationConfig`] - Post-write verification
//! - [`MetricsConfig`] - Prometheus textfile report
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! instrument = "aws-vienna"
//!
//! [state]
//! path = "/var/lib/almanac/state.json"
//!
//! [archive]
//! root = "/data/archive"
//!
//! [[stations]]
//! name = "roof"
//! longitude = 16.37
//! latitude = 48.21
//! description = "Rooftop station"
//!
//! [stations.postgresql]
//! connection_string = "${ALMANAC_ROOF_DSN}"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::{load_config, parse_config};
pub use schema::{
    AlmanacConfig, ApplicationConfig, ArchiveConfig, LoggingConfig, MetricsConfig,
    PostgreSQLConfig, StateConfig, StationConfig, VerificationConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
