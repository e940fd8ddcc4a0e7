//! PostgreSQL sample source
//!
//! Reads station samples from a wview-style `archive` table in PostgreSQL.

pub mod client;
pub mod models;
pub mod source;

pub use client::PostgreSQLClient;
pub use models::ArchiveRow;
pub use source::PostgresSampleSource;
