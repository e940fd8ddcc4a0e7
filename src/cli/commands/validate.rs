//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the Almanac configuration file.

use super::exit_code;
use crate::adapters::postgresql::PostgreSQLClient;
use crate::config::AlmanacConfig;
use crate::domain::StationId;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug, Default)]
pub struct ValidateArgs {
    /// Also connect to every station database
    #[arg(long)]
    pub check_connections: bool,
}

impl ValidateArgs {
    /// Execute the validate-config command
    ///
    /// `config` was validated while loading; this prints what was loaded
    /// and optionally checks that each station is reachable.
    pub async fn execute(&self, config_path: &str, config: &AlmanacConfig) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();
        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Instrument: {}", config.application.instrument);
        println!("  State File: {}", config.state.path.display());
        println!("  Archive Root: {}", config.archive.root.display());
        if !config.archive.root.is_dir() {
            println!("  ⚠️  Archive root does not exist yet; exports will fail until it does");
        }
        println!(
            "  Verification: {}",
            if config.verification.enable_verification {
                "enabled"
            } else {
                "disabled"
            }
        );
        match &config.metrics.textfile_dir {
            Some(dir) => println!("  Metrics Textfile Dir: {}", dir.display()),
            None => println!("  Metrics: disabled"),
        }
        println!("  Stations: {}", config.stations.len());

        let mut failed = false;
        for station in &config.stations {
            let id = StationId::new(station.name.clone()).map_err(anyhow::Error::msg)?;
            let client = PostgreSQLClient::new(id, station.postgresql.clone())?;
            println!(
                "    - {} (table {}, {})",
                station.name,
                station.table,
                client.connection_string_safe()
            );

            if self.check_connections {
                match client.test_connection().await {
                    Ok(()) => println!("      ✅ Connection OK"),
                    Err(e) => {
                        println!("      ❌ Connection failed: {e}");
                        failed = true;
                    }
                }
            }
        }
        println!();

        if failed {
            return Ok(exit_code::QUERY);
        }
        Ok(exit_code::SUCCESS)
    }
}
