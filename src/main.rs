// Almanac - Weather station samples to daily archive files
// Copyright (c) 2025 Almanac Contributors
// Licensed under the MIT License

use almanac::cli::commands::exit_code;
use almanac::cli::{Cli, Commands};
use almanac::config::{load_config, AlmanacConfig, LoggingConfig};
use almanac::logging::{init_logging, LoggingGuard};
use clap::Parser;
use std::process;
use tokio::sync::watch;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = if cli.command.needs_config() {
        match load_config(&cli.config) {
            Ok(c) => Some(c),
            Err(e) => {
                let _guard = init_console_logging(cli.log_level.as_deref().unwrap_or("info"));
                tracing::error!(error = %e, config = %cli.config, "Failed to load configuration");
                eprintln!("❌ Failed to load configuration file {}", cli.config);
                eprintln!("   Error: {e}");
                process::exit(e.exit_code());
            }
        }
    } else {
        None
    };

    let guard = setup_logging(&cli, config.as_ref());

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Almanac - weather station day-file exporter"
    );

    // Create shutdown signal channel for graceful shutdown
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut sigterm = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::error!(error = %e, "Failed to create SIGTERM handler");
                    return;
                }
            };

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
                }
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM, initiating graceful shutdown");
                }
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                return;
            }
            tracing::info!("Received SIGINT (Ctrl+C), initiating graceful shutdown");
        }

        eprintln!("\n⚠️  Shutdown signal received, finishing the current day...");
        let _ = shutdown_tx.send(true);
    });

    let exit_code = match execute_command(&cli, config.as_ref(), shutdown_rx).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            exit_code::FATAL
        }
    };

    // Flush file logs before exiting
    drop(guard);
    process::exit(exit_code);
}

/// Logging from the configuration, falling back to console only
fn setup_logging(cli: &Cli, config: Option<&AlmanacConfig>) -> Option<LoggingGuard> {
    let Some(config) = config else {
        return init_console_logging(cli.log_level.as_deref().unwrap_or("info"));
    };

    let level = cli
        .log_level
        .as_deref()
        .unwrap_or(config.application.log_level.as_str());

    match init_logging(level, &config.logging) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Failed to initialize file logging ({e}); logging to console only");
            init_console_logging(level)
        }
    }
}

fn init_console_logging(level: &str) -> Option<LoggingGuard> {
    let console_only = LoggingConfig {
        local_enabled: false,
        ..LoggingConfig::default()
    };
    match init_logging(level, &console_only) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    }
}

/// Execute the CLI command
async fn execute_command(
    cli: &Cli,
    config: Option<&AlmanacConfig>,
    shutdown_signal: watch::Receiver<bool>,
) -> anyhow::Result<i32> {
    let config = match (&cli.command, config) {
        (Commands::Init(args), _) => return args.execute().await,
        (_, Some(config)) => config,
        (_, None) => anyhow::bail!("configuration was not loaded"),
    };

    match &cli.command {
        Commands::Export(args) => args.execute(config, shutdown_signal).await,
        Commands::Status(args) => args.execute(config).await,
        Commands::ResetState(args) => args.execute(config).await,
        Commands::ValidateConfig(args) => args.execute(&cli.config, config).await,
        Commands::Init(args) => args.execute().await,
    }
}
