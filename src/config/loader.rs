//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::AlmanacConfig;
use super::secret::secret_string;
use crate::domain::errors::AlmanacError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AlmanacConfig
/// 4. Applies environment variable overrides (ALMANAC_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is unset, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use almanac::config::loader::load_config;
///
/// let config = load_config("almanac.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AlmanacConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AlmanacError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AlmanacError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses, overrides and validates configuration text
///
/// # Errors
///
/// See [`load_config`].
pub fn parse_config(contents: &str) -> Result<AlmanacConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: AlmanacConfig = toml::from_str(&contents)
        .map_err(|e| AlmanacError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        AlmanacError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AlmanacError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }

        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AlmanacError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using ALMANAC_* prefix
///
/// Section keys follow `ALMANAC_<SECTION>_<KEY>`. Station keys follow
/// `ALMANAC_STATION_<NAME>_<KEY>` with the station name upper-cased.
fn apply_env_overrides(config: &mut AlmanacConfig) {
    if let Ok(val) = std::env::var("ALMANAC_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("ALMANAC_APPLICATION_INSTRUMENT") {
        config.application.instrument = val;
    }

    if let Ok(val) = std::env::var("ALMANAC_STATE_PATH") {
        config.state.path = PathBuf::from(val);
    }

    if let Ok(val) = std::env::var("ALMANAC_ARCHIVE_ROOT") {
        config.archive.root = PathBuf::from(val);
    }

    for station in &mut config.stations {
        let prefix = format!(
            "ALMANAC_STATION_{}_",
            station.name.to_uppercase().replace('-', "_")
        );
        if let Ok(val) = std::env::var(format!("{prefix}CONNECTION_STRING")) {
            station.postgresql.connection_string = secret_string(val);
        }
        if let Ok(val) = std::env::var(format!("{prefix}TABLE")) {
            station.table = val;
        }
    }

    if let Ok(val) = std::env::var("ALMANAC_VERIFICATION_ENABLE_VERIFICATION") {
        config.verification.enable_verification = val.parse().unwrap_or(false);
    }

    if let Ok(val) = std::env::var("ALMANAC_METRICS_TEXTFILE_DIR") {
        config.metrics.textfile_dir = Some(PathBuf::from(val));
    }

    if let Ok(val) = std::env::var("ALMANAC_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Ok(val) = std::env::var("ALMANAC_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}
