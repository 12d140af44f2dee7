//! Configuration loading.
//!
//! Layers, lowest precedence first: built-in defaults, TOML file,
//! environment (`PORT`, `FLASK_BACKEND_URL`), command-line overrides.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::{LogFormat, ProxyConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Listen port variable.
pub const ENV_PORT: &str = "PORT";
/// Upstream base URL variable.
pub const ENV_BACKEND_URL: &str = "FLASK_BACKEND_URL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value '{value}' for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Explicit overrides from the command line. They win over everything else.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub backend_url: Option<String>,
    pub log_format: Option<LogFormat>,
}

/// Parse a TOML document into a configuration. Does not validate.
pub fn parse_config(content: &str) -> Result<ProxyConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

fn read_config_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Unset and empty variables leave the current value in place.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(value) = non_empty(ENV_PORT) {
        config.listener.port = value.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::Env {
                var: ENV_PORT,
                value: value.clone(),
                reason: e.to_string(),
            }
        })?;
    }

    if let Some(value) = non_empty(ENV_BACKEND_URL) {
        config.upstream.base_url = value;
    }

    Ok(())
}

/// Apply command-line overrides.
pub fn apply_overrides(config: &mut ProxyConfig, overrides: &Overrides) {
    if let Some(port) = overrides.port {
        config.listener.port = port;
    }
    if let Some(url) = &overrides.backend_url {
        config.upstream.base_url = url.clone();
    }
    if let Some(format) = overrides.log_format {
        config.observability.log_format = format;
    }
}

/// Build the effective configuration for this process.
///
/// Reads the optional file, then the process environment, then `overrides`,
/// and validates the result.
pub fn resolve_config(
    file: Option<&Path>,
    overrides: &Overrides,
) -> Result<ProxyConfig, ConfigError> {
    let mut config = match file {
        Some(path) => read_config_file(path)?,
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, |var| std::env::var(var).ok())?;
    apply_overrides(&mut config, overrides);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
