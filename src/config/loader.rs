//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_LISTEN_ADDRESS: &str = "LISTEN_ADDRESS";
pub const ENV_LISTEN_PORT: &str = "LISTEN_PORT";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {name}")]
    Env { name: &'static str, value: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML configuration file. Validation is left to the caller so
/// later overrides are checked too.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

impl ServiceConfig {
    /// Apply `LISTEN_ADDRESS` and `LISTEN_PORT` from `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(address) = lookup(ENV_LISTEN_ADDRESS) {
            self.listener.address = address;
        }
        if let Some(port) = lookup(ENV_LISTEN_PORT) {
            self.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
                name: ENV_LISTEN_PORT,
                value: port,
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_config(self).map_err(ConfigError::Validation)
    }
}
