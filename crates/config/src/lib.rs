#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Configuration management for precheck
//!
//! This crate handles loading and merging configuration from:
//! - Default values (hard-coded)
//! - Configuration file (~/.config/precheck/config.toml)
//! - Environment variables
//! - CLI flags (applied by the binary)

pub mod constants;
mod core;

pub use core::{LoggingConfig, RunConfig};

use precheck_errors::{ConfigError, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Get the default config file path
    ///
    /// # Errors
    ///
    /// Returns an error if the system config directory cannot be determined.
    pub fn default_path() -> Result<PathBuf, Error> {
        let config_dir = dirs::config_dir().ok_or_else(|| ConfigError::NotFound {
            path: "config directory".to_string(),
        })?;
        Ok(config_dir
            .join(constants::CONFIG_DIR_NAME)
            .join(constants::CONFIG_FILE_NAME))
    }

    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid TOML.
    pub async fn load_from_file(path: &Path) -> Result<Self, Error> {
        let contents = fs::read_to_string(path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => ConfigError::NotFound {
                    path: path.display().to_string(),
                },
                _ => ConfigError::ReadFailed {
                    path: path.display().to_string(),
                    message: e.to_string(),
                },
            })?;

        toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError {
                message: e.to_string(),
            })
            .map_err(Into::into)
    }

    /// Load configuration with fallback to defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read
    /// or parsed.
    pub async fn load() -> Result<Self, Error> {
        let Ok(config_path) = Self::default_path() else {
            return Ok(Self::default());
        };

        if config_path.exists() {
            Self::load_from_file(&config_path).await
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from an optional path or use default
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or parsed
    pub async fn load_or_default(path: Option<&Path>) -> Result<Self, Error> {
        match path {
            Some(config_path) => Self::load_from_file(config_path).await,
            None => Self::load().await,
        }
    }

    /// Merge with the process environment
    ///
    /// # Errors
    ///
    /// Returns an error if an environment variable holds a value that cannot
    /// be interpreted.
    pub fn merge_env(&mut self) -> Result<(), Error> {
        self.merge_vars(|name| std::env::var(name).ok())
    }

    /// Merge with variables supplied by `lookup`
    ///
    /// `OCAML_JOBS` is taken verbatim; whether it is a usable parallelism
    /// value is decided later and a bad value is dropped there.
    ///
    /// # Errors
    ///
    /// Returns an error for an unrecognized `OCAML_FLAMBDA` or
    /// `PRECHECK_LOG_FORMAT` value.
    pub fn merge_vars<F>(&mut self, lookup: F) -> Result<(), Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(platform) = lookup(constants::ENV_PLATFORM) {
            self.run.platform = Some(platform);
        }

        if let Some(jobs) = lookup(constants::ENV_JOBS) {
            self.run.jobs = Some(jobs);
        }

        if let Some(options) = lookup(constants::ENV_CONFIGURE_OPTIONS) {
            self.run.configure_options = Some(options);
        }

        if let Some(flambda) = lookup(constants::ENV_FLAMBDA) {
            self.run.flambda = match flambda.as_str() {
                "true" | "1" | "yes" => true,
                "false" | "0" | "no" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: constants::ENV_FLAMBDA.to_string(),
                        value: flambda,
                    }
                    .into())
                }
            };
        }

        if let Some(parallel) = lookup(constants::ENV_PARALLEL) {
            self.run.parallel = Some(parallel);
        }

        if let Some(format) = lookup(constants::ENV_LOG_FORMAT) {
            self.logging.json = match format.as_str() {
                "json" => true,
                "text" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        field: constants::ENV_LOG_FORMAT.to_string(),
                        value: format,
                    }
                    .into())
                }
            };
        }

        Ok(())
    }

    /// Source tree to operate on (with default)
    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        self.run
            .source_dir
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}
