//! Configuration error types
//!
//! Everything in here is raised before the first stage runs and maps to the
//! configuration exit status.

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("unknown platform: {tag}")]
    UnknownPlatform { tag: String },

    #[error("no platform given (set OCAML_ARCH or run.platform)")]
    MissingPlatform,

    #[error("unknown option {option}")]
    UnknownOption { option: String },

    #[error("option {option} requires a value")]
    MissingOptionValue { option: String },

    #[error("config file not found: {path}")]
    NotFound { path: String },

    #[error("cannot read config file {path}: {message}")]
    ReadFailed { path: String, message: String },

    #[error("parse error: {message}")]
    ParseError { message: String },

    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    #[error("environment script not found: {path}")]
    MissingEnvironmentScript { path: String },

    #[error("home directory could not be determined")]
    HomeNotFound,

    #[error("source directory {path} is not usable: {message}")]
    InvalidSourceDir { path: String, message: String },
}

impl UserFacingError for ConfigError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownPlatform { .. } | Self::MissingPlatform => Some(
                "Use one of: bsd, macos, linux, cygwin, cygwin64, mingw, mingw64, msvc, msvc64.",
            ),
            Self::UnknownOption { .. } | Self::MissingOptionValue { .. } => Some(
                "Accepted options: -conf <arg>, -patch1 <file>, -no-native, -j<N> (N = 1..99).",
            ),
            Self::NotFound { .. } => Some("Pass an existing file to --config or drop the flag."),
            Self::ReadFailed { .. } => Some("Check that the config path is a readable file."),
            Self::InvalidValue { .. } | Self::ParseError { .. } => {
                Some("Fix the configuration value and rerun.")
            }
            Self::MissingEnvironmentScript { .. } => {
                Some("Create the profile script or run on a machine provisioned for this platform.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::UnknownPlatform { .. } => "config.unknown_platform",
            Self::MissingPlatform => "config.missing_platform",
            Self::UnknownOption { .. } => "config.unknown_option",
            Self::MissingOptionValue { .. } => "config.missing_option_value",
            Self::NotFound { .. } => "config.not_found",
            Self::ReadFailed { .. } => "config.read_failed",
            Self::ParseError { .. } => "config.parse_error",
            Self::InvalidValue { .. } => "config.invalid_value",
            Self::MissingEnvironmentScript { .. } => "config.missing_environment_script",
            Self::HomeNotFound => "config.home_not_found",
            Self::InvalidSourceDir { .. } => "config.invalid_source_dir",
        };
        Some(code)
    }
}
