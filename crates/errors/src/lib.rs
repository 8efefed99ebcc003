#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for the precheck build orchestrator
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone so they can travel inside events.

use std::borrow::Cow;

use thiserror::Error;

pub mod build;
pub mod config;
pub mod platform;

// Re-export all error types at the root
pub use build::BuildError;
pub use config::ConfigError;
pub use platform::PlatformError;

/// Exit status reported for every fatal configuration error.
///
/// Unknown platforms, unknown command-line options and invalid configuration
/// all map to this value so calling automation can tell "the run was
/// misconfigured" apart from "a stage failed".
pub const CONFIGURATION_EXIT_CODE: i32 = 3;

/// Exit status used when a failure carries no exit code of its own.
pub const GENERIC_FAILURE_EXIT_CODE: i32 = 1;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("build error: {0}")]
    Build(#[from] BuildError),

    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
}

impl Error {
    /// Whether this error was raised before any stage could run.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    /// Process exit status the orchestrator reports for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => CONFIGURATION_EXIT_CODE,
            Self::Build(err) => err.exit_code(),
            Self::Platform(_) => GENERIC_FAILURE_EXIT_CODE,
        }
    }
}

/// Result type alias for precheck operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Stable error code for structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Config(err) => err.user_message(),
            Error::Build(err) => err.user_message(),
            Error::Platform(err) => err.user_message(),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Config(err) => err.user_hint(),
            Error::Build(err) => err.user_hint(),
            Error::Platform(err) => err.user_hint(),
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Config(err) => err.user_code(),
            Error::Build(err) => err.user_code(),
            Error::Platform(err) => err.user_code(),
        }
    }
}
