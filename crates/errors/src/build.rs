//! Pipeline stage error types

use std::borrow::Cow;

use crate::{UserFacingError, GENERIC_FAILURE_EXIT_CODE};
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("stage {stage} failed: `{command}` exited with {}", display_code(.exit_code))]
    StageFailed {
        stage: String,
        command: String,
        exit_code: Option<i32>,
    },

    #[error("stage {stage} could not start `{command}`: {message}")]
    SpawnFailed {
        stage: String,
        command: String,
        message: String,
    },

    #[error("configure failed: {message}")]
    ConfigureFailed { message: String },

    #[error("could not remove install directory {path}: {message}")]
    InstallCleanupFailed { path: String, message: String },
}

#[allow(clippy::ref_option)]
fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "no exit code".to_string(), |c| format!("status {c}"))
}

impl BuildError {
    /// Exit status propagated to the caller.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::StageFailed {
                exit_code: Some(code),
                ..
            } if *code != 0 => *code,
            _ => GENERIC_FAILURE_EXIT_CODE,
        }
    }
}

impl UserFacingError for BuildError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::SpawnFailed { .. } => {
                Some("Check that the build toolchain is installed and on PATH.")
            }
            Self::ConfigureFailed { .. } => {
                Some("Make sure the source tree ships the platform's config templates.")
            }
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::StageFailed { .. } => "build.stage_failed",
            Self::SpawnFailed { .. } => "build.spawn_failed",
            Self::ConfigureFailed { .. } => "build.configure_failed",
            Self::InstallCleanupFailed { .. } => "build.install_cleanup_failed",
        };
        Some(code)
    }
}
