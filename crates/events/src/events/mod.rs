use serde::{Deserialize, Serialize};

use crate::EventSource;
use precheck_errors::UserFacingError;

/// Structured failure information shared across domains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureContext {
    /// Stable error code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Short user-facing message.
    pub message: String,
    /// Optional remediation hint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FailureContext {
    /// Construct a new failure context.
    #[must_use]
    pub fn new(
        code: Option<impl Into<String>>,
        message: impl Into<String>,
        hint: Option<impl Into<String>>,
    ) -> Self {
        Self {
            code: code.map(Into::into),
            message: message.into(),
            hint: hint.map(Into::into),
        }
    }

    /// Build failure context from a `UserFacingError` implementation.
    #[must_use]
    pub fn from_error<E: UserFacingError + ?Sized>(error: &E) -> Self {
        Self::new(
            error.user_code(),
            error.user_message().into_owned(),
            error.user_hint(),
        )
    }
}

pub mod general;
pub mod pipeline;
pub mod platform;

pub use general::*;
pub use pipeline::*;
pub use platform::*;

/// Top-level application event enum that aggregates all domain-specific events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "domain", content = "event", rename_all = "snake_case")]
pub enum AppEvent {
    /// General events (warnings, debug notes)
    General(GeneralEvent),

    /// Stage lifecycle events
    Pipeline(PipelineEvent),

    /// External process and host environment events
    Platform(PlatformEvent),
}

impl AppEvent {
    /// Identify the source domain for this event (used for metadata/logging).
    #[must_use]
    pub fn event_source(&self) -> EventSource {
        match self {
            Self::General(_) => EventSource::GENERAL,
            Self::Pipeline(_) => EventSource::PIPELINE,
            Self::Platform(_) => EventSource::PLATFORM,
        }
    }

    /// Determine the appropriate tracing log level for this event
    #[must_use]
    pub fn log_level(&self) -> tracing::Level {
        use tracing::Level;

        match self {
            Self::Pipeline(PipelineEvent::StageFailed { .. })
            | Self::Platform(PlatformEvent::ProcessSpawnFailed { .. }) => Level::ERROR,

            Self::General(GeneralEvent::Warning { .. })
            | Self::Pipeline(PipelineEvent::AdvisoryFailure { .. }) => Level::WARN,

            Self::General(GeneralEvent::DebugLog { .. })
            | Self::Platform(
                PlatformEvent::ProcessCompleted { .. }
                | PlatformEvent::StaleProcessNotKilled { .. },
            ) => Level::DEBUG,

            _ => Level::INFO,
        }
    }
}
