//! Platform-specific operation events

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Platform operation events for tracking external processes and the host environment
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum PlatformEvent {
    /// Process execution started
    ProcessStarted {
        /// Command being executed
        command: String,
        /// Command arguments
        args: Vec<String>,
        /// Working directory (if set)
        working_dir: Option<PathBuf>,
    },

    /// Process exited
    ProcessCompleted {
        /// Command that was executed
        command: String,
        /// Exit code from the process, `None` when terminated by a signal
        exit_code: Option<i32>,
        /// Duration of execution in milliseconds
        duration_ms: u64,
    },

    /// Process could not be spawned
    ProcessSpawnFailed {
        /// Command that failed
        command: String,
        /// Error message
        error_message: String,
        /// Duration before failure in milliseconds
        duration_ms: u64,
    },

    /// Child environment resolved for the run
    EnvironmentPrepared {
        /// Scripts sourced before every command, in order
        profile_scripts: Vec<PathBuf>,
        /// Variables pinned for every command
        variables: BTreeMap<String, String>,
        /// Normalized working directory
        working_dir: PathBuf,
    },

    /// A lingering worker image was terminated
    StaleProcessKilled { image: String },

    /// Termination of a worker image did not happen (usually: none running)
    StaleProcessNotKilled { image: String, reason: String },
}
