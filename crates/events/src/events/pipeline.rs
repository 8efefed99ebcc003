use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::FailureContext;

/// Lifecycle of one orchestrator run through its stages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PipelineEvent {
    /// Run resolved its platform and is about to start the first stage
    RunStarted {
        run_id: String,
        platform: String,
        source_dir: PathBuf,
        install_dir: PathBuf,
    },

    /// Stage predicate held and the stage began
    StageStarted { stage: String },

    /// Stage predicate did not hold for this run
    StageSkipped { stage: String, reason: String },

    /// Stage finished with every fatal command succeeding
    StageCompleted { stage: String, duration: Duration },

    /// Stage failed; nothing after it runs
    StageFailed {
        stage: String,
        failure: FailureContext,
        exit_code: Option<i32>,
    },

    /// A tolerated command failed and the stage carried on
    AdvisoryFailure {
        stage: String,
        command: String,
        exit_code: Option<i32>,
    },

    /// Every stage ran to completion
    RunCompleted { run_id: String, duration: Duration },
}
