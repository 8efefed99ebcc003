//! Structured logging integration for events
//!
//! Converts domain events into tracing records with structured fields.

use precheck_events::{AppEvent, EventMessage, GeneralEvent, PipelineEvent, PlatformEvent};
use tracing::{debug, error, info, warn};

/// Tracing target carrying every spawned command
pub const COMMAND_TARGET: &str = "precheck::commands";

/// Log an `EventMessage` using the tracing infrastructure
pub fn log_event_with_tracing(message: &EventMessage) {
    let event = &message.event;
    let meta = &message.meta;

    match event {
        AppEvent::Pipeline(pipeline_event) => match pipeline_event {
            PipelineEvent::RunStarted {
                run_id,
                platform,
                source_dir,
                install_dir,
            } => {
                info!(
                    source = meta.source.as_str(),
                    event_id = %meta.event_id,
                    run_id = %run_id,
                    platform = %platform,
                    source_dir = %source_dir.display(),
                    install_dir = %install_dir.display(),
                    "Run started"
                );
            }
            PipelineEvent::StageStarted { stage } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    stage = %stage,
                    "Stage started"
                );
            }
            PipelineEvent::StageSkipped { stage, reason } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    stage = %stage,
                    reason = %reason,
                    "Stage skipped"
                );
            }
            PipelineEvent::StageCompleted { stage, duration } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    stage = %stage,
                    duration_ms = duration.as_millis(),
                    "Stage completed"
                );
            }
            PipelineEvent::StageFailed {
                stage,
                failure,
                exit_code,
            } => {
                error!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    stage = %stage,
                    exit_code = ?exit_code,
                    code = ?failure.code,
                    message = %failure.message,
                    hint = ?failure.hint,
                    "Stage failed"
                );
            }
            PipelineEvent::AdvisoryFailure {
                stage,
                command,
                exit_code,
            } => {
                warn!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    stage = %stage,
                    command = %command,
                    exit_code = ?exit_code,
                    "Tolerated command failed"
                );
            }
            PipelineEvent::RunCompleted { run_id, duration } => {
                info!(
                    source = meta.source.as_str(),
                    run_id = %run_id,
                    duration_ms = duration.as_millis(),
                    "Run completed"
                );
            }
        },

        AppEvent::Platform(platform_event) => match platform_event {
            PlatformEvent::ProcessStarted {
                command,
                args,
                working_dir,
            } => {
                info!(
                    target: COMMAND_TARGET,
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    command = %command,
                    args = ?args,
                    working_dir = ?working_dir,
                    "Process started"
                );
            }
            PlatformEvent::ProcessCompleted {
                command,
                exit_code,
                duration_ms,
            } => {
                debug!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    command = %command,
                    exit_code = ?exit_code,
                    duration_ms = duration_ms,
                    "Process completed"
                );
            }
            PlatformEvent::ProcessSpawnFailed {
                command,
                error_message,
                duration_ms,
            } => {
                error!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    command = %command,
                    error = %error_message,
                    duration_ms = duration_ms,
                    "Process could not be started"
                );
            }
            PlatformEvent::EnvironmentPrepared {
                profile_scripts,
                variables,
                working_dir,
            } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    profile_scripts = ?profile_scripts,
                    variables = ?variables,
                    working_dir = %working_dir.display(),
                    "Environment prepared"
                );
            }
            PlatformEvent::StaleProcessKilled { image } => {
                info!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    image = %image,
                    "Stale process killed"
                );
            }
            PlatformEvent::StaleProcessNotKilled { image, reason } => {
                debug!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    image = %image,
                    reason = %reason,
                    "Stale process not killed"
                );
            }
        },

        AppEvent::General(general_event) => match general_event {
            GeneralEvent::Warning { message, context } => {
                warn!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    message = %message,
                    context = ?context,
                    "Warning"
                );
            }
            GeneralEvent::DebugLog { message } => {
                debug!(
                    source = meta.source.as_str(),
                    correlation = ?meta.correlation_id,
                    message = %message,
                    "Debug log"
                );
            }
        },
    }
}
