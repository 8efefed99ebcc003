//! Host process operations implementation
//!
//! Children are started with tokio, inherit stdio, and get the run's
//! environment overlay applied at launch.

use async_trait::async_trait;
use precheck_errors::{Error, PlatformError};
use precheck_events::{AppEvent, EventEmitter, PlatformEvent};
use std::convert::TryFrom;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

use crate::core::PlatformContext;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

/// Process operations on the machine running the orchestrator
#[derive(Debug, Clone, Copy)]
pub struct HostProcessOperations;

impl HostProcessOperations {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Default for HostProcessOperations {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints the resolved path of `$1`, fails when it is not found
const LOOKUP_SCRIPT: &str = "command -v \"$1\"";

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Translate a platform command into a tokio command, applying the overlay
fn build_command(ctx: &PlatformContext, cmd: &PlatformCommand) -> Command {
    let cwd = cmd.get_current_dir().or_else(|| ctx.default_dir());

    let mut command = match ctx.overlay() {
        Some(overlay) if overlay.needs_prelude() => {
            let dir = cwd.cloned().unwrap_or_else(|| overlay.working_dir.clone());
            let mut command = Command::new("sh");
            command
                .arg("-c")
                .arg(overlay.prelude(&dir))
                .arg(cmd.program())
                .args(cmd.get_args());
            command
        }
        _ => {
            let mut command = Command::new(cmd.program());
            command.args(cmd.get_args());
            command
        }
    };

    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    if let Some(overlay) = ctx.overlay() {
        command.envs(&overlay.variables);
    }

    for (key, value) in cmd.get_env_vars() {
        command.env(key, value);
    }

    command
}

#[async_trait]
impl ProcessOperations for HostProcessOperations {
    async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, Error> {
        let start = Instant::now();
        ctx.emit(AppEvent::Platform(PlatformEvent::ProcessStarted {
            command: cmd.program().to_string(),
            args: cmd.get_args().to_vec(),
            working_dir: cmd.get_current_dir().or_else(|| ctx.default_dir()).cloned(),
        }));

        let result = build_command(ctx, &cmd).status().await;
        let duration_ms = duration_to_millis(start.elapsed());

        match result {
            Ok(status) => {
                ctx.emit(AppEvent::Platform(PlatformEvent::ProcessCompleted {
                    command: cmd.program().to_string(),
                    exit_code: status.code(),
                    duration_ms,
                }));
                Ok(CommandOutput {
                    exit_code: status.code(),
                })
            }
            Err(e) => {
                ctx.emit(AppEvent::Platform(PlatformEvent::ProcessSpawnFailed {
                    command: cmd.program().to_string(),
                    error_message: e.to_string(),
                    duration_ms,
                }));
                Err(PlatformError::ProcessExecutionFailed {
                    command: cmd.to_string(),
                    message: e.to_string(),
                }
                .into())
            }
        }
    }

    async fn which(&self, ctx: &PlatformContext, program: &str) -> Result<PathBuf, Error> {
        let not_found = || -> Error {
            PlatformError::CommandNotFound {
                command: program.to_string(),
            }
            .into()
        };

        let Some(overlay) = ctx.overlay().filter(|o| o.needs_prelude()) else {
            return which::which(program).map_err(|_| not_found());
        };

        // Profiles may extend PATH, so ask a shell that sourced them
        let output = Command::new("sh")
            .arg("-c")
            .arg(overlay.prelude(&overlay.working_dir))
            .args(["sh", "-c", LOOKUP_SCRIPT, "sh", program])
            .current_dir(&overlay.working_dir)
            .envs(&overlay.variables)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .await
            .map_err(|_| not_found())?;

        // Profiles may print banners; the lookup answer is the last line
        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.lines().rev().map(str::trim).find(|l| !l.is_empty()) {
            Some(path) if output.status.success() => Ok(PathBuf::from(path)),
            _ => Err(not_found()),
        }
    }
}
