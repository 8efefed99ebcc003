//! Best-effort termination of stale worker processes
//!
//! Leftover compiler helpers from an earlier run keep files locked on
//! Windows hosts. Nothing here can fail the run: every outcome is reported
//! as an event and otherwise ignored.

use precheck_events::{AppEvent, EventEmitter, PlatformEvent};

use crate::core::{Platform, PlatformContext};

/// Images terminated before the first stage
pub const STALE_IMAGES: [&str; 4] = ["flexlink.exe", "ocamlrun.exe", "camlp4.exe", "ocamltest.exe"];

const TASKKILL: &str = "taskkill";

/// Forcibly terminate every process running one of `images`
///
/// Returns the images that were actually killed.
pub async fn kill_stale(platform: &Platform, ctx: &PlatformContext, images: &[&str]) -> Vec<String> {
    let mut killed = Vec::new();

    for image in images {
        let mut cmd = platform.command(TASKKILL);
        cmd.args(["/f", "/im", *image]);

        let event = match platform.execute_command(ctx, cmd).await {
            Ok(output) if output.success() => {
                killed.push((*image).to_string());
                PlatformEvent::StaleProcessKilled {
                    image: (*image).to_string(),
                }
            }
            Ok(output) => PlatformEvent::StaleProcessNotKilled {
                image: (*image).to_string(),
                reason: output.exit_code.map_or_else(
                    || "terminated without exit code".to_string(),
                    |code| format!("{TASKKILL} exited with status {code}"),
                ),
            },
            Err(e) => PlatformEvent::StaleProcessNotKilled {
                image: (*image).to_string(),
                reason: e.to_string(),
            },
        };
        ctx.emit(AppEvent::Platform(event));
    }

    killed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};
    use async_trait::async_trait;
    use precheck_errors::{Error, PlatformError};
    use std::path::PathBuf;

    /// Kills `ocamlrun.exe`, finds nothing for the rest, cannot start for `camlp4.exe`
    struct ScriptedTaskkill;

    #[async_trait]
    impl ProcessOperations for ScriptedTaskkill {
        async fn execute_command(
            &self,
            _ctx: &PlatformContext,
            cmd: PlatformCommand,
        ) -> Result<CommandOutput, Error> {
            match cmd.get_args().last().map(String::as_str) {
                Some("ocamlrun.exe") => Ok(CommandOutput::from_code(0)),
                Some("camlp4.exe") => Err(PlatformError::ProcessExecutionFailed {
                    command: cmd.to_string(),
                    message: "not found".into(),
                }
                .into()),
                _ => Ok(CommandOutput::from_code(128)),
            }
        }

        async fn which(&self, _ctx: &PlatformContext, program: &str) -> Result<PathBuf, Error> {
            Ok(PathBuf::from(program))
        }
    }

    #[tokio::test]
    async fn failures_are_swallowed_and_reported() {
        let (tx, mut rx) = precheck_events::channel();
        let platform = Platform::new(Box::new(ScriptedTaskkill));
        let ctx = platform.create_context(Some(tx));

        let killed = kill_stale(&platform, &ctx, &STALE_IMAGES).await;
        assert_eq!(killed, ["ocamlrun.exe"]);

        let mut not_killed = Vec::new();
        while let Ok(message) = rx.try_recv() {
            if let AppEvent::Platform(PlatformEvent::StaleProcessNotKilled { image, .. }) =
                message.event
            {
                not_killed.push(image);
            }
        }
        assert_eq!(not_killed, ["flexlink.exe", "camlp4.exe", "ocamltest.exe"]);
    }
}
