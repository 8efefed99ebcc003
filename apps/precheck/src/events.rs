//! Console feedback for run events

use console::{style, Term};
use precheck_events::{AppEvent, EventMessage, GeneralEvent, PipelineEvent, PlatformEvent};
use precheck_platform::quote_if_needed;

use crate::logging::log_event_with_tracing;

/// Command line as it would be typed into a shell
fn command_line(command: &str, args: &[String]) -> String {
    std::iter::once(command)
        .chain(args.iter().map(String::as_str))
        .map(quote_if_needed)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Event handler for stage banners and user feedback
pub struct EventHandler {
    /// Show banners on stderr (off in JSON mode)
    show_console: bool,
    /// Also show debug notes
    verbose: bool,
    term: Term,
}

impl EventHandler {
    /// Create new event handler
    pub fn new(show_console: bool, verbose: bool) -> Self {
        Self {
            show_console,
            verbose,
            term: Term::stderr(),
        }
    }

    /// Handle incoming event
    pub fn handle_event(&mut self, message: EventMessage) {
        log_event_with_tracing(&message);

        if !self.show_console {
            return;
        }
        if let Some(line) = self.render(&message.event) {
            // Console output is best effort
            let _ = self.term.write_line(&line);
        }
    }

    /// Console line for an event, if it gets one
    fn render(&self, event: &AppEvent) -> Option<String> {
        match event {
            AppEvent::Pipeline(PipelineEvent::RunStarted {
                platform,
                install_dir,
                ..
            }) => Some(format!(
                "{} {} (install prefix {})",
                style("precheck").bold(),
                style(platform).cyan(),
                install_dir.display()
            )),
            AppEvent::Pipeline(PipelineEvent::StageStarted { stage }) => {
                Some(format!("{} {}", style("==>").blue().bold(), style(stage).bold()))
            }
            AppEvent::Pipeline(PipelineEvent::StageSkipped { stage, reason }) => Some(format!(
                "{} {} ({reason})",
                style("--").dim(),
                style(stage).dim()
            )),
            AppEvent::Pipeline(PipelineEvent::StageFailed { stage, failure, .. }) => Some(format!(
                "{} {stage}: {}",
                style("FAILED").red().bold(),
                failure.message
            )),
            AppEvent::Pipeline(PipelineEvent::AdvisoryFailure { command, .. }) => Some(format!(
                "{} `{command}` failed, continuing",
                style("warning:").yellow().bold()
            )),
            AppEvent::Pipeline(PipelineEvent::RunCompleted { duration, .. }) => Some(format!(
                "{} in {:.1}s",
                style("All stages passed").green().bold(),
                duration.as_secs_f64()
            )),
            AppEvent::Platform(PlatformEvent::ProcessStarted { command, args, .. }) => {
                Some(format!("{} {}", style("+").dim(), command_line(command, args)))
            }
            AppEvent::General(GeneralEvent::DebugLog { message }) if self.verbose => {
                Some(format!("{} {message}", style("debug:").dim()))
            }
            AppEvent::General(GeneralEvent::Warning { message, context }) => Some(match context {
                Some(context) => format!("{} {message}: {context}", style("warning:").yellow().bold()),
                None => format!("{} {message}", style("warning:").yellow().bold()),
            }),
            _ => None,
        }
    }
}
