//! Core platform abstractions and context management

use precheck_errors::Error;
use precheck_events::{EventEmitter, EventSender};
use std::path::PathBuf;

use crate::environment::EnvironmentOverlay;
use crate::implementations::host::HostProcessOperations;
use crate::process::{CommandOutput, PlatformCommand, ProcessOperations};

/// Context for platform operations, providing event emission and the child
/// environment of the current run
#[derive(Debug, Clone, Default)]
pub struct PlatformContext {
    event_sender: Option<EventSender>,
    overlay: Option<EnvironmentOverlay>,
    run_id: Option<String>,
}

impl PlatformContext {
    /// Create a new platform context with event emission capabilities
    #[must_use]
    pub fn new(event_sender: Option<EventSender>) -> Self {
        Self {
            event_sender,
            overlay: None,
            run_id: None,
        }
    }

    /// Attach the environment overlay applied to every child command
    #[must_use]
    pub fn with_overlay(mut self, overlay: EnvironmentOverlay) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Tag every emitted event with the run identifier
    #[must_use]
    pub fn with_run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = Some(run_id.into());
        self
    }

    /// Environment overlay, if one was prepared
    #[must_use]
    pub fn overlay(&self) -> Option<&EnvironmentOverlay> {
        self.overlay.as_ref()
    }

    /// Run identifier, if set
    #[must_use]
    pub fn run_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }

    /// Directory children start in when the command does not name one
    #[must_use]
    pub fn default_dir(&self) -> Option<&PathBuf> {
        self.overlay.as_ref().map(|o| &o.working_dir)
    }
}

impl EventEmitter for PlatformContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }

    fn correlation_id(&self) -> Option<&str> {
        self.run_id.as_deref()
    }
}

/// Main platform abstraction providing access to platform operations
pub struct Platform {
    process_ops: Box<dyn ProcessOperations>,
}

impl Platform {
    /// Create a new platform instance with the specified implementation
    #[must_use]
    pub fn new(process_ops: Box<dyn ProcessOperations>) -> Self {
        Self { process_ops }
    }

    /// Platform backed by real child processes on this host
    #[must_use]
    pub fn current() -> Self {
        Self::new(Box::new(HostProcessOperations::new()))
    }

    /// Access process operations
    #[must_use]
    pub fn process(&self) -> &dyn ProcessOperations {
        &*self.process_ops
    }

    /// Create a platform context with event emission
    #[must_use]
    pub fn create_context(&self, event_sender: Option<EventSender>) -> PlatformContext {
        PlatformContext::new(event_sender)
    }

    /// Convenience method: Execute a command and get its exit status
    ///
    /// # Errors
    ///
    /// Returns an error if the command could not be spawned.
    pub async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, Error> {
        self.process().execute_command(ctx, cmd).await
    }

    /// Convenience method: Create a new command builder
    #[must_use]
    pub fn command(&self, program: &str) -> PlatformCommand {
        self.process().create_command(program)
    }

    /// Convenience method: Whether `program` is on the PATH of children
    /// started with `ctx`
    pub async fn has_program(&self, ctx: &PlatformContext, program: &str) -> bool {
        self.process().which(ctx, program).await.is_ok()
    }
}
