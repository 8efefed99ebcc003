//! Inputs of a run

use precheck_events::{EventEmitter, EventSender};
use std::path::PathBuf;

/// Raw inputs gathered by the caller, before any validation
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// Platform tag (`OCAML_ARCH`)
    pub platform: Option<String>,
    /// Raw parallelism hint (`OCAML_JOBS`)
    pub jobs_hint: Option<String>,
    /// Single-dash overrides from the command line
    pub overrides: Vec<String>,
    pub source_dir: PathBuf,
    /// `$HOME`
    pub home: Option<PathBuf>,
    /// Suffix for the install directory; the orchestrator's process id
    pub run_id: u32,
    /// Raw configure options (`OCAML_CONFIGURE_OPTIONS`)
    pub configure_options: Option<String>,
    pub flambda: bool,
    /// Inherited `PARALLEL`
    pub parallel_env: Option<String>,
}

/// Event context of a run
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub event_sender: Option<EventSender>,
}

impl BuildContext {
    #[must_use]
    pub fn new(event_sender: Option<EventSender>) -> Self {
        Self { event_sender }
    }
}

impl EventEmitter for BuildContext {
    fn event_sender(&self) -> Option<&EventSender> {
        self.event_sender.as_ref()
    }
}
