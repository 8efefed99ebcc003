//! Configuration sections

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Inputs of one orchestrator run
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct RunConfig {
    /// Platform tag; usually supplied through `OCAML_ARCH`
    #[serde(default)]
    pub platform: Option<String>,
    /// Raw parallelism hint. Kept as text: a malformed value is ignored
    /// when options are resolved, not rejected here.
    #[serde(default)]
    pub jobs: Option<String>,
    /// Shell fragment placed before the quoted `-conf` arguments
    #[serde(default)]
    pub configure_options: Option<String>,
    /// Build the optimizing backend and its invariant checks
    #[serde(default)]
    pub flambda: bool,
    /// Source tree to drive (defaults to the current directory)
    #[serde(default)]
    pub source_dir: Option<PathBuf>,
    /// Extra options for the parallel test runner
    #[serde(default)]
    pub parallel: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub json: bool,
    #[serde(default = "default_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            json: false,
            filter: default_filter(),
        }
    }
}

fn default_filter() -> String {
    "warn".to_string()
}
