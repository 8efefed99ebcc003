//! Environment variable names read by the orchestrator
//!
//! The platform tag and the parallelism hint come from the calling
//! environment, never from the command line.

/// Platform tag (`linux`, `mingw`, ...)
pub const ENV_PLATFORM: &str = "OCAML_ARCH";
/// Parallelism hint, one or two digits
pub const ENV_JOBS: &str = "OCAML_JOBS";
/// Shell fragment prepended to the configure arguments
pub const ENV_CONFIGURE_OPTIONS: &str = "OCAML_CONFIGURE_OPTIONS";
/// Enables the optimizing compiler backend
pub const ENV_FLAMBDA: &str = "OCAML_FLAMBDA";
/// Options forwarded to the parallel test runner
pub const ENV_PARALLEL: &str = "PARALLEL";
/// `text` or `json`
pub const ENV_LOG_FORMAT: &str = "PRECHECK_LOG_FORMAT";

/// Directory under the user config dir holding `config.toml`
pub const CONFIG_DIR_NAME: &str = "precheck";
pub const CONFIG_FILE_NAME: &str = "config.toml";
