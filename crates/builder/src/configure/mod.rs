//! Configure step for both configure modes

mod posix;
mod windows;

pub use posix::configure_script;
pub use windows::{rewrite_settings, SettingsRewrite};

use precheck_events::EventEmitter;
use precheck_platform::{ConfigureMode, PlatformCommand};
use std::path::Path;

use crate::options::BuildOptions;

/// Inputs of the configure step
#[derive(Debug, Clone, Copy)]
pub struct ConfigureInputs<'a> {
    pub source_dir: &'a Path,
    pub install_dir: &'a Path,
    pub options: &'a BuildOptions,
    /// Raw configure options from the config file or environment
    pub configure_options: Option<&'a str>,
    pub flambda: bool,
}

/// What the pipeline has to do to configure the tree
#[derive(Debug)]
pub enum ConfigureAction {
    /// Run a command
    Command(PlatformCommand),
    /// Settings files were written in place
    Written,
}

/// Configure the tree according to `mode`
///
/// Posix mode only builds the command; windows-native mode copies and
/// rewrites settings files directly.
///
/// # Errors
///
/// Returns `BuildError::ConfigureFailed` if a windows-native settings file
/// cannot be copied or rewritten.
pub async fn configure(
    mode: &ConfigureMode,
    inputs: &ConfigureInputs<'_>,
    emitter: &impl EventEmitter,
) -> Result<ConfigureAction, precheck_errors::Error> {
    match mode {
        ConfigureMode::Posix => {
            let mut cmd = PlatformCommand::new("sh");
            cmd.arg("-c")
                .arg(configure_script(inputs))
                .current_dir(inputs.source_dir);
            Ok(ConfigureAction::Command(cmd))
        }
        ConfigureMode::WindowsNative(layout) => {
            if !inputs.options.extra_configure_args.is_empty() {
                emitter.emit_warning_with_context(
                    "ignoring -conf arguments",
                    "windows-native platforms are configured from settings templates",
                );
            }
            if inputs.configure_options.is_some_and(|o| !o.trim().is_empty()) {
                emitter.emit_warning("ignoring configure options on a windows-native platform");
            }
            windows::write_settings(layout, inputs).await?;
            Ok(ConfigureAction::Written)
        }
    }
}
