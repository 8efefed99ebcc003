//! Child-process environment overlay
//!
//! The orchestrator never mutates its own environment. Everything a child
//! needs (sourced login scripts, pinned locale, working directory) is carried
//! by an [`EnvironmentOverlay`] and applied when the child is launched.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::process::shell::quote;

/// Environment applied to every child command of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvironmentOverlay {
    /// Variables pinned for every child
    pub variables: BTreeMap<String, String>,
    /// Scripts sourced, in order, before the child runs
    pub profile_scripts: Vec<PathBuf>,
    /// Normalized source directory
    pub working_dir: PathBuf,
}

impl EnvironmentOverlay {
    /// Overlay that only pins variables in `working_dir`
    #[must_use]
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            variables: BTreeMap::new(),
            profile_scripts: Vec::new(),
            working_dir: working_dir.into(),
        }
    }

    /// Pin a variable
    #[must_use]
    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Append a script to source
    #[must_use]
    pub fn with_profile_script(mut self, script: impl Into<PathBuf>) -> Self {
        self.profile_scripts.push(script.into());
        self
    }

    /// Whether children must be started through a shell prelude
    #[must_use]
    pub fn needs_prelude(&self) -> bool {
        !self.profile_scripts.is_empty()
    }

    /// Shell prelude run by `sh -c` ahead of the real command
    ///
    /// The command itself is passed as `$0 "$@"`. The status of a sourced
    /// script is ignored: profiles often end in a test that fails. Profiles
    /// may change directory or locale, so the pinned variables are exported
    /// and the directory is re-entered after the last script.
    #[must_use]
    pub fn prelude(&self, cwd: &Path) -> String {
        let mut prelude = String::new();
        for script in &self.profile_scripts {
            prelude.push_str(&format!(". {}; ", quote(&script.to_string_lossy())));
        }

        let mut steps: Vec<String> = self
            .variables
            .iter()
            .map(|(key, value)| format!("export {key}={}", quote(value)))
            .collect();
        steps.push(format!("cd {}", quote(&cwd.to_string_lossy())));
        steps.push("exec \"$0\" \"$@\"".to_string());

        prelude.push_str(&steps.join(" && "));
        prelude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_overlay_has_no_prelude() {
        let overlay = EnvironmentOverlay::new("/src").with_variable("LC_ALL", "C");
        assert!(!overlay.needs_prelude());
    }

    #[test]
    fn prelude_sources_scripts_in_order_then_execs() {
        let overlay = EnvironmentOverlay::new("/src")
            .with_variable("LC_ALL", "C")
            .with_profile_script("/etc/profile")
            .with_profile_script("/home/ci/.profile");

        assert_eq!(
            overlay.prelude(Path::new("/src/testsuite")),
            ". '/etc/profile'; . '/home/ci/.profile'; export LC_ALL='C' \
             && cd '/src/testsuite' && exec \"$0\" \"$@\""
        );
    }
}
