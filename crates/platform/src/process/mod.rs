//! Process execution operations

pub mod shell;

use async_trait::async_trait;
use precheck_errors::Error;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::core::PlatformContext;

/// Platform-specific command builder and execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCommand {
    program: String,
    args: Vec<String>,
    current_dir: Option<PathBuf>,
    env: BTreeMap<String, String>,
}

impl PlatformCommand {
    /// Create a new platform command
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            args: Vec::new(),
            current_dir: None,
            env: BTreeMap::new(),
        }
    }

    /// Add an argument to the command
    pub fn arg<S: AsRef<str>>(&mut self, arg: S) -> &mut Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    /// Add multiple arguments to the command
    pub fn args<I, S>(&mut self, args: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for arg in args {
            self.args.push(arg.as_ref().to_string());
        }
        self
    }

    /// Set the working directory for the command
    pub fn current_dir<P: Into<PathBuf>>(&mut self, dir: P) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Set an environment variable for the child
    pub fn env<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> &mut Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Get the program name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the arguments
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Get the current directory
    pub fn get_current_dir(&self) -> Option<&PathBuf> {
        self.current_dir.as_ref()
    }

    /// Get the environment variables set on this command
    pub fn get_env_vars(&self) -> &BTreeMap<String, String> {
        &self.env
    }
}

impl fmt::Display for PlatformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.env {
            write!(f, "{key}={} ", shell::quote(value))?;
        }
        f.write_str(&shell::quote_if_needed(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", shell::quote_if_needed(arg))?;
        }
        Ok(())
    }
}

/// Output from command execution
///
/// Children inherit the orchestrator's stdout and stderr, so only the exit
/// status is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the child was terminated by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Output of a child that exited with `code`
    #[must_use]
    pub fn from_code(code: i32) -> Self {
        Self {
            exit_code: Some(code),
        }
    }

    /// Whether the child exited with status 0
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Trait for process execution operations
#[async_trait]
pub trait ProcessOperations: Send + Sync {
    /// Execute a command to completion and return its exit status
    async fn execute_command(
        &self,
        ctx: &PlatformContext,
        cmd: PlatformCommand,
    ) -> Result<CommandOutput, Error>;

    /// Create a new command builder
    fn create_command(&self, program: &str) -> PlatformCommand {
        PlatformCommand::new(program)
    }

    /// Find the path to an executable on the PATH children of `ctx` see
    async fn which(&self, ctx: &PlatformContext, program: &str) -> Result<PathBuf, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_renders_env_program_and_args() {
        let mut cmd = PlatformCommand::new("make");
        cmd.env("PARALLEL", "-j4 ")
            .args(["--warn-undefined-variables", "parallel"]);
        assert_eq!(
            cmd.to_string(),
            "PARALLEL='-j4 ' make --warn-undefined-variables parallel"
        );
    }

    #[test]
    fn display_quotes_ambiguous_args() {
        let mut cmd = PlatformCommand::new("sh");
        cmd.args(["-c", "./configure -prefix /opt/x"]);
        assert_eq!(cmd.to_string(), "sh -c './configure -prefix /opt/x'");

        let mut patch = PlatformCommand::new("patch");
        patch.args(["-f", "-p1", "-i", "my fix.patch"]);
        assert_eq!(patch.to_string(), "patch -f -p1 -i 'my fix.patch'");
    }

    #[test]
    fn success_requires_zero_exit() {
        assert!(CommandOutput::from_code(0).success());
        assert!(!CommandOutput::from_code(2).success());
        assert!(!CommandOutput { exit_code: None }.success());
    }
}
