//! CLI error handling

use std::fmt;

use precheck_errors::{UserFacingError, CONFIGURATION_EXIT_CODE, GENERIC_FAILURE_EXIT_CODE};

/// CLI-specific error type
#[derive(Debug)]
pub enum CliError {
    /// Configuration error
    Config(precheck_errors::ConfigError),
    /// Run error
    Run(precheck_errors::Error),
    /// I/O error
    Io(std::io::Error),
}

impl CliError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => CONFIGURATION_EXIT_CODE,
            CliError::Run(e) => e.exit_code(),
            CliError::Io(_) => GENERIC_FAILURE_EXIT_CODE,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(e) => {
                write!(f, "Configuration error: {e}")?;
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            CliError::Run(e) => {
                let message = e.user_message();
                write!(f, "{message}")?;
                if let Some(code) = e.user_code() {
                    write!(f, "\n  Code: {code}")?;
                }
                if let Some(hint) = e.user_hint() {
                    write!(f, "\n  Hint: {hint}")?;
                }
                Ok(())
            }
            CliError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Run(e) => Some(e),
            CliError::Io(e) => Some(e),
        }
    }
}

impl From<precheck_errors::ConfigError> for CliError {
    fn from(e: precheck_errors::ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<precheck_errors::Error> for CliError {
    fn from(e: precheck_errors::Error) -> Self {
        match e {
            precheck_errors::Error::Config(config) => CliError::Config(config),
            other => CliError::Run(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use precheck_errors::{BuildError, ConfigError, Error};

    #[test]
    fn configuration_errors_use_sentinel() {
        let err = CliError::from(Error::from(ConfigError::UnknownOption {
            option: "-badflag".into(),
        }));
        assert!(matches!(err, CliError::Config(_)));
        assert_eq!(err.exit_code(), CONFIGURATION_EXIT_CODE);
        assert!(err.to_string().contains("-badflag"));
    }

    #[test]
    fn stage_failures_keep_their_status() {
        let err = CliError::from(Error::from(BuildError::StageFailed {
            stage: "run-tests".into(),
            command: "make --warn-undefined-variables all".into(),
            exit_code: Some(2),
        }));
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("Code: build.stage_failed"));
    }

    #[test]
    fn io_errors_are_generic_failures() {
        let err = CliError::from(std::io::Error::other("broken pipe"));
        assert_eq!(err.exit_code(), GENERIC_FAILURE_EXIT_CODE);
    }
}
