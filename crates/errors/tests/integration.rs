//! Integration tests for error types

#[cfg(test)]
mod tests {
    use precheck_errors::*;

    #[test]
    fn test_error_conversion() {
        let err: Error = ConfigError::UnknownOption {
            option: "-badflag".into(),
        }
        .into();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.is_configuration());
    }

    #[test]
    fn test_configuration_errors_use_sentinel() {
        let err: Error = ConfigError::UnknownPlatform { tag: "beos".into() }.into();
        assert_eq!(err.exit_code(), CONFIGURATION_EXIT_CODE);
    }

    #[test]
    fn test_stage_failure_propagates_exit_code() {
        let err: Error = BuildError::StageFailed {
            stage: "run-tests".into(),
            command: "make all".into(),
            exit_code: Some(2),
        }
        .into();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_stage_failure_without_code_is_generic() {
        let err: Error = BuildError::StageFailed {
            stage: "build".into(),
            command: "make world".into(),
            exit_code: None,
        }
        .into();
        assert_eq!(err.exit_code(), GENERIC_FAILURE_EXIT_CODE);

        let err: Error = BuildError::SpawnFailed {
            stage: "build".into(),
            command: "gmake world".into(),
            message: "No such file or directory".into(),
        }
        .into();
        assert_eq!(err.exit_code(), GENERIC_FAILURE_EXIT_CODE);
    }

    #[test]
    fn test_error_display() {
        let err = BuildError::StageFailed {
            stage: "install".into(),
            command: "make install".into(),
            exit_code: Some(2),
        };
        assert_eq!(
            err.to_string(),
            "stage install failed: `make install` exited with status 2"
        );
    }

    #[test]
    fn test_user_codes() {
        let err: Error = ConfigError::MissingOptionValue {
            option: "-conf".into(),
        }
        .into();
        assert_eq!(err.user_code(), Some("config.missing_option_value"));
        assert!(err.user_hint().is_some());
    }

    #[test]
    fn test_platform_errors_are_generic_failures() {
        let err: Error = PlatformError::CommandNotFound {
            command: "parallel".into(),
        }
        .into();
        assert_eq!(err.exit_code(), GENERIC_FAILURE_EXIT_CODE);
        assert!(!err.is_configuration());
    }
}
