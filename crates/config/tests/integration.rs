//! Integration tests for config

#[cfg(test)]
mod tests {
    use precheck_config::*;
    use precheck_errors::{ConfigError, Error};
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[run]
platform = "linux"
jobs = "8"
configure_options = "-no-debugger"
flambda = true
source_dir = "/src/ocaml"

[logging]
json = true
filter = "debug"
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.run.platform.as_deref(), Some("linux"));
        assert_eq!(config.run.jobs.as_deref(), Some("8"));
        assert_eq!(config.run.configure_options.as_deref(), Some("-no-debugger"));
        assert!(config.run.flambda);
        assert_eq!(config.source_dir(), std::path::PathBuf::from("/src/ocaml"));
        assert!(config.logging.json);
        assert_eq!(config.logging.filter, "debug");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(&dir.path().join("absent.toml"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_unreadable_path_keeps_io_message() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from_file(dir.path()).await.unwrap_err();
        assert_eq!(err.exit_code(), 3);
        match err {
            Error::Config(ConfigError::ReadFailed { path, message }) => {
                assert_eq!(path, dir.path().display().to_string());
                assert!(!message.is_empty());
            }
            other => panic!("expected ReadFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_toml_is_parse_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "[run\nplatform = ").unwrap();
        let err = Config::load_from_file(temp_file.path()).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ParseError { .. })));
    }

    #[test]
    fn test_merge_vars() {
        let mut config = Config::default();
        config
            .merge_vars(lookup(&[
                ("OCAML_ARCH", "mingw"),
                ("OCAML_JOBS", "4"),
                ("OCAML_CONFIGURE_OPTIONS", "-with-debug-runtime"),
                ("OCAML_FLAMBDA", "yes"),
                ("PARALLEL", "--halt now,fail=1"),
            ]))
            .unwrap();

        assert_eq!(config.run.platform.as_deref(), Some("mingw"));
        assert_eq!(config.run.jobs.as_deref(), Some("4"));
        assert_eq!(
            config.run.configure_options.as_deref(),
            Some("-with-debug-runtime")
        );
        assert!(config.run.flambda);
        assert_eq!(config.run.parallel.as_deref(), Some("--halt now,fail=1"));
    }

    #[test]
    fn test_malformed_jobs_kept_verbatim() {
        let mut config = Config::default();
        config
            .merge_vars(lookup(&[("OCAML_JOBS", "lots")]))
            .unwrap();
        assert_eq!(config.run.jobs.as_deref(), Some("lots"));
    }

    #[test]
    fn test_invalid_env_value() {
        let mut config = Config::default();
        let result = config.merge_vars(lookup(&[("OCAML_FLAMBDA", "maybe")]));
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_env_overrides_file_values() {
        let mut config = Config::default();
        config.run.platform = Some("linux".into());
        config
            .merge_vars(lookup(&[("OCAML_ARCH", "bsd"), ("PRECHECK_LOG_FORMAT", "json")]))
            .unwrap();
        assert_eq!(config.run.platform.as_deref(), Some("bsd"));
        assert!(config.logging.json);
    }
}
