//! Environment resolver
//!
//! Decides which login scripts each child sources, pins the locale and
//! normalizes the working directory. The result is an overlay applied to
//! child launches; the orchestrator's own environment stays untouched.

use precheck_errors::{ConfigError, Error};
use precheck_platform::{EnvironmentOverlay, PlatformRecord};
use std::path::{Path, PathBuf};
use tokio::fs;

/// System-wide login profile sourced on POSIX-emulation hosts
pub const SYSTEM_PROFILE: &str = "/etc/profile";
/// Per-user login profile, relative to `$HOME`
pub const USER_PROFILE: &str = ".profile";

/// Facts about the host the resolver needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEnvironment {
    /// `$HOME`, if set
    pub home: Option<PathBuf>,
    /// Source tree as given by the caller
    pub source_dir: PathBuf,
}

/// Scripts sourced for `record`, in order
///
/// # Errors
///
/// Returns `ConfigError::HomeNotFound` if scripts are needed and no home
/// directory is known.
pub fn profile_scripts(record: &PlatformRecord, home: Option<&Path>) -> Result<Vec<PathBuf>, ConfigError> {
    if !record.environment.sources_profiles() {
        return Ok(Vec::new());
    }

    let home = home.ok_or(ConfigError::HomeNotFound)?;
    let mut scripts = vec![PathBuf::from(SYSTEM_PROFILE), home.join(USER_PROFILE)];
    // Toolchain script last so its settings win over the profiles
    if let Some(toolchain) = record.environment.toolchain_script() {
        scripts.push(home.join(toolchain));
    }
    Ok(scripts)
}

/// Prepare the child environment for a run on `record`
///
/// # Errors
///
/// Returns a configuration error if the source directory cannot be
/// resolved or a required profile script does not exist.
pub async fn prepare(record: &PlatformRecord, host: &HostEnvironment) -> Result<EnvironmentOverlay, Error> {
    let working_dir = fs::canonicalize(&host.source_dir)
        .await
        .map_err(|e| ConfigError::InvalidSourceDir {
            path: host.source_dir.display().to_string(),
            message: e.to_string(),
        })?;

    let mut overlay = EnvironmentOverlay::new(working_dir).with_variable("LC_ALL", "C");

    for script in profile_scripts(record, host.home.as_deref())? {
        if !fs::try_exists(&script).await.unwrap_or(false) {
            return Err(ConfigError::MissingEnvironmentScript {
                path: script.display().to_string(),
            }
            .into());
        }
        overlay = overlay.with_profile_script(script);
    }

    Ok(overlay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use precheck_platform::PlatformTag;

    #[test]
    fn native_platforms_source_nothing() {
        for tag in [PlatformTag::Linux, PlatformTag::Macos, PlatformTag::Bsd] {
            assert!(profile_scripts(tag.record(), None).unwrap().is_empty());
        }
    }

    #[test]
    fn toolchain_script_comes_last() {
        let home = Path::new("/home/ci");
        assert_eq!(
            profile_scripts(PlatformTag::Msvc64.record(), Some(home)).unwrap(),
            [
                PathBuf::from("/etc/profile"),
                PathBuf::from("/home/ci/.profile"),
                PathBuf::from("/home/ci/.msenv64"),
            ]
        );
        assert_eq!(
            profile_scripts(PlatformTag::Mingw.record(), Some(home))
                .unwrap()
                .len(),
            2
        );
    }

    #[test]
    fn emulation_without_home_is_an_error() {
        assert!(matches!(
            profile_scripts(PlatformTag::Cygwin.record(), None),
            Err(ConfigError::HomeNotFound)
        ));
    }

    #[tokio::test]
    async fn native_overlay_pins_locale_and_canonical_dir() {
        let src = tempfile::tempdir().unwrap();
        let host = HostEnvironment {
            home: None,
            source_dir: src.path().join("."),
        };

        let overlay = prepare(PlatformTag::Linux.record(), &host).await.unwrap();
        assert_eq!(overlay.variables.get("LC_ALL").map(String::as_str), Some("C"));
        assert_eq!(overlay.working_dir, std::fs::canonicalize(src.path()).unwrap());
        assert!(overlay.profile_scripts.is_empty());
    }

    #[tokio::test]
    async fn missing_toolchain_script_is_configuration_error() {
        let src = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        std::fs::write(home.path().join(".profile"), "").unwrap();
        let host = HostEnvironment {
            home: Some(home.path().to_path_buf()),
            source_dir: src.path().to_path_buf(),
        };

        let err = prepare(PlatformTag::Msvc.record(), &host).await.unwrap_err();
        match err {
            Error::Config(ConfigError::MissingEnvironmentScript { path }) => {
                // /etc/profile may be absent on the test host; otherwise the
                // toolchain script is the one reported
                assert!(path.ends_with("profile") || path.ends_with(".msenv32"), "{path}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn missing_source_dir_is_configuration_error() {
        let host = HostEnvironment {
            home: None,
            source_dir: PathBuf::from("/nonexistent/precheck/source"),
        };
        let err = prepare(PlatformTag::Linux.record(), &host).await.unwrap_err();
        assert!(err.is_configuration());
    }
}
