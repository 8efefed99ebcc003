//! Throwaway install directory

use precheck_errors::{BuildError, ConfigError, Error};
use precheck_platform::PlatformRecord;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Install prefix used for one run, unique per orchestrator process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallDirectory {
    path: PathBuf,
}

impl InstallDirectory {
    /// Platform install location suffixed with `-<run id>`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HomeNotFound` when the platform installs under
    /// the home directory and none is known.
    pub fn for_run(
        record: &PlatformRecord,
        home: Option<&Path>,
        run_id: u32,
    ) -> Result<Self, ConfigError> {
        let base = record.install_location.resolve(home)?;
        let mut name = base.into_os_string();
        name.push(format!("-{run_id}"));
        Ok(Self {
            path: PathBuf::from(name),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the directory and everything under it; a missing directory is
    /// not an error
    ///
    /// # Errors
    ///
    /// Returns `BuildError::InstallCleanupFailed` if removal fails.
    pub async fn remove(&self) -> Result<(), Error> {
        match fs::remove_dir_all(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BuildError::InstallCleanupFailed {
                path: self.path.display().to_string(),
                message: e.to_string(),
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use precheck_platform::PlatformTag;

    #[test]
    fn suffixes_platform_location_with_run_id() {
        let dir = InstallDirectory::for_run(PlatformTag::Mingw.record(), None, 4242).unwrap();
        assert_eq!(dir.path(), Path::new("C:/ocamlmgw-4242"));

        let dir = InstallDirectory::for_run(
            PlatformTag::Linux.record(),
            Some(Path::new("/home/ci")),
            7,
        )
        .unwrap();
        assert_eq!(dir.path(), Path::new("/home/ci/ocaml-tmp-install-7"));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let linux = PlatformTag::Linux.record();
        let dir = InstallDirectory::for_run(linux, Some(tmp.path()), 1).unwrap();

        fs::create_dir_all(dir.path().join("lib/ocaml")).await.unwrap();
        fs::write(dir.path().join("lib/ocaml/stdlib.cma"), b"x").await.unwrap();

        dir.remove().await.unwrap();
        assert!(!dir.path().exists());
        dir.remove().await.unwrap();
    }
}
