//! Platform registry
//!
//! Every supported platform tag maps to exactly one [`PlatformRecord`]. The
//! mapping is an exhaustive match over [`PlatformTag`], so a new tag cannot be
//! added without also describing how it builds.

use precheck_errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Closed set of platforms the orchestrator knows how to drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformTag {
    Bsd,
    Macos,
    Linux,
    Cygwin,
    Cygwin64,
    Mingw,
    Mingw64,
    Msvc,
    Msvc64,
}

impl PlatformTag {
    /// Every supported tag, in registry order
    pub const ALL: [PlatformTag; 9] = [
        Self::Bsd,
        Self::Macos,
        Self::Linux,
        Self::Cygwin,
        Self::Cygwin64,
        Self::Mingw,
        Self::Mingw64,
        Self::Msvc,
        Self::Msvc64,
    ];

    /// Canonical tag string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bsd => "bsd",
            Self::Macos => "macos",
            Self::Linux => "linux",
            Self::Cygwin => "cygwin",
            Self::Cygwin64 => "cygwin64",
            Self::Mingw => "mingw",
            Self::Mingw64 => "mingw64",
            Self::Msvc => "msvc",
            Self::Msvc64 => "msvc64",
        }
    }

    /// Record describing this platform
    #[must_use]
    pub const fn record(self) -> &'static PlatformRecord {
        match self {
            Self::Bsd => &BSD,
            Self::Macos => &MACOS,
            Self::Linux => &LINUX,
            Self::Cygwin => &CYGWIN,
            Self::Cygwin64 => &CYGWIN64,
            Self::Mingw => &MINGW,
            Self::Mingw64 => &MINGW64,
            Self::Msvc => &MSVC,
            Self::Msvc64 => &MSVC64,
        }
    }
}

impl fmt::Display for PlatformTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlatformTag {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPlatform { tag: s.to_string() })
    }
}

/// How the source tree gets configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ConfigureMode {
    /// `./configure` script run through `sh -c`
    Posix,
    /// Settings files copied from templates and rewritten in place
    WindowsNative(WindowsLayout),
}

/// File layout used by windows-native configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WindowsLayout {
    /// Template copied over `config/Makefile`
    pub settings_template: &'static str,
}

impl WindowsLayout {
    /// Settings file the template is copied to
    pub const SETTINGS_FILE: &'static str = "config/Makefile";

    /// Header files copied before the settings file, as (source, destination)
    pub const HEADERS: [(&'static str, &'static str); 2] = [
        ("config/m-nt.h", "byterun/caml/m.h"),
        ("config/s-nt.h", "byterun/caml/s.h"),
    ];
}

/// How the child environment is prepared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EnvironmentKind {
    /// Host environment used as-is
    Native,
    /// POSIX emulation layer; login profiles are sourced
    PosixEmulation,
    /// POSIX emulation plus a compiler toolchain script (`.msenv32`/`.msenv64`)
    Toolchain { bits: u8 },
}

impl EnvironmentKind {
    /// Script under `$HOME` that sets up the toolchain, if any
    #[must_use]
    pub fn toolchain_script(self) -> Option<String> {
        match self {
            Self::Toolchain { bits } => Some(format!(".msenv{bits}")),
            Self::Native | Self::PosixEmulation => None,
        }
    }

    /// Whether the login profiles must be sourced
    #[must_use]
    pub const fn sources_profiles(self) -> bool {
        !matches!(self, Self::Native)
    }
}

/// Where the throwaway install tree lives before the run suffix is appended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "base", content = "path", rename_all = "snake_case")]
pub enum InstallLocation {
    /// Relative to the user's home directory
    HomeRelative(&'static str),
    /// Fixed drive path
    Absolute(&'static str),
}

impl InstallLocation {
    /// Resolve the base path (without the run suffix)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HomeNotFound` for a home-relative location when
    /// no home directory is known.
    pub fn resolve(self, home: Option<&Path>) -> Result<PathBuf, ConfigError> {
        match self {
            Self::HomeRelative(rel) => home
                .map(|home| home.join(rel))
                .ok_or(ConfigError::HomeNotFound),
            Self::Absolute(path) => Ok(PathBuf::from(path)),
        }
    }
}

/// Behavioral parameters of one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformRecord {
    pub tag: PlatformTag,
    pub make_program: &'static str,
    pub install_location: InstallLocation,
    pub configure: ConfigureMode,
    pub environment: EnvironmentKind,
    pub builds_native_by_default: bool,
    pub needs_process_cleanup: bool,
    pub needs_binary_relocation: bool,
    pub needs_dependency_check: bool,
}

const TMP_INSTALL: InstallLocation = InstallLocation::HomeRelative("ocaml-tmp-install");

const fn posix(tag: PlatformTag, make_program: &'static str) -> PlatformRecord {
    PlatformRecord {
        tag,
        make_program,
        install_location: TMP_INSTALL,
        configure: ConfigureMode::Posix,
        environment: EnvironmentKind::Native,
        builds_native_by_default: true,
        needs_process_cleanup: false,
        needs_binary_relocation: false,
        needs_dependency_check: false,
    }
}

const fn cygwin(tag: PlatformTag) -> PlatformRecord {
    PlatformRecord {
        environment: EnvironmentKind::PosixEmulation,
        needs_process_cleanup: true,
        needs_dependency_check: true,
        ..posix(tag, "make")
    }
}

const fn windows(
    tag: PlatformTag,
    install_dir: &'static str,
    settings_template: &'static str,
    environment: EnvironmentKind,
) -> PlatformRecord {
    PlatformRecord {
        tag,
        make_program: "make",
        install_location: InstallLocation::Absolute(install_dir),
        configure: ConfigureMode::WindowsNative(WindowsLayout { settings_template }),
        environment,
        builds_native_by_default: true,
        needs_process_cleanup: true,
        needs_binary_relocation: false,
        needs_dependency_check: false,
    }
}

static BSD: PlatformRecord = posix(PlatformTag::Bsd, "gmake");
static MACOS: PlatformRecord = posix(PlatformTag::Macos, "make");
static LINUX: PlatformRecord = PlatformRecord {
    needs_dependency_check: true,
    ..posix(PlatformTag::Linux, "make")
};
static CYGWIN: PlatformRecord = cygwin(PlatformTag::Cygwin);
static CYGWIN64: PlatformRecord = cygwin(PlatformTag::Cygwin64);
static MINGW: PlatformRecord = PlatformRecord {
    needs_binary_relocation: true,
    ..windows(
        PlatformTag::Mingw,
        "C:/ocamlmgw",
        "config/Makefile.mingw",
        EnvironmentKind::PosixEmulation,
    )
};
static MINGW64: PlatformRecord = windows(
    PlatformTag::Mingw64,
    "C:/ocamlmgw64",
    "config/Makefile.mingw64",
    EnvironmentKind::PosixEmulation,
);
static MSVC: PlatformRecord = windows(
    PlatformTag::Msvc,
    "C:/ocamlms",
    "config/Makefile.msvc",
    EnvironmentKind::Toolchain { bits: 32 },
);
static MSVC64: PlatformRecord = windows(
    PlatformTag::Msvc64,
    "C:/ocamlms64",
    "config/Makefile.msvc64",
    EnvironmentKind::Toolchain { bits: 64 },
);

/// Look up the record for a platform tag
///
/// # Errors
///
/// Returns `ConfigError::UnknownPlatform` when the tag is not supported.
/// There is no default platform.
pub fn lookup(tag: &str) -> Result<&'static PlatformRecord, ConfigError> {
    tag.parse::<PlatformTag>().map(PlatformTag::record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_tag_round_trips_and_owns_its_record() {
        for tag in PlatformTag::ALL {
            let parsed: PlatformTag = tag.to_string().parse().unwrap();
            assert_eq!(parsed, tag);

            let record = lookup(tag.as_str()).unwrap();
            assert_eq!(record.tag, tag);
            assert!(!record.make_program.is_empty());
            assert!(record.builds_native_by_default);
        }
    }

    #[test]
    fn records_are_distinct() {
        let rendered: HashSet<String> = PlatformTag::ALL
            .iter()
            .map(|tag| format!("{:?}", tag.record()))
            .collect();
        assert_eq!(rendered.len(), PlatformTag::ALL.len());
    }

    #[test]
    fn unknown_tag_is_configuration_error() {
        for tag in ["", "Linux", "solaris", "mingw32", " linux"] {
            let err = lookup(tag).unwrap_err();
            assert!(matches!(err, ConfigError::UnknownPlatform { .. }), "{tag}");
        }
    }

    #[test]
    fn windows_platforms_use_native_configure() {
        for tag in [
            PlatformTag::Mingw,
            PlatformTag::Mingw64,
            PlatformTag::Msvc,
            PlatformTag::Msvc64,
        ] {
            let record = tag.record();
            let ConfigureMode::WindowsNative(layout) = &record.configure else {
                panic!("{tag} should configure natively");
            };
            assert_eq!(
                layout.settings_template,
                format!("config/Makefile.{tag}")
            );
            assert!(record.needs_process_cleanup);
            assert!(matches!(record.install_location, InstallLocation::Absolute(_)));
        }
    }

    #[test]
    fn platform_specific_quirks() {
        assert_eq!(PlatformTag::Bsd.record().make_program, "gmake");
        assert!(PlatformTag::Linux.record().needs_dependency_check);
        assert!(!PlatformTag::Macos.record().needs_dependency_check);
        assert!(PlatformTag::Mingw.record().needs_binary_relocation);
        assert!(!PlatformTag::Mingw64.record().needs_binary_relocation);
        assert_eq!(
            PlatformTag::Msvc64.record().environment.toolchain_script().as_deref(),
            Some(".msenv64")
        );
        assert_eq!(
            PlatformTag::Cygwin.record().environment,
            EnvironmentKind::PosixEmulation
        );
    }

    #[test]
    fn install_location_resolution() {
        let home = Path::new("/home/ci");
        assert_eq!(
            PlatformTag::Linux
                .record()
                .install_location
                .resolve(Some(home))
                .unwrap(),
            PathBuf::from("/home/ci/ocaml-tmp-install")
        );
        assert_eq!(
            PlatformTag::Mingw
                .record()
                .install_location
                .resolve(None)
                .unwrap(),
            PathBuf::from("C:/ocamlmgw")
        );
        assert!(matches!(
            PlatformTag::Macos.record().install_location.resolve(None),
            Err(ConfigError::HomeNotFound)
        ));
    }
}
