//! Pipeline stages and the commands they run

pub mod commands;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stages of a run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Remove every build product and untracked file
    Clean,
    /// Apply requested patches
    ApplyPatches,
    /// Configure the tree for the platform
    Configure,
    /// Compile
    Build,
    /// Check that recorded dependencies are up to date
    DependencyCheck,
    /// Rebase shared libraries to fixed addresses
    Relocate,
    /// Install into the throwaway prefix, then remove it
    Install,
    /// Run the test suite
    RunTests,
}

impl Stage {
    pub const ALL: [Stage; 8] = [
        Self::Clean,
        Self::ApplyPatches,
        Self::Configure,
        Self::Build,
        Self::DependencyCheck,
        Self::Relocate,
        Self::Install,
        Self::RunTests,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clean => "clean",
            Self::ApplyPatches => "apply-patches",
            Self::Configure => "configure",
            Self::Build => "build",
            Self::DependencyCheck => "dependency-check",
            Self::Relocate => "relocate",
            Self::Install => "install",
            Self::RunTests => "run-tests",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// What a failing command means for its stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tolerance {
    /// Failure aborts the run
    Fatal,
    /// Failure is reported and the stage continues
    Advisory,
}
