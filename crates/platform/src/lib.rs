//! Platform abstraction layer for the build orchestrator.
//!
//! This crate provides:
//! - The platform registry: a closed set of tags, each mapped to one record
//!   of behavioral parameters
//! - Process execution with event emission and an environment overlay
//!   applied to every child
//! - Shell quoting for arguments embedded in `sh -c` strings
//! - Best-effort termination of stale worker processes
//! - The binary relocation table for platforms with fixed DLL bases

pub mod binary;
pub mod cleanup;
pub mod core;
pub mod environment;
pub mod implementations;
pub mod process;
pub mod registry;

pub use core::{Platform, PlatformContext};
pub use environment::EnvironmentOverlay;
pub use implementations::host::HostProcessOperations;
pub use registry::{
    lookup, ConfigureMode, EnvironmentKind, InstallLocation, PlatformRecord, PlatformTag,
    WindowsLayout,
};

/// Re-export commonly used types
pub use process::{
    shell::{quote, quote_if_needed},
    CommandOutput, PlatformCommand, ProcessOperations,
};
