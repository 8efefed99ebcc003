#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]
//! Build orchestration for precheck
//!
//! This crate turns a platform tag and a list of overrides into a run:
//! it resolves the child environment, parses the overrides, and drives the
//! source tree through clean, configure, build, install and test stages.

mod configure;
mod core;
pub mod environment;
mod install;
pub mod options;
pub mod pipeline;
pub mod stages;

pub use configure::{configure_script, rewrite_settings, ConfigureInputs, SettingsRewrite};
pub use core::builder::Builder;
pub use core::context::{BuildContext, RunRequest};
pub use environment::{prepare, HostEnvironment};
pub use install::InstallDirectory;
pub use options::{parse, parse_with, BuildOptions, Parallelism};
pub use pipeline::{PipelineDriver, PipelineReport, RunPlan, StageOutcome, StageStatus};
pub use stages::{Stage, Tolerance};
