//! Pipeline driver
//!
//! Runs the stages in order, each gated by a predicate on the platform
//! record and the build options. The first fatal failure stops the run.

use precheck_errors::{BuildError, Error};
use precheck_events::{AppEvent, EventEmitter, FailureContext, PipelineEvent};
use precheck_platform::cleanup::{kill_stale, STALE_IMAGES};
use precheck_platform::{Platform, PlatformCommand, PlatformContext, PlatformRecord, PlatformTag};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::configure::{configure, ConfigureAction, ConfigureInputs};
use crate::install::InstallDirectory;
use crate::options::BuildOptions;
use crate::stages::{commands, Stage, Tolerance};

/// Everything a run needs, resolved before the first stage
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub record: &'static PlatformRecord,
    pub options: BuildOptions,
    /// Normalized source tree
    pub source_dir: PathBuf,
    pub install_dir: InstallDirectory,
    /// Raw configure options (shell fragment)
    pub configure_options: Option<String>,
    pub flambda: bool,
    /// Inherited options for the parallel test runner
    pub parallel_env: Option<String>,
}

impl RunPlan {
    /// Whether the build produces native-code artifacts
    #[must_use]
    pub fn builds_native(&self) -> bool {
        self.options.build_native && self.record.builds_native_by_default
    }

    /// Why `stage` does not run, or `None` if it does
    #[must_use]
    pub fn skip_reason(&self, stage: Stage) -> Option<&'static str> {
        match stage {
            Stage::ApplyPatches if self.options.patch_files.is_empty() => Some("no patches requested"),
            Stage::DependencyCheck if !self.record.needs_dependency_check => {
                Some("platform does not check dependencies")
            }
            Stage::Relocate if !self.record.needs_binary_relocation => {
                Some("platform does not relocate binaries")
            }
            _ => None,
        }
    }
}

/// How a stage ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageStatus {
    Ran {
        duration_ms: u64,
        /// Tolerated commands that failed
        #[serde(skip_serializing_if = "Vec::is_empty")]
        advisory_failures: Vec<String>,
    },
    Skipped {
        reason: String,
    },
}

/// One stage in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    pub stage: Stage,
    #[serde(flatten)]
    pub status: StageStatus,
}

/// Summary of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub platform: PlatformTag,
    pub install_dir: PathBuf,
    pub stages: Vec<StageOutcome>,
}

impl PipelineReport {
    /// Outcome for `stage`
    #[must_use]
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages.iter().find(|o| o.stage == stage)
    }

    /// Stages that actually ran, in order
    #[must_use]
    pub fn ran(&self) -> Vec<Stage> {
        self.stages
            .iter()
            .filter(|o| matches!(o.status, StageStatus::Ran { .. }))
            .map(|o| o.stage)
            .collect()
    }
}

/// Drives one run through every stage
pub struct PipelineDriver<'a> {
    platform: &'a Platform,
    ctx: &'a PlatformContext,
    plan: &'a RunPlan,
    advisory_failures: Vec<String>,
}

impl<'a> PipelineDriver<'a> {
    #[must_use]
    pub fn new(platform: &'a Platform, ctx: &'a PlatformContext, plan: &'a RunPlan) -> Self {
        Self {
            platform,
            ctx,
            plan,
            advisory_failures: Vec::new(),
        }
    }

    fn source_dir(&self) -> &Path {
        &self.plan.source_dir
    }

    fn make_program(&self) -> &'static str {
        self.plan.record.make_program
    }

    /// Run every stage in order
    ///
    /// # Errors
    ///
    /// Returns the error of the first stage that fails; later stages do not
    /// run.
    pub async fn run(mut self) -> Result<PipelineReport, Error> {
        if self.plan.record.needs_process_cleanup {
            kill_stale(self.platform, self.ctx, &STALE_IMAGES).await;
        }

        let mut stages = Vec::with_capacity(Stage::ALL.len());
        for stage in Stage::ALL {
            if let Some(reason) = self.plan.skip_reason(stage) {
                self.ctx.emit(AppEvent::Pipeline(PipelineEvent::StageSkipped {
                    stage: stage.to_string(),
                    reason: reason.to_string(),
                }));
                stages.push(StageOutcome {
                    stage,
                    status: StageStatus::Skipped {
                        reason: reason.to_string(),
                    },
                });
                continue;
            }

            self.ctx.emit(AppEvent::Pipeline(PipelineEvent::StageStarted {
                stage: stage.to_string(),
            }));
            let start = Instant::now();

            if let Err(e) = self.execute_stage(stage).await {
                self.ctx.emit(AppEvent::Pipeline(PipelineEvent::StageFailed {
                    stage: stage.to_string(),
                    failure: FailureContext::from_error(&e),
                    exit_code: stage_exit_code(&e),
                }));
                return Err(e);
            }

            let duration = start.elapsed();
            self.ctx.emit(AppEvent::Pipeline(PipelineEvent::StageCompleted {
                stage: stage.to_string(),
                duration,
            }));
            stages.push(StageOutcome {
                stage,
                status: StageStatus::Ran {
                    duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
                    advisory_failures: std::mem::take(&mut self.advisory_failures),
                },
            });
        }

        Ok(PipelineReport {
            platform: self.plan.record.tag,
            install_dir: self.plan.install_dir.path().to_path_buf(),
            stages,
        })
    }

    async fn execute_stage(&mut self, stage: Stage) -> Result<(), Error> {
        match stage {
            Stage::Clean => self.clean().await,
            Stage::ApplyPatches => self.apply_patches().await,
            Stage::Configure => self.configure().await,
            Stage::Build => {
                let cmd = commands::build(
                    self.make_program(),
                    self.source_dir(),
                    self.plan.builds_native(),
                    self.plan.options.parallelism,
                );
                self.run_stage(stage, cmd, Tolerance::Fatal).await.map(drop)
            }
            Stage::DependencyCheck => {
                let cmd = commands::dependency_check(self.make_program(), self.source_dir());
                self.run_stage(stage, cmd, Tolerance::Fatal).await.map(drop)
            }
            Stage::Relocate => {
                for cmd in commands::relocations(self.source_dir()) {
                    self.run_stage(stage, cmd, Tolerance::Fatal).await?;
                }
                Ok(())
            }
            Stage::Install => self.install().await,
            Stage::RunTests => self.run_tests().await,
        }
    }

    /// Run one command on behalf of `stage`
    ///
    /// Returns whether the command succeeded. With [`Tolerance::Fatal`] a
    /// failure is an error; with [`Tolerance::Advisory`] it is reported and
    /// `Ok(false)` is returned.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::StageFailed` or `BuildError::SpawnFailed` for a
    /// fatal command that fails.
    pub async fn run_stage(
        &mut self,
        stage: Stage,
        cmd: PlatformCommand,
        tolerance: Tolerance,
    ) -> Result<bool, Error> {
        let command = cmd.to_string();
        self.ctx.emit_debug(format!("{stage}: {command}"));

        let failure = match self.platform.execute_command(self.ctx, cmd).await {
            Ok(output) if output.success() => return Ok(true),
            Ok(output) => (
                output.exit_code,
                BuildError::StageFailed {
                    stage: stage.to_string(),
                    command: command.clone(),
                    exit_code: output.exit_code,
                },
            ),
            Err(e) => (
                None,
                BuildError::SpawnFailed {
                    stage: stage.to_string(),
                    command: command.clone(),
                    message: e.to_string(),
                },
            ),
        };

        match tolerance {
            Tolerance::Fatal => Err(failure.1.into()),
            Tolerance::Advisory => {
                self.ctx.emit(AppEvent::Pipeline(PipelineEvent::AdvisoryFailure {
                    stage: stage.to_string(),
                    command: command.clone(),
                    exit_code: failure.0,
                }));
                self.advisory_failures.push(command);
                Ok(false)
            }
        }
    }

    async fn clean(&mut self) -> Result<(), Error> {
        let distclean = commands::distclean(self.make_program(), self.source_dir());
        self.run_stage(Stage::Clean, distclean, Tolerance::Advisory)
            .await?;
        let force = commands::force_clean(self.source_dir());
        self.run_stage(Stage::Clean, force, Tolerance::Fatal).await?;
        Ok(())
    }

    async fn apply_patches(&mut self) -> Result<(), Error> {
        let plan = self.plan;
        for patch in &plan.options.patch_files {
            let cmd = commands::apply_patch(&plan.source_dir, patch);
            self.run_stage(Stage::ApplyPatches, cmd, Tolerance::Fatal)
                .await?;
        }
        Ok(())
    }

    async fn configure(&mut self) -> Result<(), Error> {
        let plan = self.plan;
        let inputs = ConfigureInputs {
            source_dir: &plan.source_dir,
            install_dir: plan.install_dir.path(),
            options: &plan.options,
            configure_options: plan.configure_options.as_deref(),
            flambda: plan.flambda,
        };

        match configure(&plan.record.configure, &inputs, self.ctx).await? {
            ConfigureAction::Command(cmd) => {
                self.run_stage(Stage::Configure, cmd, Tolerance::Fatal)
                    .await?;
            }
            ConfigureAction::Written => {
                self.ctx
                    .emit_debug("configure: settings written from template");
            }
        }
        Ok(())
    }

    async fn install(&mut self) -> Result<(), Error> {
        let cmd = commands::install(self.make_program(), self.source_dir());
        let installed = self.run_stage(Stage::Install, cmd, Tolerance::Fatal).await;
        let removed = self.plan.install_dir.remove().await;
        // An install failure takes precedence over a cleanup failure
        installed?;
        removed
    }

    async fn run_tests(&mut self) -> Result<(), Error> {
        let parallel = match self.plan.options.parallelism {
            Some(jobs) if self.platform.has_program(self.ctx, commands::PARALLEL_RUNNER).await => {
                Some((jobs, self.plan.parallel_env.as_deref()))
            }
            _ => None,
        };
        let cmd = commands::run_tests(self.make_program(), self.source_dir(), parallel);
        self.run_stage(Stage::RunTests, cmd, Tolerance::Fatal)
            .await
            .map(drop)
    }
}

fn stage_exit_code(error: &Error) -> Option<i32> {
    match error {
        Error::Build(BuildError::StageFailed { exit_code, .. }) => *exit_code,
        _ => None,
    }
}
