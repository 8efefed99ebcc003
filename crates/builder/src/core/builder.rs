//! High-level run orchestration

use precheck_errors::{ConfigError, Error};
use precheck_events::{AppEvent, EventEmitter, PipelineEvent, PlatformEvent};
use precheck_platform::{lookup, EnvironmentOverlay, Platform};
use std::time::Instant;

use super::context::{BuildContext, RunRequest};
use crate::environment::{prepare, HostEnvironment};
use crate::install::InstallDirectory;
use crate::options::{parse_with, BuildOptions};
use crate::pipeline::{PipelineDriver, PipelineReport, RunPlan};

/// Orchestrator entry point
pub struct Builder {
    platform: Platform,
}

impl Builder {
    /// Builder driving real processes on this host
    #[must_use]
    pub fn new() -> Self {
        Self::with_platform(Platform::current())
    }

    /// Builder over a specific platform implementation
    #[must_use]
    pub fn with_platform(platform: Platform) -> Self {
        Self { platform }
    }

    /// Validate the request and resolve everything a run needs
    ///
    /// No process is started here.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a missing or unknown platform, an
    /// unknown or incomplete override, an unusable source directory, or a
    /// missing profile script.
    pub async fn plan(
        &self,
        context: &BuildContext,
        request: &RunRequest,
    ) -> Result<(RunPlan, EnvironmentOverlay), Error> {
        let tag = request
            .platform
            .as_deref()
            .ok_or(ConfigError::MissingPlatform)?;
        let record = lookup(tag)?;

        let defaults = BuildOptions::from_jobs_hint(request.jobs_hint.as_deref(), context);
        let options = parse_with(defaults, &request.overrides)?;

        let host = HostEnvironment {
            home: request.home.clone(),
            source_dir: request.source_dir.clone(),
        };
        let overlay = prepare(record, &host).await?;
        let install_dir =
            InstallDirectory::for_run(record, request.home.as_deref(), request.run_id)?;

        let plan = RunPlan {
            record,
            options,
            source_dir: overlay.working_dir.clone(),
            install_dir,
            configure_options: request.configure_options.clone(),
            flambda: request.flambda,
            parallel_env: request.parallel_env.clone(),
        };
        Ok((plan, overlay))
    }

    /// Run the whole pipeline
    ///
    /// # Errors
    ///
    /// Returns a configuration error before any stage runs, or the error of
    /// the first failing stage.
    pub async fn run(
        &self,
        context: &BuildContext,
        request: &RunRequest,
    ) -> Result<PipelineReport, Error> {
        let start = Instant::now();
        let (plan, overlay) = self.plan(context, request).await?;
        let run_id = request.run_id.to_string();

        let ctx = self
            .platform
            .create_context(context.event_sender.clone())
            .with_run_id(run_id.clone())
            .with_overlay(overlay.clone());

        ctx.emit(AppEvent::Pipeline(PipelineEvent::RunStarted {
            run_id: run_id.clone(),
            platform: plan.record.tag.to_string(),
            source_dir: plan.source_dir.clone(),
            install_dir: plan.install_dir.path().to_path_buf(),
        }));
        ctx.emit(AppEvent::Platform(PlatformEvent::EnvironmentPrepared {
            profile_scripts: overlay.profile_scripts,
            variables: overlay.variables,
            working_dir: overlay.working_dir,
        }));

        let report = PipelineDriver::new(&self.platform, &ctx, &plan).run().await?;

        ctx.emit(AppEvent::Pipeline(PipelineEvent::RunCompleted {
            run_id,
            duration: start.elapsed(),
        }));
        Ok(report)
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
