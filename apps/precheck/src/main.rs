//! precheck - build, install and test a compiler source tree
//!
//! Resolves the platform from the environment, then drives the source tree
//! through cleaning, configuration, build, install and the test suite. The
//! process exits with the status of the first failing stage.

mod cli;
mod display;
mod error;
mod events;
mod logging;

use crate::cli::Cli;
use crate::display::OutputRenderer;
use crate::error::CliError;
use crate::events::EventHandler;
use clap::Parser;
use precheck_builder::{BuildContext, Builder, PipelineReport, RunRequest};
use precheck_config::Config;
use precheck_events::EventReceiver;
use std::path::PathBuf;
use std::process;
use tokio::select;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(&cli).await {
        Ok(config) => config,
        Err(e) => {
            // Tracing is not up yet; report directly
            if !cli.json {
                eprintln!("Error: {e}");
            }
            process::exit(e.exit_code());
        }
    };

    let json_mode = config.logging.json;
    init_tracing(json_mode, cli.debug, &config.logging.filter);

    if let Err(e) = run(cli, config).await {
        error!(exit_code = e.exit_code(), "Run failed: {}", e);
        if !json_mode {
            eprintln!("Error: {e}");
        }
        process::exit(e.exit_code());
    }
}

/// Load configuration with proper precedence
///
/// 1. File config (or defaults)
/// 2. Environment variables
/// 3. CLI flags
async fn load_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::load_or_default(cli.config.as_deref()).await?;
    config.merge_env()?;

    if let Some(source_dir) = &cli.source_dir {
        config.run.source_dir = Some(source_dir.clone());
    }
    if cli.json {
        config.logging.json = true;
    }
    Ok(config)
}

/// Main application logic
async fn run(cli: Cli, config: Config) -> Result<(), CliError> {
    info!("Starting precheck v{}", env!("CARGO_PKG_VERSION"));

    let request = RunRequest {
        source_dir: config.source_dir(),
        platform: config.run.platform,
        jobs_hint: config.run.jobs,
        overrides: cli.overrides,
        home: std::env::var_os("HOME").map(PathBuf::from),
        run_id: process::id(),
        configure_options: config.run.configure_options,
        flambda: config.run.flambda,
        parallel_env: config.run.parallel,
    };

    let (event_sender, event_receiver) = precheck_events::channel();
    let context = BuildContext::new(Some(event_sender));
    let mut event_handler = EventHandler::new(!config.logging.json, cli.debug);

    let report = run_with_events(&context, &request, event_receiver, &mut event_handler).await?;

    OutputRenderer::new(config.logging.json).render_report(&report)?;

    info!("Run completed successfully");
    Ok(())
}

/// Run the pipeline with concurrent event handling
async fn run_with_events(
    context: &BuildContext,
    request: &RunRequest,
    mut event_receiver: EventReceiver,
    event_handler: &mut EventHandler,
) -> Result<PipelineReport, CliError> {
    let builder = Builder::new();
    let mut run_future = Box::pin(builder.run(context, request));

    loop {
        select! {
            result = &mut run_future => {
                // Drain any remaining events
                while let Ok(event) = event_receiver.try_recv() {
                    event_handler.handle_event(event);
                }
                return result.map_err(CliError::from);
            }

            event = event_receiver.recv() => {
                if let Some(event) = event {
                    event_handler.handle_event(event);
                }
            }
        }
    }
}

fn init_tracing(json_mode: bool, debug_enabled: bool, default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if debug_enabled {
            tracing_subscriber::EnvFilter::new("debug")
        } else if json_mode {
            // Without a console echo, commands still reach the log
            tracing_subscriber::EnvFilter::new(format!(
                "{default_filter},{}=info",
                logging::COMMAND_TARGET
            ))
        } else {
            tracing_subscriber::EnvFilter::new(default_filter)
        }
    });

    if json_mode {
        // stdout carries the report; logs go to stderr
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_env_filter(filter)
            .init();
    }
}
