//! PushPreview action entry point.
//!
//! This binary is the composition root for the entire system. Responsibilities:
//!
//! 1. **Parse configuration** — read action inputs from flags or `INPUT_*`
//!    variables and validate them into a [`pipeline::RunConfig`].
//! 2. **Wire observability** — install the `tracing` subscriber (see
//!    [`telemetry`]). Every crate in the workspace logs through it.
//! 3. **Construct infrastructure** — create the [`archive::ZipArchiver`],
//!    [`pushpreview::PushPreviewClient`] and [`github::GithubClient`] and inject
//!    them into a [`runner::PreviewRunner`].
//! 4. **Report the outcome** — print one `::error::` workflow command per
//!    failure reason, write the `preview-url` step output on success, and set
//!    the exit status.

mod config;
mod telemetry;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use archive::ZipArchiver;
use clap::Parser;
use github::{error_command, load_event_payload, write_step_output, GithubClient};
use pipeline::{ConfigurationError, RunConfig, RunId};
use pushpreview::PushPreviewClient;
use runner::{PreviewRunner, RunOutcome};
use tracing::{error, info, info_span, warn, Instrument};

use crate::config::{parse_profile, Args};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let telemetry = match telemetry::init() {
        Ok(t) => Some(t),
        Err(e) => {
            eprintln!("Failed to initialise logging: {e:#}");
            None
        }
    };

    let run_id = RunId::new_random();
    let result = execute(args)
        .instrument(info_span!("preview_run", run_id = %run_id))
        .await;
    let code = report(result);

    if let Some(t) = telemetry {
        t.shutdown();
    }
    code
}

async fn execute(args: Args) -> Result<RunOutcome> {
    let pushpreview_endpoint = args.pushpreview_endpoint();
    let github_api_root = args.github_api_root();
    let profile = parse_profile(args.trigger_profile.as_deref())?;
    let config = RunConfig::new(
        Args::non_empty(args.source_directory).unwrap_or_default(),
        Args::non_empty(args.github_token).unwrap_or_default(),
        Args::non_empty(args.pushpreview_token).unwrap_or_default(),
        profile,
    )?;

    let event_path = Args::non_empty_path(args.event_path).ok_or(
        ConfigurationError::MissingInput {
            name: "GITHUB_EVENT_PATH",
        },
    )?;
    let event = load_event_payload(&event_path).await?;

    let archiver = match Args::non_empty_path(args.archive_path) {
        Some(path) => ZipArchiver::new(path),
        None => ZipArchiver::in_temp_dir(),
    };
    info!(
        source = config.source_directory(),
        archive = %archiver.destination().display(),
        %profile,
        "Configuration loaded"
    );

    let runner = PreviewRunner::new(
        Arc::new(archiver),
        Arc::new(PushPreviewClient::with_endpoint(
            config.pushpreview_token().clone(),
            pushpreview_endpoint,
        )),
        Arc::new(GithubClient::with_api_url(
            config.github_token().clone(),
            github_api_root,
        )),
    );

    let repository = Args::non_empty(args.repository);
    let outcome = runner.run(&event, repository.as_deref(), &config).await;

    publish_step_output(&outcome, Args::non_empty_path(args.output_path).as_deref()).await;

    Ok(outcome)
}

/// Writes the `preview-url` step output; only successful runs have one.
async fn publish_step_output(outcome: &RunOutcome, output_path: Option<&Path>) {
    let (RunOutcome::Succeeded { preview_url }, Some(path)) = (outcome, output_path) else {
        return;
    };
    if let Err(e) = write_step_output(path, "preview-url", preview_url.as_str()).await {
        warn!(error = %e, path = %path.display(), "Failed to write step output");
    }
}

/// What the process prints on stdout and how it exits.
#[derive(Debug, PartialEq, Eq)]
struct Report {
    workflow_commands: Vec<String>,
    failed: bool,
}

impl Report {
    fn exit_code(&self) -> ExitCode {
        if self.failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }
}

fn summarize(result: &Result<RunOutcome>) -> Report {
    match result {
        Ok(outcome) => {
            match outcome {
                RunOutcome::Succeeded { preview_url } => {
                    info!(%preview_url, "Preview published");
                }
                RunOutcome::Skipped { reason } => info!(%reason, "Run skipped"),
                RunOutcome::Failed { .. } => {}
            }
            Report {
                workflow_commands: outcome
                    .failure_reasons()
                    .iter()
                    .map(|reason| error_command(reason))
                    .collect(),
                failed: outcome.is_failure(),
            }
        }
        Err(e) => {
            error!(error = %e, "Run could not start");
            Report {
                workflow_commands: vec![error_command(&format!("{e:#}"))],
                failed: true,
            }
        }
    }
}

fn report(result: Result<RunOutcome>) -> ExitCode {
    let report = summarize(&result);
    for command in &report.workflow_commands {
        println!("{command}");
    }
    report.exit_code()
}
