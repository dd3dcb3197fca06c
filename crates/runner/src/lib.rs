//! Orchestration of a single preview run.
//!
//! [`PreviewRunner`] drives the run through its states and reports a
//! [`RunOutcome`]:
//!
//! ```text
//! Init → Validating → Archiving → Uploading → Notifying(Success|Failure) → Done
//! ```
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The runner sequences calls between the trigger and
//! message rules in the [`pipeline`] crate and the infrastructure ports
//! ([`pipeline::Archiver`], [`pipeline::PreviewHost`], [`pipeline::CommentSink`]).
//! It contains no wording or HTTP details of its own.

mod outcome;

use std::path::Path;
use std::sync::Arc;

use pipeline::profile::{success_message, workflow_failure_message};
use pipeline::{
    resolve_trigger, Archiver, CommentSink, EventPayload, PreviewHost, RunConfig,
    TriggerContext, TriggerResolution, ValidationError,
};
use tracing::{error, info, warn};

pub use outcome::{RunOutcome, RunState};

/// Runs Archiver → Uploader → Notifier for one trigger.
#[derive(Clone)]
pub struct PreviewRunner {
    archiver: Arc<dyn Archiver>,
    host: Arc<dyn PreviewHost>,
    comments: Arc<dyn CommentSink>,
}

impl PreviewRunner {
    /// Creates a runner over the given ports.
    pub fn new(
        archiver: Arc<dyn Archiver>,
        host: Arc<dyn PreviewHost>,
        comments: Arc<dyn CommentSink>,
    ) -> Self {
        Self {
            archiver,
            host,
            comments,
        }
    }

    /// Resolves the trigger from `event`, then runs every stage.
    ///
    /// `repository` is the runner-supplied `owner/name`, if any.
    pub async fn run(
        &self,
        event: &EventPayload,
        repository: Option<&str>,
        config: &RunConfig,
    ) -> RunOutcome {
        enter(RunState::Init);
        let outcome = match resolve_trigger(event, repository, config.profile()) {
            Ok(TriggerResolution::Run(context)) => self.run_for(&context, config).await,
            Ok(TriggerResolution::Skip { reason }) => {
                info!(%reason, "Event does not need a preview");
                RunOutcome::Skipped { reason }
            }
            Err(e) => {
                error!(error = %e, "Trigger could not be resolved");
                RunOutcome::Failed {
                    reasons: vec![e.to_string()],
                }
            }
        };
        enter(RunState::Done);
        outcome
    }

    /// Runs every stage after Init for an already resolved trigger.
    pub async fn run_for(&self, context: &TriggerContext, config: &RunConfig) -> RunOutcome {
        info!(target_issue = %context, profile = %config.profile(), "Starting preview run");

        enter(RunState::Validating);
        let source = Path::new(config.source_directory());
        let source_exists = tokio::fs::metadata(source)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !source_exists {
            let err = ValidationError::SourceDirectoryMissing {
                path: config.source_directory().to_string(),
            };
            return self
                .fail(context, workflow_failure_message(&err.to_string()), err.to_string())
                .await;
        }

        enter(RunState::Archiving);
        let artifact = match self.archiver.create_archive(source).await {
            Ok(artifact) => artifact,
            Err(e) => {
                return self
                    .fail(context, workflow_failure_message(&e.to_string()), e.to_string())
                    .await;
            }
        };

        enter(RunState::Uploading);
        let preview_url = match self.host.upload(&artifact, context).await {
            Ok(url) => url,
            Err(e) => {
                warn!(error = %e, "Upload failed");
                let message = config.profile().upload_failure_message(&e);
                return self.fail(context, message.clone(), message).await;
            }
        };

        enter(RunState::NotifyingSuccess);
        match self
            .comments
            .post_comment(context, &success_message(&preview_url))
            .await
        {
            Ok(()) => RunOutcome::Succeeded { preview_url },
            Err(e) => RunOutcome::Failed {
                reasons: vec![comment_failure(&e)],
            },
        }
    }

    /// Posts `comment` and reports `reason`, adding the comment failure if posting fails.
    async fn fail(&self, context: &TriggerContext, comment: String, reason: String) -> RunOutcome {
        enter(RunState::NotifyingFailure);
        error!(%reason, "Preview run failed");
        let mut reasons = vec![reason];
        if let Err(e) = self.comments.post_comment(context, &comment).await {
            reasons.push(comment_failure(&e));
        }
        RunOutcome::Failed { reasons }
    }
}

fn comment_failure(e: &pipeline::CommentError) -> String {
    error!(error = %e, "Comment could not be posted");
    format!("Failed to post comment: {e}")
}

fn enter(state: RunState) {
    info!(state = %state, "Entering state");
}
