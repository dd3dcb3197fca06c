//! Run states and the terminal outcome of a run.

use pipeline::PreviewUrl;

/// The stages a run moves through, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    Validating,
    Archiving,
    Uploading,
    NotifyingSuccess,
    NotifyingFailure,
    Done,
}

impl std::fmt::Display for RunState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Validating => "validating",
            Self::Archiving => "archiving",
            Self::Uploading => "uploading",
            Self::NotifyingSuccess => "notifying_success",
            Self::NotifyingFailure => "notifying_failure",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// How a run ended; drives the process exit status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The preview was uploaded and announced.
    Succeeded {
        /// Link posted in the success comment.
        preview_url: PreviewUrl,
    },
    /// The event did not call for a preview.
    Skipped {
        /// Why nothing was done.
        reason: String,
    },
    /// At least one stage failed.
    Failed {
        /// Human-readable reasons in the order they occurred.
        reasons: Vec<String>,
    },
}

impl RunOutcome {
    /// Returns `true` if the CI step should be marked as failed.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Failure reasons, empty unless the run failed.
    pub fn failure_reasons(&self) -> &[String] {
        match self {
            Self::Failed { reasons } => reasons,
            _ => &[],
        }
    }
}
