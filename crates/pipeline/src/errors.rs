//! Error types for every stage of a preview run.
//!
//! Each stage owns one error enum. The orchestrator in the `runner` crate
//! decides, per error type, whether a comment can be posted and what it says;
//! the [`crate::profile`] module owns the upload-specific message mapping.
//!
//! | Error | Stage | Comment posted |
//! |-------|-------|----------------|
//! | [`ConfigurationError`] | startup | no |
//! | [`TriggerResolutionError`] | Init | no |
//! | [`ValidationError`] | Validating | yes |
//! | [`ArchiveError`] | Archiving | yes |
//! | [`UploadError`] | Uploading | yes |
//! | [`CommentError`] | Notifying | no (it *is* the comment) |

use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Startup
// ---------------------------------------------------------------------------

/// A required input is missing or the run context could not be loaded.
///
/// Produced before any stage runs; the run fails without commenting.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// A required input was not supplied or is empty.
    #[error("Input required and not supplied: {name}")]
    MissingInput {
        /// Action input name (e.g. `"github-token"`).
        name: &'static str,
    },

    /// The event payload file could not be read or parsed.
    #[error("Failed to load event payload from {path}: {message}")]
    EventPayload {
        /// Path taken from `GITHUB_EVENT_PATH`.
        path: PathBuf,
        /// Description of the read or parse failure.
        message: String,
    },

    /// An input value was present but malformed.
    #[error("Invalid value for {name}: {message}")]
    InvalidInput {
        /// Action input or environment variable name.
        name: &'static str,
        /// Description of the problem.
        message: String,
    },
}

/// No pull request or issue number could be derived from the event.
///
/// There is nothing to comment on, so the run fails silently apart from the
/// failure signal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TriggerResolutionError {
    /// The payload carries neither a `pull_request` nor an `issue` object.
    #[error("No pull request or issue found in the payload.")]
    NoTrigger,

    /// The payload object exists but its `number` is absent or zero.
    #[error("The {kind} in the payload has no valid number.")]
    InvalidNumber {
        /// `"pull request"` or `"issue"`.
        kind: &'static str,
    },

    /// Neither `GITHUB_REPOSITORY` nor the payload names the repository.
    #[error("The repository owner and name could not be determined.")]
    MissingRepository,
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// A precondition checked before archiving failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The configured source directory does not exist.
    #[error("The source directory \"{path}\" does not exist.")]
    SourceDirectoryMissing {
        /// The path exactly as configured.
        path: String,
    },
}

/// Packaging the source directory failed.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// A filesystem operation failed.
    #[error("{context}: {source}")]
    Io {
        /// What was being done (e.g. `"Failed to create archive /tmp/p.zip"`).
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Walking the source tree failed.
    #[error("Failed to traverse source directory: {message}")]
    Traversal {
        /// Description from the directory walker.
        message: String,
    },

    /// The archive writer rejected an entry or could not finish.
    #[error("Failed to write archive: {message}")]
    Format {
        /// Description from the archive writer.
        message: String,
    },

    /// The background packaging task panicked or was cancelled.
    #[error("Archive task did not complete: {message}")]
    Task {
        /// Description of the join failure.
        message: String,
    },
}

/// The preview service rejected the upload or could not be reached.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The service answered with a non-2xx status.
    #[error("Request failed with status code {status}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, kept for logging only.
        body: String,
    },

    /// The request never produced a response (DNS, TLS, connection reset).
    #[error("Request to the preview service failed: {message}")]
    Transport {
        /// Description from the HTTP client.
        message: String,
    },

    /// The archive produced by the previous stage could not be read.
    #[error("Failed to read archive {path}: {source}")]
    ArchiveUnreadable {
        /// Archive path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The service answered 2xx but without a usable `previewUrl`.
    #[error("The preview service did not return a preview URL.")]
    MissingPreviewUrl,
}

impl UploadError {
    /// Returns the HTTP status code when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Posting a comment on the pull request or issue failed.
#[derive(Debug, Error)]
pub enum CommentError {
    /// The repository API answered with a non-2xx status.
    #[error("GitHub API responded with status {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body (GitHub returns a JSON `message`).
        body: String,
    },

    /// The request never produced a response.
    #[error("Request to the GitHub API failed: {message}")]
    Transport {
        /// Description from the HTTP client.
        message: String,
    },
}

/// Renders `err` followed by each `source()` in turn, separated by `": "`.
///
/// HTTP client errors keep the useful part ("connection refused", a TLS
/// failure) in their sources. A source whose text already appears in the
/// rendered message is skipped.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
