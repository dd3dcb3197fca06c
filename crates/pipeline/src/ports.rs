//! Port traits implemented by the infrastructure crates.
//!
//! The orchestrator in `runner` only ever sees these traits, which keeps it
//! testable with in-memory fakes and keeps HTTP and filesystem details out of
//! this crate.
//!
//! | Trait | Implemented by |
//! |-------|----------------|
//! | [`Archiver`] | `archive::ZipArchiver` |
//! | [`PreviewHost`] | `pushpreview::PushPreviewClient` |
//! | [`CommentSink`] | `github::GithubClient` |

use std::path::Path;

use async_trait::async_trait;

use crate::{
    ArchiveArtifact, ArchiveError, CommentError, PreviewUrl, TriggerContext, UploadError,
};

/// Packages a directory into a single archive file.
#[async_trait]
pub trait Archiver: Send + Sync {
    /// Archives the recursive contents of `source`, entry names relative to it.
    ///
    /// The caller has already checked that `source` exists.
    async fn create_archive(&self, source: &Path) -> Result<ArchiveArtifact, ArchiveError>;
}

/// Hosts previews of uploaded archives.
#[async_trait]
pub trait PreviewHost: Send + Sync {
    /// Uploads `artifact` on behalf of `context`, returning the preview link.
    async fn upload(
        &self,
        artifact: &ArchiveArtifact,
        context: &TriggerContext,
    ) -> Result<PreviewUrl, UploadError>;
}

/// Posts comments on the pull request or issue that triggered the run.
#[async_trait]
pub trait CommentSink: Send + Sync {
    /// Creates a new comment with `body` on `context`'s conversation.
    async fn post_comment(&self, context: &TriggerContext, body: &str)
        -> Result<(), CommentError>;
}
