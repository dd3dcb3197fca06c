//! Shared value types for a preview run.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types group
//! several values that travel together between stages. All of them are built
//! once and never mutated.

use std::path::{Path, PathBuf};

use crate::{
    ConfigurationError, RepositoryName, RepositoryOwner, Secret, TriggerNumber, TriggerProfile,
};

// ---------------------------------------------------------------------------
// Trigger context
// ---------------------------------------------------------------------------

/// Which repository and which pull request/issue this run reports back to.
///
/// Resolved once from the event payload (see [`crate::trigger`]) and passed by
/// reference to every stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TriggerContext {
    /// Repository owner login.
    pub owner: RepositoryOwner,
    /// Repository name.
    pub repository: RepositoryName,
    /// Pull request or issue number.
    pub number: TriggerNumber,
}

impl TriggerContext {
    /// Creates a new [`TriggerContext`].
    pub fn new(owner: RepositoryOwner, repository: RepositoryName, number: TriggerNumber) -> Self {
        Self {
            owner,
            repository,
            number,
        }
    }
}

impl std::fmt::Display for TriggerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repository, self.number)
    }
}

// ---------------------------------------------------------------------------
// Archive
// ---------------------------------------------------------------------------

/// A compressed archive written to local disk by an [`crate::Archiver`].
///
/// The file is left in place after the run; CI runners are disposable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveArtifact {
    path: PathBuf,
    entries: usize,
    size_bytes: u64,
}

impl ArchiveArtifact {
    /// Describes an archive that has been fully written to `path`.
    pub fn new(path: impl Into<PathBuf>, entries: usize, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            entries,
            size_bytes,
        }
    }

    /// Location of the archive file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of file and directory entries in the archive.
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Size of the archive file on disk.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Validated inputs for one run.
///
/// Endpoints and the archive location live with the adapters that use them;
/// this type only carries what the orchestrator itself needs.
#[derive(Debug, Clone)]
pub struct RunConfig {
    source_directory: String,
    github_token: Secret,
    pushpreview_token: Secret,
    profile: TriggerProfile,
}

impl RunConfig {
    /// Validates raw inputs, rejecting any that are empty.
    pub fn new(
        source_directory: impl Into<String>,
        github_token: impl Into<String>,
        pushpreview_token: impl Into<String>,
        profile: TriggerProfile,
    ) -> Result<Self, ConfigurationError> {
        let source_directory = source_directory.into();
        if source_directory.trim().is_empty() {
            return Err(ConfigurationError::MissingInput {
                name: "source-directory",
            });
        }
        let github_token = Secret::new(github_token).ok_or(ConfigurationError::MissingInput {
            name: "github-token",
        })?;
        let pushpreview_token =
            Secret::new(pushpreview_token).ok_or(ConfigurationError::MissingInput {
                name: "pushpreview-token",
            })?;

        Ok(Self {
            source_directory,
            github_token,
            pushpreview_token,
            profile,
        })
    }

    /// The directory to archive, exactly as configured.
    pub fn source_directory(&self) -> &str {
        &self.source_directory
    }

    /// Token used to post comments.
    pub fn github_token(&self) -> &Secret {
        &self.github_token
    }

    /// API key for the preview service.
    pub fn pushpreview_token(&self) -> &Secret {
        &self.pushpreview_token
    }

    /// Trigger gating and error-mapping policy.
    pub fn profile(&self) -> TriggerProfile {
        self.profile
    }
}
