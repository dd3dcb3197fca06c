//! Zip packaging of the preview source directory.
//!
//! Implements [`pipeline::Archiver`] with a deterministic Deflate-9 zip:
//! entries are written in file-name order with a fixed timestamp, so the same
//! directory contents always produce the same archive bytes.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Directory traversal and zip encoding live here. The
//! orchestrator sees only [`pipeline::Archiver`] and
//! [`pipeline::ArchiveArtifact`].

use std::fs::File;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pipeline::{ArchiveArtifact, ArchiveError, Archiver};
use tracing::{debug, info, instrument};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;

/// File name used when the caller does not choose an archive location.
pub const DEFAULT_ARCHIVE_NAME: &str = "pushpreview.zip";

/// Writes zip archives to one fixed destination, overwriting it on every call.
#[derive(Debug, Clone)]
pub struct ZipArchiver {
    destination: PathBuf,
}

impl ZipArchiver {
    /// Creates an archiver writing to `destination`.
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }

    /// Creates an archiver writing [`DEFAULT_ARCHIVE_NAME`] into the system temp directory.
    pub fn in_temp_dir() -> Self {
        Self::new(std::env::temp_dir().join(DEFAULT_ARCHIVE_NAME))
    }

    /// Where archives are written.
    pub fn destination(&self) -> &Path {
        &self.destination
    }
}

#[async_trait]
impl Archiver for ZipArchiver {
    #[instrument(skip(self))]
    async fn create_archive(&self, source: &Path) -> Result<ArchiveArtifact, ArchiveError> {
        let source = source.to_path_buf();
        let destination = self.destination.clone();
        let artifact =
            tokio::task::spawn_blocking(move || package_directory(&source, &destination))
                .await
                .map_err(|e| ArchiveError::Task {
                    message: e.to_string(),
                })??;

        info!(
            archive = %artifact.path().display(),
            entries = artifact.entries(),
            size_bytes = artifact.size_bytes(),
            "Archive written"
        );
        Ok(artifact)
    }
}

/// Packages the recursive contents of `source` into a zip at `destination`.
///
/// Entry names are `/`-separated paths relative to `source`; directories get
/// their own entries with a trailing `/`. If `destination` lies inside
/// `source` it is left out of the archive.
pub fn package_directory(source: &Path, destination: &Path) -> Result<ArchiveArtifact, ArchiveError> {
    let file = File::create(destination).map_err(io_error(format!(
        "Failed to create archive {}",
        destination.display()
    )))?;
    let excluded = destination.canonicalize().ok();

    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated)
        .compression_level(Some(9))
        .last_modified_time(zip::DateTime::default());

    let mut entries = 0usize;
    for entry in WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| ArchiveError::Traversal {
            message: e.to_string(),
        })?;
        let path = entry.path();
        let Some(name) = relative_name(source, path) else {
            continue;
        };

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{name}/"), options)
                .map_err(format_error)?;
        } else {
            if excluded.is_some() && path.canonicalize().ok() == excluded {
                debug!(path = %path.display(), "Skipping archive destination inside source");
                continue;
            }
            zip.start_file(name.clone(), options).map_err(format_error)?;
            let mut input = File::open(path)
                .map_err(io_error(format!("Failed to open {}", path.display())))?;
            std::io::copy(&mut input, &mut zip)
                .map_err(io_error(format!("Failed to compress {}", path.display())))?;
        }
        debug!(entry = %name, "Added archive entry");
        entries += 1;
    }

    zip.finish().map_err(format_error)?;

    let size_bytes = std::fs::metadata(destination)
        .map_err(io_error(format!(
            "Failed to stat archive {}",
            destination.display()
        )))?
        .len();

    Ok(ArchiveArtifact::new(destination, entries, size_bytes))
}

// === Internal helpers ===

fn relative_name(base: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(base).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn io_error(context: String) -> impl FnOnce(std::io::Error) -> ArchiveError {
    move |source| ArchiveError::Io { context, source }
}

fn format_error(e: zip::result::ZipError) -> ArchiveError {
    ArchiveError::Format {
        message: e.to_string(),
    }
}
