//! PushPreview API client adapter.
//!
//! Implements [`pipeline::PreviewHost`] over the PushPreview HTTP API: a single
//! authenticated multipart `POST` carrying the archive and the identifiers of
//! the pull request it belongs to.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Request construction, authentication, and response
//! parsing live here. Mapping a failure to comment wording does not; that is
//! [`pipeline::TriggerProfile::upload_failure_message`].
//!
//! ## Wire format
//!
//! | Part | Value |
//! |------|-------|
//! | `pr_identifier` | trigger number |
//! | `organization` | repository owner |
//! | `repository_name` | repository name |
//! | `origin_source` | [`ORIGIN_SOURCE`] |
//! | `file` | archive bytes, `application/zip` |
//!
//! `Authorization: Api-Key <key>`. A 2xx answer carries `{"previewUrl": "..."}`.

use async_trait::async_trait;
use pipeline::{
    error_chain, ArchiveArtifact, PreviewHost, PreviewUrl, Secret, TriggerContext, UploadError,
};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// Production upload endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://app.pushpreview.com/api/previews/";

/// Identifies the CI platform to the preview service.
pub const ORIGIN_SOURCE: &str = "GitHub";

const ARCHIVE_FILE_NAME: &str = "file.zip";

/// Body of a successful upload response.
#[derive(Debug, Deserialize)]
struct PreviewResponse {
    #[serde(rename = "previewUrl", default)]
    preview_url: Option<String>,
}

/// Uploads archives to the PushPreview service.
#[derive(Debug, Clone)]
pub struct PushPreviewClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Secret,
}

impl PushPreviewClient {
    /// Creates a client for [`DEFAULT_ENDPOINT`].
    pub fn new(api_key: Secret) -> Self {
        Self::with_endpoint(api_key, DEFAULT_ENDPOINT)
    }

    /// Creates a client for a custom endpoint (self-hosted service or tests).
    pub fn with_endpoint(api_key: Secret, endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            api_key,
        }
    }

    /// The URL archives are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl PreviewHost for PushPreviewClient {
    #[instrument(skip(self, artifact), fields(archive = %artifact.path().display()))]
    async fn upload(
        &self,
        artifact: &ArchiveArtifact,
        context: &TriggerContext,
    ) -> Result<PreviewUrl, UploadError> {
        let bytes = tokio::fs::read(artifact.path())
            .await
            .map_err(|source| UploadError::ArchiveUnreadable {
                path: artifact.path().to_path_buf(),
                source,
            })?;

        let file = Part::bytes(bytes)
            .file_name(ARCHIVE_FILE_NAME)
            .mime_str("application/zip")
            .map_err(transport_error)?;
        let form = Form::new()
            .text("pr_identifier", context.number.to_string())
            .text("organization", context.owner.to_string())
            .text("repository_name", context.repository.to_string())
            .text("origin_source", ORIGIN_SOURCE)
            .part("file", file);

        let response = self
            .http
            .post(&self.endpoint)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Api-Key {}", self.api_key.expose()),
            )
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "Preview service rejected upload");
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let body: PreviewResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Preview service returned an unreadable body");
            UploadError::MissingPreviewUrl
        })?;
        let url = body
            .preview_url
            .and_then(PreviewUrl::new)
            .ok_or(UploadError::MissingPreviewUrl)?;

        info!(preview_url = %url, endpoint = %self.endpoint, "Preview uploaded");
        Ok(url)
    }
}

fn transport_error(e: reqwest::Error) -> UploadError {
    UploadError::Transport {
        message: error_chain(&e),
    }
}
