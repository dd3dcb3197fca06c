//! Command-line and environment inputs.
//!
//! GitHub Actions passes action inputs as `INPUT_<NAME>` environment variables
//! with the input name upper-cased and hyphens preserved, so every input
//! here can come from either a flag or that variable. Actions also exports
//! declared-but-unset inputs as empty strings; those are treated as absent.

use std::path::PathBuf;

use clap::Parser;
use pipeline::{ConfigurationError, TriggerProfile};

#[derive(Debug, Parser)]
#[command(
    name = "pushpreview",
    version,
    about = "Archive a directory, upload it to PushPreview, and comment the preview URL on the pull request"
)]
pub struct Args {
    /// Directory to archive, relative to the working directory
    #[arg(long, env = "INPUT_SOURCE-DIRECTORY")]
    pub source_directory: Option<String>,

    /// Token used to comment on the pull request or issue
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// PushPreview API key
    #[arg(long, env = "INPUT_PUSHPREVIEW-TOKEN", hide_env_values = true)]
    pub pushpreview_token: Option<String>,

    /// Trigger profile: `lenient` (any PR or issue) or `strict` (pull requests only)
    #[arg(long, env = "INPUT_TRIGGER-PROFILE")]
    pub trigger_profile: Option<String>,

    /// Where to write the archive (defaults to the system temp directory)
    #[arg(long, env = "INPUT_ARCHIVE-PATH")]
    pub archive_path: Option<PathBuf>,

    /// PushPreview upload endpoint (defaults to the public service)
    #[arg(long, env = "INPUT_PUSHPREVIEW-API-URL")]
    pub pushpreview_api_url: Option<String>,

    /// GitHub REST API root (defaults to api.github.com)
    #[arg(long, env = "GITHUB_API_URL")]
    pub github_api_url: Option<String>,

    /// Path of the event payload that triggered the workflow
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    pub event_path: Option<PathBuf>,

    /// Repository in `owner/name` form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repository: Option<String>,

    /// Step output file
    #[arg(long, env = "GITHUB_OUTPUT")]
    pub output_path: Option<PathBuf>,
}

impl Args {
    /// Returns `value` unless it is empty.
    pub fn non_empty(value: Option<String>) -> Option<String> {
        value.filter(|v| !v.trim().is_empty())
    }

    /// Returns the upload endpoint, falling back to the public service.
    pub fn pushpreview_endpoint(&self) -> String {
        Self::non_empty(self.pushpreview_api_url.clone())
            .unwrap_or_else(|| pushpreview::DEFAULT_ENDPOINT.to_string())
    }

    /// Returns the GitHub API root, falling back to api.github.com.
    pub fn github_api_root(&self) -> String {
        Self::non_empty(self.github_api_url.clone())
            .unwrap_or_else(|| github::DEFAULT_API_URL.to_string())
    }

    /// Returns `path` unless it is empty.
    pub fn non_empty_path(path: Option<PathBuf>) -> Option<PathBuf> {
        path.filter(|p| !p.as_os_str().is_empty())
    }
}

/// Parses the `trigger-profile` input; absent or empty selects the default.
///
/// Hyphens, underscores, and case are ignored, so `strict`, `strict-pr` and
/// `StrictPRTrigger` all select [`TriggerProfile::StrictPr`].
pub fn parse_profile(value: Option<&str>) -> Result<TriggerProfile, ConfigurationError> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(TriggerProfile::default());
    };
    let normalised: String = raw
        .chars()
        .filter(|c| *c != '-' && *c != '_')
        .map(|c| c.to_ascii_lowercase())
        .collect();
    match normalised.as_str() {
        "lenient" | "lenientissueorpr" | "lenientissueorprtrigger" => {
            Ok(TriggerProfile::LenientIssueOrPr)
        }
        "strict" | "strictpr" | "strictprtrigger" => Ok(TriggerProfile::StrictPr),
        _ => Err(ConfigurationError::InvalidInput {
            name: "trigger-profile",
            message: format!("expected `lenient` or `strict`, got `{raw}`"),
        }),
    }
}
