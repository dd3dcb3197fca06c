//! Trigger profiles and the comment message catalogue.
//!
//! Two historical entry points of the action disagreed on which events to act
//! on and how to word upload failures. Both survive as a [`TriggerProfile`]
//! chosen at startup.
//!
//! | Profile | Issue without PR marker | Upload failure wording |
//! |---------|-------------------------|------------------------|
//! | [`TriggerProfile::LenientIssueOrPr`] | runs | per-status table |
//! | [`TriggerProfile::StrictPr`] | skipped | raw error, except HTTP 500 |

use crate::{PreviewUrl, UploadError};

pub const INVALID_API_KEY: &str =
    "🚨 Error: Invalid API key or team not found. Please verify your credentials.";
pub const PREVIEW_LIMIT_REACHED: &str = "🚨 Error: Preview limit reached. Upgrade your plan at pushpreview.com for additional previews and features.";
pub const PREVIEW_TOO_LARGE: &str = "🚨 Error: The preview exceeds the MB limit. Upgrade your plan at pushpreview.com for higher limits and additional features.";
pub const INTERNAL_SERVER_ERROR: &str = "🚨 Error: Internal server error. Please try again later.";
pub const MISSING_PREVIEW_URL: &str =
    "🚨 Error: The preview service did not return a preview URL.";

/// Comment body for a successful upload.
pub fn success_message(url: &PreviewUrl) -> String {
    format!("🎉 Success! Your live preview is now available. Check it out here: {url}")
}

/// Comment body for any failure that has no dedicated wording.
pub fn workflow_failure_message(error: &str) -> String {
    format!("Workflow failed with the following error: {error}")
}

/// Policy deciding which events trigger a preview and how upload failures read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TriggerProfile {
    /// Acts on any pull request or issue number; maps upload failures through
    /// the per-status table.
    #[default]
    LenientIssueOrPr,
    /// Acts only on pull requests (directly, or issues carrying a
    /// `pull_request` marker); reports upload failures with the raw error text
    /// unless the service answered HTTP 500.
    StrictPr,
}

impl TriggerProfile {
    /// Returns `true` if an issue event without a `pull_request` marker should run.
    pub fn admits_plain_issues(self) -> bool {
        matches!(self, Self::LenientIssueOrPr)
    }

    /// Returns the comment body reporting `error`.
    ///
    /// The same text is used as the run's failure reason.
    pub fn upload_failure_message(self, error: &UploadError) -> String {
        if matches!(error, UploadError::MissingPreviewUrl) {
            return MISSING_PREVIEW_URL.to_string();
        }
        match self {
            Self::LenientIssueOrPr => match error.status() {
                Some(401 | 403) => INVALID_API_KEY.to_string(),
                Some(402) => PREVIEW_LIMIT_REACHED.to_string(),
                Some(413) => PREVIEW_TOO_LARGE.to_string(),
                Some(_) => INTERNAL_SERVER_ERROR.to_string(),
                None => workflow_failure_message(&error.to_string()),
            },
            Self::StrictPr => match error.status() {
                Some(500) => INTERNAL_SERVER_ERROR.to_string(),
                _ => workflow_failure_message(&error.to_string()),
            },
        }
    }
}

impl std::fmt::Display for TriggerProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LenientIssueOrPr => f.write_str("lenient"),
            Self::StrictPr => f.write_str("strict"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected(status: u16) -> UploadError {
        UploadError::Rejected {
            status,
            body: String::new(),
        }
    }

    #[test]
    fn lenient_maps_401_and_403_to_the_same_message() {
        let profile = TriggerProfile::LenientIssueOrPr;
        assert_eq!(profile.upload_failure_message(&rejected(401)), INVALID_API_KEY);
        assert_eq!(profile.upload_failure_message(&rejected(403)), INVALID_API_KEY);
    }

    #[test]
    fn lenient_has_distinct_upgrade_prompts() {
        let profile = TriggerProfile::LenientIssueOrPr;
        assert_eq!(
            profile.upload_failure_message(&rejected(402)),
            PREVIEW_LIMIT_REACHED
        );
        assert_eq!(
            profile.upload_failure_message(&rejected(413)),
            PREVIEW_TOO_LARGE
        );
    }

    #[test]
    fn lenient_falls_back_to_internal_error_for_other_statuses() {
        let profile = TriggerProfile::LenientIssueOrPr;
        for status in [400, 404, 500, 502, 503] {
            assert_eq!(
                profile.upload_failure_message(&rejected(status)),
                INTERNAL_SERVER_ERROR,
                "status {status}"
            );
        }
    }

    #[test]
    fn lenient_reports_transport_failures_verbatim() {
        let err = UploadError::Transport {
            message: "connection refused".to_string(),
        };
        assert_eq!(
            TriggerProfile::LenientIssueOrPr.upload_failure_message(&err),
            "Workflow failed with the following error: Request to the preview service failed: connection refused"
        );
    }

    #[test]
    fn strict_only_special_cases_500() {
        let profile = TriggerProfile::StrictPr;
        assert_eq!(
            profile.upload_failure_message(&rejected(500)),
            INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            profile.upload_failure_message(&rejected(401)),
            "Workflow failed with the following error: Request failed with status code 401"
        );
    }

    #[test]
    fn missing_preview_url_reads_the_same_under_both_profiles() {
        for profile in [TriggerProfile::LenientIssueOrPr, TriggerProfile::StrictPr] {
            assert_eq!(
                profile.upload_failure_message(&UploadError::MissingPreviewUrl),
                MISSING_PREVIEW_URL
            );
        }
    }

    #[test]
    fn success_message_embeds_the_url() {
        let url = PreviewUrl::new("https://x.example/p/1").unwrap();
        let message = success_message(&url);
        assert!(message.starts_with("🎉 Success!"));
        assert!(message.ends_with("https://x.example/p/1"));
    }
}
