//! Issue comment client for the GitHub REST API.

use async_trait::async_trait;
use pipeline::{error_chain, CommentError, CommentSink, Secret, TriggerContext};
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use serde::Serialize;
use tracing::{info, instrument, warn};

/// Public GitHub API root. GitHub Enterprise runners expose theirs as `GITHUB_API_URL`.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const API_VERSION: &str = "2022-11-28";
const USER_AGENT_VALUE: &str = concat!("pushpreview-action/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
struct CreateComment<'a> {
    body: &'a str,
}

/// Posts comments with a repository-scoped token.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: String,
    token: Secret,
}

impl GithubClient {
    /// Creates a client for [`DEFAULT_API_URL`].
    pub fn new(token: Secret) -> Self {
        Self::with_api_url(token, DEFAULT_API_URL)
    }

    /// Creates a client for a custom API root. A trailing `/` is ignored.
    pub fn with_api_url(token: Secret, api_url: impl Into<String>) -> Self {
        let api_url = api_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            api_url,
            token,
        }
    }

    fn comments_url(&self, context: &TriggerContext) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}/comments",
            self.api_url, context.owner, context.repository, context.number
        )
    }
}

#[async_trait]
impl CommentSink for GithubClient {
    #[instrument(skip(self, body), fields(issue = %context))]
    async fn post_comment(
        &self,
        context: &TriggerContext,
        body: &str,
    ) -> Result<(), CommentError> {
        let response = self
            .http
            .post(self.comments_url(context))
            .header(AUTHORIZATION, format!("Bearer {}", self.token.expose()))
            .header(ACCEPT, "application/vnd.github+json")
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&CreateComment { body })
            .send()
            .await
            .map_err(|e| CommentError::Transport {
                message: error_chain(&e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %body, "GitHub rejected comment");
            return Err(CommentError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        info!("Comment posted");
        Ok(())
    }
}
