//! Resolution of the [`TriggerContext`] from a CI event payload.
//!
//! Only the handful of payload fields the action needs are modelled; every
//! other field GitHub sends is ignored by `serde`.

use serde::Deserialize;

use crate::{
    RepositoryName, RepositoryOwner, TriggerContext, TriggerNumber, TriggerProfile,
    TriggerResolutionError,
};

/// The subset of a GitHub webhook event payload read by the action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub pull_request: Option<PullRequestPayload>,
    #[serde(default)]
    pub issue: Option<IssuePayload>,
    #[serde(default)]
    pub repository: Option<RepositoryPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequestPayload {
    #[serde(default)]
    pub number: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct IssuePayload {
    #[serde(default)]
    pub number: Option<u64>,
    /// Present (and non-null) when the issue is the conversation of a pull request.
    #[serde(default)]
    pub pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub owner: Option<OwnerPayload>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OwnerPayload {
    #[serde(default)]
    pub login: Option<String>,
}

/// What the run should do with the event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerResolution {
    /// Build and report a preview for this pull request/issue.
    Run(TriggerContext),
    /// Do nothing and finish successfully.
    Skip {
        /// Human-readable explanation for the log.
        reason: String,
    },
}

/// Resolves the trigger context from `payload`.
///
/// `repository` is the `owner/name` string supplied by the runner (the
/// `GITHUB_REPOSITORY` variable); when absent or malformed the payload's own
/// `repository` object is used instead.
///
/// A `pull_request` object takes precedence over an `issue` object.
pub fn resolve_trigger(
    payload: &EventPayload,
    repository: Option<&str>,
    profile: TriggerProfile,
) -> Result<TriggerResolution, TriggerResolutionError> {
    let number = if let Some(pr) = &payload.pull_request {
        pr.number
            .and_then(TriggerNumber::new)
            .ok_or(TriggerResolutionError::InvalidNumber {
                kind: "pull request",
            })?
    } else if let Some(issue) = &payload.issue {
        let number = issue
            .number
            .and_then(TriggerNumber::new)
            .ok_or(TriggerResolutionError::InvalidNumber { kind: "issue" })?;
        if issue.pull_request.is_none() && !profile.admits_plain_issues() {
            return Ok(TriggerResolution::Skip {
                reason: format!("Issue #{number} is not a pull request; nothing to preview."),
            });
        }
        number
    } else {
        return Err(TriggerResolutionError::NoTrigger);
    };

    let (owner, name) = repository
        .and_then(split_repository)
        .or_else(|| payload_repository(payload))
        .ok_or(TriggerResolutionError::MissingRepository)?;

    Ok(TriggerResolution::Run(TriggerContext::new(owner, name, number)))
}

fn split_repository(full_name: &str) -> Option<(RepositoryOwner, RepositoryName)> {
    let (owner, name) = full_name.trim().split_once('/')?;
    Some((RepositoryOwner::new(owner)?, RepositoryName::new(name)?))
}

fn payload_repository(payload: &EventPayload) -> Option<(RepositoryOwner, RepositoryName)> {
    let repo = payload.repository.as_ref()?;
    let login = repo.owner.as_ref()?.login.clone()?;
    Some((
        RepositoryOwner::new(login)?,
        RepositoryName::new(repo.name.clone()?)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: serde_json::Value) -> EventPayload {
        serde_json::from_value(json).unwrap()
    }

    fn run_number(resolution: TriggerResolution) -> u64 {
        match resolution {
            TriggerResolution::Run(ctx) => ctx.number.as_u64(),
            TriggerResolution::Skip { reason } => panic!("unexpected skip: {reason}"),
        }
    }

    #[test]
    fn pull_request_event_resolves_its_number() {
        let p = payload(serde_json::json!({ "pull_request": { "number": 12, "title": "x" } }));
        let resolution =
            resolve_trigger(&p, Some("acme/docs"), TriggerProfile::StrictPr).unwrap();
        match resolution {
            TriggerResolution::Run(ctx) => assert_eq!(ctx.to_string(), "acme/docs#12"),
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn pull_request_wins_over_issue() {
        let p = payload(serde_json::json!({
            "pull_request": { "number": 3 },
            "issue": { "number": 9 }
        }));
        let resolution =
            resolve_trigger(&p, Some("acme/docs"), TriggerProfile::default()).unwrap();
        assert_eq!(run_number(resolution), 3);
    }

    #[test]
    fn lenient_profile_accepts_plain_issues() {
        let p = payload(serde_json::json!({ "issue": { "number": 5 } }));
        let resolution =
            resolve_trigger(&p, Some("acme/docs"), TriggerProfile::LenientIssueOrPr).unwrap();
        assert_eq!(run_number(resolution), 5);
    }

    #[test]
    fn strict_profile_skips_plain_issues() {
        let p = payload(serde_json::json!({ "issue": { "number": 5, "pull_request": null } }));
        let resolution =
            resolve_trigger(&p, Some("acme/docs"), TriggerProfile::StrictPr).unwrap();
        assert!(matches!(resolution, TriggerResolution::Skip { .. }));
    }

    #[test]
    fn strict_profile_runs_for_pr_flavoured_issues() {
        let p = payload(serde_json::json!({
            "issue": { "number": 8, "pull_request": { "url": "https://api.github.com/x" } }
        }));
        let resolution =
            resolve_trigger(&p, Some("acme/docs"), TriggerProfile::StrictPr).unwrap();
        assert_eq!(run_number(resolution), 8);
    }

    #[test]
    fn empty_payload_has_no_trigger() {
        let err = resolve_trigger(
            &EventPayload::default(),
            Some("acme/docs"),
            TriggerProfile::default(),
        )
        .unwrap_err();
        assert_eq!(err, TriggerResolutionError::NoTrigger);
    }

    #[test]
    fn zero_number_is_rejected() {
        let p = payload(serde_json::json!({ "pull_request": { "number": 0 } }));
        let err = resolve_trigger(&p, Some("acme/docs"), TriggerProfile::default()).unwrap_err();
        assert_eq!(
            err,
            TriggerResolutionError::InvalidNumber {
                kind: "pull request"
            }
        );
    }

    #[test]
    fn repository_falls_back_to_payload() {
        let p = payload(serde_json::json!({
            "pull_request": { "number": 1 },
            "repository": { "name": "site", "owner": { "login": "octo" } }
        }));
        let resolution = resolve_trigger(&p, None, TriggerProfile::default()).unwrap();
        match resolution {
            TriggerResolution::Run(ctx) => assert_eq!(ctx.to_string(), "octo/site#1"),
            other => panic!("expected run, got {other:?}"),
        }
    }

    #[test]
    fn malformed_repository_variable_falls_back_then_fails() {
        let p = payload(serde_json::json!({ "pull_request": { "number": 1 } }));
        let err = resolve_trigger(&p, Some("no-slash"), TriggerProfile::default()).unwrap_err();
        assert_eq!(err, TriggerResolutionError::MissingRepository);
    }
}
