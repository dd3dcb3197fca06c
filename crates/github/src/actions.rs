//! GitHub Actions runner integration: event payload, step outputs, and
//! workflow commands.
//!
//! The runner hands an action its context through files and environment
//! variables rather than arguments:
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `GITHUB_EVENT_PATH` | JSON webhook payload that triggered the workflow |
//! | `GITHUB_REPOSITORY` | `owner/name` of the repository |
//! | `GITHUB_OUTPUT` | file collecting `name=value` step outputs |

use std::path::Path;

use pipeline::{ConfigurationError, EventPayload};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Reads and parses the event payload at `path`.
pub async fn load_event_payload(path: &Path) -> Result<EventPayload, ConfigurationError> {
    let raw = tokio::fs::read(path)
        .await
        .map_err(|e| ConfigurationError::EventPayload {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    let payload = serde_json::from_slice(&raw).map_err(|e| ConfigurationError::EventPayload {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), bytes = raw.len(), "Loaded event payload");
    Ok(payload)
}

/// Appends a single-line `name=value` step output to the file at `path`.
pub async fn write_step_output(path: &Path, name: &str, value: &str) -> std::io::Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(format!("{name}={value}\n").as_bytes())
        .await?;
    file.flush().await
}

/// Formats `message` as an `::error::` workflow command.
///
/// `%`, CR and LF are percent-escaped so multi-line messages stay one command.
pub fn error_command(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
