//! PushPreview action GitHub infrastructure adapter.
//!
//! Implements [`pipeline::CommentSink`] over the GitHub REST API and provides
//! the GitHub Actions runner plumbing the CLI needs: loading the event payload,
//! writing step outputs, and formatting workflow commands.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules. Deciding what
//! a comment says, and whether an event should run at all, belongs to the
//! [`pipeline`] crate.

pub mod actions;
pub mod client;

pub use actions::{error_command, load_event_payload, write_step_output};
pub use client::{GithubClient, DEFAULT_API_URL};
