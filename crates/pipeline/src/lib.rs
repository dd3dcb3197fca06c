//! Core domain for the PushPreview action.
//!
//! This crate contains every domain concept, newtype identifier, message text,
//! and error type used across the workspace, plus the port traits the
//! infrastructure crates implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* a preview run needs; infrastructure crates define *how*
//! to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`TriggerNumber`, `RunId`, `Secret`, etc.) |
//! | [`types`] | Shared value types (`TriggerContext`, `ArchiveArtifact`, `RunConfig`) |
//! | [`trigger`] | Event payload model and trigger resolution |
//! | [`profile`] | Trigger profiles and the comment message catalogue |
//! | [`errors`] | One error enum per stage |
//! | [`ports`] | `Archiver`, `PreviewHost`, `CommentSink` |

pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod profile;
pub mod trigger;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::{
    error_chain, ArchiveError, CommentError, ConfigurationError, TriggerResolutionError,
    UploadError, ValidationError,
};
pub use identifiers::{PreviewUrl, RepositoryName, RepositoryOwner, RunId, Secret, TriggerNumber};
pub use ports::{Archiver, CommentSink, PreviewHost};
pub use profile::TriggerProfile;
pub use trigger::{resolve_trigger, EventPayload, TriggerResolution};
pub use types::{ArchiveArtifact, RunConfig, TriggerContext};
