//! # Mode Controller Service
//!
//! Owns a document's canonical content and decides which surface shows it.
//!
//! ## Philosophy
//!
//! - **One source of truth**: The controller holds canonical content; widgets
//!   and frames are derived from it
//! - **Switching is free**: Changing mode never transforms or loses content
//! - **Trust the editor, not the store**: Edits are taken verbatim, display
//!   always goes through the gate
//! - **Fire-and-forget persistence**: Every accepted edit is handed to the
//!   sink immediately
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A collaborative editing engine
//! - An undo history
//! - A storage backend
//!
//! ## Design
//!
//! - ModeController: Two-state machine over [`RenderMode`]
//! - PersistenceSink: Collaborator receiving every accepted edit
//! - ControllerSnapshot: Deterministic state for tests

pub mod controller;
pub mod sink;
pub mod snapshot;

pub use controller::{ModeController, Transition};
pub use sink::PersistenceSink;
pub use snapshot::ControllerSnapshot;
pub use view_types::{MountedSurface, RenderMode};

use core_types::DocumentId;
use editor_core::SurfaceError;
use thiserror::Error;

/// Mode controller error types
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModeError {
    #[error("Change received while not editing")]
    NotEditing,

    #[error("Cannot reload while editing (pending edits would be lost)")]
    ReloadWhileEditing,

    #[error("Document mismatch: expected {expected}, got {actual}")]
    DocumentMismatch {
        expected: DocumentId,
        actual: DocumentId,
    },

    #[error("Editor contract violation: {0}")]
    Contract(#[from] SurfaceError),
}
