//! # View Types
//!
//! This crate defines the frames produced at the edit/view mode boundary.
//!
//! ## Philosophy
//!
//! - **Frames, not DOM handles**: Surfaces are described by immutable values;
//!   the host decides how to commit them
//! - **Monotonic revisions**: A frame with new content always carries a
//!   strictly greater revision
//! - **One shell, two modes**: Both surfaces share the same presentational
//!   container so toggling never shifts layout
//! - **Sanitized by construction**: A [`DisplayFrame`] can only hold
//!   [`SanitizedHtml`]
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A DOM or virtual-DOM implementation
//! - A CSS engine
//! - A persistence format

mod shell;

pub use shell::ShellStyle;

use core_types::DocumentId;
use editor_core::EditSurface;
use html_sanitizer::SanitizedHtml;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a rendered surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewId(Uuid);

impl ViewId {
    /// Creates a new unique view ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a ViewId from an existing UUID
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view:{}", self.0)
    }
}

/// Which surface a document is shown through
///
/// Process-local UI state; never persisted with the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderMode {
    /// The editable surface is mounted
    Editing,
    /// The read-only display surface is mounted
    Viewing,
}

impl RenderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderMode::Editing => "edit",
            RenderMode::Viewing => "view",
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, RenderMode::Editing)
    }

    /// Returns the other mode
    pub fn toggled(&self) -> Self {
        match self {
            RenderMode::Editing => RenderMode::Viewing,
            RenderMode::Viewing => RenderMode::Editing,
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SHA-256 digest of a frame body
///
/// Lets hosts skip committing a frame whose body they already show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ContentFingerprint([u8; 32]);

impl ContentFingerprint {
    /// Fingerprints a string
    pub fn of(content: &str) -> Self {
        let digest = Sha256::digest(content.as_bytes());
        Self(digest.into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for ContentFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..8] {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

/// Read-only display surface
///
/// Immutable snapshot produced by the view renderer. Exposes no mutation API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayFrame {
    /// Surface identifier (stable for the renderer's lifetime)
    pub view_id: ViewId,
    /// Document being displayed
    pub document_id: DocumentId,
    /// Monotonic revision (increases only when the body changes)
    pub revision: u64,
    /// Digest of `body`
    pub fingerprint: ContentFingerprint,
    /// Sanitized document body
    pub body: SanitizedHtml,
    /// `body` wrapped in the presentational shell
    pub markup: String,
}

impl DisplayFrame {
    /// Creates a display frame, wrapping `body` in `shell`
    pub fn new(
        view_id: ViewId,
        document_id: DocumentId,
        revision: u64,
        body: SanitizedHtml,
        shell: &ShellStyle,
    ) -> Self {
        let markup = shell.wrap(RenderMode::Viewing, body.as_str());
        Self {
            view_id,
            document_id,
            revision,
            fingerprint: ContentFingerprint::of(body.as_str()),
            body,
            markup,
        }
    }

    /// Returns true if nothing is displayed inside the shell
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Checks if this frame's revision is newer than another
    pub fn is_newer_than(&self, other: &DisplayFrame) -> bool {
        self.view_id == other.view_id && self.revision > other.revision
    }

    /// Checks if this frame is a valid successor (monotonic increase)
    pub fn is_valid_successor(&self, previous: &DisplayFrame) -> bool {
        self.view_id == previous.view_id && self.revision > previous.revision
    }
}

/// Editable surface
///
/// Carries the canonical content as the widget's controlled value. The
/// content is the raw editor output: the editor is trusted within its own
/// session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditFrame {
    /// Document being edited
    pub document_id: DocumentId,
    /// Canonical content handed to the widget
    pub content: String,
    /// Shared presentational shell
    pub shell: ShellStyle,
}

impl EditFrame {
    pub fn new(document_id: DocumentId, content: impl Into<String>, shell: ShellStyle) -> Self {
        Self {
            document_id,
            content: content.into(),
            shell,
        }
    }

    /// Opening tag of the container the host mounts the widget into
    pub fn container_open_tag(&self) -> String {
        self.shell.open_tag(RenderMode::Editing)
    }

    /// Hands the canonical content to a widget as its controlled value
    pub fn mount_into(&self, surface: &mut dyn EditSurface) {
        surface.initialize(&self.content);
    }
}

/// The surface currently mounted for a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountedSurface {
    /// Display surface with sanitized content
    Viewing(DisplayFrame),
    /// Editable surface with raw canonical content
    Editing(EditFrame),
}

impl MountedSurface {
    pub fn mode(&self) -> RenderMode {
        match self {
            MountedSurface::Viewing(_) => RenderMode::Viewing,
            MountedSurface::Editing(_) => RenderMode::Editing,
        }
    }

    pub fn as_display(&self) -> Option<&DisplayFrame> {
        match self {
            MountedSurface::Viewing(frame) => Some(frame),
            MountedSurface::Editing(_) => None,
        }
    }

    pub fn as_edit(&self) -> Option<&EditFrame> {
        match self {
            MountedSurface::Editing(frame) => Some(frame),
            MountedSurface::Viewing(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_core::ScriptedSurface;
    use html_sanitizer::sanitize;

    #[test]
    fn test_view_id_creation() {
        let id1 = ViewId::new();
        let id2 = ViewId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_view_id_display() {
        let id = ViewId::new();
        assert!(format!("{}", id).starts_with("view:"));
    }

    #[test]
    fn test_render_mode_strings() {
        assert_eq!(RenderMode::Editing.as_str(), "edit");
        assert_eq!(RenderMode::Viewing.as_str(), "view");
        assert_eq!(RenderMode::Viewing.to_string(), "view");
    }

    #[test]
    fn test_render_mode_toggle() {
        assert_eq!(RenderMode::Viewing.toggled(), RenderMode::Editing);
        assert_eq!(RenderMode::Editing.toggled(), RenderMode::Viewing);
        assert!(RenderMode::Editing.is_editing());
        assert!(!RenderMode::Viewing.is_editing());
    }

    #[test]
    fn test_render_mode_serialization() {
        let json = serde_json::to_string(&RenderMode::Editing).unwrap();
        let back: RenderMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RenderMode::Editing);
    }

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(ContentFingerprint::of("<p>a</p>"), ContentFingerprint::of("<p>a</p>"));
        assert_ne!(ContentFingerprint::of("<p>a</p>"), ContentFingerprint::of("<p>b</p>"));
        assert_eq!(ContentFingerprint::of("").to_string(), "e3b0c44298fc1c14");
    }

    #[test]
    fn test_display_frame_wraps_body() {
        let shell = ShellStyle::default();
        let frame = DisplayFrame::new(
            ViewId::new(),
            DocumentId::new(),
            1,
            sanitize("<p>Hi</p>"),
            &shell,
        );

        assert!(frame.markup.starts_with(&shell.open_tag(RenderMode::Viewing)));
        assert!(frame.markup.contains("<p>Hi</p>"));
        assert!(frame.markup.ends_with("</div>"));
        assert!(!frame.is_empty());
    }

    #[test]
    fn test_display_frame_revision_ordering() {
        let shell = ShellStyle::default();
        let view_id = ViewId::new();
        let doc = DocumentId::new();
        let frame1 = DisplayFrame::new(view_id, doc, 1, sanitize("a"), &shell);
        let frame2 = DisplayFrame::new(view_id, doc, 2, sanitize("b"), &shell);

        assert!(frame2.is_newer_than(&frame1));
        assert!(!frame1.is_newer_than(&frame2));
        assert!(frame2.is_valid_successor(&frame1));
        assert!(!frame1.is_valid_successor(&frame2));
    }

    #[test]
    fn test_display_frame_revision_different_views() {
        let shell = ShellStyle::default();
        let doc = DocumentId::new();
        let frame1 = DisplayFrame::new(ViewId::new(), doc, 1, sanitize("a"), &shell);
        let frame2 = DisplayFrame::new(ViewId::new(), doc, 2, sanitize("a"), &shell);

        assert!(!frame2.is_newer_than(&frame1));
        assert!(!frame2.is_valid_successor(&frame1));
    }

    #[test]
    fn test_edit_and_view_share_shell_style() {
        let shell = ShellStyle::default();
        let edit = EditFrame::new(DocumentId::new(), "<p>x</p>", shell.clone());
        let view = shell.open_tag(RenderMode::Viewing);
        let edit_tag = edit.container_open_tag();

        assert_eq!(
            edit_tag.replace("data-mode=\"edit\"", ""),
            view.replace("data-mode=\"view\"", "")
        );
    }

    #[test]
    fn test_edit_frame_mounts_raw_content() {
        let raw = "<p onclick=\"x()\">Hello</p>";
        let frame = EditFrame::new(DocumentId::new(), raw, ShellStyle::default());
        let mut surface = ScriptedSurface::new();

        frame.mount_into(&mut surface);

        assert_eq!(surface.serialize(), raw);
        assert_eq!(surface.emitted(), 0);
    }

    #[test]
    fn test_mounted_surface_accessors() {
        let shell = ShellStyle::default();
        let doc = DocumentId::new();
        let viewing = MountedSurface::Viewing(DisplayFrame::new(
            ViewId::new(),
            doc,
            1,
            sanitize(""),
            &shell,
        ));
        let editing = MountedSurface::Editing(EditFrame::new(doc, "", shell));

        assert_eq!(viewing.mode(), RenderMode::Viewing);
        assert!(viewing.as_display().is_some());
        assert!(viewing.as_edit().is_none());
        assert_eq!(editing.mode(), RenderMode::Editing);
        assert!(editing.as_edit().is_some());
    }

    #[test]
    fn test_display_frame_serialization() {
        let frame = DisplayFrame::new(
            ViewId::new(),
            DocumentId::new(),
            3,
            sanitize("<p>x</p>"),
            &ShellStyle::default(),
        );
        let json = serde_json::to_value(&frame).unwrap();
        assert_eq!(json["revision"], 3);
        assert_eq!(json["body"], "<p>x</p>");
    }
}
