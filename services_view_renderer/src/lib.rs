//! # View Renderer Service
//!
//! Produces the read-only display surface for a document.
//!
//! ## Philosophy
//!
//! - **Sanitize, then show**: Every frame body comes out of the sanitization gate
//! - **Immutable frames**: Frames are values; updates replace by revision
//! - **Monotonic revisions**: A new body always carries a greater revision
//! - **Memoized**: Unchanged content returns the previous frame untouched
//!
//! ## Non-Goals
//!
//! This is NOT:
//! - A layout engine
//! - A diffing renderer
//! - A place to configure sanitization

use core_types::{Document, DocumentId};
use html_sanitizer::sanitize_with_report;
use view_types::{DisplayFrame, ShellStyle, ViewId};

/// Cached render keyed by the raw input
#[derive(Debug, Clone)]
struct CacheEntry {
    raw: String,
    frame: DisplayFrame,
}

/// Display surface renderer for one document
#[derive(Debug, Clone)]
pub struct ViewRenderer {
    view_id: ViewId,
    document_id: DocumentId,
    shell: ShellStyle,
    cache: Option<CacheEntry>,
    revision: u64,
}

impl ViewRenderer {
    /// Creates a renderer with the default shell
    pub fn new(document_id: DocumentId) -> Self {
        Self::with_shell(document_id, ShellStyle::default())
    }

    /// Creates a renderer with a configured shell
    pub fn with_shell(document_id: DocumentId, shell: ShellStyle) -> Self {
        Self {
            view_id: ViewId::new(),
            document_id,
            shell,
            cache: None,
            revision: 0,
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub fn shell(&self) -> &ShellStyle {
        &self.shell
    }

    /// Revision of the most recent frame (0 before the first render)
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Most recently rendered frame, if any
    pub fn last_frame(&self) -> Option<&DisplayFrame> {
        self.cache.as_ref().map(|entry| &entry.frame)
    }

    /// Replaces the shell; the next render produces a new frame
    pub fn set_shell(&mut self, shell: ShellStyle) {
        if self.shell != shell {
            self.shell = shell;
            self.invalidate();
        }
    }

    /// Drops the memoized frame so the next render re-sanitizes
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    /// Renders content into a display frame
    ///
    /// Missing content renders as an empty shell.
    pub fn render(&mut self, content: Option<&str>) -> DisplayFrame {
        let raw = content.unwrap_or("");

        if let Some(entry) = &self.cache {
            if entry.raw == raw {
                tracing::trace!(
                    document_id = %self.document_id,
                    revision = entry.frame.revision,
                    "render cache hit"
                );
                return entry.frame.clone();
            }
        }

        let sanitized = sanitize_with_report(raw);
        self.revision += 1;
        tracing::trace!(
            document_id = %self.document_id,
            revision = self.revision,
            stripped = !sanitized.report.is_clean(),
            "render cache miss"
        );

        let frame = DisplayFrame::new(
            self.view_id,
            self.document_id,
            self.revision,
            sanitized.html,
            &self.shell,
        );
        self.cache = Some(CacheEntry {
            raw: raw.to_string(),
            frame: frame.clone(),
        });
        frame
    }

    /// Renders a document's content
    pub fn render_document(&mut self, document: &Document) -> DisplayFrame {
        self.render(document.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use view_types::RenderMode;

    #[test]
    fn test_render_sanitizes() {
        let mut renderer = ViewRenderer::new(DocumentId::new());
        let frame = renderer.render(Some("<img src=x onerror=alert(1)>"));

        assert_eq!(frame.body.as_str(), "<img src=\"x\">");
        assert!(!frame.markup.contains("onerror"));
        assert_eq!(frame.revision, 1);
    }

    #[test]
    fn test_render_missing_content_is_empty() {
        let mut renderer = ViewRenderer::new(DocumentId::new());
        let frame = renderer.render(None);

        assert!(frame.is_empty());
        assert_eq!(
            frame.markup,
            format!("{}</div>", ShellStyle::default().open_tag(RenderMode::Viewing))
        );
    }

    #[test]
    fn test_none_and_empty_share_cache() {
        let mut renderer = ViewRenderer::new(DocumentId::new());
        let first = renderer.render(None);
        let second = renderer.render(Some(""));

        assert_eq!(first, second);
        assert_eq!(renderer.revision(), 1);
    }

    #[test]
    fn test_unchanged_content_returns_identical_frame() {
        let mut renderer = ViewRenderer::new(DocumentId::new());
        let first = renderer.render(Some("<p>Hello</p>"));
        let second = renderer.render(Some("<p>Hello</p>"));

        assert_eq!(first, second);
        assert_eq!(first.fingerprint, second.fingerprint);
        assert_eq!(renderer.revision(), 1);
    }

    #[test]
    fn test_changed_content_advances_revision() {
        let mut renderer = ViewRenderer::new(DocumentId::new());
        let first = renderer.render(Some("<p>Hello</p>"));
        let second = renderer.render(Some("<p>Hello world</p>"));

        assert!(second.is_valid_successor(&first));
        assert_ne!(first.fingerprint, second.fingerprint);
    }

    #[test]
    fn test_raw_change_with_same_sanitized_body_still_advances() {
        let mut renderer = ViewRenderer::new(DocumentId::new());
        let first = renderer.render(Some("<p>x</p>"));
        let second = renderer.render(Some("<p onclick=\"y()\">x</p>"));

        assert_eq!(first.body, second.body);
        assert_eq!(first.fingerprint, second.fingerprint);
        assert!(second.is_newer_than(&first));
    }

    #[test]
    fn test_invalidate_forces_new_frame() {
        let mut renderer = ViewRenderer::new(DocumentId::new());
        let first = renderer.render(Some("<p>a</p>"));
        renderer.invalidate();
        assert!(renderer.last_frame().is_none());

        let second = renderer.render(Some("<p>a</p>"));
        assert_eq!(second.revision, 2);
        assert_eq!(first.body, second.body);
    }

    #[test]
    fn test_set_shell_rewraps() {
        let mut renderer = ViewRenderer::new(DocumentId::new());
        renderer.render(Some("<p>a</p>"));

        renderer.set_shell(ShellStyle::default().with_class_name("compact"));
        let frame = renderer.render(Some("<p>a</p>"));

        assert!(frame.markup.starts_with("<div class=\"compact\""));
        assert_eq!(frame.revision, 2);
    }

    #[test]
    fn test_set_same_shell_keeps_cache() {
        let mut renderer = ViewRenderer::new(DocumentId::new());
        renderer.render(Some("<p>a</p>"));
        renderer.set_shell(ShellStyle::default());

        assert!(renderer.last_frame().is_some());
    }

    #[test]
    fn test_render_document() {
        let doc = Document::new(DocumentId::new(), "<p>Hi</p>");
        let mut renderer = ViewRenderer::new(doc.id);
        let frame = renderer.render_document(&doc);

        assert_eq!(frame.document_id, doc.id);
        assert_eq!(frame.body.as_str(), "<p>Hi</p>");
        assert_eq!(frame.view_id, renderer.view_id());
    }
}
