//! In-memory reference widget

use crate::change::{ContentChange, SurfaceError};
use crate::surface::{ChangeSink, EditSurface};
use html_sanitizer::entities::escape_text;

/// A scriptable widget holding its document as an HTML string
///
/// Mutations take the sink explicitly and report through it before
/// returning, mirroring a widget's synchronous `onChange`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedSurface {
    html: String,
    emitted: usize,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of change events emitted since creation
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Replaces the whole document
    pub fn set_html(
        &mut self,
        html: impl Into<String>,
        sink: &mut dyn ChangeSink,
    ) -> Result<(), SurfaceError> {
        self.html = html.into();
        self.emit(sink)
    }

    /// Types plain text at the end of the last paragraph
    ///
    /// Starts a new paragraph when the document does not end in one.
    pub fn insert_text(&mut self, text: &str, sink: &mut dyn ChangeSink) -> Result<(), SurfaceError> {
        let mut escaped = String::with_capacity(text.len());
        escape_text(text, &mut escaped);

        match self.html.strip_suffix("</p>") {
            Some(body) => {
                let mut html = String::with_capacity(self.html.len() + escaped.len());
                html.push_str(body);
                html.push_str(&escaped);
                html.push_str("</p>");
                self.html = html;
            }
            None => {
                self.html.push_str("<p>");
                self.html.push_str(&escaped);
                self.html.push_str("</p>");
            }
        }
        self.emit(sink)
    }

    /// Deletes everything
    pub fn clear(&mut self, sink: &mut dyn ChangeSink) -> Result<(), SurfaceError> {
        self.html.clear();
        self.emit(sink)
    }

    fn emit(&mut self, sink: &mut dyn ChangeSink) -> Result<(), SurfaceError> {
        self.emitted += 1;
        tracing::trace!(emitted = self.emitted, len = self.html.len(), "surface change");
        sink.on_change(ContentChange::new(self.html.clone()))
    }
}

impl EditSurface for ScriptedSurface {
    fn initialize(&mut self, content: &str) {
        self.html = content.to_string();
    }

    fn serialize(&self) -> String {
        self.html.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RejectAll;

    impl ChangeSink for RejectAll {
        fn on_change(&mut self, _change: ContentChange) -> Result<(), SurfaceError> {
            Err(SurfaceError::Rejected("read-only".to_string()))
        }
    }

    #[test]
    fn test_initialize_does_not_emit() {
        let mut surface = ScriptedSurface::new();
        surface.initialize("<p>Hello</p>");
        assert_eq!(surface.serialize(), "<p>Hello</p>");
        assert_eq!(surface.emitted(), 0);
    }

    #[test]
    fn test_insert_text_extends_last_paragraph() {
        let mut surface = ScriptedSurface::new();
        let mut changes: Vec<ContentChange> = Vec::new();
        surface.initialize("<p>Hello</p>");

        surface.insert_text(" world", &mut changes).unwrap();

        assert_eq!(surface.serialize(), "<p>Hello world</p>");
        assert_eq!(changes, vec![ContentChange::new("<p>Hello world</p>")]);
    }

    #[test]
    fn test_insert_text_into_empty_document() {
        let mut surface = ScriptedSurface::new();
        let mut changes: Vec<ContentChange> = Vec::new();

        surface.insert_text("a < b", &mut changes).unwrap();

        assert_eq!(surface.serialize(), "<p>a &lt; b</p>");
    }

    #[test]
    fn test_insert_text_after_non_paragraph() {
        let mut surface = ScriptedSurface::new();
        let mut changes: Vec<ContentChange> = Vec::new();
        surface.initialize("<h1>Title</h1>");

        surface.insert_text("body", &mut changes).unwrap();

        assert_eq!(surface.serialize(), "<h1>Title</h1><p>body</p>");
    }

    #[test]
    fn test_every_mutation_emits() {
        let mut surface = ScriptedSurface::new();
        let mut changes: Vec<ContentChange> = Vec::new();

        surface.set_html("<p>a</p>", &mut changes).unwrap();
        surface.insert_text("b", &mut changes).unwrap();
        surface.clear(&mut changes).unwrap();

        assert_eq!(surface.emitted(), 3);
        let html: Vec<_> = changes.iter().map(ContentChange::as_str).collect();
        assert_eq!(html, vec!["<p>a</p>", "<p>ab</p>", ""]);
    }

    #[test]
    fn test_set_html_is_verbatim() {
        let mut surface = ScriptedSurface::new();
        let mut changes: Vec<ContentChange> = Vec::new();

        surface
            .set_html("<img src=x onerror=alert(1)>", &mut changes)
            .unwrap();

        assert_eq!(changes[0].as_str(), "<img src=x onerror=alert(1)>");
    }

    #[test]
    fn test_sink_rejection_propagates() {
        let mut surface = ScriptedSurface::new();
        let result = surface.insert_text("x", &mut RejectAll);
        assert_eq!(result, Err(SurfaceError::Rejected("read-only".to_string())));
    }
}
