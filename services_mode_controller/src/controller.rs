//! Mode state machine

use crate::sink::PersistenceSink;
use crate::snapshot::ControllerSnapshot;
use crate::ModeError;
use core_types::{Document, DocumentId};
use editor_core::{ChangeSink, ContentChange, SurfaceError};
use html_sanitizer::sanitize_to_string;
use serde_json::Value;
use services_settings::RenderSettings;
use services_view_renderer::ViewRenderer;
use view_types::{EditFrame, MountedSurface, RenderMode, ShellStyle};

/// Result of a mode request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The controller moved between modes
    Entered { from: RenderMode, to: RenderMode },
    /// The requested mode was already active
    Unchanged(RenderMode),
}

impl Transition {
    pub fn changed(&self) -> bool {
        matches!(self, Transition::Entered { .. })
    }
}

/// Canonical-content owner for one document
pub struct ModeController<P: PersistenceSink> {
    document_id: DocumentId,
    mode: RenderMode,
    content: String,
    change_count: u64,
    sanitize_on_load: bool,
    renderer: ViewRenderer,
    persistence: P,
}

impl<P: PersistenceSink> ModeController<P> {
    /// Creates a controller with default settings
    pub fn new(document: &Document, initial_mode: RenderMode, persistence: P) -> Self {
        Self::with_settings(document, initial_mode, &RenderSettings::default(), persistence)
    }

    /// Creates a controller using the given settings
    pub fn with_settings(
        document: &Document,
        initial_mode: RenderMode,
        settings: &RenderSettings,
        persistence: P,
    ) -> Self {
        let content = load_content(document, settings.sanitize_on_load);
        tracing::debug!(
            document_id = %document.id,
            mode = initial_mode.as_str(),
            "controller created"
        );

        Self {
            document_id: document.id,
            mode: initial_mode,
            content,
            change_count: 0,
            sanitize_on_load: settings.sanitize_on_load,
            renderer: ViewRenderer::with_shell(document.id, settings.shell.clone()),
            persistence,
        }
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Canonical content
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn change_count(&self) -> u64 {
        self.change_count
    }

    pub fn shell(&self) -> &ShellStyle {
        self.renderer.shell()
    }

    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    pub fn persistence_mut(&mut self) -> &mut P {
        &mut self.persistence
    }

    /// Applies new settings; takes effect on the next render or reload
    pub fn apply_settings(&mut self, settings: &RenderSettings) {
        self.sanitize_on_load = settings.sanitize_on_load;
        self.renderer.set_shell(settings.shell.clone());
    }

    /// Switches to `mode`
    ///
    /// Requesting the active mode is a no-op, not an error.
    pub fn request_mode(&mut self, mode: RenderMode) -> Transition {
        if self.mode == mode {
            tracing::trace!(document_id = %self.document_id, mode = mode.as_str(), "mode unchanged");
            return Transition::Unchanged(mode);
        }

        let from = self.mode;
        self.mode = mode;
        tracing::info!(
            document_id = %self.document_id,
            from = from.as_str(),
            to = mode.as_str(),
            "mode transition"
        );
        Transition::Entered { from, to: mode }
    }

    /// Viewing to Editing
    pub fn begin_editing(&mut self) -> Transition {
        self.request_mode(RenderMode::Editing)
    }

    /// Editing to Viewing
    pub fn finish_editing(&mut self) -> Transition {
        self.request_mode(RenderMode::Viewing)
    }

    /// Accepts an edit from the mounted widget
    ///
    /// The change becomes canonical content verbatim and is forwarded to
    /// persistence.
    pub fn apply_change(&mut self, change: ContentChange) -> Result<(), ModeError> {
        if !self.mode.is_editing() {
            tracing::warn!(
                document_id = %self.document_id,
                "change event while viewing; no editor is mounted"
            );
            return Err(ModeError::NotEditing);
        }

        self.content = change.into_string();
        self.change_count += 1;
        self.persistence.persist(self.document_id, &self.content);
        Ok(())
    }

    /// Accepts an edit from a dynamically-typed widget bridge
    ///
    /// Non-string payloads are rejected and leave canonical content as it was.
    pub fn on_raw_change(&mut self, value: Value) -> Result<(), ModeError> {
        let change = ContentChange::from_value(value).map_err(|err| {
            tracing::warn!(
                document_id = %self.document_id,
                error = %err,
                "editor contract violation"
            );
            ModeError::Contract(err)
        })?;
        self.apply_change(change)
    }

    /// Produces the surface for the current mode
    pub fn render(&mut self) -> MountedSurface {
        match self.mode {
            RenderMode::Viewing => {
                MountedSurface::Viewing(self.renderer.render(Some(self.content.as_str())))
            }
            RenderMode::Editing => MountedSurface::Editing(EditFrame::new(
                self.document_id,
                self.content.clone(),
                self.renderer.shell().clone(),
            )),
        }
    }

    /// Replaces canonical content with a freshly loaded document
    ///
    /// Refused while editing so pending edits are never overwritten.
    pub fn reload(&mut self, document: &Document) -> Result<(), ModeError> {
        if document.id != self.document_id {
            return Err(ModeError::DocumentMismatch {
                expected: self.document_id,
                actual: document.id,
            });
        }

        if self.mode.is_editing() {
            tracing::warn!(document_id = %self.document_id, "reload refused while editing");
            return Err(ModeError::ReloadWhileEditing);
        }

        self.content = load_content(document, self.sanitize_on_load);
        tracing::debug!(document_id = %self.document_id, "content reloaded");
        Ok(())
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            document_id: self.document_id,
            mode: self.mode,
            content: self.content.clone(),
            change_count: self.change_count,
        }
    }
}

impl<P: PersistenceSink> ChangeSink for ModeController<P> {
    fn on_change(&mut self, change: ContentChange) -> Result<(), SurfaceError> {
        self.apply_change(change).map_err(|err| match err {
            ModeError::Contract(inner) => inner,
            other => SurfaceError::Rejected(other.to_string()),
        })
    }
}

fn load_content(document: &Document, sanitize: bool) -> String {
    if sanitize {
        sanitize_to_string(document.content_or_empty())
    } else {
        document.content_or_empty().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Default)]
    struct Recorder {
        writes: Vec<(DocumentId, String)>,
    }

    impl PersistenceSink for Recorder {
        fn persist(&mut self, document_id: DocumentId, content: &str) {
            self.writes.push((document_id, content.to_string()));
        }
    }

    fn controller(content: &str, mode: RenderMode) -> ModeController<Recorder> {
        let doc = Document::new(DocumentId::new(), content);
        ModeController::new(&doc, mode, Recorder::default())
    }

    #[test]
    fn test_initial_state() {
        let ctrl = controller("<p>Hello</p>", RenderMode::Viewing);
        assert_eq!(ctrl.mode(), RenderMode::Viewing);
        assert_eq!(ctrl.content(), "<p>Hello</p>");
        assert_eq!(ctrl.change_count(), 0);
    }

    #[test]
    fn test_missing_content_is_empty() {
        let doc = Document::without_content(DocumentId::new());
        let ctrl = ModeController::new(&doc, RenderMode::Viewing, Recorder::default());
        assert_eq!(ctrl.content(), "");
    }

    #[test]
    fn test_transitions() {
        let mut ctrl = controller("", RenderMode::Viewing);

        assert_eq!(
            ctrl.begin_editing(),
            Transition::Entered {
                from: RenderMode::Viewing,
                to: RenderMode::Editing
            }
        );
        assert_eq!(ctrl.mode(), RenderMode::Editing);

        assert!(ctrl.finish_editing().changed());
        assert_eq!(ctrl.mode(), RenderMode::Viewing);
    }

    #[test]
    fn test_requesting_current_mode_is_noop() {
        let mut ctrl = controller("<p>a</p>", RenderMode::Editing);
        let before = ctrl.snapshot();

        assert_eq!(
            ctrl.request_mode(RenderMode::Editing),
            Transition::Unchanged(RenderMode::Editing)
        );
        assert_eq!(ctrl.snapshot(), before);
    }

    #[test]
    fn test_switching_never_mutates_content() {
        let raw = "<p onclick=\"x()\">raw</p>";
        let mut ctrl = controller(raw, RenderMode::Viewing);

        ctrl.begin_editing();
        ctrl.finish_editing();
        ctrl.render();
        ctrl.begin_editing();

        assert_eq!(ctrl.content(), raw);
    }

    #[test]
    fn test_change_while_editing_persists() {
        let mut ctrl = controller("<p>Hello</p>", RenderMode::Editing);

        ctrl.apply_change(ContentChange::new("<p>Hello world</p>"))
            .unwrap();

        assert_eq!(ctrl.content(), "<p>Hello world</p>");
        assert_eq!(ctrl.change_count(), 1);
        assert_eq!(
            ctrl.persistence().writes,
            vec![(ctrl.document_id(), "<p>Hello world</p>".to_string())]
        );
    }

    #[test]
    fn test_change_while_viewing_rejected() {
        let mut ctrl = controller("<p>Hello</p>", RenderMode::Viewing);

        let result = ctrl.apply_change(ContentChange::new("<p>x</p>"));

        assert_eq!(result, Err(ModeError::NotEditing));
        assert_eq!(ctrl.content(), "<p>Hello</p>");
        assert!(ctrl.persistence().writes.is_empty());
    }

    #[test]
    fn test_change_sink_maps_errors() {
        let mut ctrl = controller("", RenderMode::Viewing);

        let result = ctrl.on_change(ContentChange::new("<p>x</p>"));

        assert_eq!(
            result,
            Err(SurfaceError::Rejected(
                "Change received while not editing".to_string()
            ))
        );
    }

    #[test]
    fn test_raw_change_rejects_non_strings() {
        let mut ctrl = controller("<p>Hello</p>", RenderMode::Editing);

        let result = ctrl.on_raw_change(json!(null));

        assert_eq!(
            result,
            Err(ModeError::Contract(SurfaceError::NonStringContent {
                found: "null"
            }))
        );
        assert_eq!(ctrl.content(), "<p>Hello</p>");
        assert_eq!(ctrl.change_count(), 0);
        assert!(ctrl.persistence().writes.is_empty());
    }

    #[test]
    fn test_raw_change_accepts_strings() {
        let mut ctrl = controller("", RenderMode::Editing);
        ctrl.on_raw_change(json!("<p>typed</p>")).unwrap();
        assert_eq!(ctrl.content(), "<p>typed</p>");
    }

    #[test]
    fn test_render_viewing_is_sanitized() {
        let mut ctrl = controller("<img src=x onerror=alert(1)>", RenderMode::Viewing);

        let surface = ctrl.render();
        let frame = surface.as_display().unwrap();

        assert_eq!(frame.body.as_str(), "<img src=\"x\">");
        assert_eq!(frame.document_id, ctrl.document_id());
    }

    #[test]
    fn test_render_editing_is_raw() {
        let raw = "<img src=x onerror=alert(1)>";
        let mut ctrl = controller(raw, RenderMode::Editing);

        let surface = ctrl.render();
        let frame = surface.as_edit().unwrap();

        assert_eq!(frame.content, raw);
        assert_eq!(&frame.shell, ctrl.shell());
    }

    #[test]
    fn test_reload_replaces_content_while_viewing() {
        let mut ctrl = controller("<p>old</p>", RenderMode::Viewing);
        let fresh = Document::new(ctrl.document_id(), "<p>new</p>");

        ctrl.reload(&fresh).unwrap();

        assert_eq!(ctrl.content(), "<p>new</p>");
        assert!(ctrl.persistence().writes.is_empty());
    }

    #[test]
    fn test_reload_refused_while_editing() {
        let mut ctrl = controller("<p>old</p>", RenderMode::Editing);
        ctrl.apply_change(ContentChange::new("<p>pending</p>"))
            .unwrap();
        let fresh = Document::new(ctrl.document_id(), "<p>server</p>");

        assert_eq!(ctrl.reload(&fresh), Err(ModeError::ReloadWhileEditing));
        assert_eq!(ctrl.content(), "<p>pending</p>");
    }

    #[test]
    fn test_reload_rejects_other_document() {
        let mut ctrl = controller("<p>a</p>", RenderMode::Viewing);
        let other = Document::new(DocumentId::new(), "<p>b</p>");

        assert!(matches!(
            ctrl.reload(&other),
            Err(ModeError::DocumentMismatch { .. })
        ));
        assert_eq!(ctrl.content(), "<p>a</p>");
    }

    #[test]
    fn test_sanitize_on_load() {
        let doc = Document::new(
            DocumentId::new(),
            "<p onclick=\"x()\">a</p><script>b</script>",
        );
        let settings = RenderSettings::new().with_sanitize_on_load(true);
        let mut ctrl =
            ModeController::with_settings(&doc, RenderMode::Viewing, &settings, Recorder::default());

        assert_eq!(ctrl.content(), "<p>a</p>");

        let fresh = Document::new(doc.id, "<a href=\"javascript:x\">l</a>");
        ctrl.reload(&fresh).unwrap();
        assert_eq!(ctrl.content(), "<a>l</a>");
    }

    #[test]
    fn test_apply_settings_changes_shell() {
        let mut ctrl = controller("<p>a</p>", RenderMode::Viewing);
        ctrl.render();

        let settings =
            RenderSettings::new().with_shell(ShellStyle::default().with_class_name("compact"));
        ctrl.apply_settings(&settings);

        let surface = ctrl.render();
        assert!(surface
            .as_display()
            .unwrap()
            .markup
            .starts_with("<div class=\"compact\""));
    }

    #[test]
    fn test_closure_persistence() {
        let mut saved = Vec::new();
        {
            let doc = Document::new(DocumentId::new(), "");
            let sink = |_id: DocumentId, html: &str| saved.push(html.to_string());
            let mut ctrl = ModeController::new(&doc, RenderMode::Editing, sink);
            ctrl.apply_change(ContentChange::new("<p>1</p>")).unwrap();
            ctrl.apply_change(ContentChange::new("<p>2</p>")).unwrap();
        }
        assert_eq!(saved, vec!["<p>1</p>".to_string(), "<p>2</p>".to_string()]);
    }
}
