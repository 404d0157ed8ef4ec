//! End-to-end scenarios across the gate, renderer and controller

use contract_tests::test_helpers::{assert_inert, init_tracing, RecordingPersistence};
use core_types::{Document, DocumentId};
use editor_core::{EditSurface, ScriptedSurface, SurfaceError};
use proptest::prelude::*;
use serde_json::json;
use services_mode_controller::{ModeController, ModeError, MountedSurface, RenderMode};
use services_settings::RenderSettings;
use services_view_renderer::ViewRenderer;
use view_types::{DisplayFrame, ShellStyle};

fn viewing(content: &str) -> ModeController<RecordingPersistence> {
    let doc = Document::new(DocumentId::new(), content);
    ModeController::new(&doc, RenderMode::Viewing, RecordingPersistence::new())
}

fn display(ctrl: &mut ModeController<RecordingPersistence>) -> DisplayFrame {
    match ctrl.render() {
        MountedSurface::Viewing(frame) => frame,
        MountedSurface::Editing(_) => panic!("expected display surface"),
    }
}

fn mount(ctrl: &mut ModeController<RecordingPersistence>) -> ScriptedSurface {
    let mut surface = ScriptedSurface::new();
    match ctrl.render() {
        MountedSurface::Editing(frame) => frame.mount_into(&mut surface),
        MountedSurface::Viewing(_) => panic!("expected edit surface"),
    }
    surface
}

#[test]
fn test_mode_toggle_preserves_edits() {
    init_tracing();
    let mut ctrl = viewing("<p>Hello</p>");
    assert_eq!(display(&mut ctrl).body.as_str(), "<p>Hello</p>");

    ctrl.begin_editing();
    let mut surface = mount(&mut ctrl);
    assert_eq!(surface.serialize(), "<p>Hello</p>");
    surface.insert_text(" world", &mut ctrl).unwrap();
    assert_eq!(ctrl.persistence().last(), Some("<p>Hello world</p>"));

    ctrl.finish_editing();
    let frame = display(&mut ctrl);
    assert_eq!(frame.body.as_str(), "<p>Hello world</p>");
    assert!(frame.markup.contains("<p>Hello world</p>"));
}

#[test]
fn test_injection_rendered_inert() {
    init_tracing();
    let mut ctrl = viewing("<img src=x onerror=alert(1)>");

    let frame = display(&mut ctrl);

    assert_eq!(frame.body.as_str(), "<img src=\"x\">");
    assert_inert(&frame.markup);
    // Stored content is untouched by display
    assert_eq!(ctrl.content(), "<img src=x onerror=alert(1)>");
}

#[test]
fn test_empty_content_renders_empty_shell() {
    init_tracing();
    let shell_only = format!(
        "{}</div>",
        ShellStyle::default().open_tag(RenderMode::Viewing)
    );

    let doc = Document::without_content(DocumentId::new());
    let mut missing = ModeController::new(&doc, RenderMode::Viewing, RecordingPersistence::new());
    let mut empty = viewing("");

    assert_eq!(display(&mut missing).markup, shell_only);
    assert_eq!(display(&mut empty).markup, shell_only);
}

#[test]
fn test_edit_surface_for_missing_content_is_empty() {
    let doc = Document::without_content(DocumentId::new());
    let mut ctrl = ModeController::new(&doc, RenderMode::Editing, RecordingPersistence::new());

    let surface = mount(&mut ctrl);

    assert_eq!(surface.serialize(), "");
}

#[test]
fn test_unchanged_content_rerender_is_identical() {
    init_tracing();
    let mut renderer = ViewRenderer::new(DocumentId::new());
    let first = renderer.render(Some("<p>same</p>"));
    let second = renderer.render(Some("<p>same</p>"));

    assert_eq!(first, second);
    assert_eq!(first.revision, second.revision);

    let mut ctrl = viewing("<p>same</p>");
    let first = display(&mut ctrl);
    ctrl.begin_editing();
    ctrl.finish_editing();
    let second = display(&mut ctrl);
    assert_eq!(first, second);
}

#[test]
fn test_non_string_change_rejected() {
    init_tracing();
    let doc = Document::new(DocumentId::new(), "<p>keep</p>");
    let mut ctrl = ModeController::new(&doc, RenderMode::Editing, RecordingPersistence::new());

    for payload in [json!(null), json!(7), json!({"ops": []}), json!(["<p>x</p>"])] {
        let result = ctrl.on_raw_change(payload);
        assert!(matches!(
            result,
            Err(ModeError::Contract(SurfaceError::NonStringContent { .. }))
        ));
    }

    assert_eq!(ctrl.content(), "<p>keep</p>");
    assert_eq!(ctrl.change_count(), 0);
    assert!(ctrl.persistence().writes.is_empty());
}

#[test]
fn test_edit_and_view_shells_match() {
    let settings =
        RenderSettings::new().with_shell(ShellStyle::default().with_class_name("doc"));
    let doc = Document::new(DocumentId::new(), "<p>x</p>");
    let mut ctrl = ModeController::with_settings(
        &doc,
        RenderMode::Viewing,
        &settings,
        RecordingPersistence::new(),
    );

    let view_markup = display(&mut ctrl).markup;
    ctrl.begin_editing();
    let edit_tag = match ctrl.render() {
        MountedSurface::Editing(frame) => frame.container_open_tag(),
        MountedSurface::Viewing(_) => panic!("expected edit surface"),
    };

    let view_tag = edit_tag.replace("data-mode=\"edit\"", "data-mode=\"view\"");
    assert!(view_markup.starts_with(&view_tag));
    assert!(edit_tag.starts_with("<div class=\"doc\""));
}

#[test]
fn test_persistence_receives_raw_editor_output() {
    init_tracing();
    let doc = Document::new(DocumentId::new(), "");
    let mut ctrl = ModeController::new(&doc, RenderMode::Editing, RecordingPersistence::new());
    let mut surface = mount(&mut ctrl);

    surface
        .set_html("<p onclick=\"x()\">raw</p>", &mut ctrl)
        .unwrap();

    assert_eq!(
        ctrl.persistence().writes,
        vec![(doc.id, "<p onclick=\"x()\">raw</p>".to_string())]
    );
    ctrl.finish_editing();
    assert_eq!(display(&mut ctrl).body.as_str(), "<p>raw</p>");
}

#[test]
fn test_sanitize_on_load_setting() {
    let doc = Document::new(DocumentId::new(), "<p onclick=\"x()\">a</p>");
    let settings = RenderSettings::new().with_sanitize_on_load(true);
    let mut ctrl = ModeController::with_settings(
        &doc,
        RenderMode::Editing,
        &settings,
        RecordingPersistence::new(),
    );

    let surface = mount(&mut ctrl);

    assert_eq!(surface.serialize(), "<p>a</p>");
}

#[test]
fn test_reload_while_editing_keeps_pending_edits() {
    init_tracing();
    let doc = Document::new(DocumentId::new(), "<p>a</p>");
    let mut ctrl = ModeController::new(&doc, RenderMode::Editing, RecordingPersistence::new());
    let mut surface = mount(&mut ctrl);
    surface.insert_text("b", &mut ctrl).unwrap();

    let stale = Document::new(doc.id, "<p>a</p>");
    assert_eq!(ctrl.reload(&stale), Err(ModeError::ReloadWhileEditing));
    assert_eq!(ctrl.content(), "<p>ab</p>");
}

proptest! {
    #[test]
    fn prop_display_is_always_inert(content in ".{0,200}") {
        let mut ctrl = viewing(&content);
        let frame = display(&mut ctrl);
        assert_inert(&frame.markup);
        prop_assert_eq!(ctrl.content(), content.as_str());
    }

    #[test]
    fn prop_edit_surface_gets_raw_content(content in ".{0,200}") {
        let doc = Document::new(DocumentId::new(), content.clone());
        let mut ctrl =
            ModeController::new(&doc, RenderMode::Editing, RecordingPersistence::new());
        let surface = mount(&mut ctrl);
        prop_assert_eq!(surface.serialize(), content);
    }
}
