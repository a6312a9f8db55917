//! Widget marking utilities: tagging view elements as widgets, labels and
//! nested-editable regions.

use crate::highlight::{default_highlight_handling, set_highlight_handling};
use penmark_core::view::{
    EditableStateChange, HighlightHandling, PropertyValue, RenderingEngine, ViewDocument, ViewId,
    ViewWriter,
};
use std::rc::Rc;

/// Class carried by every widget element.
pub const WIDGET_CLASS_NAME: &str = "pm-widget";
/// Class carried by widgets covered by the current selection.
pub const WIDGET_SELECTED_CLASS_NAME: &str = "pm-widget_selected";
/// Class carried by every editable region.
pub const EDITABLE_CLASS_NAME: &str = "pm-editor__editable";
/// Class carried by editable regions nested inside widgets.
pub const NESTED_EDITABLE_CLASS_NAME: &str = "pm-editor__nested-editable";
/// Class toggled on a nested editable while it has focus.
pub const NESTED_EDITABLE_FOCUSED_CLASS_NAME: &str = "pm-editor__nested-editable_focused";
/// Class of the decorative selection-handle child.
pub const SELECTION_HANDLE_CLASS_NAME: &str = "pm-widget__selection-handle";

const WIDGET_PROPERTY: &str = "widget";
const LABEL_PROPERTY: &str = "widget:label";
const UI_ELEMENT_PROPERTY: &str = "widget:ui-element";
const FILLER_OFFSET_PROPERTY: &str = "filler-offset";

/// A widget label: fixed text or a producer re-invoked on every read.
#[derive(Clone)]
pub enum WidgetLabel {
    Static(String),
    Dynamic(Rc<dyn Fn() -> String>),
}

impl From<&str> for WidgetLabel {
    fn from(value: &str) -> Self {
        WidgetLabel::Static(value.to_string())
    }
}

impl From<String> for WidgetLabel {
    fn from(value: String) -> Self {
        WidgetLabel::Static(value)
    }
}

/// Options for [`mark_as_widget`].
#[derive(Default)]
pub struct WidgetOptions {
    pub label: Option<WidgetLabel>,
    /// Append a decorative selection-handle child to the widget.
    pub has_selection_handle: bool,
    /// Custom highlight add/remove strategy; the default toggles the
    /// descriptor's classes.
    pub highlight: Option<HighlightHandling>,
}

/// Mark a view element as a widget: atomic, selectable as a whole and never
/// entered by the text caret. Tagging is permanent.
pub fn mark_as_widget(writer: &mut ViewWriter, element: ViewId, options: WidgetOptions) {
    writer.set_custom_property(element, WIDGET_PROPERTY, PropertyValue::Bool(true));
    writer.add_class(element, WIDGET_CLASS_NAME);
    set_non_editable_attribute(writer, element);

    // Widgets never need text-filler characters.
    writer.set_custom_property(
        element,
        FILLER_OFFSET_PROPERTY,
        PropertyValue::FillerOffset(Rc::new(|| None)),
    );

    let handling = options.highlight.unwrap_or_else(default_highlight_handling);
    set_highlight_handling(writer, element, handling.add, handling.remove);

    if let Some(label) = options.label {
        set_label(writer, element, label);
    }
    if options.has_selection_handle {
        add_selection_handle(writer, element);
    }
}

/// Whether the node carries the widget tag. False for text nodes and
/// untagged elements.
pub fn is_widget(doc: &ViewDocument, node: ViewId) -> bool {
    doc.element(node)
        .and_then(|el| el.custom_property(WIDGET_PROPERTY))
        .and_then(PropertyValue::as_bool)
        .unwrap_or(false)
}

/// Attach a label to a widget.
pub fn set_label(writer: &mut ViewWriter, element: ViewId, label: WidgetLabel) {
    let value = match label {
        WidgetLabel::Static(text) => PropertyValue::Str(text),
        WidgetLabel::Dynamic(f) => PropertyValue::StringFn(f),
    };
    writer.set_custom_property(element, LABEL_PROPERTY, value);
}

/// Read a widget's label. Dynamic labels are re-invoked on every read;
/// absence yields an empty string.
pub fn get_label(doc: &ViewDocument, element: ViewId) -> String {
    match doc.element(element).and_then(|el| el.custom_property(LABEL_PROPERTY)) {
        Some(PropertyValue::Str(text)) => text.clone(),
        Some(PropertyValue::StringFn(f)) => f(),
        _ => String::new(),
    }
}

/// Mark an editable element as an editable region nested inside a widget
/// (e.g. a caption). The non-editable attribute mirrors the element's
/// read-only state for its lifetime; the focused class mirrors its focus
/// state.
pub fn mark_as_nested_editable(writer: &mut ViewWriter, element: ViewId) {
    let Some(state) = writer
        .doc()
        .element(element)
        .and_then(|el| el.editable_state())
    else {
        log::warn!("mark_as_nested_editable ignored: element is not editable");
        return;
    };

    writer.add_class(element, EDITABLE_CLASS_NAME);
    writer.add_class(element, NESTED_EDITABLE_CLASS_NAME);

    apply_editable_attribute(writer, element, state.read_only);
    apply_focused_class(writer, element, state.focused);

    writer.observe(element, |writer, id, change| match change {
        EditableStateChange::ReadOnly(read_only) => {
            apply_editable_attribute(writer, id, read_only);
        }
        EditableStateChange::Focused(focused) => {
            apply_focused_class(writer, id, focused);
        }
    });
}

/// Whether a node is inside a nested editable region, i.e. an editable
/// boundary below the view root.
pub fn is_nested_editable(doc: &ViewDocument, node: ViewId) -> bool {
    doc.element(node)
        .is_some_and(|el| el.has_class(NESTED_EDITABLE_CLASS_NAME))
}

/// Whether a node is a decorative widget UI element rather than content.
pub fn is_ui_element(doc: &ViewDocument, node: ViewId) -> bool {
    doc.element(node)
        .and_then(|el| el.custom_property(UI_ELEMENT_PROPERTY))
        .and_then(PropertyValue::as_bool)
        .unwrap_or(false)
}

fn add_selection_handle(writer: &mut ViewWriter, element: ViewId) {
    let handle = writer.create_element("div");
    writer.add_class(handle, SELECTION_HANDLE_CLASS_NAME);
    writer.set_custom_property(handle, UI_ELEMENT_PROPERTY, PropertyValue::Bool(true));
    set_non_editable_attribute(writer, handle);
    writer.insert(handle, element, 0);
}

/// Set `contenteditable=false`, except on the engine that mishandles the
/// attribute on widget roots.
fn set_non_editable_attribute(writer: &mut ViewWriter, element: ViewId) {
    if writer.doc().host().engine == RenderingEngine::WebKit {
        return;
    }
    writer.set_attribute(element, "contenteditable", "false");
}

/// Mirror an editable's read-only state into the attribute, skipping the
/// carve-out engine entirely.
fn apply_editable_attribute(writer: &mut ViewWriter, element: ViewId, read_only: bool) {
    if writer.doc().host().engine == RenderingEngine::WebKit {
        return;
    }
    let value = if read_only { "false" } else { "true" };
    writer.set_attribute(element, "contenteditable", value);
}

fn apply_focused_class(writer: &mut ViewWriter, element: ViewId, focused: bool) {
    if focused {
        writer.add_class(element, NESTED_EDITABLE_FOCUSED_CLASS_NAME);
    } else {
        writer.remove_class(element, NESTED_EDITABLE_FOCUSED_CLASS_NAME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use penmark_core::view::HostProfile;
    use std::cell::Cell;

    fn headless_view() -> ViewDocument {
        ViewDocument::new(HostProfile::default())
    }

    fn webkit_view() -> ViewDocument {
        ViewDocument::new(HostProfile::new(RenderingEngine::WebKit))
    }

    #[test]
    fn test_mark_as_widget_tags_element() {
        let mut view = headless_view();
        let root = view.root();
        let mut writer = view.writer();
        let figure = writer.create_element("figure");
        writer.append(figure, root);
        mark_as_widget(&mut writer, figure, WidgetOptions::default());
        drop(writer);

        assert!(is_widget(&view, figure));
        let element = view.element(figure).unwrap();
        assert!(element.has_class(WIDGET_CLASS_NAME));
        assert_eq!(element.attribute("contenteditable"), Some("false"));
        match element.custom_property(FILLER_OFFSET_PROPERTY) {
            Some(PropertyValue::FillerOffset(f)) => assert_eq!(f(), None),
            other => panic!("expected filler offset function, got {other:?}"),
        }
    }

    #[test]
    fn test_mark_as_widget_skips_attribute_on_webkit() {
        let mut view = webkit_view();
        let root = view.root();
        let mut writer = view.writer();
        let figure = writer.create_element("figure");
        writer.append(figure, root);
        mark_as_widget(&mut writer, figure, WidgetOptions::default());
        drop(writer);

        assert!(is_widget(&view, figure));
        assert_eq!(view.element(figure).unwrap().attribute("contenteditable"), None);
    }

    #[test]
    fn test_is_widget_false_for_text_and_untagged() {
        let mut view = headless_view();
        let root = view.root();
        let mut writer = view.writer();
        let plain = writer.create_element("p");
        let text = writer.create_text("foo");
        writer.append(plain, root);
        writer.append(text, plain);
        drop(writer);

        assert!(!is_widget(&view, plain));
        assert!(!is_widget(&view, text));
    }

    #[test]
    fn test_static_and_dynamic_labels() {
        let mut view = headless_view();
        let root = view.root();
        let counter = Rc::new(Cell::new(0));
        let mut writer = view.writer();
        let a = writer.create_element("figure");
        let b = writer.create_element("figure");
        writer.append(a, root);
        writer.append(b, root);
        set_label(&mut writer, a, "image widget".into());
        let reads = counter.clone();
        set_label(
            &mut writer,
            b,
            WidgetLabel::Dynamic(Rc::new(move || {
                reads.set(reads.get() + 1);
                format!("read {}", reads.get())
            })),
        );
        drop(writer);

        assert_eq!(get_label(&view, a), "image widget");
        assert_eq!(get_label(&view, b), "read 1");
        assert_eq!(get_label(&view, b), "read 2");
        assert_eq!(get_label(&view, root), "");
    }

    #[test]
    fn test_selection_handle_child() {
        let mut view = headless_view();
        let root = view.root();
        let mut writer = view.writer();
        let figure = writer.create_element("figure");
        writer.append(figure, root);
        mark_as_widget(
            &mut writer,
            figure,
            WidgetOptions {
                has_selection_handle: true,
                ..Default::default()
            },
        );
        drop(writer);

        let handle = view.children(figure)[0];
        assert!(
            view.element(handle)
                .unwrap()
                .has_class(SELECTION_HANDLE_CLASS_NAME)
        );
        assert!(is_ui_element(&view, handle));
        assert!(!is_widget(&view, handle));
    }

    #[test]
    fn test_nested_editable_mirrors_read_only_and_focus() {
        let mut view = headless_view();
        let root = view.root();
        let mut writer = view.writer();
        let caption = writer.create_editable("figcaption");
        writer.append(caption, root);
        mark_as_nested_editable(&mut writer, caption);

        assert_eq!(
            writer.doc().element(caption).unwrap().attribute("contenteditable"),
            Some("true")
        );

        writer.set_editable_read_only(caption, true);
        assert_eq!(
            writer.doc().element(caption).unwrap().attribute("contenteditable"),
            Some("false")
        );

        writer.set_editable_focused(caption, true);
        assert!(
            writer
                .doc()
                .element(caption)
                .unwrap()
                .has_class(NESTED_EDITABLE_FOCUSED_CLASS_NAME)
        );
        writer.set_editable_focused(caption, false);
        drop(writer);

        let element = view.element(caption).unwrap();
        assert!(element.has_class(NESTED_EDITABLE_CLASS_NAME));
        assert!(!element.has_class(NESTED_EDITABLE_FOCUSED_CLASS_NAME));
    }

    #[test]
    fn test_nested_editable_skips_attribute_on_webkit() {
        let mut view = webkit_view();
        let root = view.root();
        let mut writer = view.writer();
        let caption = writer.create_editable("figcaption");
        writer.append(caption, root);
        mark_as_nested_editable(&mut writer, caption);
        writer.set_editable_read_only(caption, true);
        drop(writer);

        assert_eq!(view.element(caption).unwrap().attribute("contenteditable"), None);
    }
}
