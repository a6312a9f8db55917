//! Highlight arbitration: prioritized visual-state descriptors competing
//! for one node's highlight appearance.

use penmark_core::view::{
    HighlightDescriptor, HighlightHandler, HighlightHandling, PropertyValue, ViewId, ViewWriter,
};
use std::rc::Rc;

const HIGHLIGHT_HANDLING_PROPERTY: &str = "widget:highlight-handling";

/// Install the add/remove strategy invoked when the active descriptor
/// changes. Stored on the node as a custom property, by identity.
pub fn set_highlight_handling(
    writer: &mut ViewWriter,
    element: ViewId,
    add: HighlightHandler,
    remove: HighlightHandler,
) {
    writer.set_custom_property(
        element,
        HIGHLIGHT_HANDLING_PROPERTY,
        PropertyValue::Highlight(Rc::new(HighlightHandling { add, remove })),
    );
}

/// The default strategy: toggle the descriptor's classes on the node.
pub fn default_highlight_handling() -> HighlightHandling {
    HighlightHandling {
        add: Rc::new(|writer, element, descriptor| {
            for class in &descriptor.classes {
                writer.add_class(element, class);
            }
        }),
        remove: Rc::new(|writer, element, descriptor| {
            for class in &descriptor.classes {
                writer.remove_class(element, class);
            }
        }),
    }
}

/// Add a descriptor to the node's stack. If it becomes the new winner, the
/// previous visual is torn down and the new one applied; otherwise nothing
/// is rendered.
pub fn add_highlight(writer: &mut ViewWriter, element: ViewId, descriptor: HighlightDescriptor) {
    let Some(stack) = writer.doc().element(element).map(|el| el.highlight_stack().to_vec())
    else {
        return;
    };
    let old_active = active(&stack).cloned();
    let mut stack = stack;
    stack.retain(|d| d.id != descriptor.id);
    stack.push(descriptor);
    let new_active = active(&stack).cloned();
    writer.set_highlight_stack(element, stack);
    apply_transition(writer, element, old_active, new_active);
}

/// Evict a descriptor by id. If it was active, whichever remaining
/// descriptor now wins is applied; removing a non-active descriptor renders
/// nothing.
pub fn remove_highlight(writer: &mut ViewWriter, element: ViewId, descriptor_id: &str) {
    let Some(stack) = writer.doc().element(element).map(|el| el.highlight_stack().to_vec())
    else {
        return;
    };
    if !stack.iter().any(|d| d.id == descriptor_id) {
        return;
    }
    let old_active = active(&stack).cloned();
    let stack: Vec<_> = stack.into_iter().filter(|d| d.id != descriptor_id).collect();
    let new_active = active(&stack).cloned();
    writer.set_highlight_stack(element, stack);
    apply_transition(writer, element, old_active, new_active);
}

/// The winning descriptor: numerically highest priority; on ties the
/// earliest-added entry stays active.
fn active(stack: &[HighlightDescriptor]) -> Option<&HighlightDescriptor> {
    let mut best: Option<&HighlightDescriptor> = None;
    for descriptor in stack {
        if best.is_none_or(|current| descriptor.priority > current.priority) {
            best = Some(descriptor);
        }
    }
    best
}

fn apply_transition(
    writer: &mut ViewWriter,
    element: ViewId,
    old_active: Option<HighlightDescriptor>,
    new_active: Option<HighlightDescriptor>,
) {
    if old_active.as_ref().map(|d| &d.id) == new_active.as_ref().map(|d| &d.id) {
        return;
    }
    let Some(handling) = handling_of(writer, element) else {
        return;
    };
    if let Some(old) = old_active {
        (handling.remove)(writer, element, &old);
    }
    if let Some(new) = new_active {
        (handling.add)(writer, element, &new);
    }
}

fn handling_of(writer: &ViewWriter, element: ViewId) -> Option<Rc<HighlightHandling>> {
    match writer
        .doc()
        .element(element)?
        .custom_property(HIGHLIGHT_HANDLING_PROPERTY)?
    {
        PropertyValue::Highlight(handling) => Some(handling.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{WidgetOptions, mark_as_widget};
    use penmark_core::view::{HostProfile, ViewDocument};
    use std::cell::RefCell;

    fn widget_view() -> (ViewDocument, ViewId) {
        let mut view = ViewDocument::new(HostProfile::default());
        let root = view.root();
        let mut writer = view.writer();
        let figure = writer.create_element("figure");
        writer.append(figure, root);
        mark_as_widget(&mut writer, figure, WidgetOptions::default());
        drop(writer);
        (view, figure)
    }

    fn recording_handlers(log: Rc<RefCell<Vec<String>>>) -> (HighlightHandler, HighlightHandler) {
        let add_log = log.clone();
        let add: HighlightHandler = Rc::new(move |_, _, descriptor| {
            add_log.borrow_mut().push(format!("add:{}", descriptor.id));
        });
        let remove: HighlightHandler = Rc::new(move |_, _, descriptor| {
            log.borrow_mut().push(format!("remove:{}", descriptor.id));
        });
        (add, remove)
    }

    #[test]
    fn test_default_handling_toggles_classes() {
        let (mut view, figure) = widget_view();
        let mut writer = view.writer();
        add_highlight(&mut writer, figure, HighlightDescriptor::new("c", 10, "comment"));
        assert!(writer.doc().element(figure).unwrap().has_class("comment"));
        remove_highlight(&mut writer, figure, "c");
        assert!(!writer.doc().element(figure).unwrap().has_class("comment"));
    }

    #[test]
    fn test_default_handling_toggles_every_descriptor_class() {
        let (mut view, figure) = widget_view();
        let mut writer = view.writer();
        let descriptor = HighlightDescriptor::with_classes(
            "c",
            10,
            ["comment".to_string(), "comment_active".to_string()],
        );
        add_highlight(&mut writer, figure, descriptor);
        let element = writer.doc().element(figure).unwrap();
        assert!(element.has_class("comment"));
        assert!(element.has_class("comment_active"));

        remove_highlight(&mut writer, figure, "c");
        let element = writer.doc().element(figure).unwrap();
        assert!(!element.has_class("comment"));
        assert!(!element.has_class("comment_active"));
    }

    #[test]
    fn test_higher_priority_wins_with_single_transition() {
        let (mut view, figure) = widget_view();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (add, remove) = recording_handlers(log.clone());
        let mut writer = view.writer();
        set_highlight_handling(&mut writer, figure, add, remove);

        add_highlight(&mut writer, figure, HighlightDescriptor::new("low", 1, "a"));
        add_highlight(&mut writer, figure, HighlightDescriptor::new("high", 5, "b"));
        drop(writer);

        assert_eq!(&*log.borrow(), &["add:low", "remove:low", "add:high"]);
    }

    #[test]
    fn test_lower_priority_addition_renders_nothing() {
        let (mut view, figure) = widget_view();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (add, remove) = recording_handlers(log.clone());
        let mut writer = view.writer();
        set_highlight_handling(&mut writer, figure, add, remove);

        add_highlight(&mut writer, figure, HighlightDescriptor::new("high", 5, "a"));
        add_highlight(&mut writer, figure, HighlightDescriptor::new("low", 1, "b"));
        drop(writer);

        assert_eq!(&*log.borrow(), &["add:high"]);
    }

    #[test]
    fn test_tie_keeps_earliest_added() {
        let (mut view, figure) = widget_view();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (add, remove) = recording_handlers(log.clone());
        let mut writer = view.writer();
        set_highlight_handling(&mut writer, figure, add, remove);

        add_highlight(&mut writer, figure, HighlightDescriptor::new("first", 3, "a"));
        add_highlight(&mut writer, figure, HighlightDescriptor::new("second", 3, "b"));
        drop(writer);

        // Equal priority: the earliest-added descriptor stays active.
        assert_eq!(&*log.borrow(), &["add:first"]);
    }

    #[test]
    fn test_removing_active_replays_next_winner() {
        let (mut view, figure) = widget_view();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (add, remove) = recording_handlers(log.clone());
        let mut writer = view.writer();
        set_highlight_handling(&mut writer, figure, add, remove);

        add_highlight(&mut writer, figure, HighlightDescriptor::new("low", 1, "a"));
        add_highlight(&mut writer, figure, HighlightDescriptor::new("high", 5, "b"));
        log.borrow_mut().clear();

        remove_highlight(&mut writer, figure, "high");
        drop(writer);

        assert_eq!(&*log.borrow(), &["remove:high", "add:low"]);
    }

    #[test]
    fn test_removing_non_active_renders_nothing() {
        let (mut view, figure) = widget_view();
        let log = Rc::new(RefCell::new(Vec::new()));
        let (add, remove) = recording_handlers(log.clone());
        let mut writer = view.writer();
        set_highlight_handling(&mut writer, figure, add, remove);

        add_highlight(&mut writer, figure, HighlightDescriptor::new("low", 1, "a"));
        add_highlight(&mut writer, figure, HighlightDescriptor::new("high", 5, "b"));
        log.borrow_mut().clear();

        remove_highlight(&mut writer, figure, "low");
        assert!(log.borrow().is_empty());

        // Unknown ids are ignored entirely.
        remove_highlight(&mut writer, figure, "missing");
        drop(writer);
        assert!(log.borrow().is_empty());
    }
}
