//! Widget interaction controller: the state machine translating input
//! events and selection changes into model-selection transitions.

use crate::utils::{WIDGET_SELECTED_CLASS_NAME, get_label, is_nested_editable, is_widget};
use penmark_core::events::{
    DeleteEvent, Direction, EventInfo, Key, KeyDownEvent, MouseButton, PointerDownEvent,
};
use penmark_core::model::{ModelDocument, Node, NodeId, Position, Schema, Selection};
use penmark_core::view::{Mapper, ViewDocument, ViewId};
use std::collections::HashSet;

/// Borrowed editing state handed to every handler.
pub struct EditingContext<'a> {
    pub model: &'a mut ModelDocument,
    pub schema: &'a Schema,
    pub view: &'a mut ViewDocument,
    pub mapper: &'a Mapper,
}

/// The widget interaction state machine.
///
/// Handlers are registered once and invoked by the editor shell in fixed
/// priority order: key and delete handling runs at high priority, the
/// selection post-processing pass at low priority so it observes the final
/// rendered selection.
pub struct WidgetController {
    /// View nodes currently carrying the selected marker; rebuilt on every
    /// selection-conversion pass.
    previously_selected: HashSet<ViewId>,
}

impl Default for WidgetController {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetController {
    pub fn new() -> Self {
        Self {
            previously_selected: HashSet::new(),
        }
    }

    /// Post-selection-rendering pass: re-mark widgets covered by the view
    /// selection and switch to a fake selection when a single widget is
    /// fully selected.
    pub fn on_selection_rendered(&mut self, ctx: &mut EditingContext) {
        let selection = ctx.view.selection().clone();
        let selected_element = selection.selected_element(ctx.view);
        let range_items: Vec<Vec<ViewId>> = selection
            .ranges()
            .iter()
            .map(|range| range.items(ctx.view))
            .collect();

        let mut writer = ctx.view.writer();
        for node in self.previously_selected.drain() {
            writer.remove_class(node, WIDGET_SELECTED_CLASS_NAME);
        }

        let mut last_marked: Option<ViewId> = None;
        for items in range_items {
            for node in items {
                if !is_widget(writer.doc(), node) {
                    continue;
                }
                // A widget inside an already-marked ancestor stays unmarked.
                if let Some(marked) = last_marked
                    && writer.doc().is_ancestor_of(marked, node)
                {
                    continue;
                }
                writer.add_class(node, WIDGET_SELECTED_CLASS_NAME);
                self.previously_selected.insert(node);
                last_marked = Some(node);

                if Some(node) == selected_element {
                    let label = get_label(writer.doc(), node);
                    log::debug!("rendering fake selection over widget ({label:?})");
                    writer.set_fake_selection_label(label);
                }
            }
        }
    }

    /// Pointer press: select the widget under the pointer as a whole, unless
    /// the press lands inside a nested editable region.
    pub fn on_pointer_down(
        &mut self,
        event: &PointerDownEvent,
        info: &mut EventInfo,
        ctx: &mut EditingContext,
    ) {
        if event.button != MouseButton::Left {
            return;
        }
        let Some(widget) = find_widget_ancestor(ctx.view, event.target) else {
            return;
        };
        info.prevent_default();
        if !ctx.view.is_focused() {
            ctx.view.focus();
        }
        let Some(element) = ctx.mapper.to_model(widget) else {
            log::warn!("pointer press on unmapped widget ignored");
            return;
        };
        log::debug!("selecting widget from pointer press");
        ctx.model.change(|writer| writer.select_node(element));
    }

    /// Key press, high priority: arrow-key skip-over, select-all scoping and
    /// Enter/Shift+Enter escape around atomic elements.
    pub fn on_key_down(
        &mut self,
        event: &KeyDownEvent,
        info: &mut EventInfo,
        ctx: &mut EditingContext,
    ) {
        if info.is_stopped() {
            return;
        }
        if event.is_arrow() {
            self.handle_arrow(event, info, ctx);
        } else if event.is_select_all() {
            if handle_select_all(ctx) {
                info.stop();
                info.prevent_default();
            }
        } else if event.key == Key::Enter {
            self.handle_enter(event.modifiers.shift, info, ctx);
        }
    }

    /// Delete, high priority: select the adjacent atomic element, cleaning
    /// up emptied ancestors in the same change block.
    pub fn on_delete(&mut self, event: &DeleteEvent, info: &mut EventInfo, ctx: &mut EditingContext) {
        if info.is_stopped() || ctx.model.is_read_only() {
            return;
        }
        let selection = ctx.model.selection().clone();
        if !selection.is_collapsed() {
            return;
        }
        let Some(focus) = selection.focus() else {
            return;
        };
        let Some(object) =
            object_element_next_to_position(ctx.model, ctx.schema, focus, event.direction)
        else {
            return;
        };
        log::debug!("delete resolves to adjacent atomic element");
        ctx.model.change(|writer| {
            let mut current = caret_element(writer.doc(), focus);
            while let Some(node) = current {
                if node == writer.doc().root()
                    || node == object
                    || writer.doc().node_length(node) != 0
                {
                    break;
                }
                let parent = writer.doc().parent(node);
                writer.remove(node);
                current = parent;
            }
            writer.select_node(object);
        });
        info.stop();
        info.prevent_default();
    }

    fn handle_arrow(&mut self, event: &KeyDownEvent, info: &mut EventInfo, ctx: &mut EditingContext) {
        let Some(direction) = event.arrow_direction() else {
            return;
        };
        let selection = ctx.model.selection().clone();

        if let Some(object) = selection
            .selected_element(ctx.model)
            .filter(|&el| ctx.schema.is_object_node(ctx.model, el))
        {
            let edge = match direction {
                Direction::Forward => Position::after(ctx.model, object),
                Direction::Backward => Position::before(ctx.model, object),
            };
            if let Some(edge) = edge
                && let Some(range) = ctx.schema.nearest_selection_range(ctx.model, edge, direction)
            {
                log::debug!("arrow key skips over selected atomic element");
                ctx.model
                    .change(|writer| writer.set_selection(Selection::from_range(range)));
            }
            // Handled even when no range was found: the caret must not end
            // up inside the object.
            info.stop();
            info.prevent_default();
            return;
        }

        if selection.is_collapsed()
            && let Some(focus) = selection.focus()
            && let Some(object) =
                object_element_next_to_position(ctx.model, ctx.schema, focus, direction)
        {
            log::debug!("arrow key selects adjacent atomic element");
            ctx.model.change(|writer| writer.select_node(object));
            info.stop();
            info.prevent_default();
        }
    }

    fn handle_enter(&mut self, before: bool, info: &mut EventInfo, ctx: &mut EditingContext) {
        let selection = ctx.model.selection().clone();
        let Some(object) = selection
            .selected_element(ctx.model)
            .filter(|&el| ctx.schema.is_object_node(ctx.model, el))
        else {
            return;
        };
        ctx.model.change(|writer| {
            let position = if before {
                Position::before(writer.doc(), object)
            } else {
                Position::after(writer.doc(), object)
            };
            let Some(position) = position else {
                return;
            };
            let paragraph = writer.create_element("paragraph");
            writer.insert_at(paragraph, position);
            writer.collapse_at(Position::new(paragraph, 0));
        });
        info.stop();
        info.prevent_default();
    }
}

/// Select-all scoping: first the nearest editable boundary, then the parent
/// of a selected widget. Returns whether either succeeded.
fn handle_select_all(ctx: &mut EditingContext) -> bool {
    let selection = ctx.model.selection().clone();

    let limit = ctx.schema.limit_element(ctx.model, &selection);
    if limit != ctx.model.root() {
        let already_spans = selection.ranges().len() == 1
            && selection.ranges()[0].spans_content_of(ctx.model, limit);
        if !already_spans {
            log::debug!("select-all scoped to nearest editable boundary");
            ctx.model.change(|writer| writer.select_content_of(limit));
            return true;
        }
    }

    if let Some(element) = selection.selected_element(ctx.model)
        && ctx
            .mapper
            .to_view(element)
            .is_some_and(|view| is_widget(ctx.view, view))
        && let Some(parent) = ctx.model.parent(element)
    {
        log::debug!("select-all widens from selected widget to its parent");
        ctx.model.change(|writer| writer.select_content_of(parent));
        return true;
    }

    false
}

/// Walk up from a pressed view node; a nested editable found before any
/// widget means the press belongs to text editing.
fn find_widget_ancestor(view: &ViewDocument, target: ViewId) -> Option<ViewId> {
    let mut current = Some(target);
    while let Some(node) = current {
        if is_nested_editable(view, node) {
            return None;
        }
        if is_widget(view, node) {
            return Some(node);
        }
        current = view.parent(node);
    }
    None
}

/// The atomic element directly adjacent to a caret position in the given
/// direction, looking through edges of nested containers but never across a
/// selection-boundary (limit) element.
fn object_element_next_to_position(
    doc: &ModelDocument,
    schema: &Schema,
    position: Position,
    direction: Direction,
) -> Option<NodeId> {
    let mut pos = position;
    if let Some(Node::Text(_)) = doc.get(pos.parent) {
        let len = doc.node_length(pos.parent);
        pos = match direction {
            Direction::Forward if pos.offset == len => Position::after(doc, pos.parent)?,
            Direction::Backward if pos.offset == 0 => Position::before(doc, pos.parent)?,
            _ => return None,
        };
    }
    loop {
        let adjacent = match direction {
            Direction::Forward => pos.node_after(doc),
            Direction::Backward => pos.node_before(doc),
        };
        match adjacent {
            Some(node) => return schema.is_object_node(doc, node).then_some(node),
            None => {
                if doc
                    .name(pos.parent)
                    .is_some_and(|name| name != "$root" && schema.is_limit(name))
                {
                    return None;
                }
                pos = match direction {
                    Direction::Forward => Position::after(doc, pos.parent)?,
                    Direction::Backward => Position::before(doc, pos.parent)?,
                };
            }
        }
    }
}

/// The element containing a caret (lifting text-node parents).
fn caret_element(doc: &ModelDocument, position: Position) -> Option<NodeId> {
    match doc.get(position.parent)? {
        Node::Element(_) => Some(position.parent),
        Node::Text(_) => doc.parent(position.parent),
    }
}
