//! Optimal insertion position for new atomic elements.

use penmark_core::model::{ModelDocument, NodeId, Position, Schema, Selection};

/// Compute the best position to insert a new atomic element for the given
/// selection.
///
/// The check order is load-bearing: a whole-element selection outranks the
/// block heuristics, and the start/end determination tolerates arbitrarily
/// deep inline nesting between the caret and the block boundary.
pub fn find_optimal_insertion_position(
    doc: &ModelDocument,
    schema: &Schema,
    selection: &Selection,
) -> Position {
    let fallback = Position::new(doc.root(), 0);
    let Some(focus) = selection.focus() else {
        return fallback;
    };

    // A fully selected element: insert right after it.
    if let Some(element) = selection.selected_element(doc) {
        return Position::after(doc, element).unwrap_or(focus);
    }

    // Nearest block-like ancestor of the caret.
    let mut candidates = vec![focus.parent];
    candidates.extend(doc.ancestors(focus.parent));
    let block = candidates.into_iter().find(|&node| {
        doc.name(node).is_some_and(|name| schema.is_block(name)) && doc.parent(node).is_some()
    });
    let Some(block) = block else {
        return focus;
    };

    if doc.node_length(block) == 0 {
        return Position::new(block, 0);
    }

    if focus.touches_end_of(doc, block) {
        Position::after(doc, block).unwrap_or(focus)
    } else {
        // Start-of-block and middle-of-block both insert before; inserting
        // in the middle keeps split semantics out of this resolver.
        Position::before(doc, block).unwrap_or(focus)
    }
}

/// Insert a new atomic element at the optimal position and select it, as a
/// single change block.
pub fn insert_object(doc: &mut ModelDocument, schema: &Schema, name: &str) -> NodeId {
    let selection = doc.selection().clone();
    let position = find_optimal_insertion_position(doc, schema, &selection);
    log::debug!("inserting {name} at {:?}", position.path(doc));
    doc.change(|writer| {
        let element = writer.create_element(name);
        writer.insert_at(element, position);
        writer.select_node(element);
        element
    })
}
