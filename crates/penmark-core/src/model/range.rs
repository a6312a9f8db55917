//! Ranges over the model tree.

use super::document::ModelDocument;
use super::node::NodeId;
use super::position::Position;
use serde::{Deserialize, Serialize};

/// A range between two positions, start before or equal to end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Collapsed range at a position.
    pub fn collapsed(position: Position) -> Self {
        Self::new(position, position)
    }

    /// Range selecting exactly one node.
    pub fn on_node(doc: &ModelDocument, node: NodeId) -> Option<Self> {
        Some(Self::new(
            Position::before(doc, node)?,
            Position::after(doc, node)?,
        ))
    }

    /// Range spanning the entire content of an element.
    pub fn inside(doc: &ModelDocument, element: NodeId) -> Self {
        Self::new(
            Position::new(element, 0),
            Position::new(element, doc.node_length(element)),
        )
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// The single node this range exactly covers, if any.
    pub fn selected_node(&self, doc: &ModelDocument) -> Option<NodeId> {
        if self.start.parent != self.end.parent || self.end.offset != self.start.offset + 1 {
            return None;
        }
        doc.node_at(self.start.parent, self.start.offset)
    }

    /// Whether this range spans the entire content of `element`, tolerating
    /// nested wrappers at either edge.
    pub fn spans_content_of(&self, doc: &ModelDocument, element: NodeId) -> bool {
        self.start.touches_start_of(doc, element) && self.end.touches_end_of(doc, element)
    }
}
