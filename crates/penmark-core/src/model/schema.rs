//! Schema: element definitions and selection placement queries.

use super::document::ModelDocument;
use super::node::{Node, NodeId};
use super::position::Position;
use super::range::Range;
use super::selection::Selection;
use crate::events::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How an element behaves structurally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementDefinition {
    /// Atomic, selectable as a whole, never entered by the caret.
    pub is_object: bool,
    /// Block-level container (a unit for insertion heuristics).
    pub is_block: bool,
    /// Selection boundary: select-all and similar operations stop here.
    pub is_limit: bool,
    /// May directly contain text.
    pub allows_text: bool,
}

/// Registry of element definitions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schema {
    definitions: HashMap<String, ElementDefinition>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. Later registrations replace earlier ones.
    pub fn register(&mut self, name: &str, definition: ElementDefinition) {
        self.definitions.insert(name.to_string(), definition);
    }

    fn definition(&self, name: &str) -> ElementDefinition {
        self.definitions.get(name).copied().unwrap_or_default()
    }

    pub fn is_object(&self, name: &str) -> bool {
        self.definition(name).is_object
    }

    pub fn is_block(&self, name: &str) -> bool {
        self.definition(name).is_block
    }

    /// Objects are implicit limits.
    pub fn is_limit(&self, name: &str) -> bool {
        let def = self.definition(name);
        def.is_limit || def.is_object
    }

    pub fn allows_text(&self, name: &str) -> bool {
        self.definition(name).allows_text
    }

    /// Whether the node is an element the schema treats as an object.
    pub fn is_object_node(&self, doc: &ModelDocument, node: NodeId) -> bool {
        doc.name(node).is_some_and(|name| self.is_object(name))
    }

    /// Nearest place the selection may land, walking from `start` in
    /// `direction`: either a caret inside a text-allowing element or a range
    /// over an object. Returns `None` when the walk leaves the root.
    pub fn nearest_selection_range(
        &self,
        doc: &ModelDocument,
        start: Position,
        direction: Direction,
    ) -> Option<Range> {
        let mut pos = start;
        loop {
            if let Some(name) = doc.name(pos.parent)
                && self.allows_text(name)
            {
                return Some(Range::collapsed(pos));
            }
            let adjacent = match direction {
                Direction::Forward => pos.node_after(doc),
                Direction::Backward => pos.node_before(doc),
            };
            match adjacent {
                Some(node) => match doc.get(node) {
                    Some(Node::Element(el)) if self.is_object(&el.name) => {
                        return Range::on_node(doc, node);
                    }
                    Some(Node::Element(_)) => {
                        // Step inside, at the edge facing the walk.
                        pos = match direction {
                            Direction::Forward => Position::new(node, 0),
                            Direction::Backward => Position::new(node, doc.node_length(node)),
                        };
                    }
                    _ => {
                        // Text under a parent the schema rejects; skip over.
                        pos = match direction {
                            Direction::Forward => Position::new(pos.parent, pos.offset + 1),
                            Direction::Backward => Position::new(pos.parent, pos.offset - 1),
                        };
                    }
                },
                None => {
                    // Leave the current container.
                    pos = match direction {
                        Direction::Forward => Position::after(doc, pos.parent)?,
                        Direction::Backward => Position::before(doc, pos.parent)?,
                    };
                }
            }
        }
    }

    /// The deepest limit element the selection sits inside; the root when no
    /// registered limit is found.
    pub fn limit_element(&self, doc: &ModelDocument, selection: &Selection) -> NodeId {
        let Some(pos) = selection.anchor() else {
            return doc.root();
        };
        let mut candidates = vec![pos.parent];
        candidates.extend(doc.ancestors(pos.parent));
        for node in candidates {
            if let Some(name) = doc.name(node)
                && name != "$root"
                && self.is_limit(name)
            {
                return node;
            }
        }
        doc.root()
    }
}
