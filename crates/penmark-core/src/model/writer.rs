//! Model writer: structural mutation inside a change block.

use super::document::{ModelDocument, NodeEntry};
use super::node::{Element, Node, NodeId, Text};
use super::position::Position;
use super::range::Range;
use super::selection::Selection;
use uuid::Uuid;

/// Mutation handle passed to [`ModelDocument::change`] closures.
pub struct Writer<'a> {
    doc: &'a mut ModelDocument,
}

impl<'a> Writer<'a> {
    pub(crate) fn new(doc: &'a mut ModelDocument) -> Self {
        Self { doc }
    }

    /// Read access to the document being changed.
    pub fn doc(&self) -> &ModelDocument {
        self.doc
    }

    /// Create a detached element. Insert it to attach it to the tree.
    pub fn create_element(&mut self, name: &str) -> NodeId {
        let id = Uuid::new_v4();
        self.doc.insert_entry(
            id,
            NodeEntry {
                parent: None,
                node: Node::Element(Element::new(name)),
            },
        );
        id
    }

    /// Insert a detached node into `parent` at `offset`.
    pub fn insert(&mut self, node: NodeId, parent: NodeId, offset: usize) {
        if !self.doc.contains(node) || !self.doc.contains(parent) {
            log::warn!("insert ignored: unknown node or parent");
            return;
        }
        if let Some(entry) = self.doc.entry_mut(parent) {
            match &mut entry.node {
                Node::Element(el) => {
                    let offset = offset.min(el.children.len());
                    el.children.insert(offset, node);
                }
                Node::Text(_) => {
                    log::warn!("insert ignored: text nodes have no children");
                    return;
                }
            }
        }
        if let Some(entry) = self.doc.entry_mut(node) {
            entry.parent = Some(parent);
        }
    }

    /// Insert a detached node at a position.
    pub fn insert_at(&mut self, node: NodeId, position: Position) {
        self.insert(node, position.parent, position.offset);
    }

    /// Create and insert a text node.
    pub fn insert_text(&mut self, data: &str, parent: NodeId, offset: usize) -> NodeId {
        let id = Uuid::new_v4();
        self.doc.insert_entry(
            id,
            NodeEntry {
                parent: None,
                node: Node::Text(Text::new(data)),
            },
        );
        self.insert(id, parent, offset);
        id
    }

    /// Set an attribute on an element.
    pub fn set_attribute(&mut self, node: NodeId, key: &str, value: &str) {
        if let Some(entry) = self.doc.entry_mut(node)
            && let Node::Element(el) = &mut entry.node
        {
            el.attributes.insert(key.to_string(), value.to_string());
        }
    }

    /// Detach a node from its parent and delete its subtree from the arena.
    pub fn remove(&mut self, node: NodeId) {
        let parent = self.doc.parent(node);
        if let Some(parent) = parent
            && let Some(entry) = self.doc.entry_mut(parent)
            && let Node::Element(el) = &mut entry.node
        {
            el.children.retain(|&child| child != node);
        }
        self.remove_subtree(node);
    }

    fn remove_subtree(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.doc.children(node).to_vec();
        for child in children {
            self.remove_subtree(child);
        }
        self.doc.remove_entry(node);
    }

    /// Replace the document selection.
    pub fn set_selection(&mut self, selection: Selection) {
        self.doc.set_selection(selection);
    }

    /// Select a whole node.
    pub fn select_node(&mut self, node: NodeId) {
        if let Some(selection) = Selection::on_node(self.doc, node) {
            self.doc.set_selection(selection);
        } else {
            log::warn!("select_node ignored: node has no parent");
        }
    }

    /// Collapse the selection at a position.
    pub fn collapse_at(&mut self, position: Position) {
        self.doc.set_selection(Selection::collapsed_at(position));
    }

    /// Select the entire content of an element.
    pub fn select_content_of(&mut self, element: NodeId) {
        let range = Range::inside(self.doc, element);
        self.doc.set_selection(Selection::from_range(range));
    }
}
