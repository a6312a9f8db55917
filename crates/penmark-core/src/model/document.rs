//! Model document: arena of nodes plus selection and change tracking.

use super::node::{Element, Node, NodeId};
use super::selection::Selection;
use super::writer::Writer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Maximum number of undo snapshots to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// Arena entry: a node plus its parent link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct NodeEntry {
    pub(crate) parent: Option<NodeId>,
    pub(crate) node: Node,
}

/// A snapshot of document state taken per change block.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DocumentSnapshot {
    nodes: HashMap<NodeId, NodeEntry>,
    selection: Selection,
}

/// The abstract content document.
///
/// All structural mutation goes through [`ModelDocument::change`], which runs
/// a closure against a [`Writer`] and records exactly one undo snapshot, so a
/// cascade of edits inside one block is observed (and undone) atomically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelDocument {
    nodes: HashMap<NodeId, NodeEntry>,
    root: NodeId,
    selection: Selection,
    read_only: bool,
    #[serde(skip)]
    undo_stack: Vec<DocumentSnapshot>,
}

impl Default for ModelDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelDocument {
    /// Create a document with a single empty `$root` element.
    pub fn new() -> Self {
        let root = Uuid::new_v4();
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            NodeEntry {
                parent: None,
                node: Node::Element(Element::new("$root")),
            },
        );
        Self {
            nodes,
            root,
            selection: Selection::collapsed_at(super::Position::new(root, 0)),
            read_only: false,
            undo_stack: Vec::new(),
        }
    }

    /// The root element id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by id.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id).map(|entry| &entry.node)
    }

    /// Whether the document still contains the node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Parent of a node, `None` for the root or unknown ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|entry| entry.parent)
    }

    /// Ordered children of an element; empty for text nodes and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.get(id) {
            Some(Node::Element(el)) => &el.children,
            _ => &[],
        }
    }

    /// Element name of a node, if it is an element.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::name)
    }

    /// Index of a node among its parent's children.
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    /// Content length of a node (child count or character count).
    pub fn node_length(&self, id: NodeId) -> usize {
        self.get(id).map(Node::len).unwrap_or(0)
    }

    /// Child of `parent` at `offset`, if any.
    pub fn node_at(&self, parent: NodeId, offset: usize) -> Option<NodeId> {
        self.children(parent).get(offset).copied()
    }

    /// Parent chain of a node, nearest first, root last.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    /// Whether `ancestor` strictly contains `node`.
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// The document selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Whether the document rejects editing input.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Run a change block. One undo snapshot is recorded for the whole block.
    pub fn change<R>(&mut self, f: impl FnOnce(&mut Writer) -> R) -> R {
        self.push_undo();
        let mut writer = Writer::new(self);
        f(&mut writer)
    }

    /// Undo the last change block. Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(snapshot) => {
                self.nodes = snapshot.nodes;
                self.selection = snapshot.selection;
                true
            }
            None => false,
        }
    }

    /// Number of recorded undo steps.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    fn push_undo(&mut self) {
        self.undo_stack.push(DocumentSnapshot {
            nodes: self.nodes.clone(),
            selection: self.selection.clone(),
        });
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    // Arena access for the writer.

    pub(crate) fn insert_entry(&mut self, id: NodeId, entry: NodeEntry) {
        self.nodes.insert(id, entry);
    }

    pub(crate) fn entry_mut(&mut self, id: NodeId) -> Option<&mut NodeEntry> {
        self.nodes.get_mut(&id)
    }

    pub(crate) fn remove_entry(&mut self, id: NodeId) -> Option<NodeEntry> {
        self.nodes.remove(&id)
    }

    pub(crate) fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }
}
