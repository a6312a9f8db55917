//! View document: arena of view nodes, focus state and editable-state
//! observers.

use super::element::{EditableState, ViewElement, ViewId, ViewNode};
use super::selection::ViewSelection;
use super::writer::ViewWriter;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Host rendering engines the view may be displayed by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderingEngine {
    Blink,
    Gecko,
    /// Mishandles the non-editable attribute on widget roots; the attribute
    /// is omitted there.
    WebKit,
    #[default]
    Headless,
}

/// Process-wide immutable description of the host platform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProfile {
    pub engine: RenderingEngine,
}

impl HostProfile {
    pub fn new(engine: RenderingEngine) -> Self {
        Self { engine }
    }
}

/// A typed notification about an editable element's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditableStateChange {
    ReadOnly(bool),
    Focused(bool),
}

pub(crate) type StateObserver = Box<dyn FnMut(&mut ViewWriter, ViewId, EditableStateChange)>;

#[derive(Debug, Clone)]
pub(crate) struct ViewEntry {
    pub(crate) parent: Option<ViewId>,
    pub(crate) node: ViewNode,
    pub(crate) children: Vec<ViewId>,
}

/// The rendered-view document.
pub struct ViewDocument {
    nodes: HashMap<ViewId, ViewEntry>,
    root: ViewId,
    selection: ViewSelection,
    focused: bool,
    host: HostProfile,
    pub(crate) observers: HashMap<ViewId, Vec<StateObserver>>,
}

impl ViewDocument {
    /// Create a view with a single editable `$root` element.
    pub fn new(host: HostProfile) -> Self {
        let root = Uuid::new_v4();
        let mut nodes = HashMap::new();
        let mut root_element = ViewElement::new("$root");
        root_element.editable = Some(EditableState::default());
        nodes.insert(
            root,
            ViewEntry {
                parent: None,
                node: ViewNode::Element(root_element),
                children: Vec::new(),
            },
        );
        Self {
            nodes,
            root,
            selection: ViewSelection::default(),
            focused: false,
            host,
            observers: HashMap::new(),
        }
    }

    pub fn root(&self) -> ViewId {
        self.root
    }

    pub fn host(&self) -> HostProfile {
        self.host
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(&id).map(|entry| &entry.node)
    }

    pub fn element(&self, id: ViewId) -> Option<&ViewElement> {
        self.get(id).and_then(ViewNode::as_element)
    }

    pub fn is_element(&self, id: ViewId) -> bool {
        self.get(id).is_some_and(ViewNode::is_element)
    }

    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.nodes.get(&id).and_then(|entry| entry.parent)
    }

    pub fn children(&self, id: ViewId) -> &[ViewId] {
        self.nodes
            .get(&id)
            .map(|entry| entry.children.as_slice())
            .unwrap_or(&[])
    }

    /// Number of ancestor hops from `id` to the root.
    pub fn depth(&self, id: ViewId) -> usize {
        let mut depth = 0;
        let mut current = self.parent(id);
        while let Some(node) = current {
            depth += 1;
            current = self.parent(node);
        }
        depth
    }

    /// Whether `ancestor` strictly contains `node`.
    pub fn is_ancestor_of(&self, ancestor: ViewId, node: ViewId) -> bool {
        let mut current = self.parent(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Parent chain of a node, nearest first.
    pub fn ancestors(&self, id: ViewId) -> Vec<ViewId> {
        let mut chain = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            chain.push(node);
            current = self.parent(node);
        }
        chain
    }

    pub fn selection(&self) -> &ViewSelection {
        &self.selection
    }

    /// Whether the host document has input focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Give the document input focus.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Open a writer over this document.
    pub fn writer(&mut self) -> ViewWriter<'_> {
        ViewWriter::new(self)
    }

    pub(crate) fn entry(&self, id: ViewId) -> Option<&ViewEntry> {
        self.nodes.get(&id)
    }

    pub(crate) fn entry_mut(&mut self, id: ViewId) -> Option<&mut ViewEntry> {
        self.nodes.get_mut(&id)
    }

    pub(crate) fn insert_entry(&mut self, id: ViewId, entry: ViewEntry) {
        self.nodes.insert(id, entry);
    }

    pub(crate) fn set_selection(&mut self, selection: ViewSelection) {
        self.selection = selection;
    }

    pub(crate) fn selection_mut(&mut self) -> &mut ViewSelection {
        &mut self.selection
    }
}
