//! View writer: presentation mutation and editable-state observation.

use super::document::{EditableStateChange, StateObserver, ViewDocument, ViewEntry};
use super::element::{EditableState, PropertyValue, ViewElement, ViewId, ViewNode, ViewText};
use super::selection::ViewSelection;
use uuid::Uuid;

/// Mutation handle over a [`ViewDocument`].
pub struct ViewWriter<'a> {
    doc: &'a mut ViewDocument,
}

impl<'a> ViewWriter<'a> {
    pub(crate) fn new(doc: &'a mut ViewDocument) -> Self {
        Self { doc }
    }

    /// Read access to the document being written.
    pub fn doc(&self) -> &ViewDocument {
        self.doc
    }

    /// Create a detached plain element.
    pub fn create_element(&mut self, name: &str) -> ViewId {
        self.create(ViewNode::Element(ViewElement::new(name)))
    }

    /// Create a detached editable element (read-write, unfocused).
    pub fn create_editable(&mut self, name: &str) -> ViewId {
        let mut element = ViewElement::new(name);
        element.editable = Some(EditableState::default());
        self.create(ViewNode::Element(element))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, data: &str) -> ViewId {
        self.create(ViewNode::Text(ViewText {
            data: data.to_string(),
        }))
    }

    fn create(&mut self, node: ViewNode) -> ViewId {
        let id = Uuid::new_v4();
        self.doc.insert_entry(
            id,
            ViewEntry {
                parent: None,
                node,
                children: Vec::new(),
            },
        );
        id
    }

    /// Insert a detached node into `parent` at `offset`.
    pub fn insert(&mut self, node: ViewId, parent: ViewId, offset: usize) {
        if self.doc.entry(node).is_none() {
            log::warn!("view insert ignored: unknown node");
            return;
        }
        if let Some(entry) = self.doc.entry_mut(parent) {
            let offset = offset.min(entry.children.len());
            entry.children.insert(offset, node);
        } else {
            return;
        }
        if let Some(entry) = self.doc.entry_mut(node) {
            entry.parent = Some(parent);
        }
    }

    /// Insert a detached node as the last child of `parent`.
    pub fn append(&mut self, node: ViewId, parent: ViewId) {
        let offset = self.doc.children(parent).len();
        self.insert(node, parent, offset);
    }

    pub fn add_class(&mut self, id: ViewId, class: &str) {
        if let Some(element) = self.element_mut(id) {
            element.classes.insert(class.to_string());
        }
    }

    pub fn remove_class(&mut self, id: ViewId, class: &str) {
        if let Some(element) = self.element_mut(id) {
            element.classes.remove(class);
        }
    }

    pub fn set_attribute(&mut self, id: ViewId, key: &str, value: &str) {
        if let Some(element) = self.element_mut(id) {
            element.attributes.insert(key.to_string(), value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, id: ViewId, key: &str) {
        if let Some(element) = self.element_mut(id) {
            element.attributes.remove(key);
        }
    }

    /// Attach an arbitrary custom property to an element.
    pub fn set_custom_property(&mut self, id: ViewId, key: &str, value: PropertyValue) {
        if let Some(element) = self.element_mut(id) {
            element.custom_properties.insert(key.to_string(), value);
        }
    }

    /// Replace an element's highlight descriptor stack.
    pub fn set_highlight_stack(
        &mut self,
        id: ViewId,
        stack: Vec<super::element::HighlightDescriptor>,
    ) {
        if let Some(element) = self.element_mut(id) {
            element.highlight_stack = stack;
        }
    }

    /// Register an observer for an editable element's state changes, scoped
    /// to the element's lifetime.
    pub fn observe(
        &mut self,
        id: ViewId,
        observer: impl FnMut(&mut ViewWriter, ViewId, EditableStateChange) + 'static,
    ) {
        self.doc
            .observers
            .entry(id)
            .or_default()
            .push(Box::new(observer));
    }

    /// Change an editable element's read-only state, notifying observers.
    pub fn set_editable_read_only(&mut self, id: ViewId, read_only: bool) {
        let changed = match self.editable_mut(id) {
            Some(state) if state.read_only != read_only => {
                state.read_only = read_only;
                true
            }
            _ => false,
        };
        if changed {
            self.notify(id, EditableStateChange::ReadOnly(read_only));
        }
    }

    /// Change an editable element's focus state, notifying observers.
    pub fn set_editable_focused(&mut self, id: ViewId, focused: bool) {
        let changed = match self.editable_mut(id) {
            Some(state) if state.focused != focused => {
                state.focused = focused;
                true
            }
            _ => false,
        };
        if changed {
            self.notify(id, EditableStateChange::Focused(focused));
        }
    }

    /// Replace the view selection.
    pub fn set_selection(&mut self, selection: ViewSelection) {
        self.doc.set_selection(selection);
    }

    /// Turn the current selection into a fake (whole-node) selection
    /// carrying an accessible label.
    pub fn set_fake_selection_label(&mut self, label: String) {
        self.doc.selection_mut().set_fake(label);
    }

    fn notify(&mut self, id: ViewId, change: EditableStateChange) {
        let mut observers = self.doc.observers.remove(&id).unwrap_or_default();
        for observer in &mut observers {
            observer(self, id, change);
        }
        // Keep observers registered during the notification pass.
        let added = self.doc.observers.remove(&id).unwrap_or_default();
        observers.extend(added);
        if !observers.is_empty() {
            self.doc.observers.insert(id, observers);
        }
    }

    fn element_mut(&mut self, id: ViewId) -> Option<&mut ViewElement> {
        match self.doc.entry_mut(id) {
            Some(ViewEntry {
                node: ViewNode::Element(element),
                ..
            }) => Some(element),
            _ => None,
        }
    }

    fn editable_mut(&mut self, id: ViewId) -> Option<&mut EditableState> {
        self.element_mut(id).and_then(|el| el.editable.as_mut())
    }
}
