//! View tree node definitions and per-node presentation state.

use super::writer::ViewWriter;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Unique identifier of a view node.
pub type ViewId = Uuid;

/// A node in the view tree.
#[derive(Debug, Clone)]
pub enum ViewNode {
    Element(ViewElement),
    Text(ViewText),
}

impl ViewNode {
    pub fn is_element(&self) -> bool {
        matches!(self, ViewNode::Element(_))
    }

    pub fn as_element(&self) -> Option<&ViewElement> {
        match self {
            ViewNode::Element(el) => Some(el),
            ViewNode::Text(_) => None,
        }
    }
}

/// A run of rendered text.
#[derive(Debug, Clone)]
pub struct ViewText {
    pub data: String,
}

/// Observable state of an editable region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditableState {
    pub read_only: bool,
    pub focused: bool,
}

/// A rendered element.
#[derive(Clone, Default)]
pub struct ViewElement {
    pub name: String,
    pub(crate) classes: BTreeSet<String>,
    pub(crate) attributes: HashMap<String, String>,
    pub(crate) custom_properties: HashMap<String, PropertyValue>,
    pub(crate) highlight_stack: Vec<HighlightDescriptor>,
    pub(crate) editable: Option<EditableState>,
}

impl ViewElement {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn custom_property(&self, key: &str) -> Option<&PropertyValue> {
        self.custom_properties.get(key)
    }

    /// Active highlight descriptors, in insertion order.
    pub fn highlight_stack(&self) -> &[HighlightDescriptor] {
        &self.highlight_stack
    }

    /// Editable-region state; `None` for plain elements.
    pub fn editable_state(&self) -> Option<EditableState> {
        self.editable
    }
}

impl fmt::Debug for ViewElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ViewElement")
            .field("name", &self.name)
            .field("classes", &self.classes)
            .field("attributes", &self.attributes)
            .field("custom_properties", &self.custom_properties.keys())
            .field("highlight_stack", &self.highlight_stack)
            .field("editable", &self.editable)
            .finish()
    }
}

/// A custom per-node property value. Function-valued variants compare by
/// identity, not by content.
#[derive(Clone)]
pub enum PropertyValue {
    Bool(bool),
    Str(String),
    /// A zero-argument string producer (dynamic labels).
    StringFn(Rc<dyn Fn() -> String>),
    /// Highlight add/remove strategy.
    Highlight(Rc<HighlightHandling>),
    /// Text-filler offset reporting function.
    FillerOffset(Rc<dyn Fn() -> Option<usize>>),
}

impl PropertyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropertyValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

impl PartialEq for PropertyValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a == b,
            (PropertyValue::Str(a), PropertyValue::Str(b)) => a == b,
            (PropertyValue::StringFn(a), PropertyValue::StringFn(b)) => Rc::ptr_eq(a, b),
            (PropertyValue::Highlight(a), PropertyValue::Highlight(b)) => Rc::ptr_eq(a, b),
            (PropertyValue::FillerOffset(a), PropertyValue::FillerOffset(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(value) => write!(f, "Bool({value})"),
            PropertyValue::Str(value) => write!(f, "Str({value:?})"),
            PropertyValue::StringFn(_) => write!(f, "StringFn(..)"),
            PropertyValue::Highlight(_) => write!(f, "Highlight(..)"),
            PropertyValue::FillerOffset(_) => write!(f, "FillerOffset(..)"),
        }
    }
}

/// A prioritized visual-state request competing for a node's highlight
/// appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightDescriptor {
    /// Unique among active descriptors on one node.
    pub id: String,
    /// Numerically higher wins; ties keep the earliest-added descriptor.
    pub priority: i32,
    /// CSS-like classes applied while this descriptor is active.
    pub classes: Vec<String>,
}

impl HighlightDescriptor {
    pub fn new(id: impl Into<String>, priority: i32, class: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            priority,
            classes: vec![class.into()],
        }
    }

    pub fn with_classes(
        id: impl Into<String>,
        priority: i32,
        classes: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            id: id.into(),
            priority,
            classes: classes.into_iter().collect(),
        }
    }
}

/// Callback applying or tearing down a highlight visual.
pub type HighlightHandler = Rc<dyn Fn(&mut ViewWriter, ViewId, &HighlightDescriptor)>;

/// Per-node highlight strategy stored as a custom property.
pub struct HighlightHandling {
    pub add: HighlightHandler,
    pub remove: HighlightHandler,
}
