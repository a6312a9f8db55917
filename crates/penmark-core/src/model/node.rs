//! Model tree node definitions.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier of a model node.
pub type NodeId = Uuid;

/// A node in the model tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Node {
    Element(Element),
    Text(Text),
}

impl Node {
    /// Element name, or `None` for text nodes.
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::Element(el) => Some(&el.name),
            Node::Text(_) => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self, Node::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    /// Length of the node's content: child count for elements, character
    /// count for text.
    pub fn len(&self) -> usize {
        match self {
            Node::Element(el) => el.children.len(),
            Node::Text(text) => text.data.chars().count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named element with attributes and ordered children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<NodeId>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: HashMap::new(),
            children: Vec::new(),
        }
    }
}

/// A run of text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Text {
    pub data: String,
}

impl Text {
    pub fn new(data: impl Into<String>) -> Self {
        Self { data: data.into() }
    }
}
