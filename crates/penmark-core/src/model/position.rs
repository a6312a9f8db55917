//! Positions in the model tree.

use super::document::ModelDocument;
use super::node::NodeId;
use serde::{Deserialize, Serialize};

/// A position inside a node's content.
///
/// For element parents the offset counts children; for text parents it
/// counts characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub parent: NodeId,
    pub offset: usize,
}

impl Position {
    pub fn new(parent: NodeId, offset: usize) -> Self {
        Self { parent, offset }
    }

    /// Position immediately before `node`, `None` for the root.
    pub fn before(doc: &ModelDocument, node: NodeId) -> Option<Self> {
        let parent = doc.parent(node)?;
        let index = doc.index_of(node)?;
        Some(Self::new(parent, index))
    }

    /// Position immediately after `node`, `None` for the root.
    pub fn after(doc: &ModelDocument, node: NodeId) -> Option<Self> {
        let parent = doc.parent(node)?;
        let index = doc.index_of(node)?;
        Some(Self::new(parent, index + 1))
    }

    /// Path of offsets from the document root down to this position.
    pub fn path(&self, doc: &ModelDocument) -> Vec<usize> {
        let mut path = vec![self.offset];
        let mut current = self.parent;
        while let Some(index) = doc.index_of(current) {
            path.push(index);
            current = match doc.parent(current) {
                Some(parent) => parent,
                None => break,
            };
        }
        path.reverse();
        path
    }

    /// Node directly before this position, if the parent is an element.
    pub fn node_before(&self, doc: &ModelDocument) -> Option<NodeId> {
        if self.offset == 0 {
            return None;
        }
        doc.node_at(self.parent, self.offset - 1)
    }

    /// Node directly after this position, if the parent is an element.
    pub fn node_after(&self, doc: &ModelDocument) -> Option<NodeId> {
        doc.node_at(self.parent, self.offset)
    }

    /// Whether this position touches the start of `ancestor`'s content,
    /// tolerating arbitrarily deep nesting: every step between the position
    /// and `ancestor` must sit at its container's start.
    pub fn touches_start_of(&self, doc: &ModelDocument, ancestor: NodeId) -> bool {
        let mut pos = *self;
        loop {
            if pos.offset != 0 {
                return false;
            }
            if pos.parent == ancestor {
                return true;
            }
            pos = match Position::before(doc, pos.parent) {
                Some(outer) => outer,
                None => return false,
            };
        }
    }

    /// Whether this position touches the end of `ancestor`'s content,
    /// tolerating arbitrarily deep nesting.
    pub fn touches_end_of(&self, doc: &ModelDocument, ancestor: NodeId) -> bool {
        let mut pos = *self;
        loop {
            if pos.offset != doc.node_length(pos.parent) {
                return false;
            }
            if pos.parent == ancestor {
                return true;
            }
            pos = match Position::after(doc, pos.parent) {
                Some(outer) => outer,
                None => return false,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_paragraphs() -> (ModelDocument, NodeId, NodeId) {
        let mut doc = ModelDocument::new();
        let root = doc.root();
        let (middle, text) = doc.change(|writer| {
            for _ in 0..1 {
                let first = writer.create_element("paragraph");
                writer.insert(first, root, 0);
            }
            let middle = writer.create_element("paragraph");
            writer.insert(middle, root, 1);
            let text = writer.insert_text("foo", middle, 0);
            let last = writer.create_element("paragraph");
            writer.insert(last, root, 2);
            (middle, text)
        });
        (doc, middle, text)
    }

    #[test]
    fn test_path() {
        let (doc, middle, text) = three_paragraphs();
        assert_eq!(Position::new(middle, 0).path(&doc), vec![1, 0]);
        assert_eq!(Position::new(text, 2).path(&doc), vec![1, 0, 2]);
    }

    #[test]
    fn test_touches_start_through_text() {
        let (doc, middle, text) = three_paragraphs();
        assert!(Position::new(text, 0).touches_start_of(&doc, middle));
        assert!(!Position::new(text, 1).touches_start_of(&doc, middle));
    }

    #[test]
    fn test_touches_end_through_text() {
        let (doc, middle, text) = three_paragraphs();
        assert!(Position::new(text, 3).touches_end_of(&doc, middle));
        assert!(!Position::new(text, 2).touches_end_of(&doc, middle));
    }

    #[test]
    fn test_touches_end_through_nested_wrapper() {
        let mut doc = ModelDocument::new();
        let root = doc.root();
        let (block, text) = doc.change(|writer| {
            let block = writer.create_element("paragraph");
            writer.insert(block, root, 0);
            let wrapper = writer.create_element("span");
            writer.insert(wrapper, block, 0);
            let text = writer.insert_text("hi", wrapper, 0);
            (block, text)
        });
        assert!(Position::new(text, 2).touches_end_of(&doc, block));
        assert!(Position::new(text, 0).touches_start_of(&doc, block));
    }
}
