//! View selection: rendered ranges plus the fake-selection state.

use super::document::ViewDocument;
use super::element::ViewId;
use serde::{Deserialize, Serialize};

/// A position inside a view node's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewPosition {
    pub parent: ViewId,
    pub offset: usize,
}

impl ViewPosition {
    pub fn new(parent: ViewId, offset: usize) -> Self {
        Self { parent, offset }
    }
}

/// A range between two view positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewRange {
    pub start: ViewPosition,
    pub end: ViewPosition,
}

impl ViewRange {
    pub fn new(start: ViewPosition, end: ViewPosition) -> Self {
        Self { start, end }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// The single node this range exactly covers, if any.
    pub fn selected_node(&self, doc: &ViewDocument) -> Option<ViewId> {
        if self.start.parent != self.end.parent || self.end.offset != self.start.offset + 1 {
            return None;
        }
        doc.children(self.start.parent)
            .get(self.start.offset)
            .copied()
    }

    /// Nodes contained in the range, in document order; ancestors always
    /// precede their descendants. A container holding the range start is
    /// only partially covered and is not included; a container the range
    /// end reaches into is.
    pub fn items(&self, doc: &ViewDocument) -> Vec<ViewId> {
        if self.is_collapsed() {
            return Vec::new();
        }
        let mut items = Vec::new();
        if self.start.parent == self.end.parent {
            for &child in doc
                .children(self.start.parent)
                .get(self.start.offset..self.end.offset)
                .unwrap_or(&[])
            {
                collect_subtree(doc, child, &mut items);
            }
            return items;
        }

        let start_chain = chain_to_root(doc, self.start.parent);
        let end_chain = chain_to_root(doc, self.end.parent);
        let ancestor = start_chain
            .iter()
            .find(|id| end_chain.contains(id))
            .copied()
            .unwrap_or(doc.root());

        // Climb out of the start branch. At each level only the siblings
        // after the position belong to the range; the containers being left
        // stay out.
        let mut pos = self.start;
        while pos.parent != ancestor {
            for &child in doc.children(pos.parent).get(pos.offset..).unwrap_or(&[]) {
                collect_subtree(doc, child, &mut items);
            }
            let Some(parent) = doc.parent(pos.parent) else {
                return items;
            };
            let index = doc
                .children(parent)
                .iter()
                .position(|&child| child == pos.parent)
                .unwrap_or(0);
            pos = ViewPosition::new(parent, index + 1);
        }

        let hi = if self.end.parent == ancestor {
            self.end.offset
        } else {
            branch_index(doc, ancestor, &end_chain)
                .map_or_else(|| doc.children(ancestor).len(), |i| i + 1)
        };
        for &child in doc
            .children(ancestor)
            .get(pos.offset..hi.max(pos.offset))
            .unwrap_or(&[])
        {
            collect_subtree(doc, child, &mut items);
        }
        items
    }
}

fn chain_to_root(doc: &ViewDocument, id: ViewId) -> Vec<ViewId> {
    let mut chain = vec![id];
    chain.extend(doc.ancestors(id));
    chain
}

/// Index, among `ancestor`'s children, of the chain entry directly below it.
fn branch_index(doc: &ViewDocument, ancestor: ViewId, chain: &[ViewId]) -> Option<usize> {
    let below = chain
        .iter()
        .copied()
        .take_while(|&id| id != ancestor)
        .last()?;
    doc.children(ancestor).iter().position(|&c| c == below)
}

fn collect_subtree(doc: &ViewDocument, id: ViewId, out: &mut Vec<ViewId>) {
    out.push(id);
    for &child in doc.children(id) {
        collect_subtree(doc, child, out);
    }
}

/// The rendered selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSelection {
    ranges: Vec<ViewRange>,
    fake_label: Option<String>,
}

impl ViewSelection {
    pub fn from_ranges(ranges: Vec<ViewRange>) -> Self {
        Self {
            ranges,
            fake_label: None,
        }
    }

    pub fn ranges(&self) -> &[ViewRange] {
        &self.ranges
    }

    pub fn is_collapsed(&self) -> bool {
        self.ranges.iter().all(ViewRange::is_collapsed)
    }

    /// The single element the whole selection exactly covers, if any.
    pub fn selected_element(&self, doc: &ViewDocument) -> Option<ViewId> {
        if self.ranges.len() != 1 {
            return None;
        }
        let node = self.ranges[0].selected_node(doc)?;
        doc.is_element(node).then_some(node)
    }

    /// Whether the selection is rendered as a fake (non-native) selection.
    pub fn is_fake(&self) -> bool {
        self.fake_label.is_some()
    }

    /// Accessible label of the fake selection; empty when not fake.
    pub fn fake_label(&self) -> &str {
        self.fake_label.as_deref().unwrap_or("")
    }

    pub(crate) fn set_fake(&mut self, label: String) {
        self.fake_label = Some(label);
    }
}
