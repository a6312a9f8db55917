//! Document selection.

use super::document::ModelDocument;
use super::node::{Node, NodeId};
use super::position::Position;
use super::range::Range;
use serde::{Deserialize, Serialize};

/// The document selection: an ordered list of ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    ranges: Vec<Range>,
}

impl Selection {
    /// Collapsed selection (a caret) at a position.
    pub fn collapsed_at(position: Position) -> Self {
        Self {
            ranges: vec![Range::collapsed(position)],
        }
    }

    pub fn from_range(range: Range) -> Self {
        Self {
            ranges: vec![range],
        }
    }

    pub fn from_ranges(ranges: Vec<Range>) -> Self {
        Self { ranges }
    }

    /// Selection covering exactly one node.
    pub fn on_node(doc: &ModelDocument, node: NodeId) -> Option<Self> {
        Range::on_node(doc, node).map(Self::from_range)
    }

    pub fn ranges(&self) -> &[Range] {
        &self.ranges
    }

    pub fn is_collapsed(&self) -> bool {
        self.ranges.iter().all(Range::is_collapsed)
    }

    /// Where the selection started.
    pub fn anchor(&self) -> Option<Position> {
        self.ranges.first().map(|range| range.start)
    }

    /// Where the caret sits.
    pub fn focus(&self) -> Option<Position> {
        self.ranges.last().map(|range| range.end)
    }

    /// The single element the whole selection exactly covers, if any.
    pub fn selected_element(&self, doc: &ModelDocument) -> Option<NodeId> {
        if self.ranges.len() != 1 {
            return None;
        }
        let node = self.ranges[0].selected_node(doc)?;
        match doc.get(node) {
            Some(Node::Element(_)) => Some(node),
            _ => None,
        }
    }
}
