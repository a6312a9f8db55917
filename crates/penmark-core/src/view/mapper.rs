//! Model <-> view node mapping and default selection rendering.

use super::document::ViewDocument;
use super::element::ViewId;
use super::selection::{ViewPosition, ViewRange, ViewSelection};
use crate::model::{ModelDocument, Node, NodeId, Position, Range};
use std::collections::HashMap;

/// Bidirectional binding between model elements and view elements.
#[derive(Debug, Default)]
pub struct Mapper {
    model_to_view: HashMap<NodeId, ViewId>,
    view_to_model: HashMap<ViewId, NodeId>,
}

impl Mapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a model element to its rendered counterpart.
    pub fn bind(&mut self, model: NodeId, view: ViewId) {
        self.model_to_view.insert(model, view);
        self.view_to_model.insert(view, model);
    }

    /// Drop the binding for a model element.
    pub fn unbind(&mut self, model: NodeId) {
        if let Some(view) = self.model_to_view.remove(&model) {
            self.view_to_model.remove(&view);
        }
    }

    pub fn to_view(&self, model: NodeId) -> Option<ViewId> {
        self.model_to_view.get(&model).copied()
    }

    pub fn to_model(&self, view: ViewId) -> Option<NodeId> {
        self.view_to_model.get(&view).copied()
    }

    /// Map a model position parent-wise. Positions inside unmapped text
    /// nodes are lifted to the text node's element parent.
    pub fn to_view_position(&self, doc: &ModelDocument, pos: Position) -> Option<ViewPosition> {
        if let Some(view) = self.to_view(pos.parent) {
            return Some(ViewPosition::new(view, pos.offset));
        }
        if let Some(Node::Text(_)) = doc.get(pos.parent) {
            let parent = doc.parent(pos.parent)?;
            let index = doc.index_of(pos.parent)?;
            let view = self.to_view(parent)?;
            return Some(ViewPosition::new(view, index));
        }
        None
    }

    pub fn to_view_range(&self, doc: &ModelDocument, range: Range) -> Option<ViewRange> {
        Some(ViewRange::new(
            self.to_view_position(doc, range.start)?,
            self.to_view_position(doc, range.end)?,
        ))
    }
}

/// Default selection-rendering pass: map the model selection into the view
/// selection, clearing any fake-selection state. Widget post-processing runs
/// after this.
pub fn render_selection(model: &ModelDocument, mapper: &Mapper, view: &mut ViewDocument) {
    let ranges: Vec<ViewRange> = model
        .selection()
        .ranges()
        .iter()
        .filter_map(|&range| mapper.to_view_range(model, range))
        .collect();
    let mut writer = view.writer();
    writer.set_selection(ViewSelection::from_ranges(ranges));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::HostProfile;

    fn mapped_paragraph() -> (ModelDocument, ViewDocument, Mapper, NodeId, NodeId, ViewId) {
        let mut model = ModelDocument::new();
        let root = model.root();
        let (paragraph, text) = model.change(|writer| {
            let paragraph = writer.create_element("paragraph");
            writer.insert(paragraph, root, 0);
            let text = writer.insert_text("foo", paragraph, 0);
            (paragraph, text)
        });
        let mut view = ViewDocument::new(HostProfile::default());
        let view_root = view.root();
        let mut writer = view.writer();
        let p = writer.create_element("p");
        writer.append(p, view_root);
        drop(writer);
        let mut mapper = Mapper::new();
        mapper.bind(paragraph, p);
        (model, view, mapper, paragraph, text, p)
    }

    #[test]
    fn test_bind_and_unbind() {
        let (_, _, mut mapper, paragraph, _, p) = mapped_paragraph();
        assert_eq!(mapper.to_view(paragraph), Some(p));
        assert_eq!(mapper.to_model(p), Some(paragraph));

        // E.g. when the rendered counterpart is torn down.
        mapper.unbind(paragraph);
        assert_eq!(mapper.to_view(paragraph), None);
        assert_eq!(mapper.to_model(p), None);
    }

    #[test]
    fn test_position_in_text_lifts_to_element_parent() {
        let (model, _, mapper, paragraph, text, p) = mapped_paragraph();
        assert_eq!(
            mapper.to_view_position(&model, Position::new(paragraph, 1)),
            Some(ViewPosition::new(p, 1))
        );
        // Inside the unmapped text node: mapped parent-wise to the text
        // node's index in the paragraph.
        assert_eq!(
            mapper.to_view_position(&model, Position::new(text, 2)),
            Some(ViewPosition::new(p, 0))
        );
        // Unmapped element parent.
        assert_eq!(
            mapper.to_view_position(&model, Position::new(model.root(), 0)),
            None
        );
    }
}
