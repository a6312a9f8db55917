//! Rendered-view tree: what the host display surface shows. Mirrors the
//! model tree structurally but carries presentation state (classes,
//! attributes, custom properties, highlight stacks, editable state).

mod document;
mod element;
mod mapper;
mod selection;
mod writer;

pub use document::{EditableStateChange, HostProfile, RenderingEngine, ViewDocument};
pub use element::{
    EditableState, HighlightDescriptor, HighlightHandler, HighlightHandling, PropertyValue,
    ViewElement, ViewId, ViewNode, ViewText,
};
pub use mapper::{Mapper, render_selection};
pub use selection::{ViewPosition, ViewRange, ViewSelection};
pub use writer::ViewWriter;
