//! Penmark Core Library
//!
//! Document model tree, rendered-view tree and normalized input events for
//! the Penmark rich-text editor. The model tree is the abstract content the
//! user edits; the view tree is what gets rendered. Both are addressed by
//! uuid-backed node ids and mutated through writers so that structural edits
//! stay observable as atomic steps.

pub mod events;
pub mod model;
pub mod view;

pub use events::{
    DeleteEvent, Direction, EventInfo, Key, KeyDownEvent, Modifiers, MouseButton, PointerDownEvent,
    Priority,
};
pub use model::{ModelDocument, NodeId, Position, Range, Schema, Selection, Writer};
pub use view::{
    HighlightDescriptor, HighlightHandling, HostProfile, Mapper, PropertyValue, RenderingEngine,
    ViewDocument, ViewId, ViewPosition, ViewRange, ViewSelection, ViewWriter, render_selection,
};
