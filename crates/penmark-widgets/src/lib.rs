//! Penmark Widgets
//!
//! Widget semantics on top of `penmark-core`: atomic, non-text-editable
//! elements (images, embeds) that behave as single selectable,
//! keyboard-navigable units inside a free-form document. The crate provides
//! the marking utilities features use to tag their elements, the highlight
//! and insertion-point helpers, the interaction state machine translating
//! input events into selection transitions, and the toolbar visibility
//! arbiter.

pub mod controller;
pub mod editor;
pub mod highlight;
pub mod insertion;
pub mod toolbar;
pub mod utils;

mod error;

pub use controller::{EditingContext, WidgetController};
pub use editor::Editor;
pub use error::WidgetError;
pub use highlight::{add_highlight, remove_highlight, set_highlight_handling};
pub use insertion::{find_optimal_insertion_position, insert_object};
pub use toolbar::{
    BalloonRequest, ContextualBalloon, PanelPosition, ToolbarOptions, ToolbarView,
    WidgetToolbarRepository,
};
pub use utils::{
    WIDGET_CLASS_NAME, WIDGET_SELECTED_CLASS_NAME, WidgetLabel, WidgetOptions, get_label,
    is_widget, mark_as_nested_editable, mark_as_widget, set_label,
};
