//! Widget subsystem errors.

use thiserror::Error;

/// Programming-time integration mistakes. Runtime "not applicable"
/// conditions are never errors; handlers simply report not-handled.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// A toolbar was registered twice under the same id.
    #[error("widget toolbar is already registered: {id}")]
    DuplicateToolbar { id: String },
}
