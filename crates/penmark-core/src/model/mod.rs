//! Abstract content model: an element/text tree with positions, ranges,
//! a document selection, a schema and transactional mutation.

mod document;
mod node;
mod position;
mod range;
mod schema;
mod selection;
mod writer;

pub use document::ModelDocument;
pub use node::{Element, Node, NodeId, Text};
pub use position::Position;
pub use range::Range;
pub use schema::{ElementDefinition, Schema};
pub use selection::Selection;
pub use writer::Writer;
