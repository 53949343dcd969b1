//! DOM arena: slotmap-backed HTML tree with parsing, selector queries and serialization.

pub mod html;
pub mod node;
pub mod query;
pub mod serialize;
pub mod tree;

pub use html::HtmlError;
pub use node::{ElementData, NodeData, NodeId};
pub use tree::{Dom, DomError};
