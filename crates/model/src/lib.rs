pub mod element;
pub mod name;
pub mod node;

pub use element::{Element, ElementBuilder, comment, elem, pi};
pub use name::{NameError, QualifiedName};
pub use node::{MutableNode, NodeId, NodeKind, SchemaNode, Scope};
