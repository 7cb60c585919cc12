pub mod compare;
pub mod context;
pub mod path;
pub mod prune;
pub mod walk;

pub use compare::{CompareOptions, ElementsMismatch, assert_elements_equal};
pub use context::{QueryContext, QueryContextBuilder, Selector, find, findall, iterfind};
pub use path::{PathIter, iter_paths, node_path, parent_node_path, resolve_path};
pub use prune::{prune, try_prune};
pub use walk::{
    ChildIter, ContextItem, ContextIter, DescendantIter, iter_children, iter_context_items,
    iter_descendant_items, iter_nodes,
};
