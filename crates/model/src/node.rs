use core::fmt;
use std::collections::{BTreeMap, HashMap};

use crate::name::{NameError, QualifiedName};

/// Classifies tree nodes.
///
/// Comments and processing instructions take part in plain traversal but are
/// skipped by path computation and, optionally, by the structural comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Element,
    Comment,
    ProcessingInstruction,
}

/// Scope of a node definition.
///
/// `Global` nodes are canonical definitions that may be the expansion target
/// of any number of reference nodes; every encounter during a traversal
/// expands them again. `Local` nodes belong to one structural position and
/// are expanded at most once per traversal call, even when the same node is
/// linked from several parents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Scope {
    #[default]
    Local,
    Global,
}

/// Opaque node identity handle.
///
/// Identity is distinct from structural equality: two structurally identical
/// nodes carry different ids, while one shared node reached through two
/// parents carries the same id. Traversal dedup registries key on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    pub fn as_usize(self) -> usize {
        self.0
    }
}

/// Capability set every tree node exposes to the traversal layer.
///
/// Implementations are cheap-to-clone handles; `children` and `attributes`
/// return owned snapshots so the walker never borrows into the tree.
/// Equality on an implementation may be identity equality — structural
/// comparison is a separate concern.
pub trait SchemaNode: Clone + PartialEq + Eq + fmt::Debug {
    /// Stable identity of this node for the lifetime of the tree.
    fn node_id(&self) -> NodeId;

    fn kind(&self) -> NodeKind;

    /// Tag name, in Clark notation (`{uri}local`) when namespaced.
    fn tag(&self) -> String;

    /// The tag split into namespace URI and local part.
    fn qualified_name(&self) -> Result<QualifiedName, NameError> {
        QualifiedName::parse(&self.tag())
    }

    fn attributes(&self) -> BTreeMap<String, String>;

    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes().get(name).cloned()
    }

    /// Content immediately inside the node, before its first child.
    fn text(&self) -> Option<String>;

    /// Content after the node's closing boundary, before the next sibling.
    fn tail(&self) -> Option<String>;

    /// Direct children in document order.
    fn children(&self) -> Vec<Self>;

    fn child(&self, index: usize) -> Option<Self> {
        self.children().into_iter().nth(index)
    }

    fn child_count(&self) -> usize {
        self.children().len()
    }

    fn scope(&self) -> Scope {
        Scope::Local
    }

    fn is_global(&self) -> bool {
        self.scope() == Scope::Global
    }

    /// Name of the node this one stands in for, if any. A `Some` value gives
    /// the node reference semantics: traversal yields it but never descends
    /// into its children.
    fn reference(&self) -> Option<String> {
        None
    }

    fn is_reference(&self) -> bool {
        self.reference().is_some()
    }

    /// Prefix → URI bindings declared on this node, when it carries any.
    fn namespaces(&self) -> Option<HashMap<String, String>> {
        None
    }

    /// Tag predicate used by tag filters and selector evaluation.
    ///
    /// A Clark-qualified pattern must equal the tag exactly. An unqualified
    /// pattern matches the bare tag, or its expansion in `default_namespace`
    /// when one is supplied.
    fn matches(&self, tag: &str, default_namespace: Option<&str>) -> bool {
        if tag.starts_with('{') {
            self.tag() == tag
        } else {
            match default_namespace {
                Some(uri) if !uri.is_empty() => {
                    let own = self.tag();
                    own == tag || own == QualifiedName::qualified(uri, tag)
                }
                _ => self.tag() == tag,
            }
        }
    }
}

/// Extension for node models that support in-place child removal.
pub trait MutableNode: SchemaNode {
    /// Keeps only the direct children for which `keep` returns `true`,
    /// preserving document order. Removal must be safe for multiple
    /// non-contiguous siblings in one pass.
    fn retain_children(&self, keep: &mut dyn FnMut(&Self) -> bool);
}
