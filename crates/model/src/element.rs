//! In-memory tree implementation of [`SchemaNode`].
//!
//! `Element` is a shared-ownership handle: cloning aliases the same node, and
//! the same element can be linked as a child of several parents. That is how
//! shared local subtrees and canonical global definitions are modeled. The
//! text/tail split follows the usual element-tree convention: `text` is
//! content before the first child, `tail` is content after the closing
//! boundary, before the next sibling.

use core::fmt;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

use crate::node::{MutableNode, NodeId, NodeKind, SchemaNode, Scope};

#[derive(Debug)]
struct Inner {
    kind: NodeKind,
    tag: String,
    scope: Scope,
    reference: Option<String>,
    namespaces: Option<HashMap<String, String>>,
    attributes: RwLock<BTreeMap<String, String>>,
    text: RwLock<Option<String>>,
    tail: RwLock<Option<String>>,
    children: RwLock<Vec<Element>>,
}

/// Shared-ownership tree node.
///
/// Equality and hashing follow node identity, not structure; structural
/// comparison lives in the query layer.
#[derive(Clone)]
pub struct Element(Arc<Inner>);

impl PartialEq for Element {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Element {}

impl Hash for Element {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.0.tag)
            .field("kind", &self.0.kind)
            .field("scope", &self.0.scope)
            .finish_non_exhaustive()
    }
}

impl Element {
    /// Starts building an element node.
    pub fn element(tag: &str) -> ElementBuilder {
        ElementBuilder::new(NodeKind::Element, tag)
    }

    /// Creates a comment node carrying `content` as its text.
    pub fn comment(content: &str) -> Element {
        ElementBuilder::new(NodeKind::Comment, "#comment").text(content).build()
    }

    /// Creates a processing-instruction node for `target` carrying `data`.
    pub fn processing_instruction(target: &str, data: &str) -> Element {
        ElementBuilder::new(NodeKind::ProcessingInstruction, target).text(data).build()
    }

    pub fn set_text(&self, text: Option<&str>) {
        if let Ok(mut slot) = self.0.text.write() {
            *slot = text.map(str::to_string);
        }
    }

    pub fn set_tail(&self, tail: Option<&str>) {
        if let Ok(mut slot) = self.0.tail.write() {
            *slot = tail.map(str::to_string);
        }
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        if let Ok(mut attrs) = self.0.attributes.write() {
            attrs.insert(name.to_string(), value.to_string());
        }
    }

    /// Appends `child` to this node's children. The child handle may already
    /// be linked elsewhere; the subtree is then shared, not copied.
    pub fn append(&self, child: Element) {
        if let Ok(mut children) = self.0.children.write() {
            children.push(child);
        }
    }
}

impl SchemaNode for Element {
    fn node_id(&self) -> NodeId {
        NodeId::from_addr(Arc::as_ptr(&self.0) as usize)
    }

    fn kind(&self) -> NodeKind {
        self.0.kind
    }

    fn tag(&self) -> String {
        self.0.tag.clone()
    }

    fn attributes(&self) -> BTreeMap<String, String> {
        self.0.attributes.read().map(|attrs| attrs.clone()).unwrap_or_default()
    }

    fn text(&self) -> Option<String> {
        self.0.text.read().ok().and_then(|slot| slot.clone())
    }

    fn tail(&self) -> Option<String> {
        self.0.tail.read().ok().and_then(|slot| slot.clone())
    }

    fn children(&self) -> Vec<Self> {
        self.0.children.read().map(|children| children.clone()).unwrap_or_default()
    }

    fn scope(&self) -> Scope {
        self.0.scope
    }

    fn reference(&self) -> Option<String> {
        self.0.reference.clone()
    }

    fn namespaces(&self) -> Option<HashMap<String, String>> {
        self.0.namespaces.clone()
    }
}

impl MutableNode for Element {
    fn retain_children(&self, keep: &mut dyn FnMut(&Self) -> bool) {
        if let Ok(mut children) = self.0.children.write() {
            children.retain(|child| keep(child));
        }
    }
}

/// Fluent construction for [`Element`] trees.
pub struct ElementBuilder {
    kind: NodeKind,
    tag: String,
    scope: Scope,
    reference: Option<String>,
    namespaces: Option<HashMap<String, String>>,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    tail: Option<String>,
    children: Vec<Element>,
}

impl ElementBuilder {
    fn new(kind: NodeKind, tag: &str) -> Self {
        Self {
            kind,
            tag: tag.to_string(),
            scope: Scope::Local,
            reference: None,
            namespaces: None,
            attributes: BTreeMap::new(),
            text: None,
            tail: None,
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn tail(mut self, tail: &str) -> Self {
        self.tail = Some(tail.to_string());
        self
    }

    pub fn child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = Element>,
    {
        self.children.extend(children);
        self
    }

    /// Marks the node as a canonical global definition; traversal re-expands
    /// it on every encounter.
    pub fn global(mut self) -> Self {
        self.scope = Scope::Global;
        self
    }

    /// Marks the node as a reference standing in for `target`; traversal
    /// yields it but never descends into it.
    pub fn reference(mut self, target: &str) -> Self {
        self.reference = Some(target.to_string());
        self
    }

    /// Declares a prefix → URI binding on the node.
    pub fn namespace(mut self, prefix: &str, uri: &str) -> Self {
        self.namespaces
            .get_or_insert_with(HashMap::new)
            .insert(prefix.to_string(), uri.to_string());
        self
    }

    pub fn build(self) -> Element {
        Element(Arc::new(Inner {
            kind: self.kind,
            tag: self.tag,
            scope: self.scope,
            reference: self.reference,
            namespaces: self.namespaces,
            attributes: RwLock::new(self.attributes),
            text: RwLock::new(self.text),
            tail: RwLock::new(self.tail),
            children: RwLock::new(self.children),
        }))
    }
}

impl From<ElementBuilder> for Element {
    fn from(builder: ElementBuilder) -> Self {
        builder.build()
    }
}

/// Shorthand for [`Element::element`], for concise tree literals.
pub fn elem(tag: &str) -> ElementBuilder {
    Element::element(tag)
}

/// Shorthand for [`Element::comment`].
pub fn comment(content: &str) -> Element {
    Element::comment(content)
}

/// Shorthand for [`Element::processing_instruction`].
pub fn pi(target: &str, data: &str) -> Element {
    Element::processing_instruction(target, data)
}
