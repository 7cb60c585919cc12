//! The surface an external path-selector evaluator works against.
//!
//! The path-expression grammar and its evaluation rules live outside this
//! crate. What a selector needs from the document model is collected here:
//! a context root, the namespace environment, and the deduplicating item
//! iteration of [`crate::walk`]. The find family runs an already-parsed
//! selector and keeps the element nodes it produced.

use std::collections::HashMap;

use schematree_model::SchemaNode;
use tracing::debug;

use crate::walk::{ContextItem, ContextIter, iter_context_items, iter_descendant_items};

/// Evaluation environment handed to a [`Selector`].
#[derive(Debug, Clone)]
pub struct QueryContext<N: SchemaNode> {
    root: N,
    namespaces: HashMap<String, String>,
}

impl<N: SchemaNode> QueryContext<N> {
    /// Context rooted at `root`, with the namespace environment seeded from
    /// the root's own prefix declarations.
    pub fn new(root: N) -> Self {
        QueryContextBuilder::new(root).build()
    }

    pub fn builder(root: N) -> QueryContextBuilder<N> {
        QueryContextBuilder::new(root)
    }

    pub fn root(&self) -> &N {
        &self.root
    }

    /// Prefix → URI bindings visible to the selector. The default namespace,
    /// when one was supplied, is registered under the empty prefix.
    pub fn namespaces(&self) -> &HashMap<String, String> {
        &self.namespaces
    }

    pub fn default_namespace(&self) -> Option<&str> {
        self.namespaces.get("").map(String::as_str)
    }

    /// Descendant-axis iteration over the context root: nodes and text.
    pub fn iter_descendants(&self) -> ContextIter<N> {
        iter_descendant_items(&self.root)
    }

    /// Full-context iteration: nodes, text, and attribute pairs.
    pub fn iter_context(&self) -> ContextIter<N> {
        iter_context_items(&self.root)
    }

    /// Runs `selector` against this context, yielding the matching element
    /// nodes in document order.
    pub fn iterfind<S>(&self, selector: &S) -> impl Iterator<Item = N> + use<N, S>
    where
        S: Selector<N>,
    {
        let items = selector.select(self);
        debug!(items = items.len(), "selector evaluated");
        items.into_iter().filter_map(ContextItem::into_node)
    }

    pub fn find<S>(&self, selector: &S) -> Option<N>
    where
        S: Selector<N>,
    {
        self.iterfind(selector).next()
    }

    pub fn findall<S>(&self, selector: &S) -> Vec<N>
    where
        S: Selector<N>,
    {
        self.iterfind(selector).collect()
    }
}

/// Builder for [`QueryContext`], for callers that need to override or extend
/// the namespace environment.
pub struct QueryContextBuilder<N: SchemaNode> {
    root: N,
    namespaces: HashMap<String, String>,
    default_namespace: Option<String>,
}

impl<N: SchemaNode> QueryContextBuilder<N> {
    pub fn new(root: N) -> Self {
        // Empty prefixes from the document are dropped; only an explicit
        // default namespace may occupy that slot.
        let namespaces = root
            .namespaces()
            .unwrap_or_default()
            .into_iter()
            .filter(|(prefix, _)| !prefix.is_empty())
            .collect();
        Self { root, namespaces, default_namespace: None }
    }

    pub fn namespace(mut self, prefix: &str, uri: &str) -> Self {
        if !prefix.is_empty() {
            self.namespaces.insert(prefix.to_string(), uri.to_string());
        }
        self
    }

    pub fn default_namespace(mut self, uri: &str) -> Self {
        self.default_namespace = Some(uri.to_string());
        self
    }

    pub fn build(self) -> QueryContext<N> {
        let mut namespaces = self.namespaces;
        if let Some(uri) = self.default_namespace {
            namespaces.insert(String::new(), uri);
        }
        QueryContext { root: self.root, namespaces }
    }
}

/// An already-parsed path expression, evaluated against a query context.
///
/// Implementations receive the document model — context iteration, tag
/// matching, attribute and namespace access — and return matching items in
/// document order.
pub trait Selector<N: SchemaNode> {
    fn select(&self, context: &QueryContext<N>) -> Vec<ContextItem<N>>;
}

/// Runs `selector` against a fresh context rooted at `root`, yielding the
/// matching element nodes in document order.
pub fn iterfind<N, S>(root: &N, selector: &S) -> impl Iterator<Item = N> + use<N, S>
where
    N: SchemaNode,
    S: Selector<N>,
{
    QueryContext::new(root.clone()).iterfind(selector)
}

/// First node matching `selector` under `root`, if any.
pub fn find<N, S>(root: &N, selector: &S) -> Option<N>
where
    N: SchemaNode,
    S: Selector<N>,
{
    iterfind(root, selector).next()
}

/// All nodes matching `selector` under `root`, in document order.
pub fn findall<N, S>(root: &N, selector: &S) -> Vec<N>
where
    N: SchemaNode,
    S: Selector<N>,
{
    iterfind(root, selector).collect()
}
