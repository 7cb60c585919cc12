//! Deduplicating depth-first traversal.
//!
//! Trees handled here break two assumptions ordinary walkers make: the same
//! local node can be linked as a child of several parents, and reference
//! nodes stand in for definitions living elsewhere in the tree. The
//! expansion rules, applied to each child at its visit in document order:
//!
//! - a global child is recursed into unconditionally — every occurrence of a
//!   canonical definition counts as a new occurrence;
//! - a reference child is yielded as a leaf and never expanded;
//! - a local child is expanded on its first encounter within the traversal
//!   call and skipped entirely afterwards, which also breaks cycles.
//!
//! The first-encounter registry is keyed by node identity, lives for one
//! traversal call, and is discarded with the iterator. Registration happens
//! when a child is visited, not when it is scheduled, so the surviving
//! occurrence of a shared node is always the first one in document order.
//! Iterators are pull-based over an explicit work stack, so deep trees
//! cannot overflow the call stack and an abandoned iterator leaks nothing.

use std::collections::HashSet;

use schematree_model::{NodeId, SchemaNode};
use smallvec::SmallVec;
use tracing::trace;

/// Item produced by context-mode traversal: element nodes interleaved with
/// their text content and attribute pairs, the shape a path-selector
/// evaluator consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContextItem<N> {
    Node(N),
    Text(String),
    Attribute(String, String),
}

impl<N> ContextItem<N> {
    pub fn as_node(&self) -> Option<&N> {
        match self {
            ContextItem::Node(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<N> {
        match self {
            ContextItem::Node(node) => Some(node),
            _ => None,
        }
    }
}

/// Normalizes a tag filter: `None` and `"*"` disable filtering.
pub(crate) fn active_filter(tag: Option<&str>) -> Option<String> {
    match tag {
        None | Some("*") => None,
        Some(tag) => Some(tag.to_string()),
    }
}

pub(crate) enum ChildAction {
    Expand,
    YieldOnly,
    Skip,
}

/// Applies the shared-node rules to one visited child. The global check
/// precedes the reference check; a node flagged as both is treated as
/// global.
pub(crate) fn classify<N: SchemaNode>(child: &N, expanded: &mut HashSet<NodeId>) -> ChildAction {
    if child.is_global() {
        ChildAction::Expand
    } else if child.is_reference() {
        ChildAction::YieldOnly
    } else if expanded.insert(child.node_id()) {
        ChildAction::Expand
    } else {
        ChildAction::Skip
    }
}

/// Lazy, one-shot, deduplicating node iteration in document order.
pub struct DescendantIter<N: SchemaNode> {
    stack: SmallVec<[N; 16]>,
    expanded: HashSet<NodeId>,
    tag: Option<String>,
    pending_root: Option<N>,
}

/// Iterates `root` and its subtree under the deduplication rules, yielding
/// nodes whose tag matches `tag` (`None` or `"*"` yield every node).
pub fn iter_nodes<N: SchemaNode>(root: &N, tag: Option<&str>) -> DescendantIter<N> {
    let tag = active_filter(tag);
    trace!(tag = tag.as_deref().unwrap_or("*"), "starting node traversal");
    DescendantIter {
        stack: SmallVec::new(),
        expanded: HashSet::new(),
        tag,
        pending_root: Some(root.clone()),
    }
}

fn schedule_children<N: SchemaNode>(stack: &mut SmallVec<[N; 16]>, node: &N) {
    let mut children = node.children();
    while let Some(child) = children.pop() {
        stack.push(child);
    }
}

impl<N: SchemaNode> DescendantIter<N> {
    fn admits(&self, node: &N) -> bool {
        match &self.tag {
            Some(tag) => node.matches(tag, None),
            None => true,
        }
    }
}

impl<N: SchemaNode> Iterator for DescendantIter<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        // The traversal root is always visited and never registered.
        if let Some(root) = self.pending_root.take() {
            schedule_children(&mut self.stack, &root);
            if self.admits(&root) {
                return Some(root);
            }
        }
        loop {
            let node = self.stack.pop()?;
            match classify(&node, &mut self.expanded) {
                ChildAction::Expand => schedule_children(&mut self.stack, &node),
                ChildAction::YieldOnly => {}
                ChildAction::Skip => continue,
            }
            if self.admits(&node) {
                return Some(node);
            }
        }
    }
}

enum Task<N> {
    Child(N),
    Text(String),
    Attribute(String, String),
}

/// Lazy item iteration for selector evaluation: nodes interleaved with text
/// and, in context mode, attribute pairs.
pub struct ContextIter<N: SchemaNode> {
    stack: SmallVec<[Task<N>; 16]>,
    expanded: HashSet<NodeId>,
    with_attributes: bool,
    pending_root: Option<N>,
}

/// Descendant-axis iteration: nodes and their text content, no attributes.
pub fn iter_descendant_items<N: SchemaNode>(root: &N) -> ContextIter<N> {
    ContextIter::new(root, false)
}

/// Full-context iteration: nodes, text content, and attribute pairs.
pub fn iter_context_items<N: SchemaNode>(root: &N) -> ContextIter<N> {
    ContextIter::new(root, true)
}

impl<N: SchemaNode> ContextIter<N> {
    fn new(root: &N, with_attributes: bool) -> Self {
        trace!(with_attributes, "starting context traversal");
        ContextIter {
            stack: SmallVec::new(),
            expanded: HashSet::new(),
            with_attributes,
            pending_root: Some(root.clone()),
        }
    }

    /// Schedules the follow-up items of an expanded node. Pushed in reverse
    /// of the order they must surface — children, then attributes, then
    /// text — so the LIFO stack pops text before attributes before
    /// children.
    fn push_follow_ups(&mut self, node: &N) {
        let mut children = node.children();
        while let Some(child) = children.pop() {
            self.stack.push(Task::Child(child));
        }
        if self.with_attributes {
            for (name, value) in node.attributes().into_iter().rev() {
                self.stack.push(Task::Attribute(name, value));
            }
        }
        if let Some(text) = node.text() {
            self.stack.push(Task::Text(text));
        }
    }
}

impl<N: SchemaNode> Iterator for ContextIter<N> {
    type Item = ContextItem<N>;

    fn next(&mut self) -> Option<ContextItem<N>> {
        if let Some(root) = self.pending_root.take() {
            self.push_follow_ups(&root);
            return Some(ContextItem::Node(root));
        }
        loop {
            return Some(match self.stack.pop()? {
                Task::Child(node) => match classify(&node, &mut self.expanded) {
                    ChildAction::Expand => {
                        self.push_follow_ups(&node);
                        ContextItem::Node(node)
                    }
                    ChildAction::YieldOnly => ContextItem::Node(node),
                    ChildAction::Skip => continue,
                },
                Task::Text(text) => ContextItem::Text(text),
                Task::Attribute(name, value) => ContextItem::Attribute(name, value),
            });
        }
    }
}

/// Direct-children iteration with the usual tag filter semantics.
pub struct ChildIter<N: SchemaNode> {
    children: std::vec::IntoIter<N>,
    tag: Option<String>,
}

pub fn iter_children<N: SchemaNode>(parent: &N, tag: Option<&str>) -> ChildIter<N> {
    ChildIter { children: parent.children().into_iter(), tag: active_filter(tag) }
}

impl<N: SchemaNode> Iterator for ChildIter<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let tag = &self.tag;
        self.children.by_ref().find(|child| match tag {
            Some(tag) => child.matches(tag, None),
            None => true,
        })
    }
}
