//! Sibling-index-qualified paths between a node and its descendants.
//!
//! A path is a `/`-separated segment list rooted at `.` (relative style) or
//! `/`. A segment is a child's tag, qualified with a 1-based `[k]` ordinal
//! when the tag occurs more than once among its element siblings, so
//! `./b[2]/c` names the `c` child of the second `b` child. Paths are
//! computed over the deduplicating traversal of [`crate::walk`]: a node
//! reachable only through an already-expanded shared subtree or behind a
//! reference has no path.

use std::collections::{HashMap, HashSet};

use compact_str::{CompactString, format_compact};
use schematree_model::{NodeId, NodeKind, SchemaNode};
use smallvec::SmallVec;

use crate::walk::{ChildAction, active_filter, classify};

struct PathStep<N> {
    node: N,
    path: CompactString,
}

/// Lazy (node, path) iteration in document order under the deduplication
/// rules. Comment and processing-instruction children are skipped, both for
/// traversal and for sibling ordinal counting.
pub struct PathIter<N: SchemaNode> {
    stack: SmallVec<[PathStep<N>; 16]>,
    expanded: HashSet<NodeId>,
    tag: Option<String>,
    pending_root: Option<(N, CompactString)>,
}

/// Iterates `root` and its subtree, pairing each yielded node with its path
/// from `root`. `tag` filters the yields (`None`/`"*"` disable filtering);
/// `base` selects the root marker (`None` or `""` mean `"."`).
pub fn iter_paths<N: SchemaNode>(
    root: &N,
    tag: Option<&str>,
    base: Option<&str>,
) -> PathIter<N> {
    let base = match base {
        None | Some("") => CompactString::const_new("."),
        Some(base) => CompactString::from(base),
    };
    PathIter {
        stack: SmallVec::new(),
        expanded: HashSet::new(),
        tag: active_filter(tag),
        pending_root: Some((root.clone(), base)),
    }
}

impl<N: SchemaNode> PathIter<N> {
    fn admits(&self, node: &N) -> bool {
        match &self.tag {
            Some(tag) => node.matches(tag, None),
            None => true,
        }
    }

    /// Schedules the element children of an expanded node, assigning each
    /// its path segment. Ordinals are positional facts: a child that later
    /// turns out to be a duplicate still consumes its `[k]` slot.
    fn schedule_children(&mut self, node: &N, base: &CompactString) {
        let children: Vec<N> =
            node.children().into_iter().filter(|c| c.kind() == NodeKind::Element).collect();

        let mut totals: HashMap<String, usize> = HashMap::new();
        for child in &children {
            *totals.entry(child.tag()).or_insert(0) += 1;
        }

        let mut ordinals: HashMap<String, usize> = HashMap::new();
        let mut steps: SmallVec<[PathStep<N>; 8]> = SmallVec::new();
        for child in children {
            let tag = child.tag();
            let ordinal = ordinals.entry(tag.clone()).or_insert(0);
            *ordinal += 1;
            let path = if totals[&tag] > 1 {
                join(base, &format_compact!("{tag}[{ordinal}]"))
            } else {
                join(base, &tag)
            };
            steps.push(PathStep { node: child, path });
        }
        while let Some(step) = steps.pop() {
            self.stack.push(step);
        }
    }
}

fn join(base: &CompactString, segment: &str) -> CompactString {
    if base == "/" { format_compact!("/{segment}") } else { format_compact!("{base}/{segment}") }
}

impl<N: SchemaNode> Iterator for PathIter<N> {
    type Item = (N, String);

    fn next(&mut self) -> Option<(N, String)> {
        if let Some((root, base)) = self.pending_root.take() {
            self.schedule_children(&root, &base);
            if self.admits(&root) {
                return Some((root, base.into_string()));
            }
        }
        loop {
            let PathStep { node, path } = self.stack.pop()?;
            match classify(&node, &mut self.expanded) {
                ChildAction::Expand => self.schedule_children(&node, &path),
                ChildAction::YieldOnly => {}
                ChildAction::Skip => continue,
            }
            if self.admits(&node) {
                return Some((node, path.into_string()));
            }
        }
    }
}

/// Path from `ancestor` down to `node`, or `None` when `node` is not
/// reachable from `ancestor` under the deduplication rules. The path of
/// `ancestor` itself is `"."`.
pub fn node_path<N: SchemaNode>(node: &N, ancestor: &N) -> Option<String> {
    let target = node.node_id();
    let tag = node.tag();
    iter_paths(ancestor, Some(tag.as_str()), None)
        .find(|(candidate, _)| candidate.node_id() == target)
        .map(|(_, path)| path)
}

/// Path from `ancestor` to the parent of `node`: `"."` when `node` is a
/// direct child of `ancestor`, `None` when `node` is `ancestor` itself (an
/// ancestor has no parent within the traversal) or is not reachable.
pub fn parent_node_path<N: SchemaNode>(node: &N, ancestor: &N) -> Option<String> {
    let target = node.node_id();
    if target == ancestor.node_id() {
        return None;
    }
    iter_paths(ancestor, None, None)
        .find(|(candidate, _)| {
            candidate.children().iter().any(|child| child.node_id() == target)
        })
        .map(|(_, path)| path)
}

/// Resolves a path produced by [`node_path`] or [`iter_paths`] back to its
/// node, by walking the same enumeration and matching the normalized path
/// string. `""` and `"."` name `ancestor` itself; a leading `/` selects the
/// absolute-style root marker.
pub fn resolve_path<N: SchemaNode>(ancestor: &N, path: &str) -> Option<N> {
    let (base, wanted) = normalize(path);
    iter_paths(ancestor, None, Some(base))
        .find(|(_, candidate)| candidate == &wanted)
        .map(|(node, _)| node)
}

fn normalize(path: &str) -> (&'static str, String) {
    let path = path.trim();
    if path.is_empty() || path == "." {
        (".", ".".to_string())
    } else if path.starts_with('/') {
        ("/", path.to_string())
    } else if path.starts_with("./") {
        (".", path.to_string())
    } else {
        (".", format!("./{path}"))
    }
}
