//! In-place removal of subtrees matching a predicate.

use std::convert::Infallible;

use schematree_model::MutableNode;
use tracing::trace;

/// Detaches every descendant subtree whose root satisfies `selector`.
///
/// Evaluation is top-down with skip-on-match: a matching child is removed
/// from its parent's child list and its descendants are neither tested nor
/// visited, while the children of non-matching nodes are scanned in
/// document order. The root itself is never tested. Multiple non-contiguous
/// siblings can be removed in one pass.
pub fn prune<N, F>(root: &N, mut selector: F)
where
    N: MutableNode,
    F: FnMut(&N) -> bool,
{
    try_prune::<_, _, Infallible>(root, |node| Ok(selector(node)))
        .unwrap_or_else(|err| match err {})
}

/// Fallible-selector variant of [`prune`]. The first selector error
/// propagates immediately; subtrees already detached stay detached and no
/// partial-application guarantees are made beyond that.
pub fn try_prune<N, F, E>(root: &N, mut selector: F) -> Result<(), E>
where
    N: MutableNode,
    F: FnMut(&N) -> Result<bool, E>,
{
    prune_level(root, &mut selector)
}

fn prune_level<N, F, E>(node: &N, selector: &mut F) -> Result<(), E>
where
    N: MutableNode,
    F: FnMut(&N) -> Result<bool, E>,
{
    let mut failure = None;
    let mut removed = 0usize;
    node.retain_children(&mut |child| {
        if failure.is_some() {
            return true;
        }
        match selector(child) {
            Ok(true) => {
                removed += 1;
                false
            }
            Ok(false) => true,
            Err(err) => {
                failure = Some(err);
                true
            }
        }
    });
    if let Some(err) = failure {
        return Err(err);
    }
    if removed > 0 {
        trace!(removed, tag = %node.tag(), "detached matching subtrees");
    }
    for child in node.children() {
        prune_level(&child, selector)?;
    }
    Ok(())
}
