//! Structural equality between two trees, possibly built on different node
//! model implementations.
//!
//! Comparison is fail-fast: the first observed difference is returned as an
//! [`ElementsMismatch`] carrying the disagreeing tags or values, and no
//! deeper subtree is examined. Strict mode demands exact structural and
//! textual equality; lenient mode tolerates whitespace differences,
//! numerically or boolean-equivalent text, and extra trailing children on
//! the actual side (generated defaults a producing side may append).

use std::collections::BTreeMap;

use schematree_model::{NodeKind, SchemaNode};
use thiserror::Error;

/// Comparison tolerance switches.
#[derive(Debug, Clone, Copy)]
pub struct CompareOptions {
    /// Exact structural and textual equality when set.
    pub strict: bool,
    /// Drop comment nodes from both children lists before pairing.
    pub skip_comments: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self { strict: true, skip_comments: true }
    }
}

impl CompareOptions {
    pub fn lenient() -> Self {
        Self { strict: false, ..Self::default() }
    }
}

/// First observed difference between two trees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementsMismatch {
    #[error("tags differ: '{expected}' != '{actual}'")]
    Tag { expected: String, actual: String },

    #[error("'{lesser}' has lesser children than '{greater}' ({lesser_count} < {greater_count})")]
    Children { lesser: String, greater: String, lesser_count: usize, greater_count: usize },

    #[error("attributes differ: {expected:?} != {actual:?}")]
    Attributes { expected: BTreeMap<String, String>, actual: BTreeMap<String, String> },

    #[error("attribute '{name}' values differ: '{expected}' != '{actual}'")]
    AttributeValue { name: String, expected: String, actual: String },

    #[error("texts differ: {expected:?} != {actual:?}")]
    Text { expected: Option<String>, actual: Option<String> },

    #[error("tails differ: {expected:?} != {actual:?}")]
    Tail { expected: Option<String>, actual: Option<String> },
}

/// Asserts that two trees are observably equivalent, returning the first
/// mismatch otherwise. The tails of `expected` and `actual` themselves are
/// not compared — a tail belongs to the surrounding document, not to the
/// subtree under comparison.
pub fn assert_elements_equal<E, A>(
    expected: &E,
    actual: &A,
    options: CompareOptions,
) -> Result<(), ElementsMismatch>
where
    E: SchemaNode,
    A: SchemaNode,
{
    check_pair(expected, actual, options)
}

fn check_pair<E, A>(expected: &E, actual: &A, options: CompareOptions) -> Result<(), ElementsMismatch>
where
    E: SchemaNode,
    A: SchemaNode,
{
    if expected.tag() != actual.tag() {
        return Err(ElementsMismatch::Tag { expected: expected.tag(), actual: actual.tag() });
    }

    let expected_children = filtered_children(expected, options.skip_comments);
    let actual_children = filtered_children(actual, options.skip_comments);

    if expected_children.len() != actual_children.len()
        && (options.strict || expected_children.len() > actual_children.len())
    {
        // Only the expected side may come up short, and only leniently.
        let (lesser, lesser_count, greater, greater_count) =
            if expected_children.len() < actual_children.len() {
                (expected.tag(), expected_children.len(), actual.tag(), actual_children.len())
            } else {
                (actual.tag(), actual_children.len(), expected.tag(), expected_children.len())
            };
        return Err(ElementsMismatch::Children { lesser, greater, lesser_count, greater_count });
    }

    check_attributes(expected, actual, options)?;
    check_content(expected.text(), actual.text(), options.strict, ContentKind::Text)?;

    for (child_expected, child_actual) in expected_children.iter().zip(actual_children.iter()) {
        check_pair(child_expected, child_actual, options)?;
        check_content(
            child_expected.tail(),
            child_actual.tail(),
            options.strict,
            ContentKind::Tail,
        )?;
    }
    Ok(())
}

fn filtered_children<N: SchemaNode>(node: &N, skip_comments: bool) -> Vec<N> {
    let mut children = node.children();
    if skip_comments {
        children.retain(|child| child.kind() != NodeKind::Comment);
    }
    children
}

fn check_attributes<E, A>(expected: &E, actual: &A, options: CompareOptions) -> Result<(), ElementsMismatch>
where
    E: SchemaNode,
    A: SchemaNode,
{
    let expected_attrs = expected.attributes();
    let actual_attrs = actual.attributes();
    if expected_attrs == actual_attrs {
        return Ok(());
    }
    if options.strict || !expected_attrs.keys().eq(actual_attrs.keys()) {
        return Err(ElementsMismatch::Attributes { expected: expected_attrs, actual: actual_attrs });
    }
    for (name, expected_value) in &expected_attrs {
        let actual_value = &actual_attrs[name];
        if expected_value.trim() != actual_value.trim() {
            return Err(ElementsMismatch::AttributeValue {
                name: name.clone(),
                expected: expected_value.trim().to_string(),
                actual: actual_value.trim().to_string(),
            });
        }
    }
    Ok(())
}

#[derive(Clone, Copy)]
enum ContentKind {
    Text,
    Tail,
}

fn check_content(
    expected: Option<String>,
    actual: Option<String>,
    strict: bool,
    kind: ContentKind,
) -> Result<(), ElementsMismatch> {
    let equal = match (&expected, &actual) {
        _ if expected == actual => true,
        _ if strict => false,
        // A missing side is equivalent to whitespace-only content.
        (None, Some(content)) | (Some(content), None) => content.trim().is_empty(),
        (Some(expected), Some(actual)) => equivalent_text(expected, actual),
        (None, None) => true,
    };
    if equal {
        Ok(())
    } else {
        Err(match kind {
            ContentKind::Text => ElementsMismatch::Text { expected, actual },
            ContentKind::Tail => ElementsMismatch::Tail { expected, actual },
        })
    }
}

/// Lenient text equivalence: whitespace-free forms compared first, then
/// numeric equality, then the boolean token sets {"true", "1"} and
/// {"false", "0"}. The boolean fallback only runs when numeric parsing
/// fails on either side, so "0" and "false" pair up while "0" and "1" do
/// not.
fn equivalent_text(expected: &str, actual: &str) -> bool {
    let squeezed_expected: String = expected.split_whitespace().collect();
    let squeezed_actual: String = actual.split_whitespace().collect();
    if squeezed_expected == squeezed_actual {
        return true;
    }
    if let (Ok(left), Ok(right)) =
        (squeezed_expected.parse::<f64>(), squeezed_actual.parse::<f64>())
    {
        return left == right;
    }
    boolean_token(&squeezed_expected)
        .is_some_and(|left| boolean_token(&squeezed_actual) == Some(left))
}

fn boolean_token(content: &str) -> Option<bool> {
    if content.eq_ignore_ascii_case("true") || content == "1" {
        Some(true)
    } else if content.eq_ignore_ascii_case("false") || content == "0" {
        Some(false)
    } else {
        None
    }
}
