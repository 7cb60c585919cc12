//! The comparator is generic over the node model: one side built on the
//! crate's `Element`, the other on a minimal value-typed implementation.

use std::collections::BTreeMap;

use rstest::rstest;
use schematree_model::{Element, NodeId, NodeKind, SchemaNode, elem};
use schematree_query::{CompareOptions, ElementsMismatch, assert_elements_equal};

#[derive(Debug, Clone, PartialEq, Eq)]
struct MiniNode {
    tag: String,
    text: Option<String>,
    tail: Option<String>,
    attributes: BTreeMap<String, String>,
    children: Vec<MiniNode>,
}

impl MiniNode {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            text: None,
            tail: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    fn child(mut self, child: MiniNode) -> Self {
        self.children.push(child);
        self
    }
}

impl SchemaNode for MiniNode {
    fn node_id(&self) -> NodeId {
        // Value type without stable identity; the comparator never asks.
        NodeId::from_addr(0)
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Element
    }

    fn tag(&self) -> String {
        self.tag.clone()
    }

    fn attributes(&self) -> BTreeMap<String, String> {
        self.attributes.clone()
    }

    fn text(&self) -> Option<String> {
        self.text.clone()
    }

    fn tail(&self) -> Option<String> {
        self.tail.clone()
    }

    fn children(&self) -> Vec<Self> {
        self.children.clone()
    }
}

#[rstest]
fn equivalent_trees_across_models() {
    let expected = elem("a")
        .child(elem("b1").text("text").child(elem("c1").attr("a", "1")))
        .child(elem("b2"))
        .build();
    let actual = MiniNode::new("a")
        .child(MiniNode::new("b1").text("text").child(MiniNode::new("c1").attr("a", "1")))
        .child(MiniNode::new("b2"));

    assert_elements_equal(&expected, &actual, CompareOptions::default()).unwrap();
}

#[rstest]
fn lenient_tolerance_applies_across_models() {
    let expected = elem("a").child(elem("b1").text("+1")).build();
    let actual = MiniNode::new("a").child(MiniNode::new("b1").text("+ 1 "));

    assert_elements_equal(&expected, &actual, CompareOptions::lenient()).unwrap();
}

#[rstest]
fn mismatches_are_reported_across_models() {
    let expected = elem("a").child(elem("b1")).build();
    let actual = MiniNode::new("a").child(MiniNode::new("b2"));

    let err = assert_elements_equal(&expected, &actual, CompareOptions::default()).unwrap_err();
    assert!(matches!(err, ElementsMismatch::Tag { .. }));
    assert_eq!(err.to_string(), "tags differ: 'b1' != 'b2'");
}
