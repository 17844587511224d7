//! Property tests over generated trees.
//!
//! Trees come minimal (no recorded bindings) or rich, where elements carry
//! prefix bindings that may agree with, rebind or miss the URIs of their
//! qualified tags.

use proptest::prelude::*;
use xmldiff::{xml_diff_to_string, DiffOptions, NamespaceMap, Node, XmlElement};

const TAGS: &str = "(x|y|\\{urn:n\\}z|\\{urn:p\\}w)";

fn arb_bindings(rich: bool) -> impl Strategy<Value = Option<NamespaceMap>> {
    proptest::collection::btree_map("(p|n)", "urn:(p|n|q)", 0..3)
        .prop_map(move |bindings| rich.then_some(bindings))
}

fn arb_child(rich: bool) -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        "[a-c \n]{1,4}".prop_map(Node::text),
        (TAGS, arb_bindings(rich)).prop_map(|(tag, bindings)| {
            Node::from(XmlElement::with_parts(tag, Default::default(), bindings))
        }),
    ];
    leaf.prop_recursive(3, 32, 4, move |inner| {
        (
            TAGS,
            proptest::collection::btree_map("(id|k|name|\\{urn:p\\}a)", "[01<&\"\n]", 0..3),
            arb_bindings(rich),
            proptest::collection::vec(inner, 0..4),
        )
            .prop_map(|(tag, attributes, bindings, children)| {
                let mut element = XmlElement::with_parts(tag, attributes, bindings);
                for child in children {
                    element.push_child(child);
                }
                Node::from(element)
            })
    })
}

fn arb_root(rich: bool) -> impl Strategy<Value = Node> {
    (
        "(r|\\{urn:r\\}r)",
        arb_bindings(rich),
        proptest::collection::vec(arb_child(rich), 0..5),
    )
        .prop_map(|(tag, bindings, children)| {
            let mut root = XmlElement::with_parts(tag, Default::default(), bindings);
            for child in children {
                root.push_child(child);
            }
            Node::from(root)
        })
}

fn arb_tree() -> impl Strategy<Value = Node> {
    prop_oneof![arb_root(false), arb_root(true)]
}

fn arb_pair() -> impl Strategy<Value = (Node, Node)> {
    prop_oneof![
        (arb_root(false), arb_root(false)),
        (arb_root(true), arb_root(true)),
    ]
}

proptest! {
    #[test]
    fn self_diff_is_empty(tree in arb_tree()) {
        let report = xml_diff_to_string(&tree, &tree, &DiffOptions::default()).unwrap();
        prop_assert_eq!(report, "");
    }

    #[test]
    fn seeded_self_diff_is_empty(tree in arb_root(true)) {
        let options = DiffOptions::new().with_namespace("p", "urn:n");
        let report = xml_diff_to_string(&tree, &tree, &options).unwrap();
        prop_assert_eq!(report, "");
    }

    #[test]
    fn every_line_is_marked((a, b) in arb_pair()) {
        let report = xml_diff_to_string(&a, &b, &DiffOptions::default()).unwrap();
        for line in report.lines() {
            prop_assert!(
                line.is_empty() || line.starts_with([' ', '-', '+']),
                "unmarked line {:?}",
                line
            );
        }
    }
}
