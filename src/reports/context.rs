//! Flattening of the context tree into dotted key/value pairs.

use crate::tar::{ContextNode, ValueEmbedding};
use serde::Serialize;

pub const BASE64_PLACEHOLDER: &str = "[BASE64 content]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextItem {
    pub key: String,
    pub value: String,
}

/// Flatten the children of `root` in depth-first pre-order.
pub fn flatten(root: &ContextNode) -> Vec<ContextItem> {
    let mut items = Vec::new();
    flatten_into(root, &mut items);
    items
}

/// Append one item per valued scalar below `root` to `items`.
///
/// The root's own name is not part of the keys. Traversal uses an explicit
/// stack so deeply nested trees cannot exhaust the call stack.
pub fn flatten_into(root: &ContextNode, items: &mut Vec<ContextItem>) {
    let ContextNode::Composite { items: children, .. } = root else {
        return;
    };
    let mut stack: Vec<(&ContextNode, String)> = children
        .iter()
        .rev()
        .map(|child| (child, String::new()))
        .collect();

    while let Some((node, prefix)) = stack.pop() {
        match node {
            ContextNode::Composite { name, items: children } => {
                let path = join_key(&prefix, name);
                stack.extend(children.iter().rev().map(|child| (child, path.clone())));
            }
            ContextNode::Scalar { name, value: Some(value), embedding } => {
                items.push(ContextItem {
                    key: join_key(&prefix, name),
                    value: display_value(value, *embedding),
                });
            }
            ContextNode::Scalar { value: None, .. } => {}
        }
    }
}

fn join_key(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn display_value(value: &str, embedding: ValueEmbedding) -> String {
    match embedding {
        ValueEmbedding::String => value.to_string(),
        ValueEmbedding::Uri => format!("[URI: {value}]"),
        ValueEmbedding::Base64 => BASE64_PLACEHOLDER.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[ContextItem]) -> Vec<&str> {
        items.iter().map(|i| i.key.as_str()).collect()
    }

    #[test]
    fn test_values_by_embedding() {
        let root = ContextNode::composite(
            "",
            vec![
                ContextNode::scalar("name1", "value1"),
                ContextNode::uri("name2", "http://test.com"),
                ContextNode::base64("name3", "PEludm9pY2UvPg=="),
            ],
        );
        let items = flatten(&root);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].value, "value1");
        assert_eq!(items[1].value, "[URI: http://test.com]");
        assert_eq!(items[2].value, BASE64_PLACEHOLDER);
    }

    #[test]
    fn test_nested_keys_in_preorder() {
        let root = ContextNode::composite(
            "root",
            vec![
                ContextNode::scalar("a", "1"),
                ContextNode::composite(
                    "b",
                    vec![
                        ContextNode::scalar("c", "2"),
                        ContextNode::composite("d", vec![ContextNode::scalar("e", "3")]),
                        ContextNode::scalar("f", "4"),
                    ],
                ),
                ContextNode::scalar("g", "5"),
            ],
        );
        let items = flatten(&root);
        assert_eq!(keys(&items), vec!["a", "b.c", "b.d.e", "b.f", "g"]);
    }

    #[test]
    fn test_skips_empty_composites_and_absent_values() {
        let root = ContextNode::composite(
            "",
            vec![
                ContextNode::composite("empty", vec![]),
                ContextNode::empty("missing"),
                ContextNode::scalar("present", ""),
            ],
        );
        let items = flatten(&root);
        assert_eq!(keys(&items), vec!["present"]);
        assert_eq!(items[0].value, "");
    }

    #[test]
    fn test_scalar_root_contributes_nothing() {
        assert!(flatten(&ContextNode::scalar("only", "x")).is_empty());
    }

    #[test]
    fn test_appends_to_existing_items() {
        let mut items = vec![ContextItem { key: "pre".into(), value: "x".into() }];
        flatten_into(
            &ContextNode::composite("", vec![ContextNode::scalar("a", "1")]),
            &mut items,
        );
        assert_eq!(keys(&items), vec!["pre", "a"]);
    }

    #[test]
    fn test_deep_nesting() {
        let mut node = ContextNode::scalar("leaf", "v");
        for i in 0..5_000 {
            node = ContextNode::composite(format!("n{i}"), vec![node]);
        }
        let root = ContextNode::composite("", vec![node]);
        let items = flatten(&root);
        assert_eq!(items.len(), 1);
        assert!(items[0].key.ends_with(".n0.leaf"));
        // Release the tree iteratively instead of through recursive drop.
        let mut pending = vec![root];
        while let Some(node) = pending.pop() {
            if let ContextNode::Composite { items, .. } = node {
                pending.extend(items);
            }
        }
    }
}
