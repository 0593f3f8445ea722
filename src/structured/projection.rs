//! Projection between document trees, the value model and tree-view nodes
//!
//! - [`tree_to_value`] types the raw scalars of a parsed [`DocNode`].
//! - [`project_documents`] flattens parsed documents into the node list a tree
//!   widget shows, each node carrying the [`Address`] of its value.
//! - [`value_to_nodes`] does the same for an in-memory [`Value`] that has no
//!   source positions.
//!
//! Node lists are rebuilt wholesale on every resync. They never hold
//! references into the model; the address is the only link back.

use super::address::{Address, ROOT_LABEL};
use super::parser::{DocNode, DocNodeKind};
use super::value::Value;

/// Key used when a mapping key is not a scalar.
pub const UNKNOWN_KEY: &str = "???";

// ─────────────────────────────────────────────────────────────────────────────
// Scalar Typing
// ─────────────────────────────────────────────────────────────────────────────

/// Type a plain scalar token.
///
/// `true`/`false` → Bool, `null`/`~`/empty → Null, tokens containing `.`,
/// `e` or `E` that parse as a finite float → Float, base-10 `i64` → Integer,
/// anything else → String.
pub fn type_plain_scalar(token: &str) -> Value {
    match token {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        "null" | "~" | "" => return Value::Null,
        _ => {}
    }

    if token.contains(['.', 'e', 'E']) {
        if let Ok(f) = token.parse::<f64>() {
            if f.is_finite() {
                return Value::Float(f);
            }
        }
    }
    if let Ok(i) = token.parse::<i64>() {
        return Value::Integer(i);
    }
    Value::String(token.to_string())
}

fn scalar_value(text: &str, plain: bool) -> Value {
    if plain {
        type_plain_scalar(text)
    } else {
        Value::String(text.to_string())
    }
}

fn key_text(key: &DocNode) -> String {
    key.scalar_text()
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_KEY.to_string())
}

/// Convert a parsed document tree into a typed [`Value`].
pub fn tree_to_value(node: &DocNode) -> Value {
    match &node.kind {
        DocNodeKind::Scalar { text, plain } => scalar_value(text, *plain),
        DocNodeKind::Sequence(items) => Value::Sequence(items.iter().map(tree_to_value).collect()),
        DocNodeKind::Mapping(entries) => {
            let mut mapping = Value::Mapping(Vec::with_capacity(entries.len()));
            for (key, value) in entries {
                // Duplicate keys: last value wins, first position kept
                mapping.insert(key_text(key), tree_to_value(value));
            }
            mapping
        }
    }
}

/// Build the model for a whole parse result.
///
/// A single document is its own model; several documents become a sequence.
/// Returns `None` when there is nothing to model.
pub fn documents_to_value(documents: &[DocNode]) -> Option<Value> {
    match documents {
        [] => None,
        [single] => Some(tree_to_value(single)),
        many => Some(Value::Sequence(many.iter().map(tree_to_value).collect())),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tree View Nodes
// ─────────────────────────────────────────────────────────────────────────────

/// Shape of the value behind a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Sequence,
    Mapping,
}

/// One row of the tree view.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentNode {
    /// Rendered text, e.g. `count (Ln 3): 5`
    pub label: String,
    /// Location of the node's value in the current model
    pub address: Address,
    /// Sequence elements can be value-edited but never key-renamed
    pub is_sequence_element: bool,
    /// Nesting depth; roots are 0
    pub depth: usize,
    pub kind: NodeKind,
    /// 0-based source line, when projected from parsed text
    pub line: Option<usize>,
}

fn render_label(
    name: &str,
    line: Option<usize>,
    is_root: bool,
    kind: NodeKind,
    preview: &str,
) -> String {
    let mut label = name.to_string();
    if let (Some(line), false) = (line, is_root) {
        label.push_str(&format!(" (Ln {})", line));
    }
    match kind {
        NodeKind::Scalar => {
            label.push_str(": ");
            label.push_str(preview);
        }
        NodeKind::Sequence => label.push_str(" (Sequence)"),
        NodeKind::Mapping => label.push_str(" (Map)"),
    }
    label
}

/// Position of a node being emitted.
struct Slot<'a> {
    name: &'a str,
    address: Address,
    is_sequence_element: bool,
    is_root: bool,
    depth: usize,
}

fn root_name(index: usize, total: usize) -> String {
    if total > 1 {
        format!("{} [{}]", ROOT_LABEL, index)
    } else {
        ROOT_LABEL.to_string()
    }
}

fn root_address(index: usize, total: usize) -> Address {
    if total > 1 {
        Address::root().with_index(index)
    } else {
        Address::root()
    }
}

/// Flatten parsed documents into tree nodes, depth-first pre-order.
///
/// With several documents each gets its own root (`ROOT [i]`) addressed at
/// index `i` of the sequence model built by [`documents_to_value`].
pub fn project_documents(documents: &[DocNode]) -> Vec<DocumentNode> {
    let mut nodes = Vec::new();
    let total = documents.len();
    for (index, document) in documents.iter().enumerate() {
        let name = root_name(index, total);
        let slot = Slot {
            name: &name,
            address: root_address(index, total),
            is_sequence_element: total > 1,
            is_root: true,
            depth: 0,
        };
        push_doc_node(&mut nodes, document, slot);
    }
    nodes
}

fn push_doc_node(nodes: &mut Vec<DocumentNode>, node: &DocNode, slot: Slot<'_>) {
    let (kind, preview) = match &node.kind {
        DocNodeKind::Scalar { text, plain } => {
            (NodeKind::Scalar, scalar_value(text, *plain).scalar_preview())
        }
        DocNodeKind::Sequence(_) => (NodeKind::Sequence, String::new()),
        DocNodeKind::Mapping(_) => (NodeKind::Mapping, String::new()),
    };
    nodes.push(DocumentNode {
        label: render_label(slot.name, Some(node.line), slot.is_root, kind, &preview),
        address: slot.address.clone(),
        is_sequence_element: slot.is_sequence_element,
        depth: slot.depth,
        kind,
        line: Some(node.line),
    });

    match &node.kind {
        DocNodeKind::Scalar { .. } => {}
        DocNodeKind::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                let name = format!("[{}]", i);
                let child = Slot {
                    name: &name,
                    address: slot.address.with_index(i),
                    is_sequence_element: true,
                    is_root: false,
                    depth: slot.depth + 1,
                };
                push_doc_node(nodes, item, child);
            }
        }
        DocNodeKind::Mapping(entries) => {
            for (key, value) in entries {
                let name = key_text(key);
                let child = Slot {
                    name: &name,
                    address: slot.address.with_key(name.clone()),
                    is_sequence_element: false,
                    is_root: false,
                    depth: slot.depth + 1,
                };
                push_doc_node(nodes, value, child);
            }
        }
    }
}

/// Flatten an in-memory value into tree nodes, depth-first pre-order.
///
/// There is no source text, so labels carry no line decoration.
pub fn value_to_nodes(value: &Value) -> Vec<DocumentNode> {
    let mut nodes = Vec::new();
    let slot = Slot {
        name: ROOT_LABEL,
        address: Address::root(),
        is_sequence_element: false,
        is_root: true,
        depth: 0,
    };
    push_value_node(&mut nodes, value, slot);
    nodes
}

fn push_value_node(nodes: &mut Vec<DocumentNode>, value: &Value, slot: Slot<'_>) {
    let kind = match value {
        Value::Sequence(_) => NodeKind::Sequence,
        Value::Mapping(_) => NodeKind::Mapping,
        _ => NodeKind::Scalar,
    };
    nodes.push(DocumentNode {
        label: render_label(slot.name, None, slot.is_root, kind, &value.scalar_preview()),
        address: slot.address.clone(),
        is_sequence_element: slot.is_sequence_element,
        depth: slot.depth,
        kind,
        line: None,
    });

    match value {
        Value::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                let name = format!("[{}]", i);
                let child = Slot {
                    name: &name,
                    address: slot.address.with_index(i),
                    is_sequence_element: true,
                    is_root: false,
                    depth: slot.depth + 1,
                };
                push_value_node(nodes, item, child);
            }
        }
        Value::Mapping(entries) => {
            for (key, item) in entries {
                let child = Slot {
                    name: key,
                    address: slot.address.with_key(key.clone()),
                    is_sequence_element: false,
                    is_root: false,
                    depth: slot.depth + 1,
                };
                push_value_node(nodes, item, child);
            }
        }
        _ => {}
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structured::parser::parse_documents;

    fn model(text: &str) -> Value {
        documents_to_value(&parse_documents(text).unwrap()).unwrap()
    }

    fn at(value: &Value, pointer: &str) -> Value {
        value.get(&Address::decode(pointer)).cloned().unwrap()
    }

    #[test]
    fn test_scalar_typing() {
        assert_eq!(type_plain_scalar("42"), Value::Integer(42));
        assert_eq!(type_plain_scalar("-7"), Value::Integer(-7));
        assert_eq!(type_plain_scalar("42.0"), Value::Float(42.0));
        assert_eq!(type_plain_scalar("1e3"), Value::Float(1000.0));
        assert_eq!(type_plain_scalar("true"), Value::Bool(true));
        assert_eq!(type_plain_scalar("false"), Value::Bool(false));
        assert_eq!(type_plain_scalar("null"), Value::Null);
        assert_eq!(type_plain_scalar("~"), Value::Null);
        assert_eq!(type_plain_scalar("hello"), Value::String("hello".into()));
        assert_eq!(type_plain_scalar("1.2.3"), Value::String("1.2.3".into()));
        assert_eq!(
            type_plain_scalar("99999999999999999999"),
            Value::String("99999999999999999999".into())
        );
    }

    #[test]
    fn test_quoted_scalar_stays_string() {
        let value = model("a: \"42\"\nb: '1.5'\nc: 42\n");
        assert_eq!(at(&value, "/a"), Value::String("42".into()));
        assert_eq!(at(&value, "/b"), Value::String("1.5".into()));
        assert_eq!(at(&value, "/c"), Value::Integer(42));
    }

    #[test]
    fn test_json_text_to_value() {
        let value = model(r#"{"name": "x", "n": [1, 2.5, true, null]}"#);
        assert_eq!(value.keys(), vec!["name", "n"]);
        assert_eq!(at(&value, "/n/1"), Value::Float(2.5));
        assert_eq!(at(&value, "/n/3"), Value::Null);
    }

    #[test]
    fn test_complex_key_uses_placeholder() {
        let value = model("? [a, b]\n: 1\n");
        assert_eq!(value.keys(), vec![UNKNOWN_KEY]);
    }

    #[test]
    fn test_multiple_documents_become_sequence() {
        let value = model("a: 1\n---\nb: 2\n");
        assert_eq!(at(&value, "/1/b"), Value::Integer(2));
    }

    #[test]
    fn test_project_single_document() {
        let docs = parse_documents("count: 1\nitems:\n  - a\n").unwrap();
        let nodes = project_documents(&docs);
        let labels: Vec<&str> = nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["ROOT (Map)", "count (Ln 0): 1", "items (Ln 2) (Sequence)", "[0] (Ln 2): a"]
        );
        assert!(nodes[0].address.is_root());
        assert_eq!(nodes[1].address.encode(), "/count");
        assert_eq!(nodes[3].address.encode(), "/items/0");
        assert!(nodes[3].is_sequence_element);
        assert!(!nodes[1].is_sequence_element);
        assert_eq!(nodes[3].depth, 2);
    }

    #[test]
    fn test_project_addresses_resolve() {
        let text = "a/b: {x~y: [1, {z: 2}]}\nlist: [1, 2]\n";
        let docs = parse_documents(text).unwrap();
        let value = documents_to_value(&docs).unwrap();
        for node in project_documents(&docs) {
            assert!(
                value.get(&node.address).is_some(),
                "address {} does not resolve",
                node.address
            );
        }
    }

    #[test]
    fn test_project_multiple_documents() {
        let docs = parse_documents("a: 1\n---\n- x\n").unwrap();
        let value = documents_to_value(&docs).unwrap();
        let nodes = project_documents(&docs);
        let roots: Vec<&DocumentNode> = nodes.iter().filter(|n| n.depth == 0).collect();
        assert_eq!(roots.len(), 2);
        assert!(roots[0].label.starts_with("ROOT [0]"));
        assert!(roots[1].label.starts_with("ROOT [1]"));
        assert!(roots.iter().all(|n| n.is_sequence_element));
        for node in &nodes {
            assert!(value.get(&node.address).is_some());
        }
    }

    #[test]
    fn test_value_to_nodes() {
        let value = Value::Mapping(vec![
            ("k".to_string(), Value::Float(1.0)),
            ("s".to_string(), Value::Sequence(vec![Value::Null])),
        ]);
        let nodes = value_to_nodes(&value);
        let labels: Vec<&str> = nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, vec!["ROOT (Map)", "k: 1.0", "s (Sequence)", "[0]: null"]);
        assert_eq!(nodes[3].address.encode(), "/s/0");
        assert!(nodes.iter().all(|n| n.line.is_none()));
    }
}
