//! Edit reconciliation for tree-view label edits
//!
//! When the user commits a new label on a tree node, only the new text and
//! the node's address are known. [`reconcile`] infers what was meant:
//!
//! 1. text contains `": "` → everything after the first occurrence replaces
//!    the node's value (parsed as a JSON literal, else kept as a string)
//! 2. a non-root, non-sequence-element node with non-empty text that is not
//!    the root label → the node's key is renamed
//! 3. anything else → no change
//!
//! Reconciliation never fails loudly; malformed input degrades to a string
//! assignment or to a no-op.

use super::address::{Address, Segment, ROOT_LABEL};
use super::value::Value;
use log::debug;

const VALUE_SEPARATOR: &str = ": ";

/// What a reconciled edit did to the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The value at the address was replaced
    ValueReplaced,
    /// The mapping entry was moved under a new key (appended at the end)
    KeyRenamed { from: String, to: String },
    /// The model was left untouched
    Unchanged,
}

impl EditOutcome {
    pub fn is_change(&self) -> bool {
        !matches!(self, EditOutcome::Unchanged)
    }
}

/// Parse a replacement value typed by the user.
///
/// Valid JSON literals keep their type; anything else is taken verbatim.
pub fn parse_replacement(text: &str) -> Value {
    match serde_json::from_str::<Value>(text) {
        Ok(value) => value,
        Err(e) => {
            debug!("Replacement {:?} is not a literal ({}), storing as string", text, e);
            Value::String(text.to_string())
        }
    }
}

/// Apply one label edit to `model`.
pub fn reconcile(
    model: &mut Value,
    address: &Address,
    is_sequence_element: bool,
    new_text: &str,
) -> EditOutcome {
    if let Some((_, raw_value)) = new_text.split_once(VALUE_SEPARATOR) {
        return replace_value(model, address, raw_value);
    }

    if is_sequence_element
        || address.is_root()
        || new_text.is_empty()
        || new_text == ROOT_LABEL
    {
        return EditOutcome::Unchanged;
    }

    rename_key(model, address, new_text)
}

fn replace_value(model: &mut Value, address: &Address, raw_value: &str) -> EditOutcome {
    let replacement = parse_replacement(raw_value);
    match model.get_mut(address) {
        Some(slot) if *slot == replacement => EditOutcome::Unchanged,
        Some(slot) => {
            *slot = replacement;
            EditOutcome::ValueReplaced
        }
        None => {
            debug!("Value edit at {} does not resolve, ignoring", address);
            EditOutcome::Unchanged
        }
    }
}

fn rename_key(model: &mut Value, address: &Address, new_key: &str) -> EditOutcome {
    let Some((parent_address, last)) = address.split_last() else {
        return EditOutcome::Unchanged;
    };
    let old_key = match last {
        Segment::Key(key) => key.clone(),
        // A numeric mapping key decodes as an index
        Segment::Index(_) => last.as_key(),
    };
    if old_key == new_key {
        return EditOutcome::Unchanged;
    }

    let Some(parent) = model.get_mut(&parent_address) else {
        debug!("Rename parent {} does not resolve, ignoring", parent_address);
        return EditOutcome::Unchanged;
    };
    if !parent.contains_key(&old_key) {
        debug!("Rename target {:?} not found under {}, ignoring", old_key, parent_address);
        return EditOutcome::Unchanged;
    }

    // Erase then insert: the renamed entry moves to the end of the mapping
    let Some(value) = parent.remove(&old_key) else {
        return EditOutcome::Unchanged;
    };
    parent.remove(new_key);
    parent.insert(new_key, value);
    EditOutcome::KeyRenamed {
        from: old_key,
        to: new_key.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn json(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn test_value_edit_parses_literal() {
        let mut model = json(r#"{"count": 1}"#);
        let outcome = reconcile(&mut model, &Address::decode("/count"), false, "count: 5");
        assert_eq!(outcome, EditOutcome::ValueReplaced);
        assert_eq!(model, json(r#"{"count": 5}"#));
        assert_eq!(model.get(&Address::decode("/count")), Some(&Value::Integer(5)));
    }

    #[test]
    fn test_value_edit_falls_back_to_string() {
        let mut model = json(r#"{"count": 1}"#);
        let outcome = reconcile(
            &mut model,
            &Address::decode("/count"),
            false,
            "count: not-json{",
        );
        assert_eq!(outcome, EditOutcome::ValueReplaced);
        assert_eq!(model, json(r#"{"count": "not-json{"}"#));
    }

    #[test]
    fn test_value_edit_uses_first_separator() {
        let mut model = json(r#"{"t": null}"#);
        reconcile(&mut model, &Address::decode("/t"), false, "t (Ln 0): a: b");
        assert_eq!(model, json(r#"{"t": "a: b"}"#));
    }

    #[test]
    fn test_value_edit_nested_structure() {
        let mut model = json(r#"{"list": [1, 2]}"#);
        let outcome = reconcile(
            &mut model,
            &Address::decode("/list/1"),
            true,
            r#"[1]: {"deep": [true]}"#,
        );
        assert_eq!(outcome, EditOutcome::ValueReplaced);
        assert_eq!(model, json(r#"{"list": [1, {"deep": [true]}]}"#));
    }

    #[test]
    fn test_value_edit_on_root() {
        let mut model = json(r#"{"a": 1}"#);
        let outcome = reconcile(&mut model, &Address::root(), false, "ROOT: [1]");
        assert_eq!(outcome, EditOutcome::ValueReplaced);
        assert_eq!(model, json("[1]"));
    }

    #[test]
    fn test_value_edit_unresolved_is_noop() {
        let mut model = json(r#"{"a": 1}"#);
        let outcome = reconcile(&mut model, &Address::decode("/b/c"), false, "c: 2");
        assert_eq!(outcome, EditOutcome::Unchanged);
        assert_eq!(model, json(r#"{"a": 1}"#));
    }

    #[test]
    fn test_rename_moves_key_to_end() {
        let mut model = json(r#"{"old": 1, "b": 2}"#);
        let outcome = reconcile(&mut model, &Address::decode("/old"), false, "newName");
        assert_eq!(
            outcome,
            EditOutcome::KeyRenamed {
                from: "old".into(),
                to: "newName".into()
            }
        );
        assert_eq!(model.keys(), vec!["b", "newName"]);
        assert_eq!(model.get(&Address::decode("/newName")), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_rename_escaped_key() {
        let mut model = json(r#"{"a/b~c": true, "z": 0}"#);
        let address = Address::root().with_key("a/b~c");
        assert_eq!(address.encode(), "/a~1b~0c");
        let outcome = reconcile(&mut model, &Address::decode(&address.encode()), false, "plain");
        assert!(outcome.is_change());
        assert_eq!(model.keys(), vec!["z", "plain"]);
    }

    #[test]
    fn test_rename_numeric_key() {
        let mut model = json(r#"{"1": "one"}"#);
        let outcome = reconcile(&mut model, &Address::decode("/1"), false, "first");
        assert!(outcome.is_change());
        assert_eq!(model.keys(), vec!["first"]);
    }

    #[test]
    fn test_rename_onto_existing_key_keeps_keys_unique() {
        let mut model = json(r#"{"a": 1, "b": 2, "c": 3}"#);
        reconcile(&mut model, &Address::decode("/a"), false, "b");
        assert_eq!(model.keys(), vec!["c", "b"]);
        assert_eq!(model.get(&Address::decode("/b")), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_rename_rejected_cases() {
        let original = json(r#"{"a": [1], "b": 2}"#);

        let mut model = original.clone();
        // Sequence elements cannot be renamed
        assert_eq!(
            reconcile(&mut model, &Address::decode("/a/0"), true, "x"),
            EditOutcome::Unchanged
        );
        // Root cannot be renamed
        assert_eq!(
            reconcile(&mut model, &Address::root(), false, "x"),
            EditOutcome::Unchanged
        );
        // Empty text and the reserved root label are ignored
        assert_eq!(
            reconcile(&mut model, &Address::decode("/b"), false, ""),
            EditOutcome::Unchanged
        );
        assert_eq!(
            reconcile(&mut model, &Address::decode("/b"), false, ROOT_LABEL),
            EditOutcome::Unchanged
        );
        // Missing key and non-mapping parent are silently ignored
        assert_eq!(
            reconcile(&mut model, &Address::decode("/zzz"), false, "x"),
            EditOutcome::Unchanged
        );
        assert_eq!(
            reconcile(&mut model, &Address::decode("/a/k"), false, "x"),
            EditOutcome::Unchanged
        );
        assert_eq!(model, original);
    }

    #[test]
    fn test_identical_edit_is_noop() {
        let mut model = json(r#"{"count": 1, "name": "x"}"#);
        let original = model.clone();
        assert_eq!(
            reconcile(&mut model, &Address::decode("/count"), false, "count: 1"),
            EditOutcome::Unchanged
        );
        assert_eq!(
            reconcile(&mut model, &Address::decode("/name"), false, "name"),
            EditOutcome::Unchanged
        );
        assert_eq!(model, original);
    }

    #[test]
    fn test_parse_replacement() {
        assert_eq!(parse_replacement("5"), Value::Integer(5));
        assert_eq!(parse_replacement("5.5"), Value::Float(5.5));
        assert_eq!(parse_replacement("null"), Value::Null);
        assert_eq!(parse_replacement("\"q\""), Value::String("q".into()));
        assert_eq!(parse_replacement("hello"), Value::String("hello".into()));
    }
}
