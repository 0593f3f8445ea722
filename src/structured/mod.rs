//! Structured document engine
//!
//! Keeps three views of one document in sync: the raw text, the typed
//! [`Value`] model, and the flat list of [`DocumentNode`]s a tree widget
//! renders.
//!
//! ```text
//! text ──parse/classify──▶ DocNode trees ──project──▶ Value + DocumentNodes
//!   ▲                                                        │
//!   └────────── serialize ◀── reconcile (label edit) ◀───────┘
//! ```
//!
//! Live projection is best-effort: text that does not parse simply becomes a
//! plain-text document with no model. Only the explicit reformat commands
//! report parse errors.

pub mod address;
pub mod format;
pub mod parser;
pub mod projection;
pub mod reconcile;
pub mod value;

pub use address::{Address, Segment, ROOT_LABEL};
pub use format::{reformat_as_json, reformat_as_yaml, serialize, serialize_for_display};
pub use parser::{classify, Format};
pub use projection::{DocumentNode, NodeKind};
pub use reconcile::{reconcile, EditOutcome};
pub use value::Value;

use log::debug;

/// Result of loading or re-projecting a text buffer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoadedDocument {
    /// The model, absent for plain text
    pub value: Option<Value>,
    pub format: Format,
    /// Tree rows, depth-first pre-order
    pub nodes: Vec<DocumentNode>,
}

/// Parse, classify and project a text buffer.
pub fn load_document(text: &str) -> LoadedDocument {
    let classified = classify(text);
    let value = projection::documents_to_value(&classified.documents);
    let nodes = projection::project_documents(&classified.documents);
    debug!(
        "Projected {} node(s) as {}",
        nodes.len(),
        classified.format.display_name()
    );
    LoadedDocument {
        value,
        format: classified.format,
        nodes,
    }
}

/// Re-run classification and projection, e.g. after external text edits.
pub fn refresh_projection(text: &str) -> LoadedDocument {
    load_document(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_json_document() {
        let loaded = load_document("{\r\n    \"a\": 1\r\n}");
        assert_eq!(loaded.format, Format::Json);
        assert_eq!(
            loaded.value,
            Some(Value::Mapping(vec![("a".to_string(), Value::Integer(1))]))
        );
        assert_eq!(loaded.nodes.len(), 2);
        assert_eq!(loaded.nodes[1].label, "a (Ln 1): 1");
    }

    #[test]
    fn test_load_text_document_has_no_model() {
        let loaded = load_document("not: [valid: at: all: -");
        assert_eq!(loaded.format, Format::Text);
        assert!(loaded.value.is_none());
        assert!(loaded.nodes.is_empty());
    }

    #[test]
    fn test_refresh_tracks_text() {
        assert_eq!(refresh_projection("a: 1").format, Format::Yaml);
        assert_eq!(refresh_projection("[1]").format, Format::Json);
    }

    #[test]
    fn test_format_detection_stable_under_reformat() {
        for text in [r#"{"a": [1, 2]}"#, "a: 1\nb: [x, y]\n"] {
            let loaded = load_document(text);
            let value = loaded.value.unwrap();
            let once = serialize_for_display(&value, loaded.format).unwrap();
            let reloaded = load_document(&once);
            assert_eq!(reloaded.format, loaded.format);
            let twice = serialize_for_display(&reloaded.value.unwrap(), reloaded.format).unwrap();
            assert_eq!(once, twice);
        }
    }
}
