//! Structural parsing and format classification
//!
//! Raw text is parsed with a YAML event parser, which also accepts JSON, into
//! zero or more [`DocNode`] trees. Every node remembers the 0-based source
//! line of its first token and, for scalars, whether it was written plain or
//! quoted. The tree is untyped: scalar typing happens later, in projection.
//!
//! [`classify`] then decides whether the text is JSON, YAML or plain text:
//!
//! 1. structural parse fails (or finds no document) → [`Format::Text`]
//! 2. first non-whitespace char is `{` or `[` → strict JSON check decides
//!    between [`Format::Json`] and [`Format::Yaml`]
//! 3. anything else → [`Format::Yaml`], without a JSON check

use crate::error::{Error, Result};
use log::debug;
use std::collections::HashMap;
use yaml_rust2::parser::{Event, MarkedEventReceiver, Parser};
use yaml_rust2::scanner::{Marker, TScalarStyle};

// ─────────────────────────────────────────────────────────────────────────────
// Format
// ─────────────────────────────────────────────────────────────────────────────

/// Detected document dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// Unstructured text (or text that failed to parse)
    #[default]
    Text,
    Json,
    Yaml,
}

impl Format {
    /// Get display name for the format.
    pub fn display_name(&self) -> &'static str {
        match self {
            Format::Text => "Text",
            Format::Json => "JSON",
            Format::Yaml => "YAML",
        }
    }

    /// Check if this format has a structural model.
    pub fn is_structured(&self) -> bool {
        matches!(self, Format::Json | Format::Yaml)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document Tree
// ─────────────────────────────────────────────────────────────────────────────

/// One node of a parsed document, before scalar typing.
#[derive(Debug, Clone, PartialEq)]
pub struct DocNode {
    /// 0-based line of the node's first token
    pub line: usize,
    pub kind: DocNodeKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DocNodeKind {
    /// Scalar text as written; `plain` is false for quoted and block scalars
    Scalar { text: String, plain: bool },
    Sequence(Vec<DocNode>),
    /// Entries keep their key nodes so complex keys can be detected
    Mapping(Vec<(DocNode, DocNode)>),
}

impl DocNode {
    fn new(kind: DocNodeKind, mark: Marker) -> Self {
        Self {
            line: mark.line().saturating_sub(1),
            kind,
        }
    }

    /// Scalar text, if this is a scalar.
    pub fn scalar_text(&self) -> Option<&str> {
        match &self.kind {
            DocNodeKind::Scalar { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self.kind, DocNodeKind::Scalar { .. })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Event Receiver
// ─────────────────────────────────────────────────────────────────────────────

/// Builds [`DocNode`] trees from parser events.
#[derive(Default)]
struct TreeBuilder {
    documents: Vec<DocNode>,
    /// Open containers with their anchor ids
    stack: Vec<(DocNode, usize)>,
    /// Pending key for each open mapping
    keys: Vec<Option<DocNode>>,
    anchors: HashMap<usize, DocNode>,
    error: Option<String>,
}

impl TreeBuilder {
    fn insert(&mut self, node: DocNode, anchor: usize) {
        if anchor > 0 {
            self.anchors.insert(anchor, node.clone());
        }
        let Some((parent, _)) = self.stack.last_mut() else {
            // Top-level node of the current document
            self.stack.push((node, 0));
            return;
        };
        match &mut parent.kind {
            DocNodeKind::Sequence(items) => items.push(node),
            DocNodeKind::Mapping(entries) => {
                let Some(pending) = self.keys.last_mut() else {
                    return;
                };
                match pending.take() {
                    Some(key) => entries.push((key, node)),
                    None => *pending = Some(node),
                }
            }
            DocNodeKind::Scalar { .. } => {
                self.error = Some("scalar cannot hold children".to_string());
            }
        }
    }

    fn close(&mut self) {
        if let Some((node, anchor)) = self.stack.pop() {
            self.insert(node, anchor);
        }
    }
}

impl MarkedEventReceiver for TreeBuilder {
    fn on_event(&mut self, event: Event, mark: Marker) {
        if self.error.is_some() {
            return;
        }
        match event {
            Event::DocumentEnd => {
                if let Some((node, _)) = self.stack.pop() {
                    self.documents.push(node);
                }
                self.stack.clear();
                self.keys.clear();
            }
            Event::Scalar(text, style, anchor, _) => {
                let plain = matches!(style, TScalarStyle::Plain);
                self.insert(DocNode::new(DocNodeKind::Scalar { text, plain }, mark), anchor);
            }
            Event::SequenceStart(anchor, _) => {
                self.stack
                    .push((DocNode::new(DocNodeKind::Sequence(Vec::new()), mark), anchor));
            }
            Event::MappingStart(anchor, _) => {
                self.stack
                    .push((DocNode::new(DocNodeKind::Mapping(Vec::new()), mark), anchor));
                self.keys.push(None);
            }
            Event::SequenceEnd => self.close(),
            Event::MappingEnd => {
                self.keys.pop();
                self.close();
            }
            Event::Alias(id) => match self.anchors.get(&id).cloned() {
                Some(node) => self.insert(node, 0),
                None => self.error = Some(format!("unknown anchor (id {})", id)),
            },
            _ => {}
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse text under the tolerant (YAML superset) grammar.
///
/// Returns every document in order; empty text yields no documents.
pub fn parse_documents(text: &str) -> Result<Vec<DocNode>> {
    let mut builder = TreeBuilder::default();
    let mut parser = Parser::new(text.chars());
    parser
        .load(&mut builder, true)
        .map_err(|e| Error::StructuralParse {
            message: e.to_string(),
            line: Some(e.marker().line().saturating_sub(1)),
        })?;

    if let Some(message) = builder.error {
        return Err(Error::StructuralParse {
            message,
            line: None,
        });
    }
    Ok(builder.documents)
}

/// Check whether text is valid under the strict JSON grammar.
pub fn is_strict_json(text: &str) -> bool {
    serde_json::from_str::<serde::de::IgnoredAny>(text).is_ok()
}

fn first_significant_char(text: &str) -> Option<char> {
    text.chars().find(|c| !matches!(c, ' ' | '\t' | '\n' | '\r'))
}

/// Result of parsing and classifying a text buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Classified {
    pub format: Format,
    /// Parsed documents; always empty for [`Format::Text`]
    pub documents: Vec<DocNode>,
}

/// Parse and classify text.
///
/// Never fails: unparsable text is a legitimate plain-text document.
pub fn classify(text: &str) -> Classified {
    let documents = match parse_documents(text) {
        Ok(documents) if !documents.is_empty() => documents,
        Ok(_) => {
            return Classified {
                format: Format::Text,
                documents: Vec::new(),
            }
        }
        Err(e) => {
            debug!("Structural parse failed, treating as text: {}", e);
            return Classified {
                format: Format::Text,
                documents: Vec::new(),
            };
        }
    };

    let format = match first_significant_char(text) {
        Some('{') | Some('[') => {
            if is_strict_json(text) {
                Format::Json
            } else {
                Format::Yaml
            }
        }
        _ => Format::Yaml,
    };

    debug!(
        "Classified text as {} ({} document(s))",
        format.display_name(),
        documents.len()
    );
    Classified { format, documents }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
