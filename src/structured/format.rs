//! Serialization of the value model and explicit reformat commands
//!
//! JSON is pretty-printed with a 4-space indent. YAML goes through
//! `serde_yaml`'s block-style emitter, which indents nested mappings by two
//! spaces. The emitter only ever sees the [`Value`], so anything YAML keeps
//! outside the data (comments, anchors and aliases, flow style, block scalar
//! styles) is not reproduced.
//!
//! Output from this module uses `\n`; callers that push text to the editor
//! surface normalize it with [`normalize_to_crlf`].

use super::parser::{parse_documents, Format};
use super::projection::tree_to_value;
use super::value::Value;
use crate::error::{Error, Result};
use crate::line_ending::normalize_to_crlf;
use log::debug;
use serde::Serialize;

/// Indent used for JSON output.
const JSON_INDENT: &[u8] = b"    ";

/// Separator between YAML documents.
const YAML_DOCUMENT_SEPARATOR: &str = "---\n";

/// Serialize a value in the given format.
///
/// [`Format::Text`] has no serializer of its own and falls back to JSON.
pub fn serialize(value: &Value, format: Format) -> Result<String> {
    match format {
        Format::Json | Format::Text => serialize_to_json(value),
        Format::Yaml => serialize_to_yaml(value),
    }
}

fn serialize_to_json(value: &Value) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::Format {
            format: Format::Json,
            message: e.to_string(),
        })?;
    String::from_utf8(buffer).map_err(|e| Error::Format {
        format: Format::Json,
        message: e.to_string(),
    })
}

fn serialize_to_yaml(value: &Value) -> Result<String> {
    serde_yaml::to_string(value).map_err(|e| Error::Format {
        format: Format::Yaml,
        message: e.to_string(),
    })
}

/// Serialize several YAML documents into one stream.
pub fn serialize_yaml_documents(values: &[Value]) -> Result<String> {
    let documents = values
        .iter()
        .map(serialize_to_yaml)
        .collect::<Result<Vec<_>>>()?;
    Ok(documents.join(YAML_DOCUMENT_SEPARATOR))
}

/// Serialize for the editor surface: format, then normalize to CRLF.
pub fn serialize_for_display(value: &Value, format: Format) -> Result<String> {
    Ok(normalize_to_crlf(&serialize(value, format)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Explicit Reformat Commands
// ─────────────────────────────────────────────────────────────────────────────

/// "Format as JSON": strict JSON parse, then canonical pretty print.
///
/// Empty text is returned unchanged. On failure the error carries the
/// parser's diagnostic for the user.
pub fn reformat_as_json(text: &str) -> Result<String> {
    if text.is_empty() {
        return Ok(String::new());
    }
    let value: Value = serde_json::from_str(text).map_err(|e| {
        debug!("Format as JSON rejected input: {}", e);
        Error::Format {
            format: Format::Json,
            message: e.to_string(),
        }
    })?;
    serialize_for_display(&value, Format::Json)
}

/// "Format as YAML": structural parse, then canonical block-style YAML.
///
/// Every document is kept; documents are separated by `---`. Text without
/// any document is returned unchanged.
pub fn reformat_as_yaml(text: &str) -> Result<String> {
    let documents = parse_documents(text).map_err(|e| {
        debug!("Format as YAML rejected input: {}", e);
        Error::Format {
            format: Format::Yaml,
            message: e.to_string(),
        }
    })?;
    if documents.is_empty() {
        return Ok(text.to_string());
    }
    let values: Vec<Value> = documents.iter().map(tree_to_value).collect();
    Ok(normalize_to_crlf(&serialize_yaml_documents(&values)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
