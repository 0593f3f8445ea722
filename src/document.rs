//! Open document container
//!
//! A [`Document`] owns everything about one open tab: the text buffer (always
//! in the CRLF display convention), the model and format detected from that
//! text, the current tree projection, the line-ending policy used on save,
//! the file identity and the dirty flag.
//!
//! Every mutation goes through text. A tree edit is applied to the model,
//! serialized, pushed into the buffer, and the projection is then rebuilt by
//! parsing that text again, so the tree always reflects what would be saved.

use crate::error::Result;
use crate::line_ending::{normalize_to_crlf, LineEnding};
use crate::structured::{
    self, reconcile, serialize_for_display, Address, DocumentNode, EditOutcome, Format,
    LoadedDocument, Value,
};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Title shown for documents that were never saved.
pub const UNTITLED: &str = "Untitled";

/// Lifecycle state of a document, derived from its fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentState {
    /// No text at all
    Empty,
    /// Text loaded or re-projected, no unsaved edits
    Parsed(Format),
    /// Unsaved edits
    Edited(Format),
    /// Written to disk and unchanged since
    Saved(Format),
}

/// One open document.
#[derive(Debug, Clone)]
pub struct Document {
    text: String,
    loaded: LoadedDocument,
    line_ending: LineEnding,
    path: Option<PathBuf>,
    dirty: bool,
    saved_once: bool,
}

impl Document {
    /// Create an untitled, empty document.
    pub fn new(line_ending: LineEnding) -> Self {
        Self {
            text: String::new(),
            loaded: LoadedDocument::default(),
            line_ending,
            path: None,
            dirty: false,
            saved_once: false,
        }
    }

    /// Create a document from text read from `path`.
    ///
    /// The line-ending policy is taken from the text when it has line
    /// breaks, otherwise `fallback` is used.
    pub fn open(path: PathBuf, text: &str, fallback: LineEnding) -> Self {
        let line_ending = LineEnding::detect(text).unwrap_or(fallback);
        let mut doc = Self::new(line_ending);
        doc.path = Some(path);
        doc.load(text);
        info!(
            "Opened {} as {} ({})",
            doc.title(),
            doc.format().display_name(),
            doc.line_ending.label()
        );
        doc
    }

    /// Replace the buffer with `text` and re-project, without marking dirty.
    pub fn load(&mut self, text: &str) {
        self.text = normalize_to_crlf(text);
        self.refresh_projection();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Text as shown in the editor (CRLF line breaks).
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn format(&self) -> Format {
        self.loaded.format
    }

    /// The model, absent for plain text.
    pub fn value(&self) -> Option<&Value> {
        self.loaded.value.as_ref()
    }

    /// The current tree projection.
    pub fn nodes(&self) -> &[DocumentNode] {
        &self.loaded.nodes
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        if self.line_ending != line_ending {
            self.line_ending = line_ending;
            self.dirty = true;
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current lifecycle state.
    pub fn state(&self) -> DocumentState {
        let format = self.format();
        if self.dirty {
            DocumentState::Edited(format)
        } else if self.text.is_empty() {
            DocumentState::Empty
        } else if self.saved_once {
            DocumentState::Saved(format)
        } else {
            DocumentState::Parsed(format)
        }
    }

    /// Display title: file name or "Untitled", with `*` when dirty.
    pub fn title(&self) -> String {
        self.title_with(UNTITLED)
    }

    /// Like [`Document::title`] with a caller-supplied untitled name.
    pub fn title_with(&self, untitled: &str) -> String {
        let name = self
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or(untitled);

        if self.dirty {
            format!("{}*", name)
        } else {
            name.to_string()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Re-run classification and projection on the current text.
    pub fn refresh_projection(&mut self) -> &LoadedDocument {
        self.loaded = structured::refresh_projection(&self.text);
        &self.loaded
    }

    /// Text changed in the editor surface.
    pub fn set_text(&mut self, text: &str) {
        let text = normalize_to_crlf(text);
        if text == self.text {
            return;
        }
        self.text = text;
        self.dirty = true;
        self.refresh_projection();
    }

    /// Commit a tree label edit and return the resulting text.
    ///
    /// Returns the current text unchanged when the edit does nothing: the
    /// label was not modified, the address does not resolve, or the text
    /// does not match any edit shape.
    pub fn commit_node_edit(
        &mut self,
        address: &Address,
        is_sequence_element: bool,
        new_label: &str,
    ) -> &str {
        let unchanged_label = self
            .loaded
            .nodes
            .iter()
            .any(|node| node.address == *address && node.label == new_label);
        if unchanged_label {
            debug!("Label at {} not modified, ignoring", address);
            return &self.text;
        }

        let format = self.format();
        let Some(model) = self.loaded.value.as_mut() else {
            debug!("No model to edit in a {} document", format.display_name());
            return &self.text;
        };

        let outcome = reconcile(model, address, is_sequence_element, new_label);
        if !outcome.is_change() {
            return &self.text;
        }
        if let EditOutcome::KeyRenamed { from, to } = &outcome {
            debug!("Renamed key {:?} to {:?}", from, to);
        }

        match serialize_for_display(model, format) {
            Ok(text) => {
                self.text = text;
                self.dirty = true;
            }
            Err(e) => debug!("Could not serialize edited model: {}", e),
        }
        // The tree is rebuilt from text, not from the edited model
        self.refresh_projection();
        &self.text
    }

    /// "Format as JSON". On error the text is left untouched.
    pub fn reformat_as_json(&mut self) -> Result<&str> {
        let text = structured::reformat_as_json(&self.text)?;
        self.replace_text(text);
        Ok(&self.text)
    }

    /// "Format as YAML". On error the text is left untouched.
    pub fn reformat_as_yaml(&mut self) -> Result<&str> {
        let text = structured::reformat_as_yaml(&self.text)?;
        self.replace_text(text);
        Ok(&self.text)
    }

    fn replace_text(&mut self, text: String) {
        if text != self.text {
            self.text = text;
            self.dirty = true;
        }
        self.refresh_projection();
    }

    /// Text converted to the document's line-ending policy, ready to write.
    pub fn text_for_save(&self) -> String {
        self.line_ending.apply(&self.text)
    }

    /// Record a successful save to `path`.
    pub fn mark_saved(&mut self, path: PathBuf) {
        self.path = Some(path);
        self.dirty = false;
        self.saved_once = true;
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(LineEnding::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
