//! Session state for jyedit
//!
//! The [`Session`] owns the open documents (tabs), tracks the single active
//! one and the user settings, and moves documents to and from disk. There is
//! always at least one document open; closing the last one leaves a fresh
//! untitled document behind.

use crate::config::Settings;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::files;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};

/// The set of open documents plus the settings they were opened under.
#[derive(Debug)]
pub struct Session {
    documents: Vec<Document>,
    active_index: usize,
    settings: Settings,
}

impl Session {
    /// Create a session with one untitled document.
    pub fn new(settings: Settings) -> Self {
        let first = Document::new(settings.default_line_ending);
        Self {
            documents: vec![first],
            active_index: 0,
            settings,
        }
    }

    /// Create a session and reopen the files recorded in `settings`.
    ///
    /// Files that can no longer be read are skipped with a warning.
    pub fn restore(settings: Settings) -> Self {
        let paths = settings.open_files.clone();
        let mut session = Self::new(settings);
        for path in paths {
            if let Err(e) = session.open_file(&path) {
                warn!("Could not restore {}: {}", path.display(), e);
            }
        }
        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn document(&self, index: usize) -> Option<&Document> {
        self.documents.get(index)
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn active(&self) -> Option<&Document> {
        self.documents.get(self.active_index)
    }

    pub fn active_mut(&mut self) -> Option<&mut Document> {
        self.documents.get_mut(self.active_index)
    }

    /// Index of the document backed by `path`, if it is open.
    pub fn find_by_path(&self, path: &Path) -> Option<usize> {
        self.documents
            .iter()
            .position(|doc| doc.path() == Some(path))
    }

    /// Check if any document has unsaved changes.
    pub fn has_unsaved_changes(&self) -> bool {
        self.documents.iter().any(Document::is_dirty)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tab Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Create a new untitled document and make it active.
    ///
    /// Returns the index of the new document.
    pub fn new_document(&mut self) -> usize {
        self.documents
            .push(Document::new(self.settings.default_line_ending));
        self.active_index = self.documents.len() - 1;
        debug!("Created new document at index {}", self.active_index);
        self.active_index
    }

    /// Open already-read text as a document backed by `path`.
    ///
    /// If the file is already open, that document becomes active instead.
    /// An untouched untitled document in the active slot is replaced.
    pub fn open_document(&mut self, path: PathBuf, text: &str) -> usize {
        if let Some(index) = self.find_by_path(&path) {
            info!("File already open, switching to tab {}", index);
            self.switch_to(index);
            return index;
        }

        self.settings.add_recent_file(path.clone());
        let doc = Document::open(path, text, self.settings.default_line_ending);

        let replace_active = self
            .active()
            .is_some_and(|d| d.path().is_none() && !d.is_dirty() && d.text().is_empty());
        if replace_active {
            self.documents[self.active_index] = doc;
        } else {
            self.documents.push(doc);
            self.active_index = self.documents.len() - 1;
        }
        self.active_index
    }

    /// Read `path` from disk and open it.
    pub fn open_file(&mut self, path: &Path) -> Result<usize> {
        if let Some(index) = self.find_by_path(path) {
            self.switch_to(index);
            return Ok(index);
        }
        let text = files::read_text(path)?;
        Ok(self.open_document(path.to_path_buf(), &text))
    }

    /// Make `index` the active document and rebuild its projection.
    ///
    /// Returns `false` for an out-of-range index.
    pub fn switch_to(&mut self, index: usize) -> bool {
        let Some(doc) = self.documents.get_mut(index) else {
            warn!("Invalid tab index: {}", index);
            return false;
        };
        doc.refresh_projection();
        self.active_index = index;
        debug!("Switched to tab {}", index);
        true
    }

    /// Close the document at `index`, discarding unsaved changes.
    ///
    /// Returns `true` if the document existed and was closed.
    pub fn close(&mut self, index: usize) -> bool {
        if index >= self.documents.len() {
            return false;
        }

        let closed = self.documents.remove(index);
        if closed.is_dirty() {
            warn!("Closed {} with unsaved changes", closed.title());
        }

        if self.documents.is_empty() {
            self.documents
                .push(Document::new(self.settings.default_line_ending));
            self.active_index = 0;
        } else if self.active_index >= self.documents.len() {
            self.active_index = self.documents.len() - 1;
        } else if index < self.active_index {
            self.active_index -= 1;
        }
        if let Some(doc) = self.documents.get_mut(self.active_index) {
            doc.refresh_projection();
        }

        debug!("Closed tab {}, active is now {}", index, self.active_index);
        true
    }

    /// Close the active document.
    pub fn close_active(&mut self) -> bool {
        self.close(self.active_index)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // File Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Save the active document to its file path.
    ///
    /// Returns an error if the document has no path (use `save_active_as`).
    pub fn save_active(&mut self) -> Result<()> {
        let path = self
            .active()
            .ok_or_else(|| Error::Application("No active document".to_string()))?
            .path()
            .map(Path::to_path_buf)
            .ok_or_else(|| {
                Error::Application("No file path set. Use 'Save As' instead.".to_string())
            })?;
        self.save_active_as(path)
    }

    /// Save the active document to `path`, which becomes its file identity.
    pub fn save_active_as(&mut self, path: PathBuf) -> Result<()> {
        let doc = self
            .documents
            .get_mut(self.active_index)
            .ok_or_else(|| Error::Application("No active document".to_string()))?;

        files::write_text(&path, &doc.text_for_save())?;
        doc.mark_saved(path.clone());
        info!("Saved file: {}", path.display());
        self.settings.add_recent_file(path);
        Ok(())
    }

    /// Paths of the open documents, in tab order.
    pub fn open_paths(&self) -> Vec<PathBuf> {
        self.documents
            .iter()
            .filter_map(|doc| doc.path().map(Path::to_path_buf))
            .collect()
    }

    /// Settings with the open-file list updated, ready to persist.
    pub fn to_settings(&self) -> Settings {
        Settings {
            open_files: self.open_paths(),
            ..self.settings.clone()
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
