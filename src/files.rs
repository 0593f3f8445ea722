//! File I/O for documents
//!
//! Reads files as UTF-8 and writes text exactly as given. Line-ending
//! conversion happens before writing, in [`Document::text_for_save`].
//!
//! [`Document::text_for_save`]: crate::document::Document::text_for_save

use crate::error::{Error, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Read a file as UTF-8 text.
pub fn read_text(path: &Path) -> Result<String> {
    debug!("Reading {}", path.display());
    let bytes = fs::read(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
    })
}

/// Write text to a file, replacing its contents.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    debug!("Writing {} bytes to {}", text.len(), path.display());
    fs::write(path, text).map_err(|source| Error::FileWrite {
        path: path.to_path_buf(),
        source,
    })
}
