//! User settings and session record for jyedit
//!
//! This module defines the `Settings` struct that holds the persisted
//! preferences, with serde support for JSON persistence. The structured
//! document engine never reads these; the session layer and the harness do.

use crate::line_ending::LineEnding;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and session state.
///
/// All fields have defaults via the `Default` trait and `#[serde(default)]`,
/// so older or hand-edited files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// UI language tag ("en", "jp")
    pub language: String,

    /// Line ending for new, untitled documents
    pub default_line_ending: LineEnding,

    /// Files open when the session was last saved, in tab order
    pub open_files: Vec<PathBuf>,

    /// Recently opened files (most recent first)
    pub recent_files: Vec<PathBuf>,

    /// Maximum number of recent files to remember
    pub max_recent_files: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            language: String::from("en"),
            default_line_ending: LineEnding::default(),
            open_files: Vec::new(),
            recent_files: Vec::new(),
            max_recent_files: 10,
        }
    }
}

impl Settings {
    /// Add a file to the recent files list.
    ///
    /// If the file already exists in the list, it's moved to the front.
    /// The list is trimmed to `max_recent_files`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|p| p != &path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Sanitize settings after loading a possibly hand-edited file.
    pub fn sanitize(&mut self) {
        if self.language.trim().is_empty() {
            self.language = Settings::default().language;
        }

        // Ensure max_recent_files is reasonable
        if self.max_recent_files == 0 {
            self.max_recent_files = 10;
        } else if self.max_recent_files > 100 {
            self.max_recent_files = 100;
        }
        self.recent_files.truncate(self.max_recent_files);

        // Drop duplicate open files, keeping the first occurrence
        let mut seen = Vec::with_capacity(self.open_files.len());
        self.open_files.retain(|p| {
            if seen.contains(p) {
                false
            } else {
                seen.push(p.clone());
                true
            }
        });
    }

    /// Deserialize and sanitize in one step.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.language, "en");
        assert_eq!(settings.default_line_ending, LineEnding::Crlf);
        assert!(settings.open_files.is_empty());
        assert_eq!(settings.max_recent_files, 10);
    }

    #[test]
    fn test_add_recent_file() {
        let mut settings = Settings {
            max_recent_files: 3,
            ..Settings::default()
        };

        settings.add_recent_file(PathBuf::from("/a.json"));
        settings.add_recent_file(PathBuf::from("/b.yaml"));
        settings.add_recent_file(PathBuf::from("/c.yaml"));
        settings.add_recent_file(PathBuf::from("/a.json"));
        assert_eq!(settings.recent_files[0], PathBuf::from("/a.json"));
        assert_eq!(settings.recent_files.len(), 3);

        settings.add_recent_file(PathBuf::from("/d.json"));
        assert_eq!(settings.recent_files.len(), 3);
        assert!(!settings.recent_files.contains(&PathBuf::from("/b.yaml")));
    }

    #[test]
    fn test_settings_deserialize_with_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"language": "jp"}"#).unwrap();
        assert_eq!(settings.language, "jp");
        assert_eq!(settings.max_recent_files, 10);
        assert_eq!(settings.default_line_ending, LineEnding::Crlf);
    }

    #[test]
    fn test_settings_serialization_roundtrip() {
        let original = Settings {
            language: "jp".to_string(),
            default_line_ending: LineEnding::Lf,
            open_files: vec![PathBuf::from("/x.json")],
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&original).unwrap();
        let deserialized: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_sanitize() {
        let settings = Settings::from_json_sanitized(
            r#"{"language": " ", "max_recent_files": 0, "open_files": ["/a", "/b", "/a"]}"#,
        )
        .unwrap();
        assert_eq!(settings.language, "en");
        assert_eq!(settings.max_recent_files, 10);
        assert_eq!(
            settings.open_files,
            vec![PathBuf::from("/a"), PathBuf::from("/b")]
        );
    }
}
