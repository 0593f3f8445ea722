//! Line ending policy and conversion
//!
//! Text shown in the editor always uses CRLF line breaks. The document's own
//! line ending preference only matters when bytes are written back out, so
//! conversion is a pure function the file I/O layer applies at save time.

use serde::{Deserialize, Serialize};

/// End-of-line convention used when writing a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// `\r\n` (Windows)
    #[default]
    Crlf,
    /// `\n` (Unix)
    Lf,
    /// `\r` (classic Mac)
    Cr,
}

impl LineEnding {
    /// The line break sequence.
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "\r\n",
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
        }
    }

    /// Get a display label for the line ending.
    pub fn label(&self) -> &'static str {
        match self {
            LineEnding::Crlf => "CRLF (Windows)",
            LineEnding::Lf => "LF (Unix)",
            LineEnding::Cr => "CR (Mac Legacy)",
        }
    }

    /// Get all available line endings.
    pub fn all() -> &'static [LineEnding] {
        &[LineEnding::Crlf, LineEnding::Lf, LineEnding::Cr]
    }

    /// Detect the most common line break in `text`.
    ///
    /// Returns `None` when the text has no line breaks. Ties prefer CRLF,
    /// then LF.
    pub fn detect(text: &str) -> Option<LineEnding> {
        let (mut crlf, mut lf, mut cr) = (0usize, 0usize, 0usize);
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' if chars.peek() == Some(&'\n') => {
                    chars.next();
                    crlf += 1;
                }
                '\r' => cr += 1,
                '\n' => lf += 1,
                _ => {}
            }
        }
        if crlf + lf + cr == 0 {
            None
        } else if crlf >= lf && crlf >= cr {
            Some(LineEnding::Crlf)
        } else if lf >= cr {
            Some(LineEnding::Lf)
        } else {
            Some(LineEnding::Cr)
        }
    }

    /// Rewrite every line break (`\r\n`, lone `\r`, lone `\n`) to this convention.
    pub fn apply(&self, text: &str) -> String {
        let eol = self.as_str();
        let mut output = String::with_capacity(text.len() + text.len() / 16);
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    if chars.peek() == Some(&'\n') {
                        chars.next();
                    }
                    output.push_str(eol);
                }
                '\n' => output.push_str(eol),
                _ => output.push(c),
            }
        }
        output
    }
}

/// Normalize text to the CRLF display convention.
pub fn normalize_to_crlf(text: &str) -> String {
    LineEnding::Crlf.apply(text)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
