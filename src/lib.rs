//! jyedit - JSON/YAML editor core
//!
//! Keeps a document's raw text, its typed value model and an editable tree
//! projection in sync. The [`structured`] module holds the engine; the rest
//! is the container and session layer around it.

pub mod config;
pub mod document;
pub mod error;
pub mod files;
pub mod i18n;
pub mod line_ending;
pub mod state;
pub mod structured;
