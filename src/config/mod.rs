//! Configuration module for jyedit
//!
//! This module handles user preferences and the small session record
//! (previously open files, UI language), including serialization to JSON
//! and persistent storage in the platform-specific config directory.

mod persistence;
mod settings;

pub use persistence::*;
pub use settings::*;
