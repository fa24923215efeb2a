//! Pairwise Common Library
//!
//! Selection logic, DOM model and page bindings for the pairwise comparison
//! widget.

pub mod audit;
pub mod controller;
pub mod dom;
pub mod error;
pub mod page;
pub mod types;

// Re-export commonly used types
pub use audit::{audit, AuditIssue, AuditRule};
pub use controller::{apply_click, next_state, render, restore, restore_state, ItemView};
pub use dom::{Document, NodeId};
pub use error::{Error, Result};
pub use page::{RankPage, HINT_CLASS};
pub use types::*;

/// Pairwise version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default config directory
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".pairwise")
}

/// Default CLI config path
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join("config.toml")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
