//! Error types for Pairwise

use thiserror::Error;

/// Result type alias using Pairwise Error
pub type Result<T> = std::result::Result<T, Error>;

/// Pairwise error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("HTML parse error: {0}")]
    HtmlParse(String),

    #[error("Required element not found: #{id}")]
    MissingElement { id: String },

    #[error("Node is not an element")]
    NotAnElement,

    #[error("Node is not attached to the document")]
    DetachedNode,

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),
}

impl Error {
    pub fn missing(id: impl Into<String>) -> Self {
        Error::MissingElement { id: id.into() }
    }
}
