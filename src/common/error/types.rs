//! Unified error types for odtpara.
//!
//! Structural errors (collection indices, missing entries, malformed markup)
//! are returned to the caller. Style resolution never returns these; it logs
//! them and degrades to "no style contribution".
use thiserror::Error;

/// Main error type for odtpara operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Collection insert at a position past the end
    #[error("Index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// Entry, style or property not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Attached style object does not have the expected shape
    #[error("Malformed style reference: {0}")]
    MalformedStyleReference(String),

    /// Markup does not have the expected structure
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// XML parsing error
    #[error("XML error: {0}")]
    XmlError(String),

    /// Namespace prefix not declared in the document context
    #[error("Unknown namespace prefix: {0}")]
    UnknownNamespace(String),
}

/// Result type for odtpara operations.
pub type Result<T> = std::result::Result<T, Error>;
