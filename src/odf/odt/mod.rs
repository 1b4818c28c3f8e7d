//! OpenDocument Text (.odt) document context.
//!
//! # References
//! - ODF Specification: §5 (Paragraph Elements Content)

mod document;

pub use document::TextDocument;
