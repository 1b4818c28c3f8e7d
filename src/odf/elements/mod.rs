//! ODF XML element classes.
//!
//! The markup tree, namespace handling, style definitions and the paragraph
//! content model built on top of them.

/// Core element functionality
pub mod element;
/// Namespace handling utilities
pub mod namespace;
/// Style elements
pub mod style;
/// Text-related elements (paragraphs and runs)
pub mod text;
