//! odtpara - OpenDocument text paragraphs with a synchronized markup tree
//!
//! This library models an ODF `text:p` paragraph as two ordered collections,
//! inline runs and nested content, backed by a markup element that is kept
//! in step with every mutation. Paragraphs project to HTML through a style
//! cascade over the document's global style definitions.
//!
//! # Features
//!
//! - **Paragraph model**: runs and nested content with identity-tracked entries
//! - **Markup sync**: every insert and remove patches exactly one node of the backing element
//! - **Style registry**: `style:style` definitions parsed from `styles.xml` / `content.xml`
//! - **HTML projection**: block and run properties merged over parent styles
//!
//! # Example - Building a paragraph
//!
//! ```
//! use odtpara::html::{HtmlOptions, ToHtml};
//! use odtpara::odf::{Paragraph, TextDocument, TextRun};
//!
//! # fn main() -> odtpara::Result<()> {
//! let doc = TextDocument::new();
//! let mut para = Paragraph::new(&doc, "Standard")?;
//! let hello = para.push_run(TextRun::Simple("Hello".into()));
//! para.push_run(TextRun::Space(1));
//! para.push_run(TextRun::Simple("world".into()));
//! assert_eq!(para.inner_xml(), "Hello<text:s/>world");
//!
//! para.remove_run(hello)?;
//! assert_eq!(para.inner_xml(), "<text:s/>world");
//! assert_eq!(
//!     para.to_html(&doc.html_context(HtmlOptions::default())),
//!     "<p>&nbsp;world</p>"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Loading paragraphs
//!
//! ```
//! use odtpara::html::{HtmlOptions, ToHtml};
//! use odtpara::odf::TextDocument;
//!
//! # fn main() -> odtpara::Result<()> {
//! let content = r#"<office:document-content
//!     xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
//!     xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0">
//!   <office:body><office:text>
//!     <text:p text:style-name="Standard">Loaded</text:p>
//!   </office:text></office:body>
//! </office:document-content>"#;
//!
//! let mut doc = TextDocument::new();
//! let paragraphs = doc.load_paragraphs(content)?;
//! let ctx = doc.html_context(HtmlOptions::default());
//! assert_eq!(paragraphs[0].to_html(&ctx), "<p>Loaded</p>");
//! # Ok(())
//! # }
//! ```

/// Shared utilities: errors, escaping, units and fonts
pub mod common;

/// HTML projection
///
/// The `ToHtml` trait, the style cascade and projection options.
pub mod html;

/// OpenDocument paragraph model
///
/// Markup tree, style registry, observable collections and the paragraph
/// content node.
pub mod odf;

// Re-export commonly used types for convenience
pub use common::{Error, Result};
pub use html::{HtmlContext, HtmlOptions, ToHtml};
pub use odf::{Paragraph, StyleRegistry, TextDocument, TextRun};
