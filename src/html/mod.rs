//! HTML projection for paragraphs.
//!
//! Projection is one-directional and total: every paragraph renders, and
//! styling that cannot be resolved is dropped rather than reported.
//!
//! # Example
//!
//! ```
//! use odtpara::html::{HtmlOptions, ToHtml};
//! use odtpara::odf::elements::text::Paragraph;
//! use odtpara::odf::odt::TextDocument;
//!
//! # fn main() -> odtpara::Result<()> {
//! let doc = TextDocument::from_styles_xml(r#"<office:document-styles
//!     xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0"
//!     xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0"
//!     xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0">
//!   <office:styles>
//!     <style:style style:name="Standard" style:family="paragraph">
//!       <style:paragraph-properties fo:margin-top="0.2cm"/>
//!     </style:style>
//!   </office:styles>
//! </office:document-styles>"#)?;
//!
//! let para = Paragraph::new(&doc, "Standard")?;
//! let html = para.to_html(&doc.html_context(HtmlOptions::default()));
//! assert_eq!(html, r#"<p style="margin-top: 0.2cm;">&nbsp;</p>"#);
//! # Ok(())
//! # }
//! ```

pub mod cascade;
pub mod config;
pub mod traits;
mod writer;

pub use cascade::{CssDeclarations, StyleCascade};
pub use config::{HtmlContext, HtmlOptions, ItalicEmission};
pub use traits::ToHtml;
