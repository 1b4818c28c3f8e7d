//! Core trait for HTML projection.
//!
//! This module defines the `ToHtml` trait implemented by paragraphs, their
//! runs and their nested content.

use super::config::HtmlContext;

/// Core trait for types that can be projected to HTML.
///
/// Projection is total: it never fails. Types without an HTML rendering
/// return `None` from [`ToHtml::html`] and contribute nothing to their
/// parent's output.
///
/// # Examples
///
/// ```
/// use odtpara::html::{HtmlOptions, ToHtml};
/// use odtpara::odf::elements::text::{Paragraph, ParentStyleKind, TextRun};
/// use odtpara::odf::odt::TextDocument;
///
/// # fn main() -> odtpara::Result<()> {
/// let doc = TextDocument::new();
/// let ctx = doc.html_context(HtmlOptions::default());
///
/// let mut para = Paragraph::with_text(&doc, ParentStyleKind::Standard, "a < b")?;
/// para.push_run(TextRun::LineBreak);
/// assert_eq!(para.to_html(&ctx), "<p>a &lt; b<br></p>");
/// # Ok(())
/// # }
/// ```
pub trait ToHtml {
    /// HTML fragment for this item, or `None` if it has no HTML form
    fn html(&self, context: &HtmlContext<'_>) -> Option<String>;

    /// HTML fragment for this item; empty when it has no HTML form
    fn to_html(&self, context: &HtmlContext<'_>) -> String {
        self.html(context).unwrap_or_default()
    }
}
