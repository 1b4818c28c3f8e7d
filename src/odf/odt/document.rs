//! OpenDocument Text document context.

use crate::common::{Error, Result};
use crate::html::{HtmlContext, HtmlOptions};
use crate::odf::elements::element::{Element, ElementBase};
use crate::odf::elements::namespace::NamespaceContext;
use crate::odf::elements::style::StyleRegistry;
use crate::odf::elements::text::Paragraph;

/// Document context a paragraph is created against.
///
/// Holds the namespace bindings used to create and query markup, and the
/// document's global style registry. Package (zip) handling is left to the
/// caller: feed the XML parts in directly.
///
/// # Examples
///
/// ```
/// use odtpara::odf::odt::TextDocument;
/// use odtpara::odf::elements::text::{Paragraph, ParentStyleKind};
/// use odtpara::html::{HtmlOptions, ToHtml};
///
/// # fn main() -> odtpara::Result<()> {
/// let doc = TextDocument::new();
/// let para = Paragraph::with_text(&doc, ParentStyleKind::Standard, "Hello")?;
/// assert_eq!(para.to_html(&doc.html_context(HtmlOptions::default())), "<p>Hello</p>");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TextDocument {
    namespaces: NamespaceContext,
    styles: StyleRegistry,
}

impl Default for TextDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl TextDocument {
    /// Create a document with the standard ODF namespaces and no styles
    pub fn new() -> Self {
        Self {
            namespaces: NamespaceContext::odf(),
            styles: StyleRegistry::new(),
        }
    }

    /// Create a document with an existing style registry
    pub fn with_styles(styles: StyleRegistry) -> Self {
        Self {
            namespaces: NamespaceContext::odf(),
            styles,
        }
    }

    /// Create a document whose registry is parsed from a `styles.xml` part
    pub fn from_styles_xml(styles_xml: &str) -> Result<Self> {
        Ok(Self::with_styles(StyleRegistry::from_xml(styles_xml)?))
    }

    /// Namespace bindings
    pub fn namespaces(&self) -> &NamespaceContext {
        &self.namespaces
    }

    /// Global style registry
    pub fn styles(&self) -> &StyleRegistry {
        &self.styles
    }

    /// Mutable global style registry
    pub fn styles_mut(&mut self) -> &mut StyleRegistry {
        &mut self.styles
    }

    /// Create an element `prefix:local_name`; the prefix must be bound
    pub fn create_element(&self, local_name: &str, prefix: &str) -> Result<Element> {
        self.check_prefix(prefix)?;
        Ok(Element::new_with_context(
            &format!("{}:{}", prefix, local_name),
            &self.namespaces,
        ))
    }

    /// Set attribute `prefix:local_name` on `element`; the prefix must be bound
    pub fn create_attribute(
        &self,
        element: &mut Element,
        local_name: &str,
        prefix: &str,
        value: &str,
    ) -> Result<()> {
        self.check_prefix(prefix)?;
        element.set_attribute(&format!("{}:{}", prefix, local_name), value);
        Ok(())
    }

    fn check_prefix(&self, prefix: &str) -> Result<()> {
        match self.namespaces.resolve_prefix(prefix) {
            Some(_) => Ok(()),
            None => Err(Error::UnknownNamespace(prefix.to_string())),
        }
    }

    /// Bind every top-level paragraph of a `content.xml` part.
    ///
    /// Automatic styles declared in the part are added to the registry.
    pub fn load_paragraphs(&mut self, content_xml: &str) -> Result<Vec<Paragraph>> {
        let root = Element::parse(content_xml)?;

        if let Some(automatic) = root
            .query_single("office:automatic-styles", &self.namespaces)
            .and_then(|s| s.as_element())
        {
            let found = StyleRegistry::from_element(automatic, &self.namespaces);
            for style in found.iter() {
                self.styles.add_style(style.clone());
            }
        }

        let body = root
            .query_single("//office:body/office:text", &self.namespaces)
            .and_then(|s| s.as_element())
            .ok_or_else(|| Error::InvalidFormat("No office:text body".to_string()))?;

        let mut paragraphs = Vec::new();
        for child in body.child_elements() {
            if child.name_matches("text:p", Some(&self.namespaces)) {
                paragraphs.push(Paragraph::from_element(child.clone(), self)?);
            } else {
                log::debug!("Skipping top-level <{}>", child.tag_name());
            }
        }
        Ok(paragraphs)
    }

    /// Projection context borrowing this document's registry
    pub fn html_context(&self, options: HtmlOptions) -> HtmlContext<'_> {
        HtmlContext::new(&self.styles, options)
    }
}
