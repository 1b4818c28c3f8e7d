//! Effective style resolution for HTML projection.
//!
//! A paragraph's inline CSS comes from its attached style object when it has
//! a plain one, and otherwise from the document's global definitions: the
//! style named by the paragraph, the parents of that style, and as a last
//! resort the reserved style of the paragraph's category.

use super::config::{HtmlOptions, ItalicEmission};
use crate::common::fonts::html_font;
use crate::common::unit::pt_to_px;
use crate::common::xml::escape_attr;
use crate::common::{Error, Result};
use crate::odf::elements::style::{
    PropertyGroup, PropertyKey, StyleDefinition, StyleFamily, StyleRegistry,
};
use crate::odf::elements::text::Paragraph;
use smallvec::SmallVec;
use std::fmt;

/// Attached style of `paragraph`, checked to be a paragraph style
pub(crate) fn attached_paragraph_style(paragraph: &Paragraph) -> Result<Option<&StyleDefinition>> {
    match paragraph.style() {
        Some(style) if style.family() != StyleFamily::Paragraph => {
            Err(Error::MalformedStyleReference(format!(
                "style '{}' attached to a paragraph has family '{}'",
                style.name(),
                style.family().as_str()
            )))
        },
        other => Ok(other),
    }
}

/// Ordered list of CSS declarations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CssDeclarations {
    declarations: SmallVec<[(&'static str, String); 8]>,
}

impl CssDeclarations {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a declaration
    pub fn push(&mut self, property: &'static str, value: impl Into<String>) {
        self.declarations.push((property, value.into()));
    }

    /// Value of the last declaration of `property`
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Check if there is nothing to emit
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Number of declarations
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Iterate over `(property, value)` pairs in emission order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.declarations.iter().map(|(p, v)| (*p, v.as_str()))
    }

    /// Append all declarations of `other`
    pub fn extend(&mut self, other: CssDeclarations) {
        self.declarations.extend(other.declarations);
    }

    /// Map the set properties of `group` to CSS, in canonical key order
    pub fn from_group(group: &PropertyGroup, options: &HtmlOptions) -> Self {
        let mut css = Self::new();
        for key in PropertyKey::BLOCK.iter().chain(PropertyKey::RUN.iter()) {
            if let Some(value) = group.get(*key) {
                let (property, value) = map_property(*key, value, options);
                css.push(property, value);
            }
        }
        css
    }

    /// ` style="..."` attribute text, or an empty string when there are no
    /// declarations
    pub fn style_attribute(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!(" style=\"{}\"", escape_attr(&self.to_string()))
    }
}

impl fmt::Display for CssDeclarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", property, value)?;
        }
        Ok(())
    }
}

/// CSS declaration for one ODF property.
///
/// Font style, weight and underline are emitted by presence; their ODF
/// value is not consulted.
fn map_property(key: PropertyKey, value: &str, options: &HtmlOptions) -> (&'static str, String) {
    match key {
        PropertyKey::TextAlign => ("text-align", value.to_string()),
        PropertyKey::LineHeight => ("line-height", value.to_string()),
        PropertyKey::MarginTop => ("margin-top", value.to_string()),
        PropertyKey::MarginBottom => ("margin-bottom", value.to_string()),
        PropertyKey::MarginLeft => ("margin-left", value.to_string()),
        PropertyKey::MarginRight => ("margin-right", value.to_string()),
        PropertyKey::FontSize => ("font-size", pt_to_px(value, options.pixels_per_inch)),
        PropertyKey::FontStyle => match options.italic_emission {
            ItalicEmission::Standard => ("font-style", "italic".to_string()),
            ItalicEmission::Legacy => ("font-size", "italic".to_string()),
        },
        PropertyKey::FontWeight => ("font-weight", "bold".to_string()),
        PropertyKey::UnderlineStyle => ("text-decoration", "underline".to_string()),
        PropertyKey::FontName => ("font-family", html_font(value)),
        PropertyKey::Color => ("color", value.to_string()),
    }
}

/// Resolves the effective CSS of a paragraph
#[derive(Debug, Clone, Copy)]
pub struct StyleCascade<'a> {
    registry: &'a StyleRegistry,
    options: &'a HtmlOptions,
}

impl<'a> StyleCascade<'a> {
    /// Create a resolver over `registry`
    pub fn new(registry: &'a StyleRegistry, options: &'a HtmlOptions) -> Self {
        Self { registry, options }
    }

    /// Effective declarations for `paragraph`.
    ///
    /// A plain attached style is used on its own. Without one, or when the
    /// attached style is heading-like or not a paragraph style, the
    /// definition is looked up globally. Lookup misses yield an empty list.
    pub fn resolve(&self, paragraph: &Paragraph) -> CssDeclarations {
        match Self::attached(paragraph) {
            Some(style) if !style.is_heading() => self.own(style),
            _ => self.global(paragraph),
        }
    }

    /// Attached paragraph style, or `None` when it is missing or has the
    /// wrong family. The latter is logged and otherwise ignored.
    pub fn attached(paragraph: &Paragraph) -> Option<&StyleDefinition> {
        attached_paragraph_style(paragraph).unwrap_or_else(|e| {
            log::warn!("{}", e);
            None
        })
    }

    /// Declarations from an attached style's own groups, block then run
    pub fn own(&self, style: &StyleDefinition) -> CssDeclarations {
        let mut css = CssDeclarations::new();
        if let Some(block) = style.paragraph_properties() {
            css.extend(CssDeclarations::from_group(block, self.options));
        }
        if let Some(run) = style.text_properties() {
            css.extend(CssDeclarations::from_group(run, self.options));
        }
        css
    }

    /// Declarations from the global registry only
    pub fn global(&self, paragraph: &Paragraph) -> CssDeclarations {
        let Some(definition) = self.lookup(paragraph) else {
            return CssDeclarations::new();
        };
        self.merged(definition)
    }

    /// Definition by the paragraph's style name, with a second chance by
    /// its parent category name
    fn lookup(&self, paragraph: &Paragraph) -> Option<&'a StyleDefinition> {
        if let Some(found) = paragraph.style_name().and_then(|n| self.registry.get_style(n)) {
            return Some(found);
        }

        let fallback = paragraph
            .style()
            .and_then(StyleDefinition::parent_style_name)
            .unwrap_or_else(|| paragraph.parent_style().reserved_name());
        match self.registry.get_style(fallback) {
            Some(found) => {
                log::debug!(
                    "Style {:?} not registered; using {}",
                    paragraph.style_name(),
                    fallback
                );
                Some(found)
            },
            None => {
                log::debug!(
                    "No global style for {:?} or {}",
                    paragraph.style_name(),
                    fallback
                );
                None
            },
        }
    }

    /// Merge `definition` over its ancestors: ancestor blocks, own block,
    /// ancestor runs, own run, with later values winning per key
    pub fn merged(&self, definition: &StyleDefinition) -> CssDeclarations {
        let ancestors = self.registry.ancestors(definition, self.options.parent_hops);

        let mut block = PropertyGroup::new();
        let mut run = PropertyGroup::new();
        // Farthest ancestor first so nearer definitions override it
        for style in ancestors.iter().rev().copied().chain(std::iter::once(definition)) {
            if let Some(props) = style.paragraph_properties() {
                block.merge_from(props);
            }
            if let Some(props) = style.text_properties() {
                run.merge_from(props);
            }
        }

        let mut css = CssDeclarations::from_group(&block, self.options);
        css.extend(CssDeclarations::from_group(&run, self.options));
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::odf::elements::text::{ParentStyleKind, STANDARD_STYLE};
    use crate::odf::odt::TextDocument;

    fn registry() -> StyleRegistry {
        let mut registry = StyleRegistry::new();
        registry.add_style(
            StyleDefinition::new("Parent", StyleFamily::Paragraph)
                .with_parent("Grand")
                .with_paragraph_property(PropertyKey::MarginTop, "10pt")
                .with_text_property(PropertyKey::Color, "red"),
        );
        registry.add_style(
            StyleDefinition::new("Child", StyleFamily::Paragraph)
                .with_parent("Parent")
                .with_paragraph_property(PropertyKey::MarginTop, "20pt"),
        );
        registry.add_style(
            StyleDefinition::new("Grand", StyleFamily::Paragraph)
                .with_paragraph_property(PropertyKey::TextAlign, "justify"),
        );
        registry
    }

    fn bound(doc: &TextDocument, style_name: &str) -> Paragraph {
        let mut p = Paragraph::with_text(doc, ParentStyleKind::Standard, "x").unwrap();
        p.set_style_name(style_name);
        p
    }

    #[test]
    fn test_cascade_override() {
        let doc = TextDocument::with_styles(registry());
        let options = HtmlOptions::default();
        let css = StyleCascade::new(doc.styles(), &options).resolve(&bound(&doc, "Child"));
        assert_eq!(css.get("margin-top"), Some("20pt"));
        assert!(!css.to_string().contains("10pt"));
    }

    #[test]
    fn test_cascade_inheritance() {
        let doc = TextDocument::with_styles(registry());
        let options = HtmlOptions::default();
        let css = StyleCascade::new(doc.styles(), &options).resolve(&bound(&doc, "Child"));
        assert_eq!(css.to_string(), "margin-top: 20pt; color: red;");
    }

    #[test]
    fn test_parent_hops() {
        let doc = TextDocument::with_styles(registry());
        let p = bound(&doc, "Child");

        let two = HtmlOptions::new().with_parent_hops(2);
        let css = StyleCascade::new(doc.styles(), &two).resolve(&p);
        assert_eq!(css.to_string(), "text-align: justify; margin-top: 20pt; color: red;");

        let none = HtmlOptions::new().with_parent_hops(0);
        let css = StyleCascade::new(doc.styles(), &none).resolve(&p);
        assert_eq!(css.to_string(), "margin-top: 20pt;");
    }

    #[test]
    fn test_second_chance_lookup() {
        let mut registry = registry();
        registry.add_style(
            StyleDefinition::new(STANDARD_STYLE, StyleFamily::Paragraph)
                .with_text_property(PropertyKey::FontName, "Arial"),
        );
        let doc = TextDocument::with_styles(registry);
        let options = HtmlOptions::default();
        let cascade = StyleCascade::new(doc.styles(), &options);

        // Unregistered name falls back to the category's reserved style
        let css = cascade.resolve(&bound(&doc, "Missing"));
        assert_eq!(css.to_string(), "font-family: Arial, Helvetica, sans-serif;");

        // Heading style attached: its parent name is the second chance
        let mut heading = Paragraph::new(&doc, "Heading_20_1").unwrap();
        heading.set_style(Some(
            StyleDefinition::new("Heading_20_1", StyleFamily::Paragraph)
                .with_parent("Heading")
                .with_text_property(PropertyKey::Color, "blue"),
        ));
        let doc2 = TextDocument::with_styles(registry_with_heading());
        let css = StyleCascade::new(doc2.styles(), &options).resolve(&heading);
        assert_eq!(css.to_string(), "font-size: 18.67px; font-weight: bold;");
    }

    fn registry_with_heading() -> StyleRegistry {
        let mut registry = StyleRegistry::new();
        registry.add_style(
            StyleDefinition::new("Heading", StyleFamily::Paragraph)
                .with_text_property(PropertyKey::FontSize, "14pt")
                .with_text_property(PropertyKey::FontWeight, "bold"),
        );
        registry
    }

    #[test]
    fn test_attached_style_uses_own_groups() {
        let doc = TextDocument::with_styles(registry());
        let options = HtmlOptions::default();
        let mut p = Paragraph::new(&doc, "Child").unwrap();
        p.style_mut()
            .unwrap()
            .text_properties_mut()
            .set(PropertyKey::FontStyle, "italic");
        let css = StyleCascade::new(doc.styles(), &options).resolve(&p);
        // Registry entry "Child" is not consulted
        assert_eq!(css.to_string(), "font-style: italic;");
    }

    #[test]
    fn test_wrong_family_attached_style_uses_registry() {
        let mut registry = StyleRegistry::new();
        registry.add_style(
            StyleDefinition::new("T9", StyleFamily::Paragraph)
                .with_paragraph_property(PropertyKey::MarginTop, "1cm"),
        );
        let doc = TextDocument::with_styles(registry);
        let options = HtmlOptions::default();
        let mut p = Paragraph::with_text(&doc, ParentStyleKind::Standard, "x").unwrap();
        p.set_style(Some(
            StyleDefinition::new("T9", StyleFamily::Text)
                .with_text_property(PropertyKey::Color, "red"),
        ));

        assert!(StyleCascade::attached(&p).is_none());
        let css = StyleCascade::new(doc.styles(), &options).resolve(&p);
        assert_eq!(css.to_string(), "margin-top: 1cm;");
    }

    #[test]
    fn test_property_mapping() {
        let group = PropertyGroup::new()
            .with(PropertyKey::Color, "#112233")
            .with(PropertyKey::UnderlineStyle, "solid")
            .with(PropertyKey::FontWeight, "700")
            .with(PropertyKey::FontStyle, "oblique")
            .with(PropertyKey::FontSize, "12pt")
            .with(PropertyKey::MarginRight, "1cm")
            .with(PropertyKey::MarginLeft, "2cm")
            .with(PropertyKey::MarginBottom, "3mm")
            .with(PropertyKey::LineHeight, "150%")
            .with(PropertyKey::TextAlign, "end");
        let css = CssDeclarations::from_group(&group, &HtmlOptions::default());
        assert_eq!(
            css.to_string(),
            "text-align: end; line-height: 150%; margin-bottom: 3mm; margin-left: 2cm; \
             margin-right: 1cm; font-size: 16px; font-style: italic; font-weight: bold; \
             text-decoration: underline; color: #112233;"
        );

        let legacy = HtmlOptions::new().with_italic_emission(ItalicEmission::Legacy);
        let css = CssDeclarations::from_group(&group, &legacy);
        assert!(css.to_string().contains("font-size: 16px; font-size: italic;"));
    }

    #[test]
    fn test_empty_resolution() {
        let doc = TextDocument::new();
        let options = HtmlOptions::default();
        let css = StyleCascade::new(doc.styles(), &options).resolve(&bound(&doc, "Nothing"));
        assert!(css.is_empty());
        assert_eq!(css.style_attribute(), "");
    }

    #[test]
    fn test_style_attribute_escaping() {
        let mut css = CssDeclarations::new();
        css.push("font-family", "'A \"B\"', serif");
        assert_eq!(
            css.style_attribute(),
            " style=\"font-family: 'A &quot;B&quot;', serif;\""
        );
    }
}
