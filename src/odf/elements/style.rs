//! Style elements for ODF documents.
//!
//! Named style definitions with an optional parent reference and two
//! property groups: block-level (`style:paragraph-properties`) and run-level
//! (`style:text-properties`). The registry holds the document's global
//! styles and answers lookups by name.

use super::element::{Element, ElementBase};
use super::namespace::NamespaceContext;
use crate::common::{Error, Result};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Parent style name that marks a heading-like paragraph style
pub const HEADING_PARENT: &str = "Heading";

/// `style:class` value used by heading styles
pub const HEADING_CLASS: &str = "chapter";

/// Style family types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StyleFamily {
    /// Paragraph styles
    Paragraph,
    /// Text/character styles
    Text,
    /// Table styles
    Table,
    /// Table column styles
    TableColumn,
    /// Table row styles
    TableRow,
    /// Table cell styles
    TableCell,
    /// Graphic styles
    Graphic,
}

impl StyleFamily {
    /// Parse style family from its `style:family` value
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "paragraph" => Some(Self::Paragraph),
            "text" => Some(Self::Text),
            "table" => Some(Self::Table),
            "table-column" => Some(Self::TableColumn),
            "table-row" => Some(Self::TableRow),
            "table-cell" => Some(Self::TableCell),
            "graphic" => Some(Self::Graphic),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Text => "text",
            Self::Table => "table",
            Self::TableColumn => "table-column",
            Self::TableRow => "table-row",
            Self::TableCell => "table-cell",
            Self::Graphic => "graphic",
        }
    }
}

/// Formatting property keys understood by the HTML projection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyKey {
    TextAlign,
    LineHeight,
    MarginTop,
    MarginBottom,
    MarginLeft,
    MarginRight,
    FontSize,
    FontStyle,
    FontWeight,
    UnderlineStyle,
    FontName,
    Color,
}

impl PropertyKey {
    /// Block-level keys in emission order
    pub const BLOCK: [PropertyKey; 6] = [
        PropertyKey::TextAlign,
        PropertyKey::LineHeight,
        PropertyKey::MarginTop,
        PropertyKey::MarginBottom,
        PropertyKey::MarginLeft,
        PropertyKey::MarginRight,
    ];

    /// Run-level keys in emission order
    pub const RUN: [PropertyKey; 6] = [
        PropertyKey::FontSize,
        PropertyKey::FontStyle,
        PropertyKey::FontWeight,
        PropertyKey::UnderlineStyle,
        PropertyKey::FontName,
        PropertyKey::Color,
    ];

    /// ODF attribute carrying this property
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::TextAlign => "fo:text-align",
            Self::LineHeight => "fo:line-height",
            Self::MarginTop => "fo:margin-top",
            Self::MarginBottom => "fo:margin-bottom",
            Self::MarginLeft => "fo:margin-left",
            Self::MarginRight => "fo:margin-right",
            Self::FontSize => "fo:font-size",
            Self::FontStyle => "fo:font-style",
            Self::FontWeight => "fo:font-weight",
            Self::UnderlineStyle => "style:text-underline-style",
            Self::FontName => "style:font-name",
            Self::Color => "fo:color",
        }
    }

    /// Whether the key belongs to the paragraph (block) group
    pub fn is_block(&self) -> bool {
        Self::BLOCK.contains(self)
    }
}

/// Mapping from property key to its raw ODF value.
///
/// Absent keys are unset; nothing defaults to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyGroup {
    values: SmallVec<[(PropertyKey, String); 6]>,
}

impl PropertyGroup {
    /// Create an empty group
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a property value
    pub fn get(&self, key: PropertyKey) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a property, overwriting any previous value
    pub fn set(&mut self, key: PropertyKey, value: impl Into<String>) {
        let value = value.into();
        match self.values.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.values.push((key, value)),
        }
    }

    /// Builder form of [`PropertyGroup::set`]
    pub fn with(mut self, key: PropertyKey, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Unset a property
    pub fn remove(&mut self, key: PropertyKey) -> Option<String> {
        let pos = self.values.iter().position(|(k, _)| *k == key)?;
        Some(self.values.remove(pos).1)
    }

    /// Check if no property is set
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of set properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Iterate over set properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (PropertyKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Overlay `other` onto this group; keys set in `other` win
    pub fn merge_from(&mut self, other: &PropertyGroup) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Read the known properties from a `style:*-properties` element
    pub fn from_element(element: &Element, keys: &[PropertyKey]) -> Self {
        let mut group = Self::new();
        for key in keys {
            if let Some(value) = element.get_attribute(key.attribute()) {
                group.set(*key, value);
            }
        }
        group
    }

    /// Write the group as a property element with the given tag
    pub fn to_element(&self, tag_name: &str) -> Element {
        let mut element = Element::new(tag_name);
        for (key, value) in self.iter() {
            element.set_attribute(key.attribute(), value);
        }
        element
    }
}

/// A named style definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleDefinition {
    name: String,
    family: StyleFamily,
    parent_style_name: Option<String>,
    class: Option<String>,
    paragraph_properties: Option<PropertyGroup>,
    text_properties: Option<PropertyGroup>,
}

impl StyleDefinition {
    /// Create a style with no properties
    pub fn new(name: impl Into<String>, family: StyleFamily) -> Self {
        Self {
            name: name.into(),
            family,
            parent_style_name: None,
            class: None,
            paragraph_properties: None,
            text_properties: None,
        }
    }

    /// Set the parent style reference
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_style_name = Some(parent.into());
        self
    }

    /// Set the `style:class` category
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Set a paragraph (block) property
    pub fn with_paragraph_property(mut self, key: PropertyKey, value: impl Into<String>) -> Self {
        self.paragraph_properties_mut().set(key, value);
        self
    }

    /// Set a text (run) property
    pub fn with_text_property(mut self, key: PropertyKey, value: impl Into<String>) -> Self {
        self.text_properties_mut().set(key, value);
        self
    }

    /// Get the style name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the style family
    pub fn family(&self) -> StyleFamily {
        self.family
    }

    /// Get the parent style name
    pub fn parent_style_name(&self) -> Option<&str> {
        self.parent_style_name.as_deref()
    }

    /// Set or clear the parent style name
    pub fn set_parent_style_name(&mut self, parent: Option<String>) {
        self.parent_style_name = parent;
    }

    /// Get the `style:class` category
    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    /// Headings take their formatting from global definitions only
    pub fn is_heading(&self) -> bool {
        self.parent_style_name.as_deref() == Some(HEADING_PARENT)
            || self.class.as_deref() == Some(HEADING_CLASS)
    }

    /// Block-level property group, if any
    pub fn paragraph_properties(&self) -> Option<&PropertyGroup> {
        self.paragraph_properties.as_ref()
    }

    /// Run-level property group, if any
    pub fn text_properties(&self) -> Option<&PropertyGroup> {
        self.text_properties.as_ref()
    }

    /// Block-level property group, created on first use
    pub fn paragraph_properties_mut(&mut self) -> &mut PropertyGroup {
        self.paragraph_properties.get_or_insert_with(PropertyGroup::new)
    }

    /// Run-level property group, created on first use
    pub fn text_properties_mut(&mut self) -> &mut PropertyGroup {
        self.text_properties.get_or_insert_with(PropertyGroup::new)
    }

    /// Parse a `style:style` element
    pub fn from_element(element: &Element, namespace_context: &NamespaceContext) -> Result<Self> {
        if !element.name_matches("style:style", Some(namespace_context)) {
            return Err(Error::InvalidFormat(format!(
                "Element {} is not a style",
                element.tag_name()
            )));
        }

        let name = element
            .get_attribute("style:name")
            .ok_or_else(|| Error::InvalidFormat("Style without style:name".to_string()))?;
        let family = element
            .get_attribute("style:family")
            .and_then(StyleFamily::from_name)
            .unwrap_or(StyleFamily::Paragraph);

        let paragraph_properties = element
            .find_child("style:paragraph-properties", Some(namespace_context))
            .map(|props| PropertyGroup::from_element(props, &PropertyKey::BLOCK));
        let text_properties = element
            .find_child("style:text-properties", Some(namespace_context))
            .map(|props| PropertyGroup::from_element(props, &PropertyKey::RUN));

        Ok(Self {
            name: name.to_string(),
            family,
            parent_style_name: element
                .get_attribute("style:parent-style-name")
                .map(|s| s.to_string()),
            class: element.get_attribute("style:class").map(|s| s.to_string()),
            paragraph_properties,
            text_properties,
        })
    }

    /// Serialize as a `style:style` element
    pub fn to_element(&self) -> Element {
        let mut element = Element::new("style:style");
        element.set_attribute("style:name", &self.name);
        element.set_attribute("style:family", self.family.as_str());
        if let Some(parent) = &self.parent_style_name {
            element.set_attribute("style:parent-style-name", parent);
        }
        if let Some(class) = &self.class {
            element.set_attribute("style:class", class);
        }
        if let Some(props) = &self.paragraph_properties {
            element.append_child(props.to_element("style:paragraph-properties"));
        }
        if let Some(props) = &self.text_properties {
            element.append_child(props.to_element("style:text-properties"));
        }
        element
    }
}

/// Style registry for managing document styles
#[derive(Debug, Clone, Default)]
pub struct StyleRegistry {
    styles: HashMap<String, StyleDefinition>,
}

impl StyleRegistry {
    /// Create a new style registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a style to the registry, replacing a previous one with the same name
    pub fn add_style(&mut self, style: StyleDefinition) {
        self.styles.insert(style.name().to_string(), style);
    }

    /// Get a style by name
    pub fn get_style(&self, name: &str) -> Option<&StyleDefinition> {
        self.styles.get(name)
    }

    /// Number of registered styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the registry has no styles
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Iterate over registered styles in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &StyleDefinition> {
        self.styles.values()
    }

    /// Parent definitions of `style`, nearest first, following at most `hops` links.
    ///
    /// Stops at the first missing parent and never revisits a style, so a
    /// cyclic chain terminates.
    pub fn ancestors<'a>(&'a self, style: &'a StyleDefinition, hops: usize) -> Vec<&'a StyleDefinition> {
        let mut chain: Vec<&StyleDefinition> = Vec::new();
        let mut current = style;
        while chain.len() < hops {
            let Some(parent) = current
                .parent_style_name()
                .and_then(|name| self.get_style(name))
            else {
                break;
            };
            if parent.name() == style.name() || chain.iter().any(|s| s.name() == parent.name()) {
                log::warn!("Cyclic parent-style chain at '{}'", parent.name());
                break;
            }
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Parse every `style:style` element of a `styles.xml` (or `content.xml`) part
    pub fn from_xml(xml_content: &str) -> Result<Self> {
        let root = Element::parse(xml_content)?;
        Ok(Self::from_element(&root, &NamespaceContext::odf()))
    }

    /// Collect styles from `office:styles` and `office:automatic-styles` below `root`
    pub fn from_element(root: &Element, namespace_context: &NamespaceContext) -> Self {
        let mut registry = Self::new();
        registry.collect(root, namespace_context);
        registry
    }

    fn collect(&mut self, element: &Element, namespace_context: &NamespaceContext) {
        for child in element.child_elements() {
            if child.name_matches("style:style", Some(namespace_context)) {
                match StyleDefinition::from_element(child, namespace_context) {
                    Ok(style) => self.add_style(style),
                    Err(e) => log::debug!("Skipping style element: {}", e),
                }
            } else {
                self.collect(child, namespace_context);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLES_XML: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<office:document-styles xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:style="urn:oasis:names:tc:opendocument:xmlns:style:1.0" xmlns:fo="urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0">
  <office:styles>
    <style:style style:name="Standard" style:family="paragraph" style:class="text"/>
    <style:style style:name="Heading" style:family="paragraph" style:parent-style-name="Standard">
      <style:paragraph-properties fo:margin-top="0.423cm" fo:margin-bottom="0.212cm"/>
      <style:text-properties style:font-name="Arial" fo:font-size="14pt"/>
    </style:style>
    <style:style style:name="Heading_20_1" style:family="paragraph" style:parent-style-name="Heading" style:class="text">
      <style:text-properties fo:font-size="115%" fo:font-weight="bold"/>
    </style:style>
    <style:style style:family="paragraph"/>
  </office:styles>
  <office:automatic-styles>
    <style:style style:name="T1" style:family="text">
      <style:text-properties fo:color="#ff0000"/>
    </style:style>
  </office:automatic-styles>
</office:document-styles>"##;

    #[test]
    fn test_registry_from_xml() {
        let registry = StyleRegistry::from_xml(STYLES_XML).unwrap();
        assert_eq!(registry.len(), 4);

        let heading = registry.get_style("Heading").unwrap();
        assert_eq!(heading.family(), StyleFamily::Paragraph);
        assert_eq!(heading.parent_style_name(), Some("Standard"));
        let block = heading.paragraph_properties().unwrap();
        assert_eq!(block.get(PropertyKey::MarginTop), Some("0.423cm"));
        assert_eq!(block.get(PropertyKey::TextAlign), None);
        let run = heading.text_properties().unwrap();
        assert_eq!(run.get(PropertyKey::FontName), Some("Arial"));

        let t1 = registry.get_style("T1").unwrap();
        assert_eq!(t1.family(), StyleFamily::Text);
        assert!(t1.paragraph_properties().is_none());
        assert_eq!(t1.text_properties().unwrap().get(PropertyKey::Color), Some("#ff0000"));

        assert!(registry.get_style("Missing").is_none());
    }

    #[test]
    fn test_heading_detection() {
        let registry = StyleRegistry::from_xml(STYLES_XML).unwrap();
        assert!(registry.get_style("Heading_20_1").unwrap().is_heading());
        assert!(!registry.get_style("Heading").unwrap().is_heading());
        assert!(StyleDefinition::new("Chapter", StyleFamily::Paragraph)
            .with_class("chapter")
            .is_heading());
    }

    #[test]
    fn test_ancestors_respects_hops() {
        let registry = StyleRegistry::from_xml(STYLES_XML).unwrap();
        let h1 = registry.get_style("Heading_20_1").unwrap();

        let one: Vec<&str> = registry.ancestors(h1, 1).iter().map(|s| s.name()).collect();
        assert_eq!(one, vec!["Heading"]);

        let all: Vec<&str> = registry.ancestors(h1, 8).iter().map(|s| s.name()).collect();
        assert_eq!(all, vec!["Heading", "Standard"]);

        assert!(registry.ancestors(h1, 0).is_empty());
    }

    #[test]
    fn test_ancestors_cycle_terminates() {
        let mut registry = StyleRegistry::new();
        registry.add_style(StyleDefinition::new("A", StyleFamily::Paragraph).with_parent("B"));
        registry.add_style(StyleDefinition::new("B", StyleFamily::Paragraph).with_parent("A"));
        let a = registry.get_style("A").unwrap();
        let chain: Vec<&str> = registry.ancestors(a, 10).iter().map(|s| s.name()).collect();
        assert_eq!(chain, vec!["B"]);
    }

    #[test]
    fn test_property_group_merge() {
        let mut base = PropertyGroup::new()
            .with(PropertyKey::MarginTop, "10pt")
            .with(PropertyKey::Color, "red");
        let over = PropertyGroup::new().with(PropertyKey::MarginTop, "20pt");
        base.merge_from(&over);
        assert_eq!(base.get(PropertyKey::MarginTop), Some("20pt"));
        assert_eq!(base.get(PropertyKey::Color), Some("red"));
        assert_eq!(base.len(), 2);
        assert_eq!(base.remove(PropertyKey::Color), Some("red".to_string()));
        assert_eq!(base.get(PropertyKey::Color), None);
    }

    #[test]
    fn test_style_to_element_round_trip() {
        let style = StyleDefinition::new("P1", StyleFamily::Paragraph)
            .with_parent("Standard")
            .with_paragraph_property(PropertyKey::TextAlign, "center")
            .with_text_property(PropertyKey::FontWeight, "bold");
        let element = style.to_element();
        assert_eq!(
            element.to_xml_string(),
            r#"<style:style style:name="P1" style:family="paragraph" style:parent-style-name="Standard"><style:paragraph-properties fo:text-align="center"/><style:text-properties fo:font-weight="bold"/></style:style>"#
        );
        let parsed = StyleDefinition::from_element(&element, &NamespaceContext::odf()).unwrap();
        assert_eq!(parsed, style);
    }

    #[test]
    fn test_from_element_rejects_other_tags() {
        let ctx = NamespaceContext::odf();
        assert!(StyleDefinition::from_element(&Element::new("text:p"), &ctx).is_err());
        assert!(StyleDefinition::from_element(&Element::new("style:style"), &ctx).is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let style = StyleDefinition::new("P2", StyleFamily::Paragraph)
            .with_text_property(PropertyKey::Color, "#000080");
        let json = serde_json::to_string(&style).unwrap();
        let back: StyleDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
    }
}
