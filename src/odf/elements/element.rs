//! Base Element class for ODF XML elements.
//!
//! This module provides the markup tree every content object is backed by:
//! namespace-aware elements with ordered attributes and mixed content
//! (child elements interleaved with text), plus the small query language
//! used to look nodes up by path.

use crate::common::xml::{escape_text, escape_xml, unescape_xml};
use crate::common::{Error, Result};
use crate::odf::elements::namespace::{NamespaceContext, QualifiedName};
use quick_xml::events::{BytesStart, Event};
use smallvec::SmallVec;

/// Ordered attribute list; most ODF elements carry one to three attributes
pub type Attributes = SmallVec<[(String, String); 4]>;

/// Base trait for all ODF elements
pub trait ElementBase {
    /// Get the tag name of this element
    fn tag_name(&self) -> &str;

    /// Get the attributes of this element
    fn attributes(&self) -> &[(String, String)];

    /// Get a mutable reference to attributes
    fn attributes_mut(&mut self) -> &mut Attributes;

    /// Get attribute value by name
    fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set attribute value, keeping the original position when it already exists
    fn set_attribute(&mut self, name: &str, value: &str) {
        let attributes = self.attributes_mut();
        match attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    /// Remove attribute
    fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let attributes = self.attributes_mut();
        let pos = attributes.iter().position(|(key, _)| key == name)?;
        Some(attributes.remove(pos).1)
    }

    /// Check if element has attribute
    fn has_attribute(&self, name: &str) -> bool {
        self.get_attribute(name).is_some()
    }
}

/// A node in the markup tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Child element
    Element(Element),
    /// Character data (stored unescaped)
    Text(String),
}

impl Node {
    /// Borrow as element, if this is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        }
    }

    /// Serialized XML form of this node
    pub fn to_xml_string(&self) -> String {
        let mut out = String::new();
        self.write_xml(&mut out);
        out
    }

    fn write_xml(&self, output: &mut String) {
        match self {
            Node::Element(element) => element.write_xml(output),
            Node::Text(text) => output.push_str(&escape_text(text)),
        }
    }

    fn text_recursive_into(&self, out: &mut String) {
        match self {
            Node::Element(element) => {
                for child in &element.children {
                    child.text_recursive_into(out);
                }
            },
            Node::Text(text) => out.push_str(text),
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

/// Result of [`Element::query_single`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selection<'a> {
    /// Path ended on an element step
    Element(&'a Element),
    /// Path ended on an `@attribute` step
    Attribute(&'a str),
}

impl<'a> Selection<'a> {
    /// Inner text of the selected node (attribute value, or recursive element text)
    pub fn text(&self) -> String {
        match self {
            Selection::Element(element) => element.get_text_recursive(),
            Selection::Attribute(value) => (*value).to_string(),
        }
    }

    /// Selected element, if the path ended on an element
    pub fn as_element(&self) -> Option<&'a Element> {
        match self {
            Selection::Element(element) => Some(element),
            Selection::Attribute(_) => None,
        }
    }
}

/// Concrete Element implementation with namespace support
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    qualified_name: QualifiedName,
    attributes: Attributes,
    children: Vec<Node>,
}

impl Element {
    /// Create a new element, resolving the prefix against the standard ODF namespaces
    pub fn new(tag_name: &str) -> Self {
        Self {
            qualified_name: QualifiedName::from_string(tag_name),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element with namespace context
    pub fn new_with_context(tag_name: &str, namespace_context: &NamespaceContext) -> Self {
        Self {
            qualified_name: namespace_context.parse_qualified_name(tag_name),
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    /// Get the qualified name
    pub fn qualified_name(&self) -> &QualifiedName {
        &self.qualified_name
    }

    /// Get the namespace URI
    pub fn namespace_uri(&self) -> Option<&str> {
        self.qualified_name.namespace_uri.as_deref()
    }

    /// Get the local name (without namespace prefix)
    pub fn local_name(&self) -> &str {
        &self.qualified_name.local_name
    }

    /// Check if element name matches (namespace-aware)
    pub fn name_matches(&self, name: &str, namespace_context: Option<&NamespaceContext>) -> bool {
        self.qualified_name.matches_str(name, namespace_context)
    }

    /// Get attribute with namespace-aware lookup
    pub fn get_qualified_attribute(
        &self,
        name: &str,
        namespace_context: Option<&NamespaceContext>,
    ) -> Option<&str> {
        if let Some(value) = self.get_attribute(name) {
            return Some(value);
        }

        let wanted = match namespace_context {
            Some(ctx) => ctx.parse_qualified_name(name),
            None => QualifiedName::from_string(name),
        };
        self.attributes
            .iter()
            .find(|(key, _)| QualifiedName::from_string(key).matches(&wanted))
            .map(|(_, value)| value.as_str())
    }

    /// Child nodes in document order
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Child elements, skipping text nodes
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given name
    pub fn find_child(&self, name: &str, namespace_context: Option<&NamespaceContext>) -> Option<&Element> {
        self.child_elements()
            .find(|child| child.name_matches(name, namespace_context))
    }

    /// Append a child node
    pub fn append_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Insert a child node at `index` (`index == len` appends)
    pub fn insert_child(&mut self, index: usize, child: impl Into<Node>) -> Result<()> {
        if index > self.children.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.children.len(),
            });
        }
        self.children.insert(index, child.into());
        Ok(())
    }

    /// Detach and return the child node at `index`
    pub fn remove_child(&mut self, index: usize) -> Result<Node> {
        if index >= self.children.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.children.len(),
            });
        }
        Ok(self.children.remove(index))
    }

    /// Replace the child node at `index`, returning the old one
    pub fn replace_child(&mut self, index: usize, child: impl Into<Node>) -> Result<Node> {
        let len = self.children.len();
        let slot = self
            .children
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?;
        Ok(std::mem::replace(slot, child.into()))
    }

    /// Get text recursively from this element and all children
    pub fn get_text_recursive(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            child.text_recursive_into(&mut text);
        }
        text
    }

    /// Evaluate a path query and return the first match.
    ///
    /// Supported syntax: slash separated child steps (`style:text-properties`),
    /// a final attribute step (`@fo:color`), attribute predicates
    /// (`style:style[@style:name='P1']`) and a leading `//` to search
    /// descendants for the first step. `.` selects the element itself.
    pub fn query_single<'a>(
        &'a self,
        path: &str,
        namespace_context: &NamespaceContext,
    ) -> Option<Selection<'a>> {
        let (descendant, path) = match path.strip_prefix("//") {
            Some(rest) => (true, rest),
            None => (false, path),
        };
        let steps: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let (first, rest) = steps.split_first()?;

        if descendant {
            let step = Step::parse(first)?;
            self.descendants_or_self()
                .into_iter()
                .filter(|candidate| step.matches(candidate, namespace_context))
                .find_map(|candidate| candidate.select_steps(rest, namespace_context))
        } else {
            self.select_steps(&steps, namespace_context)
        }
    }

    fn select_steps<'a>(
        &'a self,
        steps: &[&str],
        namespace_context: &NamespaceContext,
    ) -> Option<Selection<'a>> {
        let Some((first, rest)) = steps.split_first() else {
            return Some(Selection::Element(self));
        };

        if *first == "." {
            return self.select_steps(rest, namespace_context);
        }

        if let Some(attr) = first.strip_prefix('@') {
            // Attribute steps end the path
            if !rest.is_empty() {
                return None;
            }
            return self
                .get_qualified_attribute(attr, Some(namespace_context))
                .map(Selection::Attribute);
        }

        let step = Step::parse(first)?;
        self.child_elements()
            .filter(|child| step.matches(child, namespace_context))
            .find_map(|child| child.select_steps(rest, namespace_context))
    }

    fn descendants_or_self(&self) -> Vec<&Element> {
        let mut out = vec![self];
        let mut i = 0;
        while i < out.len() {
            let current = out[i];
            out.extend(current.child_elements());
            i += 1;
        }
        out
    }

    /// Serialized XML of the child nodes
    pub fn inner_xml(&self) -> String {
        let mut xml = String::new();
        for child in &self.children {
            child.write_xml(&mut xml);
        }
        xml
    }

    /// Replace all child nodes with the parsed XML fragment.
    ///
    /// Prefixes in the fragment are resolved against `namespace_context`.
    pub fn set_inner_xml(&mut self, xml: &str, namespace_context: &NamespaceContext) -> Result<()> {
        let mut wrapper = String::with_capacity(xml.len() + 256);
        wrapper.push_str("<fragment");
        for (key, uri) in namespace_context.declarations() {
            wrapper.push(' ');
            wrapper.push_str(&key);
            wrapper.push_str("=\"");
            wrapper.push_str(&escape_xml(uri));
            wrapper.push('"');
        }
        wrapper.push('>');
        wrapper.push_str(xml);
        wrapper.push_str("</fragment>");

        let parsed = Element::from_bytes(wrapper.as_bytes())?;
        self.children = parsed.children;
        Ok(())
    }

    /// Create element from XML bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = quick_xml::Reader::from_reader(bytes);
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        // Namespace scopes mirror the element stack
        let mut scopes: Vec<NamespaceContext> = vec![NamespaceContext::odf()];

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let (element, scope) = Self::open_element(e, scopes.last())?;
                    scopes.push(scope);
                    stack.push(element);
                },
                Ok(Event::Empty(ref e)) => {
                    let (element, _) = Self::open_element(e, scopes.last())?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Element(element)),
                        None => return Ok(element),
                    }
                },
                Ok(Event::Text(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = String::from_utf8(t.to_vec())?;
                        current.push_text(&unescape_xml(&text));
                    }
                },
                Ok(Event::CData(ref t)) => {
                    if let Some(current) = stack.last_mut() {
                        let text = String::from_utf8(t.to_vec())?;
                        current.push_text(&text);
                    }
                },
                Ok(Event::GeneralRef(ref r)) => {
                    if let Some(current) = stack.last_mut() {
                        let name = String::from_utf8(r.to_vec())?;
                        current.push_text(&resolve_entity(&name));
                    }
                },
                Ok(Event::End(_)) => {
                    scopes.pop();
                    if let Some(element) = stack.pop() {
                        match stack.last_mut() {
                            Some(parent) => parent.children.push(Node::Element(element)),
                            None => return Ok(element),
                        }
                    }
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::XmlError(format!("XML parsing error: {}", e))),
                _ => {},
            }
            buf.clear();
        }

        Err(Error::InvalidFormat("No root element found".to_string()))
    }

    /// Create element from an XML string
    pub fn parse(xml: &str) -> Result<Self> {
        Self::from_bytes(xml.as_bytes())
    }

    fn open_element(
        e: &BytesStart<'_>,
        parent_scope: Option<&NamespaceContext>,
    ) -> Result<(Element, NamespaceContext)> {
        let tag_name = String::from_utf8(e.name().as_ref().to_vec())?;
        let mut scope = parent_scope.cloned().unwrap_or_default();
        let mut attributes = Attributes::new();

        for attr_result in e.attributes() {
            let attr = attr_result?;
            let key = String::from_utf8(attr.key.as_ref().to_vec())?;
            let value = unescape_xml(&String::from_utf8(attr.value.to_vec())?);

            if key == "xmlns" || key.starts_with("xmlns:") {
                scope.add_namespace(&key, &value);
            } else {
                attributes.push((key, value));
            }
        }

        // Declarations on this element are in scope for its own names
        for (key, _) in attributes.iter_mut() {
            if key.contains(':') {
                *key = scope.parse_qualified_name(key).normalized().qualified_name;
            }
        }

        let element = Element {
            qualified_name: scope.parse_qualified_name(&tag_name).normalized(),
            attributes,
            children: Vec::new(),
        };
        Ok((element, scope))
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        // Entity references split text events; merge adjacent runs
        if let Some(Node::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(Node::Text(text.to_string()));
        }
    }

    /// Serialize element to XML string
    pub fn to_xml_string(&self) -> String {
        let mut xml = String::new();
        self.write_xml(&mut xml);
        xml
    }

    fn write_xml(&self, output: &mut String) {
        output.push('<');
        output.push_str(self.tag_name());

        for (key, value) in &self.attributes {
            output.push(' ');
            output.push_str(key);
            output.push_str("=\"");
            output.push_str(&escape_xml(value));
            output.push('"');
        }

        if self.children.is_empty() {
            output.push_str("/>");
            return;
        }

        output.push('>');
        for child in &self.children {
            child.write_xml(output);
        }
        output.push_str("</");
        output.push_str(self.tag_name());
        output.push('>');
    }
}

impl ElementBase for Element {
    fn tag_name(&self) -> &str {
        &self.qualified_name.qualified_name
    }

    fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// One element step of a query path: a name plus optional `[@attr='value']`
struct Step<'p> {
    name: &'p str,
    predicate: Option<(&'p str, &'p str)>,
}

impl<'p> Step<'p> {
    fn parse(step: &'p str) -> Option<Self> {
        let Some((name, rest)) = step.split_once('[') else {
            return Some(Self {
                name: step,
                predicate: None,
            });
        };
        let inner = rest.strip_suffix(']')?.strip_prefix('@')?;
        let (attr, value) = inner.split_once('=')?;
        let value = value.trim().trim_matches(|c| c == '\'' || c == '"');
        Some(Self {
            name,
            predicate: Some((attr.trim(), value)),
        })
    }

    fn matches(&self, element: &Element, namespace_context: &NamespaceContext) -> bool {
        if self.name != "*" && !element.name_matches(self.name, Some(namespace_context)) {
            return false;
        }
        match self.predicate {
            Some((attr, value)) => {
                element.get_qualified_attribute(attr, Some(namespace_context)) == Some(value)
            },
            None => true,
        }
    }
}

/// Resolve a general entity or character reference name (without `&`/`;`)
fn resolve_entity(name: &str) -> String {
    let numeric = if let Some(hex) = name.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = name.strip_prefix('#') {
        dec.parse().ok()
    } else {
        None
    };

    match numeric.and_then(char::from_u32) {
        Some(ch) => ch.to_string(),
        None => unescape_xml(&format!("&{};", name)),
    }
}
