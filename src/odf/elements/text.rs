//! Text-related ODF elements.
//!
//! A [`Paragraph`] owns two ordered collections, inline [`TextRun`]s and
//! nested [`Content`], plus the backing `text:p` element. The element is a
//! cache derived from the collections: every insert and remove made through
//! the paragraph patches it immediately, and nothing else writes to it.

use super::element::{Attributes, Element, ElementBase, Node};
use super::namespace::{NamespaceContext, TEXTNS};
use super::style::{StyleDefinition, StyleFamily};
use crate::common::{Error, Result};
use crate::odf::collection::{EntryId, ObservableSequence, SequenceObserver};
use crate::odf::odt::TextDocument;

/// Reserved name of the default paragraph style
pub const STANDARD_STYLE: &str = "Standard";

/// Reserved name of the table cell paragraph style ("Table Contents")
pub const TABLE_CONTENTS_STYLE: &str = "Table_20_Contents";

/// Coarse style category of a paragraph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentStyleKind {
    /// Body text
    #[default]
    Standard,
    /// Text inside a table cell
    TableCell,
    /// Any other category; resolves like `Standard`
    Custom,
}

impl ParentStyleKind {
    /// Category implied by a paragraph's style name
    pub fn for_style_name(name: &str) -> Self {
        if name == TABLE_CONTENTS_STYLE {
            Self::TableCell
        } else {
            Self::Standard
        }
    }

    /// Reserved style name the category maps to
    pub fn reserved_name(&self) -> &'static str {
        match self {
            Self::Standard | Self::Custom => STANDARD_STYLE,
            Self::TableCell => TABLE_CONTENTS_STYLE,
        }
    }
}

/// Check whether `name` is one of the built-in style names that never get
/// their own style object
pub fn is_reserved_style_name(name: &str) -> bool {
    name == STANDARD_STYLE || name == TABLE_CONTENTS_STYLE
}

/// A `text:span` run with a style reference
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedText {
    attributes: Attributes,
    style: Option<StyleDefinition>,
    runs: Vec<TextRun>,
}

impl FormattedText {
    /// Create a span referencing `style_name` around literal text
    pub fn new(style_name: &str, text: &str) -> Self {
        let mut attributes = Attributes::new();
        attributes.push(("text:style-name".to_string(), style_name.to_string()));
        Self {
            attributes,
            style: None,
            runs: vec![TextRun::Simple(text.to_string())],
        }
    }

    /// Create a span with an attached text style
    pub fn with_style(style: StyleDefinition, text: &str) -> Self {
        let mut span = Self::new(style.name(), text);
        span.style = Some(style);
        span
    }

    /// Referenced style name
    pub fn style_name(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == "text:style-name")
            .map(|(_, value)| value.as_str())
    }

    /// Attached text style, if any
    pub fn style(&self) -> Option<&StyleDefinition> {
        self.style.as_ref()
    }

    /// Attach or detach a text style
    pub fn set_style(&mut self, style: Option<StyleDefinition>) {
        self.style = style;
    }

    /// Runs inside the span
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    /// Mutable runs inside the span
    pub fn runs_mut(&mut self) -> &mut Vec<TextRun> {
        &mut self.runs
    }

    fn from_element(element: &Element) -> Self {
        Self {
            attributes: element.attributes().iter().cloned().collect(),
            style: None,
            runs: runs_from_children(element),
        }
    }
}

/// A `text:a` hyperlink run
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    attributes: Attributes,
    runs: Vec<TextRun>,
}

impl Link {
    /// Create a simple link around literal text
    pub fn new(href: &str, text: &str) -> Self {
        let mut attributes = Attributes::new();
        attributes.push(("xlink:type".to_string(), "simple".to_string()));
        attributes.push(("xlink:href".to_string(), href.to_string()));
        Self {
            attributes,
            runs: vec![TextRun::Simple(text.to_string())],
        }
    }

    /// Link target
    pub fn href(&self) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == "xlink:href")
            .map(|(_, value)| value.as_str())
    }

    /// Runs inside the link
    pub fn runs(&self) -> &[TextRun] {
        &self.runs
    }

    fn from_element(element: &Element) -> Self {
        Self {
            attributes: element.attributes().iter().cloned().collect(),
            runs: runs_from_children(element),
        }
    }
}

/// Largest `text:c` accepted when loading a `text:s` run
pub const MAX_SPACE_COUNT: u32 = 65_535;

/// Number of spaces a `text:s` run expands to in plain text and HTML
pub(crate) fn space_width(count: u32) -> usize {
    count.min(MAX_SPACE_COUNT) as usize
}

/// Inline text run
#[derive(Debug, Clone, PartialEq)]
pub enum TextRun {
    /// Plain character data
    Simple(String),
    /// Styled span (`text:span`)
    Formatted(FormattedText),
    /// Run of spaces (`text:s`)
    Space(u32),
    /// Tab stop (`text:tab`)
    Tab,
    /// Forced line break (`text:line-break`)
    LineBreak,
    /// Hyperlink (`text:a`)
    Link(Link),
    /// Any other inline element, kept verbatim
    Unknown(Element),
}

impl TextRun {
    /// Plain text of the run
    pub fn text(&self) -> String {
        match self {
            Self::Simple(text) => text.clone(),
            Self::Formatted(span) => runs_text(&span.runs),
            Self::Space(count) => " ".repeat(space_width(*count)),
            Self::Tab => "\t".to_string(),
            Self::LineBreak => "\n".to_string(),
            Self::Link(link) => runs_text(&link.runs),
            Self::Unknown(element) => element.get_text_recursive(),
        }
    }

    /// The single markup node this run is stored as
    pub fn to_node(&self) -> Node {
        match self {
            Self::Simple(text) => Node::Text(text.clone()),
            Self::Formatted(span) => {
                Node::Element(element_with("text:span", &span.attributes, &span.runs))
            },
            Self::Space(count) => {
                let mut element = Element::new("text:s");
                if *count != 1 {
                    element.set_attribute("text:c", &count.to_string());
                }
                Node::Element(element)
            },
            Self::Tab => Node::Element(Element::new("text:tab")),
            Self::LineBreak => Node::Element(Element::new("text:line-break")),
            Self::Link(link) => Node::Element(element_with("text:a", &link.attributes, &link.runs)),
            Self::Unknown(element) => Node::Element(element.clone()),
        }
    }

    /// Canonical markup encoding of the run
    pub fn serialized_form(&self) -> String {
        self.to_node().to_xml_string()
    }

    /// Classify a child node of a loaded paragraph.
    ///
    /// Returns `None` for elements outside the text namespace, which are
    /// structural content rather than runs. A recognized element whose
    /// markup this run type cannot reproduce exactly is kept as `Unknown`.
    pub fn from_node(node: &Node, namespace_context: &NamespaceContext) -> Option<Self> {
        let element = match node {
            Node::Text(text) => return Some(Self::Simple(text.clone())),
            Node::Element(element) => element,
        };
        if element.name_matches("text:p", Some(namespace_context))
            || element.namespace_uri() != Some(TEXTNS)
        {
            return None;
        }

        let run = match element.local_name() {
            "span" => Self::Formatted(FormattedText::from_element(element)),
            "a" => Self::Link(Link::from_element(element)),
            "s" => match element.get_attribute("text:c") {
                Some(count) => match count.parse() {
                    Ok(count) if count <= MAX_SPACE_COUNT => Self::Space(count),
                    _ => Self::Unknown(element.clone()),
                },
                None => Self::Space(1),
            },
            "tab" => Self::Tab,
            "line-break" => Self::LineBreak,
            _ => Self::Unknown(element.clone()),
        };

        if matches!(run, Self::Unknown(_)) || run.to_node() == *node {
            Some(run)
        } else {
            log::debug!("Keeping <{}> verbatim", element.tag_name());
            Some(Self::Unknown(element.clone()))
        }
    }
}

fn element_with(tag_name: &str, attributes: &Attributes, runs: &[TextRun]) -> Element {
    let mut element = Element::new(tag_name);
    *element.attributes_mut() = attributes.clone();
    for run in runs {
        element.append_child(run.to_node());
    }
    element
}

fn runs_from_children(element: &Element) -> Vec<TextRun> {
    let ctx = NamespaceContext::odf();
    element
        .children()
        .iter()
        .map(|child| match TextRun::from_node(child, &ctx) {
            Some(run) => run,
            None => match child {
                Node::Element(e) => TextRun::Unknown(e.clone()),
                Node::Text(text) => TextRun::Simple(text.clone()),
            },
        })
        .collect()
}

fn runs_text(runs: &[TextRun]) -> String {
    runs.iter().map(TextRun::text).collect()
}

/// Structural content nested in a paragraph
#[derive(Debug, Clone)]
pub enum Content {
    /// Nested paragraph
    Paragraph(Box<Paragraph>),
    /// Any other element, kept verbatim
    Unknown(Element),
}

impl Content {
    /// Backing element of the content
    pub fn element(&self) -> &Element {
        match self {
            Self::Paragraph(paragraph) => paragraph.element(),
            Self::Unknown(element) => element,
        }
    }

    /// Markup node stored in the owning paragraph
    pub fn to_node(&self) -> Node {
        Node::Element(self.element().clone())
    }

    /// Plain text of the content
    pub fn text(&self) -> String {
        match self {
            Self::Paragraph(paragraph) => paragraph.text(),
            Self::Unknown(element) => element.get_text_recursive(),
        }
    }

    /// Borrow as paragraph, if this is one
    pub fn as_paragraph(&self) -> Option<&Paragraph> {
        match self {
            Self::Paragraph(paragraph) => Some(paragraph),
            Self::Unknown(_) => None,
        }
    }

    /// Mutably borrow as paragraph, if this is one
    pub fn as_paragraph_mut(&mut self) -> Option<&mut Paragraph> {
        match self {
            Self::Paragraph(paragraph) => Some(paragraph),
            Self::Unknown(_) => None,
        }
    }
}

impl From<Paragraph> for Content {
    fn from(paragraph: Paragraph) -> Self {
        Content::Paragraph(Box::new(paragraph))
    }
}

/// Owner of one child node of the backing element
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Run(EntryId),
    Content(EntryId),
}

/// Observer that mirrors collection changes into the backing element.
///
/// `slots[i]` names the entry that owns `element.children()[i]`.
struct MarkupSync<'a> {
    element: &'a mut Element,
    slots: &'a mut Vec<Slot>,
    /// Entry the new node goes in front of; `None` appends
    anchor: Option<Slot>,
}

impl MarkupSync<'_> {
    fn insert(&mut self, slot: Slot, node: Node) {
        let position = self
            .anchor
            .and_then(|anchor| self.slots.iter().position(|s| *s == anchor))
            .unwrap_or(self.slots.len());
        match self.element.insert_child(position, node) {
            Ok(()) => self.slots.insert(position, slot),
            Err(e) => log::warn!("Backing element out of step with its entries: {}", e),
        }
    }

    fn remove(&mut self, slot: Slot) {
        let Some(position) = self.slots.iter().position(|s| *s == slot) else {
            log::warn!("No markup node recorded for {:?}", slot);
            return;
        };
        self.slots.remove(position);
        if let Err(e) = self.element.remove_child(position) {
            log::warn!("Backing element out of step with its entries: {}", e);
        }
    }
}

impl SequenceObserver<TextRun> for MarkupSync<'_> {
    fn inserted(&mut self, _index: usize, id: EntryId, item: &TextRun) {
        self.insert(Slot::Run(id), item.to_node());
    }

    fn removed(&mut self, _index: usize, id: EntryId, _item: &TextRun) {
        self.remove(Slot::Run(id));
    }
}

impl SequenceObserver<Content> for MarkupSync<'_> {
    fn inserted(&mut self, _index: usize, id: EntryId, item: &Content) {
        self.insert(Slot::Content(id), item.to_node());
    }

    fn removed(&mut self, _index: usize, id: EntryId, _item: &Content) {
        self.remove(Slot::Content(id));
    }
}

/// A text paragraph element
#[derive(Debug, Clone)]
pub struct Paragraph {
    style: Option<StyleDefinition>,
    parent_style: ParentStyleKind,
    runs: ObservableSequence<TextRun>,
    contents: ObservableSequence<Content>,
    element: Element,
    slots: Vec<Slot>,
}

impl Paragraph {
    /// Create an empty paragraph referencing `style_name`.
    ///
    /// Unless the name is reserved, an empty paragraph style with that name
    /// is attached to the paragraph.
    pub fn new(document: &TextDocument, style_name: &str) -> Result<Self> {
        let mut element = document.create_element("p", "text")?;
        document.create_attribute(&mut element, "style-name", "text", style_name)?;

        let style = (!is_reserved_style_name(style_name))
            .then(|| StyleDefinition::new(style_name, StyleFamily::Paragraph));
        let parent_style = ParentStyleKind::for_style_name(style_name);

        Ok(Self {
            style,
            parent_style,
            runs: ObservableSequence::new(),
            contents: ObservableSequence::new(),
            element,
            slots: Vec::new(),
        })
    }

    /// Create a paragraph holding one plain text run
    pub fn with_text(document: &TextDocument, kind: ParentStyleKind, text: &str) -> Result<Self> {
        if kind == ParentStyleKind::Custom {
            log::warn!("Custom parent style for simple text; using {}", STANDARD_STYLE);
        }
        let mut paragraph = Self::new(document, kind.reserved_name())?;
        paragraph.parent_style = kind;
        paragraph.push_run(TextRun::Simple(text.to_string()));
        Ok(paragraph)
    }

    /// Bind to an existing `text:p` element without recreating its markup.
    ///
    /// Every child is registered as a run or as nested content so that the
    /// element already is the cached view of the collections.
    pub fn from_element(element: Element, document: &TextDocument) -> Result<Self> {
        let ctx = document.namespaces();
        if !element.name_matches("text:p", Some(ctx)) {
            return Err(Error::InvalidFormat(format!(
                "Element {} is not a paragraph",
                element.tag_name()
            )));
        }

        let mut runs = ObservableSequence::new();
        let mut contents = ObservableSequence::new();
        let mut slots = Vec::with_capacity(element.children().len());

        for child in element.children() {
            if let Some(run) = TextRun::from_node(child, ctx) {
                slots.push(Slot::Run(runs.push(run, &mut ())));
                continue;
            }
            let content = match child {
                Node::Element(e) if e.name_matches("text:p", Some(ctx)) => {
                    Content::from(Paragraph::from_element(e.clone(), document)?)
                },
                Node::Element(e) => {
                    log::debug!("Keeping unknown content <{}>", e.tag_name());
                    Content::Unknown(e.clone())
                },
                // Text nodes always classify as runs
                Node::Text(text) => {
                    slots.push(Slot::Run(runs.push(TextRun::Simple(text.clone()), &mut ())));
                    continue;
                },
            };
            slots.push(Slot::Content(contents.push(content, &mut ())));
        }

        let parent_style = element
            .get_attribute("text:style-name")
            .map(ParentStyleKind::for_style_name)
            .unwrap_or_default();

        Ok(Self {
            style: None,
            parent_style,
            runs,
            contents,
            element,
            slots,
        })
    }

    /// Value of the `text:style-name` attribute
    pub fn style_name(&self) -> Option<&str> {
        self.element.get_attribute("text:style-name")
    }

    /// Set the `text:style-name` attribute; the name is not checked against
    /// any registry
    pub fn set_style_name(&mut self, name: &str) {
        self.element.set_attribute("text:style-name", name);
    }

    /// Attached style object, if any
    pub fn style(&self) -> Option<&StyleDefinition> {
        self.style.as_ref()
    }

    /// Mutable attached style object
    pub fn style_mut(&mut self) -> Option<&mut StyleDefinition> {
        self.style.as_mut()
    }

    /// Attach or detach a style object. Attaching also points
    /// `text:style-name` at the style.
    pub fn set_style(&mut self, style: Option<StyleDefinition>) {
        if let Some(style) = &style {
            self.element.set_attribute("text:style-name", style.name());
        }
        self.style = style;
    }

    /// Coarse style category
    pub fn parent_style(&self) -> ParentStyleKind {
        self.parent_style
    }

    /// Inline runs in order
    pub fn runs(&self) -> &ObservableSequence<TextRun> {
        &self.runs
    }

    /// Nested content in order
    pub fn contents(&self) -> &ObservableSequence<Content> {
        &self.contents
    }

    /// Backing `text:p` element
    pub fn element(&self) -> &Element {
        &self.element
    }

    /// Serialized children of the backing element
    pub fn inner_xml(&self) -> String {
        self.element.inner_xml()
    }

    /// Serialized backing element
    pub fn to_xml(&self) -> String {
        self.element.to_xml_string()
    }

    /// Plain text of runs and nested content in document order
    pub fn text(&self) -> String {
        let mut text = String::new();
        for slot in &self.slots {
            match slot {
                Slot::Run(id) => {
                    if let Some(run) = self.runs.get_by_id(*id) {
                        text.push_str(&run.text());
                    }
                },
                Slot::Content(id) => {
                    if let Some(content) = self.contents.get_by_id(*id) {
                        text.push_str(&content.text());
                    }
                },
            }
        }
        text
    }

    /// Insert a run at `index` of the run collection.
    ///
    /// The run's node goes directly before the node of the run currently at
    /// `index`; at the end of the collection it is appended to the element.
    pub fn insert_run(&mut self, index: usize, run: TextRun) -> Result<EntryId> {
        let anchor = self.runs.id_at(index).map(Slot::Run);
        let mut sync = MarkupSync {
            element: &mut self.element,
            slots: &mut self.slots,
            anchor,
        };
        self.runs.insert(index, run, &mut sync)
    }

    /// Append a run
    pub fn push_run(&mut self, run: TextRun) -> EntryId {
        let mut sync = MarkupSync {
            element: &mut self.element,
            slots: &mut self.slots,
            anchor: None,
        };
        self.runs.push(run, &mut sync)
    }

    /// Remove the run with identity `id` together with exactly its node
    pub fn remove_run(&mut self, id: EntryId) -> Result<TextRun> {
        let mut sync = MarkupSync {
            element: &mut self.element,
            slots: &mut self.slots,
            anchor: None,
        };
        self.runs.remove(id, &mut sync)
    }

    /// Remove the run at `index`
    pub fn remove_run_at(&mut self, index: usize) -> Result<TextRun> {
        let mut sync = MarkupSync {
            element: &mut self.element,
            slots: &mut self.slots,
            anchor: None,
        };
        self.runs.remove_at(index, &mut sync)
    }

    /// Modify a run in place and refresh its node
    pub fn update_run<F>(&mut self, id: EntryId, f: F) -> Result<()>
    where
        F: FnOnce(&mut TextRun),
    {
        let run = self
            .runs
            .get_by_id_mut(id)
            .ok_or_else(|| Error::NotFound(format!("run {}", id)))?;
        f(run);
        let node = run.to_node();
        self.replace_slot_node(Slot::Run(id), node)
    }

    /// Insert nested content at `index` of the content collection
    pub fn insert_content(&mut self, index: usize, content: impl Into<Content>) -> Result<EntryId> {
        let anchor = self.contents.id_at(index).map(Slot::Content);
        let mut sync = MarkupSync {
            element: &mut self.element,
            slots: &mut self.slots,
            anchor,
        };
        self.contents.insert(index, content.into(), &mut sync)
    }

    /// Append nested content
    pub fn push_content(&mut self, content: impl Into<Content>) -> EntryId {
        let mut sync = MarkupSync {
            element: &mut self.element,
            slots: &mut self.slots,
            anchor: None,
        };
        self.contents.push(content.into(), &mut sync)
    }

    /// Remove nested content and detach its element
    pub fn remove_content(&mut self, id: EntryId) -> Result<Content> {
        let mut sync = MarkupSync {
            element: &mut self.element,
            slots: &mut self.slots,
            anchor: None,
        };
        self.contents.remove(id, &mut sync)
    }

    /// Modify nested content in place and refresh its element
    pub fn update_content<F>(&mut self, id: EntryId, f: F) -> Result<()>
    where
        F: FnOnce(&mut Content),
    {
        let content = self
            .contents
            .get_by_id_mut(id)
            .ok_or_else(|| Error::NotFound(format!("content {}", id)))?;
        f(content);
        let node = content.to_node();
        self.replace_slot_node(Slot::Content(id), node)
    }

    fn replace_slot_node(&mut self, slot: Slot, node: Node) -> Result<()> {
        let position = self
            .slots
            .iter()
            .position(|s| *s == slot)
            .ok_or_else(|| Error::NotFound(format!("markup node for {:?}", slot)))?;
        self.element.replace_child(position, node)?;
        Ok(())
    }
}

impl From<Paragraph> for Element {
    fn from(paragraph: Paragraph) -> Element {
        paragraph.element
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> TextDocument {
        TextDocument::new()
    }

    fn expected_inner(paragraph: &Paragraph) -> String {
        paragraph.runs().iter().map(TextRun::serialized_form).collect()
    }

    #[test]
    fn test_styled_empty_attaches_style() {
        let doc = doc();
        let p = Paragraph::new(&doc, "P1").unwrap();
        assert_eq!(p.style_name(), Some("P1"));
        assert_eq!(p.style().map(|s| s.name()), Some("P1"));
        assert_eq!(p.style().map(|s| s.family()), Some(StyleFamily::Paragraph));
        assert_eq!(p.to_xml(), r#"<text:p text:style-name="P1"/>"#);
    }

    #[test]
    fn test_reserved_names_have_no_style_object() {
        let doc = doc();
        let p = Paragraph::new(&doc, STANDARD_STYLE).unwrap();
        assert!(p.style().is_none());
        let cell = Paragraph::new(&doc, TABLE_CONTENTS_STYLE).unwrap();
        assert!(cell.style().is_none());
        assert_eq!(cell.parent_style(), ParentStyleKind::TableCell);
    }

    #[test]
    fn test_simple_text_constructor() {
        let doc = doc();
        let p = Paragraph::with_text(&doc, ParentStyleKind::TableCell, "cell").unwrap();
        assert_eq!(p.style_name(), Some(TABLE_CONTENTS_STYLE));
        assert_eq!(p.runs().len(), 1);
        assert_eq!(p.text(), "cell");
        assert_eq!(p.inner_xml(), "cell");

        let custom = Paragraph::with_text(&doc, ParentStyleKind::Custom, "x").unwrap();
        assert_eq!(custom.style_name(), Some(STANDARD_STYLE));
        assert_eq!(custom.parent_style(), ParentStyleKind::Custom);
    }

    #[test]
    fn test_run_insertion_order() {
        let doc = doc();
        let mut p = Paragraph::new(&doc, STANDARD_STYLE).unwrap();
        p.push_run(TextRun::Simple("a".into()));
        p.push_run(TextRun::Tab);
        p.insert_run(1, TextRun::Space(3)).unwrap();
        p.insert_run(0, TextRun::LineBreak).unwrap();

        assert_eq!(
            p.inner_xml(),
            r#"<text:line-break/>a<text:s text:c="3"/><text:tab/>"#
        );
        assert_eq!(p.inner_xml(), expected_inner(&p));
        assert_eq!(p.text(), "\na   \t");
    }

    #[test]
    fn test_insert_run_out_of_range() {
        let doc = doc();
        let mut p = Paragraph::new(&doc, STANDARD_STYLE).unwrap();
        assert_eq!(
            p.insert_run(1, TextRun::Tab),
            Err(Error::IndexOutOfRange { index: 1, len: 0 })
        );
        assert!(p.element().children().is_empty());
    }

    #[test]
    fn test_removal_precision_with_substring_runs() {
        let doc = doc();
        let mut p = Paragraph::new(&doc, STANDARD_STYLE).unwrap();
        let long = p.push_run(TextRun::Simple("abc".into()));
        let short = p.push_run(TextRun::Simple("b".into()));
        p.push_run(TextRun::Simple("b".into()));

        let removed = p.remove_run(short).unwrap();
        assert_eq!(removed, TextRun::Simple("b".into()));
        assert_eq!(p.inner_xml(), "abcb");
        assert_eq!(p.runs().get_by_id(long), Some(&TextRun::Simple("abc".into())));
        assert_eq!(p.inner_xml(), expected_inner(&p));
    }

    #[test]
    fn test_removal_precision_with_identical_runs() {
        let doc = doc();
        let mut p = Paragraph::new(&doc, STANDARD_STYLE).unwrap();
        p.push_run(TextRun::Formatted(FormattedText::new("T1", "x")));
        p.push_run(TextRun::Simple("-".into()));
        let second = p.push_run(TextRun::Formatted(FormattedText::new("T1", "x")));

        p.remove_run(second).unwrap();
        assert_eq!(
            p.inner_xml(),
            r#"<text:span text:style-name="T1">x</text:span>-"#
        );
        assert!(matches!(p.remove_run(second), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_removal_precision_with_identical_content() {
        let doc = doc();
        let mut p = Paragraph::new(&doc, STANDARD_STYLE).unwrap();
        let mut frame = Element::new("draw:frame");
        frame.set_attribute("draw:name", "img");

        let first = p.push_content(Content::Unknown(frame.clone()));
        p.push_run(TextRun::Simple("|".into()));
        let second = p.push_content(Content::Unknown(frame));

        let removed = p.remove_content(second).unwrap();
        assert!(matches!(removed, Content::Unknown(_)));
        assert_eq!(p.inner_xml(), r#"<draw:frame draw:name="img"/>|"#);
        assert_eq!(p.contents().ids().collect::<Vec<_>>(), vec![first]);

        p.remove_content(first).unwrap();
        assert_eq!(p.inner_xml(), "|");
        assert!(matches!(p.remove_content(second), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_content_insert_and_remove() {
        let doc = doc();
        let mut outer = Paragraph::new(&doc, STANDARD_STYLE).unwrap();
        let inner = Paragraph::with_text(&doc, ParentStyleKind::Standard, "inner").unwrap();
        let frame = Element::new("draw:frame");

        let a = outer.push_content(inner);
        outer.insert_content(0, Content::Unknown(frame)).unwrap();
        assert_eq!(
            outer.inner_xml(),
            r#"<draw:frame/><text:p text:style-name="Standard">inner</text:p>"#
        );

        let removed = outer.remove_content(a).unwrap();
        assert_eq!(removed.text(), "inner");
        assert_eq!(outer.inner_xml(), "<draw:frame/>");
    }

    #[test]
    fn test_runs_and_content_interleave_chronologically() {
        let doc = doc();
        let mut p = Paragraph::new(&doc, STANDARD_STYLE).unwrap();
        p.push_run(TextRun::Simple("one".into()));
        p.push_content(Content::Unknown(Element::new("draw:frame")));
        p.push_run(TextRun::Simple("two".into()));
        p.insert_run(1, TextRun::Tab).unwrap();
        assert_eq!(p.inner_xml(), "one<draw:frame/><text:tab/>two");
    }

    #[test]
    fn test_update_run_and_content_resync() {
        let doc = doc();
        let mut p = Paragraph::new(&doc, STANDARD_STYLE).unwrap();
        let run = p.push_run(TextRun::Space(1));
        p.update_run(run, |r| *r = TextRun::Space(2)).unwrap();
        assert_eq!(p.inner_xml(), r#"<text:s text:c="2"/>"#);

        let nested = Paragraph::new(&doc, STANDARD_STYLE).unwrap();
        let id = p.push_content(nested);
        p.update_content(id, |c| {
            if let Some(inner) = c.as_paragraph_mut() {
                inner.push_run(TextRun::Simple("late".into()));
            }
        })
        .unwrap();
        assert_eq!(
            p.inner_xml(),
            r#"<text:s text:c="2"/><text:p text:style-name="Standard">late</text:p>"#
        );
    }

    #[test]
    fn test_style_name_proxy() {
        let doc = doc();
        let mut p = Paragraph::new(&doc, "P1").unwrap();
        p.set_style_name("DoesNotExist");
        assert_eq!(p.style_name(), Some("DoesNotExist"));
        assert_eq!(p.style().map(|s| s.name()), Some("P1"));

        p.set_style(Some(StyleDefinition::new("P2", StyleFamily::Paragraph)));
        assert_eq!(p.style_name(), Some("P2"));
        p.style_mut().unwrap().set_parent_style_name(Some("Heading".into()));
        assert!(p.style().unwrap().is_heading());
    }

    #[test]
    fn test_bind_to_existing_element() {
        let doc = doc();
        let element = Element::parse(
            r#"<text:p xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" xmlns:draw="urn:oasis:names:tc:opendocument:xmlns:drawing:1.0" xmlns:xlink="http://www.w3.org/1999/xlink" text:style-name="P3">Hi<text:s/><text:span text:style-name="T1">bold<text:tab/></text:span><text:a xlink:href="http://x.org" xlink:type="simple">x</text:a><text:bookmark text:name="b"/><draw:frame/><text:s text:c="1"/></text:p>"#,
        )
        .unwrap();
        let before = element.to_xml_string();
        let mut p = Paragraph::from_element(element, &doc).unwrap();

        assert_eq!(p.to_xml(), before);
        assert!(p.style().is_none());
        assert_eq!(p.style_name(), Some("P3"));
        assert_eq!(p.runs().len(), 6);
        assert_eq!(p.contents().len(), 1);
        assert_eq!(p.runs().get(1), Some(&TextRun::Space(1)));
        assert!(matches!(p.runs().get(2), Some(TextRun::Formatted(_))));
        match p.runs().get(3) {
            Some(TextRun::Link(link)) => assert_eq!(link.href(), Some("http://x.org")),
            other => panic!("expected link, got {:?}", other),
        }
        assert!(matches!(p.runs().get(4), Some(TextRun::Unknown(_))));
        // text:c="1" cannot be reproduced by Space(1)
        assert!(matches!(p.runs().get(5), Some(TextRun::Unknown(_))));
        assert_eq!(p.text(), "Hi bold\tx");

        let first = p.runs().id_at(0).unwrap();
        p.remove_run(first).unwrap();
        assert!(p.inner_xml().starts_with("<text:s/><text:span"));
        assert!(p.inner_xml().contains("<draw:frame/>"));
    }

    #[test]
    fn test_bind_oversized_space_count() {
        let doc = doc();
        let element = Element::parse(
            r#"<text:p xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0"><text:s text:c="4000000000"/>a<text:s text:c="3"/></text:p>"#,
        )
        .unwrap();
        let before = element.to_xml_string();
        let p = Paragraph::from_element(element, &doc).unwrap();

        assert!(matches!(p.runs().get(0), Some(TextRun::Unknown(_))));
        assert_eq!(p.runs().get(2), Some(&TextRun::Space(3)));
        assert_eq!(p.text(), "a   ");
        assert_eq!(p.to_xml(), before);
    }

    #[test]
    fn test_constructed_space_run_is_bounded() {
        let run = TextRun::Space(u32::MAX);
        assert_eq!(run.text().len(), MAX_SPACE_COUNT as usize);
        assert_eq!(run.serialized_form(), format!(r#"<text:s text:c="{}"/>"#, u32::MAX));
    }

    #[test]
    fn test_bind_derives_parent_kind() {
        let doc = doc();
        let cell = Element::parse(
            r#"<text:p xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" text:style-name="Table_20_Contents">c</text:p>"#,
        )
        .unwrap();
        let p = Paragraph::from_element(cell, &doc).unwrap();
        assert_eq!(p.parent_style(), ParentStyleKind::TableCell);

        let body = Element::parse(
            r#"<text:p xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" text:style-name="P1">b</text:p>"#,
        )
        .unwrap();
        let p = Paragraph::from_element(body, &doc).unwrap();
        assert_eq!(p.parent_style(), ParentStyleKind::Standard);
    }

    #[test]
    fn test_bind_nested_paragraph() {
        let doc = doc();
        let element = Element::parse(
            r#"<text:p xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0"><text:p>inner</text:p></text:p>"#,
        )
        .unwrap();
        let p = Paragraph::from_element(element, &doc).unwrap();
        assert!(p.runs().is_empty());
        let nested = p.contents().get(0).and_then(Content::as_paragraph).unwrap();
        assert_eq!(nested.text(), "inner");
    }

    #[test]
    fn test_bind_rejects_other_elements() {
        let doc = doc();
        let err = Paragraph::from_element(Element::new("text:h"), &doc).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    /// For any sequence of run inserts and removes, the backing element's
    /// children serialize to the remaining runs' forms in collection order.
    #[cfg(test)]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Debug, Clone)]
        enum Op {
            Insert(usize, TextRun),
            Remove(usize),
        }

        fn run_strategy() -> impl Strategy<Value = TextRun> {
            prop_oneof![
                "[a-c]{1,3}".prop_map(TextRun::Simple),
                (1u32..4).prop_map(TextRun::Space),
                Just(TextRun::Tab),
                Just(TextRun::LineBreak),
                ("[a-c]{1,2}", "T[12]").prop_map(|(text, style)| {
                    TextRun::Formatted(FormattedText::new(&style, &text))
                }),
            ]
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                (0usize..8, run_strategy()).prop_map(|(i, run)| Op::Insert(i, run)),
                (0usize..8).prop_map(Op::Remove),
            ]
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn prop_markup_tracks_runs(ops in prop::collection::vec(op_strategy(), 0..40)) {
                let doc = TextDocument::new();
                let mut p = Paragraph::new(&doc, STANDARD_STYLE).unwrap();
                let mut model: Vec<TextRun> = Vec::new();

                for op in ops {
                    match op {
                        Op::Insert(i, run) => {
                            let index = i % (model.len() + 1);
                            p.insert_run(index, run.clone()).unwrap();
                            model.insert(index, run);
                        },
                        Op::Remove(i) => {
                            if model.is_empty() {
                                continue;
                            }
                            let index = i % model.len();
                            let id = p.runs().id_at(index).unwrap();
                            let removed = p.remove_run(id).unwrap();
                            prop_assert_eq!(removed, model.remove(index));
                        },
                    }

                    let expected: String = model.iter().map(TextRun::serialized_form).collect();
                    prop_assert_eq!(p.inner_xml(), expected);
                    prop_assert_eq!(p.element().children().len(), model.len());
                }
            }
        }
    }
}
