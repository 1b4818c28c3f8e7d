//! OpenDocument text model.

/// Observable ordered collections
pub mod collection;
/// ODF XML element classes
pub mod elements;
/// ODF text document (.odt) context
pub mod odt;

pub use collection::{EntryId, ObservableSequence, SequenceObserver};
pub use elements::element::{Element, ElementBase, Node};
pub use elements::style::{PropertyGroup, PropertyKey, StyleDefinition, StyleFamily, StyleRegistry};
pub use elements::text::{Content, FormattedText, Link, Paragraph, ParentStyleKind, TextRun};
pub use odt::TextDocument;
