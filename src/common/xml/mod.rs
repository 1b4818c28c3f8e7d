//! XML text helpers shared by the markup tree and the HTML writer.

mod escape;

pub use escape::{escape_attr, escape_text, escape_xml, unescape_xml};
