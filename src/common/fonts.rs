//! Office font name to CSS font-family mapping.
//!
//! ODF text properties name fonts by their declared face name
//! (`style:font-name`); browsers need a family list with a generic fallback.

use phf::{Map, phf_map};

/// Known office fonts and their web-safe family lists
static WEB_FONTS: Map<&'static str, &'static str> = phf_map! {
    // Serif
    "Times New Roman" => "'Times New Roman', Times, serif",
    "Times" => "Times, 'Times New Roman', serif",
    "Georgia" => "Georgia, serif",
    "Garamond" => "Garamond, serif",
    "Liberation Serif" => "'Liberation Serif', 'Times New Roman', serif",
    "DejaVu Serif" => "'DejaVu Serif', serif",
    "Thorndale" => "Thorndale, 'Times New Roman', serif",
    "Cambria" => "Cambria, Georgia, serif",
    // Sans-serif
    "Arial" => "Arial, Helvetica, sans-serif",
    "Helvetica" => "Helvetica, Arial, sans-serif",
    "Verdana" => "Verdana, Geneva, sans-serif",
    "Tahoma" => "Tahoma, Geneva, sans-serif",
    "Trebuchet MS" => "'Trebuchet MS', Helvetica, sans-serif",
    "Arial Black" => "'Arial Black', Gadget, sans-serif",
    "Liberation Sans" => "'Liberation Sans', Arial, sans-serif",
    "DejaVu Sans" => "'DejaVu Sans', Verdana, sans-serif",
    "Albany" => "Albany, Arial, sans-serif",
    "Calibri" => "Calibri, Arial, sans-serif",
    "Lucida Sans Unicode" => "'Lucida Sans Unicode', 'Lucida Grande', sans-serif",
    // Monospace
    "Courier New" => "'Courier New', Courier, monospace",
    "Courier" => "Courier, 'Courier New', monospace",
    "Liberation Mono" => "'Liberation Mono', 'Courier New', monospace",
    "DejaVu Sans Mono" => "'DejaVu Sans Mono', monospace",
    "Cumberland" => "Cumberland, 'Courier New', monospace",
    "Lucida Console" => "'Lucida Console', Monaco, monospace",
    // Cursive / fantasy
    "Comic Sans MS" => "'Comic Sans MS', cursive",
    "Impact" => "Impact, Charcoal, fantasy",
};

/// Map an office font name to a CSS `font-family` value.
///
/// Unknown names are kept (quoted when they contain spaces) and followed by
/// `serif`, the default family of office text documents.
///
/// ```
/// use odtpara::common::fonts::html_font;
/// assert_eq!(html_font("Arial"), "Arial, Helvetica, sans-serif");
/// assert_eq!(html_font("My Font"), "'My Font', serif");
/// ```
pub fn html_font(name: &str) -> String {
    // ODF encodes spaces in style names as _20_
    let name = name.trim().replace("_20_", " ");
    if let Some(family) = WEB_FONTS.get(name.as_str()) {
        return (*family).to_string();
    }

    if name.is_empty() {
        "serif".to_string()
    } else if name.contains(' ') {
        format!("'{}', serif", name)
    } else {
        format!("{}, serif", name)
    }
}
