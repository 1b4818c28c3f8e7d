//! Configuration options for HTML projection.
//!
//! This module provides configuration types for customizing how paragraphs
//! are rendered as HTML.

use crate::common::unit::DEFAULT_DPI;
use crate::odf::elements::style::StyleRegistry;

/// How a set `fo:font-style` property is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItalicEmission {
    /// `font-style: italic;`
    #[default]
    Standard,
    /// `font-size: italic;`, as older exporters wrote it
    Legacy,
}

/// Configuration options for HTML projection.
///
/// # Examples
///
/// ```
/// use odtpara::html::{HtmlOptions, ItalicEmission};
///
/// let options = HtmlOptions::new()
///     .with_parent_hops(3)
///     .with_italic_emission(ItalicEmission::Legacy);
/// assert_eq!(options.parent_hops, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtmlOptions {
    /// Emission of italic text properties
    pub italic_emission: ItalicEmission,
    /// Number of `style:parent-style-name` links the cascade follows
    pub parent_hops: usize,
    /// Screen resolution for converting point sizes to pixels
    pub pixels_per_inch: u32,
    /// Emit a newline after each closed paragraph
    pub line_breaks: bool,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            italic_emission: ItalicEmission::Standard,
            parent_hops: 1,
            pixels_per_inch: DEFAULT_DPI,
            line_breaks: false,
        }
    }
}

impl HtmlOptions {
    /// Create new options with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set how italic properties are emitted
    pub fn with_italic_emission(mut self, emission: ItalicEmission) -> Self {
        self.italic_emission = emission;
        self
    }

    /// Set how many parent links the cascade follows
    pub fn with_parent_hops(mut self, hops: usize) -> Self {
        self.parent_hops = hops;
        self
    }

    /// Set the resolution used for pt to px conversion
    pub fn with_pixels_per_inch(mut self, dpi: u32) -> Self {
        self.pixels_per_inch = dpi;
        self
    }

    /// Set whether paragraphs end with a newline
    pub fn with_line_breaks(mut self, enabled: bool) -> Self {
        self.line_breaks = enabled;
        self
    }
}

/// Everything a projection needs besides the node itself
#[derive(Debug, Clone, Copy)]
pub struct HtmlContext<'a> {
    /// Global style registry used by the cascade
    pub styles: &'a StyleRegistry,
    /// Output options
    pub options: HtmlOptions,
}

impl<'a> HtmlContext<'a> {
    /// Create a context over `styles`
    pub fn new(styles: &'a StyleRegistry, options: HtmlOptions) -> Self {
        Self { styles, options }
    }
}
