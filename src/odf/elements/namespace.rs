//! Namespace handling utilities for ODF XML elements.
//!
//! Qualified names, the prefix → URI context a document resolves against,
//! and the namespaces a text paragraph and its styles actually use.

use phf::{Map, phf_map};
use std::collections::HashMap;

// ============================================================================
// NAMESPACE CONSTANTS
// ============================================================================

/// Drawing namespace
pub const DRAWNS: &str = "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0";

/// XSL-FO compatible namespace
pub const FONS: &str = "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0";

/// Office namespace
pub const OFFICENS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";

/// Style namespace
pub const STYLENS: &str = "urn:oasis:names:tc:opendocument:xmlns:style:1.0";

/// SVG compatible namespace
pub const SVGNS: &str = "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0";

/// Table namespace
pub const TABLENS: &str = "urn:oasis:names:tc:opendocument:xmlns:table:1.0";

/// Text namespace
pub const TEXTNS: &str = "urn:oasis:names:tc:opendocument:xmlns:text:1.0";

/// XLink namespace
pub const XLINKNS: &str = "http://www.w3.org/1999/xlink";

// ============================================================================
// NAMESPACE MAPPING (compile-time perfect hash map)
// ============================================================================

/// URI to prefix mapping
static URI_TO_PREFIX: Map<&'static str, &'static str> = phf_map! {
    "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0" => "draw",
    "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0" => "fo",
    "urn:oasis:names:tc:opendocument:xmlns:office:1.0" => "office",
    "urn:oasis:names:tc:opendocument:xmlns:style:1.0" => "style",
    "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0" => "svg",
    "urn:oasis:names:tc:opendocument:xmlns:table:1.0" => "table",
    "urn:oasis:names:tc:opendocument:xmlns:text:1.0" => "text",
    "http://www.w3.org/1999/xlink" => "xlink",
};

/// Prefix to URI mapping
static PREFIX_TO_URI: Map<&'static str, &'static str> = phf_map! {
    "draw" => "urn:oasis:names:tc:opendocument:xmlns:drawing:1.0",
    "fo" => "urn:oasis:names:tc:opendocument:xmlns:xsl-fo-compatible:1.0",
    "office" => "urn:oasis:names:tc:opendocument:xmlns:office:1.0",
    "style" => "urn:oasis:names:tc:opendocument:xmlns:style:1.0",
    "svg" => "urn:oasis:names:tc:opendocument:xmlns:svg-compatible:1.0",
    "table" => "urn:oasis:names:tc:opendocument:xmlns:table:1.0",
    "text" => "urn:oasis:names:tc:opendocument:xmlns:text:1.0",
    "xlink" => "http://www.w3.org/1999/xlink",
};

// ============================================================================
// QUALIFIED NAME
// ============================================================================

/// Qualified name with namespace support
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    /// Namespace URI
    pub namespace_uri: Option<String>,
    /// Local name (without prefix)
    pub local_name: String,
    /// Full qualified name (with prefix if present)
    pub qualified_name: String,
}

impl QualifiedName {
    /// Create a new qualified name, choosing the standard ODF prefix for the URI
    pub fn new(namespace_uri: Option<String>, local_name: String) -> Self {
        let qualified_name = match namespace_uri.as_deref().map(Self::uri_to_prefix) {
            Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local_name),
            _ => local_name.clone(),
        };

        Self {
            namespace_uri,
            local_name,
            qualified_name,
        }
    }

    /// Parse qualified name from string using the standard ODF prefixes
    pub fn from_string(name: &str) -> Self {
        Self::from_string_with_context(name, None)
    }

    /// Rewrite the prefix to the standard ODF prefix when the URI is a known one.
    ///
    /// Documents may bind ODF namespaces to arbitrary prefixes; the model
    /// always stores and serializes the standard ones.
    pub fn normalized(self) -> Self {
        match self.namespace_uri.as_deref().map(Self::uri_to_prefix) {
            Some(prefix) if !prefix.is_empty() => Self::new(self.namespace_uri, self.local_name),
            _ => self,
        }
    }

    /// Get the prefix part, if any
    pub fn prefix(&self) -> Option<&str> {
        self.qualified_name
            .split_once(':')
            .map(|(prefix, _)| prefix)
    }

    #[inline]
    fn uri_to_prefix(uri: &str) -> &'static str {
        URI_TO_PREFIX.get(uri).copied().unwrap_or("")
    }

    #[inline]
    fn prefix_to_uri(prefix: &str) -> Option<String> {
        PREFIX_TO_URI.get(prefix).map(|s| (*s).to_string())
    }

    /// Check if this name matches another qualified name
    pub fn matches(&self, other: &QualifiedName) -> bool {
        self.namespace_uri == other.namespace_uri && self.local_name == other.local_name
    }

    /// Check if this name matches a string (with optional namespace resolution)
    pub fn matches_str(&self, name: &str, namespace_context: Option<&NamespaceContext>) -> bool {
        let other = QualifiedName::from_string_with_context(name, namespace_context);
        self.matches(&other)
    }

    fn from_string_with_context(name: &str, context: Option<&NamespaceContext>) -> Self {
        if let Some((prefix, local_name)) = name.split_once(':') {
            let namespace_uri = match context {
                Some(ctx) => ctx.resolve_prefix(prefix).map(|s| s.to_string()),
                None => Self::prefix_to_uri(prefix),
            };

            Self {
                namespace_uri,
                local_name: local_name.to_string(),
                qualified_name: name.to_string(),
            }
        } else {
            Self {
                namespace_uri: context
                    .and_then(|ctx| ctx.default_namespace())
                    .map(|s| s.to_string()),
                local_name: name.to_string(),
                qualified_name: name.to_string(),
            }
        }
    }
}

impl From<&str> for QualifiedName {
    fn from(name: &str) -> Self {
        Self::from_string(name)
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.qualified_name)
    }
}

/// Namespace context for resolving prefixes to URIs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    pub prefixes: HashMap<String, String>,
    /// Default namespace URI
    pub default_namespace: Option<String>,
}

impl NamespaceContext {
    /// Context pre-populated with the standard ODF prefixes
    pub fn odf() -> Self {
        let mut ctx = Self::default();
        for (prefix, uri) in PREFIX_TO_URI.entries() {
            ctx.prefixes.insert((*prefix).to_string(), (*uri).to_string());
        }
        ctx
    }

    /// Add a namespace declaration (`xmlns` or `xmlns:prefix` attribute form)
    pub fn add_namespace(&mut self, prefix: &str, uri: &str) {
        if prefix == "xmlns" {
            self.default_namespace = Some(uri.to_string());
        } else if let Some(prefix) = prefix.strip_prefix("xmlns:") {
            self.prefixes.insert(prefix.to_string(), uri.to_string());
        }
    }

    /// Resolve prefix to namespace URI
    pub fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get default namespace
    pub fn default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Parse qualified name with this context
    pub fn parse_qualified_name(&self, name: &str) -> QualifiedName {
        QualifiedName::from_string_with_context(name, Some(self))
    }

    /// Namespace declarations as `xmlns:prefix="uri"` pairs, sorted by prefix
    pub fn declarations(&self) -> Vec<(String, &str)> {
        let mut decls: Vec<(String, &str)> = self
            .prefixes
            .iter()
            .map(|(prefix, uri)| (format!("xmlns:{}", prefix), uri.as_str()))
            .collect();
        decls.sort();
        if let Some(uri) = self.default_namespace() {
            decls.insert(0, ("xmlns".to_string(), uri));
        }
        decls
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualified_name_from_string() {
        let name = QualifiedName::from_string("text:p");
        assert_eq!(name.local_name, "p");
        assert_eq!(name.namespace_uri.as_deref(), Some(TEXTNS));
        assert_eq!(name.prefix(), Some("text"));
        assert_eq!(name.to_string(), "text:p");
    }

    #[test]
    fn test_qualified_name_new_uses_standard_prefix() {
        let name = QualifiedName::new(Some(STYLENS.to_string()), "style".to_string());
        assert_eq!(name.qualified_name, "style:style");
        let name = QualifiedName::new(Some("urn:example".to_string()), "x".to_string());
        assert_eq!(name.qualified_name, "x");
    }

    #[test]
    fn test_normalized_prefix() {
        let mut ctx = NamespaceContext::default();
        ctx.add_namespace("xmlns:t", TEXTNS);
        ctx.add_namespace("xmlns:x", "urn:example");
        assert_eq!(ctx.parse_qualified_name("t:p").normalized().qualified_name, "text:p");
        assert_eq!(ctx.parse_qualified_name("x:y").normalized().qualified_name, "x:y");
        assert_eq!(ctx.parse_qualified_name("plain").normalized().qualified_name, "plain");
    }

    #[test]
    fn test_matches_with_custom_prefix() {
        let mut ctx = NamespaceContext::default();
        ctx.add_namespace("xmlns:t", TEXTNS);
        let name = ctx.parse_qualified_name("t:span");
        assert!(name.matches_str("text:span", None));
        assert!(!name.matches_str("text:p", None));
    }

    #[test]
    fn test_odf_context() {
        let ctx = NamespaceContext::odf();
        assert_eq!(ctx.resolve_prefix("fo"), Some(FONS));
        assert_eq!(ctx.resolve_prefix("office"), Some(OFFICENS));
        assert_eq!(ctx.resolve_prefix("nope"), None);
        let decls = ctx.declarations();
        assert_eq!(decls[0].0, "xmlns:draw");
        assert!(decls.iter().any(|(k, v)| k == "xmlns:text" && *v == TEXTNS));
    }
}
