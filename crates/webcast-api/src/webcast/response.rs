//! Response classification.

use std::fmt;
use std::sync::Arc;

use super::xml::XmlElement;

/// Result of a Webcast request, classified by the shape of the body.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum WebcastResponse {
    /// Body looked like markup and parsed.
    Document(Arc<XmlElement>),
    /// Body did not look like markup (plain count, error message, empty).
    Text(String),
    /// Body looked like markup but failed to parse.
    Malformed {
        /// Raw response body.
        body: String,
        /// Parse error description.
        error: String,
    },
}

impl WebcastResponse {
    /// Classifies a raw response body.
    ///
    /// A body starting with `<` and ending with `>` (trailing whitespace
    /// ignored) is treated as markup. This is a loose shape check, not a
    /// well-formedness test.
    #[must_use]
    pub fn classify(body: String) -> Self {
        if !looks_like_markup(&body) {
            return Self::Text(body);
        }
        match XmlElement::parse(&body) {
            Ok(root) => Self::Document(Arc::new(root)),
            Err(e) => Self::Malformed {
                body,
                error: format!("{e:#}"),
            },
        }
    }

    /// Returns the parsed document, if any.
    #[must_use]
    pub fn as_document(&self) -> Option<&XmlElement> {
        match self {
            Self::Document(doc) => Some(doc),
            Self::Text(_) | Self::Malformed { .. } => None,
        }
    }

    /// Returns the raw text, if the body was not markup.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Document(_) | Self::Malformed { .. } => None,
        }
    }

    /// Returns `true` for an unparseable markup body.
    #[must_use]
    pub const fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed { .. })
    }

    /// Text view compatible with the historical client behavior: raw text as
    /// is, an empty string for malformed markup, `None` for documents.
    #[must_use]
    pub fn legacy_text(&self) -> Option<&str> {
        match self {
            Self::Document(_) => None,
            Self::Text(text) => Some(text),
            Self::Malformed { .. } => Some(""),
        }
    }
}

impl fmt::Display for WebcastResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document(doc) => write!(f, "{doc}"),
            Self::Text(text) => writeln!(f, "{text}"),
            Self::Malformed { error, .. } => writeln!(f, "<malformed response: {error}>"),
        }
    }
}

/// Loose markup check: starts with `<`, ends with `>`.
fn looks_like_markup(body: &str) -> bool {
    body.starts_with('<') && body.trim_end().ends_with('>')
}
