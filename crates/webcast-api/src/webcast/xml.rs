//! Generic XML document tree for Webcast responses.
//!
//! The remote service documents its resources (Media, Channel,
//! `RatingSummary`, ...) externally, so responses are kept as an untyped
//! element tree rather than deserialized into fixed structs.

use std::fmt;

use anyhow::{Context, Result, bail};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// A parsed XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name (including any namespace prefix).
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Concatenated, trimmed character data directly inside this element.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<Self>,
}

impl XmlElement {
    /// Creates an element with no attributes, text or children.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Parses a complete document and returns its root element.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not well-formed XML, has no root
    /// element, has more than one root element, or has text outside the root.
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);

        let mut stack: Vec<Self> = Vec::new();
        let mut root: Option<Self> = None;

        loop {
            let event = reader
                .read_event()
                .with_context(|| format!("XML error at byte {}", reader.buffer_position()))?;
            match event {
                Event::Start(start) => {
                    if root.is_some() {
                        bail!("multiple root elements");
                    }
                    stack.push(Self::from_start(&start)?);
                }
                Event::Empty(start) => {
                    if root.is_some() {
                        bail!("multiple root elements");
                    }
                    let element = Self::from_start(&start)?;
                    Self::attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    let mut element = stack.pop().context("unexpected closing tag")?;
                    // Character data arrives in pieces split around references.
                    element.text = element.text.trim().to_owned();
                    Self::attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    let raw = String::from_utf8_lossy(&text);
                    let unescaped = quick_xml::escape::unescape(&raw)
                        .with_context(|| format!("invalid character data: {raw}"))?;
                    Self::push_text(&mut stack, &unescaped)?;
                }
                Event::CData(data) => {
                    Self::push_text(&mut stack, &String::from_utf8_lossy(&data))?;
                }
                Event::GeneralRef(reference) => {
                    let name = String::from_utf8_lossy(&reference);
                    let resolved = resolve_reference(&name)?;
                    Self::push_text(&mut stack, &resolved)?;
                }
                Event::Eof => break,
                Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            }
        }

        if let Some(open) = stack.last() {
            bail!("unclosed element <{}>", open.name);
        }
        root.context("document has no root element")
    }

    /// Builds an element from a start tag.
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let mut element = Self::new(String::from_utf8_lossy(start.name().as_ref()));
        for attr in start.attributes() {
            let attr = attr.context("invalid attribute")?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&attr.value);
            let value = quick_xml::escape::unescape(&raw)
                .with_context(|| format!("invalid attribute value: {raw}"))?;
            element.attributes.push((key, value.into_owned()));
        }
        Ok(element)
    }

    /// Attaches a finished element to its parent, or makes it the root.
    fn attach(stack: &mut [Self], root: &mut Option<Self>, element: Self) {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(element);
        } else {
            *root = Some(element);
        }
    }

    /// Appends character data to the innermost open element.
    fn push_text(stack: &mut [Self], text: &str) -> Result<()> {
        match stack.last_mut() {
            Some(current) => {
                current.text.push_str(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => bail!("text outside of root element"),
        }
    }

    /// Returns `true` when the element carries nothing: no attributes,
    /// no children and no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.trim().is_empty()
    }

    /// Returns the first child element with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Returns all child elements with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Self> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follows a path of child names from this element.
    ///
    /// An empty path returns `self`.
    #[must_use]
    pub fn find(&self, path: &[&str]) -> Option<&Self> {
        path.iter()
            .try_fold(self, |current, name| current.child(name))
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the trimmed text content.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Writes the element as an indented tree.
    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "  ".repeat(depth);
        write!(f, "{indent}{}", self.name)?;
        for (k, v) in &self.attributes {
            write!(f, " @{k}={v:?}")?;
        }
        if !self.text().is_empty() {
            write!(f, ": {}", self.text())?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.write_indented(f, depth.saturating_add(1))?;
        }
        Ok(())
    }
}

impl fmt::Display for XmlElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

/// Resolves an entity or character reference name (the part between `&` and `;`).
fn resolve_reference(name: &str) -> Result<String> {
    if let Some(num) = name.strip_prefix('#') {
        let code = if let Some(hex) = num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            u32::from_str_radix(hex, 16)
        } else {
            num.parse::<u32>()
        }
        .with_context(|| format!("invalid character reference: &{name};"))?;
        let ch = char::from_u32(code)
            .filter(|c| is_xml_char(*c))
            .with_context(|| format!("invalid character reference: &{name};"))?;
        return Ok(ch.to_string());
    }
    quick_xml::escape::resolve_predefined_entity(name)
        .map(String::from)
        .with_context(|| format!("unknown entity: &{name};"))
}

/// XML 1.0 `Char` production: tab, newline, carriage return and everything
/// from U+0020 except U+FFFE and U+FFFF (surrogates are not `char`s).
const fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..)
}
