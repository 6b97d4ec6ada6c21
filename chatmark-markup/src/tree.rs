//! Lenient markup tree.
//!
//! The adapter never tokenizes markup itself. It walks a [`Document`]
//! produced by a [`MarkupParser`]. The default parser, [`TagSoupParser`],
//! builds elements only for whitelisted tag names and keeps every other
//! tag verbatim as text, so `<message>Use <b>bold</b></message>` yields a
//! single message element whose content is `Use <b>bold</b>`.

use std::borrow::Cow;

use indexmap::IndexMap;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::trace;

use crate::error::Result;

/// Attribute values treated as false by [`Element::flag`].
const FALSY_VALUES: &[&str] = &["0", "false", "no", "off"];

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A whitelisted element.
    Element(Element),
    /// Text, including any non-whitelisted tags kept verbatim.
    Text(String),
}

/// A whitelisted markup element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: IndexMap<String, String>,
    nodes: Vec<Node>,
}

impl Element {
    /// Create an empty element. The tag is stored lowercase.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: IndexMap::new(),
            nodes: Vec::new(),
        }
    }

    /// Add an attribute. The name is stored lowercase.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Append a text node.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        push_text(&mut self.nodes, text.into());
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.nodes.push(Node::Element(child));
        self
    }

    /// The lowercase tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Check the tag name, ignoring ASCII case.
    #[must_use]
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Get an attribute value.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .or_else(|| self.attributes.get(&name.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Get an attribute value, or `default` when absent.
    #[must_use]
    pub fn attribute_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.attribute(name).unwrap_or(default)
    }

    /// Check whether an attribute is present and truthy.
    ///
    /// A bare attribute (`<content cache>`) counts as true. The values
    /// `0`, `false`, `no` and `off` count as false.
    #[must_use]
    pub fn flag(&self, name: &str) -> bool {
        match self.attribute(name) {
            Some(value) => {
                let value = value.trim();
                !FALSY_VALUES.iter().any(|f| f.eq_ignore_ascii_case(value))
            }
            None => false,
        }
    }

    /// Iterate over attributes in source order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// All child nodes, text included.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        elements(&self.nodes)
    }

    /// Check for child elements. Text does not count.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.children().next().is_some()
    }

    /// Concatenated text of this element and all descendants.
    #[must_use]
    pub fn content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }
}

/// The parsed top level of a markup string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Document {
    /// Create a document from top-level nodes.
    #[must_use]
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// All top-level nodes.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Top-level elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &Element> {
        elements(&self.nodes)
    }
}

/// Builds a markup tree from text.
///
/// `tags` is the whitelist of names that become elements.
pub trait MarkupParser: Send + Sync {
    /// Parse text into a document.
    fn parse(&self, text: &str, tags: &[&str]) -> Result<Document>;
}

/// Tag-soup parser on top of `quick-xml` events.
///
/// - Whitelisted end tags close the nearest open element with that name,
///   along with anything opened after it; stray end tags are dropped.
/// - Elements still open at end of input are closed.
/// - A `<` that does not start a whitelisted tag is text, so `1 < 2` and
///   `a<b` never swallow the markup that follows.
/// - Comments and processing instructions are dropped.
/// - Attributes are read HTML-style: bare names and unquoted values are allowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TagSoupParser;

impl TagSoupParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MarkupParser for TagSoupParser {
    fn parse(&self, text: &str, tags: &[&str]) -> Result<Document> {
        let markup = escape_stray_brackets(text, tags);
        let mut reader = Reader::from_str(&markup);
        reader
            .trim_text(false)
            .check_end_names(false)
            .expand_empty_elements(false);

        let mut root: Vec<Node> = Vec::new();
        let mut stack: Vec<Element> = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = tag_name(e.name().as_ref());
                    stack.push(start_element(name, &e)?);
                }
                Event::Empty(e) => {
                    let name = tag_name(e.name().as_ref());
                    let element = start_element(name, &e)?;
                    current(&mut stack, &mut root).push(Node::Element(element));
                }
                Event::End(e) => {
                    let name = tag_name(e.name().as_ref());
                    match stack.iter().rposition(|el| el.tag == name) {
                        Some(pos) => {
                            while stack.len() > pos {
                                close_top(&mut stack, &mut root);
                            }
                        }
                        None => trace!(tag = %name, "dropping stray end tag"),
                    }
                }
                Event::Text(e) => {
                    let raw = String::from_utf8_lossy(&e);
                    let text = decode_entities(&raw).into_owned();
                    push_text(current(&mut stack, &mut root), text);
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    push_text(current(&mut stack, &mut root), text);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        while !stack.is_empty() {
            close_top(&mut stack, &mut root);
        }

        Ok(Document::new(root))
    }
}

/// Escape every `<` that does not open or close a whitelisted tag.
///
/// Comments, CDATA sections and processing instructions pass through when
/// terminated. Anything else, such as `1 < 2`, `a<b` or `<b>bold</b>`, is
/// handed to the reader as `&lt;` and decoded back into text.
fn escape_stray_brackets<'a>(text: &'a str, tags: &[&str]) -> Cow<'a, str> {
    if !text.contains('<') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 16);
    let mut rest = text;
    while let Some(pos) = rest.find('<') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(len) = passthrough_len(tail) {
            out.push_str(&tail[..len]);
            rest = &tail[len..];
        } else {
            if is_known_tag(tail, tags) {
                out.push('<');
            } else {
                out.push_str("&lt;");
            }
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Length of a terminated comment, CDATA section or processing instruction.
fn passthrough_len(tail: &str) -> Option<usize> {
    const BLOCKS: &[(&str, &str)] = &[("<!--", "-->"), ("<![CDATA[", "]]>"), ("<?", "?>")];
    BLOCKS.iter().find_map(|(open, close)| {
        let body = tail.strip_prefix(open)?;
        body.find(close).map(|end| open.len() + end + close.len())
    })
}

/// Check whether `tail` starts with `<name` or `</name` for a whitelisted name.
fn is_known_tag(tail: &str, tags: &[&str]) -> bool {
    let after = &tail[1..];
    let after = after.strip_prefix('/').unwrap_or(after);
    let name_len = after
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == ':'))
        .unwrap_or(after.len());
    let name = &after[..name_len];
    let boundary = after[name_len..]
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_whitespace() || c == '>' || c == '/');
    boundary && tags.iter().any(|t| t.eq_ignore_ascii_case(name))
}

/// Decode character and entity references one at a time.
///
/// A reference that does not decode, such as a bare `&`, stays literal
/// without affecting its neighbours.
fn decode_entities(raw: &str) -> Cow<'_, str> {
    const MAX_REFERENCE: usize = 32;

    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let reference = tail
            .find(';')
            .filter(|end| *end < MAX_REFERENCE)
            .map(|end| &tail[..=end]);
        match reference.and_then(|r| unescape(r).ok().map(|decoded| (r.len(), decoded))) {
            Some((len, decoded)) => {
                out.push_str(&decoded);
                rest = &tail[len..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn start_element(name: String, start: &BytesStart<'_>) -> Result<Element> {
    let mut element = Element::new(name);
    for attr in start.html_attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_ascii_lowercase();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = decode_entities(&raw).into_owned();
        element.attributes.insert(key, value);
    }
    Ok(element)
}

/// The node list new content should be appended to.
fn current<'a>(stack: &'a mut [Element], root: &'a mut Vec<Node>) -> &'a mut Vec<Node> {
    match stack.last_mut() {
        Some(parent) => &mut parent.nodes,
        None => root,
    }
}

fn close_top(stack: &mut Vec<Element>, root: &mut Vec<Node>) {
    if let Some(element) = stack.pop() {
        current(stack, root).push(Node::Element(element));
    }
}

fn push_text(nodes: &mut Vec<Node>, text: String) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(&text);
    } else {
        nodes.push(Node::Text(text));
    }
}

fn elements(nodes: &[Node]) -> impl Iterator<Item = &Element> {
    nodes.iter().filter_map(|node| match node {
        Node::Element(element) => Some(element),
        Node::Text(_) => None,
    })
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(element) => collect_text(&element.nodes, out),
        }
    }
}

/// Lossy view used in debug logs.
pub(crate) fn preview(text: &str) -> Cow<'_, str> {
    const MAX: usize = 60;
    match text.char_indices().nth(MAX) {
        Some((idx, _)) => Cow::Owned(format!("{}...", &text[..idx])),
        None => Cow::Borrowed(text),
    }
}
