//! A small element tree over `quick-xml` events for FrameNet documents.
//!
//! Element and attribute names are kept exactly as written, prefix
//! included, so namespace declarations and attributes such as
//! `xsi:schemaLocation` survive a rewrite. Blank text is dropped on read
//! and documents are re-indented on write, with an XML declaration and
//! UTF-8 encoding.

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{LexiconError, Result};

pub const FN_NAMESPACE: &str = "http://framenet.icsi.berkeley.edu";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Qualified name as written in the source
    pub name: String,
    /// Attributes in document order, keys as written (`xmlns:xsi`, `xsi:schemaLocation`)
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// The element name without its prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }
}

/// A parsed file: the root element plus what precedes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// `standalone` of the XML declaration
    pub standalone: Option<String>,
    /// Processing instructions before the root, e.g. `xml-stylesheet`
    pub prolog: Vec<String>,
    pub root: Element,
}

impl Document {
    pub fn new(root: Element) -> Self {
        Self {
            standalone: None,
            prolog: Vec::new(),
            root,
        }
    }
}

fn local_name(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

fn parse_error(path: &Path, err: impl fmt::Display) -> LexiconError {
    LexiconError::Xml {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn write_error(path: &Path, err: impl fmt::Display) -> LexiconError {
    LexiconError::XmlWrite {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

pub fn read_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => {
            LexiconError::not_found("file", path.to_string_lossy().to_string())
        }
        _ => LexiconError::Io(e),
    })?;
    parse_document(&content, path)
}

/// Parses `content`; `path` is only used in error messages.
pub fn parse_document(content: &str, path: &Path) -> Result<Document> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut standalone = None;
    let mut prolog = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event().map_err(|e| parse_error(path, e))? {
            Event::Decl(decl) => {
                standalone = decl
                    .standalone()
                    .transpose()
                    .map_err(|e| parse_error(path, e))?
                    .map(|value| String::from_utf8_lossy(&value).into_owned());
            }
            Event::PI(pi) => {
                if stack.is_empty() && root.is_none() {
                    prolog.push(String::from_utf8_lossy(&pi).into_owned());
                }
            }
            Event::Start(start) => stack.push(element_from_start(&start, path)?),
            Event::Empty(start) => {
                let element = element_from_start(&start, path)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    attach(&mut stack, &mut root, element);
                }
            }
            Event::Text(text) => {
                if let Some(parent) = stack.last_mut() {
                    let text = text.unescape().map_err(|e| parse_error(path, e))?;
                    if !text.is_empty() {
                        parent.children.push(Node::Text(text.into_owned()));
                    }
                }
            }
            Event::CData(data) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Text(String::from_utf8_lossy(&data).into_owned()));
                }
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .children
                        .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(parse_error(path, "unexpected end of document"));
    }
    let root = root.ok_or_else(|| parse_error(path, "no root element"))?;
    Ok(Document {
        standalone,
        prolog,
        root,
    })
}

fn element_from_start(start: &BytesStart<'_>, path: &Path) -> Result<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| parse_error(path, e))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| parse_error(path, e))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Node::Element(element)),
        None => *root = Some(element),
    }
}

/// Serializes a document into memory, pretty-printed.
pub fn render_document(document: &Document, path: &Path) -> Result<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new(
            "1.0",
            Some("UTF-8"),
            document.standalone.as_deref(),
        )))
        .map_err(|e| write_error(path, e))?;
    for instruction in &document.prolog {
        writer
            .write_event(Event::PI(BytesPI::new(instruction.as_str())))
            .map_err(|e| write_error(path, e))?;
    }
    write_element(&mut writer, &document.root, path)?;

    let mut buffer = writer.into_inner();
    buffer.push(b'\n');
    Ok(buffer)
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element, path: &Path) -> Result<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| write_error(path, e));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| write_error(path, e))?;
    for node in &element.children {
        match node {
            Node::Element(child) => write_element(writer, child, path)?,
            Node::Text(text) => writer
                .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
                .map_err(|e| write_error(path, e))?,
            Node::Comment(comment) => writer
                .write_event(Event::Comment(BytesText::from_escaped(Cow::from(
                    comment.as_str(),
                ))))
                .map_err(|e| write_error(path, e))?,
        }
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| write_error(path, e))
}

/// Replaces `path` with `contents` through a sibling temp file and a rename.
pub fn write_bytes(path: &Path, contents: &[u8]) -> Result<()> {
    let tmp = temp_sibling(path);
    fs::write(&tmp, contents)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub fn write_document(path: &Path, document: &Document) -> Result<()> {
    let bytes = render_document(document, path)?;
    write_bytes(path, &bytes)
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

pub fn with_attrs<'a, I>(mut element: Element, attrs: I) -> Element
where
    I: IntoIterator<Item = (&'a str, String)>,
{
    for (key, value) in attrs {
        set_attr(&mut element, key, value);
    }
    element
}

pub fn attr<'a>(element: &'a Element, key: &str) -> Option<&'a str> {
    element
        .attributes
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Overwrites `key` in place, or appends it.
pub fn set_attr(element: &mut Element, key: &str, value: impl Into<String>) {
    let value = value.into();
    match element.attributes.iter_mut().find(|(k, _)| k == key) {
        Some((_, existing)) => *existing = value,
        None => element.attributes.push((key.to_string(), value)),
    }
}

pub fn remove_attr(element: &mut Element, key: &str) {
    element.attributes.retain(|(k, _)| k != key);
}

/// Child elements with the given local name, prefix ignored.
pub fn children<'a>(element: &'a Element, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
    element.children.iter().filter_map(move |node| match node {
        Node::Element(child) if child.local_name() == name => Some(child),
        _ => None,
    })
}

pub fn child<'a>(element: &'a Element, name: &str) -> Option<&'a Element> {
    element.children.iter().find_map(|node| match node {
        Node::Element(child) if child.local_name() == name => Some(child),
        _ => None,
    })
}

pub fn child_mut<'a>(element: &'a mut Element, name: &str) -> Option<&'a mut Element> {
    element.children.iter_mut().find_map(|node| match node {
        Node::Element(child) if child.local_name() == name => Some(child),
        _ => None,
    })
}

/// Follows `names` one child level at a time, e.g. `["span", "target"]`.
pub fn descendants<'a>(element: &'a Element, names: &[&'a str]) -> Vec<&'a Element> {
    let mut current = vec![element];
    for name in names {
        current = current
            .into_iter()
            .flat_map(|el| children(el, name))
            .collect();
    }
    current
}

/// Removes every child element for which `predicate` holds and returns how
/// many were removed.
pub fn remove_children<F>(element: &mut Element, predicate: F) -> usize
where
    F: Fn(&Element) -> bool,
{
    let before = element.children.len();
    element.children.retain(|node| match node {
        Node::Element(child) => !predicate(child),
        _ => true,
    });
    before - element.children.len()
}

pub fn append(element: &mut Element, child: Element) {
    element.children.push(Node::Element(child));
}

/// Concatenated text content of `element` (direct text children), trimmed.
pub fn text(element: &Element) -> String {
    let mut text = String::new();
    for node in &element.children {
        if let Node::Text(t) = node {
            text.push_str(t);
        }
    }
    text.trim().to_string()
}

pub fn set_text(element: &mut Element, text: &str) {
    element.children.retain(|node| !matches!(node, Node::Text(_)));
    if !text.is_empty() {
        element.children.insert(0, Node::Text(text.to_string()));
    }
}
