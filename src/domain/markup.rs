//! Parsed markup fragments (notes and annotation blocks).

use std::fmt;

use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::{Serialize, Serializer};

use crate::domain::error::{DomainError, DomainResult};

/// Namespace every notes paragraph is declared in.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

pub const NOTES_OPEN: &str = "<notes><p xmlns=\"http://www.w3.org/1999/xhtml\">";
pub const NOTES_CLOSE: &str = "</p></notes>";

/// Wrap already sanitized text in the notes envelope.
pub fn notes_envelope(body: &str) -> String {
    let mut notes = String::with_capacity(NOTES_OPEN.len() + body.len() + NOTES_CLOSE.len());
    notes.push_str(NOTES_OPEN);
    notes.push_str(body);
    notes.push_str(NOTES_CLOSE);
    notes
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Element(MarkupElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl MarkupElement {
    fn from_start(start: &BytesStart<'_>) -> DomainResult<Self> {
        let name = std::str::from_utf8(start.name().as_ref())
            .map_err(malformed)?
            .to_string();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(malformed)?;
            let key = std::str::from_utf8(attribute.key.as_ref())
                .map_err(malformed)?
                .to_string();
            let value = attribute.unescape_value().map_err(malformed)?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
        })
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&MarkupElement> {
        self.children.iter().find_map(|node| match node {
            MarkupNode::Element(element) if element.name == name => Some(element),
            _ => None,
        })
    }

    pub fn text_content(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                MarkupNode::Text(text) => out.push_str(text),
                MarkupNode::Element(element) => element.collect_text(out),
            }
        }
    }

    fn write_xml(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attributes {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value.as_str()));
            out.push('"');
        }
        out.push('>');
        for node in &self.children {
            match node {
                MarkupNode::Text(text) => out.push_str(&escape(text.as_str())),
                MarkupNode::Element(element) => element.write_xml(out),
            }
        }
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }
}

/// A well-formed markup fragment with a single root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupFragment {
    root: MarkupElement,
}

impl MarkupFragment {
    /// Parse `source`, rejecting anything that is not one well-formed element.
    pub fn parse(source: &str) -> DomainResult<Self> {
        let mut reader = Reader::from_str(source);
        let mut stack: Vec<MarkupElement> = Vec::new();
        let mut root: Option<MarkupElement> = None;

        loop {
            match reader.read_event().map_err(malformed)? {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(malformed_reason("more than one root element"));
                    }
                    stack.push(MarkupElement::from_start(&start)?);
                }
                Event::Empty(start) => {
                    let element = MarkupElement::from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed_reason("closing tag without opening tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let content = text.unescape().map_err(malformed)?;
                    push_text(&mut stack, &content)?;
                }
                Event::CData(cdata) => {
                    let content = String::from_utf8_lossy(&cdata).into_owned();
                    push_text(&mut stack, &content)?;
                }
                Event::DocType(_) => return Err(malformed_reason("doctype inside fragment")),
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(malformed_reason(&format!("unclosed element <{}>", open.name)));
        }
        root.map(|root| Self { root })
            .ok_or_else(|| malformed_reason("no root element"))
    }

    pub fn root(&self) -> &MarkupElement {
        &self.root
    }

    pub fn text_content(&self) -> String {
        self.root.text_content()
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        self.root.write_xml(&mut out);
        out
    }
}

impl fmt::Display for MarkupFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

impl Serialize for MarkupFragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_xml())
    }
}

fn attach(
    stack: &mut [MarkupElement],
    root: &mut Option<MarkupElement>,
    element: MarkupElement,
) -> DomainResult<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(MarkupNode::Element(element));
    } else if root.is_some() {
        return Err(malformed_reason("more than one root element"));
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn push_text(stack: &mut [MarkupElement], text: &str) -> DomainResult<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(MarkupNode::Text(text.to_string()));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(malformed_reason("text outside the root element")),
    }
}

fn malformed(e: impl fmt::Display) -> DomainError {
    DomainError::MalformedMarkup {
        reason: e.to_string(),
    }
}

fn malformed_reason(reason: &str) -> DomainError {
    DomainError::MalformedMarkup {
        reason: reason.to_string(),
    }
}
