//! Building the tree from `quick-xml` events.

use std::collections::BTreeMap;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use super::tree::{Attribute, Element, Node};
use super::{XmlError, XML_NAMESPACE};

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parses a document.
    ///
    /// Line endings are normalized to `\n`, attribute whitespace is
    /// normalized, entity and character references are expanded. Document
    /// type declarations are rejected outright, so no entity definitions
    /// are ever processed.
    pub fn parse(input: &str) -> Result<Self, XmlError> {
        parse_element(input, &BTreeMap::new()).map(|root| Self { root })
    }

    /// Returns the root element.
    #[must_use]
    pub const fn root(&self) -> &Element {
        &self.root
    }

    /// Returns the root element, mutably.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Consumes the document, returning its root element.
    #[must_use]
    pub fn into_root(self) -> Element {
        self.root
    }
}

/// Parses a single element with `scope` as the namespaces inherited from
/// the element it will be inserted into.
pub fn parse_fragment(input: &str, scope: &BTreeMap<String, String>) -> Result<Element, XmlError> {
    parse_element(input, scope)
}

fn parse_element(input: &str, scope: &BTreeMap<String, String>) -> Result<Element, XmlError> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut reader = Reader::from_str(input);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.is_empty() && root.is_some() {
                    return Err(XmlError::RootElement);
                }
                let parent_scope = stack.last().map_or(scope, |parent| &parent.namespaces);
                let element = open_element(&start, parent_scope)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                let parent_scope = stack.last().map_or(scope, |parent| &parent.namespaces);
                let element = open_element(&start, parent_scope)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Syntax("unexpected end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let raw = utf8(&text)?;
                let value = unescape(&normalize_newlines(raw))?.into_owned();
                push_text(&mut stack, value)?;
            }
            Event::CData(cdata) => {
                let value = normalize_newlines(utf8(&cdata)?);
                push_text(&mut stack, value)?;
            }
            Event::Comment(comment) => {
                if let Some(parent) = stack.last_mut() {
                    let value = normalize_newlines(utf8(&comment)?);
                    parent.children.push(Node::Comment(value));
                }
            }
            Event::PI(pi) => {
                if let Some(parent) = stack.last_mut() {
                    let raw = normalize_newlines(utf8(&pi)?);
                    let (target, data) = match raw.split_once(is_xml_whitespace) {
                        Some((target, data)) => (
                            target.to_string(),
                            data.trim_start_matches(is_xml_whitespace).to_string(),
                        ),
                        None => (raw.clone(), String::new()),
                    };
                    parent.children.push(Node::ProcessingInstruction { target, data });
                }
            }
            Event::DocType(_) => return Err(XmlError::DtdNotAllowed),
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(XmlError::Syntax("unclosed element at end of input".to_string()));
    }
    root.ok_or(XmlError::RootElement)
}

fn open_element(
    start: &BytesStart<'_>,
    parent_scope: &BTreeMap<String, String>,
) -> Result<Element, XmlError> {
    let mut namespaces = parent_scope.clone();
    let mut raw_attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr?;
        let key = utf8(attr.key.as_ref())?;
        let value = attribute_value(utf8(&attr.value)?)?;

        if key == "xmlns" {
            namespaces.insert(String::new(), value);
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            namespaces.insert(prefix.to_string(), value);
        } else {
            raw_attributes.push((key.to_string(), value));
        }
    }

    let qname = start.name();
    let (prefix, local_name) = split_qname(utf8(qname.as_ref())?);
    let namespace = match prefix {
        Some(prefix) => Some(resolve_prefix(&namespaces, prefix)?),
        None => namespaces.get("").filter(|uri| !uri.is_empty()).cloned(),
    };

    let attributes = raw_attributes
        .into_iter()
        .map(|(key, value)| {
            let (prefix, local_name) = split_qname(&key);
            let namespace = prefix
                .map(|prefix| resolve_prefix(&namespaces, prefix))
                .transpose()?;
            Ok(Attribute {
                prefix: prefix.map(String::from),
                local_name: local_name.to_string(),
                namespace,
                value,
            })
        })
        .collect::<Result<Vec<_>, XmlError>>()?;

    Ok(Element {
        prefix: prefix.map(String::from),
        local_name: local_name.to_string(),
        namespace,
        attributes,
        namespaces,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
    } else if root.is_some() {
        return Err(XmlError::RootElement);
    } else {
        *root = Some(element);
    }
    Ok(())
}

fn push_text(stack: &mut [Element], value: String) -> Result<(), XmlError> {
    if value.is_empty() {
        return Ok(());
    }
    let Some(parent) = stack.last_mut() else {
        return if value.chars().all(is_xml_whitespace) {
            Ok(())
        } else {
            Err(XmlError::TextOutsideRoot)
        };
    };
    // CDATA next to ordinary text is one text node.
    if let Some(Node::Text(previous)) = parent.children.last_mut() {
        previous.push_str(&value);
    } else {
        parent.children.push(Node::Text(value));
    }
    Ok(())
}

fn resolve_prefix(namespaces: &BTreeMap<String, String>, prefix: &str) -> Result<String, XmlError> {
    if prefix == "xml" {
        return Ok(XML_NAMESPACE.to_string());
    }
    namespaces
        .get(prefix)
        .filter(|uri| !uri.is_empty())
        .cloned()
        .ok_or_else(|| XmlError::UnboundPrefix(prefix.to_string()))
}

fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local_name)) => (Some(prefix), local_name),
        None => (None, name),
    }
}

fn attribute_value(raw: &str) -> Result<String, XmlError> {
    let normalized = raw.replace("\r\n", "\n").replace(is_xml_whitespace, " ");
    Ok(unescape(&normalized)?.into_owned())
}

fn normalize_newlines(raw: &str) -> String {
    raw.replace("\r\n", "\n").replace('\r', "\n")
}

fn utf8(bytes: &[u8]) -> Result<&str, XmlError> {
    std::str::from_utf8(bytes).map_err(|e| XmlError::Syntax(e.to_string()))
}

const fn is_xml_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}
