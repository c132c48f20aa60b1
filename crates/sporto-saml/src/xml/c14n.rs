//! Exclusive XML Canonicalization 1.0, without comments.
//!
//! Namespace declarations are emitted only where a prefix is visibly
//! utilized (by the element itself or one of its attributes) and not
//! already in effect in the canonical output of an ancestor. Declarations
//! are sorted by prefix with the default namespace first; attributes by
//! namespace URI, then local name. Empty elements are written as start/end
//! tag pairs.

use std::collections::BTreeMap;

use super::tree::{Element, Node};

/// Canonicalizes `element` and its subtree.
#[must_use]
pub fn canonicalize(element: &Element) -> String {
    canonicalize_with_prefixes(element, &[])
}

/// Canonicalizes with an `InclusiveNamespaces` prefix list.
///
/// Listed prefixes (`#default` for the default namespace) are treated as
/// visibly utilized wherever they are in scope.
#[must_use]
pub fn canonicalize_with_prefixes(element: &Element, inclusive_prefixes: &[&str]) -> String {
    let mut out = String::new();
    write_element(element, &BTreeMap::new(), inclusive_prefixes, &mut out);
    out
}

fn write_element(
    element: &Element,
    rendered: &BTreeMap<String, String>,
    inclusive_prefixes: &[&str],
    out: &mut String,
) {
    let mut in_effect = rendered.clone();
    let mut declarations: BTreeMap<&str, &str> = BTreeMap::new();

    let mut utilized: Vec<(&str, &str)> = vec![(
        element.prefix.as_deref().unwrap_or(""),
        element.namespace.as_deref().unwrap_or(""),
    )];
    for attr in &element.attributes {
        if let (Some(prefix), Some(namespace)) =
            (attr.prefix.as_deref(), attr.namespace.as_deref())
        {
            utilized.push((prefix, namespace));
        }
    }
    for &prefix in inclusive_prefixes {
        let prefix = if prefix == "#default" { "" } else { prefix };
        if let Some(namespace) = element.namespaces.get(prefix) {
            utilized.push((prefix, namespace));
        }
    }

    for (prefix, namespace) in utilized {
        if prefix == "xml" {
            continue;
        }
        let needed = in_effect
            .get(prefix)
            .map_or(!namespace.is_empty(), |current| current != namespace);
        if needed {
            declarations.insert(prefix, namespace);
            in_effect.insert(prefix.to_string(), namespace.to_string());
        }
    }

    let name = element.qualified_name();
    out.push('<');
    out.push_str(&name);

    for (prefix, namespace) in declarations {
        if prefix.is_empty() {
            out.push_str(" xmlns=\"");
        } else {
            out.push_str(" xmlns:");
            out.push_str(prefix);
            out.push_str("=\"");
        }
        escape_attribute(namespace, out);
        out.push('"');
    }

    let mut attributes: Vec<_> = element.attributes.iter().collect();
    attributes.sort_by(|a, b| {
        let a_key = (a.namespace.as_deref().unwrap_or(""), a.local_name.as_str());
        let b_key = (b.namespace.as_deref().unwrap_or(""), b.local_name.as_str());
        a_key.cmp(&b_key)
    });
    for attr in attributes {
        out.push(' ');
        out.push_str(&attr.qualified_name());
        out.push_str("=\"");
        escape_attribute(&attr.value, out);
        out.push('"');
    }
    out.push('>');

    for child in &element.children {
        match child {
            Node::Element(child) => write_element(child, &in_effect, inclusive_prefixes, out),
            Node::Text(text) => escape_text(text, out),
            Node::ProcessingInstruction { target, data } => {
                out.push_str("<?");
                out.push_str(target);
                if !data.is_empty() {
                    out.push(' ');
                    out.push_str(data);
                }
                out.push_str("?>");
            }
            Node::Comment(_) => {}
        }
    }

    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}
