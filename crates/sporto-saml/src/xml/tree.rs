//! Owned XML tree.

use std::collections::BTreeMap;

/// An attribute with its namespace resolved.
///
/// Namespace declarations are not attributes; they live in
/// [`Element::namespaces`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Prefix as written, if any.
    pub prefix: Option<String>,
    /// Local name.
    pub local_name: String,
    /// Namespace URI. Unprefixed attributes have none.
    pub namespace: Option<String>,
    /// Value after entity expansion and whitespace normalization.
    pub value: String,
}

impl Attribute {
    /// Returns the name as written (`prefix:local` or `local`).
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.local_name)
    }
}

/// A child node of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Character data (text and CDATA sections, already unescaped).
    Text(String),
    /// Comment.
    Comment(String),
    /// Processing instruction.
    ProcessingInstruction {
        /// PI target.
        target: String,
        /// PI data, without the separating whitespace.
        data: String,
    },
}

/// An element with its namespace resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Prefix as written, if any.
    pub prefix: Option<String>,
    /// Local name.
    pub local_name: String,
    /// Namespace URI, if the element is in one.
    pub namespace: Option<String>,
    /// Attributes in document order.
    pub attributes: Vec<Attribute>,
    /// Namespaces in scope at this element, keyed by prefix (`""` is the
    /// default namespace).
    pub namespaces: BTreeMap<String, String>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Returns the name as written (`prefix:local` or `local`).
    #[must_use]
    pub fn qualified_name(&self) -> String {
        qualify(self.prefix.as_deref(), &self.local_name)
    }

    /// Returns true if this element has the given namespace and local name.
    #[must_use]
    pub fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.local_name == local_name && self.namespace.as_deref() == Some(namespace)
    }

    /// Returns the value of an unprefixed attribute.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.is_none() && a.local_name == name)
            .map(|a| a.value.as_str())
    }

    /// Returns the value of a namespaced attribute.
    #[must_use]
    pub fn attr_ns(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == Some(namespace) && a.local_name == name)
            .map(|a| a.value.as_str())
    }

    /// Iterates over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Iterates over child elements with the given name.
    pub fn children_named<'a>(
        &'a self,
        namespace: &'a str,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a Element> {
        self.elements().filter(move |e| e.is(namespace, local_name))
    }

    /// Returns the first child element with the given name.
    #[must_use]
    pub fn child(&self, namespace: &str, local_name: &str) -> Option<&Element> {
        self.elements().find(|e| e.is(namespace, local_name))
    }

    /// Returns the first child element with the given name, mutably.
    pub fn child_mut(&mut self, namespace: &str, local_name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(element) if element.is(namespace, local_name) => Some(element),
            _ => None,
        })
    }

    /// Returns the first element reached by following `path` from here.
    ///
    /// Each step is a `(namespace, local name)` pair matched against child
    /// elements; every branch is searched, in document order.
    #[must_use]
    pub fn find(&self, path: &[(&str, &str)]) -> Option<&Element> {
        self.find_all(path).into_iter().next()
    }

    /// Returns every element reached by following `path`, in document order.
    #[must_use]
    pub fn find_all(&self, path: &[(&str, &str)]) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_path(path, &mut found);
        found
    }

    fn collect_path<'a>(&'a self, path: &[(&str, &str)], out: &mut Vec<&'a Element>) {
        let Some((&(namespace, local_name), rest)) = path.split_first() else {
            return;
        };
        for child in self.elements().filter(|e| e.is(namespace, local_name)) {
            if rest.is_empty() {
                out.push(child);
            } else {
                child.collect_path(rest, out);
            }
        }
    }

    /// Returns the concatenated text of all descendant text nodes.
    #[must_use]
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for node in &self.children {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Element(element) => element.collect_text(out),
                _ => {}
            }
        }
    }

    /// Returns the child index of the first element with the given name.
    #[must_use]
    pub fn position_of(&self, namespace: &str, local_name: &str) -> Option<usize> {
        self.children.iter().position(|node| match node {
            Node::Element(element) => element.is(namespace, local_name),
            _ => false,
        })
    }

    /// Detaches the first child element with the given name.
    ///
    /// Surrounding text nodes are left in place.
    pub fn detach_child(&mut self, namespace: &str, local_name: &str) -> Option<Element> {
        let index = self.position_of(namespace, local_name)?;
        match self.children.remove(index) {
            Node::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Inserts a node at `index` (clamped to the number of children).
    pub fn insert_child(&mut self, index: usize, node: Node) {
        let index = index.min(self.children.len());
        self.children.insert(index, node);
    }
}

fn qualify(prefix: Option<&str>, local_name: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{local_name}"),
        None => local_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use crate::xml::Document;

    const NS: &str = "urn:test";

    fn doc() -> Document {
        Document::parse(
            r#"<t:a xmlns:t="urn:test" x="1"><t:b><t:c>one</t:c></t:b><t:b><t:c>two</t:c><t:c>three</t:c></t:b><!--note--><t:d/></t:a>"#,
        )
        .unwrap()
    }

    #[test]
    fn path_lookup_in_document_order() {
        let doc = doc();
        let root = doc.root();

        let found: Vec<String> = root
            .find_all(&[(NS, "b"), (NS, "c")])
            .into_iter()
            .map(|e| e.text())
            .collect();
        assert_eq!(found, vec!["one", "two", "three"]);
        assert_eq!(root.find(&[(NS, "b"), (NS, "c")]).map(|e| e.text()), Some("one".to_string()));
        assert!(root.find(&[(NS, "missing")]).is_none());
        assert!(root.find(&[]).is_none());
    }

    #[test]
    fn attributes_and_names() {
        let doc = doc();
        let root = doc.root();
        assert_eq!(root.qualified_name(), "t:a");
        assert_eq!(root.attr("x"), Some("1"));
        assert_eq!(root.attr("y"), None);
        assert!(root.is(NS, "a"));
        assert!(!root.is("urn:other", "a"));
    }

    #[test]
    fn text_concatenates_descendants() {
        let doc = doc();
        assert_eq!(doc.root().text(), "onetwothree");
    }

    #[test]
    fn detach_and_insert() {
        let mut doc = doc();
        let root = doc.root_mut();

        let d = root.detach_child(NS, "d").unwrap();
        assert_eq!(d.local_name, "d");
        assert!(root.child(NS, "d").is_none());

        root.insert_child(0, crate::xml::Node::Element(d));
        assert_eq!(root.position_of(NS, "d"), Some(0));
        assert_eq!(root.children_named(NS, "b").count(), 2);
    }
}
