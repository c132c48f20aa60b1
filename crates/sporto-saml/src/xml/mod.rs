//! Typed XML tree and Exclusive XML Canonicalization.
//!
//! SAML processing here needs a handful of fixed paths into a response, a
//! way to detach and insert `ds:Signature` elements, and byte-exact
//! canonical output for digesting. A small owned tree built from
//! `quick-xml` events covers all three.

mod c14n;
mod parser;
mod tree;

pub use c14n::{canonicalize, canonicalize_with_prefixes};
pub use parser::{parse_fragment, Document};
pub use tree::{Attribute, Element, Node};

use thiserror::Error;

/// Namespace bound to the `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Errors raised while parsing XML.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The underlying reader rejected the input.
    #[error("XML parsing error: {0}")]
    Syntax(String),

    /// A document type declaration was present.
    #[error("DTDs are not allowed")]
    DtdNotAllowed,

    /// A prefix was used without a namespace declaration in scope.
    #[error("unbound namespace prefix: {0}")]
    UnboundPrefix(String),

    /// The document has no root element, or more than one.
    #[error("document must have exactly one root element")]
    RootElement,

    /// Non-whitespace text outside the root element.
    #[error("text content outside the root element")]
    TextOutsideRoot,
}

impl From<quick_xml::Error> for XmlError {
    fn from(err: quick_xml::Error) -> Self {
        Self::Syntax(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for XmlError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Self::Syntax(err.to_string())
    }
}

impl From<quick_xml::escape::EscapeError> for XmlError {
    fn from(err: quick_xml::escape::EscapeError) -> Self {
        Self::Syntax(err.to_string())
    }
}
