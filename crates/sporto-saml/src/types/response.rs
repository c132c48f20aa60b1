//! Inbound SAML Response.

use crate::error::{SamlError, SamlResult};
use crate::xml::{Document, Element};

use super::{status_codes, SAMLP_NS, SAML_NS};

/// A parsed `samlp:Response` together with the bytes it was parsed from.
#[derive(Debug, Clone)]
pub struct SamlResponse {
    document: Document,
    raw: Vec<u8>,
}

impl SamlResponse {
    /// Parses decoded response bytes.
    ///
    /// Fails with [`SamlError::MalformedResponse`] unless the bytes are
    /// UTF-8, well-formed, DTD-free XML rooted at `samlp:Response`.
    pub fn parse(raw: Vec<u8>) -> SamlResult<Self> {
        let xml = std::str::from_utf8(&raw)
            .map_err(|e| SamlError::MalformedResponse(format!("response is not UTF-8: {e}")))?;
        let document = Document::parse(xml)?;

        let root = document.root();
        if !root.is(SAMLP_NS, "Response") {
            return Err(SamlError::MalformedResponse(format!(
                "expected samlp:Response, found {}",
                root.qualified_name()
            )));
        }

        Ok(Self { document, raw })
    }

    /// Parses a response from XML text.
    pub fn from_xml(xml: &str) -> SamlResult<Self> {
        Self::parse(xml.as_bytes().to_vec())
    }

    /// Returns the `samlp:Response` element.
    #[must_use]
    pub const fn root(&self) -> &Element {
        self.document.root()
    }

    /// Returns the `samlp:Response` element, mutably.
    pub fn root_mut(&mut self) -> &mut Element {
        self.document.root_mut()
    }

    /// Returns the bytes the response was parsed from.
    #[must_use]
    pub fn raw(&self) -> &[u8] {
        &self.raw
    }

    /// Consumes the response, returning its original bytes.
    #[must_use]
    pub fn into_raw(self) -> Vec<u8> {
        self.raw
    }

    /// Response `ID`.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.root().attr("ID")
    }

    /// Response `InResponseTo`. Exposed for callers; never checked here.
    #[must_use]
    pub fn in_response_to(&self) -> Option<&str> {
        self.root().attr("InResponseTo")
    }

    /// Response `Destination`.
    #[must_use]
    pub fn destination(&self) -> Option<&str> {
        self.root().attr("Destination")
    }

    /// Response-level `saml:Issuer`.
    #[must_use]
    pub fn issuer(&self) -> Option<String> {
        self.root().child(SAML_NS, "Issuer").map(Element::text)
    }

    /// Top-level status code value.
    #[must_use]
    pub fn status_code(&self) -> Option<&str> {
        self.root()
            .find(&[(SAMLP_NS, "Status"), (SAMLP_NS, "StatusCode")])
            .and_then(|code| code.attr("Value"))
    }

    /// Returns true if the top-level status is `Success`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_code() == Some(status_codes::SUCCESS)
    }

    /// Number of `saml:Assertion` children of the response.
    #[must_use]
    pub fn assertion_count(&self) -> usize {
        self.root().children_named(SAML_NS, "Assertion").count()
    }

    /// The first `saml:Assertion` child of the response.
    #[must_use]
    pub fn assertion(&self) -> Option<&Element> {
        self.root().child(SAML_NS, "Assertion")
    }

    /// The first `saml:Assertion` child of the response, mutably.
    pub fn assertion_mut(&mut self) -> Option<&mut Element> {
        self.root_mut().child_mut(SAML_NS, "Assertion")
    }
}
