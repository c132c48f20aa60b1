//! Signature creation.

use base64::Engine;
use sporto_crypto::{digest, RsaSigningKey, SignatureAlgorithm};

use crate::bindings::HttpRedirectBinding;
use crate::error::{SamlError, SamlResult};
use crate::types::{
    canonicalization_algorithms, transforms, AuthnRequest, SamlResponse, SAML_NS, XMLDSIG_NS,
};
use crate::xml::{canonicalize, parse_fragment, Element, Node};

use super::SignatureScope;

/// Signs HTTP-Redirect binding queries with the SP key.
#[derive(Debug, Clone)]
pub struct RedirectSigner {
    key: RsaSigningKey,
    algorithm: SignatureAlgorithm,
}

impl RedirectSigner {
    /// Creates a signer using RSA-SHA1.
    #[must_use]
    pub const fn new(key: RsaSigningKey) -> Self {
        Self {
            key,
            algorithm: SignatureAlgorithm::RsaSha1,
        }
    }

    /// Returns the algorithm announced in `SigAlg`.
    #[must_use]
    pub const fn algorithm(&self) -> SignatureAlgorithm {
        self.algorithm
    }

    /// Signs the exact bytes of `signed_query`.
    pub fn sign_query(&self, signed_query: &str) -> SamlResult<Vec<u8>> {
        self.key
            .sign(self.algorithm, signed_query.as_bytes())
            .map_err(|e| SamlError::Configuration(format!("unusable private key: {e}")))
    }

    /// Builds the signed redirect URL for `request`:
    /// `<destination>?SAMLRequest=..&SigAlg=..&Signature=..`.
    pub fn redirect_url(&self, request: &AuthnRequest) -> SamlResult<String> {
        let query =
            HttpRedirectBinding::signed_request_query(&request.to_xml(), self.algorithm.uri())?;
        let signature = self.sign_query(&query)?;
        Ok(HttpRedirectBinding::encode_signed_request(
            &request.destination,
            &query,
            &signature,
        ))
    }
}

/// Produces enveloped XML signatures.
///
/// The signature layout is the one [`super::ResponseSignatureVerifier`]
/// checks: exclusive c14n, enveloped-signature transform, SHA-1 digest,
/// RSA-SHA1, a single `#ID` reference, inserted right after `saml:Issuer`.
#[derive(Debug, Clone)]
pub struct XmlSigner {
    key: RsaSigningKey,
    certificate: Option<String>,
}

impl XmlSigner {
    /// Creates a signer.
    #[must_use]
    pub const fn new(key: RsaSigningKey) -> Self {
        Self { key, certificate: None }
    }

    /// Embeds a base64 certificate in `ds:KeyInfo`.
    #[must_use]
    pub fn with_certificate(mut self, certificate: impl Into<String>) -> Self {
        let certificate: String = certificate.into();
        self.certificate = Some(certificate.split_whitespace().collect());
        self
    }

    /// Signs `element` in place. The element must carry an `ID`.
    pub fn sign_element(&self, element: &mut Element) -> SamlResult<()> {
        let id = element
            .attr("ID")
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                let name = element.qualified_name();
                SamlError::MalformedResponse(format!("{name} has no ID to sign"))
            })?
            .to_string();

        let algorithm = SignatureAlgorithm::RsaSha1;
        let engine = base64::engine::general_purpose::STANDARD;
        let digest_value =
            engine.encode(digest(algorithm.digest_algorithm(), canonicalize(element).as_bytes()));

        let signed_info_xml = format!(
            concat!(
                r#"<ds:SignedInfo xmlns:ds="{ds}">"#,
                r#"<ds:CanonicalizationMethod Algorithm="{c14n}"/>"#,
                r#"<ds:SignatureMethod Algorithm="{sig}"/>"#,
                r##"<ds:Reference URI="#{id}">"##,
                r#"<ds:Transforms><ds:Transform Algorithm="{enveloped}"/>"#,
                r#"<ds:Transform Algorithm="{c14n}"/></ds:Transforms>"#,
                r#"<ds:DigestMethod Algorithm="{digest}"/>"#,
                r#"<ds:DigestValue>{digest_value}</ds:DigestValue>"#,
                r#"</ds:Reference></ds:SignedInfo>"#,
            ),
            ds = XMLDSIG_NS,
            c14n = canonicalization_algorithms::EXCLUSIVE_C14N,
            sig = algorithm.uri(),
            id = quick_xml::escape::escape(id.as_str()),
            enveloped = transforms::ENVELOPED_SIGNATURE,
            digest = algorithm.digest_algorithm().uri(),
            digest_value = digest_value,
        );
        let signed_info = parse_fragment(&signed_info_xml, &element.namespaces)?;

        let signature_value = self
            .key
            .sign(algorithm, canonicalize(&signed_info).as_bytes())
            .map_err(|e| SamlError::Configuration(format!("unusable private key: {e}")))?;

        let key_info = self
            .certificate
            .as_deref()
            .map(|cert| {
                format!(
                    concat!(
                        "<ds:KeyInfo><ds:X509Data>",
                        "<ds:X509Certificate>{cert}</ds:X509Certificate>",
                        "</ds:X509Data></ds:KeyInfo>",
                    ),
                    cert = cert,
                )
            })
            .unwrap_or_default();

        let signature_xml = format!(
            concat!(
                r#"<ds:Signature xmlns:ds="{ds}">{signed_info_xml}"#,
                "<ds:SignatureValue>{}</ds:SignatureValue>{key_info}</ds:Signature>",
            ),
            engine.encode(signature_value),
            ds = XMLDSIG_NS,
            signed_info_xml = signed_info_xml,
            key_info = key_info,
        );
        let signature = parse_fragment(&signature_xml, &element.namespaces)?;

        let index = element.position_of(SAML_NS, "Issuer").map_or(0, |i| i + 1);
        element.insert_child(index, Node::Element(signature));

        tracing::debug!(id = %id, element = %element.qualified_name(), "signed element");
        Ok(())
    }

    /// Signs the Assertion or the Response of a serialized response.
    ///
    /// Returns the signed document, serialized in canonical form after an
    /// XML declaration.
    pub fn sign_response(&self, xml: &str, scope: SignatureScope) -> SamlResult<String> {
        let mut response = SamlResponse::from_xml(xml)?;

        let element = match scope {
            SignatureScope::Assertion => response
                .assertion_mut()
                .ok_or_else(|| {
                    SamlError::MalformedResponse("response has no Assertion".to_string())
                })?,
            SignatureScope::Response => response.root_mut(),
        };
        self.sign_element(element)?;

        Ok(format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}",
            canonicalize(response.root())
        ))
    }
}
