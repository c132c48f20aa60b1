//! Signature verification.

use base64::Engine;
use sporto_crypto::{digest, DigestAlgorithm, RsaVerifyingKey, SignatureAlgorithm};

use crate::bindings::HttpRedirectBinding;
use crate::error::{SamlError, SamlResult};
use crate::types::{canonicalization_algorithms, SamlResponse, XMLDSIG_NS};
use crate::xml::{canonicalize_with_prefixes, Element};

use super::{inclusive_prefixes, SignatureScope};

/// Verifies signatures made by the trusted IdP.
///
/// Trust comes from configuration alone: the certificate is used as the
/// verification key, any `KeyInfo` in the message is ignored, and no chain
/// or validity checks are made.
#[derive(Debug, Clone)]
pub struct ResponseSignatureVerifier {
    certificate: RsaVerifyingKey,
}

impl ResponseSignatureVerifier {
    /// Creates a verifier for the given IdP key.
    #[must_use]
    pub const fn new(certificate: RsaVerifyingKey) -> Self {
        Self { certificate }
    }

    /// Creates a verifier from a base64 X.509 certificate.
    pub fn from_certificate_base64(certificate: &str) -> SamlResult<Self> {
        Ok(Self::new(RsaVerifyingKey::from_certificate_base64(certificate)?))
    }

    /// Verifies the enveloped signature on the element selected by `scope`.
    ///
    /// The `ds:Signature` element is detached from the signed element as
    /// part of verification. Every failure is reported as
    /// [`SamlError::SignatureVerification`]; the reason is only logged.
    pub fn verify(&self, response: &mut SamlResponse, scope: SignatureScope) -> SamlResult<()> {
        match self.check(response, scope) {
            Ok(()) => {
                tracing::debug!(%scope, "response signature verified");
                Ok(())
            }
            Err(reason) => {
                tracing::warn!(%scope, reason = %reason, "rejected response signature");
                Err(SamlError::SignatureVerification)
            }
        }
    }

    fn check(&self, response: &mut SamlResponse, scope: SignatureScope) -> Result<(), String> {
        let assertions = response.assertion_count();
        if assertions != 1 {
            return Err(format!("expected exactly one Assertion, found {assertions}"));
        }

        let element = match scope {
            SignatureScope::Assertion => response
                .assertion_mut()
                .ok_or_else(|| "no Assertion to verify".to_string())?,
            SignatureScope::Response => response.root_mut(),
        };

        let signature = element
            .detach_child(XMLDSIG_NS, "Signature")
            .ok_or_else(|| format!("no Signature on {}", element.qualified_name()))?;
        let signed = SignedInfo::read(&signature)?;

        match signed.reference_uri.as_deref() {
            None | Some("") => {}
            Some(uri) => {
                let id = element.attr("ID").unwrap_or_default();
                if uri.strip_prefix('#') != Some(id) || id.is_empty() {
                    return Err(format!("Reference URI {uri} does not point at the signed element"));
                }
            }
        }

        // Digest and signature are both evaluated before either result is used.
        let prefixes: Vec<&str> = signed.reference_prefixes.iter().map(String::as_str).collect();
        let canonical = canonicalize_with_prefixes(element, &prefixes);
        let digest_matches =
            digest(signed.digest_algorithm, canonical.as_bytes()) == signed.digest_value;

        let prefixes: Vec<&str> = signed.signed_info_prefixes.iter().map(String::as_str).collect();
        let canonical_signed_info = canonicalize_with_prefixes(signed.element, &prefixes);
        let signature_matches = self
            .certificate
            .verify(
                signed.signature_algorithm,
                canonical_signed_info.as_bytes(),
                &signed.signature_value,
            )
            .unwrap_or(false);

        if !digest_matches {
            return Err("digest mismatch".to_string());
        }
        if !signature_matches {
            return Err("signature mismatch".to_string());
        }
        Ok(())
    }

    /// Verifies an HTTP-Redirect query signature.
    ///
    /// `signed_query` is the exact wire text `SAMLRequest=..&SigAlg=..`;
    /// `signature` is the base64 `Signature` parameter, URL-decoded.
    pub fn verify_redirect_query(
        &self,
        signed_query: &str,
        sig_alg: &str,
        signature: &str,
    ) -> SamlResult<()> {
        let result = SignatureAlgorithm::from_uri(sig_alg)
            .ok_or_else(|| format!("unsupported SigAlg {sig_alg}"))
            .and_then(|algorithm| {
                let signature = decode_base64(signature)?;
                match self.certificate.verify(algorithm, signed_query.as_bytes(), &signature) {
                    Ok(true) => Ok(()),
                    Ok(false) => Err("signature mismatch".to_string()),
                    Err(e) => Err(e.to_string()),
                }
            });

        result.map_err(|reason| {
            tracing::warn!(reason = %reason, "rejected redirect signature");
            SamlError::SignatureVerification
        })
    }

    /// Verifies the signature on a complete redirect URL.
    pub fn verify_redirect_url(&self, url: &str) -> SamlResult<()> {
        let signed_query = HttpRedirectBinding::extract_signed_query(url)?;
        let message = HttpRedirectBinding::decode_url(url)?;

        let (Some(sig_alg), Some(signature)) = (message.sig_alg, message.signature) else {
            tracing::warn!("redirect URL carries no signature");
            return Err(SamlError::SignatureVerification);
        };
        self.verify_redirect_query(&signed_query, &sig_alg, &signature)
    }
}

/// What a `ds:Signature` declares about itself.
struct SignedInfo<'a> {
    element: &'a Element,
    signature_algorithm: SignatureAlgorithm,
    digest_algorithm: DigestAlgorithm,
    reference_uri: Option<String>,
    reference_prefixes: Vec<String>,
    signed_info_prefixes: Vec<String>,
    digest_value: Vec<u8>,
    signature_value: Vec<u8>,
}

impl<'a> SignedInfo<'a> {
    fn read(signature: &'a Element) -> Result<Self, String> {
        let element = signature
            .child(XMLDSIG_NS, "SignedInfo")
            .ok_or("no SignedInfo")?;

        let c14n_method = element
            .child(XMLDSIG_NS, "CanonicalizationMethod")
            .ok_or("no CanonicalizationMethod")?;
        let c14n_uri = c14n_method.attr("Algorithm").unwrap_or_default();
        if c14n_uri != canonicalization_algorithms::EXCLUSIVE_C14N {
            return Err(format!("unsupported CanonicalizationMethod {c14n_uri}"));
        }

        let sig_uri = element
            .child(XMLDSIG_NS, "SignatureMethod")
            .and_then(|m| m.attr("Algorithm"))
            .unwrap_or_default();
        let signature_algorithm = SignatureAlgorithm::from_uri(sig_uri)
            .ok_or_else(|| format!("unsupported SignatureMethod {sig_uri}"))?;

        let mut references = element.children_named(XMLDSIG_NS, "Reference");
        let reference = references.next().ok_or("no Reference")?;
        if references.next().is_some() {
            return Err("more than one Reference".to_string());
        }

        let digest_uri = reference
            .child(XMLDSIG_NS, "DigestMethod")
            .and_then(|m| m.attr("Algorithm"))
            .unwrap_or_default();
        let digest_algorithm = DigestAlgorithm::from_uri(digest_uri)
            .filter(|alg| *alg == signature_algorithm.digest_algorithm())
            .ok_or_else(|| format!("unsupported DigestMethod {digest_uri}"))?;

        let reference_prefixes = reference
            .find_all(&[(XMLDSIG_NS, "Transforms"), (XMLDSIG_NS, "Transform")])
            .into_iter()
            .find(|t| t.attr("Algorithm") == Some(canonicalization_algorithms::EXCLUSIVE_C14N))
            .map(inclusive_prefixes)
            .unwrap_or_default();

        let digest_value = reference
            .child(XMLDSIG_NS, "DigestValue")
            .ok_or("no DigestValue")?
            .text();
        let signature_value = signature
            .child(XMLDSIG_NS, "SignatureValue")
            .ok_or("no SignatureValue")?
            .text();

        Ok(Self {
            element,
            signature_algorithm,
            digest_algorithm,
            reference_uri: reference.attr("URI").map(String::from),
            reference_prefixes,
            signed_info_prefixes: inclusive_prefixes(c14n_method),
            digest_value: decode_base64(&digest_value)?,
            signature_value: decode_base64(&signature_value)?,
        })
    }
}

fn decode_base64(value: &str) -> Result<Vec<u8>, String> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(compact)
        .map_err(|e| format!("invalid base64: {e}"))
}
