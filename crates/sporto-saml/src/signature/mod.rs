//! XML Signature support.
//!
//! Only RSA-SHA1 with SHA-1 digests and exclusive canonicalization is
//! accepted, in both directions:
//!
//! - [`RedirectSigner`] signs the HTTP-Redirect query of outgoing requests
//! - [`ResponseSignatureVerifier`] checks the enveloped signature of an
//!   inbound response (on the Assertion by default, or on the Response)
//! - [`XmlSigner`] produces enveloped signatures the verifier accepts, for
//!   tooling that stands in for an IdP

mod signer;
mod validator;

pub use signer::*;
pub use validator::*;

pub use sporto_core::SignatureScope;

use crate::types::canonicalization_algorithms;
use crate::xml::Element;

/// Namespace of `ec:InclusiveNamespaces`.
pub const EXC_C14N_NS: &str = canonicalization_algorithms::EXCLUSIVE_C14N;

/// Reads the `InclusiveNamespaces` prefix list declared under `parent`
/// (a `CanonicalizationMethod` or `Transform` element).
fn inclusive_prefixes(parent: &Element) -> Vec<String> {
    parent
        .child(EXC_C14N_NS, "InclusiveNamespaces")
        .and_then(|ns| ns.attr("PrefixList"))
        .map(|list| list.split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}
