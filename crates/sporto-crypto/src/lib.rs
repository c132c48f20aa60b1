//! # sporto-crypto
//!
//! Cryptographic primitives for the sporto SAML service provider.
//!
//! The hub federation this crate serves signs with RSA PKCS#1 v1.5 over
//! SHA-1, both for redirect-binding requests and for XML-DSig on responses.
//! That is the only signature family supported here.
//!
//! - [`hash`] - SHA-1 digests
//! - [`keys`] - SP private key and IdP certificate decoding
//! - [`signature`] - sign / verify over raw bytes
//! - [`random`] - request identifier generation

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod algorithm;
pub mod hash;
pub mod keys;
pub mod random;
pub mod signature;

pub use algorithm::{DigestAlgorithm, SignatureAlgorithm};
pub use hash::{digest, sha1, sha1_hex};
pub use keys::{KeyError, RsaSigningKey, RsaVerifyingKey};
pub use random::{generate_request_id, random_bytes};
pub use signature::SignatureError;
