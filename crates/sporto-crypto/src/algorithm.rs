//! Algorithm identifiers.
//!
//! Only the RSA-SHA1 family is implemented. The URIs are the XML-DSig
//! identifiers used both in `SigAlg` query parameters and in
//! `<ds:SignatureMethod>` / `<ds:DigestMethod>` elements.

/// XML-DSig RSA-SHA1 signature method URI.
pub const RSA_SHA1_URI: &str = "http://www.w3.org/2000/09/xmldsig#rsa-sha1";

/// XML-DSig SHA-1 digest method URI.
pub const SHA1_URI: &str = "http://www.w3.org/2000/09/xmldsig#sha1";

/// Signature algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SignatureAlgorithm {
    /// RSA PKCS#1 v1.5 with SHA-1.
    #[default]
    RsaSha1,
}

impl SignatureAlgorithm {
    /// Returns the XML-DSig URI for this algorithm.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::RsaSha1 => RSA_SHA1_URI,
        }
    }

    /// Returns the digest algorithm paired with this signature algorithm.
    #[must_use]
    pub const fn digest_algorithm(self) -> DigestAlgorithm {
        match self {
            Self::RsaSha1 => DigestAlgorithm::Sha1,
        }
    }

    /// Parses an algorithm from its XML-DSig URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            RSA_SHA1_URI => Some(Self::RsaSha1),
            _ => None,
        }
    }
}

/// Digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigestAlgorithm {
    /// SHA-1.
    #[default]
    Sha1,
}

impl DigestAlgorithm {
    /// Returns the XML-DSig URI for this digest.
    #[must_use]
    pub const fn uri(self) -> &'static str {
        match self {
            Self::Sha1 => SHA1_URI,
        }
    }

    /// Returns the output length in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha1 => 20,
        }
    }

    /// Parses a digest algorithm from its XML-DSig URI.
    #[must_use]
    pub fn from_uri(uri: &str) -> Option<Self> {
        match uri {
            SHA1_URI => Some(Self::Sha1),
            _ => None,
        }
    }
}
