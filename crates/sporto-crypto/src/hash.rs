//! Digest functions.

use sha1::{Digest, Sha1};

use crate::algorithm::DigestAlgorithm;

/// Computes a digest of the input data.
#[must_use]
pub fn digest(algorithm: DigestAlgorithm, data: &[u8]) -> Vec<u8> {
    match algorithm {
        DigestAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
    }
}

/// Computes a SHA-1 digest of the input data.
#[must_use]
pub fn sha1(data: &[u8]) -> Vec<u8> {
    digest(DigestAlgorithm::Sha1, data)
}

/// Computes a SHA-1 digest and returns it as lowercase hex.
#[must_use]
pub fn sha1_hex(data: &[u8]) -> String {
    hex::encode(sha1(data))
}
