//! Random values and request identifiers.

use rand::Rng;

use crate::hash::sha1_hex;

/// Generates `len` random bytes from the thread-local CSPRNG.
#[must_use]
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut rng = rand::rng();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes[..]);
    bytes
}

/// Generates a SAML request identifier.
///
/// The seed is a process-unique UUID plus 16 random bytes, hashed to 40 hex
/// characters and prefixed with `_` because an XML ID must not start with a
/// digit.
#[must_use]
pub fn generate_request_id() -> String {
    let mut seed = uuid::Uuid::new_v4().as_bytes().to_vec();
    seed.extend_from_slice(&random_bytes(16));
    format!("_{}", sha1_hex(&seed))
}
