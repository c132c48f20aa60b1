//! Signature operation errors.

use thiserror::Error;

/// Error type for signature operations.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// Signing failed.
    #[error("signing failed: {0}")]
    Signing(String),

    /// The signature bytes are not a well-formed RSA signature.
    #[error("malformed signature: {0}")]
    Malformed(String),

    /// Verification failed.
    #[error("signature verification failed")]
    Verification,
}
