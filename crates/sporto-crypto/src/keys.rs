//! Key material decoding.
//!
//! Configuration carries the SP private key and the IdP certificate as raw
//! base64 DER (PEM armour optional). The private key may be PKCS#1
//! (`RSA PRIVATE KEY`) or PKCS#8; the certificate is X.509.

use std::fmt;

use base64::Engine;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha1::Sha1;
use thiserror::Error;

use crate::algorithm::SignatureAlgorithm;
use crate::signature::SignatureError;

/// Error type for key decoding.
#[derive(Debug, Error)]
pub enum KeyError {
    /// The key material is not valid base64.
    #[error("invalid base64 key material: {0}")]
    Encoding(String),

    /// The private key could not be parsed.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The certificate could not be parsed.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// The certificate does not carry a usable RSA public key.
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}

/// Decodes base64 key material, tolerating PEM armour and line breaks.
pub fn decode_key_material(input: &str) -> Result<Vec<u8>, KeyError> {
    let body: String = input
        .lines()
        .filter(|line| !line.trim_start().starts_with("-----"))
        .flat_map(str::chars)
        .filter(|c| !c.is_whitespace())
        .collect();

    if body.is_empty() {
        return Err(KeyError::Encoding("key material is empty".to_string()));
    }

    base64::engine::general_purpose::STANDARD
        .decode(body)
        .map_err(|e| KeyError::Encoding(e.to_string()))
}

/// RSA private key used to sign outgoing requests.
#[derive(Clone)]
pub struct RsaSigningKey {
    signer: SigningKey<Sha1>,
    public: RsaPublicKey,
}

impl RsaSigningKey {
    /// Parses a DER private key (PKCS#1 first, then PKCS#8).
    pub fn from_der(der: &[u8]) -> Result<Self, KeyError> {
        let key = RsaPrivateKey::from_pkcs1_der(der)
            .or_else(|_| RsaPrivateKey::from_pkcs8_der(der))
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;

        key.validate()
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;

        let public = key.to_public_key();
        Ok(Self {
            signer: SigningKey::<Sha1>::new(key),
            public,
        })
    }

    /// Generates a fresh key pair of `bits` modulus size from the OS RNG.
    pub fn generate(bits: usize) -> Result<Self, KeyError> {
        let key = RsaPrivateKey::new(&mut rsa::rand_core::OsRng, bits)
            .map_err(|e| KeyError::InvalidPrivateKey(e.to_string()))?;
        let public = key.to_public_key();
        Ok(Self {
            signer: SigningKey::<Sha1>::new(key),
            public,
        })
    }

    /// Parses a base64 (optionally PEM-armoured) private key.
    pub fn from_base64(input: &str) -> Result<Self, KeyError> {
        Self::from_der(&decode_key_material(input)?)
    }

    /// Returns the modulus size in bits.
    #[must_use]
    pub fn key_size_bits(&self) -> usize {
        self.public.size() * 8
    }

    /// Returns the matching verification key.
    #[must_use]
    pub fn verifying_key(&self) -> RsaVerifyingKey {
        RsaVerifyingKey {
            verifier: VerifyingKey::<Sha1>::new(self.public.clone()),
            subject: None,
        }
    }

    /// Signs `data` with the given algorithm.
    ///
    /// PKCS#1 v1.5 is deterministic: the same key and input always produce
    /// the same signature.
    pub fn sign(
        &self,
        algorithm: SignatureAlgorithm,
        data: &[u8],
    ) -> Result<Vec<u8>, SignatureError> {
        match algorithm {
            SignatureAlgorithm::RsaSha1 => self
                .signer
                .try_sign(data)
                .map(|signature| signature.to_vec())
                .map_err(|e| SignatureError::Signing(e.to_string())),
        }
    }
}

impl fmt::Debug for RsaSigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaSigningKey")
            .field("bits", &self.key_size_bits())
            .finish_non_exhaustive()
    }
}

/// RSA public key used to verify signatures, usually taken from the IdP
/// certificate.
#[derive(Clone)]
pub struct RsaVerifyingKey {
    verifier: VerifyingKey<Sha1>,
    subject: Option<String>,
}

impl RsaVerifyingKey {
    /// Parses a DER `SubjectPublicKeyInfo`.
    pub fn from_spki_der(der: &[u8]) -> Result<Self, KeyError> {
        let public = RsaPublicKey::from_public_key_der(der)
            .map_err(|e| KeyError::InvalidPublicKey(e.to_string()))?;
        Ok(Self {
            verifier: VerifyingKey::<Sha1>::new(public),
            subject: None,
        })
    }

    /// Extracts the public key from a DER X.509 certificate.
    ///
    /// No chain or validity checks are made; trust in the certificate is
    /// established by whoever configured it.
    pub fn from_certificate_der(der: &[u8]) -> Result<Self, KeyError> {
        let (_, cert) = x509_parser::parse_x509_certificate(der)
            .map_err(|e| KeyError::InvalidCertificate(e.to_string()))?;

        let mut key = Self::from_spki_der(cert.public_key().raw)?;
        let subject = cert.subject().to_string();
        tracing::debug!(subject = %subject, "loaded verification certificate");
        key.subject = Some(subject);
        Ok(key)
    }

    /// Parses a base64 (optionally PEM-armoured) X.509 certificate.
    pub fn from_certificate_base64(input: &str) -> Result<Self, KeyError> {
        Self::from_certificate_der(&decode_key_material(input)?)
    }

    /// Returns the certificate subject, if the key came from a certificate.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Verifies `signature` over `data`.
    ///
    /// Returns `Ok(false)` for a well-formed signature that does not match.
    pub fn verify(
        &self,
        algorithm: SignatureAlgorithm,
        data: &[u8],
        signature: &[u8],
    ) -> Result<bool, SignatureError> {
        match algorithm {
            SignatureAlgorithm::RsaSha1 => {
                let signature = Signature::try_from(signature)
                    .map_err(|e| SignatureError::Malformed(e.to_string()))?;
                Ok(self.verifier.verify(data, &signature).is_ok())
            }
        }
    }
}

impl fmt::Debug for RsaVerifyingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RsaVerifyingKey")
            .field("subject", &self.subject)
            .finish_non_exhaustive()
    }
}
