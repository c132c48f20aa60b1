//! SAML error types.
//!
//! The response pipeline fails in one of three ways that callers must be
//! able to tell apart: the deployment is misconfigured, the signature does
//! not hold, or the (authentic) response is not acceptable right now. Input
//! that cannot even be decoded is reported separately.

use thiserror::Error;

use crate::xml::XmlError;

/// Result type for SAML operations.
pub type SamlResult<T> = Result<T, SamlError>;

/// A single violated temporal or destination rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationIssue {
    /// The response names a destination other than our ACS URL.
    #[error("Destination: {destination} is not here; message not destined for us")]
    DestinationMismatch {
        /// The destination the response declared.
        destination: String,
    },

    /// `SubjectConfirmationData/@NotBefore` lies in the future.
    #[error("SubjectConfirmation not valid yet")]
    SubjectConfirmationNotYetValid,

    /// `SubjectConfirmationData/@NotOnOrAfter` has passed.
    #[error("SubjectConfirmation too old")]
    SubjectConfirmationExpired,

    /// `Conditions/@NotBefore` lies in the future.
    #[error("Assertion Conditions not yet valid")]
    ConditionsNotYetValid,

    /// `Conditions/@NotOnOrAfter` has passed.
    #[error("Assertion Conditions too old")]
    ConditionsExpired,

    /// `AuthnStatement/@SessionNotOnOrAfter` has passed.
    #[error("AuthnStatement Session too old")]
    SessionExpired,

    /// A validity bound is present but is not a timestamp.
    #[error("{attribute} is not a valid timestamp: {value}")]
    InvalidTimestamp {
        /// Element and attribute carrying the value.
        attribute: &'static str,
        /// The offending value.
        value: String,
    },
}

/// SAML protocol errors.
#[derive(Debug, Error)]
pub enum SamlError {
    /// Unusable private key or IdP certificate, or invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The response signature could not be verified.
    ///
    /// Missing signature, digest mismatch, signature mismatch and
    /// unsupported algorithms all end up here; the reason is logged, not
    /// returned.
    #[error("Error verifying incoming SAMLResponse")]
    SignatureVerification,

    /// One or more temporal or destination rules were violated.
    #[error("Problems detected with response. \nIssues: \n{}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),

    /// The response could not be decoded or parsed.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A request message or redirect query is malformed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A message could not be encoded or decoded for a binding.
    #[error("encoding error: {0}")]
    Encoding(String),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

impl SamlError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::MalformedResponse(_) | Self::InvalidRequest(_) => 400,
            Self::SignatureVerification => 401,
            Self::Validation(_) => 403,
            Self::Configuration(_) | Self::Encoding(_) => 500,
        }
    }

    /// Returns the validation issues, if this is a validation failure.
    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            Self::Validation(issues) => issues,
            _ => &[],
        }
    }
}

impl From<XmlError> for SamlError {
    fn from(err: XmlError) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}

impl From<base64::DecodeError> for SamlError {
    fn from(err: base64::DecodeError) -> Self {
        Self::MalformedResponse(format!("base64 decode error: {err}"))
    }
}

impl From<sporto_crypto::KeyError> for SamlError {
    fn from(err: sporto_crypto::KeyError) -> Self {
        Self::Configuration(err.to_string())
    }
}

impl From<sporto_core::Error> for SamlError {
    fn from(err: sporto_core::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
