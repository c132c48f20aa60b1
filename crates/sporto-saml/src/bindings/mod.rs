//! SAML bindings.
//!
//! - **HTTP-Redirect** - outgoing `AuthnRequest`s are deflated,
//!   base64-encoded and URL-encoded into a signed query string
//! - **HTTP-POST** - inbound responses arrive base64-encoded in the
//!   `SAMLResponse` form field

mod post;
mod redirect;

pub use post::*;
pub use redirect::*;

/// SAML message type for binding operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamlMessageType {
    /// AuthnRequest message.
    Request,
    /// Response message.
    Response,
}

impl SamlMessageType {
    /// Returns the form / query parameter name for this message type.
    #[must_use]
    pub const fn form_param(&self) -> &'static str {
        match self {
            Self::Request => "SAMLRequest",
            Self::Response => "SAMLResponse",
        }
    }
}

/// Decoded binding message.
#[derive(Debug, Clone)]
pub struct DecodedMessage {
    /// The decoded XML message.
    pub xml: String,
    /// The message type.
    pub message_type: SamlMessageType,
    /// The RelayState, if present.
    pub relay_state: Option<String>,
    /// The base64 signature (redirect binding only).
    pub signature: Option<String>,
    /// The signature algorithm URI (redirect binding only).
    pub sig_alg: Option<String>,
}
