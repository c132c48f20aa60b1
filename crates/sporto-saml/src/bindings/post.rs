//! HTTP-POST binding (inbound responses only).

use base64::Engine;

use crate::error::{SamlError, SamlResult};

/// HTTP-POST binding encoder/decoder.
pub struct HttpPostBinding;

impl HttpPostBinding {
    /// Decodes a `SAMLResponse` form value into the raw response bytes.
    ///
    /// Line breaks and other whitespace inside the value are ignored.
    pub fn decode_response(saml_response: &str) -> SamlResult<Vec<u8>> {
        let compact: String = saml_response.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.is_empty() {
            return Err(SamlError::MalformedResponse("SAMLResponse is empty".to_string()));
        }
        Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
    }

    /// Encodes a response document as a `SAMLResponse` form value.
    #[must_use]
    pub fn encode_response(xml: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(xml)
    }
}
