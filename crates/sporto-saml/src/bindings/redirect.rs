//! HTTP-Redirect binding.

use std::io::{Read, Write};

use base64::Engine;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{SamlError, SamlResult};

use super::{DecodedMessage, SamlMessageType};

/// Upper bound on an inflated message.
const MAX_INFLATED_SIZE: u64 = 1024 * 1024;

/// HTTP-Redirect binding encoder/decoder.
pub struct HttpRedirectBinding;

impl HttpRedirectBinding {
    /// Builds the part of the query string that gets signed:
    /// `SAMLRequest=<enc>&SigAlg=<enc>`.
    ///
    /// The message is raw-deflated (no zlib or gzip framing), base64-encoded
    /// and URL-encoded.
    pub fn signed_request_query(xml: &str, sig_alg: &str) -> SamlResult<String> {
        let compressed = deflate_compress(xml.as_bytes())?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(compressed);

        Ok(format!(
            "{}={}&SigAlg={}",
            SamlMessageType::Request.form_param(),
            urlencoding::encode(&encoded),
            urlencoding::encode(sig_alg)
        ))
    }

    /// Appends the signed query and its `Signature` to `destination`.
    #[must_use]
    pub fn encode_signed_request(
        destination: &str,
        signed_query: &str,
        signature: &[u8],
    ) -> String {
        let signature = base64::engine::general_purpose::STANDARD.encode(signature);
        let separator = if destination.contains('?') { '&' } else { '?' };

        format!(
            "{destination}{separator}{signed_query}&Signature={}",
            urlencoding::encode(&signature)
        )
    }

    /// Decodes a message from already URL-decoded query parameter values.
    pub fn decode(
        saml_request: Option<&str>,
        saml_response: Option<&str>,
        relay_state: Option<&str>,
        signature: Option<&str>,
        sig_alg: Option<&str>,
    ) -> SamlResult<DecodedMessage> {
        let (encoded, message_type) = if let Some(req) = saml_request {
            (req, SamlMessageType::Request)
        } else if let Some(resp) = saml_response {
            (resp, SamlMessageType::Response)
        } else {
            return Err(SamlError::InvalidRequest(
                "No SAMLRequest or SAMLResponse parameter".to_string(),
            ));
        };

        let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
        let compressed = base64::engine::general_purpose::STANDARD
            .decode(compact)
            .map_err(|e| SamlError::InvalidRequest(format!("base64 decode error: {e}")))?;

        let xml_bytes = deflate_decompress(&compressed)?;
        let xml = String::from_utf8(xml_bytes)
            .map_err(|e| SamlError::InvalidRequest(format!("Invalid UTF-8 in message: {e}")))?;

        Ok(DecodedMessage {
            xml,
            message_type,
            relay_state: relay_state.map(String::from),
            signature: signature.map(String::from),
            sig_alg: sig_alg.map(String::from),
        })
    }

    /// Decodes a message from a full redirect URL.
    pub fn decode_url(url: &str) -> SamlResult<DecodedMessage> {
        let parsed = url::Url::parse(url)
            .map_err(|e| SamlError::InvalidRequest(format!("Invalid URL: {e}")))?;

        let mut saml_request = None;
        let mut saml_response = None;
        let mut relay_state = None;
        let mut signature = None;
        let mut sig_alg = None;

        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "SAMLRequest" => saml_request = Some(value.into_owned()),
                "SAMLResponse" => saml_response = Some(value.into_owned()),
                "RelayState" => relay_state = Some(value.into_owned()),
                "Signature" => signature = Some(value.into_owned()),
                "SigAlg" => sig_alg = Some(value.into_owned()),
                _ => {}
            }
        }

        Self::decode(
            saml_request.as_deref(),
            saml_response.as_deref(),
            relay_state.as_deref(),
            signature.as_deref(),
            sig_alg.as_deref(),
        )
    }

    /// Extracts the signed portion of a redirect URL's query string.
    ///
    /// Parameters are taken exactly as they appear on the wire (still
    /// URL-encoded) and reassembled in binding order: message, `RelayState`
    /// if present, `SigAlg`.
    pub fn extract_signed_query(url: &str) -> SamlResult<String> {
        let parsed = url::Url::parse(url)
            .map_err(|e| SamlError::InvalidRequest(format!("Invalid URL: {e}")))?;
        let query = parsed.query().unwrap_or_default();

        let raw_param = |name: &str| {
            query.split('&').find_map(|pair| {
                let (key, _) = pair.split_once('=')?;
                (key == name).then_some(pair)
            })
        };

        let message = raw_param("SAMLRequest")
            .or_else(|| raw_param("SAMLResponse"))
            .ok_or_else(|| SamlError::InvalidRequest("No SAML parameters found".to_string()))?;
        let sig_alg = raw_param("SigAlg")
            .ok_or_else(|| SamlError::InvalidRequest("No SigAlg parameter found".to_string()))?;

        let mut parts = vec![message];
        parts.extend(raw_param("RelayState"));
        parts.push(sig_alg);

        Ok(parts.join("&"))
    }
}

/// Compresses data using DEFLATE (raw, no zlib header).
fn deflate_compress(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| SamlError::Encoding(format!("Compression error: {e}")))?;
    encoder
        .finish()
        .map_err(|e| SamlError::Encoding(format!("Compression finish error: {e}")))
}

/// Decompresses raw DEFLATE data.
fn deflate_decompress(data: &[u8]) -> SamlResult<Vec<u8>> {
    let mut decompressed = Vec::new();
    DeflateDecoder::new(data)
        .take(MAX_INFLATED_SIZE + 1)
        .read_to_end(&mut decompressed)
        .map_err(|e| SamlError::InvalidRequest(format!("Decompression error: {e}")))?;

    if decompressed.len() as u64 > MAX_INFLATED_SIZE {
        return Err(SamlError::InvalidRequest("inflated message too large".to_string()));
    }
    Ok(decompressed)
}
