//! Request pipeline tests.

use std::io::Read;

use base64::Engine;
use flate2::read::DeflateDecoder;
use sporto_saml::bindings::HttpRedirectBinding;
use sporto_saml::signature::{RedirectSigner, ResponseSignatureVerifier};
use sporto_saml::{AuthnInput, AuthnOutcome, AuthnRequest};
use sporto_crypto::RsaSigningKey;

use crate::common::{TestEnv, ACS, SP_CERT, SP_ENTITY_ID, SP_KEY, SSO};

/// Reverses the `SAMLRequest` parameter by hand: URL-decode, base64-decode,
/// raw inflate.
fn inflate_request(url: &str) -> anyhow::Result<String> {
    let query = url.split_once('?').map(|(_, q)| q).unwrap_or_default();
    let encoded = query
        .split('&')
        .find_map(|pair| pair.strip_prefix("SAMLRequest="))
        .ok_or_else(|| anyhow::anyhow!("no SAMLRequest in {url}"))?;

    let deflated = base64::engine::general_purpose::STANDARD
        .decode(urlencoding::decode(encoded)?.as_bytes())?;
    let mut xml = String::new();
    DeflateDecoder::new(&deflated[..]).read_to_string(&mut xml)?;
    Ok(xml)
}

#[test]
fn redirect_reverses_to_configured_request() -> anyhow::Result<()> {
    let env = TestEnv::new()?;

    for scoping in [vec![], vec!["https://idp.example.org".to_string()]] {
        let outcome = env.sp.authenticate(AuthnInput::GenerateRequest(scoping.clone()))?;
        let AuthnOutcome::Redirect(target) = outcome else {
            anyhow::bail!("expected a redirect");
        };

        assert!(target.url.starts_with(&format!("{SSO}?SAMLRequest=")));
        let xml = inflate_request(&target.url)?;
        let request = AuthnRequest::from_xml(&xml)?;

        assert_eq!(request.destination, SSO);
        assert_eq!(request.assertion_consumer_service_url, ACS);
        assert_eq!(request.issuer, SP_ENTITY_ID);
        assert_eq!(request.id, target.request_id);
        assert_eq!(request.scoping, scoping);
        assert!(xml.contains("urn:oasis:names:tc:SAML:2.0:bindings:HTTP-Redirect"));
    }

    Ok(())
}

#[test]
fn scoping_keeps_order_and_is_escaped() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let scoping = vec![
        "https://b.example.org".to_string(),
        "https://a.example.org/?x=1&y=\"2\"".to_string(),
    ];

    let target = env.sp.build_request(&scoping)?;
    let xml = inflate_request(&target.url)?;

    let b = xml.find("https://b.example.org").unwrap_or(usize::MAX);
    let a = xml.find("https://a.example.org").unwrap_or(0);
    assert!(b < a, "IDPEntry order not preserved:\n{xml}");
    assert!(xml.contains("x=1&amp;y=&quot;2&quot;"));
    assert_eq!(AuthnRequest::from_xml(&xml)?.scoping, scoping);

    Ok(())
}

#[test]
fn query_order_and_signature() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let target = env.sp.build_request(&[])?;

    let query = target.url.split_once('?').map(|(_, q)| q).unwrap_or_default();
    let names: Vec<&str> =
        query.split('&').filter_map(|p| p.split_once('=')).map(|(k, _)| k).collect();
    assert_eq!(names, ["SAMLRequest", "SigAlg", "Signature"]);
    assert!(query.contains("SigAlg=http%3A%2F%2Fwww.w3.org%2F2000%2F09%2Fxmldsig%23rsa-sha1"));

    ResponseSignatureVerifier::from_certificate_base64(SP_CERT)?.verify_redirect_url(&target.url)?;

    let decoded = HttpRedirectBinding::decode_url(&target.url)?;
    assert!(decoded.signature.is_some());
    assert_eq!(decoded.sig_alg.as_deref(), Some("http://www.w3.org/2000/09/xmldsig#rsa-sha1"));

    Ok(())
}

#[test]
fn resigning_the_same_request_is_identical() -> anyhow::Result<()> {
    let signer = RedirectSigner::new(RsaSigningKey::from_base64(SP_KEY)?);
    let request = AuthnRequest::new(SP_ENTITY_ID, SSO, ACS);

    let first = signer.redirect_url(&request)?;
    let second = signer.redirect_url(&request)?;
    assert_eq!(first, second);

    let other = signer.redirect_url(&request.clone().with_id("_other"))?;
    assert_ne!(first, other);

    Ok(())
}

#[test]
fn tampered_redirect_fails_verification() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let target = env.sp.build_request(&[])?;
    let verifier = ResponseSignatureVerifier::from_certificate_base64(SP_CERT)?;

    let tampered = target.url.replacen("SigAlg=", "RelayState=x&SigAlg=", 1);
    assert!(verifier.verify_redirect_url(&tampered).is_err());

    Ok(())
}
