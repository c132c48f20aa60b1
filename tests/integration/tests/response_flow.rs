//! Response pipeline tests.

use chrono::{Duration, Utc};
use sporto_crypto::RsaSigningKey;
use sporto_saml::bindings::HttpPostBinding;
use sporto_saml::signature::{ResponseSignatureVerifier, XmlSigner};
use sporto_saml::validation::ResponseValidator;
use sporto_saml::{
    extract_attributes, AuthnInput, AuthnOutcome, SamlError, SamlResponse, SignatureScope,
    ValidationIssue,
};

use crate::common::{encode, instant, ResponseBuilder, TestEnv, ACS, SIGNED_RESPONSE};

#[test]
fn fresh_key_pair_end_to_end() -> anyhow::Result<()> {
    let key = RsaSigningKey::generate(1024)?;
    let verifier = ResponseSignatureVerifier::new(key.verifying_key());
    let signer = XmlSigner::new(key);

    let now = Utc::now();
    let source = ResponseBuilder::fresh(now)
        .attribute("mail", &["alice@example.org", "a.liddell@example.org"])
        .attribute("cn", &["Alice Liddell"])
        .attribute("eduPersonAffiliation", &["member", "student", "affiliate"]);

    let signed = signer.sign_response(&source.to_xml(), SignatureScope::Assertion)?;
    let mut response = SamlResponse::from_xml(&signed)?;

    verifier.verify(&mut response, SignatureScope::Assertion)?;
    ResponseValidator::new(ACS).validate_at(&response, now)?;
    let attributes = extract_attributes(&response);

    assert_eq!(attributes.len(), source.attributes.len());
    for (name, values) in &source.attributes {
        assert_eq!(&attributes[name], values, "attribute {name}");
    }

    Ok(())
}

#[test]
fn authenticate_returns_attributes_and_raw_bytes() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let builder = ResponseBuilder::fresh(Utc::now()).attribute("uid", &["alice"]);
    let value = env.post_value(&builder, SignatureScope::Assertion)?;

    let outcome = env.sp.authenticate(AuthnInput::ProcessResponse(value.clone()))?;
    let AuthnOutcome::Authenticated(result) = outcome else {
        anyhow::bail!("expected an authenticated outcome");
    };

    assert_eq!(result.attributes["uid"], vec!["alice".to_string()]);
    assert_eq!(result.response, HttpPostBinding::decode_response(&value)?);

    Ok(())
}

#[test]
fn fixture_response_verifies() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let result = env.sp.process_response(&encode(SIGNED_RESPONSE))?;

    assert_eq!(
        result.attributes["mail"],
        vec!["alice@example.org".to_string(), "a.liddell@example.org".to_string()]
    );
    assert_eq!(result.response, SIGNED_RESPONSE.as_bytes());

    Ok(())
}

#[test]
fn tampering_after_signing_is_detected() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let builder =
        ResponseBuilder::fresh(Utc::now()).attribute("eduPersonEntitlement", &["urn:x:user"]);
    let signed = env.idp.sign_response(&builder.to_xml(), SignatureScope::Assertion)?;

    for tampered in [
        signed.replace("urn:x:user", "urn:x:admin"),
        signed.replace("_nameid", "_other"),
        // Signature value bytes altered, digest untouched.
        signed.replacen("<ds:SignatureValue>", "<ds:SignatureValue>AAAA", 1),
    ] {
        assert_ne!(tampered, signed);
        assert!(matches!(
            env.sp.process_response(&encode(&tampered)),
            Err(SamlError::SignatureVerification)
        ));
    }

    Ok(())
}

#[test]
fn unsigned_response_is_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let xml = ResponseBuilder::fresh(Utc::now()).attribute("cn", &["x"]).to_xml();

    assert!(matches!(
        env.sp.process_response(&encode(&xml)),
        Err(SamlError::SignatureVerification)
    ));

    Ok(())
}

#[test]
fn response_from_another_idp_is_rejected() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let stranger = XmlSigner::new(RsaSigningKey::generate(1024)?);
    let xml = ResponseBuilder::fresh(Utc::now()).to_xml();
    let signed = stranger.sign_response(&xml, SignatureScope::Assertion)?;

    assert!(matches!(
        env.sp.process_response(&encode(&signed)),
        Err(SamlError::SignatureVerification)
    ));

    Ok(())
}

#[test]
fn expired_conditions_are_too_old() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let now = Utc::now();
    let mut builder = ResponseBuilder::fresh(now).attribute("cn", &["x"]);
    builder.not_on_or_after = Some(instant(now - Duration::hours(1)));

    let err = env
        .sp
        .process_response(&env.post_value(&builder, SignatureScope::Assertion)?)
        .unwrap_err();

    assert_eq!(err.issues(), &[ValidationIssue::ConditionsExpired]);
    assert!(err.to_string().contains("too old"));
    assert_eq!(err.http_status(), 403);

    Ok(())
}

#[test]
fn unbounded_response_passes() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let builder = ResponseBuilder::unbounded().attribute("cn", &["x"]);

    let result = env.sp.process_response(&env.post_value(&builder, SignatureScope::Assertion)?)?;
    assert_eq!(result.attributes["cn"], vec!["x".to_string()]);

    Ok(())
}

#[test]
fn destination_must_match_acs() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let now = Utc::now();

    let mut elsewhere = ResponseBuilder::fresh(now);
    elsewhere.destination = Some("https://evil.example.org/acs".to_string());
    let err = env
        .sp
        .process_response(&env.post_value(&elsewhere, SignatureScope::Assertion)?)
        .unwrap_err();
    assert_eq!(
        err.issues(),
        &[ValidationIssue::DestinationMismatch {
            destination: "https://evil.example.org/acs".to_string()
        }]
    );

    let mut absent = ResponseBuilder::fresh(now);
    absent.destination = None;
    env.sp.process_response(&env.post_value(&absent, SignatureScope::Assertion)?)?;

    Ok(())
}

#[test]
fn every_stale_bound_is_reported() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let now = Utc::now();
    let past = instant(now - Duration::hours(2));
    let future = instant(now + Duration::hours(2));

    let builder = ResponseBuilder {
        destination: Some("https://evil.example.org/acs".to_string()),
        subject_not_before: Some(future.clone()),
        subject_not_on_or_after: Some(past.clone()),
        not_before: Some(future),
        not_on_or_after: Some(past.clone()),
        session_not_on_or_after: Some(past),
        attributes: Vec::new(),
    };

    let err = env
        .sp
        .process_response(&env.post_value(&builder, SignatureScope::Assertion)?)
        .unwrap_err();
    assert_eq!(err.issues().len(), 6);

    let message = err.to_string();
    assert!(message.starts_with("Problems detected with response. \nIssues: \n"));
    assert_eq!(message.lines().count(), 2 + 6);

    Ok(())
}

#[test]
fn duplicate_attribute_names_keep_the_last() -> anyhow::Result<()> {
    let env = TestEnv::new()?;
    let builder = ResponseBuilder::fresh(Utc::now())
        .attribute("mail", &["first@example.org", "second@example.org"])
        .attribute("cn", &["Alice"])
        .attribute("mail", &["third@example.org"]);

    let result = env.sp.process_response(&env.post_value(&builder, SignatureScope::Assertion)?)?;
    assert_eq!(result.attributes.len(), 2);
    assert_eq!(result.attributes["mail"], vec!["third@example.org".to_string()]);

    Ok(())
}

#[test]
fn response_scope_verifies_the_envelope() -> anyhow::Result<()> {
    let mut config = TestEnv::new()?.config;
    config.signature_scope = SignatureScope::Response;
    let env = TestEnv::with_config(config)?;
    let builder = ResponseBuilder::fresh(Utc::now()).attribute("cn", &["x"]);

    env.sp.process_response(&env.post_value(&builder, SignatureScope::Response)?)?;
    assert!(matches!(
        env.sp.process_response(&env.post_value(&builder, SignatureScope::Assertion)?),
        Err(SamlError::SignatureVerification)
    ));

    Ok(())
}

#[test]
fn hostile_documents_are_malformed() -> anyhow::Result<()> {
    let env = TestEnv::new()?;

    let doctype = r#"<!DOCTYPE r [<!ENTITY e "x">]><samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol">&e;</samlp:Response>"#;
    for input in [encode(doctype), "%%%".to_string(), String::new(), encode("<samlp:Response")] {
        assert!(matches!(
            env.sp.process_response(&input),
            Err(SamlError::MalformedResponse(_))
        ));
    }

    Ok(())
}
