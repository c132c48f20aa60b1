//! Common test utilities and fixtures.

use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use sporto_core::SpConfig;
use sporto_crypto::RsaSigningKey;
use sporto_saml::bindings::HttpPostBinding;
use sporto_saml::signature::XmlSigner;
use sporto_saml::{ServiceProvider, SignatureScope};

pub const SP_ENTITY_ID: &str = "https://sp.example.org";
pub const ACS: &str = "https://sp.example.org/acs";
pub const SSO: &str = "https://wayf.example.org/sso";
pub const IDP_ENTITY_ID: &str = "https://wayf.example.org";

pub const SP_KEY: &str = include_str!("../../../testdata/sp_private_key.b64");
pub const SP_CERT: &str = include_str!("../../../testdata/sp_certificate.b64");
pub const IDP_KEY: &str = include_str!("../../../testdata/idp_private_key.b64");
pub const IDP_CERT: &str = include_str!("../../../testdata/idp_certificate.b64");
pub const SIGNED_RESPONSE: &str = include_str!("../../../testdata/signed_response.xml");

/// A configured SP plus the IdP key that signs the responses it trusts.
pub struct TestEnv {
    /// SP configuration.
    pub config: SpConfig,
    /// Service provider built from `config`.
    pub sp: ServiceProvider,
    /// Signs responses as the trusted IdP.
    pub idp: XmlSigner,
}

impl TestEnv {
    /// Creates the environment from the fixture keys.
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(SpConfig::new(SP_ENTITY_ID, ACS, SSO, SP_KEY.trim(), IDP_CERT.trim()))
    }

    /// Creates the environment for `config`, signing with the fixture IdP key.
    pub fn with_config(config: SpConfig) -> anyhow::Result<Self> {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("sporto_saml=debug")
            .with_test_writer()
            .try_init();

        let sp = ServiceProvider::new(&config)?;
        let idp = XmlSigner::new(RsaSigningKey::from_base64(IDP_KEY)?).with_certificate(IDP_CERT);
        Ok(Self { config, sp, idp })
    }

    /// Signs `response` as the IdP and encodes it as a `SAMLResponse` form
    /// value.
    pub fn post_value(
        &self,
        response: &ResponseBuilder,
        scope: SignatureScope,
    ) -> anyhow::Result<String> {
        let signed = self.idp.sign_response(&response.to_xml(), scope)?;
        Ok(HttpPostBinding::encode_response(&signed))
    }
}

/// Formats an instant the way IdPs do.
pub fn instant(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%dT%H:%M:%SZ").to_string()
}

/// Builds unsigned response documents.
#[derive(Debug, Clone)]
pub struct ResponseBuilder {
    pub destination: Option<String>,
    pub subject_not_before: Option<String>,
    pub subject_not_on_or_after: Option<String>,
    pub not_before: Option<String>,
    pub not_on_or_after: Option<String>,
    pub session_not_on_or_after: Option<String>,
    pub attributes: Vec<(String, Vec<String>)>,
}

impl ResponseBuilder {
    /// A response valid for five minutes around `now`, destined for the ACS.
    pub fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            destination: Some(ACS.to_string()),
            subject_not_before: None,
            subject_not_on_or_after: Some(instant(now + Duration::minutes(5))),
            not_before: Some(instant(now - Duration::minutes(5))),
            not_on_or_after: Some(instant(now + Duration::minutes(5))),
            session_not_on_or_after: Some(instant(now + Duration::hours(8))),
            attributes: Vec::new(),
        }
    }

    /// A response without any temporal bounds or destination.
    pub fn unbounded() -> Self {
        Self {
            destination: None,
            subject_not_before: None,
            subject_not_on_or_after: None,
            not_before: None,
            not_on_or_after: None,
            session_not_on_or_after: None,
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, name: &str, values: &[&str]) -> Self {
        self.attributes
            .push((name.to_string(), values.iter().map(|v| (*v).to_string()).collect()));
        self
    }

    pub fn to_xml(&self) -> String {
        let attr = |name: &str, value: &Option<String>| {
            value
                .as_deref()
                .map(|v| format!(r#" {name}="{v}""#))
                .unwrap_or_default()
        };

        let attributes: String = self
            .attributes
            .iter()
            .map(|(name, values)| {
                let values: String = values
                    .iter()
                    .map(|v| format!("<saml:AttributeValue>{v}</saml:AttributeValue>"))
                    .collect();
                format!(r#"<saml:Attribute Name="{name}">{values}</saml:Attribute>"#)
            })
            .collect();

        format!(
            r#"<samlp:Response xmlns:samlp="urn:oasis:names:tc:SAML:2.0:protocol" xmlns:saml="urn:oasis:names:tc:SAML:2.0:assertion" ID="_resp{id}" Version="2.0" IssueInstant="2024-05-01T12:00:00Z" InResponseTo="_req"{destination}>
  <saml:Issuer>{IDP_ENTITY_ID}</saml:Issuer>
  <samlp:Status><samlp:StatusCode Value="urn:oasis:names:tc:SAML:2.0:status:Success"/></samlp:Status>
  <saml:Assertion ID="_assert{id}" Version="2.0" IssueInstant="2024-05-01T12:00:00Z">
    <saml:Issuer>{IDP_ENTITY_ID}</saml:Issuer>
    <saml:Subject>
      <saml:NameID Format="urn:oasis:names:tc:SAML:2.0:nameid-format:transient">_nameid</saml:NameID>
      <saml:SubjectConfirmation Method="urn:oasis:names:tc:SAML:2.0:cm:bearer">
        <saml:SubjectConfirmationData Recipient="{ACS}"{scd_nb}{scd_noa}/>
      </saml:SubjectConfirmation>
    </saml:Subject>
    <saml:Conditions{nb}{noa}>
      <saml:AudienceRestriction><saml:Audience>{SP_ENTITY_ID}</saml:Audience></saml:AudienceRestriction>
    </saml:Conditions>
    <saml:AuthnStatement AuthnInstant="2024-05-01T12:00:00Z"{session}>
      <saml:AuthnContext><saml:AuthnContextClassRef>urn:oasis:names:tc:SAML:2.0:ac:classes:PasswordProtectedTransport</saml:AuthnContextClassRef></saml:AuthnContext>
    </saml:AuthnStatement>
    <saml:AttributeStatement>{attributes}</saml:AttributeStatement>
  </saml:Assertion>
</samlp:Response>"#,
            id = hex_id(),
            destination = attr("Destination", &self.destination),
            scd_nb = attr("NotBefore", &self.subject_not_before),
            scd_noa = attr("NotOnOrAfter", &self.subject_not_on_or_after),
            nb = attr("NotBefore", &self.not_before),
            noa = attr("NotOnOrAfter", &self.not_on_or_after),
            session = attr("SessionNotOnOrAfter", &self.session_not_on_or_after),
        )
    }
}

fn hex_id() -> String {
    sporto_crypto::sha1_hex(&sporto_crypto::random_bytes(8))[..12].to_string()
}

/// Base64 of a raw document, for tests that bypass signing.
pub fn encode(xml: &str) -> String {
    base64::engine::general_purpose::STANDARD.encode(xml)
}
