//! SAML AuthnRequest.
//!
//! The request the SP sends to its single IdP over the HTTP-Redirect binding.

use chrono::{DateTime, SubsecRound, Utc};
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use crate::error::{SamlError, SamlResult};
use crate::xml::Document;

use super::{SamlBinding, SAMLP_NS, SAML_NS, SAML_VERSION};

/// Format of `IssueInstant` on outgoing requests.
pub const ISSUE_INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// SAML Authentication Request.
///
/// Built fresh for every authentication attempt and discarded once the
/// redirect has been issued; nothing links it to the later response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthnRequest {
    /// Unique identifier (`_` followed by 40 hex digits).
    pub id: String,

    /// When the request was issued, truncated to whole seconds.
    pub issue_instant: DateTime<Utc>,

    /// SP entity ID.
    pub issuer: String,

    /// IdP single sign-on URL.
    pub destination: String,

    /// Where the IdP should send its response.
    pub assertion_consumer_service_url: String,

    /// Candidate IdP entity IDs, in caller order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scoping: Vec<String>,
}

impl AuthnRequest {
    /// Creates a request with a fresh identifier issued now.
    #[must_use]
    pub fn new(
        issuer: impl Into<String>,
        destination: impl Into<String>,
        assertion_consumer_service_url: impl Into<String>,
    ) -> Self {
        Self {
            id: sporto_crypto::generate_request_id(),
            issue_instant: Utc::now().trunc_subsecs(0),
            issuer: issuer.into(),
            destination: destination.into(),
            assertion_consumer_service_url: assertion_consumer_service_url.into(),
            scoping: Vec::new(),
        }
    }

    /// Replaces the identifier.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Replaces the issue instant (truncated to whole seconds).
    #[must_use]
    pub fn with_issue_instant(mut self, instant: DateTime<Utc>) -> Self {
        self.issue_instant = instant.trunc_subsecs(0);
        self
    }

    /// Sets the IdP scoping list. An empty list omits the `Scoping` element.
    #[must_use]
    pub fn with_scoping<I, S>(mut self, provider_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scoping = provider_ids.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the formatted issue instant.
    #[must_use]
    pub fn issue_instant_string(&self) -> String {
        self.issue_instant.format(ISSUE_INSTANT_FORMAT).to_string()
    }

    /// Serializes the request.
    ///
    /// Every interpolated value is escaped, scoping entries included.
    #[must_use]
    pub fn to_xml(&self) -> String {
        let scoping = if self.scoping.is_empty() {
            String::new()
        } else {
            let entries: String = self
                .scoping
                .iter()
                .map(|provider| {
                    format!(r#"<samlp:IDPEntry ProviderID="{}"/>"#, escape(provider.as_str()))
                })
                .collect();
            format!("\n    <samlp:Scoping><samlp:IDPList>{entries}</samlp:IDPList></samlp:Scoping>")
        };

        format!(
            r#"<?xml version="1.0"?>
<samlp:AuthnRequest
    ID="{id}"
    Version="{version}"
    IssueInstant="{instant}"
    Destination="{destination}"
    AssertionConsumerServiceURL="{acs}"
    ProtocolBinding="{binding}"
    xmlns:samlp="{samlp}">
    <saml:Issuer xmlns:saml="{saml}">{issuer}</saml:Issuer>{scoping}
</samlp:AuthnRequest>"#,
            id = escape(self.id.as_str()),
            version = SAML_VERSION,
            instant = self.issue_instant_string(),
            destination = escape(self.destination.as_str()),
            acs = escape(self.assertion_consumer_service_url.as_str()),
            binding = SamlBinding::HttpRedirect.uri(),
            samlp = SAMLP_NS,
            saml = SAML_NS,
            issuer = escape(self.issuer.as_str()),
        )
    }

    /// Parses a serialized request.
    pub fn from_xml(xml: &str) -> SamlResult<Self> {
        let document = Document::parse(xml).map_err(|e| SamlError::InvalidRequest(e.to_string()))?;
        let root = document.root();

        if !root.is(SAMLP_NS, "AuthnRequest") {
            return Err(SamlError::InvalidRequest(format!(
                "expected samlp:AuthnRequest, found {}",
                root.qualified_name()
            )));
        }

        let required = |name: &str| {
            root.attr(name)
                .map(String::from)
                .ok_or_else(|| SamlError::InvalidRequest(format!("AuthnRequest is missing {name}")))
        };

        let issue_instant = DateTime::parse_from_rfc3339(&required("IssueInstant")?)
            .map_err(|e| SamlError::InvalidRequest(format!("invalid IssueInstant: {e}")))?
            .with_timezone(&Utc);

        let issuer = root
            .child(SAML_NS, "Issuer")
            .map(|issuer| issuer.text())
            .ok_or_else(|| {
                SamlError::InvalidRequest("AuthnRequest is missing Issuer".to_string())
            })?;

        let scoping = root
            .find_all(&[(SAMLP_NS, "Scoping"), (SAMLP_NS, "IDPList"), (SAMLP_NS, "IDPEntry")])
            .into_iter()
            .filter_map(|entry| entry.attr("ProviderID").map(String::from))
            .collect();

        Ok(Self {
            id: required("ID")?,
            issue_instant,
            issuer,
            destination: required("Destination")?,
            assertion_consumer_service_url: required("AssertionConsumerServiceURL")?,
            scoping,
        })
    }
}
