//! The service provider facade.
//!
//! [`ServiceProvider`] owns the parsed key material and runs one of the two
//! pipelines per call. It holds no mutable state and can be shared freely
//! between request handlers.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sporto_core::SpConfig;
use sporto_crypto::{RsaSigningKey, RsaVerifyingKey};

use crate::attributes::{extract_attributes, AttributeMap};
use crate::bindings::HttpPostBinding;
use crate::error::SamlResult;
use crate::signature::{RedirectSigner, ResponseSignatureVerifier, SignatureScope};
use crate::types::{AuthnRequest, SamlResponse};
use crate::validation::ResponseValidator;

/// What the caller hands to [`ServiceProvider::authenticate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthnInput {
    /// Start a login, optionally scoped to the listed IdP entity IDs.
    GenerateRequest(Vec<String>),
    /// Consume a `SAMLResponse` form value (base64).
    ProcessResponse(String),
}

/// Where to send the user agent to start a login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectTarget {
    /// `ID` of the issued request.
    pub request_id: String,
    /// Signed HTTP-Redirect URL at the IdP.
    pub url: String,
}

/// A response that passed signature, time and destination checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedResponse {
    /// Asserted attributes.
    pub attributes: AttributeMap,
    /// The decoded response document, as received.
    #[serde(skip)]
    pub response: Vec<u8>,
}

/// Result of [`ServiceProvider::authenticate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthnOutcome {
    /// Redirect the user agent to the IdP.
    Redirect(RedirectTarget),
    /// The user is authenticated.
    Authenticated(AuthenticatedResponse),
}

/// A SAML 2.0 service provider bound to a single trusted IdP.
#[derive(Debug, Clone)]
pub struct ServiceProvider {
    entity_id: String,
    acs: String,
    sso: String,
    signer: RedirectSigner,
    verifier: ResponseSignatureVerifier,
    validator: ResponseValidator,
    scope: SignatureScope,
}

impl ServiceProvider {
    /// Builds a service provider from configuration.
    ///
    /// The private key and IdP certificate are parsed here; an unusable one
    /// fails with [`crate::SamlError::Configuration`].
    pub fn new(config: &SpConfig) -> SamlResult<Self> {
        config.validate()?;

        let key = RsaSigningKey::from_base64(&config.private_key)?;
        let certificate = RsaVerifyingKey::from_certificate_base64(&config.idp_certificate)?;

        tracing::debug!(
            entity_id = %config.entityid,
            key_bits = key.key_size_bits(),
            idp_subject = certificate.subject().unwrap_or("-"),
            scope = %config.signature_scope,
            "service provider configured"
        );

        Ok(Self {
            entity_id: config.entityid.clone(),
            acs: config.asc.clone(),
            sso: config.sso.clone(),
            signer: RedirectSigner::new(key),
            verifier: ResponseSignatureVerifier::new(certificate),
            validator: ResponseValidator::new(config.asc.clone())
                .with_clock_skew_secs(config.clock_skew_secs),
            scope: config.signature_scope,
        })
    }

    /// SP entity ID.
    #[must_use]
    pub fn entity_id(&self) -> &str {
        &self.entity_id
    }

    /// Assertion consumer service URL.
    #[must_use]
    pub fn acs(&self) -> &str {
        &self.acs
    }

    /// IdP single sign-on URL.
    #[must_use]
    pub fn sso(&self) -> &str {
        &self.sso
    }

    /// Signature scope checked on inbound responses.
    #[must_use]
    pub const fn signature_scope(&self) -> SignatureScope {
        self.scope
    }

    /// Runs the pipeline selected by `input`.
    pub fn authenticate(&self, input: AuthnInput) -> SamlResult<AuthnOutcome> {
        match input {
            AuthnInput::GenerateRequest(scoping) => {
                self.build_request(&scoping).map(AuthnOutcome::Redirect)
            }
            AuthnInput::ProcessResponse(form_value) => {
                self.process_response(&form_value).map(AuthnOutcome::Authenticated)
            }
        }
    }

    /// Builds the `AuthnRequest` this SP sends, scoped to `scoping`.
    #[must_use]
    pub fn authn_request(&self, scoping: &[String]) -> AuthnRequest {
        AuthnRequest::new(&self.entity_id, &self.sso, &self.acs)
            .with_scoping(scoping.iter().cloned())
    }

    /// Issues a signed redirect to the IdP.
    pub fn build_request(&self, scoping: &[String]) -> SamlResult<RedirectTarget> {
        self.redirect_for(&self.authn_request(scoping))
    }

    /// Signs `request` for the HTTP-Redirect binding.
    pub fn redirect_for(&self, request: &AuthnRequest) -> SamlResult<RedirectTarget> {
        let url = self.signer.redirect_url(request)?;
        tracing::info!(
            request_id = %request.id,
            scoping = request.scoping.len(),
            "issued AuthnRequest"
        );
        Ok(RedirectTarget {
            request_id: request.id.clone(),
            url,
        })
    }

    /// Consumes a base64 `SAMLResponse` form value at the current time.
    pub fn process_response(&self, form_value: &str) -> SamlResult<AuthenticatedResponse> {
        self.process_response_at(form_value, Utc::now())
    }

    /// Consumes a base64 `SAMLResponse` form value, validating against `now`.
    pub fn process_response_at(
        &self,
        form_value: &str,
        now: DateTime<Utc>,
    ) -> SamlResult<AuthenticatedResponse> {
        let raw = HttpPostBinding::decode_response(form_value)?;
        self.process_decoded_at(raw, now)
    }

    /// Consumes an already decoded response document, validating against `now`.
    ///
    /// Signature verification runs first; time and destination rules only
    /// run on a verified response, and attributes are only extracted once
    /// both passed.
    pub fn process_decoded_at(
        &self,
        raw: Vec<u8>,
        now: DateTime<Utc>,
    ) -> SamlResult<AuthenticatedResponse> {
        let mut response = SamlResponse::parse(raw)?;
        tracing::debug!(
            id = response.id().unwrap_or("-"),
            in_response_to = response.in_response_to().unwrap_or("-"),
            "received response"
        );

        self.verifier.verify(&mut response, self.scope)?;
        self.validator.validate_at(&response, now)?;
        let attributes = extract_attributes(&response);

        tracing::info!(
            id = response.id().unwrap_or("-"),
            issuer = response.issuer().as_deref().unwrap_or("-"),
            attributes = attributes.len(),
            "accepted response"
        );

        Ok(AuthenticatedResponse {
            attributes,
            response: response.into_raw(),
        })
    }
}
