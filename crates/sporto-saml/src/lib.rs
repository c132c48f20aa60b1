//! Minimal SAML 2.0 service provider for a single-IdP hub federation.
//!
//! Two one-shot pipelines share one read-only configuration:
//!
//! - **Request** - build an `AuthnRequest`, deflate and encode it for the
//!   HTTP-Redirect binding, sign the query string with RSA-SHA1 and return
//!   the redirect target.
//! - **Response** - decode a POSTed `SAMLResponse`, verify its enveloped
//!   XML signature (exclusive c14n, SHA-1 digest, RSA-SHA1), validate its
//!   time windows and destination, and extract the asserted attributes.
//!
//! # Architecture
//!
//! - [`xml`] - typed XML tree and exclusive canonicalization
//! - [`types`] - SAML constants, `AuthnRequest` and response accessors
//! - [`bindings`] - HTTP-Redirect and HTTP-POST encoding
//! - [`signature`] - redirect signing and XML-DSig sign / verify
//! - [`validation`] - temporal and destination checks
//! - [`attributes`] - attribute extraction
//! - [`sp`] - the [`ServiceProvider`] facade tying the pipelines together
//! - [`endpoints`] - axum handlers for login and the assertion consumer service
//!
//! # Example
//!
//! ```rust,ignore
//! use sporto_saml::{AuthnInput, AuthnOutcome, ServiceProvider};
//!
//! let sp = ServiceProvider::new(&config)?;
//! match sp.authenticate(AuthnInput::ProcessResponse(form_value))? {
//!     AuthnOutcome::Authenticated(result) => println!("{:?}", result.attributes),
//!     AuthnOutcome::Redirect(target) => println!("Location: {}", target.url),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod attributes;
pub mod bindings;
pub mod endpoints;
pub mod error;
pub mod signature;
pub mod sp;
pub mod types;
pub mod validation;
pub mod xml;

pub use attributes::{extract_attributes, AttributeMap};
pub use error::{SamlError, SamlResult, ValidationIssue};
pub use signature::SignatureScope;
pub use sp::{AuthenticatedResponse, AuthnInput, AuthnOutcome, RedirectTarget, ServiceProvider};
pub use types::*;
