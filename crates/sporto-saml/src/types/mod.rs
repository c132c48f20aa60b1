//! SAML 2.0 types.
//!
//! The outgoing `AuthnRequest`, the inbound response wrapper, and the
//! namespace and algorithm constants both pipelines share.

mod authn_request;
mod constants;
mod response;

pub use authn_request::*;
pub use constants::*;
pub use response::*;
