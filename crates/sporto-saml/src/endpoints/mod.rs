//! HTTP endpoints.
//!
//! Axum handlers exposing the two pipelines:
//!
//! - **Login** - `GET /saml/login` redirects to the IdP with a signed request
//! - **ACS** - `POST /saml/acs` consumes the IdP's response
//!
//! # Example
//!
//! ```rust,ignore
//! use sporto_saml::endpoints::{saml_router, SamlState};
//!
//! let app = saml_router().with_state(SamlState::new(service_provider));
//! ```

mod acs;
mod login;
mod router;
mod state;

pub use acs::*;
pub use login::*;
pub use router::*;
pub use state::*;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::SamlError;

/// Maps a pipeline failure onto its HTTP status, with the message as body.
fn error_response(err: &SamlError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, err.to_string()).into_response()
}
