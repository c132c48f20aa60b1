//! Assertion consumer service endpoint.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use serde::{Deserialize, Serialize};

use super::error_response;
use super::login::redirect;
use super::state::SamlState;
use crate::sp::AuthenticatedResponse;

/// Form data posted by the IdP.
#[derive(Debug, Deserialize)]
pub struct AcsForm {
    /// The response (base64).
    #[serde(rename = "SAMLResponse")]
    pub saml_response: Option<String>,

    /// Relay state, echoed back untouched in the JSON body.
    #[serde(rename = "RelayState")]
    pub relay_state: Option<String>,
}

#[derive(Serialize)]
struct AcsBody {
    #[serde(flatten)]
    result: AuthenticatedResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    relay_state: Option<String>,
}

/// POST handler: verifies the response and returns its attributes as JSON,
/// along with any posted `RelayState`.
///
/// Without a `SAMLResponse` the user agent is sent to the IdP instead.
pub async fn acs_post(State(state): State<SamlState>, Form(form): Form<AcsForm>) -> Response {
    let Some(saml_response) = form.saml_response.filter(|value| !value.trim().is_empty()) else {
        tracing::debug!("no SAMLResponse posted, starting a login");
        return match state.sp.build_request(&[]) {
            Ok(target) => redirect(&target),
            Err(e) => error_response(&e),
        };
    };

    match state.sp.process_response(&saml_response) {
        Ok(result) => Json(AcsBody {
            result,
            relay_state: form.relay_state,
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}
