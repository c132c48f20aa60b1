//! Login endpoint.

use axum::extract::{RawQuery, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::sp::RedirectTarget;

use super::error_response;
use super::state::SamlState;

/// Query parameter naming a candidate IdP; may repeat.
pub const IDP_PARAM: &str = "idp";

/// GET handler: redirects the user agent to the IdP.
///
/// Every `idp` query parameter becomes a scoping entry, in order.
pub async fn login_redirect(State(state): State<SamlState>, RawQuery(query): RawQuery) -> Response {
    let scoping = scoping_from_query(query.as_deref().unwrap_or_default());
    match state.sp.build_request(&scoping) {
        Ok(target) => redirect(&target),
        Err(e) => error_response(&e),
    }
}

/// Collects the `idp` values of a raw query string.
#[must_use]
pub fn scoping_from_query(query: &str) -> Vec<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .filter(|(key, value)| key == IDP_PARAM && !value.is_empty())
        .map(|(_, value)| value.into_owned())
        .collect()
}

pub(super) fn redirect(target: &RedirectTarget) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, target.url.clone())]).into_response()
}
