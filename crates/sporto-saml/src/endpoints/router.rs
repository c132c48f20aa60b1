//! SAML router configuration.

use axum::routing::{get, post};
use axum::Router;

use super::acs::acs_post;
use super::login::login_redirect;
use super::state::SamlState;

/// Creates the SP router.
///
/// | Method | Path          | Handler          | Description                          |
/// |--------|---------------|------------------|--------------------------------------|
/// | GET    | `/saml/login` | `login_redirect` | Redirect to the IdP, `?idp=` scoping |
/// | POST   | `/saml/acs`   | `acs_post`       | Assertion consumer service           |
pub fn saml_router() -> Router<SamlState> {
    Router::new()
        .route("/saml/login", get(login_redirect))
        .route("/saml/acs", post(acs_post))
}
