//! Endpoint state.

use std::sync::Arc;

use crate::sp::ServiceProvider;

/// State shared by the SAML endpoints.
#[derive(Debug, Clone)]
pub struct SamlState {
    /// The configured service provider.
    pub sp: Arc<ServiceProvider>,
}

impl SamlState {
    /// Creates endpoint state around `sp`.
    #[must_use]
    pub fn new(sp: ServiceProvider) -> Self {
        Self { sp: Arc::new(sp) }
    }
}

impl From<Arc<ServiceProvider>> for SamlState {
    fn from(sp: Arc<ServiceProvider>) -> Self {
        Self { sp }
    }
}
