//! Service provider configuration.
//!
//! Loaded from a TOML file, from `SPORTO_*` environment variables (a `.env`
//! file is honoured), or from a file overlaid by the environment. Field
//! names follow the federation's configuration contract:
//!
//! ```toml
//! entityid = "https://sp.example.org"
//! asc = "https://sp.example.org/acs"
//! sso = "https://wayf.example.org/saml2/idp/SSOService.php"
//! private_key = "MIIEow..."
//! idp_certificate = "MIIDFz..."
//! ```

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default clock skew tolerated on temporal checks, in seconds.
pub const DEFAULT_CLOCK_SKEW_SECS: u64 = 60;

/// Largest clock skew accepted from configuration: one day.
pub const MAX_CLOCK_SKEW_SECS: u64 = 86_400;

const ENV_PREFIX: &str = "SPORTO_";

/// Which element's signature is verified on an inbound response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureScope {
    /// Verify the signature on the single `saml:Assertion`.
    #[default]
    Assertion,
    /// Verify the signature on the `samlp:Response` root.
    Response,
}

impl SignatureScope {
    /// Returns the lowercase name used in configuration.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Assertion => "assertion",
            Self::Response => "response",
        }
    }
}

impl fmt::Display for SignatureScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SignatureScope {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "assertion" => Ok(Self::Assertion),
            "response" => Ok(Self::Response),
            other => Err(Error::config(format!(
                "unknown signature scope '{other}' (expected 'assertion' or 'response')"
            ))),
        }
    }
}

/// SP configuration, read-only once constructed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpConfig {
    /// SP entity ID, used as the request `Issuer`.
    pub entityid: String,

    /// Assertion consumer service URL. Responses must be destined here.
    pub asc: String,

    /// IdP single sign-on URL, the redirect target.
    pub sso: String,

    /// SP RSA private key, raw base64 DER.
    pub private_key: String,

    /// Trusted IdP signing certificate, raw base64 DER.
    pub idp_certificate: String,

    /// Clock skew tolerated on both sides of "now".
    pub clock_skew_secs: u64,

    /// Which signature is verified on inbound responses.
    pub signature_scope: SignatureScope,
}

impl Default for SpConfig {
    fn default() -> Self {
        Self {
            entityid: String::new(),
            asc: String::new(),
            sso: String::new(),
            private_key: String::new(),
            idp_certificate: String::new(),
            clock_skew_secs: DEFAULT_CLOCK_SKEW_SECS,
            signature_scope: SignatureScope::default(),
        }
    }
}

// Key material stays out of logs.
impl fmt::Debug for SpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redacted = self.redacted();
        f.debug_struct("SpConfig")
            .field("entityid", &redacted.entityid)
            .field("asc", &redacted.asc)
            .field("sso", &redacted.sso)
            .field("private_key", &redacted.private_key)
            .field("idp_certificate", &redacted.idp_certificate)
            .field("clock_skew_secs", &redacted.clock_skew_secs)
            .field("signature_scope", &redacted.signature_scope)
            .finish()
    }
}

impl SpConfig {
    /// Creates a configuration with the default skew and scope.
    #[must_use]
    pub fn new(
        entityid: impl Into<String>,
        asc: impl Into<String>,
        sso: impl Into<String>,
        private_key: impl Into<String>,
        idp_certificate: impl Into<String>,
    ) -> Self {
        Self {
            entityid: entityid.into(),
            asc: asc.into(),
            sso: sso.into(),
            private_key: private_key.into(),
            idp_certificate: idp_certificate.into(),
            ..Self::default()
        }
    }

    /// Sets the tolerated clock skew.
    #[must_use]
    pub const fn with_clock_skew_secs(mut self, secs: u64) -> Self {
        self.clock_skew_secs = secs;
        self
    }

    /// Sets the verification scope.
    #[must_use]
    pub const fn with_signature_scope(mut self, scope: SignatureScope) -> Self {
        self.signature_scope = scope;
        self
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("failed to parse config: {e}")))
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loading SP configuration");
        Self::from_toml(&content)
    }

    /// Loads configuration from `SPORTO_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = Self::default();
        config.overlay(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Loads the effective configuration: the file (if given) overlaid by
    /// the environment, then validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.overlay(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Overwrites fields for which `lookup` yields a value.
    ///
    /// `lookup` receives the full variable name, e.g. `SPORTO_ENTITYID`.
    pub fn overlay<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |field: &str| lookup(&format!("{ENV_PREFIX}{}", field.to_ascii_uppercase()));

        for (field, slot) in [
            ("entityid", &mut self.entityid),
            ("asc", &mut self.asc),
            ("sso", &mut self.sso),
            ("private_key", &mut self.private_key),
            ("idp_certificate", &mut self.idp_certificate),
        ] {
            if let Some(value) = var(field) {
                *slot = value;
            }
        }

        if let Some(value) = var("clock_skew_secs") {
            self.clock_skew_secs = value.trim().parse().map_err(|_| {
                Error::config(format!("{ENV_PREFIX}CLOCK_SKEW_SECS is not a number: {value}"))
            })?;
        }

        if let Some(value) = var("signature_scope") {
            self.signature_scope = value.parse()?;
        }

        Ok(())
    }

    /// Checks that every required field is present and every URL parses.
    ///
    /// Key material is only checked for presence here; it is decoded when
    /// the service provider is constructed.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("entityid", &self.entityid),
            ("asc", &self.asc),
            ("sso", &self.sso),
            ("private_key", &self.private_key),
            ("idp_certificate", &self.idp_certificate),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config(format!("{field} is required")));
            }
        }

        for (field, value) in
            [("entityid", &self.entityid), ("asc", &self.asc), ("sso", &self.sso)]
        {
            url::Url::parse(value)
                .map_err(|e| Error::config(format!("{field} is not a valid URL ({value}): {e}")))?;
        }

        if self.clock_skew_secs > MAX_CLOCK_SKEW_SECS {
            return Err(Error::config(format!(
                "clock_skew_secs must be at most {MAX_CLOCK_SKEW_SECS}, got {}",
                self.clock_skew_secs
            )));
        }

        Ok(())
    }

    /// Returns a copy with key material masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            private_key: mask(&self.private_key),
            idp_certificate: mask(&self.idp_certificate),
            ..self.clone()
        }
    }
}

fn mask(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        format!("<{} bytes redacted>", value.len())
    }
}
