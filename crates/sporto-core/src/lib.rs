//! # sporto-core
//!
//! Configuration and error handling shared by the sporto crates.
//!
//! The service provider is driven by a single read-only [`SpConfig`]: the
//! SP entity ID, its assertion consumer service URL, the IdP single sign-on
//! URL, the SP private key and the trusted IdP certificate.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod config;
pub mod error;

pub use config::{SignatureScope, SpConfig, DEFAULT_CLOCK_SKEW_SECS, MAX_CLOCK_SKEW_SECS};
pub use error::{Error, Result};
