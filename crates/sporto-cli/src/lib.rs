//! # sporto-cli
//!
//! Command-line tools around the sporto service provider:
//! - Build and sign redirect URLs for the IdP
//! - Verify and validate responses, printing their attributes
//! - Serve the login and ACS endpoints
//! - Inspect the effective configuration

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
