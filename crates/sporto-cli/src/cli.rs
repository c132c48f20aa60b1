//! CLI argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use sporto_core::SignatureScope;

use crate::output::OutputFormat;

/// sporto - minimal SAML 2.0 service provider.
#[derive(Debug, Parser)]
#[command(name = "sporto")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (TOML). `SPORTO_*` variables override it.
    #[arg(short, long, env = "SPORTO_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "table")]
    pub output: OutputFormat,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a signed redirect URL to the IdP.
    Request(RequestArgs),

    /// Verify a response and print its attributes.
    Response(ResponseArgs),

    /// Serve the login and ACS endpoints.
    Serve(ServeArgs),

    /// Configuration commands.
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Arguments for `request`.
#[derive(Debug, Args)]
pub struct RequestArgs {
    /// IdP entity ID to scope the request to. May repeat.
    #[arg(long = "idp")]
    pub idps: Vec<String>,

    /// Verify the generated signature against this base64 certificate file.
    #[arg(long, value_name = "CERT_B64_FILE")]
    pub verify_with: Option<PathBuf>,
}

/// Arguments for `response`.
#[derive(Debug, Args)]
pub struct ResponseArgs {
    /// File holding the response. Reads stdin when absent.
    pub file: Option<PathBuf>,

    /// The input is raw XML rather than a base64 form value.
    #[arg(long)]
    pub xml: bool,

    /// Signature scope (overrides config).
    #[arg(long, value_parser = parse_scope)]
    pub scope: Option<SignatureScope>,
}

/// Arguments for `serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, env = "SPORTO_BIND", default_value = "127.0.0.1:8080")]
    pub bind: String,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration, key material redacted.
    Show,
}

fn parse_scope(value: &str) -> Result<SignatureScope, String> {
    value.parse().map_err(|e: sporto_core::Error| e.to_string())
}
