//! Configuration commands.

use std::path::Path;

use sporto_core::SpConfig;

use crate::cli::ConfigCommand;
use crate::output::{info, output_json, OutputFormat};

/// Runs a config command.
pub fn run_config(
    cmd: ConfigCommand,
    config: &SpConfig,
    path: Option<&Path>,
    format: OutputFormat,
) -> crate::CliResult<()> {
    match cmd {
        ConfigCommand::Show => show_config(config, path, format),
    }
}

/// Shows the effective configuration.
fn show_config(
    config: &SpConfig,
    path: Option<&Path>,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let redacted = config.redacted();
    if format == OutputFormat::Json {
        return output_json(&redacted);
    }

    match path {
        Some(path) => info(&format!("Configuration file: {}", path.display())),
        None => info("Configuration from environment"),
    }
    println!();
    println!("entityid: {}", redacted.entityid);
    println!("asc: {}", redacted.asc);
    println!("sso: {}", redacted.sso);
    println!("private_key: {}", redacted.private_key);
    println!("idp_certificate: {}", redacted.idp_certificate);
    println!("clock_skew_secs: {}", redacted.clock_skew_secs);
    println!("signature_scope: {}", redacted.signature_scope);

    Ok(())
}
