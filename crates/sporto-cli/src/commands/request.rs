//! Redirect URL generation.

use sporto_core::SpConfig;
use sporto_saml::signature::ResponseSignatureVerifier;
use sporto_saml::ServiceProvider;

use crate::cli::RequestArgs;
use crate::output::{info, output_json, success, OutputFormat};

/// Builds, signs and prints a redirect URL.
pub fn run_request(
    args: RequestArgs,
    config: &SpConfig,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let sp = ServiceProvider::new(config)?;
    let target = sp.build_request(&args.idps)?;

    if let Some(path) = &args.verify_with {
        let certificate = std::fs::read_to_string(path)?;
        ResponseSignatureVerifier::from_certificate_base64(&certificate)?
            .verify_redirect_url(&target.url)?;
        if format == OutputFormat::Table {
            success(&format!("signature verified against {}", path.display()));
        }
    }

    match format {
        OutputFormat::Table => {
            info(&format!("AuthnRequest {}", target.request_id));
            println!("{}", target.url);
            Ok(())
        }
        OutputFormat::Json => output_json(&target),
    }
}
