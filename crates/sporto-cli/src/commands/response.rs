//! Response verification.

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use sporto_core::SpConfig;
use sporto_saml::{AuthenticatedResponse, ServiceProvider};
use tabled::Tabled;

use crate::cli::ResponseArgs;
use crate::output::{output, success, OutputFormat};

/// One attribute, for table output.
#[derive(Debug, Serialize, Tabled)]
pub struct AttributeRow {
    /// Attribute name.
    #[tabled(rename = "Attribute")]
    pub name: String,
    /// Values, in document order.
    #[tabled(rename = "Values", display_with = "display_values")]
    pub values: Vec<String>,
}

fn display_values(values: &[String]) -> String {
    values.join("\n")
}

/// Verifies a response and prints its attributes.
pub fn run_response(
    args: ResponseArgs,
    config: &SpConfig,
    format: OutputFormat,
) -> crate::CliResult<()> {
    let mut config = config.clone();
    if let Some(scope) = args.scope {
        config.signature_scope = scope;
    }
    let sp = ServiceProvider::new(&config)?;

    let input = read_input(args.file.as_deref())?;
    let result: AuthenticatedResponse = if args.xml {
        sp.process_decoded_at(input, chrono::Utc::now())?
    } else {
        let form_value = String::from_utf8(input).map_err(|_| {
            crate::CliError::InvalidArgument("base64 input is not UTF-8".to_string())
        })?;
        sp.process_response(&form_value)?
    };

    match format {
        OutputFormat::Table => {
            success(&format!(
                "response verified ({} signature), {} attributes",
                sp.signature_scope(),
                result.attributes.len()
            ));
            let rows: Vec<AttributeRow> = result
                .attributes
                .into_iter()
                .map(|(name, values)| AttributeRow { name, values })
                .collect();
            output(&rows, format)
        }
        OutputFormat::Json => crate::output::output_json(&result),
    }
}

fn read_input(file: Option<&Path>) -> crate::CliResult<Vec<u8>> {
    match file {
        Some(path) => Ok(std::fs::read(path)?),
        None => {
            let mut buffer = Vec::new();
            std::io::stdin().read_to_end(&mut buffer)?;
            Ok(buffer)
        }
    }
}
