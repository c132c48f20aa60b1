//! # sporto
//!
//! Command-line front end for the sporto service provider.

#![forbid(unsafe_code)]

use clap::Parser;
use sporto_cli::{
    cli::{Cli, Command},
    commands::{run_config, run_request, run_response, run_serve},
    output::error,
};
use sporto_core::SpConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| default_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = match SpConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            error(&format!("Failed to load configuration: {}", e));
            std::process::exit(1);
        }
    };

    // Execute command
    let result = match cli.command {
        Command::Request(args) => run_request(args, &config, cli.output),
        Command::Response(args) => run_response(args, &config, cli.output),
        Command::Serve(args) => run_serve(args, &config).await,
        Command::Config(cmd) => run_config(cmd, &config, cli.config.as_deref(), cli.output),
    };

    if let Err(e) = result {
        error(&e.to_string());
        std::process::exit(1);
    }
}
