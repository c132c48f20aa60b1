//! HTTP server.

use sporto_core::SpConfig;
use sporto_saml::endpoints::{saml_router, SamlState};
use sporto_saml::ServiceProvider;

use crate::cli::ServeArgs;
use crate::output::info;

/// Serves the login and ACS endpoints until interrupted.
pub async fn run_serve(args: ServeArgs, config: &SpConfig) -> crate::CliResult<()> {
    let sp = ServiceProvider::new(config)?;
    let app = saml_router().with_state(SamlState::new(sp));

    let listener = tokio::net::TcpListener::bind(args.bind.as_str()).await?;
    let address = listener.local_addr()?;
    info(&format!("listening on http://{address}"));
    tracing::info!(%address, entity_id = %config.entityid, "sporto SP listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown requested");
}
