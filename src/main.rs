//! exchange-relay server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints and stops
//! it gracefully on Ctrl-C or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use exchange_relay::app_state::AppState;
use exchange_relay::config::{LogFormat, RelayConfig};
use exchange_relay::server;
use exchange_relay::service::RateLookupClient;
use exchange_relay::shutdown::Shutdown;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env().context("loading configuration")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, api = %config.rates_api_url, "starting exchange-relay");

    // Build service layer
    let rates = Arc::new(
        RateLookupClient::new(&config.rates_api_url, config.rates_request_timeout)
            .context("building rate client")?,
    );

    // Build application state
    let app_state = AppState::new(rates, &config);
    tokio::spawn(watch_signals(app_state.shutdown.clone()));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    server::serve(listener, app_state, config.shutdown_grace).await?;
    tracing::info!("server stopped");

    Ok(())
}

/// Triggers `shutdown` on the first Ctrl-C or SIGTERM.
async fn watch_signals(shutdown: Shutdown) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
    tracing::info!("shutdown signal received");
    shutdown.trigger();
}
