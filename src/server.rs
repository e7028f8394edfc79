//! HTTP/WebSocket server assembly and lifecycle.

use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::AppState;
use crate::ws::handler::ws_handler;

/// Builds the full application router: REST endpoints, API docs and the
/// `/ws` upgrade route.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Serves `state` on `listener` until its shutdown signal fires.
///
/// Once the listener stops, open sessions close their sockets and
/// deregister. Waits at most `grace` for the registry to drain.
///
/// # Errors
///
/// Returns an I/O error if the server fails while accepting connections.
pub async fn serve(listener: TcpListener, state: AppState, grace: Duration) -> std::io::Result<()> {
    let registry = std::sync::Arc::clone(&state.registry);
    let mut stop = state.shutdown.subscribe();
    let app = build_app(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move { stop.wait().await })
        .await?;

    match tokio::time::timeout(grace, registry.wait_until_empty()).await {
        Ok(()) => tracing::info!("all sessions closed"),
        Err(_) => tracing::warn!(
            remaining = registry.len(),
            "sessions still open after shutdown grace period"
        ),
    }
    Ok(())
}
