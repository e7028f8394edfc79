//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::{WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::StreamExt;

use super::connection::WsConnection;
use super::session::run_session;
use crate::app_state::AppState;

/// `GET /ws`: Upgrade HTTP connection to WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_socket(socket, state))
}

/// Splits an upgraded socket and drives its session to completion.
async fn serve_socket(socket: WebSocket, state: AppState) {
    let (sink, stream) = socket.split();
    let connection = Arc::new(WsConnection::new(sink));
    let _ = run_session(
        connection,
        stream,
        &state.router,
        &state.registry,
        state.shutdown.subscribe(),
    )
    .await;
}
