// WebSocket handler - one live query loop per connection
use crate::presentation::app_state::AppState;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use std::sync::Arc;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Answers queries in the order they arrive until either side closes
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>) {
    tracing::debug!("Query connection opened");

    while let Some(msg) = socket.recv().await {
        let text = match msg {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                tracing::debug!("Query connection error: {}", e);
                break;
            }
        };

        let Some(reply) = state.query_service.respond(&text) else {
            continue;
        };
        if socket.send(Message::Text(reply.encode())).await.is_err() {
            break;
        }
    }

    tracing::debug!("Query connection closed");
}
