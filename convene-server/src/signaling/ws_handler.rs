use crate::api::AppState;
use crate::signaling::SignalingRelay;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use convene_core::{ClientMessage, ConnectionId};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let relay = state.relay.clone();

    ws.on_upgrade(move |socket| handle_socket(socket, relay))
}

async fn handle_socket(socket: WebSocket, relay: SignalingRelay) {
    let conn = ConnectionId::new();
    info!("New WebSocket connection: {}", conn);

    let (mut sender, mut receiver) = socket.split();
    let mut rx = relay.attach(conn);

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize server message: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let relay = relay.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => {
                        match serde_json::from_str::<ClientMessage>(text.as_str()) {
                            Ok(signal) => {
                                if let Err(e) = relay.handle(conn, signal) {
                                    warn!("Rejected frame from {}: {}", conn, e);
                                    relay.reply_error(conn, &e);
                                }
                            }
                            Err(e) => warn!("Invalid ClientMessage from {}: {:?}", conn, e),
                        }
                    }
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    // The aborted task must have stopped before detach, or a frame it is
    // still handling could register the member after eviction.
    tokio::select! {
        _ = (&mut send_task) => {
            recv_task.abort();
            let _ = recv_task.await;
        }
        _ = (&mut recv_task) => {
            send_task.abort();
            let _ = send_task.await;
        }
    };

    relay.detach(conn);
    info!("WebSocket disconnected: {}", conn);
}
