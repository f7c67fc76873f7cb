use crate::error::SignalingError;
use crate::session::ManagerInput;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use convene_core::{ClientMessage, ServerMessage};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{error, info, warn};

/// WebSocket connection to the relay.
///
/// Outbound frames are encoded in `send` and queued on an unbounded FIFO
/// drained by one writer task, so they leave in the order the manager
/// produced them. Inbound frames are pushed into the manager's inbox in
/// arrival order.
#[derive(Clone)]
pub struct WsSignalingClient {
    tx: mpsc::UnboundedSender<String>,
}

impl WsSignalingClient {
    pub async fn connect(
        url: &str,
        inbox: mpsc::Sender<ManagerInput>,
    ) -> Result<Self, SignalingError> {
        info!("Connecting to signaling server: {}", url);

        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| SignalingError::ConnectionFailed(e.to_string()))?;

        let (mut write, mut read) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();

        tokio::spawn(async move {
            while let Some(json) = rx.recv().await {
                if let Err(e) = write.send(Message::Text(json)).await {
                    error!("Failed to write to signaling socket: {}", e);
                    break;
                }
            }
            let _ = write.close().await;
        });

        tokio::spawn(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                        Ok(msg) => {
                            if inbox.send(ManagerInput::Server(msg)).await.is_err() {
                                return;
                            }
                        }
                        Err(e) => warn!("Invalid ServerMessage: {:?}", e),
                    },
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Signaling socket error: {}", e);
                        break;
                    }
                }
            }

            info!("Signaling connection closed");
            let _ = inbox.send(ManagerInput::SignalingClosed).await;
        });

        Ok(Self { tx })
    }
}

#[async_trait]
impl SignalingOutput for WsSignalingClient {
    async fn send(&self, msg: ClientMessage) -> Result<(), SignalingError> {
        let json =
            serde_json::to_string(&msg).map_err(|e| SignalingError::Encode(e.to_string()))?;
        self.tx.send(json).map_err(|_| SignalingError::NotConnected)
    }
}
