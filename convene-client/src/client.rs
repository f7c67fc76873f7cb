use crate::config::ClientConfig;
use crate::error::SignalingError;
use crate::session::{PeerSessionManager, SessionManagerHandle, SessionObserver};
use crate::signaling::WsSignalingClient;
use crate::transport::MediaTransportFactory;
use convene_core::MemberInfo;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A running client: the manager's event loop plus the handle that feeds it.
pub struct ConveneClient {
    pub handle: SessionManagerHandle,
    pub task: JoinHandle<()>,
}

impl ConveneClient {
    /// Connects to the relay, starts the session manager and joins the
    /// configured room.
    pub async fn connect(
        config: ClientConfig,
        factory: Arc<dyn MediaTransportFactory>,
        observer: Box<dyn SessionObserver>,
    ) -> Result<Self, SignalingError> {
        let (inbox_tx, inbox_rx) = mpsc::channel(256);

        let signaling = WsSignalingClient::connect(&config.server_url, inbox_tx.clone()).await?;

        let manager = PeerSessionManager::new(
            MemberInfo {
                member_id: config.member_id.clone(),
                display_name: config.display_name.clone(),
            },
            Arc::new(signaling),
            factory,
            observer,
            inbox_rx,
        );
        let task = tokio::spawn(manager.run());

        let handle = SessionManagerHandle::new(inbox_tx);
        if !handle.join(config.room_id).await {
            return Err(SignalingError::NotConnected);
        }

        Ok(Self { handle, task })
    }

    /// Leaves the room and waits for the event loop to finish.
    pub async fn shutdown(self) {
        self.handle.shutdown().await;
        let _ = self.task.await;
    }
}
