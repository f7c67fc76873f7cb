use crate::transport::TransportEvent;
use anyhow::Result;
use async_trait::async_trait;
use convene_core::{IceCandidate, IceServerConfig, MemberId, SessionDescription};
use tokio::sync::mpsc;

/// The black box that carries media once a direct path exists.
///
/// One instance per remote member. Gathered local candidates and connection
/// state changes are reported through the event channel handed to the
/// factory.
#[async_trait]
pub trait MediaTransport: Send + Sync {
    async fn create_offer(&self) -> Result<SessionDescription>;

    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn set_local_description(&self, description: &SessionDescription) -> Result<()>;

    async fn set_remote_description(&self, description: &SessionDescription) -> Result<()>;

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<()>;

    /// Releases the underlying resources. Must not block on the network.
    async fn close(&self) -> Result<()>;
}

#[async_trait]
pub trait MediaTransportFactory: Send + Sync {
    async fn create(
        &self,
        remote: &MemberId,
        ice_servers: &[IceServerConfig],
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn MediaTransport>>;
}
