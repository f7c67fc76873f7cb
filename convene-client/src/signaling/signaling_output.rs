use crate::error::SignalingError;
use async_trait::async_trait;
use convene_core::{ClientMessage, IceCandidate, MemberId, SessionDescription};

/// Outbound half of the relay connection, as seen by the session manager.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    async fn send(&self, msg: ClientMessage) -> Result<(), SignalingError>;

    async fn send_offer(
        &self,
        target: MemberId,
        description: SessionDescription,
    ) -> Result<(), SignalingError> {
        self.send(ClientMessage::Offer {
            description,
            target,
        })
        .await
    }

    async fn send_answer(
        &self,
        target: MemberId,
        description: SessionDescription,
    ) -> Result<(), SignalingError> {
        self.send(ClientMessage::Answer {
            description,
            target,
        })
        .await
    }

    async fn send_ice(
        &self,
        target: MemberId,
        candidate: IceCandidate,
    ) -> Result<(), SignalingError> {
        self.send(ClientMessage::IceCandidate { candidate, target })
            .await
    }
}
