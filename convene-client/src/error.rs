use crate::session::NegotiationPhase;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Protocol violation. The message is discarded and the session is untouched.
    #[error("{event} not accepted in phase {phase}")]
    WrongState {
        event: &'static str,
        phase: NegotiationPhase,
    },

    /// The media transport refused a description. Fatal to the session.
    #[error("session description rejected: {0}")]
    DescriptionRejected(String),
}

impl SessionError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, SessionError::DescriptionRejected(_))
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignalingError {
    #[error("WebSocket connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not connected to signaling server")]
    NotConnected,

    #[error("Failed to encode message: {0}")]
    Encode(String),
}
