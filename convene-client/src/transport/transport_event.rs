use convene_core::{IceCandidate, MemberId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// Events a media transport reports back to the session manager.
#[derive(Debug, Clone)]
pub enum TransportEvent {
    CandidateGathered(MemberId, IceCandidate),
    StateChanged(MemberId, ConnectionState),
}
