use std::fmt;

/// Which side creates the offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The local member was already in the room and saw the remote join live.
    Initiator,
    /// The remote member was in the membership snapshot; it sends the offer.
    Responder,
}

/// Explicit negotiation state of one peer session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationPhase {
    Idle,
    OfferSent,
    OfferReceived,
    Stable,
    /// A description was rejected. Terminal until the member leaves.
    Failed,
}

impl fmt::Display for NegotiationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NegotiationPhase::Idle => "idle",
            NegotiationPhase::OfferSent => "offer-sent",
            NegotiationPhase::OfferReceived => "offer-received",
            NegotiationPhase::Stable => "stable",
            NegotiationPhase::Failed => "failed",
        };
        f.write_str(name)
    }
}
