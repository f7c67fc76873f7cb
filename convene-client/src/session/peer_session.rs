use crate::error::SessionError;
use crate::session::{CandidateQueue, NegotiationPhase, Role};
use crate::transport::MediaTransport;
use convene_core::{IceCandidate, MemberId, SessionDescription};
use tracing::{debug, info, warn};

/// What happened to a remote candidate handed to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateDisposition {
    Applied,
    Queued,
    /// The transport refused it. The session carries on.
    Rejected,
    /// The session has failed; nothing is applied any more.
    Discarded,
}

/// Negotiation state machine for one remote member.
///
/// Every transition is guarded by the current phase and applied as a single
/// update; callers must deliver events to one session one at a time.
pub struct PeerSession {
    remote: MemberId,
    role: Role,
    phase: NegotiationPhase,
    local_description: Option<SessionDescription>,
    remote_description: Option<SessionDescription>,
    pending: CandidateQueue,
    transport: Box<dyn MediaTransport>,
}

impl PeerSession {
    pub fn new(remote: MemberId, role: Role, transport: Box<dyn MediaTransport>) -> Self {
        Self {
            remote,
            role,
            phase: NegotiationPhase::Idle,
            local_description: None,
            remote_description: None,
            pending: CandidateQueue::new(),
            transport,
        }
    }

    pub fn remote(&self) -> &MemberId {
        &self.remote
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn phase(&self) -> NegotiationPhase {
        self.phase
    }

    pub fn local_description(&self) -> Option<&SessionDescription> {
        self.local_description.as_ref()
    }

    pub fn remote_description(&self) -> Option<&SessionDescription> {
        self.remote_description.as_ref()
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending.len()
    }

    /// `idle -> offer-sent`, initiator only. Returns the offer to relay.
    pub async fn create_offer(&mut self) -> Result<SessionDescription, SessionError> {
        if self.role != Role::Initiator || self.phase != NegotiationPhase::Idle {
            return Err(SessionError::WrongState {
                event: "create-offer",
                phase: self.phase,
            });
        }

        let offer = match self.transport.create_offer().await {
            Ok(offer) => offer,
            Err(e) => return Err(self.fail(e)),
        };
        if let Err(e) = self.transport.set_local_description(&offer).await {
            return Err(self.fail(e));
        }

        self.local_description = Some(offer.clone());
        self.phase = NegotiationPhase::OfferSent;
        Ok(offer)
    }

    /// `offer-sent -> stable`. Any other phase leaves the session untouched.
    pub async fn receive_answer(
        &mut self,
        answer: SessionDescription,
    ) -> Result<(), SessionError> {
        if self.phase != NegotiationPhase::OfferSent {
            return Err(SessionError::WrongState {
                event: "answer",
                phase: self.phase,
            });
        }

        if let Err(e) = self.transport.set_remote_description(&answer).await {
            return Err(self.fail(e));
        }

        self.remote_description = Some(answer);
        self.phase = NegotiationPhase::Stable;
        self.replay_pending().await;
        Ok(())
    }

    /// `idle -> offer-received -> stable`. Returns the answer to relay.
    ///
    /// The first offer wins: a session that has already left `idle` refuses
    /// any further offer.
    pub async fn receive_offer(
        &mut self,
        offer: SessionDescription,
    ) -> Result<SessionDescription, SessionError> {
        if self.phase != NegotiationPhase::Idle {
            return Err(SessionError::WrongState {
                event: "offer",
                phase: self.phase,
            });
        }
        self.phase = NegotiationPhase::OfferReceived;

        if let Err(e) = self.transport.set_remote_description(&offer).await {
            return Err(self.fail(e));
        }
        self.remote_description = Some(offer);
        self.replay_pending().await;

        let answer = match self.transport.create_answer().await {
            Ok(answer) => answer,
            Err(e) => return Err(self.fail(e)),
        };
        if let Err(e) = self.transport.set_local_description(&answer).await {
            return Err(self.fail(e));
        }

        self.local_description = Some(answer.clone());
        self.phase = NegotiationPhase::Stable;
        Ok(answer)
    }

    /// Applies the candidate when a remote description is in place,
    /// otherwise queues it.
    pub async fn add_remote_candidate(&mut self, candidate: IceCandidate) -> CandidateDisposition {
        if self.phase == NegotiationPhase::Failed {
            return CandidateDisposition::Discarded;
        }

        if self.remote_description.is_none() {
            debug!(
                "Queuing candidate from {} (remote description not ready)",
                self.remote
            );
            self.pending.push(candidate);
            return CandidateDisposition::Queued;
        }

        match self.transport.add_ice_candidate(&candidate).await {
            Ok(()) => CandidateDisposition::Applied,
            Err(e) => {
                warn!("Failed to add candidate from {}: {:?}", self.remote, e);
                CandidateDisposition::Rejected
            }
        }
    }

    /// Discards queued candidates and releases the transport.
    pub async fn close(&mut self) {
        self.pending.clear();
        if let Err(e) = self.transport.close().await {
            warn!("Failed to close transport for {}: {:?}", self.remote, e);
        }
    }

    async fn replay_pending(&mut self) {
        let queued = self.pending.drain();
        if queued.is_empty() {
            return;
        }

        info!(
            "Processing {} queued candidates for {}",
            queued.len(),
            self.remote
        );
        for candidate in queued {
            if let Err(e) = self.transport.add_ice_candidate(&candidate).await {
                warn!("Failed to add queued candidate for {}: {:?}", self.remote, e);
            }
        }
    }

    fn fail(&mut self, err: anyhow::Error) -> SessionError {
        warn!("Negotiation with {} failed: {:?}", self.remote, err);
        self.phase = NegotiationPhase::Failed;
        self.pending.clear();
        SessionError::DescriptionRejected(err.to_string())
    }
}
