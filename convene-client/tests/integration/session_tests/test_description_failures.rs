use convene_client::{CandidateDisposition, NegotiationPhase, PeerSession, Role, SessionError};
use convene_core::{IceCandidate, MemberId, SessionDescription};

use crate::utils::{MALFORMED_SDP, MockTransport, added_candidates};

#[tokio::test]
async fn test_malformed_offer_fails_session_permanently() {
    let (transport, calls) = MockTransport::new("a", "b");
    let mut session = PeerSession::new(MemberId::from("b"), Role::Responder, Box::new(transport));
    session
        .add_remote_candidate(IceCandidate::new("candidate:queued"))
        .await;

    let err = session
        .receive_offer(SessionDescription::offer(MALFORMED_SDP))
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::DescriptionRejected(_)));
    assert!(err.is_fatal());
    assert_eq!(session.phase(), NegotiationPhase::Failed);
    assert_eq!(session.pending_candidates(), 0);

    let retry = session
        .receive_offer(SessionDescription::offer("valid"))
        .await
        .unwrap_err();
    assert!(matches!(retry, SessionError::WrongState { .. }));

    let late = session
        .add_remote_candidate(IceCandidate::new("candidate:late"))
        .await;
    assert_eq!(late, CandidateDisposition::Discarded);
    assert!(added_candidates(&calls.lock().await).is_empty());
}

#[tokio::test]
async fn test_malformed_answer_fails_initiator() {
    let (transport, _calls) = MockTransport::new("a", "b");
    let mut session = PeerSession::new(MemberId::from("b"), Role::Initiator, Box::new(transport));
    session.create_offer().await.unwrap();

    let err = session
        .receive_answer(SessionDescription::answer(MALFORMED_SDP))
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert_eq!(session.phase(), NegotiationPhase::Failed);
    assert!(session.remote_description().is_none());
}
