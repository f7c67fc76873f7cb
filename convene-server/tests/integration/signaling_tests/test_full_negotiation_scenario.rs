use convene_core::{
    ClientMessage, IceCandidate, MemberId, MemberInfo, ServerMessage, SessionDescription,
};

use crate::integration::init_tracing;
use crate::utils::{SILENCE_MS, TestClient, spawn_server};

#[tokio::test]
async fn test_full_negotiation_scenario() {
    init_tracing();

    let (addr, _state) = spawn_server().await.expect("Failed to start server");

    let mut a = TestClient::connect(addr, "a").await.unwrap();
    let mut b = TestClient::connect(addr, "b").await.unwrap();
    let mut c = TestClient::connect(addr, "c").await.unwrap();

    a.join("R").await.unwrap();
    assert_eq!(
        a.recv().await.unwrap(),
        ServerMessage::ExistingMembers { members: vec![] }
    );

    b.join("R").await.unwrap();
    assert_eq!(
        b.recv().await.unwrap(),
        ServerMessage::ExistingMembers {
            members: vec![MemberInfo {
                member_id: MemberId::from("a"),
                display_name: "A".to_string(),
            }]
        }
    );
    assert_eq!(
        a.recv().await.unwrap(),
        ServerMessage::MemberJoined {
            member_id: MemberId::from("b"),
            display_name: "B".to_string(),
        }
    );

    c.join("R").await.unwrap();
    c.recv().await.unwrap();
    a.recv().await.unwrap();
    b.recv().await.unwrap();

    a.send(&ClientMessage::Offer {
        description: SessionDescription::offer("offer-sdp"),
        target: MemberId::from("b"),
    })
    .await
    .unwrap();
    a.send(&ClientMessage::IceCandidate {
        candidate: IceCandidate::new("candidate:a1"),
        target: MemberId::from("b"),
    })
    .await
    .unwrap();

    assert_eq!(
        b.recv().await.unwrap(),
        ServerMessage::Offer {
            description: SessionDescription::offer("offer-sdp"),
            from: MemberId::from("a"),
        }
    );
    assert_eq!(
        b.recv().await.unwrap(),
        ServerMessage::IceCandidate {
            candidate: IceCandidate::new("candidate:a1"),
            from: MemberId::from("a"),
        }
    );

    b.send(&ClientMessage::Answer {
        description: SessionDescription::answer("answer-sdp"),
        target: MemberId::from("a"),
    })
    .await
    .unwrap();

    assert_eq!(
        a.recv().await.unwrap(),
        ServerMessage::Answer {
            description: SessionDescription::answer("answer-sdp"),
            from: MemberId::from("b"),
        }
    );

    c.expect_silence(SILENCE_MS)
        .await
        .expect("Direct messages must not leak to other members");

    a.close().await.unwrap();

    assert_eq!(
        b.recv().await.unwrap(),
        ServerMessage::MemberLeft {
            member_id: MemberId::from("a")
        }
    );
}
