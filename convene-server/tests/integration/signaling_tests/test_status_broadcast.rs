use convene_core::{ClientMessage, MemberId, ServerMessage, SessionDescription, StatusKind};

use crate::integration::init_tracing;
use crate::utils::{TestClient, spawn_server};

#[tokio::test]
async fn test_toggle_audio_twice_reaches_everyone_else() {
    init_tracing();

    let (addr, _state) = spawn_server().await.expect("Failed to start server");

    let mut a = TestClient::connect(addr, "a").await.unwrap();
    let mut b = TestClient::connect(addr, "b").await.unwrap();
    let mut c = TestClient::connect(addr, "c").await.unwrap();

    a.join("R").await.unwrap();
    a.recv().await.unwrap();
    b.join("R").await.unwrap();
    b.recv().await.unwrap();
    a.recv().await.unwrap();
    c.join("R").await.unwrap();
    c.recv().await.unwrap();
    a.recv().await.unwrap();
    b.recv().await.unwrap();

    for _ in 0..2 {
        a.send(&ClientMessage::ToggleAudio { muted: true })
            .await
            .unwrap();
    }

    let expected = ServerMessage::MemberStatus {
        member_id: MemberId::from("a"),
        kind: StatusKind::AudioMuted,
        enabled: true,
    };
    for receiver in [&mut b, &mut c] {
        assert_eq!(receiver.recv().await.unwrap(), expected);
        assert_eq!(receiver.recv().await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_relay_before_join_gets_local_error() {
    init_tracing();

    let (addr, _state) = spawn_server().await.expect("Failed to start server");
    let mut a = TestClient::connect(addr, "a").await.unwrap();

    a.send(&ClientMessage::Offer {
        description: SessionDescription::offer("sdp"),
        target: MemberId::from("b"),
    })
    .await
    .unwrap();

    assert!(matches!(
        a.recv().await.unwrap(),
        ServerMessage::Error { .. }
    ));
}
