use axum::extract::State;
use convene_core::{ClientMessage, ConnectionId, IceServerConfig, MemberId, RoomId};
use convene_server::{AppState, ServerConfig, config_handler, health_handler};
use std::sync::Arc;

#[tokio::test]
async fn test_health_reports_rooms_and_connections() {
    let state = Arc::new(AppState::new(ServerConfig::default()));

    let conn = ConnectionId::new();
    let _rx = state.relay.attach(conn);
    state
        .relay
        .handle(
            conn,
            ClientMessage::JoinRoom {
                room_id: RoomId::from("R"),
                member_id: MemberId::from("a"),
                display_name: "A".to_string(),
            },
        )
        .unwrap();
    let _idle = state.relay.attach(ConnectionId::new());

    let report = health_handler(State(state.clone())).await.0;

    assert_eq!(report.status, "ok");
    assert_eq!(report.rooms, 1);
    assert_eq!(report.connections, 2);
    assert!(report.uptime >= 0.0);
}

#[tokio::test]
async fn test_config_never_exposes_turn_credentials() {
    let config = ServerConfig {
        ice_servers: vec![IceServerConfig {
            urls: vec!["turn:turn.example.org:3478".to_string()],
            username: Some("user".to_string()),
            credential: Some("secret".to_string()),
        }],
        ..ServerConfig::default()
    };
    let state = Arc::new(AppState::new(config));

    let public = config_handler(State(state)).await.0;

    assert_eq!(public.ice_servers.len(), 1);
    assert_eq!(public.ice_servers[0].urls, vec!["turn:turn.example.org:3478"]);
    assert!(public.ice_servers[0].username.is_none());
    assert!(public.ice_servers[0].credential.is_none());
}
