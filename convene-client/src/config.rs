use convene_core::{MemberId, RoomId};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Relay WebSocket endpoint, e.g. `ws://localhost:3001/ws`.
    pub server_url: String,
    pub room_id: RoomId,
    pub member_id: MemberId,
    pub display_name: String,
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>, room_id: RoomId, display_name: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            room_id,
            member_id: MemberId::new(Uuid::new_v4().to_string()),
            display_name: display_name.into(),
        }
    }

    pub fn with_member_id(mut self, member_id: MemberId) -> Self {
        self.member_id = member_id;
        self
    }
}
