use crate::model::member::{MemberId, MemberInfo};
use crate::model::room::RoomId;
use crate::model::session::{IceCandidate, SessionDescription};
use crate::model::status::StatusKind;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }

    /// Copy with credentials stripped, safe to hand to anonymous callers.
    pub fn public(&self) -> Self {
        Self {
            urls: self.urls.clone(),
            username: None,
            credential: None,
        }
    }
}

/// Frames a client sends to the relay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ClientMessage {
    JoinRoom {
        room_id: RoomId,
        member_id: MemberId,
        display_name: String,
    },
    LeaveRoom,
    Offer {
        description: SessionDescription,
        target: MemberId,
    },
    Answer {
        description: SessionDescription,
        target: MemberId,
    },
    IceCandidate {
        candidate: IceCandidate,
        target: MemberId,
    },
    ToggleAudio {
        muted: bool,
    },
    ToggleVideo {
        video_off: bool,
    },
    ScreenShareStarted {
        #[serde(default)]
        member_id: Option<MemberId>,
    },
    ScreenShareStopped {
        #[serde(default)]
        member_id: Option<MemberId>,
    },
}

/// Frames the relay sends to a client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "op", content = "d", rename_all = "kebab-case")]
pub enum ServerMessage {
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    ExistingMembers {
        members: Vec<MemberInfo>,
    },
    MemberJoined {
        member_id: MemberId,
        display_name: String,
    },
    MemberLeft {
        member_id: MemberId,
    },
    Offer {
        description: SessionDescription,
        from: MemberId,
    },
    Answer {
        description: SessionDescription,
        from: MemberId,
    },
    IceCandidate {
        candidate: IceCandidate,
        from: MemberId,
    },
    MemberStatus {
        member_id: MemberId,
        kind: StatusKind,
        enabled: bool,
    },
    Error {
        reason: String,
    },
}
