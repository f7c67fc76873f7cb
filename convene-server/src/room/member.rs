use convene_core::{ConnectionId, MemberId, MemberInfo};

/// A participant registered in one room. Never mutated after creation;
/// a reconnect replaces the whole record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    pub member_id: MemberId,
    pub display_name: String,
    pub address: ConnectionId,
}

impl Member {
    pub fn new(member_id: MemberId, display_name: impl Into<String>, address: ConnectionId) -> Self {
        Self {
            member_id,
            display_name: display_name.into(),
            address,
        }
    }

    pub fn info(&self) -> MemberInfo {
        MemberInfo {
            member_id: self.member_id.clone(),
            display_name: self.display_name.clone(),
        }
    }
}
