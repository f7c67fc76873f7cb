use crate::room::{Member, Room};
use convene_core::{ConnectionId, MemberId, RoomId};
use dashmap::DashMap;
use tracing::{debug, info};

/// Result of registering a member in a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JoinOutcome {
    /// New member. `existing` is the membership before the call.
    Joined { existing: Vec<Member> },
    /// Same identity already registered at the same address; nothing changed.
    Duplicate { existing: Vec<Member> },
    /// Same identity registered from a new address. The old record was replaced.
    Rebound {
        existing: Vec<Member>,
        previous: ConnectionId,
    },
}

impl JoinOutcome {
    pub fn existing(&self) -> &[Member] {
        match self {
            JoinOutcome::Joined { existing }
            | JoinOutcome::Duplicate { existing }
            | JoinOutcome::Rebound { existing, .. } => existing,
        }
    }
}

/// Room identifier to membership map.
///
/// Every mutation holds the room's map entry for its whole duration, so
/// operations on one room are serialized while different rooms proceed
/// independently. A room exists exactly while it has at least one member.
#[derive(Default)]
pub struct RoomRegistry {
    rooms: DashMap<RoomId, Room>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
        }
    }

    pub fn join(&self, room_id: &RoomId, member: Member) -> JoinOutcome {
        let mut room = self.rooms.entry(room_id.clone()).or_insert_with(|| {
            info!("Creating new room: {}", room_id);
            Room::new(room_id.clone())
        });

        let existing = room.others(&member.member_id);

        let outcome = match room.get(&member.member_id) {
            Some(current) if current.address == member.address => {
                return JoinOutcome::Duplicate { existing };
            }
            Some(current) => JoinOutcome::Rebound {
                existing,
                previous: current.address,
            },
            None => JoinOutcome::Joined { existing },
        };

        debug!(
            "Member {} registered in room {} at {}",
            member.member_id, room_id, member.address
        );
        room.insert(member);
        outcome
    }

    /// Removes `member_id` regardless of its address.
    pub fn leave(&self, room_id: &RoomId, member_id: &MemberId) -> Option<Member> {
        let removed = {
            let mut room = self.rooms.get_mut(room_id)?;
            room.remove(member_id)
        };
        self.drop_if_empty(room_id);
        removed
    }

    /// Removes `member_id` only while it is still bound to `address`.
    ///
    /// Returns the remaining members, or `None` when nothing was removed
    /// (unknown room, unknown member, or the identity has since been rebound
    /// to another connection).
    pub fn evict(
        &self,
        room_id: &RoomId,
        member_id: &MemberId,
        address: ConnectionId,
    ) -> Option<Vec<Member>> {
        let remaining = {
            let mut room = self.rooms.get_mut(room_id)?;
            if room.get(member_id)?.address != address {
                return None;
            }
            room.remove(member_id);
            room.members()
        };
        self.drop_if_empty(room_id);
        Some(remaining)
    }

    pub fn lookup(&self, room_id: &RoomId, member_id: &MemberId) -> Option<ConnectionId> {
        self.rooms
            .get(room_id)
            .and_then(|room| room.get(member_id).map(|m| m.address))
    }

    pub fn members(&self, room_id: &RoomId) -> Vec<Member> {
        self.rooms
            .get(room_id)
            .map(|room| room.members())
            .unwrap_or_default()
    }

    pub fn contains_room(&self, room_id: &RoomId) -> bool {
        self.rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn member_count(&self) -> usize {
        self.rooms.iter().map(|room| room.len()).sum()
    }

    fn drop_if_empty(&self, room_id: &RoomId) {
        if let Some((_, room)) = self.rooms.remove_if(room_id, |_, room| room.is_empty()) {
            info!("Room {} is empty, removing", room.id);
        }
    }
}
