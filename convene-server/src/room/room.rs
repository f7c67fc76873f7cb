use crate::room::member::Member;
use convene_core::{MemberId, RoomId};
use std::collections::HashMap;

/// Membership of one room.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    members: HashMap<MemberId, Member>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            members: HashMap::new(),
        }
    }

    pub fn get(&self, member_id: &MemberId) -> Option<&Member> {
        self.members.get(member_id)
    }

    /// Inserts or replaces the record, returning the one it displaced.
    pub fn insert(&mut self, member: Member) -> Option<Member> {
        self.members.insert(member.member_id.clone(), member)
    }

    pub fn remove(&mut self, member_id: &MemberId) -> Option<Member> {
        self.members.remove(member_id)
    }

    /// Every member except `member_id`.
    pub fn others(&self, member_id: &MemberId) -> Vec<Member> {
        self.members
            .values()
            .filter(|m| &m.member_id != member_id)
            .cloned()
            .collect()
    }

    pub fn members(&self) -> Vec<Member> {
        self.members.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
