use crate::room::{JoinOutcome, Member, RoomRegistry};
use crate::signaling::RelayError;
use convene_core::{
    ClientMessage, ConnectionId, IceServerConfig, MemberId, RoomId, ServerMessage, StatusKind,
};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Binding {
    room_id: RoomId,
    member_id: MemberId,
}

struct ConnectionHandle {
    tx: mpsc::UnboundedSender<ServerMessage>,
    binding: Option<Binding>,
}

struct RelayInner {
    connections: DashMap<ConnectionId, ConnectionHandle>,
    registry: RoomRegistry,
    ice_servers: Vec<IceServerConfig>,
}

/// Routes signaling frames between the members of a room.
///
/// Each connection owns an unbounded FIFO outbound queue. A sender's frames
/// are routed in the order its socket delivered them, so everything one
/// member sends to another arrives in send order. Delivery is fire and
/// forget: an unknown destination is dropped, a closed destination queue is
/// handled as that destination disconnecting.
#[derive(Clone)]
pub struct SignalingRelay {
    inner: Arc<RelayInner>,
}

impl SignalingRelay {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                connections: DashMap::new(),
                registry: RoomRegistry::new(),
                ice_servers,
            }),
        }
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.inner.registry
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn room_count(&self) -> usize {
        self.inner.registry.room_count()
    }

    /// Registers a new connection and returns its outbound queue. The ICE
    /// configuration is the first frame on every connection.
    pub fn attach(&self, conn: ConnectionId) -> mpsc::UnboundedReceiver<ServerMessage> {
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(ServerMessage::IceConfig {
            ice_servers: self.inner.ice_servers.clone(),
        });
        self.inner
            .connections
            .insert(conn, ConnectionHandle { tx, binding: None });
        info!("Connection {} attached", conn);
        rx
    }

    /// Drops the connection and evicts whatever member it was bound to.
    pub fn detach(&self, conn: ConnectionId) {
        let mut failed = Vec::new();
        self.disconnect(conn, &mut failed);
        self.drain_failures(failed);
    }

    pub fn handle(&self, conn: ConnectionId, msg: ClientMessage) -> Result<(), RelayError> {
        let mut failed = Vec::new();
        let result = self.dispatch(conn, msg, &mut failed);
        self.drain_failures(failed);
        result
    }

    /// Sends a local error frame back to `conn` only.
    pub fn reply_error(&self, conn: ConnectionId, err: &RelayError) {
        let mut failed = Vec::new();
        self.deliver(
            conn,
            ServerMessage::Error {
                reason: err.to_string(),
            },
            &mut failed,
        );
        self.drain_failures(failed);
    }

    fn dispatch(
        &self,
        conn: ConnectionId,
        msg: ClientMessage,
        failed: &mut Vec<ConnectionId>,
    ) -> Result<(), RelayError> {
        match msg {
            ClientMessage::JoinRoom {
                room_id,
                member_id,
                display_name,
            } => self.join(conn, room_id, member_id, display_name, failed),

            ClientMessage::LeaveRoom => {
                self.leave(conn, failed);
                Ok(())
            }

            ClientMessage::Offer {
                description,
                target,
            } => self.route_direct(conn, &target, failed, |from| ServerMessage::Offer {
                description,
                from,
            }),

            ClientMessage::Answer {
                description,
                target,
            } => self.route_direct(conn, &target, failed, |from| ServerMessage::Answer {
                description,
                from,
            }),

            ClientMessage::IceCandidate { candidate, target } => {
                self.route_direct(conn, &target, failed, |from| ServerMessage::IceCandidate {
                    candidate,
                    from,
                })
            }

            ClientMessage::ToggleAudio { muted } => {
                self.route_status(conn, StatusKind::AudioMuted, muted, failed)
            }

            ClientMessage::ToggleVideo { video_off } => {
                self.route_status(conn, StatusKind::VideoOff, video_off, failed)
            }

            ClientMessage::ScreenShareStarted { .. } => {
                self.route_status(conn, StatusKind::ScreenSharing, true, failed)
            }

            ClientMessage::ScreenShareStopped { .. } => {
                self.route_status(conn, StatusKind::ScreenSharing, false, failed)
            }
        }
    }

    fn join(
        &self,
        conn: ConnectionId,
        room_id: RoomId,
        member_id: MemberId,
        display_name: String,
        failed: &mut Vec<ConnectionId>,
    ) -> Result<(), RelayError> {
        let current = self.binding_of(conn)?;
        let wanted = Binding {
            room_id: room_id.clone(),
            member_id: member_id.clone(),
        };
        if current.as_ref().is_some_and(|b| b != &wanted) {
            self.leave(conn, failed);
        }

        let member = Member::new(member_id.clone(), display_name.clone(), conn);
        let outcome = self
            .register(conn, wanted, member)
            .ok_or(RelayError::UnknownConnection)?;

        if let JoinOutcome::Duplicate { .. } = outcome {
            debug!("Member {} re-sent join for room {}, ignoring", member_id, room_id);
            return Ok(());
        }

        let existing = outcome.existing();
        let others: Vec<ConnectionId> = existing.iter().map(|m| m.address).collect();

        self.deliver(
            conn,
            ServerMessage::ExistingMembers {
                members: existing.iter().map(Member::info).collect(),
            },
            failed,
        );

        if let JoinOutcome::Rebound { previous, .. } = outcome {
            info!(
                "Member {} reconnected to room {} from a new connection",
                member_id, room_id
            );
            self.set_binding(previous, None);
            self.deliver_all(
                &others,
                ServerMessage::MemberLeft {
                    member_id: member_id.clone(),
                },
                failed,
            );
        } else {
            info!("Member {} ({}) joined room {}", display_name, member_id, room_id);
        }

        self.deliver_all(
            &others,
            ServerMessage::MemberJoined {
                member_id,
                display_name,
            },
            failed,
        );

        Ok(())
    }

    /// Records the member and binds `conn` to it. A connection detached
    /// between the registry insert and the bind is rolled back out of the
    /// registry, since no later disconnect could evict it.
    fn register(
        &self,
        conn: ConnectionId,
        binding: Binding,
        member: Member,
    ) -> Option<JoinOutcome> {
        let outcome = self.inner.registry.join(&binding.room_id, member);
        if let JoinOutcome::Duplicate { .. } = outcome {
            return Some(outcome);
        }

        let Binding { room_id, member_id } = binding.clone();
        if !self.set_binding(conn, Some(binding)) {
            debug!(
                "Connection {} closed while {} was joining {}, rolling back",
                conn, member_id, room_id
            );
            self.inner.registry.evict(&room_id, &member_id, conn);
            return None;
        }
        Some(outcome)
    }

    fn leave(&self, conn: ConnectionId, failed: &mut Vec<ConnectionId>) {
        let binding = self
            .inner
            .connections
            .get_mut(&conn)
            .and_then(|mut handle| handle.binding.take());

        if let Some(binding) = binding {
            self.evict(conn, binding, failed);
        }
    }

    fn disconnect(&self, conn: ConnectionId, failed: &mut Vec<ConnectionId>) {
        let Some((_, handle)) = self.inner.connections.remove(&conn) else {
            return;
        };
        info!("Connection {} detached", conn);

        if let Some(binding) = handle.binding {
            self.evict(conn, binding, failed);
        }
    }

    fn evict(&self, conn: ConnectionId, binding: Binding, failed: &mut Vec<ConnectionId>) {
        let Some(remaining) =
            self.inner
                .registry
                .evict(&binding.room_id, &binding.member_id, conn)
        else {
            return;
        };

        info!(
            "Member {} left room {}",
            binding.member_id, binding.room_id
        );

        let addresses: Vec<ConnectionId> = remaining.iter().map(|m| m.address).collect();
        self.deliver_all(
            &addresses,
            ServerMessage::MemberLeft {
                member_id: binding.member_id,
            },
            failed,
        );
    }

    fn route_direct<F>(
        &self,
        conn: ConnectionId,
        target: &MemberId,
        failed: &mut Vec<ConnectionId>,
        build: F,
    ) -> Result<(), RelayError>
    where
        F: FnOnce(MemberId) -> ServerMessage,
    {
        let binding = self.verified_binding(conn)?;

        let Some(address) = self.inner.registry.lookup(&binding.room_id, target) else {
            debug!(
                "Dropping message from {} to {}: not in room {}",
                binding.member_id, target, binding.room_id
            );
            return Ok(());
        };

        debug!("Routing {} -> {} in room {}", binding.member_id, target, binding.room_id);
        self.deliver(address, build(binding.member_id), failed);
        Ok(())
    }

    fn route_status(
        &self,
        conn: ConnectionId,
        kind: StatusKind,
        enabled: bool,
        failed: &mut Vec<ConnectionId>,
    ) -> Result<(), RelayError> {
        let binding = self.verified_binding(conn)?;
        self.route_broadcast(
            &binding,
            conn,
            ServerMessage::MemberStatus {
                member_id: binding.member_id.clone(),
                kind,
                enabled,
            },
            failed,
        );
        Ok(())
    }

    fn route_broadcast(
        &self,
        binding: &Binding,
        conn: ConnectionId,
        msg: ServerMessage,
        failed: &mut Vec<ConnectionId>,
    ) {
        let targets: Vec<ConnectionId> = self
            .inner
            .registry
            .members(&binding.room_id)
            .into_iter()
            .map(|m| m.address)
            .filter(|address| *address != conn)
            .collect();

        self.deliver_all(&targets, msg, failed);
    }

    fn binding_of(&self, conn: ConnectionId) -> Result<Option<Binding>, RelayError> {
        self.inner
            .connections
            .get(&conn)
            .map(|handle| handle.binding.clone())
            .ok_or(RelayError::UnknownConnection)
    }

    /// The connection's binding, checked against the registry so a
    /// superseded connection cannot speak for a rebound member.
    fn verified_binding(&self, conn: ConnectionId) -> Result<Binding, RelayError> {
        let binding = self.binding_of(conn)?.ok_or(RelayError::NotJoined)?;

        match self
            .inner
            .registry
            .lookup(&binding.room_id, &binding.member_id)
        {
            Some(address) if address == conn => Ok(binding),
            _ => Err(RelayError::BindingMismatch {
                room: binding.room_id,
                member: binding.member_id,
            }),
        }
    }

    /// Returns false when `conn` is no longer attached.
    fn set_binding(&self, conn: ConnectionId, binding: Option<Binding>) -> bool {
        match self.inner.connections.get_mut(&conn) {
            Some(mut handle) => {
                handle.binding = binding;
                true
            }
            None => false,
        }
    }

    fn deliver_all(
        &self,
        targets: &[ConnectionId],
        msg: ServerMessage,
        failed: &mut Vec<ConnectionId>,
    ) {
        for target in targets {
            self.deliver(*target, msg.clone(), failed);
        }
    }

    fn deliver(&self, target: ConnectionId, msg: ServerMessage, failed: &mut Vec<ConnectionId>) {
        let Some(handle) = self.inner.connections.get(&target) else {
            debug!("Connection {} is gone, dropping frame", target);
            return;
        };

        if handle.tx.send(msg).is_err() {
            warn!("Failed to deliver to connection {}, treating as disconnected", target);
            failed.push(target);
        }
    }

    /// Disconnects every connection whose queue was found closed. Each
    /// disconnect may uncover more closed queues; they are appended and
    /// handled in the same loop.
    fn drain_failures(&self, mut failed: Vec<ConnectionId>) {
        while let Some(conn) = failed.pop() {
            self.disconnect(conn, &mut failed);
        }
    }
}
