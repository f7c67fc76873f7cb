use crate::error::SessionError;
use crate::session::{
    CandidateDisposition, ManagerCommand, ManagerInput, NegotiationPhase, PeerSession,
    RemoteStatus, Role, SessionObserver,
};
use crate::signaling::SignalingOutput;
use crate::transport::{MediaTransportFactory, TransportEvent};
use convene_core::{
    ClientMessage, IceCandidate, IceServerConfig, MemberId, MemberInfo, RoomId, ServerMessage,
    SessionDescription, StatusKind,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Sending side of a manager's inbox.
#[derive(Clone)]
pub struct SessionManagerHandle {
    tx: mpsc::Sender<ManagerInput>,
}

impl SessionManagerHandle {
    pub fn new(tx: mpsc::Sender<ManagerInput>) -> Self {
        Self { tx }
    }

    pub async fn command(&self, cmd: ManagerCommand) -> bool {
        self.tx.send(ManagerInput::Command(cmd)).await.is_ok()
    }

    pub async fn join(&self, room_id: RoomId) -> bool {
        self.command(ManagerCommand::Join { room_id }).await
    }

    pub async fn leave(&self) -> bool {
        self.command(ManagerCommand::Leave).await
    }

    pub async fn shutdown(&self) -> bool {
        self.command(ManagerCommand::Shutdown).await
    }
}

/// Owns one [`PeerSession`] per known remote member of the current room.
///
/// The manager is an actor: relay frames, local commands and media
/// transport events are handled strictly one at a time, which is what makes
/// the per-session phase guards sound. Sessions never share state, so no
/// lock is needed between them.
pub struct PeerSessionManager {
    local: MemberInfo,
    room: Option<RoomId>,
    ice_servers: Vec<IceServerConfig>,
    sessions: HashMap<MemberId, PeerSession>,
    statuses: HashMap<MemberId, RemoteStatus>,
    signaling: Arc<dyn SignalingOutput>,
    factory: Arc<dyn MediaTransportFactory>,
    observer: Box<dyn SessionObserver>,
    inbox_rx: mpsc::Receiver<ManagerInput>,
    transport_rx: mpsc::Receiver<TransportEvent>,
    transport_tx: mpsc::Sender<TransportEvent>,
}

impl PeerSessionManager {
    pub fn new(
        local: MemberInfo,
        signaling: Arc<dyn SignalingOutput>,
        factory: Arc<dyn MediaTransportFactory>,
        observer: Box<dyn SessionObserver>,
        inbox_rx: mpsc::Receiver<ManagerInput>,
    ) -> Self {
        let (transport_tx, transport_rx) = mpsc::channel(256);

        Self {
            local,
            room: None,
            ice_servers: Vec::new(),
            sessions: HashMap::new(),
            statuses: HashMap::new(),
            signaling,
            factory,
            observer,
            inbox_rx,
            transport_rx,
            transport_tx,
        }
    }

    pub fn local(&self) -> &MemberInfo {
        &self.local
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    pub fn session(&self, member_id: &MemberId) -> Option<&PeerSession> {
        self.sessions.get(member_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn remote_status(&self, member_id: &MemberId) -> Option<RemoteStatus> {
        self.statuses.get(member_id).copied()
    }

    pub async fn run(mut self) {
        info!("Session manager for {} started", self.local.member_id);

        loop {
            tokio::select! {
                input = self.inbox_rx.recv() => {
                    match input {
                        Some(ManagerInput::Server(msg)) => self.handle_server_message(msg).await,
                        Some(ManagerInput::Command(ManagerCommand::Shutdown)) => {
                            self.leave_room().await;
                            break;
                        }
                        Some(ManagerInput::Command(cmd)) => self.handle_command(cmd).await,
                        Some(ManagerInput::SignalingClosed) => {
                            warn!("Signaling closed, tearing down all sessions");
                            self.close_all_sessions().await;
                            self.room = None;
                            break;
                        }
                        None => {
                            info!("Inbox closed. Shutting down session manager.");
                            self.close_all_sessions().await;
                            break;
                        }
                    }
                }

                evt = self.transport_rx.recv() => {
                    if let Some(e) = evt {
                        self.handle_transport_event(e).await;
                    }
                }
            }
        }

        info!("Session manager for {} finished", self.local.member_id);
    }

    pub async fn handle_command(&mut self, cmd: ManagerCommand) {
        match cmd {
            ManagerCommand::Join { room_id } => {
                if self.room.is_some() {
                    self.leave_room().await;
                }
                info!("Joining room {} as {}", room_id, self.local.member_id);
                self.send(ClientMessage::JoinRoom {
                    room_id: room_id.clone(),
                    member_id: self.local.member_id.clone(),
                    display_name: self.local.display_name.clone(),
                })
                .await;
                self.room = Some(room_id);
            }

            ManagerCommand::Leave | ManagerCommand::Shutdown => self.leave_room().await,

            ManagerCommand::SetAudioMuted(muted) => {
                self.send(ClientMessage::ToggleAudio { muted }).await
            }

            ManagerCommand::SetVideoOff(video_off) => {
                self.send(ClientMessage::ToggleVideo { video_off }).await
            }

            ManagerCommand::SetScreenSharing(sharing) => {
                let member_id = Some(self.local.member_id.clone());
                let msg = if sharing {
                    ClientMessage::ScreenShareStarted { member_id }
                } else {
                    ClientMessage::ScreenShareStopped { member_id }
                };
                self.send(msg).await
            }
        }
    }

    pub async fn handle_server_message(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::IceConfig { ice_servers } => {
                debug!("Received ICE config: {} servers", ice_servers.len());
                self.ice_servers = ice_servers;
            }

            ServerMessage::ExistingMembers { members } => {
                for member in members {
                    if member.member_id == self.local.member_id
                        || self.sessions.contains_key(&member.member_id)
                    {
                        continue;
                    }
                    // Already present: they will offer to us.
                    if self.open_session(&member.member_id, Role::Responder).await {
                        self.observer.on_member_joined(&member).await;
                    }
                }
            }

            ServerMessage::MemberJoined {
                member_id,
                display_name,
            } => {
                if member_id == self.local.member_id {
                    return;
                }
                if self.sessions.contains_key(&member_id) {
                    // Reconnected under the same identity: start over.
                    self.remove_member(&member_id).await;
                }
                if !self.open_session(&member_id, Role::Initiator).await {
                    return;
                }
                self.observer
                    .on_member_joined(&MemberInfo {
                        member_id: member_id.clone(),
                        display_name,
                    })
                    .await;
                self.start_offer(&member_id).await;
            }

            ServerMessage::MemberLeft { member_id } => {
                info!("Member {} left", member_id);
                if self.remove_member(&member_id).await {
                    self.observer.on_member_left(&member_id).await;
                }
            }

            ServerMessage::Offer { description, from } => {
                self.on_remote_offer(from, description).await;
            }

            ServerMessage::Answer { description, from } => {
                self.on_remote_answer(from, description).await;
            }

            ServerMessage::IceCandidate { candidate, from } => {
                self.on_remote_candidate(from, candidate).await;
            }

            ServerMessage::MemberStatus {
                member_id,
                kind,
                enabled,
            } => {
                self.on_member_status(member_id, kind, enabled).await;
            }

            ServerMessage::Error { reason } => {
                warn!("Relay rejected a frame: {}", reason);
            }
        }
    }

    pub async fn handle_transport_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::CandidateGathered(member_id, candidate) => {
                if !self.sessions.contains_key(&member_id) {
                    debug!("Dropping local candidate for departed member {}", member_id);
                    return;
                }
                if let Err(e) = self.signaling.send_ice(member_id.clone(), candidate).await {
                    error!("Failed to send candidate to {}: {}", member_id, e);
                }
            }

            TransportEvent::StateChanged(member_id, state) => {
                if self.sessions.contains_key(&member_id) {
                    self.observer.on_connection_state(&member_id, state).await;
                }
            }
        }
    }

    async fn start_offer(&mut self, member_id: &MemberId) {
        let Some(session) = self.sessions.get_mut(member_id) else {
            return;
        };

        match session.create_offer().await {
            Ok(offer) => {
                info!("Sending offer to {}", member_id);
                if let Err(e) = self.signaling.send_offer(member_id.clone(), offer).await {
                    error!("Failed to send offer to {}: {}", member_id, e);
                }
            }
            Err(e) => self.on_session_error(member_id, e).await,
        }
    }

    async fn on_remote_offer(&mut self, from: MemberId, description: SessionDescription) {
        info!("Received offer from {}", from);

        // An offer can overtake the membership snapshot; treat the sender as
        // an already-present member.
        if !self.sessions.contains_key(&from) {
            if !self.open_session(&from, Role::Responder).await {
                return;
            }
            self.observer
                .on_member_joined(&MemberInfo {
                    member_id: from.clone(),
                    display_name: from.to_string(),
                })
                .await;
        }

        let Some(session) = self.sessions.get_mut(&from) else {
            return;
        };

        match session.receive_offer(description).await {
            Ok(answer) => {
                if let Err(e) = self.signaling.send_answer(from.clone(), answer).await {
                    error!("Failed to send answer to {}: {}", from, e);
                }
                self.observer.on_session_stable(&from).await;
            }
            Err(e) => self.on_session_error(&from, e).await,
        }
    }

    async fn on_remote_answer(&mut self, from: MemberId, description: SessionDescription) {
        info!("Received answer from {}", from);

        let Some(session) = self.sessions.get_mut(&from) else {
            warn!("Ignoring answer from {}: no session", from);
            return;
        };

        match session.receive_answer(description).await {
            Ok(()) => self.observer.on_session_stable(&from).await,
            Err(e) => self.on_session_error(&from, e).await,
        }
    }

    async fn on_remote_candidate(&mut self, from: MemberId, candidate: IceCandidate) {
        let Some(session) = self.sessions.get_mut(&from) else {
            debug!("Dropping candidate from {}: no session", from);
            return;
        };

        match session.add_remote_candidate(candidate).await {
            CandidateDisposition::Applied => debug!("Added candidate from {}", from),
            CandidateDisposition::Queued => {}
            CandidateDisposition::Rejected => {}
            CandidateDisposition::Discarded => {
                debug!("Discarding candidate from {}: session failed", from)
            }
        }
    }

    async fn on_member_status(&mut self, member_id: MemberId, kind: StatusKind, enabled: bool) {
        if !self.sessions.contains_key(&member_id) {
            debug!("Ignoring status from {}: no session", member_id);
            return;
        }

        let status = self.statuses.entry(member_id.clone()).or_default();
        if status.apply(kind, enabled) {
            let snapshot = *status;
            self.observer.on_status_changed(&member_id, &snapshot).await;
        }
    }

    /// Protocol violations are logged and dropped; description failures end
    /// the session and are reported.
    async fn on_session_error(&mut self, member_id: &MemberId, err: SessionError) {
        if !err.is_fatal() {
            warn!("Ignoring message for {}: {}", member_id, err);
            return;
        }

        error!("Session with {} failed: {}", member_id, err);
        if let Some(session) = self.sessions.get_mut(member_id) {
            session.close().await;
        }
        self.observer.on_session_failed(member_id, &err).await;
    }

    async fn open_session(&mut self, member_id: &MemberId, role: Role) -> bool {
        let transport = match self
            .factory
            .create(member_id, &self.ice_servers, self.transport_tx.clone())
            .await
        {
            Ok(t) => t,
            Err(e) => {
                error!("Failed to create media transport for {}: {:?}", member_id, e);
                return false;
            }
        };

        debug!("Opened {:?} session for {}", role, member_id);
        self.sessions.insert(
            member_id.clone(),
            PeerSession::new(member_id.clone(), role, transport),
        );
        true
    }

    async fn remove_member(&mut self, member_id: &MemberId) -> bool {
        self.statuses.remove(member_id);
        let Some(mut session) = self.sessions.remove(member_id) else {
            return false;
        };
        if session.phase() != NegotiationPhase::Failed {
            session.close().await;
        }
        true
    }

    async fn close_all_sessions(&mut self) {
        for (_, mut session) in self.sessions.drain() {
            if session.phase() != NegotiationPhase::Failed {
                session.close().await;
            }
        }
        self.statuses.clear();
    }

    /// Releases every session before telling the relay we are gone.
    async fn leave_room(&mut self) {
        let Some(room) = self.room.take() else {
            return;
        };

        self.close_all_sessions().await;
        info!("Leaving room {}", room);
        self.send(ClientMessage::LeaveRoom).await;
    }

    async fn send(&self, msg: ClientMessage) {
        if let Err(e) = self.signaling.send(msg).await {
            error!("Failed to send to relay: {}", e);
        }
    }
}
