use async_trait::async_trait;
use convene_client::{ConnectionState, RemoteStatus, SessionError, SessionObserver};
use convene_core::{MemberId, MemberInfo};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Event types recorded by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum ObservedEvent {
    Joined(MemberId),
    Left(MemberId),
    Stable(MemberId),
    Failed(MemberId),
    Status(MemberId, RemoteStatus),
    Connection(MemberId, ConnectionState),
}

/// A SessionObserver that records all callbacks.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<ObservedEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_events(&self) -> Vec<ObservedEvent> {
        self.events.lock().await.clone()
    }

    pub async fn has(&self, event: &ObservedEvent) -> bool {
        self.events.lock().await.contains(event)
    }

    /// Wait until `event` is recorded, with timeout.
    pub async fn wait_for(&self, event: ObservedEvent, timeout_ms: u64) -> bool {
        let start = std::time::Instant::now();
        let timeout = std::time::Duration::from_millis(timeout_ms);

        loop {
            if self.has(&event).await {
                return true;
            }
            if start.elapsed() > timeout {
                return false;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }

    async fn push(&self, event: ObservedEvent) {
        self.events.lock().await.push(event);
    }
}

#[async_trait]
impl SessionObserver for RecordingObserver {
    async fn on_member_joined(&self, member: &MemberInfo) {
        self.push(ObservedEvent::Joined(member.member_id.clone())).await;
    }

    async fn on_member_left(&self, member_id: &MemberId) {
        self.push(ObservedEvent::Left(member_id.clone())).await;
    }

    async fn on_session_stable(&self, member_id: &MemberId) {
        self.push(ObservedEvent::Stable(member_id.clone())).await;
    }

    async fn on_session_failed(&self, member_id: &MemberId, _error: &SessionError) {
        self.push(ObservedEvent::Failed(member_id.clone())).await;
    }

    async fn on_status_changed(&self, member_id: &MemberId, status: &RemoteStatus) {
        self.push(ObservedEvent::Status(member_id.clone(), *status)).await;
    }

    async fn on_connection_state(&self, member_id: &MemberId, state: ConnectionState) {
        self.push(ObservedEvent::Connection(member_id.clone(), state)).await;
    }
}
