use crate::error::SessionError;
use crate::session::RemoteStatus;
use crate::transport::ConnectionState;
use async_trait::async_trait;
use convene_core::{MemberId, MemberInfo};

/// Hooks for the layer that renders the call (UI, CLI, tests).
///
/// Called from the manager's event loop, one at a time.
#[async_trait]
pub trait SessionObserver: Send + Sync + 'static {
    async fn on_member_joined(&self, _member: &MemberInfo) {}

    async fn on_member_left(&self, _member_id: &MemberId) {}

    async fn on_session_stable(&self, _member_id: &MemberId) {}

    /// The session cannot recover on its own; the user has to leave and rejoin.
    async fn on_session_failed(&self, _member_id: &MemberId, _error: &SessionError) {}

    async fn on_status_changed(&self, _member_id: &MemberId, _status: &RemoteStatus) {}

    async fn on_connection_state(&self, _member_id: &MemberId, _state: ConnectionState) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

#[async_trait]
impl SessionObserver for NoopObserver {}
