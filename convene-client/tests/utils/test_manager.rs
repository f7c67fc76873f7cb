use convene_client::{ManagerInput, PeerSessionManager};
use convene_core::{MemberId, MemberInfo};
use std::sync::Arc;
use tokio::sync::mpsc;

use super::{MockSignalingOutput, MockTransportFactory, RecordingObserver};

/// Timeout for waiting on asynchronous signaling (ms).
pub const SIGNAL_TIMEOUT_MS: u64 = 5000;

/// A manager driven directly by the test, with its collaborators exposed.
pub struct TestManager {
    pub manager: PeerSessionManager,
    pub signaling: MockSignalingOutput,
    pub transports: MockTransportFactory,
    pub observer: RecordingObserver,
    _inbox_tx: mpsc::Sender<ManagerInput>,
}

impl TestManager {
    pub fn new(local: &str) -> Self {
        let signaling = MockSignalingOutput::new();
        let transports = MockTransportFactory::new(local);
        let observer = RecordingObserver::new();
        let (inbox_tx, inbox_rx) = mpsc::channel(16);

        let manager = PeerSessionManager::new(
            MemberInfo {
                member_id: MemberId::from(local),
                display_name: local.to_uppercase(),
            },
            Arc::new(signaling.clone()),
            Arc::new(transports.clone()),
            Box::new(observer.clone()),
            inbox_rx,
        );

        Self {
            manager,
            signaling,
            transports,
            observer,
            _inbox_tx: inbox_tx,
        }
    }
}
