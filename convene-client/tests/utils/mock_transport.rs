use anyhow::{Result, bail};
use async_trait::async_trait;
use convene_client::{MediaTransport, MediaTransportFactory, TransportEvent};
use convene_core::{IceCandidate, IceServerConfig, MemberId, SessionDescription};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// SDP the mock transport refuses to apply.
pub const MALFORMED_SDP: &str = "malformed";

/// Candidate line the mock transport refuses to add.
pub const BAD_CANDIDATE: &str = "candidate:bad";

/// Calls recorded by [`MockTransport`], in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportCall {
    CreateOffer,
    CreateAnswer,
    SetLocal(SessionDescription),
    SetRemote(SessionDescription),
    AddCandidate(IceCandidate),
    Close,
}

pub type CallLog = Arc<Mutex<Vec<TransportCall>>>;

/// Scripted media transport.
///
/// Descriptions are derived from the local/remote pair so both ends of a
/// negotiation can be told apart. When `gather` is set, applying a local
/// description reports one gathered candidate, like trickle ICE would.
pub struct MockTransport {
    local: String,
    remote: MemberId,
    calls: CallLog,
    events: Option<mpsc::Sender<TransportEvent>>,
}

impl MockTransport {
    pub fn new(local: &str, remote: &str) -> (Self, CallLog) {
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        let transport = Self {
            local: local.to_string(),
            remote: MemberId::from(remote),
            calls: Arc::clone(&calls),
            events: None,
        };
        (transport, calls)
    }

    async fn record(&self, call: TransportCall) {
        self.calls.lock().await.push(call);
    }
}

#[async_trait]
impl MediaTransport for MockTransport {
    async fn create_offer(&self) -> Result<SessionDescription> {
        self.record(TransportCall::CreateOffer).await;
        Ok(SessionDescription::offer(format!(
            "offer:{}->{}",
            self.local, self.remote
        )))
    }

    async fn create_answer(&self) -> Result<SessionDescription> {
        self.record(TransportCall::CreateAnswer).await;
        Ok(SessionDescription::answer(format!(
            "answer:{}->{}",
            self.local, self.remote
        )))
    }

    async fn set_local_description(&self, description: &SessionDescription) -> Result<()> {
        self.record(TransportCall::SetLocal(description.clone())).await;
        if let Some(events) = &self.events {
            let candidate = IceCandidate::new(format!("candidate:{}", self.local));
            let _ = events
                .send(TransportEvent::CandidateGathered(self.remote.clone(), candidate))
                .await;
        }
        Ok(())
    }

    async fn set_remote_description(&self, description: &SessionDescription) -> Result<()> {
        self.record(TransportCall::SetRemote(description.clone())).await;
        if description.sdp == MALFORMED_SDP {
            bail!("malformed session description");
        }
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: &IceCandidate) -> Result<()> {
        self.record(TransportCall::AddCandidate(candidate.clone())).await;
        if candidate.candidate == BAD_CANDIDATE {
            bail!("unusable candidate");
        }
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.record(TransportCall::Close).await;
        Ok(())
    }
}

/// Factory handing out [`MockTransport`]s and keeping their call logs.
#[derive(Clone)]
pub struct MockTransportFactory {
    local: String,
    gather: bool,
    logs: Arc<Mutex<HashMap<MemberId, Vec<CallLog>>>>,
}

impl MockTransportFactory {
    pub fn new(local: &str) -> Self {
        Self {
            local: local.to_string(),
            gather: false,
            logs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Transports report a gathered candidate whenever a local description is set.
    pub fn gathering(local: &str) -> Self {
        Self {
            gather: true,
            ..Self::new(local)
        }
    }

    /// Calls made on the most recent transport created for `remote`.
    pub async fn calls_for(&self, remote: &str) -> Vec<TransportCall> {
        let logs = self.logs.lock().await;
        let Some(log) = logs.get(&MemberId::from(remote)).and_then(|l| l.last()) else {
            return Vec::new();
        };
        log.lock().await.clone()
    }

    pub async fn transports_created_for(&self, remote: &str) -> usize {
        self.logs
            .lock()
            .await
            .get(&MemberId::from(remote))
            .map_or(0, |l| l.len())
    }
}

#[async_trait]
impl MediaTransportFactory for MockTransportFactory {
    async fn create(
        &self,
        remote: &MemberId,
        _ice_servers: &[IceServerConfig],
        events: mpsc::Sender<TransportEvent>,
    ) -> Result<Box<dyn MediaTransport>> {
        let (mut transport, log) = MockTransport::new(&self.local, remote.as_str());
        if self.gather {
            transport.events = Some(events);
        }
        self.logs
            .lock()
            .await
            .entry(remote.clone())
            .or_default()
            .push(log);
        Ok(Box::new(transport))
    }
}

/// Candidates added through `calls`, in order.
pub fn added_candidates(calls: &[TransportCall]) -> Vec<String> {
    calls
        .iter()
        .filter_map(|c| match c {
            TransportCall::AddCandidate(candidate) => Some(candidate.candidate.clone()),
            _ => None,
        })
        .collect()
}
