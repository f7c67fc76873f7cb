use crate::config::ServerConfig;
use crate::signaling::SignalingRelay;
use std::time::Instant;

/// Shared state behind every HTTP and WebSocket handler.
pub struct AppState {
    pub relay: SignalingRelay,
    pub config: ServerConfig,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            relay: SignalingRelay::new(config.ice_servers.clone()),
            config,
            started_at: Instant::now(),
        }
    }
}
