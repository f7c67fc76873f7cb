use crate::api::AppState;
use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    /// Seconds since the server started.
    pub uptime: f64,
    pub rooms: usize,
    pub connections: usize,
}

pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok".to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        rooms: state.relay.room_count(),
        connections: state.relay.connection_count(),
    })
}
