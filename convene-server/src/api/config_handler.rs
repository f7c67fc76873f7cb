use crate::api::AppState;
use axum::Json;
use axum::extract::State;
use convene_core::IceServerConfig;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Client-safe configuration. TURN credentials are stripped.
#[derive(Debug, Serialize, Deserialize)]
pub struct PublicConfig {
    pub ice_servers: Vec<IceServerConfig>,
    pub version: String,
}

pub async fn config_handler(State(state): State<Arc<AppState>>) -> Json<PublicConfig> {
    Json(PublicConfig {
        ice_servers: state
            .config
            .ice_servers
            .iter()
            .map(IceServerConfig::public)
            .collect(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
