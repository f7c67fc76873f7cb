pub mod api;
pub mod config;
pub mod room;
pub mod signaling;

pub use api::*;
pub use config::ServerConfig;
pub use room::*;
pub use signaling::*;
