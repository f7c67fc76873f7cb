mod app_state;
mod config_handler;
mod health_handler;
mod router;

pub use app_state::*;
pub use config_handler::*;
pub use health_handler::*;
pub use router::*;
