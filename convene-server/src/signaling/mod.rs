mod relay_error;
mod signaling_relay;
mod ws_handler;

pub use relay_error::*;
pub use signaling_relay::*;
pub use ws_handler::*;
