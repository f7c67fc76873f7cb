mod candidate_queue;
mod manager_command;
mod negotiation_phase;
mod peer_session;
mod remote_status;
mod session_manager;
mod session_observer;

pub use candidate_queue::*;
pub use manager_command::*;
pub use negotiation_phase::*;
pub use peer_session::*;
pub use remote_status::*;
pub use session_manager::*;
pub use session_observer::*;
