mod connection;
mod member;
mod room;
mod session;
mod signaling;
mod status;

pub use connection::ConnectionId;
pub use member::{MemberId, MemberInfo};
pub use room::RoomId;
pub use session::{IceCandidate, SdpKind, SessionDescription};
pub use signaling::{ClientMessage, IceServerConfig, ServerMessage};
pub use status::StatusKind;
