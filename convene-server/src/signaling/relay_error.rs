use convene_core::{MemberId, RoomId};
use thiserror::Error;

/// Local misuse of the relay by one connection. Reported back to that
/// connection only; never forwarded to other members.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    #[error("connection has not joined a room")]
    NotJoined,

    #[error("member {member} is no longer bound to this connection in room {room}")]
    BindingMismatch { room: RoomId, member: MemberId },

    #[error("unknown connection")]
    UnknownConnection,
}
