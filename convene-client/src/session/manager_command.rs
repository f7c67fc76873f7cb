use convene_core::{RoomId, ServerMessage};

/// Local requests to the session manager.
#[derive(Debug, Clone)]
pub enum ManagerCommand {
    Join { room_id: RoomId },
    Leave,
    SetAudioMuted(bool),
    SetVideoOff(bool),
    SetScreenSharing(bool),
    /// Leave the room and stop the event loop.
    Shutdown,
}

/// Everything the manager's inbox carries, in arrival order.
#[derive(Debug, Clone)]
pub enum ManagerInput {
    Server(ServerMessage),
    Command(ManagerCommand),
    /// The relay connection is gone.
    SignalingClosed,
}
