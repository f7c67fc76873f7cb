pub use convene_core::{MemberId, RoomId};

pub mod model {
    pub use convene_core::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use convene_server::*;
}

#[cfg(feature = "client")]
pub mod client {
    pub use convene_client::*;
}
