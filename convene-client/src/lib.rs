mod client;
mod config;
mod error;
pub mod session;
pub mod signaling;
pub mod transport;

pub use client::*;
pub use config::*;
pub use error::*;
pub use session::*;
pub use signaling::*;
pub use transport::*;
