//! Now-playing observer: asks a usb2snes server which track the game is
//! playing and names the pack it was shuffled in from.

mod link;
mod protocol;
mod watch;

pub use link::WsConnector;
pub use protocol::Connector;
pub use watch::{Observer, UNKNOWN};
