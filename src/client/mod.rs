//! Client session for talking to a lobby daemon.

mod session;

pub use session::{LobbyClient, DEFAULT_HEARTBEAT_INTERVAL};
