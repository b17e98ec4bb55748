//! Player roster: who is in the lobby and which connection announced them.

mod player;
mod roster;

pub use player::{Announcement, EasytierId, PlayerIdentity, PlayerKind, PlayerRecord, VENDOR};
pub use roster::{ConnectionId, Roster};
