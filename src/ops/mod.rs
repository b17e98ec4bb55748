//! Operation handlers and dispatch.
//!
//! Contains the operation registry and all built-in operation
//! implementations.
//!
//! ## Adding a new operation
//!
//! 1. Create a file implementing the [`Operation`] trait
//! 2. Register it in [`OperationRegistry::new`]
//! 3. Advertise its name in `protocol::negotiate::SUPPORTED_OPERATIONS`

mod ping;
mod player_ping;
mod profiles_list;
mod protocols;
mod registry;
mod server_port;
mod traits;
mod types;

pub use ping::PingOp;
pub use player_ping::PlayerPingOp;
pub use profiles_list::PlayerProfilesListOp;
pub use protocols::ProtocolsOp;
pub use registry::OperationRegistry;
pub use server_port::{GamePort, ServerPortOp};
pub use traits::Operation;
pub use types::{Reply, RequestContext};
