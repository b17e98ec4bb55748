//! Lobby daemon and client for coordinating a shared game server between
//! peers on a private mesh link.
//!
//! Peers speak a compact TCP request/response protocol: each request names
//! an operation (`namespace:verb`) and carries an opaque body, each response
//! is a status byte plus a body. The daemon maintains an in-memory roster of
//! players built from client heartbeats; the client announces its identity
//! periodically and offers typed calls for the built-in operations.

pub mod client;
pub mod config;
pub mod error;
pub mod ops;
pub mod protocol;
pub mod roster;
pub mod server;
