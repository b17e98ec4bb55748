//! Error types for the lobby daemon and client.
//!
//! Provides a unified error handling system using thiserror.

mod types;

pub use types::*;
