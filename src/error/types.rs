//! Error types for the lobby daemon and client.

use thiserror::Error;

use crate::protocol::{EncodeError, FrameError};

/// Main error type for the daemon and client.
#[derive(Error, Debug)]
pub enum LobbyError {
    /// Configuration-related errors.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Socket-related errors.
    #[error("Socket error: {message}")]
    Socket { message: String },

    /// Frame encoding failures (name or body over the wire limits).
    #[error("Encoding error: {0}")]
    Encode(#[from] EncodeError),

    /// Malformed or truncated frames.
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// Protocol errors.
    #[error("Protocol error: {kind}")]
    Protocol { kind: ProtocolErrorKind },

    /// A request was answered with a nonzero status.
    #[error("Request '{operation}' failed with status {status}: {message}")]
    RequestFailed {
        operation: String,
        status: u8,
        message: String,
    },

    /// The downstream game service has no port configured yet.
    #[error("Game service is not available yet")]
    GameUnavailable,

    /// A client call was made without an open connection.
    #[error("Not connected to a lobby server")]
    NotConnected,

    /// I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Protocol error kinds.
#[derive(Error, Debug)]
pub enum ProtocolErrorKind {
    #[error("Body too large: {size} bytes exceeds maximum of {max} bytes")]
    BodyTooLarge { size: usize, max: usize },

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Invalid response body: {message}")]
    InvalidResponse { message: String },
}

/// Result type alias for lobby operations.
pub type LobbyResult<T> = Result<T, LobbyError>;
