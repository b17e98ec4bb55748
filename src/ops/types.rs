//! Operation types: replies and request context.

use crate::protocol::{STATUS_ERROR, STATUS_GAME_UNAVAILABLE, STATUS_OK};
use crate::roster::ConnectionId;

/// Outcome of one dispatched operation, written back as a response frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u8,
    pub body: Vec<u8>,
}

impl Reply {
    /// Success with a body.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: STATUS_OK,
            body: body.into(),
        }
    }

    /// Success with an empty body.
    pub fn empty() -> Self {
        Self {
            status: STATUS_OK,
            body: Vec::new(),
        }
    }

    /// Failure with a UTF-8 message body.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            body: message.into().into_bytes(),
        }
    }

    /// Failure reply for an operation with no registered handler.
    pub fn unsupported(operation: &str) -> Self {
        Self::failure(format!("Unsupported protocol: {}", operation))
    }

    /// The downstream game service has no port to report.
    pub fn game_unavailable() -> Self {
        Self {
            status: STATUS_GAME_UNAVAILABLE,
            body: Vec::new(),
        }
    }
}

/// Per-request metadata threaded through dispatch.
///
/// Handlers that key state by connection (only `c:player_ping` does) read
/// the connection id from here; the rest ignore it.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Identifier of the connection the request arrived on.
    pub connection_id: ConnectionId,
    /// The requested operation name.
    pub operation: String,
}
