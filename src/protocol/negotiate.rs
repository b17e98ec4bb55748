//! Operation catalogue and capability negotiation.
//!
//! Each side advertises the operations it claims to speak as an ASCII list
//! joined by NUL bytes. The intersection is informational only: the server
//! rejects an operation solely when its own dispatch table has no handler,
//! never because the peer did not advertise it.

/// Echo check.
pub const OP_PING: &str = "c:ping";
/// Capability exchange.
pub const OP_PROTOCOLS: &str = "c:protocols";
/// Port of the downstream game service.
pub const OP_SERVER_PORT: &str = "c:server_port";
/// Advertised for compatibility; no handler is registered for it.
pub const OP_PLAYER_EASYTIER_ID: &str = "c:player_easytier_id";
/// Liveness/identity announcement.
pub const OP_PLAYER_PING: &str = "c:player_ping";
/// Snapshot of every known player.
pub const OP_PLAYER_PROFILES_LIST: &str = "c:player_profiles_list";

/// Operations this implementation advertises, in the order they are listed
/// in a `c:protocols` reply.
pub const SUPPORTED_OPERATIONS: &[&str] = &[
    OP_PING,
    OP_PROTOCOLS,
    OP_SERVER_PORT,
    OP_PLAYER_EASYTIER_ID,
    OP_PLAYER_PING,
    OP_PLAYER_PROFILES_LIST,
];

/// Join an operation list into its wire form (NUL-separated ASCII).
pub fn join_operations(operations: &[&str]) -> Vec<u8> {
    operations.join("\0").into_bytes()
}

/// Parse a NUL-separated operation list. Returns `None` for non-ASCII input.
pub fn split_operations(data: &[u8]) -> Option<Vec<String>> {
    if !data.is_ascii() {
        return None;
    }
    let text = std::str::from_utf8(data).ok()?;
    Some(text.split('\0').map(str::to_string).collect())
}

/// Operations both sides claim to support, in `ours` order.
pub fn intersect(ours: &[&str], theirs: &[String]) -> Vec<String> {
    ours.iter()
        .filter(|op| theirs.iter().any(|t| t == *op))
        .map(|op| op.to_string())
        .collect()
}
