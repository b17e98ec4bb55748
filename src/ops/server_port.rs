//! Downstream game port operation.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::protocol::negotiate::OP_SERVER_PORT;

use super::traits::Operation;
use super::types::{Reply, RequestContext};

/// TCP port of the downstream game service, settable at runtime.
///
/// The game typically comes up after the lobby does, so the port starts
/// unset and is filled in once the service is listening.
#[derive(Debug, Default)]
pub struct GamePort {
    port: Mutex<Option<u16>>,
}

impl GamePort {
    pub fn new(port: Option<u16>) -> Self {
        Self {
            port: Mutex::new(port),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<u16>> {
        match self.port.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Announce that the game service is reachable on `port`.
    pub fn set(&self, port: u16) {
        *self.lock() = Some(port);
    }

    /// Mark the game service as down.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    pub fn get(&self) -> Option<u16> {
        *self.lock()
    }
}

/// `c:server_port` — replies with the game port as 2 big-endian bytes, or
/// status 32 while no port is configured.
pub struct ServerPortOp {
    game_port: Arc<GamePort>,
}

impl ServerPortOp {
    pub fn new(game_port: Arc<GamePort>) -> Self {
        Self { game_port }
    }
}

impl Operation for ServerPortOp {
    fn name(&self) -> &'static str {
        OP_SERVER_PORT
    }

    fn handle(&self, _ctx: &RequestContext, _body: &[u8]) -> Reply {
        match self.game_port.get() {
            Some(port) => Reply::ok(port.to_be_bytes().to_vec()),
            None => Reply::game_unavailable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_util::test_context;
    use crate::protocol::STATUS_GAME_UNAVAILABLE;
    use std::sync::Arc;

    #[test]
    fn test_server_port_big_endian_body() {
        let op = ServerPortOp::new(Arc::new(GamePort::new(Some(25565))));
        let reply = op.handle(&test_context(OP_SERVER_PORT), b"");
        assert_eq!(reply.status, 0);
        assert_eq!(reply.body, vec![0x63, 0xDD]);
    }

    #[test]
    fn test_server_port_unset_reports_unavailable() {
        let op = ServerPortOp::new(Arc::new(GamePort::new(None)));
        let reply = op.handle(&test_context(OP_SERVER_PORT), b"");
        assert_eq!(reply.status, STATUS_GAME_UNAVAILABLE);
        assert!(reply.body.is_empty());
    }

    #[test]
    fn test_game_port_set_and_clear() {
        let game_port = Arc::new(GamePort::new(None));
        let op = ServerPortOp::new(Arc::clone(&game_port));

        game_port.set(4242);
        let reply = op.handle(&test_context(OP_SERVER_PORT), b"");
        assert_eq!(reply.body, 4242u16.to_be_bytes().to_vec());

        game_port.clear();
        let reply = op.handle(&test_context(OP_SERVER_PORT), b"");
        assert_eq!(reply.status, STATUS_GAME_UNAVAILABLE);
    }
}
