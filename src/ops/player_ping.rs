//! Player heartbeat operation.

use std::sync::Arc;

use crate::protocol::negotiate::OP_PLAYER_PING;
use crate::roster::{Announcement, PlayerKind, Roster};

use super::traits::Operation;
use super::types::{Reply, RequestContext};

/// `c:player_ping` — registers or refreshes a player's presence.
///
/// The body is a JSON announcement with required `name`, `machine_id` and
/// `vendor` fields. The first heartbeat on a connection binds it to the
/// announced machine id so the record can be dropped when the connection
/// closes.
pub struct PlayerPingOp {
    roster: Arc<Roster>,
}

impl PlayerPingOp {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self { roster }
    }
}

impl Operation for PlayerPingOp {
    fn name(&self) -> &'static str {
        OP_PLAYER_PING
    }

    fn handle(&self, ctx: &RequestContext, body: &[u8]) -> Reply {
        let announcement: Announcement = match serde_json::from_slice(body) {
            Ok(announcement) => announcement,
            Err(e) => return Reply::failure(format!("Invalid player announcement: {}", e)),
        };

        self.roster
            .register_heartbeat(ctx.connection_id, announcement.into_record(PlayerKind::Guest));
        Reply::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_util::test_context;
    use crate::roster::{PlayerIdentity, PlayerRecord};

    fn roster() -> Arc<Roster> {
        let identity = PlayerIdentity::new(Some("Host".to_string()), "host-m".to_string(), None);
        Arc::new(Roster::new(identity.to_record(PlayerKind::Host)))
    }

    fn find<'a>(players: &'a [PlayerRecord], machine_id: &str) -> Option<&'a PlayerRecord> {
        players.iter().find(|p| p.machine_id == machine_id)
    }

    #[test]
    fn test_player_ping_registers_guest() {
        let roster = roster();
        let op = PlayerPingOp::new(Arc::clone(&roster));

        let reply = op.handle(
            &test_context(OP_PLAYER_PING),
            br#"{"name":"A","machine_id":"m1","vendor":"V"}"#,
        );
        assert_eq!(reply.status, 0);
        assert!(reply.body.is_empty());

        let players = roster.players();
        let record = find(&players, "m1").unwrap();
        assert_eq!(record.kind, PlayerKind::Guest);
        assert_eq!(record.vendor, "V");
    }

    #[test]
    fn test_player_ping_missing_vendor_fails() {
        let op = PlayerPingOp::new(roster());
        let reply = op.handle(
            &test_context(OP_PLAYER_PING),
            br#"{"name":"A","machine_id":"m1"}"#,
        );
        assert_eq!(reply.status, 255);
        assert!(!reply.body.is_empty());
    }

    #[test]
    fn test_player_ping_malformed_json_fails() {
        let op = PlayerPingOp::new(roster());
        let reply = op.handle(&test_context(OP_PLAYER_PING), b"{not json");
        assert_eq!(reply.status, 255);
        assert!(!reply.body.is_empty());
    }

    #[test]
    fn test_player_ping_non_utf8_body_fails() {
        let op = PlayerPingOp::new(roster());
        let reply = op.handle(&test_context(OP_PLAYER_PING), &[0xFF, 0xFE, 0x00]);
        assert_eq!(reply.status, 255);
    }

    #[test]
    fn test_player_ping_failure_leaves_roster_untouched() {
        let roster = roster();
        let op = PlayerPingOp::new(Arc::clone(&roster));
        op.handle(&test_context(OP_PLAYER_PING), b"garbage");
        assert_eq!(roster.players().len(), 1);
    }
}
