//! Player listing operation.

use std::sync::Arc;

use crate::protocol::negotiate::OP_PLAYER_PROFILES_LIST;
use crate::roster::Roster;

use super::traits::Operation;
use super::types::{Reply, RequestContext};

/// `c:player_profiles_list` — replies with a JSON array of every known
/// player record.
pub struct PlayerProfilesListOp {
    roster: Arc<Roster>,
}

impl PlayerProfilesListOp {
    pub fn new(roster: Arc<Roster>) -> Self {
        Self { roster }
    }
}

impl Operation for PlayerProfilesListOp {
    fn name(&self) -> &'static str {
        OP_PLAYER_PROFILES_LIST
    }

    fn handle(&self, _ctx: &RequestContext, _body: &[u8]) -> Reply {
        match serde_json::to_vec(&self.roster.players()) {
            Ok(json) => Reply::ok(json),
            Err(e) => Reply::failure(format!("Error generating player list: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::test_util::test_context;
    use crate::roster::{PlayerIdentity, PlayerKind, PlayerRecord};

    #[test]
    fn test_profiles_list_serializes_roster() {
        let identity = PlayerIdentity::new(Some("Host".to_string()), "host-m".to_string(), None);
        let roster = Arc::new(Roster::new(identity.to_record(PlayerKind::Host)));
        roster.register_heartbeat(
            uuid::Uuid::new_v4(),
            PlayerRecord {
                name: "A".to_string(),
                machine_id: "m1".to_string(),
                easytier_id: None,
                vendor: "V".to_string(),
                kind: PlayerKind::Guest,
            },
        );

        let op = PlayerProfilesListOp::new(roster);
        let reply = op.handle(&test_context(OP_PLAYER_PROFILES_LIST), b"");
        assert_eq!(reply.status, 0);

        let players: Vec<PlayerRecord> = serde_json::from_slice(&reply.body).unwrap();
        assert_eq!(players.len(), 2);
        assert!(players
            .iter()
            .any(|p| p.machine_id == "m1" && p.kind == PlayerKind::Guest));
        assert!(players
            .iter()
            .any(|p| p.machine_id == "host-m" && p.kind == PlayerKind::Host));
    }
}
