//! Player identity and record types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Vendor string announced for players running this implementation.
pub const VENDOR: &str = "lobbyd";

/// Whether a player record belongs to the local operator or a remote peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PlayerKind {
    /// The operator's own record, seeded at startup and never evicted.
    Host,
    /// A remote player, created from its first heartbeat and removed when
    /// its connection closes.
    Guest,
}

/// Mesh network node identifier. Peers report either a numeric node id or a
/// hostname-style string, so both shapes are accepted on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EasytierId {
    Id(u64),
    Name(String),
}

impl fmt::Display for EasytierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// One known participant, as served by `c:player_profiles_list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub machine_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easytier_id: Option<EasytierId>,
    pub vendor: String,
    pub kind: PlayerKind,
}

/// Heartbeat body sent over `c:player_ping`. `kind` is assigned server-side
/// and is deliberately absent here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub name: String,
    pub machine_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub easytier_id: Option<EasytierId>,
    pub vendor: String,
}

impl Announcement {
    /// Promote an announcement into a roster record.
    pub fn into_record(self, kind: PlayerKind) -> PlayerRecord {
        PlayerRecord {
            name: self.name,
            machine_id: self.machine_id,
            easytier_id: self.easytier_id,
            vendor: self.vendor,
            kind,
        }
    }
}

/// The local player's identity, supplied by configuration (the machine id
/// itself comes from an external identity collaborator).
#[derive(Debug, Clone)]
pub struct PlayerIdentity {
    pub name: String,
    pub machine_id: String,
    pub easytier_id: Option<EasytierId>,
}

impl PlayerIdentity {
    /// Build an identity; an empty or blank name falls back to
    /// `Player_<machine_id>`.
    pub fn new(name: Option<String>, machine_id: String, easytier_id: Option<EasytierId>) -> Self {
        let name = match name {
            Some(n) if !n.trim().is_empty() => n,
            _ => format!("Player_{}", machine_id),
        };
        Self {
            name,
            machine_id,
            easytier_id,
        }
    }

    /// This identity as a roster record of the given kind.
    pub fn to_record(&self, kind: PlayerKind) -> PlayerRecord {
        PlayerRecord {
            name: self.name.clone(),
            machine_id: self.machine_id.clone(),
            easytier_id: self.easytier_id.clone(),
            vendor: VENDOR.to_string(),
            kind,
        }
    }

    /// This identity as a heartbeat body.
    pub fn announcement(&self) -> Announcement {
        Announcement {
            name: self.name.clone(),
            machine_id: self.machine_id.clone(),
            easytier_id: self.easytier_id.clone(),
            vendor: VENDOR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&PlayerKind::Host).unwrap(), "\"HOST\"");
        assert_eq!(
            serde_json::to_string(&PlayerKind::Guest).unwrap(),
            "\"GUEST\""
        );
    }

    #[test]
    fn test_easytier_id_accepts_both_shapes() {
        let id: EasytierId = serde_json::from_str("42").unwrap();
        assert_eq!(id, EasytierId::Id(42));

        let id: EasytierId = serde_json::from_str("\"node-a\"").unwrap();
        assert_eq!(id, EasytierId::Name("node-a".to_string()));
    }

    #[test]
    fn test_announcement_requires_vendor() {
        let result: Result<Announcement, _> =
            serde_json::from_str(r#"{"name":"A","machine_id":"m1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_announcement_easytier_id_is_optional() {
        let announcement: Announcement =
            serde_json::from_str(r#"{"name":"A","machine_id":"m1","vendor":"V"}"#).unwrap();
        assert_eq!(announcement.easytier_id, None);

        // Absent on input stays absent on output.
        let json = serde_json::to_value(&announcement).unwrap();
        assert!(json.get("easytier_id").is_none());
    }

    #[test]
    fn test_identity_blank_name_falls_back() {
        let identity = PlayerIdentity::new(Some("   ".to_string()), "m1".to_string(), None);
        assert_eq!(identity.name, "Player_m1");

        let identity = PlayerIdentity::new(None, "m2".to_string(), None);
        assert_eq!(identity.name, "Player_m2");

        let identity = PlayerIdentity::new(Some("Steve".to_string()), "m3".to_string(), None);
        assert_eq!(identity.name, "Steve");
    }

    #[test]
    fn test_record_json_shape() {
        let record = PlayerIdentity::new(
            Some("Host".to_string()),
            "m0".to_string(),
            Some(EasytierId::Id(7)),
        )
        .to_record(PlayerKind::Host);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["name"], "Host");
        assert_eq!(json["machine_id"], "m0");
        assert_eq!(json["easytier_id"], 7);
        assert_eq!(json["vendor"], VENDOR);
        assert_eq!(json["kind"], "HOST");
    }
}
