//! The authoritative player roster.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;
use uuid::Uuid;

use super::player::{PlayerKind, PlayerRecord};

/// Identifier assigned to each accepted connection.
pub type ConnectionId = Uuid;

#[derive(Default)]
struct RosterState {
    /// machine_id -> record.
    players: HashMap<String, PlayerRecord>,
    /// connection -> the machine_id it announced first.
    connections: HashMap<ConnectionId, String>,
}

/// Shared map of known players plus the connection that announced each one.
///
/// Both maps live behind a single lock and are mutated together: a heartbeat
/// binds a connection to a machine id in the same critical section that may
/// insert the record, and removal drops the binding and the record together.
/// The lock is never held across I/O.
pub struct Roster {
    state: Mutex<RosterState>,
}

impl Roster {
    /// Create a roster seeded with the operator's own record.
    pub fn new(host: PlayerRecord) -> Self {
        let host = PlayerRecord {
            kind: PlayerKind::Host,
            ..host
        };
        let mut players = HashMap::new();
        players.insert(host.machine_id.clone(), host);
        Self {
            state: Mutex::new(RosterState {
                players,
                connections: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RosterState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(), // Recover from mutex poisoning
        }
    }

    /// Record a heartbeat from `connection_id`.
    ///
    /// The first heartbeat on a connection binds it to the announced machine
    /// id; later heartbeats on the same connection keep the original binding.
    /// A machine id that is already present keeps its stored record
    /// untouched.
    // TODO: decide whether a repeat heartbeat should refresh the stored
    // record fields; for now the first announcement wins.
    pub fn register_heartbeat(&self, connection_id: ConnectionId, record: PlayerRecord) {
        let mut state = self.lock();

        state
            .connections
            .entry(connection_id)
            .or_insert_with(|| record.machine_id.clone());

        if !state.players.contains_key(&record.machine_id) {
            debug!(
                machine_id = %record.machine_id,
                player = %record.name,
                "player joined"
            );
            let guest = PlayerRecord {
                kind: PlayerKind::Guest,
                ..record
            };
            state.players.insert(guest.machine_id.clone(), guest);
        }
    }

    /// Snapshot of every known player. Order is unspecified.
    pub fn players(&self) -> Vec<PlayerRecord> {
        self.lock().players.values().cloned().collect()
    }

    /// Drop whatever `connection_id` announced. Unknown connections are a
    /// no-op; the host record always survives.
    pub fn remove_connection(&self, connection_id: ConnectionId) {
        let mut state = self.lock();

        let Some(machine_id) = state.connections.remove(&connection_id) else {
            return;
        };

        let is_host = matches!(
            state.players.get(&machine_id),
            Some(record) if record.kind == PlayerKind::Host
        );
        if is_host {
            debug!(machine_id = %machine_id, "connection announcing the host identity closed");
        } else if state.players.remove(&machine_id).is_some() {
            debug!(machine_id = %machine_id, "player left");
        }
    }
}
