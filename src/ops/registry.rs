//! Operation registry for dispatching requests to handlers.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::protocol::negotiate::SUPPORTED_OPERATIONS;
use crate::roster::Roster;

use super::ping::PingOp;
use super::player_ping::PlayerPingOp;
use super::profiles_list::PlayerProfilesListOp;
use super::protocols::ProtocolsOp;
use super::server_port::{GamePort, ServerPortOp};
use super::traits::Operation;
use super::types::{Reply, RequestContext};

/// Registry of all dispatchable operations.
pub struct OperationRegistry {
    operations: HashMap<&'static str, Arc<dyn Operation>>,
}

impl OperationRegistry {
    /// Create a registry wired with every built-in operation.
    ///
    /// `c:player_easytier_id` is advertised in the capability list but has no
    /// handler; requests for it get the unsupported-protocol reply.
    pub fn new(roster: Arc<Roster>, game_port: Arc<GamePort>) -> Self {
        let mut registry = Self {
            operations: HashMap::new(),
        };

        registry.register(Arc::new(PingOp));
        registry.register(Arc::new(ProtocolsOp));
        registry.register(Arc::new(ServerPortOp::new(game_port)));
        registry.register(Arc::new(PlayerPingOp::new(Arc::clone(&roster))));
        registry.register(Arc::new(PlayerProfilesListOp::new(roster)));

        info!(
            count = registry.operations.len(),
            "operation registry initialized"
        );

        registry
    }

    fn register(&mut self, operation: Arc<dyn Operation>) {
        let name = operation.name();
        debug!(operation = name, "registering operation");
        self.operations.insert(name, operation);
    }

    /// Get an operation by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Operation>> {
        self.operations.get(name).cloned()
    }

    /// Names this server advertises over `c:protocols`. Not necessarily
    /// equal to the set of registered handlers.
    pub fn advertised(&self) -> &'static [&'static str] {
        SUPPORTED_OPERATIONS
    }

    /// Dispatch a request to the matching handler.
    pub fn dispatch(&self, ctx: &RequestContext, body: &[u8]) -> Reply {
        match self.operations.get(ctx.operation.as_str()) {
            Some(operation) => operation.handle(ctx, body),
            None => {
                warn!(operation = %ctx.operation, "unsupported operation requested");
                Reply::unsupported(&ctx.operation)
            }
        }
    }
}
