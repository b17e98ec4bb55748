//! Capability exchange operation.

use tracing::debug;

use crate::protocol::negotiate::{
    intersect, join_operations, split_operations, OP_PROTOCOLS, SUPPORTED_OPERATIONS,
};

use super::traits::Operation;
use super::types::{Reply, RequestContext};

/// `c:protocols` — replies with the server's advertised operation list.
///
/// When the peer sends its own list in the request body it is logged together
/// with the intersection, purely for diagnostics; the reply is the server's
/// list either way.
pub struct ProtocolsOp;

impl Operation for ProtocolsOp {
    fn name(&self) -> &'static str {
        OP_PROTOCOLS
    }

    fn handle(&self, _ctx: &RequestContext, body: &[u8]) -> Reply {
        if !body.is_empty() {
            if let Some(theirs) = split_operations(body) {
                let common = intersect(SUPPORTED_OPERATIONS, &theirs);
                debug!(peer = ?theirs, common = ?common, "protocol negotiation");
            }
        }
        Reply::ok(join_operations(SUPPORTED_OPERATIONS))
    }
}
