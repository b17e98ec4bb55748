//! Echo operation for connectivity checks.

use crate::protocol::negotiate::OP_PING;

use super::traits::Operation;
use super::types::{Reply, RequestContext};

/// `c:ping` — echoes the request body back unchanged.
pub struct PingOp;

impl Operation for PingOp {
    fn name(&self) -> &'static str {
        OP_PING
    }

    fn handle(&self, _ctx: &RequestContext, body: &[u8]) -> Reply {
        Reply::ok(body.to_vec())
    }
}
