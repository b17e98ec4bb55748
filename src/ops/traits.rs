//! Operation trait definition.

use super::types::{Reply, RequestContext};

/// Core trait for all protocol operations.
///
/// Every operation the daemon can answer implements this trait. Handlers are
/// synchronous: they may take the roster lock but must never perform I/O or
/// otherwise block.
pub trait Operation: Send + Sync {
    /// Wire name of the operation (e.g. `c:ping`), `namespace:verb`.
    fn name(&self) -> &'static str;

    /// Handle one decoded request body and produce the reply frame content.
    ///
    /// Validation failures are expressed as error replies (status 255), not
    /// as Rust errors: a bad request must never take down the connection.
    fn handle(&self, ctx: &RequestContext, body: &[u8]) -> Reply;
}
