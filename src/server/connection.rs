//! Per-connection handler.

use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::debug;
use uuid::Uuid;

use crate::error::{LobbyError, ProtocolErrorKind};
use crate::ops::{OperationRegistry, RequestContext};
use crate::protocol::{self, STATUS_ERROR};
use crate::roster::{ConnectionId, Roster};

/// Handle a single client connection until the peer closes it or the
/// transport fails.
///
/// Whatever ends the loop, the roster entry bound to this connection is
/// removed before the stream is dropped, so a failed or abandoned heartbeat
/// never leaves a stale player behind.
pub async fn handle_connection(
    stream: TcpStream,
    roster: Arc<Roster>,
    registry: Arc<OperationRegistry>,
    max_body_size: usize,
) -> Result<(), LobbyError> {
    let connection_id = Uuid::new_v4();
    let (mut reader, mut writer) = stream.into_split();

    let result = serve(connection_id, &mut reader, &mut writer, &registry, max_body_size).await;
    roster.remove_connection(connection_id);

    match result {
        Err(LobbyError::Protocol {
            kind: ProtocolErrorKind::ConnectionClosed,
        }) => {
            debug!(connection_id = %connection_id, "peer disconnected");
            Ok(())
        }
        other => other,
    }
}

/// Request loop: read one frame, dispatch it, write the reply.
///
/// Frame-level decode failures are answered with status 255 and the loop
/// continues; transport failures and an oversized declared body end the
/// connection without a response.
async fn serve<R, W>(
    connection_id: ConnectionId,
    reader: &mut R,
    writer: &mut W,
    registry: &OperationRegistry,
    max_body_size: usize,
) -> Result<(), LobbyError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        let (operation, body) = match protocol::read_request(reader, max_body_size).await {
            Ok(frame) => frame,
            Err(LobbyError::Frame(e)) => {
                debug!(connection_id = %connection_id, error = %e, "malformed frame");
                let message = format!("Parse error: {}", e);
                protocol::write_response(writer, STATUS_ERROR, message.as_bytes()).await?;
                continue;
            }
            Err(e) => return Err(e),
        };

        let ctx = RequestContext {
            connection_id,
            operation,
        };
        debug!(connection_id = %connection_id, operation = %ctx.operation, "dispatching request");

        let reply = registry.dispatch(&ctx, &body);
        protocol::write_response(writer, reply.status, &reply.body).await?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::GamePort;
    use crate::protocol::negotiate::{OP_PING, OP_PLAYER_PING};
    use crate::roster::{PlayerIdentity, PlayerKind};
    use std::io::Cursor;

    const MAX: usize = 1_048_576;

    fn fixtures() -> (Arc<Roster>, Arc<OperationRegistry>) {
        let identity = PlayerIdentity::new(Some("Host".to_string()), "host-m".to_string(), None);
        let roster = Arc::new(Roster::new(identity.to_record(PlayerKind::Host)));
        let registry = Arc::new(OperationRegistry::new(
            Arc::clone(&roster),
            Arc::new(GamePort::new(None)),
        ));
        (roster, registry)
    }

    #[tokio::test]
    async fn test_serve_answers_until_eof() {
        let (_roster, registry) = fixtures();

        let mut input = Vec::new();
        protocol::write_request(&mut input, OP_PING, b"one").await.unwrap();
        protocol::write_request(&mut input, OP_PING, b"two").await.unwrap();

        let mut reader = Cursor::new(input);
        let mut output = Vec::new();
        let err = serve(Uuid::new_v4(), &mut reader, &mut output, &registry, MAX)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LobbyError::Protocol {
                kind: ProtocolErrorKind::ConnectionClosed
            }
        ));

        let mut replies = Cursor::new(output);
        assert_eq!(
            protocol::read_response(&mut replies).await.unwrap(),
            (0, b"one".to_vec())
        );
        assert_eq!(
            protocol::read_response(&mut replies).await.unwrap(),
            (0, b"two".to_vec())
        );
    }

    #[tokio::test]
    async fn test_serve_recovers_from_malformed_frame() {
        let (_roster, registry) = fixtures();

        let mut input = Vec::new();
        protocol::write_request(&mut input, OP_PING, b"ok").await.unwrap();
        // Corrupt the first frame's name without touching its lengths.
        input[1..7].copy_from_slice(b"C:PING");
        protocol::write_request(&mut input, OP_PING, b"still here").await.unwrap();

        let mut reader = Cursor::new(input);
        let mut output = Vec::new();
        let _ = serve(Uuid::new_v4(), &mut reader, &mut output, &registry, MAX).await;

        let mut replies = Cursor::new(output);
        let (status, body) = protocol::read_response(&mut replies).await.unwrap();
        assert_eq!(status, STATUS_ERROR);
        assert!(String::from_utf8(body).unwrap().starts_with("Parse error"));

        assert_eq!(
            protocol::read_response(&mut replies).await.unwrap(),
            (0, b"still here".to_vec())
        );
    }

    #[tokio::test]
    async fn test_serve_cleanup_happens_in_handle_connection() {
        // serve() itself does not touch the roster; the guest registered
        // through dispatch is still there after the loop ends.
        let (roster, registry) = fixtures();
        let connection_id = Uuid::new_v4();

        let mut input = Vec::new();
        protocol::write_request(
            &mut input,
            OP_PLAYER_PING,
            br#"{"name":"A","machine_id":"m1","vendor":"V"}"#,
        )
        .await
        .unwrap();

        let mut reader = Cursor::new(input);
        let mut output = Vec::new();
        let _ = serve(connection_id, &mut reader, &mut output, &registry, MAX).await;
        assert_eq!(roster.players().len(), 2);

        // The close path removes it.
        roster.remove_connection(connection_id);
        assert_eq!(roster.players().len(), 1);
    }
}
