//! Client session: connection, requests, and the heartbeat task.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{LobbyError, LobbyResult, ProtocolErrorKind};
use crate::protocol::negotiate::{
    self, OP_PING, OP_PLAYER_PING, OP_PLAYER_PROFILES_LIST, OP_PROTOCOLS, OP_SERVER_PORT,
};
use crate::protocol::{self, STATUS_GAME_UNAVAILABLE, STATUS_OK};
use crate::roster::{Announcement, PlayerIdentity, PlayerRecord};

/// How often the client announces itself by default.
pub const DEFAULT_HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

struct HeartbeatTask {
    handle: JoinHandle<()>,
    stop: Arc<Notify>,
}

/// A session against one lobby server.
///
/// The connection is shared between foreground calls and the background
/// heartbeat; the protocol allows exactly one in-flight request per
/// connection, so every request holds the connection lock for its full
/// write+read cycle.
pub struct LobbyClient {
    identity: PlayerIdentity,
    server_host: String,
    server_port: u16,
    heartbeat_interval: Duration,
    conn: Arc<Mutex<Option<TcpStream>>>,
    heartbeat: Mutex<Option<HeartbeatTask>>,
}

impl LobbyClient {
    /// Create a client for the given identity and server address. Does not
    /// connect yet.
    pub fn new(identity: PlayerIdentity, server_host: impl Into<String>, server_port: u16) -> Self {
        Self {
            identity,
            server_host: server_host.into(),
            server_port,
            heartbeat_interval: DEFAULT_HEARTBEAT_INTERVAL,
            conn: Arc::new(Mutex::new(None)),
            heartbeat: Mutex::new(None),
        }
    }

    /// Override the heartbeat interval (builder style).
    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// The identity announced by this client.
    pub fn identity(&self) -> &PlayerIdentity {
        &self.identity
    }

    /// Whether a connection is currently open.
    pub async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Open the connection and start the heartbeat task.
    ///
    /// The first heartbeat is sent right away in the background; this call
    /// does not wait for its result. Calling `connect` on a live session
    /// tears the old session down first.
    pub async fn connect(&self) -> LobbyResult<()> {
        self.disconnect().await?;

        let stream = TcpStream::connect((self.server_host.as_str(), self.server_port)).await?;
        *self.conn.lock().await = Some(stream);
        debug!(
            host = %self.server_host,
            port = self.server_port,
            player = %self.identity.name,
            "Connected to lobby server"
        );

        self.start_heartbeat().await;
        Ok(())
    }

    /// Stop the heartbeat task and close the connection.
    ///
    /// Safe to call repeatedly, and returns promptly even if a heartbeat
    /// send is in flight: the task is aborted at its next await point.
    pub async fn disconnect(&self) -> LobbyResult<()> {
        if let Some(task) = self.heartbeat.lock().await.take() {
            task.stop.notify_waiters();
            task.handle.abort();
            let _ = task.handle.await;
        }

        if let Some(mut stream) = self.conn.lock().await.take() {
            if let Err(e) = stream.shutdown().await {
                debug!(error = %e, "Error while closing connection");
            }
            debug!("Disconnected from lobby server");
        }

        Ok(())
    }

    /// Issue one request and return the raw `(status, body)` reply.
    pub async fn send_request(&self, operation: &str, body: &[u8]) -> LobbyResult<(u8, Vec<u8>)> {
        Self::request_on(&self.conn, operation, body).await
    }

    async fn request_on(
        conn: &Mutex<Option<TcpStream>>,
        operation: &str,
        body: &[u8],
    ) -> LobbyResult<(u8, Vec<u8>)> {
        // Held across write and read: replies carry no request id, so the
        // next frame on the stream must belong to this request.
        let mut guard = conn.lock().await;
        let stream = guard.as_mut().ok_or(LobbyError::NotConnected)?;

        protocol::write_request(stream, operation, body).await?;
        protocol::read_response(stream).await
    }

    async fn start_heartbeat(&self) {
        let stop = Arc::new(Notify::new());
        let stop_for_task = Arc::clone(&stop);
        let conn = Arc::clone(&self.conn);
        let announcement = self.identity.announcement();
        let interval = self.heartbeat_interval;
        let player = self.identity.name.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = stop_for_task.notified() => break,
                    _ = ticker.tick() => {
                        match Self::send_heartbeat(&conn, &announcement).await {
                            Ok(()) => debug!(player = %player, "Heartbeat sent"),
                            Err(e) => {
                                warn!(player = %player, error = %e, "Heartbeat failed, stopping");
                                break;
                            }
                        }
                    }
                }
            }
        });

        *self.heartbeat.lock().await = Some(HeartbeatTask { handle, stop });
    }

    async fn send_heartbeat(
        conn: &Mutex<Option<TcpStream>>,
        announcement: &Announcement,
    ) -> LobbyResult<()> {
        let body = serde_json::to_vec(announcement)?;
        let (status, reply) = Self::request_on(conn, OP_PLAYER_PING, &body).await?;
        if status != STATUS_OK {
            return Err(Self::request_failed(OP_PLAYER_PING, status, reply));
        }
        Ok(())
    }

    /// `c:ping` — send a payload and return the echoed bytes.
    pub async fn ping(&self, payload: &[u8]) -> LobbyResult<Vec<u8>> {
        let (status, body) = self.send_request(OP_PING, payload).await?;
        if status != STATUS_OK {
            return Err(Self::request_failed(OP_PING, status, body));
        }
        Ok(body)
    }

    /// `c:protocols` — exchange operation lists and return the server's.
    ///
    /// The client sends its own claimed set; the common subset is logged.
    pub async fn protocols(&self) -> LobbyResult<Vec<String>> {
        let claimed = negotiate::join_operations(negotiate::SUPPORTED_OPERATIONS);
        let (status, body) = self.send_request(OP_PROTOCOLS, &claimed).await?;
        if status != STATUS_OK {
            return Err(Self::request_failed(OP_PROTOCOLS, status, body));
        }

        let theirs = negotiate::split_operations(&body).ok_or_else(|| LobbyError::Protocol {
            kind: ProtocolErrorKind::InvalidResponse {
                message: "operation list is not ASCII".to_string(),
            },
        })?;
        let common = negotiate::intersect(negotiate::SUPPORTED_OPERATIONS, &theirs);
        debug!(server = ?theirs, common = ?common, "Protocol negotiation");
        Ok(theirs)
    }

    /// `c:server_port` — the downstream game port.
    ///
    /// Status 32 from the server becomes [`LobbyError::GameUnavailable`].
    pub async fn server_port(&self) -> LobbyResult<u16> {
        let (status, body) = self.send_request(OP_SERVER_PORT, b"").await?;
        match status {
            STATUS_OK if body.len() == 2 => Ok(u16::from_be_bytes([body[0], body[1]])),
            STATUS_OK => Err(LobbyError::Protocol {
                kind: ProtocolErrorKind::InvalidResponse {
                    message: format!("expected a 2-byte port, got {} bytes", body.len()),
                },
            }),
            STATUS_GAME_UNAVAILABLE => Err(LobbyError::GameUnavailable),
            _ => Err(Self::request_failed(OP_SERVER_PORT, status, body)),
        }
    }

    /// `c:player_profiles_list` — every player the server currently knows.
    pub async fn player_profiles_list(&self) -> LobbyResult<Vec<PlayerRecord>> {
        let (status, body) = self.send_request(OP_PLAYER_PROFILES_LIST, b"").await?;
        if status != STATUS_OK {
            return Err(Self::request_failed(OP_PLAYER_PROFILES_LIST, status, body));
        }
        Ok(serde_json::from_slice(&body)?)
    }

    fn request_failed(operation: &str, status: u8, body: Vec<u8>) -> LobbyError {
        LobbyError::RequestFailed {
            operation: operation.to_string(),
            status,
            message: String::from_utf8_lossy(&body).into_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LobbyClient {
        let identity = PlayerIdentity::new(Some("A".to_string()), "m1".to_string(), None);
        LobbyClient::new(identity, "127.0.0.1", 3939)
    }

    #[tokio::test]
    async fn test_send_request_before_connect_fails() {
        let client = client();
        let err = client.send_request(OP_PING, b"").await.unwrap_err();
        assert!(matches!(err, LobbyError::NotConnected));
    }

    #[tokio::test]
    async fn test_convenience_calls_before_connect_fail() {
        let client = client();
        assert!(matches!(
            client.ping(b"x").await.unwrap_err(),
            LobbyError::NotConnected
        ));
        assert!(matches!(
            client.server_port().await.unwrap_err(),
            LobbyError::NotConnected
        ));
        assert!(matches!(
            client.player_profiles_list().await.unwrap_err(),
            LobbyError::NotConnected
        ));
    }

    #[tokio::test]
    async fn test_disconnect_without_connect_is_noop() {
        let client = client();
        client.disconnect().await.unwrap();
        client.disconnect().await.unwrap();
        assert!(!client.is_connected().await);
    }
}
