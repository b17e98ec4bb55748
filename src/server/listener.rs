//! TCP listener for the lobby daemon.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{Notify, Semaphore};
use tracing::{debug, error, info, warn};

use crate::config::Settings;
use crate::error::LobbyError;
use crate::ops::{GamePort, OperationRegistry};
use crate::roster::{PlayerKind, Roster};

use super::handle_connection;

/// Connection metrics for monitoring and drain tracking.
#[derive(Debug, Default)]
pub struct ConnectionMetrics {
    /// Connections accepted over the process lifetime.
    pub connections_total: AtomicU64,
    /// Currently active connections.
    pub active_connections: AtomicUsize,
}

impl ConnectionMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn connection_opened(&self) {
        self.connections_total.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    /// Get active connection count.
    pub fn active(&self) -> usize {
        self.active_connections.load(Ordering::Relaxed)
    }

    /// Get total accepted connection count.
    pub fn total(&self) -> u64 {
        self.connections_total.load(Ordering::Relaxed)
    }
}

/// TCP server for the lobby protocol.
pub struct LobbyListener {
    listener: TcpListener,
    settings: Arc<Settings>,
    roster: Arc<Roster>,
    registry: Arc<OperationRegistry>,
    game_port: Arc<GamePort>,
    metrics: Arc<ConnectionMetrics>,
    connection_semaphore: Arc<Semaphore>,
}

impl LobbyListener {
    /// Create and bind a new listener.
    ///
    /// Seeds the roster with the operator's own record from `[identity]` and
    /// wires the full operation registry.
    pub async fn bind(settings: Arc<Settings>) -> Result<Self, LobbyError> {
        let listener = TcpListener::bind((settings.server.host.as_str(), settings.server.port))
            .await
            .map_err(|e| LobbyError::Socket {
                message: format!(
                    "Failed to bind {}:{}: {}",
                    settings.server.host, settings.server.port, e
                ),
            })?;

        let identity = settings.identity();
        let roster = Arc::new(Roster::new(identity.to_record(PlayerKind::Host)));
        let game_port = Arc::new(GamePort::new(settings.game.port));
        let registry = Arc::new(OperationRegistry::new(
            Arc::clone(&roster),
            Arc::clone(&game_port),
        ));
        let metrics = Arc::new(ConnectionMetrics::new());

        let connection_semaphore = Arc::new(Semaphore::new(settings.limits.max_connections));
        info!(
            max_connections = settings.limits.max_connections,
            "Connection limiting enabled"
        );

        info!(
            host = %identity.name,
            machine_id = %identity.machine_id,
            game_port = ?settings.game.port,
            operations = ?registry.advertised(),
            "Lobby listener bound"
        );

        Ok(Self {
            listener,
            settings,
            roster,
            registry,
            game_port,
            metrics,
            connection_semaphore,
        })
    }

    /// The address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Get the shared roster.
    pub fn roster(&self) -> Arc<Roster> {
        Arc::clone(&self.roster)
    }

    /// Get the runtime-settable downstream game port.
    pub fn game_port(&self) -> Arc<GamePort> {
        Arc::clone(&self.game_port)
    }

    /// Get connection metrics.
    pub fn metrics(&self) -> Arc<ConnectionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the accept loop, spawning one task per connection.
    ///
    /// Stops accepting when `shutdown` is notified. Active connections keep
    /// running; pair with [`wait_for_drain`](Self::wait_for_drain) to let
    /// them finish.
    pub async fn run(&self, shutdown: Arc<Notify>) -> Result<(), LobbyError> {
        info!("Lobby listener running, waiting for connections...");

        loop {
            tokio::select! {
                result = self.listener.accept() => {
                    match result {
                        Ok((stream, addr)) => {
                            let permit = match self.connection_semaphore.clone().try_acquire_owned() {
                                Ok(permit) => permit,
                                Err(_) => {
                                    warn!(
                                        max = self.settings.limits.max_connections,
                                        peer = %addr,
                                        "Connection limit reached, rejecting connection"
                                    );
                                    continue;
                                }
                            };

                            let roster = Arc::clone(&self.roster);
                            let registry = Arc::clone(&self.registry);
                            let metrics = Arc::clone(&self.metrics);
                            let max_body_size = self.settings.limits.max_body_size;

                            metrics.connection_opened();
                            debug!(peer = %addr, active = metrics.active(), "New connection accepted");

                            tokio::spawn(async move {
                                let _permit = permit; // Released when the task ends
                                if let Err(e) =
                                    handle_connection(stream, roster, registry, max_body_size).await
                                {
                                    error!(peer = %addr, error = %e, "Connection handler error");
                                }
                                metrics.connection_closed();
                                debug!(peer = %addr, active = metrics.active(), "Connection closed");
                            });
                        }
                        Err(e) => {
                            warn!(error = %e, "Failed to accept connection");
                        }
                    }
                }
                _ = shutdown.notified() => {
                    info!("Shutdown signal received, stopping listener");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Wait for all active connections to drain.
    ///
    /// Returns immediately if there are no active connections.
    pub async fn wait_for_drain(&self) {
        let poll_interval = Duration::from_millis(100);

        while self.metrics.active() > 0 {
            debug!(
                active = self.metrics.active(),
                "Waiting for connections to drain"
            );
            tokio::time::sleep(poll_interval).await;
        }

        info!("All connections drained");
    }
}
