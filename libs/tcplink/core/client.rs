use crate::config::{ClientConfig, SocketConfig};
use crate::connection_state::{AtomicClientState, ClientState};
use crate::readiness::{wait_readable, Readiness};
use crate::registry::ObserverRegistry;
use crate::traits::*;
use socket2::{SockRef, TcpKeepalive};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpSocket;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Largest chunk delivered to observers in one data callback.
///
/// A transport-level message larger than this arrives as multiple
/// sequential callbacks; no reassembly is performed.
pub const MAX_PACKET_SIZE: usize = 2048;

/// Point-to-point TCP client with observer fan-out
///
/// The client owns exactly one connection. `connect` establishes it and
/// starts a dedicated background task that keeps receiving inbound data and
/// pushing it to the registered observers, along with a single disconnection
/// notice should the transport end. `send` writes on the caller's own task,
/// independent of the receive path.
///
/// Exactly two execution contexts ever touch one client: the application's
/// calling task and the one receive task. The lifecycle is one-way; a
/// closed client stays closed, and reconnecting means building a new one.
///
/// # Example
/// ```ignore
/// let mut client = TcpClient::new(ClientConfig::default());
/// client.subscribe(
///     SocketObserver::new()
///         .on_data(|bytes| println!("received {} bytes", bytes.len()))
///         .on_disconnect(|reason| println!("disconnected: {reason}")),
/// );
/// client.connect("127.0.0.1", 9000).await?;
/// client.send(b"hello").await?;
/// client.close().await?;
/// ```
pub struct TcpClient {
    /// Client configuration
    config: ClientConfig,
    /// Atomic lifecycle state, shared with the receive task
    state: Arc<AtomicClientState>,
    /// Observer registry, shared with the receive task
    registry: Arc<ObserverRegistry>,
    /// Write half of the connection; the read half lives in the receive task
    writer: Option<Mutex<OwnedWriteHalf>>,
    /// Receive task handle, used only to request stop and join
    receive_task: Option<tokio::task::JoinHandle<()>>,
    /// Local endpoint, captured once at connect
    local_addr: Option<SocketAddr>,
    /// Remote endpoint, captured once at connect
    peer_addr: Option<SocketAddr>,
}

impl TcpClient {
    /// Create an unconnected client from configuration
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            state: Arc::new(AtomicClientState::new(ClientState::Unopened)),
            registry: Arc::new(ObserverRegistry::new()),
            writer: None,
            receive_task: None,
            local_addr: None,
            peer_addr: None,
        }
    }

    /// Connect to a remote endpoint, binding the default local address
    ///
    /// Equivalent to [`connect_from`](Self::connect_from) with
    /// `"0.0.0.0"` and an ephemeral port.
    pub async fn connect(&mut self, address: &str, port: u16) -> Result<()> {
        self.connect_from(address, port, "0.0.0.0", 0).await
    }

    /// Connect to a remote endpoint from an explicit local address
    ///
    /// Runs the full setup sequence (resolution, socket creation and
    /// option application, local bind, remote connect) and starts the
    /// receive task before returning. Each stage fails with its own error
    /// variant; on any failure the state is `Failed`, no background task is
    /// running and no socket is left open.
    ///
    /// A non-zero `local_port` lets multiple clients in one process bind
    /// distinct, predictable ports. `local_address` must be an IP literal.
    pub async fn connect_from(
        &mut self,
        address: &str,
        port: u16,
        local_address: &str,
        local_port: u16,
    ) -> Result<()> {
        match self.state.get() {
            ClientState::Unopened | ClientState::Failed => {}
            ClientState::Closed => return Err(TcpLinkError::AlreadyClosed),
            other => {
                return Err(TcpLinkError::Connect(format!(
                    "connect attempted while {other}"
                )))
            }
        }
        self.state.set(ClientState::Connecting);

        match self.establish(address, port, local_address, local_port).await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.state.set(ClientState::Failed);
                Err(e)
            }
        }
    }

    async fn establish(
        &mut self,
        address: &str,
        port: u16,
        local_address: &str,
        local_port: u16,
    ) -> Result<()> {
        let remote = self.config.resolver.resolve(address, port).await?;

        let local_ip: IpAddr = local_address.parse().map_err(|_| {
            TcpLinkError::Bind(format!("invalid local address: {local_address}"))
        })?;

        let socket = match remote {
            SocketAddr::V4(_) => TcpSocket::new_v4(),
            SocketAddr::V6(_) => TcpSocket::new_v6(),
        }
        .map_err(|e| TcpLinkError::SocketCreation(e.to_string()))?;

        apply_socket_options(&socket, &self.config.socket);

        socket
            .bind(SocketAddr::new(local_ip, local_port))
            .map_err(|e| TcpLinkError::Bind(e.to_string()))?;

        let stream = socket
            .connect(remote)
            .await
            .map_err(|e| TcpLinkError::Connect(e.to_string()))?;

        self.local_addr = stream.local_addr().ok();
        self.peer_addr = stream.peer_addr().ok();
        info!("connected to {}", remote);

        let (read_half, write_half) = stream.into_split();
        self.writer = Some(Mutex::new(write_half));

        // Connected must be visible before the loop's first stop-check.
        self.state.set(ClientState::Connected);

        let state = Arc::clone(&self.state);
        let registry = Arc::clone(&self.registry);
        let poll_timeout = self.config.poll_timeout;
        self.receive_task = Some(tokio::spawn(async move {
            receive_loop(read_half, state, registry, poll_timeout).await;
        }));

        Ok(())
    }

    /// Send bytes on the caller's task
    ///
    /// One direct write, bounded by the configured send timeout. The
    /// outcome is classified precisely: full success, a transport/timeout
    /// error, or a partial write reported with the exact byte count. A
    /// partial write is never retried here; resending the remainder is
    /// the caller's policy.
    pub async fn send(&self, bytes: &[u8]) -> Result<()> {
        match self.state.get() {
            ClientState::Connected => {}
            ClientState::Closed => return Err(TcpLinkError::AlreadyClosed),
            _ => return Err(TcpLinkError::NotConnected),
        }

        let writer = self.writer.as_ref().ok_or(TcpLinkError::NotConnected)?;
        let mut guard = writer.lock().await;

        let sent = tokio::time::timeout(self.config.socket.send_timeout, guard.write(bytes))
            .await
            .map_err(|_| {
                TcpLinkError::Send(format!(
                    "no bytes accepted within {:?}",
                    self.config.socket.send_timeout
                ))
            })?
            .map_err(|e| TcpLinkError::Send(e.to_string()))?;

        if sent < bytes.len() {
            return Err(TcpLinkError::PartialSend {
                sent,
                requested: bytes.len(),
            });
        }
        Ok(())
    }

    /// Register an observer; dispatch order is registration order
    pub fn subscribe(&self, observer: SocketObserver) {
        self.registry.subscribe(observer);
    }

    /// Remove every registered observer
    pub fn unsubscribe_all(&self) {
        self.registry.unsubscribe_all();
    }

    /// Close the connection
    ///
    /// Flips the lifecycle state first so the receive loop's next poll
    /// observes it, waits for the loop to fully exit, then releases the
    /// socket. Closing an already-closed (or never-opened) client is a
    /// reported error, not a crash. After the receive loop itself detected
    /// a disconnect, `close` still runs to release the socket; the join
    /// returns immediately in that case.
    pub async fn close(&mut self) -> Result<()> {
        match self.state.get() {
            ClientState::Connected | ClientState::Disconnected => {}
            _ => return Err(TcpLinkError::AlreadyClosed),
        }

        info!("closing connection");
        self.state.set(ClientState::Closed);

        if let Some(handle) = self.receive_task.take() {
            let _ = handle.await;
        }
        self.writer = None;

        Ok(())
    }

    /// Non-blocking snapshot: is the connection up
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state.is_connected()
    }

    /// Current lifecycle state
    #[inline]
    pub fn state(&self) -> ClientState {
        self.state.get()
    }

    /// Local endpoint of the current/last connection
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    /// Remote endpoint of the current/last connection
    pub fn peer_addr(&self) -> Option<SocketAddr> {
        self.peer_addr
    }
}

impl Drop for TcpClient {
    fn drop(&mut self) {
        // Backstop for teardown without close(): stop the loop and let the
        // runtime drop the read half it owns. The write half goes with self.
        if let Some(handle) = self.receive_task.take() {
            self.state.set(ClientState::Closed);
            handle.abort();
        }
    }
}

impl std::fmt::Debug for TcpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TcpClient")
            .field("state", &self.state.get())
            .field("peer_addr", &self.peer_addr)
            .field("local_addr", &self.local_addr)
            .finish()
    }
}

/// Apply configured socket options before bind/connect
///
/// Option failures are diagnostics only; they never fail the connect.
fn apply_socket_options(socket: &TcpSocket, config: &SocketConfig) {
    if config.reuse_address {
        if let Err(e) = socket.set_reuseaddr(true) {
            warn!("failed to set SO_REUSEADDR: {}", e);
        }
    }
    #[cfg(unix)]
    {
        if config.reuse_port {
            if let Err(e) = socket.set_reuseport(true) {
                warn!("failed to set SO_REUSEPORT: {}", e);
            }
        }
    }

    let sock_ref = SockRef::from(socket);

    if let Some(timeout) = config.receive_timeout {
        if let Err(e) = sock_ref.set_read_timeout(Some(timeout)) {
            warn!("failed to set receive timeout: {}", e);
        }
    }
    if let Err(e) = sock_ref.set_write_timeout(Some(config.send_timeout)) {
        warn!("failed to set send timeout: {}", e);
    }

    if let Some(ka) = &config.keep_alive {
        let params = TcpKeepalive::new()
            .with_time(ka.idle)
            .with_interval(ka.interval)
            .with_retries(ka.retries);
        if let Err(e) = sock_ref.set_tcp_keepalive(&params) {
            warn!("failed to enable keepalive: {}", e);
        }
    }
}

/// Receive task body: wait, read, dispatch, until stopped or disconnected
///
/// Runs to completion exactly once per successful connect. The polling
/// timeout only bounds how long a stop request can go unnoticed.
async fn receive_loop(
    read_half: OwnedReadHalf,
    state: Arc<AtomicClientState>,
    registry: Arc<ObserverRegistry>,
    poll_timeout: Duration,
) {
    let mut buf = [0u8; MAX_PACKET_SIZE];

    while state.is_connected() {
        match wait_readable(&read_half, poll_timeout).await {
            Readiness::TimedOut => continue,
            Readiness::Failed(e) => {
                error!("readiness wait failed: {}", e);
                mark_disconnected(&state, &registry, DisconnectReason::ReceiveFailed(e.to_string()));
                return;
            }
            Readiness::Ready => match read_half.try_read(&mut buf) {
                Ok(0) => {
                    debug!("remote peer closed the connection");
                    mark_disconnected(&state, &registry, DisconnectReason::RemoteClosed);
                    return;
                }
                Ok(n) => registry.dispatch_data(&buf[..n]),
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => continue,
                Err(e) => {
                    error!("receive failed: {}", e);
                    mark_disconnected(&state, &registry, DisconnectReason::ReceiveFailed(e.to_string()));
                    return;
                }
            },
        }
    }

    debug!("receive loop exiting on close request");
}

/// Claim the transition out of Connected and notify observers
///
/// The compare-exchange makes the disconnect notification exactly-once: if
/// close() already moved the state to Closed, the exchange loses and no
/// notification is synthesized, since the closing caller knows the outcome.
fn mark_disconnected(
    state: &AtomicClientState,
    registry: &ObserverRegistry,
    reason: DisconnectReason,
) {
    if state
        .compare_exchange(ClientState::Connected, ClientState::Disconnected)
        .is_ok()
    {
        registry.dispatch_disconnect(&reason);
    }
}
