//! Configuration for the TCP client and its socket options.

use crate::traits::{Resolver, SystemResolver};
use std::sync::Arc;
use std::time::Duration;

/// TCP keepalive probing parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeepAliveConfig {
    /// Idle time before the first probe (TCP_KEEPIDLE).
    pub idle: Duration,
    /// Time between probes (TCP_KEEPINTVL).
    pub interval: Duration,
    /// Probes sent before the connection is dropped (TCP_KEEPCNT).
    pub retries: u32,
}

impl Default for KeepAliveConfig {
    fn default() -> Self {
        Self {
            idle: Duration::from_secs(1),
            interval: Duration::from_secs(1),
            retries: 3,
        }
    }
}

/// Socket-level options, applied once at connection setup
///
/// A failure to apply any of these is surfaced as a diagnostic, never as a
/// `connect` failure.
#[derive(Clone, Debug)]
pub struct SocketConfig {
    /// Receive timeout. `None` means a read waits indefinitely; the
    /// receive loop's own polling keeps it interruptible regardless.
    pub receive_timeout: Option<Duration>,
    /// Send timeout, so a slow peer cannot stall the caller indefinitely.
    pub send_timeout: Duration,
    /// Keepalive probing. `None` disables keepalive.
    pub keep_alive: Option<KeepAliveConfig>,
    /// Enable SO_REUSEADDR.
    pub reuse_address: bool,
    /// Enable SO_REUSEPORT.
    pub reuse_port: bool,
}

impl Default for SocketConfig {
    fn default() -> Self {
        Self {
            receive_timeout: None,
            send_timeout: Duration::from_millis(100),
            keep_alive: Some(KeepAliveConfig::default()),
            reuse_address: true,
            reuse_port: true,
        }
    }
}

impl SocketConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the receive timeout.
    pub fn receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = Some(timeout);
        self
    }

    /// Set the send timeout.
    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Set the keepalive parameters.
    pub fn keep_alive(mut self, config: KeepAliveConfig) -> Self {
        self.keep_alive = Some(config);
        self
    }

    /// Disable keepalive.
    pub fn no_keep_alive(mut self) -> Self {
        self.keep_alive = None;
        self
    }

    /// Enable or disable SO_REUSEADDR.
    pub fn reuse_address(mut self, enabled: bool) -> Self {
        self.reuse_address = enabled;
        self
    }

    /// Enable or disable SO_REUSEPORT.
    pub fn reuse_port(mut self, enabled: bool) -> Self {
        self.reuse_port = enabled;
        self
    }
}

/// Configuration for a [`TcpClient`](crate::client::TcpClient).
#[derive(Clone)]
pub struct ClientConfig {
    /// Socket-level options.
    pub socket: SocketConfig,
    /// How long one receive-loop iteration waits for readability before
    /// re-checking the stop condition. Not a protocol timeout: it only
    /// bounds how quickly the loop notices a `close()` request.
    pub poll_timeout: Duration,
    /// Address resolution collaborator.
    pub resolver: Arc<dyn Resolver>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            socket: SocketConfig::default(),
            poll_timeout: Duration::from_secs(1),
            resolver: Arc::new(SystemResolver),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set socket options.
    pub fn socket_config(mut self, config: SocketConfig) -> Self {
        self.socket = config;
        self
    }

    /// Set the receive-loop polling timeout.
    pub fn poll_timeout(mut self, timeout: Duration) -> Self {
        self.poll_timeout = timeout;
        self
    }

    /// Replace the resolution collaborator.
    pub fn resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("socket", &self.socket)
            .field("poll_timeout", &self.poll_timeout)
            .finish()
    }
}
