//! Common test utilities for TcpLink integration tests
//!
//! This module provides a scriptable TCP listener and shared plumbing for
//! exercising the client against a real local socket.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

/// Macro for verbose test output (controlled by TEST_VERBOSE env var)
#[macro_export]
macro_rules! verbose_println {
    ($($arg:tt)*) => {
        if std::env::var("TEST_VERBOSE").is_ok() {
            println!($($arg)*);
        }
    };
}

/// Initialize tracing output for a test run (opt-in via RUST_LOG)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// What the mock server does with each accepted connection
#[derive(Clone)]
pub enum ServerBehavior {
    /// Echo every received chunk back to the client
    Echo,
    /// Write the payload (if any), then close the connection
    SendThenClose(Vec<u8>),
    /// Accept and then neither read nor write
    Silent,
}

/// A simple scriptable TCP server for testing
pub struct MockTcpServer {
    pub addr: SocketAddr,
    shutdown: Arc<Notify>,
}

impl MockTcpServer {
    /// Create and start a mock server with the given per-connection behavior
    pub async fn start(behavior: ServerBehavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = Arc::new(Notify::new());
        let shutdown_clone = shutdown.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    result = listener.accept() => {
                        match result {
                            Ok((stream, _)) => {
                                let behavior = behavior.clone();
                                let shutdown = shutdown_clone.clone();
                                tokio::spawn(async move {
                                    Self::handle_connection(stream, behavior, shutdown).await;
                                });
                            }
                            Err(e) => {
                                eprintln!("Accept error: {}", e);
                                break;
                            }
                        }
                    }
                    _ = shutdown_clone.notified() => {
                        break;
                    }
                }
            }
        });

        Self { addr, shutdown }
    }

    async fn handle_connection(mut stream: TcpStream, behavior: ServerBehavior, shutdown: Arc<Notify>) {
        match behavior {
            ServerBehavior::Echo => {
                let mut buf = vec![0u8; 4096];
                loop {
                    tokio::select! {
                        result = stream.read(&mut buf) => {
                            match result {
                                Ok(0) | Err(_) => break,
                                Ok(n) => {
                                    if stream.write_all(&buf[..n]).await.is_err() {
                                        break;
                                    }
                                }
                            }
                        }
                        _ = shutdown.notified() => {
                            break;
                        }
                    }
                }
            }
            ServerBehavior::SendThenClose(payload) => {
                if !payload.is_empty() {
                    let _ = stream.write_all(&payload).await;
                    let _ = stream.flush().await;
                }
                let _ = stream.shutdown().await;
            }
            ServerBehavior::Silent => {
                // Hold the connection open without reading until shutdown.
                shutdown.notified().await;
            }
        }
    }

    /// Port the server is listening on
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Shutdown the server
    pub fn shutdown(&self) {
        self.shutdown.notify_waiters();
    }
}

impl Drop for MockTcpServer {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Poll `cond` until it holds or `timeout` elapses
pub async fn wait_for(cond: impl Fn() -> bool, timeout: Duration) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Test fixtures for lifecycle states
pub mod fixtures {
    use tcplink::{AtomicClientState, ClientState};

    pub fn unopened_state() -> AtomicClientState {
        AtomicClientState::new(ClientState::Unopened)
    }

    pub fn connected_state() -> AtomicClientState {
        AtomicClientState::new(ClientState::Connected)
    }
}
