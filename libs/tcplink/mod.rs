//! # TcpLink
//!
//! A point-to-point TCP client with a dedicated background receive path
//! and observer fan-out.
//!
//! ## Features
//!
//! - **One connection, one loop**: a single background task receives and
//!   dispatches inbound data; the application sends on its own task
//! - **Atomic lifecycle**: state shared between both contexts through one
//!   atomic word, so stale mixed connected/closed reads cannot happen
//! - **Observer fan-out**: ordered subscriber records with optional data
//!   and disconnect callbacks behind a single lock
//! - **Precise send outcomes**: full, partial (with exact byte count), or
//!   failed; never silently retried
//! - **Pluggable resolution**: address lookup is a collaborator trait
//!
//! ## Example
//!
//! ```rust,ignore
//! use tcplink::{ClientConfig, SocketObserver, TcpClient};
//!
//! #[tokio::main]
//! async fn main() -> tcplink::Result<()> {
//!     let mut client = TcpClient::new(ClientConfig::default());
//!
//!     client.subscribe(
//!         SocketObserver::new()
//!             .on_data(|bytes| println!("received {} bytes", bytes.len()))
//!             .on_disconnect(|reason| println!("disconnected: {reason}")),
//!     );
//!
//!     client.connect("127.0.0.1", 9000).await?;
//!     client.send(b"hello").await?;
//!     client.close().await?;
//!
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod traits;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use crate::core::{
    client, config, connection_state, readiness, registry,
    client::{TcpClient, MAX_PACKET_SIZE},
    config::{ClientConfig, KeepAliveConfig, SocketConfig},
    connection_state::{AtomicClientState, ClientState},
    readiness::{wait_readable, Readiness},
    registry::ObserverRegistry,
};

/// Type alias for Result with TcpLinkError
pub type Result<T> = std::result::Result<T, traits::TcpLinkError>;
