//! # TcpLink Traits
//!
//! Core traits and types for the TcpLink TCP client library.
//!
//! This module provides the fundamental abstractions used throughout
//! the client:
//!
//! - **Resolver**: Turn a textual address into a numeric endpoint
//! - **SocketObserver**: Subscriber record for data/disconnect callbacks
//! - **TcpLinkError**: Error taxonomy for every client operation

pub mod error;
pub mod observer;
pub mod resolver;

// Re-export commonly used types
pub use error::{Result, TcpLinkError};
pub use observer::{DataHandler, DisconnectHandler, DisconnectReason, SocketObserver};
pub use resolver::{Resolver, SystemResolver};
