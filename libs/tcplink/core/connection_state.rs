//! Atomic lifecycle state shared between the facade and the receive loop.

use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle state of a [`TcpClient`](crate::client::TcpClient)
///
/// The state only moves forward: once `Closed`, it never returns to
/// `Connected`; reconnecting requires a new client instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ClientState {
    /// No connect attempt has been made yet.
    Unopened = 0,
    /// A connect attempt is in progress.
    Connecting = 1,
    /// Connected; the receive loop is running.
    Connected = 2,
    /// The transport is gone (remote close or receive failure) but the
    /// socket has not been released yet; `close()` is still required.
    Disconnected = 3,
    /// `close()` ran: the receive loop was joined and the socket released.
    Closed = 4,
    /// The last connect attempt failed.
    Failed = 5,
}

impl ClientState {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Unopened,
            1 => Self::Connecting,
            2 => Self::Connected,
            3 => Self::Disconnected,
            4 => Self::Closed,
            _ => Self::Failed,
        }
    }
}

impl std::fmt::Display for ClientState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unopened => write!(f, "Unopened"),
            Self::Connecting => write!(f, "Connecting"),
            Self::Connected => write!(f, "Connected"),
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Closed => write!(f, "Closed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

/// Atomic wrapper around [`ClientState`]
///
/// Both execution contexts (the caller and the receive loop) read and write
/// the state through this wrapper. A single atomic word keeps the
/// connected/closed answers consistent: no reader can ever observe a closed
/// client that still claims to be connected.
#[derive(Debug)]
pub struct AtomicClientState(AtomicU8);

impl AtomicClientState {
    pub fn new(state: ClientState) -> Self {
        Self(AtomicU8::new(state as u8))
    }

    /// Get the current state
    #[inline]
    pub fn get(&self) -> ClientState {
        ClientState::from_u8(self.0.load(Ordering::Acquire))
    }

    /// Set the state unconditionally
    #[inline]
    pub fn set(&self, state: ClientState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Transition from `current` to `new` only if the state is still `current`
    ///
    /// Returns `Ok(current)` if the exchange won, `Err(actual)` with the
    /// observed state otherwise. Used by the receive loop to claim the
    /// one-and-only disconnect notification.
    pub fn compare_exchange(
        &self,
        current: ClientState,
        new: ClientState,
    ) -> std::result::Result<ClientState, ClientState> {
        self.0
            .compare_exchange(current as u8, new as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(ClientState::from_u8)
            .map_err(ClientState::from_u8)
    }

    /// Check if currently connected
    #[inline]
    pub fn is_connected(&self) -> bool {
        self.get() == ClientState::Connected
    }

    /// Check if `close()` already ran
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.get() == ClientState::Closed
    }
}

impl Default for AtomicClientState {
    fn default() -> Self {
        Self::new(ClientState::Unopened)
    }
}
