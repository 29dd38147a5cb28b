//! Subscriber records for incoming-data and disconnection notifications.

use std::fmt;

/// Why the receive loop stopped delivering data.
///
/// Passed to every registered disconnection callback. A reason is produced
/// exactly once per connection, and only for transport-initiated endings:
/// an explicit `close()` never synthesizes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisconnectReason {
    /// The remote peer shut down its end (observed as a zero-length read).
    RemoteClosed,
    /// The transport or the readiness mechanism reported an error.
    ReceiveFailed(String),
}

impl fmt::Display for DisconnectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteClosed => write!(f, "remote peer closed the connection"),
            Self::ReceiveFailed(cause) => write!(f, "receive failed: {cause}"),
        }
    }
}

/// Callback invoked with each received byte chunk.
pub type DataHandler = Box<dyn Fn(&[u8]) + Send + Sync>;

/// Callback invoked once when the connection ends.
pub type DisconnectHandler = Box<dyn Fn(&DisconnectReason) + Send + Sync>;

/// A subscriber record: two optional callbacks.
///
/// Either callback may be omitted; an absent callback is silently skipped
/// at dispatch time. Records carry no identity, so removal is bulk-only via
/// [`unsubscribe_all`](crate::core::client::TcpClient::unsubscribe_all).
///
/// # Example
/// ```ignore
/// let observer = SocketObserver::new()
///     .on_data(|bytes| println!("got {} bytes", bytes.len()))
///     .on_disconnect(|reason| println!("gone: {reason}"));
/// client.subscribe(observer);
/// ```
#[derive(Default)]
pub struct SocketObserver {
    pub(crate) on_data: Option<DataHandler>,
    pub(crate) on_disconnect: Option<DisconnectHandler>,
}

impl SocketObserver {
    /// Create an empty observer with no callbacks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the incoming-data callback.
    pub fn on_data(mut self, handler: impl Fn(&[u8]) + Send + Sync + 'static) -> Self {
        self.on_data = Some(Box::new(handler));
        self
    }

    /// Set the disconnection callback.
    pub fn on_disconnect(
        mut self,
        handler: impl Fn(&DisconnectReason) + Send + Sync + 'static,
    ) -> Self {
        self.on_disconnect = Some(Box::new(handler));
        self
    }
}

impl fmt::Debug for SocketObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketObserver")
            .field("on_data", &self.on_data.is_some())
            .field("on_disconnect", &self.on_disconnect.is_some())
            .finish()
    }
}
