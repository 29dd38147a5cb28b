use thiserror::Error;

/// Main error type for tcplink
#[derive(Error, Debug)]
pub enum TcpLinkError {
    /// Socket creation failed
    #[error("Socket creation failed: {0}")]
    SocketCreation(String),

    /// Address resolution failed
    #[error("Address resolution failed: {0}")]
    Resolution(String),

    /// Binding the local endpoint failed
    #[error("Bind failed: {0}")]
    Bind(String),

    /// Connecting to the remote endpoint failed
    #[error("Connect failed: {0}")]
    Connect(String),

    /// Send failed (timeout or transport error)
    #[error("Send failed: {0}")]
    Send(String),

    /// The transport accepted fewer bytes than requested
    #[error("Only {sent} bytes out of {requested} were sent")]
    PartialSend { sent: usize, requested: usize },

    /// Receive failed
    #[error("Receive failed: {0}")]
    Receive(String),

    /// The remote peer closed the connection
    #[error("Remote peer closed the connection")]
    RemoteClosed,

    /// The client is already closed
    #[error("Client is already closed")]
    AlreadyClosed,

    /// The client is not connected
    #[error("Not connected")]
    NotConnected,
}

/// Result type for tcplink operations
pub type Result<T> = std::result::Result<T, TcpLinkError>;
