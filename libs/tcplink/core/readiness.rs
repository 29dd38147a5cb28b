//! Bounded readiness wait on the read half of the connection.

use std::io;
use std::time::Duration;
use tokio::net::tcp::OwnedReadHalf;

/// Outcome of one bounded wait for readability.
#[derive(Debug)]
pub enum Readiness {
    /// A read on the socket will not block.
    Ready,
    /// The timeout elapsed with nothing to read.
    TimedOut,
    /// The readiness mechanism itself failed. This is not a remote close:
    /// a peer shutdown is only observable as a subsequent zero-length read.
    Failed(io::Error),
}

/// Wait until the socket is readable, for at most `timeout`
///
/// The receive loop calls this with a short timeout so a blocking read can
/// never outlive a stop request by more than one timeout period.
pub async fn wait_readable(half: &OwnedReadHalf, timeout: Duration) -> Readiness {
    match tokio::time::timeout(timeout, half.readable()).await {
        Ok(Ok(())) => Readiness::Ready,
        Ok(Err(e)) => Readiness::Failed(e),
        Err(_) => Readiness::TimedOut,
    }
}
