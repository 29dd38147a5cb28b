use crate::error::{Result, TcpLinkError};
use async_trait::async_trait;
use std::net::{IpAddr, SocketAddr};

/// Trait for resolving a textual address to a numeric endpoint
///
/// The client treats resolution as an external collaborator: a single
/// `resolve(host, port)` call at connect time. A resolution failure is a
/// terminal error for that connect attempt.
///
/// Implement this trait to plug in a custom resolution scheme, or to
/// inject controlled failures in tests.
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Resolve a host string to a socket address
    ///
    /// # Returns
    /// * `Ok(addr)` - The resolved endpoint
    /// * `Err(TcpLinkError::Resolution)` - The name could not be resolved
    async fn resolve(&self, host: &str, port: u16) -> Result<SocketAddr>;
}

/// Default resolver backed by the system lookup
///
/// IP literals short-circuit without a lookup; anything else goes through
/// the system resolver and the first returned address wins.
pub struct SystemResolver;

#[async_trait]
impl Resolver for SystemResolver {
    async fn resolve(&self, host: &str, port: u16) -> Result<SocketAddr> {
        if let Ok(ip) = host.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, port));
        }

        let mut addrs = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| TcpLinkError::Resolution(e.to_string()))?;

        addrs
            .next()
            .ok_or_else(|| TcpLinkError::Resolution(format!("no addresses found for {host}")))
    }
}
