//! OXID resolution client
//!
//! Enumerates the network addresses a Windows host advertises to DCOM
//! clients by calling `IObjectExporter::ServerAlive2` on its RPC endpoint
//! mapper port, unauthenticated.
//!
//! # Example
//!
//! ```no_run
//! use oxid_resolver::resolve_interfaces;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), oxid_resolver::ResolveError> {
//!     for binding in resolve_interfaces("192.168.1.1", Duration::from_secs(30)).await? {
//!         println!("{} ({})", binding.address, binding.address_family);
//!     }
//!     Ok(())
//! }
//! ```

pub mod binding;
pub mod oxid_resolver;
pub mod types;

pub use binding::{
    classify_address, normalize_address, AddressFamily, NetworkBinding, ProtocolSequence,
};
pub use oxid_resolver::{OxidResolverClient, ServerAlive2Response};
pub use types::{ResolveError, Result, Stage};

use dcerpc::{Endpoint, DEFAULT_CONNECT_TIMEOUT, DEFAULT_PORT};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::time::{timeout_at, Instant};
use tracing::debug;

/// Default overall budget for connect, bind and call together
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for one resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverConfig {
    /// Port used when the target names none
    pub port: u16,
    /// Bound on establishing the TCP connection
    pub connect_timeout: Duration,
    /// Bound on the whole exchange
    pub timeout: Duration,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ResolverConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Resolve the network bindings of `target` within `timeout`.
///
/// `target` is `host`, `host:port`, `[v6]`, `[v6]:port` or a bare IPv6
/// literal; the port defaults to 135.
pub async fn resolve_interfaces(target: &str, timeout: Duration) -> Result<Vec<NetworkBinding>> {
    resolve_interfaces_with(target, &ResolverConfig::default().with_timeout(timeout)).await
}

/// Resolve the network bindings of `target` using `config`.
///
/// The connection is closed before returning, whatever the outcome.
pub async fn resolve_interfaces_with(
    target: &str,
    config: &ResolverConfig,
) -> Result<Vec<NetworkBinding>> {
    let endpoint = Endpoint::parse(target, config.port)
        .ok_or_else(|| ResolveError::InvalidTarget(target.to_string()))?;
    let deadline = Instant::now() + config.timeout;

    debug!("Resolving network bindings of {}", endpoint);
    let transport = timeout_at(deadline, dcerpc::connect(&endpoint, config.connect_timeout))
        .await
        .map_err(|_| ResolveError::Timeout {
            stage: Stage::Connect,
        })?
        .map_err(|e| ResolveError::from_rpc(Stage::Connect, e))?;

    let mut client = OxidResolverClient::new(transport);
    let result = exchange(&mut client, deadline).await;
    if let Err(e) = client.close().await {
        debug!("Error closing connection to {}: {}", endpoint, e);
    }

    let bindings = result?.network_bindings();
    debug!("{} advertises {} network bindings", endpoint, bindings.len());
    Ok(bindings)
}

async fn exchange<T: AsyncRead + AsyncWrite + Unpin>(
    client: &mut OxidResolverClient<T>,
    deadline: Instant,
) -> Result<ServerAlive2Response> {
    timeout_at(deadline, client.bind())
        .await
        .map_err(|_| ResolveError::Timeout { stage: Stage::Bind })??;
    timeout_at(deadline, client.server_alive2())
        .await
        .map_err(|_| ResolveError::Timeout { stage: Stage::Call })?
}
