//! OXID resolver client implementation

use super::protocol::{object_exporter_syntax, opnum, ServerAlive2Response};
use crate::types::{ResolveError, Result, Stage};
use bytes::Bytes;
use dcerpc::{BindContext, DceRpcClient, DceRpcTransport};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

/// OXID Resolver client
///
/// Client for the IObjectExporter interface on port 135.
pub struct OxidResolverClient<T> {
    client: DceRpcClient<T>,
}

impl<T: AsyncRead + AsyncWrite + Unpin> OxidResolverClient<T> {
    /// Wrap a connected transport; call [`bind`](Self::bind) before anything else
    pub fn new(transport: DceRpcTransport<T>) -> Self {
        Self {
            client: DceRpcClient::new(transport),
        }
    }

    /// Bind the IObjectExporter interface
    pub async fn bind(&mut self) -> Result<&BindContext> {
        self.client
            .bind(object_exporter_syntax())
            .await
            .map_err(|e| ResolveError::from_rpc(Stage::Bind, e))
    }

    /// Check if the server is alive (version 2, includes bindings)
    ///
    /// A fault or a non-zero error status in the reply is reported as
    /// [`ResolveError::CallFailed`] with the code verbatim.
    pub async fn server_alive2(&mut self) -> Result<ServerAlive2Response> {
        let reply = self
            .client
            .call(opnum::SERVER_ALIVE2, Bytes::new())
            .await
            .map_err(|e| ResolveError::from_rpc(Stage::Call, e))?;

        let response = ServerAlive2Response::decode(&reply.stub, reply.is_little_endian())?;
        debug!(
            "ServerAlive2: COM version {}, {} string bindings, status=0x{:08x}",
            response.com_version,
            response.bindings.string_bindings.len(),
            response.status
        );
        if response.status != 0 {
            return Err(ResolveError::CallFailed {
                status_code: response.status,
            });
        }
        Ok(response)
    }

    /// Close the connection. Safe to call more than once.
    pub async fn close(&mut self) -> dcerpc::Result<()> {
        self.client.close().await
    }
}
