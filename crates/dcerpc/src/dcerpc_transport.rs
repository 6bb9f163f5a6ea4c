//! DCE RPC transport layer
//!
//! Connection-oriented DCE RPC over TCP (`ncacn_ip_tcp`). PDUs are
//! self-delimiting via the frag_length field in the header, so the framer
//! reads the fixed header first and then exactly the declared remainder.

use crate::dcerpc::{Pdu, PduHeader};
use crate::error::{ConnectFailure, HeaderError, Result, RpcError};
use bytes::{Bytes, BytesMut};
use std::fmt;
use std::io::ErrorKind;
use std::net::Ipv6Addr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, trace};

/// Maximum PDU size accepted from the peer (frag_length is a u16)
pub const DEFAULT_MAX_PDU_SIZE: usize = 65535;

/// Endpoint mapper / OXID resolver port
pub const DEFAULT_PORT: u16 = 135;

/// Default bound on establishing the TCP connection
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A remote host and TCP port
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Parse `host`, `host:port`, `[v6]`, `[v6]:port` or a bare IPv6 literal.
    ///
    /// `default_port` applies when the target names none. Returns `None` for
    /// an empty host or a port that is not a u16.
    pub fn parse(target: &str, default_port: u16) -> Option<Self> {
        let target = target.trim();

        if let Some(rest) = target.strip_prefix('[') {
            let (host, tail) = rest.split_once(']')?;
            let port = match tail {
                "" => default_port,
                _ => tail.strip_prefix(':')?.parse().ok()?,
            };
            return Self::checked(host, port);
        }

        // More than one colon can only be an unbracketed IPv6 literal
        if target.matches(':').count() > 1 {
            let zone_free = target.split('%').next().unwrap_or(target);
            zone_free.parse::<Ipv6Addr>().ok()?;
            return Self::checked(target, default_port);
        }

        match target.split_once(':') {
            Some((host, port)) => Self::checked(host, port.parse().ok()?),
            None => Self::checked(target, default_port),
        }
    }

    fn checked(host: &str, port: u16) -> Option<Self> {
        if host.is_empty() {
            return None;
        }
        Some(Self::new(host, port))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// A transport over a TCP socket
pub type RpcConnection = DceRpcTransport<TcpStream>;

/// Open a TCP connection to `endpoint`.
///
/// Every resolved address is tried in turn under its own `connect_timeout`;
/// the failure of the last one is reported.
pub async fn connect(endpoint: &Endpoint, connect_timeout: Duration) -> Result<RpcConnection> {
    let connect_error = |reason, source| RpcError::Connect {
        endpoint: endpoint.to_string(),
        reason,
        source,
    };

    let addrs: Vec<_> = match tokio::net::lookup_host((endpoint.host(), endpoint.port())).await {
        Ok(addrs) => addrs.collect(),
        Err(e) => return Err(connect_error(ConnectFailure::Dns, Some(e))),
    };
    if addrs.is_empty() {
        return Err(connect_error(ConnectFailure::Dns, None));
    }

    let mut last = connect_error(ConnectFailure::Unreachable, None);
    for addr in addrs {
        debug!("Connecting to {} ({})", endpoint, addr);
        match tokio::time::timeout(connect_timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                if let Err(e) = stream.set_nodelay(true) {
                    debug!("Cannot disable Nagle on {}: {}", addr, e);
                }
                return Ok(DceRpcTransport::new(stream));
            }
            Ok(Err(e)) => {
                debug!("Connect to {} failed: {}", addr, e);
                let reason = match e.kind() {
                    ErrorKind::ConnectionRefused => ConnectFailure::Refused,
                    ErrorKind::TimedOut => ConnectFailure::Timeout,
                    _ => ConnectFailure::Unreachable,
                };
                last = connect_error(reason, Some(e));
            }
            Err(_) => {
                debug!("Connect to {} timed out after {:?}", addr, connect_timeout);
                last = connect_error(ConnectFailure::Timeout, None);
            }
        }
    }
    Err(last)
}

/// DCE RPC transport for reading/writing PDUs over a byte stream
#[derive(Debug)]
pub struct DceRpcTransport<T> {
    inner: T,
    max_pdu_size: usize,
    read_buf: BytesMut,
    closed: bool,
}

impl<T> DceRpcTransport<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            max_pdu_size: DEFAULT_MAX_PDU_SIZE,
            read_buf: BytesMut::with_capacity(8192),
            closed: false,
        }
    }

    pub fn with_max_pdu_size(mut self, max_size: usize) -> Self {
        self.max_pdu_size = max_size;
        self
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl<T: AsyncRead + Unpin> DceRpcTransport<T> {
    /// Read one complete PDU fragment
    pub async fn read_pdu(&mut self) -> Result<Bytes> {
        if self.closed {
            return Err(RpcError::ConnectionClosed);
        }

        while self.read_buf.len() < PduHeader::SIZE {
            if self.fill_buf().await? == 0 {
                if self.read_buf.is_empty() {
                    return Err(RpcError::ConnectionClosed);
                }
                return Err(RpcError::IncompleteFragment {
                    expected: PduHeader::SIZE,
                    received: self.read_buf.len(),
                });
            }
        }

        let header = PduHeader::decode_prefix(&self.read_buf)?;
        let frag_length = header.frag_length as usize;

        if frag_length < PduHeader::SIZE {
            return Err(HeaderError::LengthMismatch {
                declared: frag_length,
                available: self.read_buf.len(),
            }
            .into());
        }

        if frag_length > self.max_pdu_size {
            return Err(RpcError::PduTooLarge {
                size: frag_length,
                max: self.max_pdu_size,
            });
        }

        while self.read_buf.len() < frag_length {
            if self.fill_buf().await? == 0 {
                return Err(RpcError::IncompleteFragment {
                    expected: frag_length,
                    received: self.read_buf.len(),
                });
            }
        }

        let pdu = self.read_buf.split_to(frag_length).freeze();
        trace!(
            "Received {:?} PDU: call_id={}, {} bytes",
            header.packet_type,
            header.call_id,
            frag_length
        );
        Ok(pdu)
    }

    /// Read and decode a complete PDU
    pub async fn read_pdu_decoded(&mut self) -> Result<Pdu> {
        let data = self.read_pdu().await?;
        Pdu::decode(&data)
    }

    async fn fill_buf(&mut self) -> Result<usize> {
        if self.read_buf.capacity() - self.read_buf.len() < 4096 {
            self.read_buf.reserve(8192);
        }
        Ok(self.inner.read_buf(&mut self.read_buf).await?)
    }
}

impl<T: AsyncWrite + Unpin> DceRpcTransport<T> {
    /// Write a complete, already encoded PDU
    pub async fn write_pdu(&mut self, data: &[u8]) -> Result<()> {
        if self.closed {
            return Err(RpcError::ConnectionClosed);
        }
        trace!("Sending PDU: {} bytes", data.len());
        self.inner.write_all(data).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Shut down the write half. Calling it again is a no-op.
    pub async fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.read_buf.clear();
        match self.inner.shutdown().await {
            Ok(()) => Ok(()),
            // The peer may already have torn the connection down
            Err(e) if e.kind() == ErrorKind::NotConnected => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dcerpc::{RequestPdu, DEFAULT_MAX_FRAG};
    use tokio::io::duplex;

    #[test]
    fn test_endpoint_parse() {
        let cases = [
            ("10.0.0.5", "10.0.0.5", 135),
            ("10.0.0.5:1135", "10.0.0.5", 1135),
            ("host-a", "host-a", 135),
            ("host-a:99", "host-a", 99),
            ("[fe80::1]", "fe80::1", 135),
            ("[fe80::1]:4000", "fe80::1", 4000),
            ("fe80::1", "fe80::1", 135),
            ("fe80::1%eth0", "fe80::1%eth0", 135),
            ("  192.168.1.1  ", "192.168.1.1", 135),
        ];
        for (target, host, port) in cases {
            let endpoint = Endpoint::parse(target, DEFAULT_PORT).unwrap();
            assert_eq!(endpoint.host(), host, "{}", target);
            assert_eq!(endpoint.port(), port, "{}", target);
        }
    }

    #[test]
    fn test_endpoint_parse_invalid() {
        for target in ["", ":135", "[]", "host:port", "host:70000", "[::1", "[::1]x", "a:b:c"] {
            assert!(Endpoint::parse(target, DEFAULT_PORT).is_none(), "{}", target);
        }
    }

    #[test]
    fn test_endpoint_display() {
        assert_eq!(Endpoint::new("10.0.0.5", 135).to_string(), "10.0.0.5:135");
        assert_eq!(Endpoint::new("::1", 135).to_string(), "[::1]:135");
    }

    #[tokio::test]
    async fn test_pdu_roundtrip() {
        let (client, server) = duplex(1024);
        let mut client_transport = DceRpcTransport::new(client);
        let mut server_transport = DceRpcTransport::new(server);

        let write_handle = tokio::spawn(async move {
            let request = RequestPdu::new(1, 5, Bytes::from_static(b"hello"));
            let data = request.encode(DEFAULT_MAX_FRAG as usize).unwrap();
            client_transport.write_pdu(&data).await.unwrap();
        });

        match server_transport.read_pdu_decoded().await.unwrap() {
            Pdu::Request(req) => {
                assert_eq!(req.header.call_id, 1);
                assert_eq!(req.opnum, 5);
                assert_eq!(req.stub_data.as_ref(), b"hello");
            }
            other => panic!("expected request PDU, got {:?}", other),
        }

        write_handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_multiple_pdus_in_one_write() {
        let (mut client, server) = duplex(4096);
        let mut server_transport = DceRpcTransport::new(server);

        let mut data = Vec::new();
        for call_id in 1..=3 {
            let request = RequestPdu::new(call_id, 5, Bytes::from_static(b"x"));
            data.extend_from_slice(&request.encode(DEFAULT_MAX_FRAG as usize).unwrap());
        }
        client.write_all(&data).await.unwrap();

        for call_id in 1..=3 {
            let pdu = server_transport.read_pdu_decoded().await.unwrap();
            assert_eq!(pdu.call_id(), call_id);
        }
    }

    #[tokio::test]
    async fn test_eof_before_pdu() {
        let (client, server) = duplex(64);
        drop(client);
        let mut transport = DceRpcTransport::new(server);
        assert!(matches!(
            transport.read_pdu().await,
            Err(RpcError::ConnectionClosed)
        ));
    }

    #[tokio::test]
    async fn test_eof_mid_pdu() {
        let (mut client, server) = duplex(1024);
        let request = RequestPdu::new(1, 5, Bytes::from_static(b"hello world"))
            .encode(DEFAULT_MAX_FRAG as usize)
            .unwrap();
        client.write_all(&request[..20]).await.unwrap();
        drop(client);

        let mut transport = DceRpcTransport::new(server);
        let err = transport.read_pdu().await.unwrap_err();
        assert!(matches!(
            err,
            RpcError::IncompleteFragment {
                expected: 35,
                received: 20
            }
        ));
        assert!(err.is_protocol_error());
    }

    #[tokio::test]
    async fn test_eof_mid_header() {
        let (mut client, server) = duplex(64);
        client.write_all(&[5, 0, 2]).await.unwrap();
        drop(client);

        let mut transport = DceRpcTransport::new(server);
        assert!(matches!(
            transport.read_pdu().await,
            Err(RpcError::IncompleteFragment {
                expected: 16,
                received: 3
            })
        ));
    }

    #[tokio::test]
    async fn test_pdu_too_large() {
        let (mut client, server) = duplex(1024);
        let request = RequestPdu::new(1, 5, Bytes::from(vec![0u8; 100]))
            .encode(DEFAULT_MAX_FRAG as usize)
            .unwrap();
        client.write_all(&request).await.unwrap();

        let mut transport = DceRpcTransport::new(server).with_max_pdu_size(64);
        assert!(matches!(
            transport.read_pdu().await,
            Err(RpcError::PduTooLarge { size: 124, max: 64 })
        ));
    }

    #[tokio::test]
    async fn test_close_is_idempotent() {
        let (client, server) = duplex(64);
        let mut transport = DceRpcTransport::new(client);
        transport.close().await.unwrap();
        transport.close().await.unwrap();
        assert!(transport.is_closed());
        assert!(matches!(
            transport.write_pdu(&[0u8; 16]).await,
            Err(RpcError::ConnectionClosed)
        ));
        assert!(matches!(
            transport.read_pdu().await,
            Err(RpcError::ConnectionClosed)
        ));

        // The peer observes end of stream
        let mut peer = DceRpcTransport::new(server);
        assert!(matches!(peer.read_pdu().await, Err(RpcError::ConnectionClosed)));
    }

    #[tokio::test]
    async fn test_connect_loopback() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut transport = DceRpcTransport::new(stream);
            transport.read_pdu().await.unwrap()
        });

        let endpoint = Endpoint::new("127.0.0.1", port);
        let mut transport = connect(&endpoint, Duration::from_secs(5)).await.unwrap();
        let request = RequestPdu::new(1, 5, Bytes::new())
            .encode(DEFAULT_MAX_FRAG as usize)
            .unwrap();
        transport.write_pdu(&request).await.unwrap();
        assert_eq!(server.await.unwrap(), request);
        transport.close().await.unwrap();
    }

    #[tokio::test]
    async fn test_connect_refused() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint = Endpoint::new("127.0.0.1", port);
        let err = connect(&endpoint, Duration::from_secs(5)).await.unwrap_err();
        match err {
            RpcError::Connect {
                endpoint, reason, ..
            } => {
                assert_eq!(endpoint, format!("127.0.0.1:{}", port));
                assert_eq!(reason, ConnectFailure::Refused);
            }
            other => panic!("expected connect error, got {:?}", other),
        }
    }
}
