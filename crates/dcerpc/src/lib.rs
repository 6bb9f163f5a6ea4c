//! DCE RPC (MS-RPC) connection-oriented client
//!
//! This crate provides a wire-compatible implementation of the
//! connection-oriented DCE RPC protocol over TCP (`ncacn_ip_tcp`) as
//! specified in DCE 1.1 (C706) and MS-RPCE, restricted to unauthenticated
//! calls.
//!
//! # Features
//!
//! - PDU codec for bind, bind_ack, bind_nak, request, response and fault
//! - Length-delimited PDU framing over any Tokio byte stream
//! - Bind session with call-id tracking and response reassembly
//!
//! # Example
//!
//! ```no_run
//! use dcerpc::{connect, DceRpcClient, Endpoint, SyntaxId, Uuid};
//! use bytes::Bytes;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> dcerpc::Result<()> {
//!     let interface = SyntaxId::new(
//!         Uuid::parse("99fcfec4-5260-101b-bbcb-00aa0021347a").unwrap(),
//!         0,
//!         0,
//!     );
//!
//!     let endpoint = Endpoint::parse("192.168.1.1", 135).unwrap();
//!     let mut client = DceRpcClient::new(connect(&endpoint, Duration::from_secs(10)).await?);
//!     client.bind(interface).await?;
//!
//!     let response = client.call(5, Bytes::new()).await?;
//!     println!("{} bytes of stub data", response.stub.len());
//!
//!     client.close().await
//! }
//! ```

pub mod dcerpc;
pub mod dcerpc_client;
pub mod dcerpc_transport;
pub mod error;

pub use dcerpc::{
    BindAckPdu, BindNakPdu, BindPdu, ContextElement, ContextResult, DataRepresentation,
    FaultPdu, PacketFlags, PacketType, Pdu, PduHeader, PresentationResult,
    RequestPdu, ResponsePdu, SyntaxId, Uuid, DEFAULT_MAX_FRAG, NDR_SYNTAX, NDR_SYNTAX_UUID,
    NDR_SYNTAX_VERSION,
};
pub use dcerpc_client::{BindContext, BindState, CallResponse, DceRpcClient, MAX_RESPONSE_SIZE};
pub use dcerpc_transport::{
    connect, DceRpcTransport, Endpoint, RpcConnection, DEFAULT_CONNECT_TIMEOUT,
    DEFAULT_MAX_PDU_SIZE, DEFAULT_PORT,
};
pub use error::{BindRejection, ConnectFailure, HeaderError, RejectReason, Result, RpcError};
