//! DCE RPC Client
//!
//! A bind session over one connection: bind a single presentation context,
//! then issue sequential calls on it. Always unauthenticated.

use crate::dcerpc::{
    BindAckPdu, BindPdu, DataRepresentation, Pdu, RequestPdu, SyntaxId, DEFAULT_MAX_FRAG,
};
use crate::dcerpc_transport::DceRpcTransport;
use crate::error::{BindRejection, Result, RpcError};
use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, trace};

/// Upper bound on a reassembled multi-fragment response
pub const MAX_RESPONSE_SIZE: usize = 16 * 1024 * 1024;

/// Where a session is in the bind handshake
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindState {
    Unbound,
    Binding,
    Bound,
    Failed,
}

impl BindState {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unbound => "unbound",
            Self::Binding => "binding",
            Self::Bound => "bound",
            Self::Failed => "failed",
        }
    }
}

/// What the server agreed to in its bind_ack
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindContext {
    pub interface: SyntaxId,
    pub transfer_syntax: SyntaxId,
    pub context_id: u16,
    /// Largest fragment we may send
    pub max_xmit_frag: u16,
    /// Largest fragment the server will send us
    pub max_recv_frag: u16,
    pub assoc_group_id: u32,
    pub secondary_addr: String,
}

/// Result stub of a completed call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallResponse {
    pub stub: Bytes,
    /// Label of the response PDU; the stub is marshalled in its byte order
    pub data_rep: DataRepresentation,
}

impl CallResponse {
    pub fn is_little_endian(&self) -> bool {
        self.data_rep.is_little_endian()
    }
}

impl BindContext {
    fn from_ack(interface: SyntaxId, ack: &BindAckPdu) -> Option<Self> {
        let accepted = ack.accepted()?;
        Some(Self {
            interface,
            transfer_syntax: accepted.transfer_syntax,
            context_id: 0,
            // The server's receive limit bounds what we transmit
            max_xmit_frag: DEFAULT_MAX_FRAG.min(ack.max_recv_frag),
            max_recv_frag: DEFAULT_MAX_FRAG.min(ack.max_xmit_frag),
            assoc_group_id: ack.assoc_group_id,
            secondary_addr: ack.secondary_addr.clone(),
        })
    }
}

/// DCE RPC client for making calls to a DCE RPC server
pub struct DceRpcClient<T> {
    transport: DceRpcTransport<T>,
    state: BindState,
    context: Option<BindContext>,
    next_call_id: u32,
}

impl<T> DceRpcClient<T> {
    /// Wrap a connected, unbound transport
    pub fn new(transport: DceRpcTransport<T>) -> Self {
        Self {
            transport,
            state: BindState::Unbound,
            context: None,
            next_call_id: 1,
        }
    }

    pub fn state(&self) -> BindState {
        self.state
    }

    /// The negotiated context, once bound
    pub fn context(&self) -> Option<&BindContext> {
        self.context.as_ref()
    }

    fn allocate_call_id(&mut self) -> u32 {
        let call_id = self.next_call_id;
        self.next_call_id = self.next_call_id.wrapping_add(1);
        call_id
    }
}

impl<T: AsyncRead + AsyncWrite + Unpin> DceRpcClient<T> {
    /// Perform the bind handshake for `interface` over NDR.
    ///
    /// Any failure leaves the session `Failed`; binding again requires a new
    /// connection.
    pub async fn bind(&mut self, interface: SyntaxId) -> Result<&BindContext> {
        if self.state != BindState::Unbound {
            return Err(RpcError::InvalidState {
                state: self.state.name(),
                operation: "bind",
            });
        }
        self.state = BindState::Binding;

        match self.bind_inner(interface).await {
            Ok(context) => {
                debug!(
                    "Bind successful: max_xmit={}, max_recv={}, assoc_group=0x{:08x}",
                    context.max_xmit_frag, context.max_recv_frag, context.assoc_group_id
                );
                self.state = BindState::Bound;
                Ok(self.context.insert(context))
            }
            Err(e) => {
                debug!("Bind failed: {}", e);
                self.state = BindState::Failed;
                Err(e)
            }
        }
    }

    async fn bind_inner(&mut self, interface: SyntaxId) -> Result<BindContext> {
        let call_id = self.allocate_call_id();
        let bind = BindPdu::new(call_id, interface);

        debug!(
            "Sending bind request: call_id={}, interface={} v{}.{}",
            call_id,
            interface.uuid,
            interface.major_version(),
            interface.minor_version()
        );
        self.transport.write_pdu(&bind.encode()?).await?;

        match self.transport.read_pdu_decoded().await? {
            Pdu::BindAck(ack) => {
                check_call_id(call_id, ack.header.call_id)?;
                if let Some(reason) = ack.rejection() {
                    return Err(RpcError::BindRejected { reason });
                }
                BindContext::from_ack(interface, &ack).ok_or(RpcError::BindRejected {
                    reason: BindRejection::NoResult,
                })
            }
            Pdu::BindNak(nak) => {
                check_call_id(call_id, nak.header.call_id)?;
                Err(RpcError::BindRejected {
                    reason: BindRejection::Nak(nak.reject_reason),
                })
            }
            other => Err(RpcError::UnexpectedPdu {
                expected: "bind_ack or bind_nak",
                got: other.packet_type(),
            }),
        }
    }

    /// Make an RPC call on the bound context
    ///
    /// # Arguments
    /// * `opnum` - The operation number to call
    /// * `stub_data` - The marshalled arguments (in NDR format)
    ///
    /// # Returns
    /// The stub data from the response with the data representation it was
    /// sent in, reassembled when the server fragments it. Requests are never
    /// fragmented; one that does not fit the negotiated fragment size fails
    /// with `FragmentationRequired` and leaves the session usable.
    ///
    /// Any other error except a fault leaves the session `Failed`.
    pub async fn call(&mut self, opnum: u16, stub_data: Bytes) -> Result<CallResponse> {
        let (context_id, max_xmit) = match (&self.context, self.state) {
            (Some(ctx), BindState::Bound) => (ctx.context_id, ctx.max_xmit_frag),
            _ => {
                return Err(RpcError::InvalidState {
                    state: self.state.name(),
                    operation: "call",
                })
            }
        };

        let call_id = self.allocate_call_id();
        let mut request = RequestPdu::new(call_id, opnum, stub_data);
        request.context_id = context_id;
        let encoded = request.encode(max_xmit as usize)?;

        debug!(
            "Sending request: call_id={}, opnum={}, stub_len={}",
            call_id,
            opnum,
            request.stub_data.len()
        );
        let result = match self.transport.write_pdu(&encoded).await {
            Ok(()) => self.receive_response(call_id, context_id).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            if !matches!(e, RpcError::Fault { .. }) {
                debug!("Call {} failed, session unusable: {}", call_id, e);
                self.state = BindState::Failed;
            }
        }
        result
    }

    /// Receive a response, reassembling fragments if needed
    async fn receive_response(&mut self, call_id: u32, context_id: u16) -> Result<CallResponse> {
        let mut assembled: Option<BytesMut> = None;

        loop {
            match self.transport.read_pdu_decoded().await? {
                Pdu::Response(response) => {
                    check_call_id(call_id, response.header.call_id)?;
                    if response.context_id != context_id {
                        return Err(RpcError::ContextIdMismatch {
                            expected: context_id,
                            got: response.context_id,
                        });
                    }
                    let data_rep = response.header.data_rep;

                    let is_first = response.header.packet_flags.is_first_frag();
                    let is_last = response.header.packet_flags.is_last_frag();

                    if is_first && is_last && assembled.is_none() {
                        trace!("Call succeeded: {} bytes result", response.stub_data.len());
                        return Ok(CallResponse {
                            stub: response.stub_data,
                            data_rep,
                        });
                    }

                    // A first fragment must open the sequence and only it may
                    if is_first == assembled.is_some() {
                        return Err(RpcError::UnexpectedPdu {
                            expected: "response fragment in sequence",
                            got: response.header.packet_type,
                        });
                    }
                    let buf = assembled.get_or_insert_with(|| {
                        BytesMut::with_capacity(
                            (response.alloc_hint as usize).min(MAX_RESPONSE_SIZE),
                        )
                    });

                    let size = buf.len() + response.stub_data.len();
                    if size > MAX_RESPONSE_SIZE {
                        return Err(RpcError::PduTooLarge {
                            size,
                            max: MAX_RESPONSE_SIZE,
                        });
                    }
                    buf.extend_from_slice(&response.stub_data);

                    trace!(
                        "Received response fragment: first={}, last={}, total={}",
                        is_first,
                        is_last,
                        size
                    );
                    if is_last {
                        return Ok(CallResponse {
                            stub: buf.split().freeze(),
                            data_rep,
                        });
                    }
                }
                Pdu::Fault(fault) => {
                    check_call_id(call_id, fault.header.call_id)?;
                    debug!("Call {} faulted: status=0x{:08x}", call_id, fault.status);
                    return Err(RpcError::Fault {
                        status: fault.status,
                    });
                }
                other => {
                    return Err(RpcError::UnexpectedPdu {
                        expected: "response or fault",
                        got: other.packet_type(),
                    })
                }
            }
        }
    }

    /// Close the underlying connection. Safe to call more than once.
    pub async fn close(&mut self) -> Result<()> {
        self.transport.close().await
    }
}

fn check_call_id(expected: u32, got: u32) -> Result<()> {
    if expected != got {
        return Err(RpcError::CallIdMismatch { expected, got });
    }
    Ok(())
}
