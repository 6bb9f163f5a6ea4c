//! Error types for DCE RPC

use crate::dcerpc::{ContextResult, PacketType};
use std::fmt;
use thiserror::Error;

/// Why a TCP connection could not be established
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectFailure {
    /// Host name did not resolve to any address
    Dns,
    /// The peer actively refused the connection
    Refused,
    /// The connect timeout elapsed
    Timeout,
    /// No route to the host or network, or any other socket failure
    Unreachable,
}

impl fmt::Display for ConnectFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Dns => "name resolution failed",
            Self::Refused => "connection refused",
            Self::Timeout => "connect timed out",
            Self::Unreachable => "host unreachable",
        };
        f.write_str(s)
    }
}

/// Defects in the fixed 16-byte PDU header
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("header too short: {0} bytes")]
    TooShort(usize),

    #[error("unsupported RPC version {major}.{minor}")]
    Version { major: u8, minor: u8 },

    #[error("unknown packet type {0}")]
    UnknownPacketType(u8),

    #[error("fragment length {declared} does not match {available} bytes available")]
    LengthMismatch { declared: usize, available: usize },
}

/// bind_nak provider reject reasons (C706 12.6.3.1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    NotSpecified,
    TemporaryCongestion,
    LocalLimitExceeded,
    CalledPaddrUnknown,
    ProtocolVersionNotSupported,
    DefaultContextNotSupported,
    UserDataNotReadable,
    NoPsapAvailable,
    AuthenticationTypeNotRecognized,
    InvalidChecksum,
    Other(u16),
}

impl From<u16> for RejectReason {
    fn from(value: u16) -> Self {
        match value {
            0 => Self::NotSpecified,
            1 => Self::TemporaryCongestion,
            2 => Self::LocalLimitExceeded,
            3 => Self::CalledPaddrUnknown,
            4 => Self::ProtocolVersionNotSupported,
            5 => Self::DefaultContextNotSupported,
            6 => Self::UserDataNotReadable,
            7 => Self::NoPsapAvailable,
            8 => Self::AuthenticationTypeNotRecognized,
            9 => Self::InvalidChecksum,
            other => Self::Other(other),
        }
    }
}

impl From<RejectReason> for u16 {
    fn from(value: RejectReason) -> Self {
        match value {
            RejectReason::NotSpecified => 0,
            RejectReason::TemporaryCongestion => 1,
            RejectReason::LocalLimitExceeded => 2,
            RejectReason::CalledPaddrUnknown => 3,
            RejectReason::ProtocolVersionNotSupported => 4,
            RejectReason::DefaultContextNotSupported => 5,
            RejectReason::UserDataNotReadable => 6,
            RejectReason::NoPsapAvailable => 7,
            RejectReason::AuthenticationTypeNotRecognized => 8,
            RejectReason::InvalidChecksum => 9,
            RejectReason::Other(code) => code,
        }
    }
}

/// Why the server refused a bind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindRejection {
    /// The server answered with a bind_nak PDU
    Nak(RejectReason),
    /// The bind_ack did not accept the presentation context
    Context { result: ContextResult, reason: u16 },
    /// The bind_ack carried no result for the proposed context
    NoResult,
}

impl fmt::Display for BindRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nak(reason) => write!(f, "bind_nak ({:?})", reason),
            Self::Context { result, reason } => {
                write!(f, "context {:?} (reason {})", result, reason)
            }
            Self::NoResult => f.write_str("no presentation context result"),
        }
    }
}

/// RPC error types
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot connect to {endpoint}: {reason}")]
    Connect {
        endpoint: String,
        reason: ConnectFailure,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("malformed PDU header: {0}")]
    MalformedHeader(#[from] HeaderError),

    #[error("incomplete fragment: expected {expected} bytes, received {received}")]
    IncompleteFragment { expected: usize, received: usize },

    #[error("PDU too large: {size} bytes exceeds maximum {max}")]
    PduTooLarge { size: usize, max: usize },

    #[error("fragmentation required: {size} byte PDU exceeds fragment limit {max}")]
    FragmentationRequired { size: usize, max: usize },

    #[error("truncated {what}: needed {needed} bytes, have {have}")]
    Truncated {
        what: &'static str,
        needed: usize,
        have: usize,
    },

    #[error("unexpected PDU: expected {expected}, got {got:?}")]
    UnexpectedPdu {
        expected: &'static str,
        got: PacketType,
    },

    #[error("call ID mismatch: expected {expected}, got {got}")]
    CallIdMismatch { expected: u32, got: u32 },

    #[error("presentation context mismatch: expected {expected}, got {got}")]
    ContextIdMismatch { expected: u16, got: u16 },

    #[error("bind rejected: {reason}")]
    BindRejected { reason: BindRejection },

    #[error("fault: status 0x{status:08x}")]
    Fault { status: u32 },

    #[error("{operation} not allowed in {state} state")]
    InvalidState {
        state: &'static str,
        operation: &'static str,
    },

    #[error("connection closed")]
    ConnectionClosed,

    #[error("timeout")]
    Timeout,
}

impl RpcError {
    /// True for errors caused by bytes on the wire violating the protocol.
    ///
    /// These are always fatal to the connection.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedHeader(_)
                | Self::IncompleteFragment { .. }
                | Self::PduTooLarge { .. }
                | Self::Truncated { .. }
                | Self::UnexpectedPdu { .. }
                | Self::CallIdMismatch { .. }
                | Self::ContextIdMismatch { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;
