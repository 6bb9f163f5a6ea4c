//! OXID resolution error types

use dcerpc::{BindRejection, ConnectFailure, RpcError};
use ndr::NdrError;
use std::fmt;
use thiserror::Error;

/// Result type for OXID resolution
pub type Result<T> = std::result::Result<T, ResolveError>;

/// The step of a resolution an error occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Connect,
    Bind,
    Call,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connect => "connect",
            Self::Bind => "bind",
            Self::Call => "call",
        })
    }
}

/// Errors surfaced by [`resolve_interfaces`](crate::resolve_interfaces)
#[derive(Error, Debug)]
pub enum ResolveError {
    /// The target string is not `host`, `host:port` or a bracketed IPv6 form
    #[error("invalid target: {0:?}")]
    InvalidTarget(String),

    /// The TCP connection could not be established
    #[error("cannot connect to {endpoint}: {reason}")]
    Connection {
        endpoint: String,
        reason: ConnectFailure,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The server refused the IObjectExporter presentation context
    #[error("bind rejected: {reason}")]
    BindRejected { reason: BindRejection },

    /// The server answered with a fault or a non-zero error status
    #[error("call failed: status 0x{status_code:08x}")]
    CallFailed { status_code: u32 },

    /// The peer broke the RPC protocol or the connection failed mid-exchange
    #[error("protocol error during {stage}: {source}")]
    Protocol {
        stage: Stage,
        #[source]
        source: RpcError,
    },

    /// The response stub could not be unmarshalled
    #[error("malformed ServerAlive2 response: {0}")]
    Decode(#[from] NdrError),

    /// The overall time budget ran out
    #[error("timed out during {stage}")]
    Timeout { stage: Stage },
}

impl ResolveError {
    /// Classify an RPC error raised during `stage`
    pub fn from_rpc(stage: Stage, err: RpcError) -> Self {
        match err {
            RpcError::Connect {
                endpoint,
                reason,
                source,
            } => Self::Connection {
                endpoint,
                reason,
                source,
            },
            RpcError::BindRejected { reason } => Self::BindRejected { reason },
            RpcError::Fault { status } => Self::CallFailed {
                status_code: status,
            },
            RpcError::Timeout => Self::Timeout { stage },
            other => Self::Protocol {
                stage,
                source: other,
            },
        }
    }

    /// Stage the error belongs to, when it has one
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::InvalidTarget(_) => None,
            Self::Connection { .. } => Some(Stage::Connect),
            Self::BindRejected { .. } => Some(Stage::Bind),
            Self::CallFailed { .. } | Self::Decode(_) => Some(Stage::Call),
            Self::Protocol { stage, .. } | Self::Timeout { stage } => Some(*stage),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dcerpc::{HeaderError, RejectReason};

    #[test]
    fn test_fault_maps_to_call_failed() {
        let err = ResolveError::from_rpc(Stage::Call, RpcError::Fault { status: 5 });
        assert!(matches!(err, ResolveError::CallFailed { status_code: 5 }));
        assert_eq!(err.stage(), Some(Stage::Call));
    }

    #[test]
    fn test_bind_rejection_keeps_reason() {
        let reason = BindRejection::Nak(RejectReason::TemporaryCongestion);
        let err = ResolveError::from_rpc(Stage::Bind, RpcError::BindRejected { reason });
        match err {
            ResolveError::BindRejected { reason: got } => assert_eq!(got, reason),
            other => panic!("expected bind rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_protocol_error_records_stage() {
        let err = ResolveError::from_rpc(
            Stage::Bind,
            RpcError::MalformedHeader(HeaderError::TooShort(4)),
        );
        assert_eq!(err.stage(), Some(Stage::Bind));
        assert!(matches!(
            err,
            ResolveError::Protocol {
                stage: Stage::Bind,
                source: RpcError::MalformedHeader(_)
            }
        ));
        assert_eq!(
            err.to_string(),
            "protocol error during bind: malformed PDU header: header too short: 4 bytes"
        );
    }

    #[test]
    fn test_connect_error_is_structured() {
        let err = ResolveError::from_rpc(
            Stage::Connect,
            RpcError::Connect {
                endpoint: "10.0.0.5:135".to_string(),
                reason: ConnectFailure::Refused,
                source: None,
            },
        );
        assert!(matches!(
            err,
            ResolveError::Connection {
                reason: ConnectFailure::Refused,
                ..
            }
        ));
        assert_eq!(err.to_string(), "cannot connect to 10.0.0.5:135: connection refused");
    }
}
