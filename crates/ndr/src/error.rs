//! NDR error types

use thiserror::Error;

/// Upper bound on elements accepted from a conformance count.
///
/// The count comes off the wire, so it is capped before any allocation.
pub const MAX_NDR_ARRAY_ELEMENTS: usize = 1 << 20;

/// NDR decoding errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NdrError {
    /// Not enough data for a fixed-size field
    #[error("buffer underflow: needed {needed} bytes, have {have}")]
    BufferUnderflow { needed: usize, have: usize },

    /// A conformant array declares more elements than the buffer holds
    #[error("truncated array: {declared} elements of {element_size} bytes declared, {remaining} bytes remaining")]
    TruncatedArray {
        declared: usize,
        element_size: usize,
        remaining: usize,
    },

    /// Conformance count above [`MAX_NDR_ARRAY_ELEMENTS`]
    #[error("allocation limit exceeded: {requested} elements requested, limit {limit}")]
    AllocationLimitExceeded { requested: usize, limit: usize },

    /// Conformance disagrees with a count carried inside the structure
    #[error("conformance mismatch: max_count={max_count}, actual_count={actual_count}")]
    ConformanceMismatch { max_count: u32, actual_count: u32 },

    /// String data that is unterminated or not valid UTF-16
    #[error("invalid string: {0}")]
    InvalidString(String),
}

/// Result type for NDR operations
pub type Result<T> = std::result::Result<T, NdrError>;
