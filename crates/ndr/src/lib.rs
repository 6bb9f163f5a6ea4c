//! NDR (Network Data Representation) runtime
//!
//! The subset of the NDR transfer syntax needed to unmarshal DCOM
//! object-exporter stubs, as specified in DCE 1.1 (C706 chapter 14) and
//! MS-RPCE 2.2.5.
//!
//! # Wire layout
//!
//! - Integers align to their own size
//! - Conformant arrays carry a 4-byte element count ahead of the elements
//! - Unique pointers are a 4-byte referent ID, zero meaning null, followed
//!   by the pointee when non-null
//!
//! Every decoder threads a `position` counter holding the byte offset from
//! the start of the stub so alignment is computed against the stub, not the
//! buffer.

mod arrays;
mod context;
mod decode;
mod encode;
mod error;
mod pointers;
mod primitives;

pub use arrays::{decode_array_elements, decode_conformant_array, ConformantArray};
pub use context::NdrContext;
pub use decode::NdrDecode;
pub use encode::NdrEncode;
pub use error::{NdrError, Result, MAX_NDR_ARRAY_ELEMENTS};
pub use pointers::UniquePtr;

/// Re-export bytes for convenience
pub use bytes::{Buf, BufMut, Bytes, BytesMut};
