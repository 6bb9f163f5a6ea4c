//! Reading values out of a stub

use crate::{NdrContext, Result};
use bytes::Buf;

/// A value with an NDR wire form that can be read back.
///
/// `position` is the offset from the start of the stub. Implementations
/// align against it before reading and advance it by what they consume.
pub trait NdrDecode: Sized {
    fn ndr_decode<B: Buf>(buf: &mut B, ctx: &NdrContext, position: &mut usize) -> Result<Self>;

    /// Alignment boundary of the first byte
    fn ndr_align() -> usize {
        1
    }

    /// Bytes one element needs at least; bounds array counts before allocation
    fn ndr_min_size() -> usize {
        1
    }
}
