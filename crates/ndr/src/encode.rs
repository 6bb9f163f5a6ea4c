//! Writing values into a stub

use crate::NdrContext;
use bytes::BufMut;

/// A value with an NDR wire form.
///
/// Padding is written against `position`, the running stub offset, which
/// the implementation advances past everything it emits.
pub trait NdrEncode {
    fn ndr_encode<B: BufMut>(&self, buf: &mut B, ctx: &NdrContext, position: &mut usize);

    /// Alignment boundary of the first byte
    fn ndr_align() -> usize
    where
        Self: Sized,
    {
        1
    }
}
