//! NDR unique pointers
//!
//! The `[unique]` attribute in MIDL: nullable, no aliasing. On the wire a
//! unique pointer is a 4-byte referent ID (0 = null) followed, for non-null
//! pointers at top level, by the pointee.

use crate::{NdrContext, NdrDecode, NdrEncode, Result};
use bytes::{Buf, BufMut};

/// Unique pointer - nullable, no aliasing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniquePtr<T>(pub Option<Box<T>>);

impl<T> UniquePtr<T> {
    pub fn new(value: T) -> Self {
        Self(Some(Box::new(value)))
    }

    pub fn null() -> Self {
        Self(None)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub fn into_option(self) -> Option<T> {
        self.0.map(|b| *b)
    }

    pub fn as_ref(&self) -> Option<&T> {
        self.0.as_deref()
    }
}

impl<T> Default for UniquePtr<T> {
    fn default() -> Self {
        Self::null()
    }
}

impl<T> From<Option<T>> for UniquePtr<T> {
    fn from(opt: Option<T>) -> Self {
        Self(opt.map(Box::new))
    }
}

/// Referent ID written for non-null pointers; Windows numbers from here too
const FIRST_REFERENT_ID: u32 = 0x0002_0000;

impl<T: NdrEncode> NdrEncode for UniquePtr<T> {
    fn ndr_encode<B: BufMut>(&self, buf: &mut B, ctx: &NdrContext, position: &mut usize) {
        match self.as_ref() {
            None => 0u32.ndr_encode(buf, ctx, position),
            Some(value) => {
                FIRST_REFERENT_ID.ndr_encode(buf, ctx, position);
                value.ndr_encode(buf, ctx, position);
            }
        }
    }

    fn ndr_align() -> usize {
        4
    }
}

impl<T: NdrDecode> NdrDecode for UniquePtr<T> {
    fn ndr_decode<B: Buf>(buf: &mut B, ctx: &NdrContext, position: &mut usize) -> Result<Self> {
        match u32::ndr_decode(buf, ctx, position)? {
            0 => Ok(Self::null()),
            _ => T::ndr_decode(buf, ctx, position).map(Self::new),
        }
    }

    fn ndr_align() -> usize {
        4
    }

    fn ndr_min_size() -> usize {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_null_pointer() {
        let ctx = NdrContext::new();
        let mut buf = BytesMut::new();
        let mut position = 0;
        UniquePtr::<u32>::null().ndr_encode(&mut buf, &ctx, &mut position);
        assert_eq!(&buf[..], &[0, 0, 0, 0]);

        let mut reader = buf.freeze();
        let mut position = 0;
        let decoded = UniquePtr::<u32>::ndr_decode(&mut reader, &ctx, &mut position).unwrap();
        assert!(decoded.is_null());
    }

    #[test]
    fn test_non_null_pointer() {
        let ctx = NdrContext::new();
        let mut buf = BytesMut::new();
        let mut position = 0;
        UniquePtr::new(7u32).ndr_encode(&mut buf, &ctx, &mut position);
        assert_eq!(buf.len(), 8);

        let mut reader = buf.freeze();
        let mut position = 0;
        let decoded = UniquePtr::<u32>::ndr_decode(&mut reader, &ctx, &mut position).unwrap();
        assert_eq!(decoded.into_option(), Some(7));
    }

    #[test]
    fn test_referent_without_pointee() {
        let ctx = NdrContext::new();
        let mut buf: &[u8] = &[0, 0, 2, 0];
        let mut position = 0;
        let err = UniquePtr::<u32>::ndr_decode(&mut buf, &ctx, &mut position).unwrap_err();
        assert_eq!(err, crate::NdrError::BufferUnderflow { needed: 4, have: 0 });
    }
}
