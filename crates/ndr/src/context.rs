//! Byte order and alignment for one NDR stream
//!
//! Every stub is decoded with the integer representation announced in the
//! data representation label of the PDU that carried it.

use crate::{NdrError, Result};
use bytes::{Buf, BufMut};

/// Per-stream NDR settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdrContext {
    pub little_endian: bool,
}

macro_rules! ordered_io {
    ($put:ident, $get:ident, $ty:ty, $put_le:ident, $put_be:ident, $get_le:ident, $get_be:ident) => {
        #[inline]
        pub fn $put<B: BufMut>(&self, buf: &mut B, value: $ty) {
            if self.little_endian {
                buf.$put_le(value)
            } else {
                buf.$put_be(value)
            }
        }

        /// Caller checks `remaining()` first.
        #[inline]
        pub fn $get<B: Buf>(&self, buf: &mut B) -> $ty {
            if self.little_endian {
                buf.$get_le()
            } else {
                buf.$get_be()
            }
        }
    };
}

impl NdrContext {
    /// Little-endian, the representation Windows peers send
    pub fn new() -> Self {
        Self::with_byte_order(true)
    }

    pub fn big_endian() -> Self {
        Self::with_byte_order(false)
    }

    pub fn with_byte_order(little_endian: bool) -> Self {
        Self { little_endian }
    }

    /// Zero bytes needed to move `position` onto a multiple of `alignment`
    #[inline]
    pub fn align_padding(position: usize, alignment: usize) -> usize {
        match alignment {
            0 | 1 => 0,
            n => (n - position % n) % n,
        }
    }

    pub fn write_align<B: BufMut>(&self, buf: &mut B, position: &mut usize, alignment: usize) {
        let padding = Self::align_padding(*position, alignment);
        buf.put_bytes(0, padding);
        *position += padding;
    }

    /// Skip padding; fails if the stream ends inside it
    pub fn read_align<B: Buf>(
        &self,
        buf: &mut B,
        position: &mut usize,
        alignment: usize,
    ) -> Result<()> {
        let padding = Self::align_padding(*position, alignment);
        if buf.remaining() < padding {
            return Err(NdrError::BufferUnderflow {
                needed: padding,
                have: buf.remaining(),
            });
        }
        buf.advance(padding);
        *position += padding;
        Ok(())
    }

    #[inline]
    pub fn put_u8<B: BufMut>(&self, buf: &mut B, value: u8) {
        buf.put_u8(value);
    }

    #[inline]
    pub fn get_u8<B: Buf>(&self, buf: &mut B) -> u8 {
        buf.get_u8()
    }

    ordered_io!(put_u16, get_u16, u16, put_u16_le, put_u16, get_u16_le, get_u16);
    ordered_io!(put_u32, get_u32, u32, put_u32_le, put_u32, get_u32_le, get_u32);
}

impl Default for NdrContext {
    fn default() -> Self {
        Self::new()
    }
}
