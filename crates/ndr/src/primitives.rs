//! NDR primitive type implementations
//!
//! | MIDL Type      | Rust Type | Size | Alignment |
//! |----------------|-----------|------|-----------|
//! | byte           | u8        | 1    | 1         |
//! | unsigned short | u16       | 2    | 2         |
//! | wchar_t        | u16       | 2    | 2         |
//! | unsigned long  | u32       | 4    | 4         |
//! | error_status_t | u32       | 4    | 4         |

use crate::{NdrContext, NdrDecode, NdrEncode, NdrError, Result};
use bytes::{Buf, BufMut};

macro_rules! impl_ndr_primitive {
    ($ty:ty, $size:expr, $put:ident, $get:ident) => {
        impl NdrEncode for $ty {
            fn ndr_encode<B: BufMut>(&self, buf: &mut B, ctx: &NdrContext, position: &mut usize) {
                ctx.write_align(buf, position, $size);
                ctx.$put(buf, *self);
                *position += $size;
            }

            fn ndr_align() -> usize {
                $size
            }
        }

        impl NdrDecode for $ty {
            fn ndr_decode<B: Buf>(buf: &mut B, ctx: &NdrContext, position: &mut usize) -> Result<Self> {
                let padding = NdrContext::align_padding(*position, $size);
                if buf.remaining() < padding + $size {
                    return Err(NdrError::BufferUnderflow {
                        needed: padding + $size,
                        have: buf.remaining(),
                    });
                }
                buf.advance(padding);
                *position += padding;

                let value = ctx.$get(buf);
                *position += $size;
                Ok(value)
            }

            fn ndr_align() -> usize {
                $size
            }

            fn ndr_min_size() -> usize {
                $size
            }
        }
    };
}

impl_ndr_primitive!(u8, 1, put_u8, get_u8);
impl_ndr_primitive!(u16, 2, put_u16, get_u16);
impl_ndr_primitive!(u32, 4, put_u32, get_u32);
