//! NDR conformant arrays
//!
//! Wire format:
//! ```text
//! max_count: u32      # aligned to 4
//! elements[max_count] # each aligned to its own boundary
//! ```
//!
//! Inside a conformant structure the count is hoisted to the start of the
//! structure; callers decoding such structures read the count themselves and
//! then the elements with [`decode_array_elements`].

use crate::{NdrContext, NdrDecode, NdrEncode, NdrError, Result, MAX_NDR_ARRAY_ELEMENTS};
use bytes::{Buf, BufMut};

/// Decode an NDR conformant array with a caller-supplied element decoder.
///
/// `element_size` is the minimum wire size of one element; the declared count
/// is checked against the remaining bytes before anything is allocated.
/// Returns the elements and the number of bytes consumed (including leading
/// alignment padding).
pub fn decode_conformant_array<B, T, F>(
    buf: &mut B,
    ctx: &NdrContext,
    position: &mut usize,
    element_size: usize,
    decode_element: F,
) -> Result<(Vec<T>, usize)>
where
    B: Buf,
    F: FnMut(&mut B, &NdrContext, &mut usize) -> Result<T>,
{
    let start = *position;

    ctx.read_align(buf, position, 4)?;
    if buf.remaining() < 4 {
        return Err(NdrError::BufferUnderflow {
            needed: 4,
            have: buf.remaining(),
        });
    }
    let max_count = ctx.get_u32(buf);
    *position += 4;

    let elements =
        decode_array_elements(buf, ctx, position, max_count, element_size, decode_element)?;
    Ok((elements, *position - start))
}

/// Decode `max_count` elements whose count was already read.
///
/// Used for conformant structures, where the count sits at the start of the
/// structure rather than in front of the array.
pub fn decode_array_elements<B, T, F>(
    buf: &mut B,
    ctx: &NdrContext,
    position: &mut usize,
    max_count: u32,
    element_size: usize,
    mut decode_element: F,
) -> Result<Vec<T>>
where
    B: Buf,
    F: FnMut(&mut B, &NdrContext, &mut usize) -> Result<T>,
{
    let max_count = max_count as usize;
    if max_count > MAX_NDR_ARRAY_ELEMENTS {
        return Err(NdrError::AllocationLimitExceeded {
            requested: max_count,
            limit: MAX_NDR_ARRAY_ELEMENTS,
        });
    }
    if max_count.saturating_mul(element_size) > buf.remaining() {
        return Err(NdrError::TruncatedArray {
            declared: max_count,
            element_size,
            remaining: buf.remaining(),
        });
    }

    let mut elements = Vec::with_capacity(max_count);
    for _ in 0..max_count {
        elements.push(decode_element(buf, ctx, position)?);
    }
    Ok(elements)
}

/// Conformant array - size determined at runtime
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConformantArray<T> {
    pub elements: Vec<T>,
}

impl<T> ConformantArray<T> {
    pub fn new(elements: Vec<T>) -> Self {
        Self { elements }
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl<T> From<Vec<T>> for ConformantArray<T> {
    fn from(elements: Vec<T>) -> Self {
        Self { elements }
    }
}

impl<T: NdrEncode> NdrEncode for ConformantArray<T> {
    fn ndr_encode<B: BufMut>(&self, buf: &mut B, ctx: &NdrContext, position: &mut usize) {
        ctx.write_align(buf, position, 4);
        ctx.put_u32(buf, self.elements.len() as u32);
        *position += 4;

        for elem in &self.elements {
            elem.ndr_encode(buf, ctx, position);
        }
    }

    fn ndr_align() -> usize {
        4
    }
}

impl<T: NdrDecode> NdrDecode for ConformantArray<T> {
    fn ndr_decode<B: Buf>(buf: &mut B, ctx: &NdrContext, position: &mut usize) -> Result<Self> {
        let (elements, _) =
            decode_conformant_array(buf, ctx, position, T::ndr_min_size(), |buf, ctx, pos| {
                T::ndr_decode(buf, ctx, pos)
            })?;
        Ok(Self { elements })
    }

    fn ndr_align() -> usize {
        4
    }

    fn ndr_min_size() -> usize {
        4
    }
}
