//! COM version (MS-DCOM 2.2.11)

use ndr::{Buf, BufMut, NdrContext, NdrDecode, NdrEncode, Result};
use std::fmt;

/// COM version structure (MS-DCOM 2.2.11)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ComVersion {
    /// Major version number
    pub major: u16,
    /// Minor version number
    pub minor: u16,
}

impl ComVersion {
    /// Size in bytes
    pub const SIZE: usize = 4;

    /// DCOM version 5.1 (Windows 2000)
    pub const DCOM_5_1: Self = Self { major: 5, minor: 1 };
    /// DCOM version 5.7 (Windows 7 and later)
    pub const DCOM_5_7: Self = Self { major: 5, minor: 7 };

    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }
}

impl fmt::Display for ComVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl NdrEncode for ComVersion {
    fn ndr_encode<B: BufMut>(&self, buf: &mut B, ctx: &NdrContext, position: &mut usize) {
        self.major.ndr_encode(buf, ctx, position);
        self.minor.ndr_encode(buf, ctx, position);
    }

    fn ndr_align() -> usize {
        2
    }
}

impl NdrDecode for ComVersion {
    fn ndr_decode<B: Buf>(buf: &mut B, ctx: &NdrContext, position: &mut usize) -> Result<Self> {
        let major = u16::ndr_decode(buf, ctx, position)?;
        let minor = u16::ndr_decode(buf, ctx, position)?;
        Ok(Self { major, minor })
    }

    fn ndr_align() -> usize {
        2
    }

    fn ndr_min_size() -> usize {
        Self::SIZE
    }
}
