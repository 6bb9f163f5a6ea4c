//! IObjectExporter wire structures (MS-DCOM 3.1.2.5.1)

use crate::binding::NetworkBinding;
use crate::types::{ComVersion, DualStringArray};
use dcerpc::{SyntaxId, Uuid};
use ndr::{Bytes, BytesMut, NdrContext, NdrDecode, NdrEncode, Result, UniquePtr};

/// IObjectExporter interface UUID
pub const OBJECT_EXPORTER_UUID: &str = "99fcfec4-5260-101b-bbcb-00aa0021347a";

/// IObjectExporter interface UUID, pre-parsed
pub const OBJECT_EXPORTER: Uuid = Uuid {
    time_low: 0x99fcfec4,
    time_mid: 0x5260,
    time_hi_and_version: 0x101b,
    clock_seq_hi_and_reserved: 0xbb,
    clock_seq_low: 0xcb,
    node: [0x00, 0xaa, 0x00, 0x21, 0x34, 0x7a],
};

/// IObjectExporter interface version
pub const OBJECT_EXPORTER_VERSION: (u16, u16) = (0, 0);

/// Abstract syntax offered at bind time
pub fn object_exporter_syntax() -> SyntaxId {
    SyntaxId::new(
        OBJECT_EXPORTER,
        OBJECT_EXPORTER_VERSION.0,
        OBJECT_EXPORTER_VERSION.1,
    )
}

/// Operation numbers for IObjectExporter
pub mod opnum {
    /// ServerAlive2; opnum 4 is ResolveOxid2
    pub const SERVER_ALIVE2: u16 = 5;
}

/// ServerAlive2 response
///
/// ```text
/// COMVERSION          pComVersion
/// DUALSTRINGARRAY*    ppdsaOrBindings   (unique pointer)
/// DWORD               pReserved
/// error_status_t      return value
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerAlive2Response {
    /// COM version
    pub com_version: ComVersion,
    /// Server bindings; empty when the server sent a null pointer
    pub bindings: DualStringArray,
    /// Reserved
    pub reserved: u32,
    /// Result status
    pub status: u32,
}

impl ServerAlive2Response {
    pub fn new(com_version: ComVersion, bindings: DualStringArray) -> Self {
        Self {
            com_version,
            bindings,
            reserved: 0,
            status: 0,
        }
    }

    /// The IP-based string bindings, normalised and classified, in wire order
    pub fn network_bindings(&self) -> Vec<NetworkBinding> {
        self.bindings
            .string_bindings
            .iter()
            .filter_map(NetworkBinding::from_string_binding)
            .collect()
    }

    /// Encode the response stub
    pub fn encode(&self, little_endian: bool) -> Bytes {
        let ctx = NdrContext::with_byte_order(little_endian);
        let mut buf = BytesMut::new();
        let mut position = 0;

        self.com_version.ndr_encode(&mut buf, &ctx, &mut position);
        UniquePtr::new(self.bindings.clone()).ndr_encode(&mut buf, &ctx, &mut position);
        self.reserved.ndr_encode(&mut buf, &ctx, &mut position);
        self.status.ndr_encode(&mut buf, &ctx, &mut position);
        buf.freeze()
    }

    /// Decode the response stub
    pub fn decode(stub: &[u8], little_endian: bool) -> Result<Self> {
        let ctx = NdrContext::with_byte_order(little_endian);
        let mut buf = stub;
        let mut position = 0;

        let com_version = ComVersion::ndr_decode(&mut buf, &ctx, &mut position)?;
        let bindings = UniquePtr::<DualStringArray>::ndr_decode(&mut buf, &ctx, &mut position)?
            .into_option()
            .unwrap_or_default();
        let reserved = u32::ndr_decode(&mut buf, &ctx, &mut position)?;
        let status = u32::ndr_decode(&mut buf, &ctx, &mut position)?;

        Ok(Self {
            com_version,
            bindings,
            reserved,
            status,
        })
    }
}
