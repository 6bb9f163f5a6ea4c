//! Connection-oriented DCE/RPC PDUs
//!
//! Wire format from C706 chapter 12 with the MS-RPCE 2.2.2 extensions.
//!
//! Common header layout:
//! ```text
//! +--------+--------+--------+--------+
//! |  vers  |vers_min| ptype  | pflags |
//! +--------+--------+--------+--------+
//! |        data representation        |
//! +--------+--------+--------+--------+
//! |   frag_len      |   auth_len      |
//! +--------+--------+--------+--------+
//! |             call_id               |
//! +--------+--------+--------+--------+
//! ```
//!
//! Only the unauthenticated subset is implemented: PDUs never carry an auth
//! verifier and `auth_len` is always zero on the PDUs built here.

use crate::error::{BindRejection, HeaderError, RejectReason, Result, RpcError};
use bytes::{BufMut, Bytes, BytesMut};

/// rpc_vers
pub const DCE_RPC_VERSION: u8 = 5;
/// rpc_vers_minor
pub const DCE_RPC_VERSION_MINOR: u8 = 0;

/// Default fragment size proposed at bind time and used until negotiated
pub const DEFAULT_MAX_FRAG: u16 = 4096;

/// NDR 2.0 transfer syntax
pub const NDR_SYNTAX_UUID: &str = "8a885d04-1ceb-11c9-9fe8-08002b104860";
pub const NDR_SYNTAX_VERSION: u32 = 2;

/// NDR transfer syntax identifier, pre-parsed
pub const NDR_SYNTAX: Uuid = Uuid {
    time_low: 0x8a885d04,
    time_mid: 0x1ceb,
    time_hi_and_version: 0x11c9,
    clock_seq_hi_and_reserved: 0x9f,
    clock_seq_low: 0xe8,
    node: [0x08, 0x00, 0x2b, 0x10, 0x48, 0x60],
};

/// Connection-oriented packet types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    /// Request PDU
    Request = 0,
    /// Response PDU
    Response = 2,
    /// Fault PDU
    Fault = 3,
    /// Bind PDU
    Bind = 11,
    /// Bind-ack PDU
    BindAck = 12,
    /// Bind-nak PDU
    BindNak = 13,
    /// Alter-context PDU
    AlterContext = 14,
    /// alter_context_resp
    AlterContextResp = 15,
    /// Auth3 PDU
    Auth3 = 16,
    /// Shutdown PDU
    Shutdown = 17,
    /// Co-cancel PDU
    CoCancel = 18,
    /// Orphaned PDU
    Orphaned = 19,
}

impl PacketType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Request),
            2 => Some(Self::Response),
            3 => Some(Self::Fault),
            11 => Some(Self::Bind),
            12 => Some(Self::BindAck),
            13 => Some(Self::BindNak),
            14 => Some(Self::AlterContext),
            15 => Some(Self::AlterContextResp),
            16 => Some(Self::Auth3),
            17 => Some(Self::Shutdown),
            18 => Some(Self::CoCancel),
            19 => Some(Self::Orphaned),
            _ => None,
        }
    }
}

/// Packet flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketFlags(u8);

impl PacketFlags {
    /// First fragment
    pub const FIRST_FRAG: u8 = 0x01;
    /// Last fragment
    pub const LAST_FRAG: u8 = 0x02;
    /// Cancel pending
    pub const PENDING_CANCEL: u8 = 0x04;
    /// Concurrent multiplexing
    pub const CONC_MPX: u8 = 0x10;
    /// Did not execute
    pub const DID_NOT_EXECUTE: u8 = 0x20;
    /// Maybe semantics
    pub const MAYBE: u8 = 0x40;
    /// Object UUID present
    pub const OBJECT_UUID: u8 = 0x80;

    /// FIRST and LAST set: a single-fragment PDU
    pub fn complete() -> Self {
        Self(Self::FIRST_FRAG | Self::LAST_FRAG)
    }

    pub fn is_first_frag(&self) -> bool {
        (self.0 & Self::FIRST_FRAG) != 0
    }

    pub fn is_last_frag(&self) -> bool {
        (self.0 & Self::LAST_FRAG) != 0
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn from_u8(value: u8) -> Self {
        Self(value)
    }
}

/// NDR format label
///
/// Only the integer representation matters to this implementation: it
/// selects the byte order of every multi-byte field after the first 8 bytes
/// of the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRepresentation {
    little_endian: bool,
    char_rep: u8,
    float_rep: u8,
}

impl DataRepresentation {
    /// NDR format: little-endian, ASCII, IEEE
    pub fn ndr() -> Self {
        Self {
            little_endian: true,
            char_rep: 0,
            float_rep: 0,
        }
    }

    /// Big-endian, ASCII, IEEE
    pub fn big_endian() -> Self {
        Self {
            little_endian: false,
            char_rep: 0,
            float_rep: 0,
        }
    }

    /// The four label bytes
    ///
    /// On the wire (MS-RPCE 2.2.2.3):
    /// - byte 0: high nibble is the integer rep, low nibble the character rep
    /// - byte 1: float rep
    /// - bytes 2 and 3: zero
    ///
    /// ASCII, little-endian, IEEE float is `[0x10, 0, 0, 0]`.
    pub fn encode(&self) -> [u8; 4] {
        let int_rep = if self.little_endian { 0x10 } else { 0x00 };
        [int_rep | (self.char_rep & 0x0F), self.float_rep, 0, 0]
    }

    pub fn decode(data: [u8; 4]) -> Self {
        Self {
            little_endian: (data[0] & 0xF0) != 0,
            char_rep: data[0] & 0x0F,
            float_rep: data[1],
        }
    }

    /// Integer rep nibble says little-endian
    pub fn is_little_endian(&self) -> bool {
        self.little_endian
    }
}

impl Default for DataRepresentation {
    fn default() -> Self {
        Self::ndr()
    }
}

/// A DCE UUID
///
/// On the wire the first three fields follow the PDU byte order and the last
/// eight bytes are copied verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Uuid {
    pub time_low: u32,
    pub time_mid: u16,
    pub time_hi_and_version: u16,
    pub clock_seq_hi_and_reserved: u8,
    pub clock_seq_low: u8,
    pub node: [u8; 6],
}

impl Uuid {
    /// Wire size in bytes
    pub const SIZE: usize = 16;

    /// Nil UUID (all zeros)
    pub const NIL: Self = Self {
        time_low: 0,
        time_mid: 0,
        time_hi_and_version: 0,
        clock_seq_hi_and_reserved: 0,
        clock_seq_low: 0,
        node: [0; 6],
    };

    /// Parse the canonical 36-character hyphenated form
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.len() != 36 {
            return None;
        }
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 5
            || parts[0].len() != 8
            || parts[1].len() != 4
            || parts[2].len() != 4
            || parts[3].len() != 4
            || parts[4].len() != 12
        {
            return None;
        }

        let time_low = u32::from_str_radix(parts[0], 16).ok()?;
        let time_mid = u16::from_str_radix(parts[1], 16).ok()?;
        let time_hi_and_version = u16::from_str_radix(parts[2], 16).ok()?;
        let clock = u16::from_str_radix(parts[3], 16).ok()?;

        let mut node = [0u8; 6];
        for (i, byte) in node.iter_mut().enumerate() {
            *byte = u8::from_str_radix(parts[4].get(i * 2..i * 2 + 2)?, 16).ok()?;
        }

        Some(Self {
            time_low,
            time_mid,
            time_hi_and_version,
            clock_seq_hi_and_reserved: (clock >> 8) as u8,
            clock_seq_low: clock as u8,
            node,
        })
    }

    /// Write the 16-byte wire form in the given byte order
    pub fn encode(&self, buf: &mut BytesMut, little_endian: bool) {
        put_u32(buf, self.time_low, little_endian);
        put_u16(buf, self.time_mid, little_endian);
        put_u16(buf, self.time_hi_and_version, little_endian);
        buf.put_u8(self.clock_seq_hi_and_reserved);
        buf.put_u8(self.clock_seq_low);
        buf.put_slice(&self.node);
    }

    /// Decode UUID from the first 16 bytes of `data`
    pub fn decode(data: &[u8], little_endian: bool) -> Result<Self> {
        let mut reader = BodyReader::new(data, little_endian, "UUID");
        reader.uuid()
    }

    /// Wire form with little-endian integer fields
    pub fn to_bytes_le(&self) -> [u8; 16] {
        let mut bytes = [0u8; 16];
        bytes[0..4].copy_from_slice(&self.time_low.to_le_bytes());
        bytes[4..6].copy_from_slice(&self.time_mid.to_le_bytes());
        bytes[6..8].copy_from_slice(&self.time_hi_and_version.to_le_bytes());
        bytes[8] = self.clock_seq_hi_and_reserved;
        bytes[9] = self.clock_seq_low;
        bytes[10..16].copy_from_slice(&self.node);
        bytes
    }
}

impl std::fmt::Display for Uuid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            self.time_low,
            self.time_mid,
            self.time_hi_and_version,
            self.clock_seq_hi_and_reserved,
            self.clock_seq_low,
            self.node[0],
            self.node[1],
            self.node[2],
            self.node[3],
            self.node[4],
            self.node[5]
        )
    }
}

/// Interface or transfer syntax identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyntaxId {
    pub uuid: Uuid,
    /// Low half is the major version, high half the minor
    pub version: u32,
}

impl SyntaxId {
    /// Wire size in bytes
    pub const SIZE: usize = 20;

    pub fn new(uuid: Uuid, major: u16, minor: u16) -> Self {
        Self {
            uuid,
            version: (major as u32) | ((minor as u32) << 16),
        }
    }

    /// The NDR 2.0 transfer syntax
    pub fn ndr() -> Self {
        Self::new(NDR_SYNTAX, NDR_SYNTAX_VERSION as u16, 0)
    }

    pub fn major_version(&self) -> u16 {
        self.version as u16
    }

    pub fn minor_version(&self) -> u16 {
        (self.version >> 16) as u16
    }

    pub fn encode(&self, buf: &mut BytesMut, little_endian: bool) {
        self.uuid.encode(buf, little_endian);
        put_u32(buf, self.version, little_endian);
    }
}

/// The 16-byte header shared by every PDU
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PduHeader {
    /// rpc_vers, always 5
    pub version: u8,
    /// rpc_vers_minor
    pub version_minor: u8,
    /// Packet type
    pub packet_type: PacketType,
    /// Packet flags
    pub packet_flags: PacketFlags,
    /// Data representation
    pub data_rep: DataRepresentation,
    /// Total length of the PDU fragment, header included
    pub frag_length: u16,
    /// auth_length
    pub auth_length: u16,
    /// Call identifier
    pub call_id: u32,
}

impl PduHeader {
    /// Size of the common header
    pub const SIZE: usize = 16;

    pub fn new(packet_type: PacketType, call_id: u32) -> Self {
        Self {
            version: DCE_RPC_VERSION,
            version_minor: DCE_RPC_VERSION_MINOR,
            packet_type,
            packet_flags: PacketFlags::complete(),
            data_rep: DataRepresentation::ndr(),
            frag_length: 0, // Set by for_body / sized
            auth_length: 0,
            call_id,
        }
    }

    /// Build the header for a PDU carrying `body_len` bytes after the header.
    ///
    /// Fails with [`RpcError::FragmentationRequired`] when the whole PDU would
    /// not fit in `max_frag` bytes.
    pub fn for_body(
        packet_type: PacketType,
        packet_flags: PacketFlags,
        call_id: u32,
        body_len: usize,
        max_frag: usize,
    ) -> Result<Self> {
        let mut header = Self::new(packet_type, call_id);
        header.packet_flags = packet_flags;
        header.sized(body_len, max_frag)
    }

    /// Copy of this header with `frag_length` set for a body of `body_len`.
    pub fn sized(&self, body_len: usize, max_frag: usize) -> Result<Self> {
        let size = Self::SIZE + body_len;
        let max = max_frag.min(u16::MAX as usize);
        if size > max {
            return Err(RpcError::FragmentationRequired { size, max });
        }
        let mut header = self.clone();
        header.frag_length = size as u16;
        Ok(header)
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u8(self.version);
        buf.put_u8(self.version_minor);
        buf.put_u8(self.packet_type as u8);
        buf.put_u8(self.packet_flags.as_u8());
        buf.put_slice(&self.data_rep.encode());
        // lengths follow the integer rep in data_rep
        let little_endian = self.data_rep.is_little_endian();
        put_u16(buf, self.frag_length, little_endian);
        put_u16(buf, self.auth_length, little_endian);
        put_u32(buf, self.call_id, little_endian);
    }

    /// Decode the fixed header from the first 16 bytes of `data`.
    ///
    /// Checks size, version and packet type but not the fragment length;
    /// used by the framer before the rest of the fragment has arrived.
    pub fn decode_prefix(data: &[u8]) -> Result<Self> {
        if data.len() < Self::SIZE {
            return Err(HeaderError::TooShort(data.len()).into());
        }

        let version = data[0];
        let version_minor = data[1];
        if version != DCE_RPC_VERSION {
            return Err(HeaderError::Version {
                major: version,
                minor: version_minor,
            }
            .into());
        }

        let packet_type =
            PacketType::from_u8(data[2]).ok_or(HeaderError::UnknownPacketType(data[2]))?;
        let packet_flags = PacketFlags::from_u8(data[3]);
        let data_rep = DataRepresentation::decode([data[4], data[5], data[6], data[7]]);

        let little_endian = data_rep.is_little_endian();
        let frag_length = if little_endian {
            u16::from_le_bytes([data[8], data[9]])
        } else {
            u16::from_be_bytes([data[8], data[9]])
        };
        let auth_length = if little_endian {
            u16::from_le_bytes([data[10], data[11]])
        } else {
            u16::from_be_bytes([data[10], data[11]])
        };
        let call_id = if little_endian {
            u32::from_le_bytes([data[12], data[13], data[14], data[15]])
        } else {
            u32::from_be_bytes([data[12], data[13], data[14], data[15]])
        };

        Ok(Self {
            version,
            version_minor,
            packet_type,
            packet_flags,
            data_rep,
            frag_length,
            auth_length,
            call_id,
        })
    }

    /// Decode the header of a complete fragment.
    ///
    /// In addition to the prefix checks, the declared fragment length must
    /// equal `data.len()`.
    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = Self::decode_prefix(data)?;
        if header.frag_length as usize != data.len() {
            return Err(HeaderError::LengthMismatch {
                declared: header.frag_length as usize,
                available: data.len(),
            }
            .into());
        }
        Ok(header)
    }

    fn expect(data: &[u8], packet_type: PacketType, expected: &'static str) -> Result<Self> {
        let header = Self::decode(data)?;
        if header.packet_type != packet_type {
            return Err(RpcError::UnexpectedPdu {
                expected,
                got: header.packet_type,
            });
        }
        Ok(header)
    }
}

/// One presentation context offered in a bind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextElement {
    pub context_id: u16,
    pub abstract_syntax: SyntaxId,
    pub transfer_syntaxes: Vec<SyntaxId>,
}

impl ContextElement {
    pub fn new(context_id: u16, abstract_syntax: SyntaxId, transfer_syntax: SyntaxId) -> Self {
        Self {
            context_id,
            abstract_syntax,
            transfer_syntaxes: vec![transfer_syntax],
        }
    }

    pub fn encode(&self, buf: &mut BytesMut, little_endian: bool) {
        put_u16(buf, self.context_id, little_endian);
        buf.put_u8(self.transfer_syntaxes.len() as u8);
        buf.put_u8(0);

        self.abstract_syntax.encode(buf, little_endian);
        for ts in &self.transfer_syntaxes {
            ts.encode(buf, little_endian);
        }
    }

    fn decode(reader: &mut BodyReader<'_>) -> Result<Self> {
        let context_id = reader.u16()?;
        let num_transfer_syntaxes = reader.u8()?;
        let _reserved = reader.u8()?;

        let abstract_syntax = reader.syntax_id()?;
        let mut transfer_syntaxes = Vec::with_capacity(num_transfer_syntaxes as usize);
        for _ in 0..num_transfer_syntaxes {
            transfer_syntaxes.push(reader.syntax_id()?);
        }

        Ok(Self {
            context_id,
            abstract_syntax,
            transfer_syntaxes,
        })
    }
}

/// Bind PDU
#[derive(Debug, Clone)]
pub struct BindPdu {
    pub header: PduHeader,
    pub max_xmit_frag: u16,
    pub max_recv_frag: u16,
    pub assoc_group_id: u32,
    pub context_list: Vec<ContextElement>,
}

impl BindPdu {
    /// Bind offering `interface` over NDR as presentation context 0
    pub fn new(call_id: u32, interface: SyntaxId) -> Self {
        Self {
            header: PduHeader::new(PacketType::Bind, call_id),
            max_xmit_frag: DEFAULT_MAX_FRAG,
            max_recv_frag: DEFAULT_MAX_FRAG,
            assoc_group_id: 0,
            context_list: vec![ContextElement::new(0, interface, SyntaxId::ndr())],
        }
    }

    pub fn encode(&self) -> Result<Bytes> {
        let little_endian = self.header.data_rep.is_little_endian();
        let mut body = BytesMut::with_capacity(128);

        put_u16(&mut body, self.max_xmit_frag, little_endian);
        put_u16(&mut body, self.max_recv_frag, little_endian);
        put_u32(&mut body, self.assoc_group_id, little_endian);

        // p_cont_list_t
        body.put_u8(self.context_list.len() as u8); // n_context_elem
        body.put_u8(0); // reserved
        put_u16(&mut body, 0, little_endian); // reserved2

        for ctx in &self.context_list {
            ctx.encode(&mut body, little_endian);
        }

        frame(&self.header, &body, self.max_xmit_frag as usize)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = PduHeader::expect(data, PacketType::Bind, "bind")?;
        let mut reader = BodyReader::body(data, &header, "bind PDU");

        let max_xmit_frag = reader.u16()?;
        let max_recv_frag = reader.u16()?;
        let assoc_group_id = reader.u32()?;

        let num_contexts = reader.u8()?;
        let _reserved = reader.u8()?;
        let _reserved2 = reader.u16()?;

        let mut context_list = Vec::with_capacity(num_contexts as usize);
        for _ in 0..num_contexts {
            context_list.push(ContextElement::decode(&mut reader)?);
        }

        Ok(Self {
            header,
            max_xmit_frag,
            max_recv_frag,
            assoc_group_id,
            context_list,
        })
    }
}

/// Acceptance result for one offered context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ContextResult {
    Acceptance = 0,
    UserRejection = 1,
    ProviderRejection = 2,
    NegotiateAck = 3,
}

impl ContextResult {
    pub fn from_u16(value: u16) -> Self {
        match value {
            0 => Self::Acceptance,
            1 => Self::UserRejection,
            3 => Self::NegotiateAck,
            _ => Self::ProviderRejection,
        }
    }
}

/// One entry of the bind_ack result list (p_result_t)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentationResult {
    pub result: ContextResult,
    /// Provider reason, meaningful only when rejected
    pub reason: u16,
    pub transfer_syntax: SyntaxId,
}

/// bind_ack
#[derive(Debug, Clone)]
pub struct BindAckPdu {
    pub header: PduHeader,
    pub max_xmit_frag: u16,
    pub max_recv_frag: u16,
    pub assoc_group_id: u32,
    /// Secondary address (port spec); decoded but never used for remapping
    pub secondary_addr: String,
    pub results: Vec<PresentationResult>,
}

impl BindAckPdu {
    pub fn new(call_id: u32, assoc_group_id: u32, accepted_syntax: SyntaxId) -> Self {
        Self {
            header: PduHeader::new(PacketType::BindAck, call_id),
            max_xmit_frag: DEFAULT_MAX_FRAG,
            max_recv_frag: DEFAULT_MAX_FRAG,
            assoc_group_id,
            secondary_addr: String::new(),
            results: vec![PresentationResult {
                result: ContextResult::Acceptance,
                reason: 0,
                transfer_syntax: accepted_syntax,
            }],
        }
    }

    /// Bind ack refusing the single proposed context
    pub fn rejected(call_id: u32, result: ContextResult, reason: u16) -> Self {
        let mut ack = Self::new(call_id, 0, SyntaxId::new(Uuid::NIL, 0, 0));
        ack.results[0].result = result;
        ack.results[0].reason = reason;
        ack
    }

    /// First result that accepted a context, if any
    pub fn accepted(&self) -> Option<&PresentationResult> {
        self.results
            .iter()
            .find(|r| r.result == ContextResult::Acceptance)
    }

    /// Rejection carried by this ack, `None` when context 0 was accepted
    pub fn rejection(&self) -> Option<BindRejection> {
        match self.results.first() {
            None => Some(BindRejection::NoResult),
            Some(r) if r.result == ContextResult::Acceptance => None,
            Some(r) => Some(BindRejection::Context {
                result: r.result,
                reason: r.reason,
            }),
        }
    }

    pub fn encode(&self) -> Result<Bytes> {
        let little_endian = self.header.data_rep.is_little_endian();
        let mut body = BytesMut::with_capacity(128);

        put_u16(&mut body, self.max_xmit_frag, little_endian);
        put_u16(&mut body, self.max_recv_frag, little_endian);
        put_u32(&mut body, self.assoc_group_id, little_endian);

        // Secondary address (port as string, NUL terminated)
        let sec_addr_bytes = self.secondary_addr.as_bytes();
        put_u16(&mut body, sec_addr_bytes.len() as u16 + 1, little_endian);
        body.put_slice(sec_addr_bytes);
        body.put_u8(0);

        // Align to 4-byte boundary relative to the start of the PDU
        let padding = (4 - ((PduHeader::SIZE + body.len()) % 4)) % 4;
        body.put_bytes(0, padding);

        // p_result_list_t
        body.put_u8(self.results.len() as u8);
        body.put_u8(0); // reserved
        put_u16(&mut body, 0, little_endian); // reserved2

        for result in &self.results {
            put_u16(&mut body, result.result as u16, little_endian);
            put_u16(&mut body, result.reason, little_endian);
            result.transfer_syntax.encode(&mut body, little_endian);
        }

        frame(&self.header, &body, u16::MAX as usize)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = PduHeader::expect(data, PacketType::BindAck, "bind_ack")?;
        let mut reader = BodyReader::body(data, &header, "bind_ack PDU");

        let max_xmit_frag = reader.u16()?;
        let max_recv_frag = reader.u16()?;
        let assoc_group_id = reader.u32()?;

        let sec_addr_len = reader.u16()? as usize;
        let mut sec_addr_bytes = reader.take(sec_addr_len)?.to_vec();
        if sec_addr_bytes.last() == Some(&0) {
            sec_addr_bytes.pop();
        }
        let secondary_addr = String::from_utf8_lossy(&sec_addr_bytes).into_owned();

        // Padding aligns the result list relative to the start of the PDU
        let padding = (4 - ((PduHeader::SIZE + reader.position()) % 4)) % 4;
        reader.take(padding)?;

        let num_results = reader.u8()?;
        let _reserved = reader.u8()?;
        let _reserved2 = reader.u16()?;

        let mut results = Vec::with_capacity(num_results as usize);
        for _ in 0..num_results {
            let result = ContextResult::from_u16(reader.u16()?);
            let reason = reader.u16()?;
            let transfer_syntax = reader.syntax_id()?;
            results.push(PresentationResult {
                result,
                reason,
                transfer_syntax,
            });
        }

        Ok(Self {
            header,
            max_xmit_frag,
            max_recv_frag,
            assoc_group_id,
            secondary_addr,
            results,
        })
    }
}

/// Bind negative-acknowledgment PDU
#[derive(Debug, Clone)]
pub struct BindNakPdu {
    pub header: PduHeader,
    pub reject_reason: RejectReason,
    /// Protocol versions the server supports, as (major, minor)
    pub versions: Vec<(u8, u8)>,
}

impl BindNakPdu {
    pub fn new(call_id: u32, reject_reason: RejectReason) -> Self {
        Self {
            header: PduHeader::new(PacketType::BindNak, call_id),
            reject_reason,
            versions: vec![(DCE_RPC_VERSION, DCE_RPC_VERSION_MINOR)],
        }
    }

    pub fn encode(&self) -> Result<Bytes> {
        let little_endian = self.header.data_rep.is_little_endian();
        let mut body = BytesMut::with_capacity(8);
        put_u16(&mut body, self.reject_reason.into(), little_endian);
        body.put_u8(self.versions.len() as u8);
        for (major, minor) in &self.versions {
            body.put_u8(*major);
            body.put_u8(*minor);
        }
        frame(&self.header, &body, u16::MAX as usize)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = PduHeader::expect(data, PacketType::BindNak, "bind_nak")?;
        let mut reader = BodyReader::body(data, &header, "bind_nak PDU");

        let reject_reason = RejectReason::from(reader.u16()?);
        // Some servers stop after the reason code
        let mut versions = Vec::new();
        if reader.remaining() > 0 {
            let count = reader.u8()?;
            for _ in 0..count {
                versions.push((reader.u8()?, reader.u8()?));
            }
        }

        Ok(Self {
            header,
            reject_reason,
            versions,
        })
    }
}

/// Request PDU
#[derive(Debug, Clone)]
pub struct RequestPdu {
    pub header: PduHeader,
    pub alloc_hint: u32,
    pub context_id: u16,
    pub opnum: u16,
    pub stub_data: Bytes,
}

impl RequestPdu {
    /// alloc_hint, p_cont_id and opnum
    pub const BODY_HEADER_SIZE: usize = 8;

    pub fn new(call_id: u32, opnum: u16, stub_data: Bytes) -> Self {
        Self {
            header: PduHeader::new(PacketType::Request, call_id),
            alloc_hint: stub_data.len() as u32,
            context_id: 0,
            opnum,
            stub_data,
        }
    }

    /// Encode, failing rather than fragmenting when over `max_frag`
    pub fn encode(&self, max_frag: usize) -> Result<Bytes> {
        let little_endian = self.header.data_rep.is_little_endian();
        let mut body = BytesMut::with_capacity(Self::BODY_HEADER_SIZE + self.stub_data.len());

        put_u32(&mut body, self.alloc_hint, little_endian);
        put_u16(&mut body, self.context_id, little_endian);
        put_u16(&mut body, self.opnum, little_endian);
        body.put_slice(&self.stub_data);

        frame(&self.header, &body, max_frag)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = PduHeader::expect(data, PacketType::Request, "request")?;
        let mut reader = BodyReader::body(data, &header, "request PDU");

        let alloc_hint = reader.u32()?;
        let context_id = reader.u16()?;
        let opnum = reader.u16()?;
        if header.packet_flags.as_u8() & PacketFlags::OBJECT_UUID != 0 {
            let _object = reader.uuid()?;
        }
        let stub_data = Bytes::copy_from_slice(reader.rest());

        Ok(Self {
            header,
            alloc_hint,
            context_id,
            opnum,
            stub_data,
        })
    }
}

/// Response PDU
#[derive(Debug, Clone)]
pub struct ResponsePdu {
    pub header: PduHeader,
    pub alloc_hint: u32,
    pub context_id: u16,
    pub cancel_count: u8,
    pub stub_data: Bytes,
}

impl ResponsePdu {
    /// alloc_hint, p_cont_id, cancel_count and a reserved byte
    pub const BODY_HEADER_SIZE: usize = 8;

    pub fn new(call_id: u32, stub_data: Bytes) -> Self {
        Self {
            header: PduHeader::new(PacketType::Response, call_id),
            alloc_hint: stub_data.len() as u32,
            context_id: 0,
            cancel_count: 0,
            stub_data,
        }
    }

    pub fn encode(&self) -> Result<Bytes> {
        let little_endian = self.header.data_rep.is_little_endian();
        let mut body = BytesMut::with_capacity(Self::BODY_HEADER_SIZE + self.stub_data.len());

        put_u32(&mut body, self.alloc_hint, little_endian);
        put_u16(&mut body, self.context_id, little_endian);
        body.put_u8(self.cancel_count);
        body.put_u8(0); // reserved
        body.put_slice(&self.stub_data);

        frame(&self.header, &body, u16::MAX as usize)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = PduHeader::expect(data, PacketType::Response, "response")?;
        let mut reader = BodyReader::body(data, &header, "response PDU");

        let alloc_hint = reader.u32()?;
        let context_id = reader.u16()?;
        let cancel_count = reader.u8()?;
        let _reserved = reader.u8()?;
        let stub_data = Bytes::copy_from_slice(reader.rest());

        Ok(Self {
            header,
            alloc_hint,
            context_id,
            cancel_count,
            stub_data,
        })
    }
}

/// Fault PDU
#[derive(Debug, Clone)]
pub struct FaultPdu {
    pub header: PduHeader,
    pub alloc_hint: u32,
    pub context_id: u16,
    pub cancel_count: u8,
    pub status: u32,
}

impl FaultPdu {
    pub fn new(call_id: u32, status: u32) -> Self {
        Self {
            header: PduHeader::new(PacketType::Fault, call_id),
            alloc_hint: 0,
            context_id: 0,
            cancel_count: 0,
            status,
        }
    }

    pub fn encode(&self) -> Result<Bytes> {
        let little_endian = self.header.data_rep.is_little_endian();
        let mut body = BytesMut::with_capacity(16);

        put_u32(&mut body, self.alloc_hint, little_endian);
        put_u16(&mut body, self.context_id, little_endian);
        body.put_u8(self.cancel_count);
        body.put_u8(0); // reserved
        put_u32(&mut body, self.status, little_endian);
        put_u32(&mut body, 0, little_endian); // reserved

        frame(&self.header, &body, u16::MAX as usize)
    }

    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = PduHeader::expect(data, PacketType::Fault, "fault")?;
        let mut reader = BodyReader::body(data, &header, "fault PDU");

        let alloc_hint = reader.u32()?;
        let context_id = reader.u16()?;
        let cancel_count = reader.u8()?;
        let _reserved = reader.u8()?;
        let status = reader.u32()?;

        Ok(Self {
            header,
            alloc_hint,
            context_id,
            cancel_count,
            status,
        })
    }
}

/// The PDUs a client exchanges, dispatched on the header's packet type
#[derive(Debug, Clone)]
pub enum Pdu {
    Bind(BindPdu),
    BindAck(BindAckPdu),
    BindNak(BindNakPdu),
    Request(RequestPdu),
    Response(ResponsePdu),
    Fault(FaultPdu),
}

impl Pdu {
    /// Decode one complete fragment
    pub fn decode(data: &[u8]) -> Result<Self> {
        let header = PduHeader::decode(data)?;
        match header.packet_type {
            PacketType::Bind => Ok(Pdu::Bind(BindPdu::decode(data)?)),
            PacketType::BindAck => Ok(Pdu::BindAck(BindAckPdu::decode(data)?)),
            PacketType::BindNak => Ok(Pdu::BindNak(BindNakPdu::decode(data)?)),
            PacketType::Request => Ok(Pdu::Request(RequestPdu::decode(data)?)),
            PacketType::Response => Ok(Pdu::Response(ResponsePdu::decode(data)?)),
            PacketType::Fault => Ok(Pdu::Fault(FaultPdu::decode(data)?)),
            other => Err(RpcError::UnexpectedPdu {
                expected: "bind, bind_ack, bind_nak, request, response or fault",
                got: other,
            }),
        }
    }

    pub fn header(&self) -> &PduHeader {
        match self {
            Pdu::Bind(pdu) => &pdu.header,
            Pdu::BindAck(pdu) => &pdu.header,
            Pdu::BindNak(pdu) => &pdu.header,
            Pdu::Request(pdu) => &pdu.header,
            Pdu::Response(pdu) => &pdu.header,
            Pdu::Fault(pdu) => &pdu.header,
        }
    }

    /// call_id from the header
    pub fn call_id(&self) -> u32 {
        self.header().call_id
    }

    pub fn packet_type(&self) -> PacketType {
        self.header().packet_type
    }
}

/// Prepend a sized header to `body`
fn frame(header: &PduHeader, body: &[u8], max_frag: usize) -> Result<Bytes> {
    let header = header.sized(body.len(), max_frag)?;
    let mut buf = BytesMut::with_capacity(header.frag_length as usize);
    header.encode(&mut buf);
    buf.put_slice(body);
    Ok(buf.freeze())
}

fn put_u16(buf: &mut BytesMut, value: u16, little_endian: bool) {
    if little_endian {
        buf.put_u16_le(value);
    } else {
        buf.put_u16(value);
    }
}

fn put_u32(buf: &mut BytesMut, value: u32, little_endian: bool) {
    if little_endian {
        buf.put_u32_le(value);
    } else {
        buf.put_u32(value);
    }
}

/// Bounds-checked reader over a PDU body
struct BodyReader<'a> {
    data: &'a [u8],
    pos: usize,
    little_endian: bool,
    what: &'static str,
}

impl<'a> BodyReader<'a> {
    fn new(data: &'a [u8], little_endian: bool, what: &'static str) -> Self {
        Self {
            data,
            pos: 0,
            little_endian,
            what,
        }
    }

    /// Reader over everything after the common header
    fn body(pdu: &'a [u8], header: &PduHeader, what: &'static str) -> Self {
        Self::new(
            &pdu[PduHeader::SIZE..],
            header.data_rep.is_little_endian(),
            what,
        )
    }

    fn position(&self) -> usize {
        self.pos
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(RpcError::Truncated {
                what: self.what,
                needed: n,
                have: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn rest(&mut self) -> &'a [u8] {
        let slice = &self.data[self.pos..];
        self.pos = self.data.len();
        slice
    }

    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16> {
        let b = self.take(2)?;
        Ok(if self.little_endian {
            u16::from_le_bytes([b[0], b[1]])
        } else {
            u16::from_be_bytes([b[0], b[1]])
        })
    }

    fn u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(if self.little_endian {
            u32::from_le_bytes([b[0], b[1], b[2], b[3]])
        } else {
            u32::from_be_bytes([b[0], b[1], b[2], b[3]])
        })
    }

    fn uuid(&mut self) -> Result<Uuid> {
        let time_low = self.u32()?;
        let time_mid = self.u16()?;
        let time_hi_and_version = self.u16()?;
        let rest = self.take(8)?;
        Ok(Uuid {
            time_low,
            time_mid,
            time_hi_and_version,
            clock_seq_hi_and_reserved: rest[0],
            clock_seq_low: rest[1],
            node: [rest[2], rest[3], rest[4], rest[5], rest[6], rest[7]],
        })
    }

    fn syntax_id(&mut self) -> Result<SyntaxId> {
        let uuid = self.uuid()?;
        let version = self.u32()?;
        Ok(SyntaxId { uuid, version })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interface() -> SyntaxId {
        SyntaxId::new(
            Uuid::parse("99fcfec4-5260-101b-bbcb-00aa0021347a").unwrap(),
            0,
            0,
        )
    }

    #[test]
    fn test_uuid_parse() {
        let uuid = Uuid::parse(NDR_SYNTAX_UUID).unwrap();
        assert_eq!(uuid, NDR_SYNTAX);
        assert_eq!(uuid.to_string(), NDR_SYNTAX_UUID);
        assert!(Uuid::parse("8a885d04-1ceb-11c9-9fe808002b104860").is_none());
        assert!(Uuid::parse("not-a-uuid").is_none());
    }

    #[test]
    fn test_uuid_wire_layout() {
        // Three little-endian integer fields, then eight raw bytes
        let mut buf = BytesMut::new();
        NDR_SYNTAX.encode(&mut buf, true);
        assert_eq!(
            &buf[..],
            &[
                0x04, 0x5d, 0x88, 0x8a, 0xeb, 0x1c, 0xc9, 0x11, 0x9f, 0xe8, 0x08, 0x00, 0x2b,
                0x10, 0x48, 0x60
            ]
        );
        assert_eq!(&buf[..], &NDR_SYNTAX.to_bytes_le());
        assert_eq!(Uuid::decode(&buf, true).unwrap(), NDR_SYNTAX);
    }

    #[test]
    fn test_uuid_roundtrip() {
        let samples = [
            Uuid::NIL,
            NDR_SYNTAX,
            Uuid {
                time_low: 0xFFFF_FFFF,
                time_mid: 0xFFFF,
                time_hi_and_version: 0xFFFF,
                clock_seq_hi_and_reserved: 0xFF,
                clock_seq_low: 0xFF,
                node: [0xFF; 6],
            },
            Uuid::parse("99fcfec4-5260-101b-bbcb-00aa0021347a").unwrap(),
        ];
        for uuid in samples {
            for little_endian in [true, false] {
                let mut buf = BytesMut::new();
                uuid.encode(&mut buf, little_endian);
                assert_eq!(buf.len(), Uuid::SIZE);
                assert_eq!(Uuid::decode(&buf, little_endian).unwrap(), uuid);
            }
        }
    }

    #[test]
    fn test_uuid_decode_short() {
        let err = Uuid::decode(&[0u8; 15], true).unwrap_err();
        assert!(matches!(err, RpcError::Truncated { needed: 8, have: 7, .. }));
    }

    #[test]
    fn test_header_encode_decode() {
        let header = PduHeader::for_body(
            PacketType::Request,
            PacketFlags::complete(),
            12345,
            8,
            DEFAULT_MAX_FRAG as usize,
        )
        .unwrap();
        let mut buf = BytesMut::new();
        header.encode(&mut buf);
        buf.put_bytes(0, 8);

        assert_eq!(
            &buf[..PduHeader::SIZE],
            &[5, 0, 0, 0x03, 0x10, 0, 0, 0, 24, 0, 0, 0, 0x39, 0x30, 0, 0]
        );

        let decoded = PduHeader::decode(&buf).unwrap();
        assert_eq!(decoded, header);
        assert_eq!(decoded.frag_length, 24);
        assert!(decoded.packet_flags.is_first_frag());
        assert!(decoded.packet_flags.is_last_frag());
    }

    #[test]
    fn test_header_roundtrip_field_combinations() {
        let types = [
            PacketType::Request,
            PacketType::Response,
            PacketType::Fault,
            PacketType::Bind,
            PacketType::BindAck,
            PacketType::BindNak,
        ];
        for packet_type in types {
            for flags in [0u8, PacketFlags::FIRST_FRAG, PacketFlags::LAST_FRAG, 0x03] {
                for call_id in [0u32, 1, 0xDEAD_BEEF, u32::MAX] {
                    for body_len in [0usize, 1, 100] {
                        let header = PduHeader::for_body(
                            packet_type,
                            PacketFlags::from_u8(flags),
                            call_id,
                            body_len,
                            DEFAULT_MAX_FRAG as usize,
                        )
                        .unwrap();
                        let mut buf = BytesMut::new();
                        header.encode(&mut buf);
                        buf.put_bytes(0, body_len);
                        assert_eq!(PduHeader::decode(&buf).unwrap(), header);
                    }
                }
            }
        }
    }

    #[test]
    fn test_fragmentation_required() {
        let err = PduHeader::for_body(
            PacketType::Request,
            PacketFlags::complete(),
            1,
            4096,
            DEFAULT_MAX_FRAG as usize,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RpcError::FragmentationRequired {
                size: 4112,
                max: 4096
            }
        ));

        let request = RequestPdu::new(1, 5, Bytes::from(vec![0u8; 5000]));
        assert!(matches!(
            request.encode(DEFAULT_MAX_FRAG as usize),
            Err(RpcError::FragmentationRequired { .. })
        ));
    }

    #[test]
    fn test_malformed_header() {
        let err = PduHeader::decode(&[5, 0, 0]).unwrap_err();
        assert!(matches!(err, RpcError::MalformedHeader(HeaderError::TooShort(3))));

        let mut pdu = RequestPdu::new(1, 5, Bytes::new())
            .encode(DEFAULT_MAX_FRAG as usize)
            .unwrap()
            .to_vec();

        pdu[0] = 4;
        let err = PduHeader::decode(&pdu).unwrap_err();
        assert!(matches!(
            err,
            RpcError::MalformedHeader(HeaderError::Version { major: 4, .. })
        ));

        pdu[0] = 5;
        pdu.push(0);
        let err = PduHeader::decode(&pdu).unwrap_err();
        assert!(matches!(
            err,
            RpcError::MalformedHeader(HeaderError::LengthMismatch {
                declared: 24,
                available: 25
            })
        ));
        assert!(err.is_protocol_error());

        pdu.pop();
        pdu[2] = 1; // connectionless ping
        let err = PduHeader::decode(&pdu).unwrap_err();
        assert!(matches!(
            err,
            RpcError::MalformedHeader(HeaderError::UnknownPacketType(1))
        ));
    }

    #[test]
    fn test_request_roundtrip() {
        let request = RequestPdu::new(42, 5, Bytes::from_static(b"test data"));
        let encoded = request.encode(DEFAULT_MAX_FRAG as usize).unwrap();
        let decoded = RequestPdu::decode(&encoded).unwrap();

        assert_eq!(decoded.header.call_id, 42);
        assert_eq!(decoded.opnum, 5);
        assert_eq!(decoded.alloc_hint, 9);
        assert_eq!(decoded.stub_data.as_ref(), b"test data");
    }

    #[test]
    fn test_empty_request_layout() {
        let mut request = RequestPdu::new(2, 5, Bytes::new());
        request.context_id = 0;
        let encoded = request.encode(DEFAULT_MAX_FRAG as usize).unwrap();
        assert_eq!(encoded.len(), 24);
        // alloc_hint, context_id, opnum
        assert_eq!(&encoded[16..], &[0, 0, 0, 0, 0, 0, 5, 0]);
    }

    #[test]
    fn test_response_roundtrip() {
        let response = ResponsePdu::new(42, Bytes::from_static(b"result"));
        let encoded = response.encode().unwrap();
        let decoded = ResponsePdu::decode(&encoded).unwrap();

        assert_eq!(decoded.header.call_id, 42);
        assert_eq!(decoded.stub_data.as_ref(), b"result");
    }

    #[test]
    fn test_bind_layout() {
        let bind = BindPdu::new(1, interface());
        let encoded = bind.encode().unwrap();

        // header + 12 byte preamble + context element (4 + 20 + 20)
        assert_eq!(encoded.len(), 16 + 12 + 44);
        assert_eq!(encoded[2], PacketType::Bind as u8);
        // max_xmit_frag, max_recv_frag, assoc_group
        assert_eq!(&encoded[16..24], &[0x00, 0x10, 0x00, 0x10, 0, 0, 0, 0]);
        // one context, one transfer syntax
        assert_eq!(encoded[24], 1);
        assert_eq!(&encoded[28..32], &[0, 0, 1, 0]);
        assert_eq!(&encoded[32..48], &interface().uuid.to_bytes_le());
        assert_eq!(&encoded[48..52], &[0, 0, 0, 0]);
        assert_eq!(&encoded[52..68], &NDR_SYNTAX.to_bytes_le());
        assert_eq!(&encoded[68..72], &[2, 0, 0, 0]);

        let decoded = BindPdu::decode(&encoded).unwrap();
        assert_eq!(decoded.header.call_id, 1);
        assert_eq!(decoded.context_list.len(), 1);
        assert_eq!(decoded.context_list[0].abstract_syntax, interface());
        assert_eq!(decoded.context_list[0].transfer_syntaxes, vec![SyntaxId::ndr()]);
    }

    #[test]
    fn test_bind_ack_roundtrip() {
        let mut ack = BindAckPdu::new(1, 0x1234, SyntaxId::ndr());
        ack.secondary_addr = "135".to_string();
        ack.max_recv_frag = 5840;
        let encoded = ack.encode().unwrap();
        // "135\0" ends at offset 30; the result list starts padded to 32
        assert_eq!(&encoded[24..30], &[4, 0, b'1', b'3', b'5', 0]);
        assert_eq!(encoded[32], 1);
        assert_eq!(encoded.len(), 60);

        let decoded = BindAckPdu::decode(&encoded).unwrap();
        assert_eq!(decoded.secondary_addr, "135");
        assert_eq!(decoded.assoc_group_id, 0x1234);
        assert_eq!(decoded.max_recv_frag, 5840);
        assert_eq!(decoded.rejection(), None);
        assert_eq!(
            decoded.accepted().map(|r| r.transfer_syntax),
            Some(SyntaxId::ndr())
        );
    }

    #[test]
    fn test_bind_ack_rejection() {
        let ack = BindAckPdu::rejected(1, ContextResult::ProviderRejection, 2);
        let decoded = BindAckPdu::decode(&ack.encode().unwrap()).unwrap();
        assert_eq!(
            decoded.rejection(),
            Some(BindRejection::Context {
                result: ContextResult::ProviderRejection,
                reason: 2
            })
        );
    }

    #[test]
    fn test_bind_nak_roundtrip() {
        let nak = BindNakPdu::new(1, RejectReason::ProtocolVersionNotSupported);
        let encoded = nak.encode().unwrap();
        match Pdu::decode(&encoded).unwrap() {
            Pdu::BindNak(decoded) => {
                assert_eq!(decoded.reject_reason, RejectReason::ProtocolVersionNotSupported);
                assert_eq!(decoded.versions, vec![(5, 0)]);
            }
            other => panic!("expected bind_nak, got {:?}", other),
        }
    }

    #[test]
    fn test_fault_roundtrip() {
        let fault = FaultPdu::new(7, 5);
        let encoded = fault.encode().unwrap();
        let decoded = FaultPdu::decode(&encoded).unwrap();
        assert_eq!(decoded.header.call_id, 7);
        assert_eq!(decoded.status, 5);
    }

    #[test]
    fn test_truncated_body() {
        let mut pdu = BytesMut::new();
        let header = PduHeader::for_body(PacketType::Fault, PacketFlags::complete(), 3, 4, 4096)
            .unwrap();
        header.encode(&mut pdu);
        pdu.put_u32_le(0);

        let err = Pdu::decode(&pdu).unwrap_err();
        assert!(matches!(err, RpcError::Truncated { what: "fault PDU", .. }));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let response = ResponsePdu::new(1, Bytes::new()).encode().unwrap();
        let err = FaultPdu::decode(&response).unwrap_err();
        assert!(matches!(
            err,
            RpcError::UnexpectedPdu {
                got: PacketType::Response,
                ..
            }
        ));
    }

    #[test]
    fn test_data_representation() {
        let ndr = DataRepresentation::ndr();
        let encoded = ndr.encode();
        assert_eq!(encoded, [0x10, 0x00, 0x00, 0x00]);
        assert!(DataRepresentation::decode(encoded).is_little_endian());

        let be_encoded = DataRepresentation::big_endian().encode();
        assert_eq!(be_encoded[0], 0x00);
        assert!(!DataRepresentation::decode(be_encoded).is_little_endian());
    }

    #[test]
    fn test_big_endian_fault() {
        let mut fault = FaultPdu::new(9, 0x1c010003);
        fault.header.data_rep = DataRepresentation::big_endian();
        let encoded = fault.encode().unwrap();
        assert_eq!(&encoded[8..10], &[0, 32]);
        let decoded = FaultPdu::decode(&encoded).unwrap();
        assert_eq!(decoded.header.call_id, 9);
        assert_eq!(decoded.status, 0x1c010003);
    }
}
