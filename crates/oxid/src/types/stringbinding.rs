//! String binding and dual string array types (MS-DCOM 2.2.19)
//!
//! A DUALSTRINGARRAY is a conformant structure: the conformance count comes
//! first, then `wNumEntries` and `wSecurityOffset`, then `aStringArray`, a
//! flat array of 16-bit words holding both binding sections:
//!
//! ```text
//! [0 .. wSecurityOffset)           STRINGBINDING*   0
//! [wSecurityOffset .. wNumEntries) SECURITYBINDING* 0
//! ```

use ndr::{decode_array_elements, Buf, BufMut, NdrContext, NdrDecode, NdrEncode, NdrError, Result};
use std::fmt;

/// Tower ids seen in STRINGBINDING.wTowerId
pub mod protocol_id {
    /// TCP/IP protocol
    pub const NCACN_IP_TCP: u16 = 0x07;
    /// UDP/IP protocol
    pub const NCADG_IP_UDP: u16 = 0x08;
    /// `ncacn_np`
    pub const NCACN_NP: u16 = 0x0F;
    /// Local RPC
    pub const NCALRPC: u16 = 0x10;
    /// HTTP protocol
    pub const NCACN_HTTP: u16 = 0x1F;
}

/// Authentication service identifiers carried in security bindings
pub mod authn_svc {
    /// NTLM
    pub const WINNT: u16 = 0x0A;
}

/// String binding (MS-DCOM 2.2.19.3)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StringBinding {
    /// wTowerId
    pub tower_id: u16,
    /// Network address, possibly with a protseq prefix and an endpoint suffix
    pub network_addr: String,
}

impl StringBinding {
    pub fn new(tower_id: u16, network_addr: impl Into<String>) -> Self {
        Self {
            tower_id,
            network_addr: network_addr.into(),
        }
    }

    /// `ncacn_ip_tcp` binding
    pub fn tcp(addr: &str) -> Self {
        Self::new(protocol_id::NCACN_IP_TCP, addr)
    }
}

impl fmt::Display for StringBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let proto = match self.tower_id {
            protocol_id::NCACN_IP_TCP => "ncacn_ip_tcp",
            protocol_id::NCADG_IP_UDP => "ncadg_ip_udp",
            protocol_id::NCACN_NP => "ncacn_np",
            protocol_id::NCACN_HTTP => "ncacn_http",
            protocol_id::NCALRPC => "ncalrpc",
            _ => "unknown",
        };
        write!(f, "{}:{}", proto, self.network_addr)
    }
}

/// Security binding (MS-DCOM 2.2.19.4)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SecurityBinding {
    /// RPC_C_AUTHN_* value
    pub authn_svc: u16,
    /// RPC_C_AUTHZ_* value, 0xFFFF when unspecified
    pub authz_svc: u16,
    /// Principal name
    pub principal_name: String,
}

impl SecurityBinding {
    pub fn new(authn_svc: u16, authz_svc: u16, principal_name: impl Into<String>) -> Self {
        Self {
            authn_svc,
            authz_svc,
            principal_name: principal_name.into(),
        }
    }
}

/// Dual String Array (MS-DCOM 2.2.19.2)
///
/// Two NUL-terminated runs of entries sharing one u16 buffer.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DualStringArray {
    /// Entries before `wSecurityOffset`
    pub string_bindings: Vec<StringBinding>,
    /// Entries after `wSecurityOffset`
    pub security_bindings: Vec<SecurityBinding>,
}

impl DualStringArray {
    pub fn new() -> Self {
        Self::default()
    }

    /// One `ncacn_ip_tcp` entry and no security bindings
    pub fn with_tcp_binding(addr: &str) -> Self {
        Self {
            string_bindings: vec![StringBinding::tcp(addr)],
            security_bindings: vec![],
        }
    }

    pub fn add_string_binding(&mut self, binding: StringBinding) {
        self.string_bindings.push(binding);
    }

    pub fn add_security_binding(&mut self, binding: SecurityBinding) {
        self.security_bindings.push(binding);
    }

    /// Lay the bindings out as `aStringArray`, returning the words and the
    /// security offset.
    pub fn to_words(&self) -> (Vec<u16>, u16) {
        let mut words = Vec::new();
        for sb in &self.string_bindings {
            words.push(sb.tower_id);
            words.extend(sb.network_addr.encode_utf16());
            words.push(0);
        }
        words.push(0);

        let security_offset = words.len() as u16;
        for sec in &self.security_bindings {
            words.push(sec.authn_svc);
            words.push(sec.authz_svc);
            words.extend(sec.principal_name.encode_utf16());
            words.push(0);
        }
        words.push(0);

        (words, security_offset)
    }

    /// Parse `aStringArray[0..wNumEntries)`.
    ///
    /// Every entry is decoded, whatever its tower, so both sections must be
    /// well formed.
    pub fn from_words(words: &[u16], security_offset: u16) -> Result<Self> {
        let security_offset = security_offset as usize;
        if security_offset > words.len() {
            return Err(NdrError::InvalidString(format!(
                "security offset {} beyond {} entries",
                security_offset,
                words.len()
            )));
        }
        let (strings, security) = words.split_at(security_offset);

        let mut string_bindings = Vec::new();
        let mut i = 0;
        while i < strings.len() {
            let tower_id = strings[i];
            if tower_id == 0 {
                break;
            }
            let (network_addr, next) = read_wstr(strings, i + 1)?;
            string_bindings.push(StringBinding {
                tower_id,
                network_addr,
            });
            i = next;
        }

        let mut security_bindings = Vec::new();
        let mut i = 0;
        while i < security.len() {
            let authn_svc = security[i];
            if authn_svc == 0 {
                break;
            }
            let authz_svc = *security.get(i + 1).ok_or_else(|| {
                NdrError::InvalidString("security binding truncated".to_string())
            })?;
            let (principal_name, next) = read_wstr(security, i + 2)?;
            security_bindings.push(SecurityBinding {
                authn_svc,
                authz_svc,
                principal_name,
            });
            i = next;
        }

        Ok(Self {
            string_bindings,
            security_bindings,
        })
    }
}

/// Read a NUL-terminated UTF-16 string starting at `start`; returns the
/// string and the index just past its terminator.
fn read_wstr(words: &[u16], start: usize) -> Result<(String, usize)> {
    let rest = words.get(start..).unwrap_or(&[]);
    let len = rest
        .iter()
        .position(|&w| w == 0)
        .ok_or_else(|| NdrError::InvalidString("unterminated wide string".to_string()))?;
    let s = String::from_utf16(&rest[..len])
        .map_err(|_| NdrError::InvalidString("invalid UTF-16 string".to_string()))?;
    Ok((s, start + len + 1))
}

impl NdrEncode for DualStringArray {
    fn ndr_encode<B: BufMut>(&self, buf: &mut B, ctx: &NdrContext, position: &mut usize) {
        let (words, security_offset) = self.to_words();
        (words.len() as u32).ndr_encode(buf, ctx, position);
        (words.len() as u16).ndr_encode(buf, ctx, position);
        security_offset.ndr_encode(buf, ctx, position);
        for word in &words {
            word.ndr_encode(buf, ctx, position);
        }
    }

    fn ndr_align() -> usize {
        4
    }
}

impl NdrDecode for DualStringArray {
    fn ndr_decode<B: Buf>(buf: &mut B, ctx: &NdrContext, position: &mut usize) -> Result<Self> {
        let max_count = u32::ndr_decode(buf, ctx, position)?;
        let num_entries = u16::ndr_decode(buf, ctx, position)?;
        let security_offset = u16::ndr_decode(buf, ctx, position)?;
        if num_entries as u32 > max_count {
            return Err(NdrError::ConformanceMismatch {
                max_count,
                actual_count: num_entries as u32,
            });
        }

        let words = decode_array_elements(buf, ctx, position, max_count, 2, |buf, ctx, pos| {
            u16::ndr_decode(buf, ctx, pos)
        })?;
        Self::from_words(&words[..num_entries as usize], security_offset)
    }

    fn ndr_align() -> usize {
        4
    }

    fn ndr_min_size() -> usize {
        8
    }
}
