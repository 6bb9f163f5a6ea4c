//! Network bindings advertised by an object exporter
//!
//! The string bindings in a DUALSTRINGARRAY name every protocol the exporter
//! listens on. Only the IP-based towers carry a network address; those are
//! normalised to a bare host and classified.

use crate::types::{protocol_id, StringBinding};
use std::fmt;
use std::net::Ipv6Addr;

/// What kind of address a binding carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
    Hostname,
    Other,
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ipv4 => "IPv4",
            Self::Ipv6 => "IPv6",
            Self::Hostname => "hostname",
            Self::Other => "other",
        })
    }
}

/// The IP protocol sequences whose towers carry a network address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolSequence {
    /// `ncacn_ip_tcp`
    Tcp,
    /// `ncadg_ip_udp`
    Udp,
    /// `ncacn_http`
    Http,
}

impl ProtocolSequence {
    /// Map a tower id; `None` for towers without a network address
    pub fn from_tower_id(tower_id: u16) -> Option<Self> {
        match tower_id {
            protocol_id::NCACN_IP_TCP => Some(Self::Tcp),
            protocol_id::NCADG_IP_UDP => Some(Self::Udp),
            protocol_id::NCACN_HTTP => Some(Self::Http),
            _ => None,
        }
    }

    pub fn tower_id(&self) -> u16 {
        match self {
            Self::Tcp => protocol_id::NCACN_IP_TCP,
            Self::Udp => protocol_id::NCADG_IP_UDP,
            Self::Http => protocol_id::NCACN_HTTP,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tcp => "ncacn_ip_tcp",
            Self::Udp => "ncadg_ip_udp",
            Self::Http => "ncacn_http",
        }
    }
}

impl fmt::Display for ProtocolSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One address the target advertises
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetworkBinding {
    pub address_family: AddressFamily,
    pub address: String,
    pub protocol: ProtocolSequence,
}

impl NetworkBinding {
    /// Surface a string binding, or `None` when its tower is not IP based
    pub fn from_string_binding(binding: &StringBinding) -> Option<Self> {
        let protocol = ProtocolSequence::from_tower_id(binding.tower_id)?;
        let address = normalize_address(&binding.network_addr).to_string();
        Some(Self {
            address_family: classify_address(&address),
            address,
            protocol,
        })
    }
}

impl fmt::Display for NetworkBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.address)
    }
}

/// Strip an optional `protseq:` prefix and `[endpoint]` suffix.
///
/// `"ncacn_ip_tcp:10.0.0.5[135]"` becomes `"10.0.0.5"`. Bare IPv6 literals
/// are left intact since only known protocol sequence names count as a
/// prefix.
pub fn normalize_address(raw: &str) -> &str {
    let mut addr = raw.trim();

    if let Some((prefix, rest)) = addr.split_once(':') {
        if prefix.starts_with("ncacn_") || prefix.starts_with("ncadg_") || prefix == "ncalrpc" {
            addr = rest;
        }
    }

    if addr.ends_with(']') {
        if let Some(open) = addr.rfind('[') {
            addr = &addr[..open];
        }
    }

    addr
}

/// Classify a normalised address
pub fn classify_address(address: &str) -> AddressFamily {
    if address.is_empty() {
        return AddressFamily::Other;
    }
    if is_ipv4(address) {
        return AddressFamily::Ipv4;
    }
    let zone_free = address.split('%').next().unwrap_or(address);
    if zone_free.parse::<Ipv6Addr>().is_ok() {
        return AddressFamily::Ipv6;
    }
    if address
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_'))
    {
        return AddressFamily::Hostname;
    }
    AddressFamily::Other
}

/// Four dot-separated decimal octets, each in 0..=255
fn is_ipv4(address: &str) -> bool {
    let octets: Vec<&str> = address.split('.').collect();
    octets.len() == 4
        && octets.iter().all(|octet| {
            !octet.is_empty()
                && octet.len() <= 3
                && octet.bytes().all(|b| b.is_ascii_digit())
                && octet.parse::<u16>().map_or(false, |v| v <= 255)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify_address("10.0.0.5"), AddressFamily::Ipv4);
        assert_eq!(classify_address("fe80::1"), AddressFamily::Ipv6);
        assert_eq!(classify_address("HOST-A"), AddressFamily::Hostname);
    }

    #[test]
    fn test_classify_edges() {
        assert_eq!(classify_address("255.255.255.255"), AddressFamily::Ipv4);
        assert_eq!(classify_address("010.0.0.1"), AddressFamily::Ipv4);
        assert_eq!(classify_address("256.0.0.1"), AddressFamily::Hostname);
        assert_eq!(classify_address("1.2.3"), AddressFamily::Hostname);
        assert_eq!(classify_address("1.2.3.4.5"), AddressFamily::Hostname);
        assert_eq!(classify_address("fe80::1%11"), AddressFamily::Ipv6);
        assert_eq!(classify_address("::ffff:10.0.0.5"), AddressFamily::Ipv6);
        assert_eq!(classify_address("host.corp.example"), AddressFamily::Hostname);
        assert_eq!(classify_address(""), AddressFamily::Other);
        assert_eq!(classify_address("\\\\pipe\\epmapper"), AddressFamily::Other);
        assert_eq!(classify_address("two words"), AddressFamily::Other);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_address("ncacn_ip_tcp:10.0.0.5[135]"), "10.0.0.5");
        assert_eq!(normalize_address("ncadg_ip_udp:HOST-A"), "HOST-A");
        assert_eq!(normalize_address("10.0.0.5"), "10.0.0.5");
        assert_eq!(normalize_address("HOST-A[49668]"), "HOST-A");
        assert_eq!(normalize_address("fe80::1"), "fe80::1");
        assert_eq!(normalize_address("ncacn_ip_tcp:fe80::1[135]"), "fe80::1");
    }

    #[test]
    fn test_from_string_binding() {
        let binding =
            NetworkBinding::from_string_binding(&StringBinding::tcp("ncacn_ip_tcp:10.0.0.5[135]"))
                .unwrap();
        assert_eq!(
            binding,
            NetworkBinding {
                address_family: AddressFamily::Ipv4,
                address: "10.0.0.5".to_string(),
                protocol: ProtocolSequence::Tcp,
            }
        );

        let pipe = StringBinding::new(protocol_id::NCACN_NP, "\\\\HOST-A");
        assert!(NetworkBinding::from_string_binding(&pipe).is_none());
        let local = StringBinding::new(protocol_id::NCALRPC, "OLE1234");
        assert!(NetworkBinding::from_string_binding(&local).is_none());
    }

    #[test]
    fn test_protocol_sequence_towers() {
        for protocol in [
            ProtocolSequence::Tcp,
            ProtocolSequence::Udp,
            ProtocolSequence::Http,
        ] {
            assert_eq!(
                ProtocolSequence::from_tower_id(protocol.tower_id()),
                Some(protocol)
            );
        }
        assert_eq!(ProtocolSequence::Http.to_string(), "ncacn_http");
    }
}
