/*!
Address value objects (C3): strict IPv4, RFC-5952-canonical IPv6, and IP-future literals.

Grounded in the teacher's `rdftk_iri::authority::HostKind`, which held `Ipv4Addr`/`Ipv6Addr`
values and a `(u16, String)` pair for IP-future, with regex-based parsing (`IPV4`, `IPVMORE`,
`IP_FUTURE` in `lazy_static!`). This module keeps the same three-way shape but parses with the
grammar cursor (C2) instead of `regex`, since `spec.md` requires strict `dec-octet` rejection
of leading zeros that a simple digit-class regex does not enforce on its own.
*/

use crate::error::{Error, ErrorKind};
use std::fmt;

// ------------------------------------------------------------------------------------------------
// IPv4
// ------------------------------------------------------------------------------------------------

/// A parsed IPv4 address, stored as a 32-bit unsigned integer in host byte order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ipv4Address(u32);

impl Ipv4Address {
    pub fn from_bytes(b: [u8; 4]) -> Self {
        Ipv4Address(u32::from_be_bytes(b))
    }

    pub fn to_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }

    pub fn to_uint(self) -> u32 {
        self.0
    }

    pub fn is_loopback(self) -> bool {
        self.to_bytes()[0] == 127
    }

    pub fn is_unspecified(self) -> bool {
        self.0 == 0
    }

    pub fn is_multicast(self) -> bool {
        (self.to_bytes()[0] & 0xf0) == 0xe0
    }

    /// Parses a strict RFC 3986 `dec-octet "." dec-octet "." dec-octet "." dec-octet`.
    /// Leading zeros (other than the literal octet `"0"`) and octets greater than 255 are
    /// rejected.
    pub fn parse(s: &[u8]) -> Result<Self, Error> {
        let text = std::str::from_utf8(s).map_err(|_| ErrorKind::Invalid(component(), 0))?;
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() != 4 {
            return Err(ErrorKind::Invalid(component(), 0).into());
        }
        let mut bytes = [0u8; 4];
        for (i, part) in parts.iter().enumerate() {
            bytes[i] = parse_dec_octet(part)?;
        }
        Ok(Ipv4Address::from_bytes(bytes))
    }
}

fn component() -> crate::error::Component {
    crate::error::Component::Host
}

fn parse_dec_octet(s: &str) -> Result<u8, Error> {
    if s.is_empty() || s.len() > 3 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ErrorKind::Invalid(component(), 0).into());
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err(ErrorKind::Invalid(component(), 0).into());
    }
    s.parse::<u16>()
        .ok()
        .filter(|v| *v <= 255)
        .map(|v| v as u8)
        .ok_or_else(|| ErrorKind::Invalid(component(), 0).into())
}

impl fmt::Display for Ipv4Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = self.to_bytes();
        write!(f, "{}.{}.{}.{}", b[0], b[1], b[2], b[3])
    }
}

// ------------------------------------------------------------------------------------------------
// IPv6
// ------------------------------------------------------------------------------------------------

/// A parsed IPv6 address, stored as 16 bytes in network order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ipv6Address([u8; 16]);

impl Ipv6Address {
    pub fn from_bytes(b: [u8; 16]) -> Self {
        Ipv6Address(b)
    }

    pub fn to_bytes(self) -> [u8; 16] {
        self.0
    }

    fn groups(self) -> [u16; 8] {
        let mut g = [0u16; 8];
        for i in 0..8 {
            g[i] = u16::from_be_bytes([self.0[i * 2], self.0[i * 2 + 1]]);
        }
        g
    }

    /// Parses IPv6 text, including the `::` zero-run shorthand and an embedded-IPv4 tail
    /// (`::ffff:192.0.2.1`).
    pub fn parse(s: &[u8]) -> Result<Self, Error> {
        let text = std::str::from_utf8(s).map_err(|_| ErrorKind::Invalid(component(), 0))?;
        parse_ipv6_text(text).ok_or_else(|| ErrorKind::Invalid(component(), 0).into())
    }

    /// Formats in RFC 5952 canonical form: lowercase hex, the longest run of zero groups (of
    /// two or more) collapsed to `::` with ties broken by earliest position, and no `::` used
    /// for a single zero group.
    pub fn to_canonical_string(self) -> String {
        let groups = self.groups();

        // find the longest run of zero groups, breaking ties toward the earliest start.
        let mut best_start = None;
        let mut best_len = 0usize;
        let mut i = 0usize;
        while i < 8 {
            if groups[i] == 0 {
                let start = i;
                let mut len = 0usize;
                while i < 8 && groups[i] == 0 {
                    len += 1;
                    i += 1;
                }
                if len > best_len {
                    best_len = len;
                    best_start = Some(start);
                }
            } else {
                i += 1;
            }
        }
        if best_len < 2 {
            best_start = None;
        }

        let mut out = String::new();
        let mut idx = 0usize;
        while idx < 8 {
            if Some(idx) == best_start {
                out.push_str("::");
                idx += best_len;
                continue;
            }
            if idx > 0 && !out.ends_with(':') {
                out.push(':');
            }
            out.push_str(&format!("{:x}", groups[idx]));
            idx += 1;
        }
        if out.is_empty() {
            out.push_str("::");
        }
        out
    }
}

fn parse_ipv6_text(text: &str) -> Option<Ipv6Address> {
    let (head, tail, has_double_colon) = match text.split_once("::") {
        Some((h, t)) => (h, t, true),
        None => (text, "", false),
    };

    let split_groups = |s: &str| -> Option<Vec<u16>> {
        if s.is_empty() {
            return Some(Vec::new());
        }
        s.split(':')
            .map(|g| u16::from_str_radix(g, 16).ok().filter(|_| g.len() <= 4 && !g.is_empty()))
            .collect()
    };

    let mut head_groups = split_groups(head)?;

    let mut tail_groups = if has_double_colon {
        if let Some(last_colon) = tail.rfind(':') {
            if tail[last_colon + 1..].contains('.') {
                let v4 = Ipv4Address::parse(tail[last_colon + 1..].as_bytes()).ok()?;
                let b = v4.to_bytes();
                let mut g = split_groups(&tail[..last_colon])?;
                g.push(u16::from_be_bytes([b[0], b[1]]));
                g.push(u16::from_be_bytes([b[2], b[3]]));
                g
            } else {
                split_groups(tail)?
            }
        } else if tail.contains('.') {
            let v4 = Ipv4Address::parse(tail.as_bytes()).ok()?;
            let b = v4.to_bytes();
            vec![
                u16::from_be_bytes([b[0], b[1]]),
                u16::from_be_bytes([b[2], b[3]]),
            ]
        } else {
            split_groups(tail)?
        }
    } else {
        Vec::new()
    };

    if !has_double_colon {
        if let Some(last_colon) = head.rfind(':') {
            if head[last_colon + 1..].contains('.') {
                let v4 = Ipv4Address::parse(head[last_colon + 1..].as_bytes()).ok()?;
                let b = v4.to_bytes();
                head_groups = split_groups(&head[..last_colon])?;
                head_groups.push(u16::from_be_bytes([b[0], b[1]]));
                head_groups.push(u16::from_be_bytes([b[2], b[3]]));
            }
        }
    }

    let total = head_groups.len() + tail_groups.len();
    if has_double_colon {
        if total > 7 {
            return None;
        }
        let mut groups = head_groups;
        groups.resize(8 - tail_groups.len(), 0);
        groups.append(&mut tail_groups);
        let mut bytes = [0u8; 16];
        for (i, g) in groups.iter().enumerate() {
            bytes[i * 2..i * 2 + 2].copy_from_slice(&g.to_be_bytes());
        }
        Some(Ipv6Address(bytes))
    } else {
        if total != 8 {
            return None;
        }
        let mut bytes = [0u8; 16];
        for (i, g) in head_groups.iter().enumerate() {
            bytes[i * 2..i * 2 + 2].copy_from_slice(&g.to_be_bytes());
        }
        Some(Ipv6Address(bytes))
    }
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl fmt::Debug for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ipv6Address({})", self.to_canonical_string())
    }
}

// ------------------------------------------------------------------------------------------------
// IP-future
// ------------------------------------------------------------------------------------------------

/// The raw literal for `IPvFuture = "v" 1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IpFuture {
    version_hex: String,
    address: String,
}

impl IpFuture {
    pub fn parse(s: &[u8]) -> Result<Self, Error> {
        let text = std::str::from_utf8(s).map_err(|_| ErrorKind::Invalid(component(), 0))?;
        let rest = text
            .strip_prefix('v')
            .or_else(|| text.strip_prefix('V'))
            .ok_or_else(|| Error::from(ErrorKind::Invalid(component(), 0)))?;
        let (version_hex, address) = rest
            .split_once('.')
            .ok_or_else(|| Error::from(ErrorKind::Invalid(component(), 0)))?;
        if version_hex.is_empty() || !version_hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ErrorKind::Invalid(component(), 0).into());
        }
        if address.is_empty() {
            return Err(ErrorKind::Invalid(component(), 0).into());
        }
        Ok(IpFuture {
            version_hex: version_hex.to_ascii_uppercase(),
            address: address.to_string(),
        })
    }
}

impl fmt::Display for IpFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}.{}", self.version_hex, self.address)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ipv4_rejects_leading_zero() {
        assert!(Ipv4Address::parse(b"192.168.001.1").is_err());
    }

    #[test]
    fn ipv4_rejects_octet_over_255() {
        assert!(Ipv4Address::parse(b"256.1.1.1").is_err());
    }

    #[test]
    fn ipv4_round_trips() {
        let a = Ipv4Address::parse(b"192.168.0.1").unwrap();
        assert_eq!(a.to_string(), "192.168.0.1");
        assert!(!a.is_loopback());
        assert!(Ipv4Address::parse(b"127.0.0.1").unwrap().is_loopback());
    }

    #[test]
    fn ipv6_canonicalizes_zero_run() {
        let a = Ipv6Address::parse(b"2001:0db8:0000:0000:0000:0000:0000:0001").unwrap();
        assert_eq!(a.to_canonical_string(), "2001:db8::1");
    }

    #[test]
    fn ipv6_ties_break_to_earliest_run() {
        let a = Ipv6Address::parse(b"1:0:0:2:0:0:0:3").unwrap();
        assert_eq!(a.to_canonical_string(), "1:0:0:2::3");
    }

    #[test]
    fn ipv6_embeds_ipv4_tail() {
        let a = Ipv6Address::parse(b"::ffff:192.0.2.1").unwrap();
        assert_eq!(a.to_canonical_string(), "::ffff:c000:201");
    }

    #[test]
    fn ip_future_round_trips() {
        let f = IpFuture::parse(b"v1.fe80::1%25eth0").unwrap();
        assert_eq!(f.to_string(), "v1.fe80::1%25eth0");
    }
}
