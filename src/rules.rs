/*!
Component rules (C4): scheme, authority (userinfo/host/port), path variants, query, fragment,
and the five top-level reference forms.

Grounded in the teacher's `rdftk_iri::authority::parse_authority`/`parse_iuserinfo`/
`parse_ihost`, which split an authority string against `lazy_static!` regexes in the same
order (userinfo, host, port) this module uses; and in `rdftk_iri::iri::IRI`'s top-level
`FromStr`, which split scheme/authority/path/query/fragment with one RFC-2396-appendix-B-style
regex. This module performs the same decomposition with the grammar module's cursor and token
combinators (used directly in `scan_scheme`) instead of `regex`, falling back to hand-rolled
position tracking for authority/path/query, since those additionally have to record byte offsets
and segment/parameter counts as they go (`regex` alone cannot produce the indexed buffer's
`nseg`/`nparam`/decoded-length metadata in one pass, and a generic combinator only reports a
matched span, not those running counts).
*/

use crate::address::{IpFuture, Ipv4Address, Ipv6Address};
use crate::chars::{self, CharSet};
use crate::error::{Component as ErrComponent, Error, ErrorKind};
use crate::grammar::{self, Outcome};
use crate::scheme::SchemeId;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// Which kind of host is present, mirroring `spec.md` §3's `host_kind` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostKind {
    None,
    RegName,
    Ipv4,
    Ipv6,
    IpFuture,
}

bitflags_lite! {
    /// Presence bits for the delimiter-bearing components, driving [`ParseRecord::span_of`].
    pub struct Presence: u8 {
        const SCHEME = 0b0000_0001;
        const AUTHORITY = 0b0000_0010;
        const USERINFO = 0b0000_0100;
        const PORT = 0b0000_1000;
        const QUERY = 0b0001_0000;
        const FRAGMENT = 0b0010_0000;
    }
}

/// The seven canonical components, in buffer order. `PART_COUNT` is the fixed arity C5 relies
/// on for its offset array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum Part {
    Scheme = 0,
    Userinfo = 1,
    Host = 2,
    Port = 3,
    Path = 4,
    Query = 5,
    Fragment = 6,
}

pub const PART_COUNT: usize = 7;

/// The outcome of parsing a complete reference: end-offsets for each [`Part`] plus the
/// metadata `spec.md` §3 requires precomputed (host kind, numeric port, segment/parameter
/// counts, scheme classification).
#[derive(Clone, Debug)]
pub struct ParseRecord {
    pub offsets: [u32; PART_COUNT],
    pub presence: Presence,
    pub host_kind: HostKind,
    pub port_number: u16,
    pub port_numeric: bool,
    pub scheme_id: SchemeId,
    pub nseg: u32,
    pub nparam: u32,
    pub size: u32,
}

impl ParseRecord {
    /// Computes the `(start, end)` byte range of `part` within the original input, accounting
    /// for the delimiter bytes that sit between components but belong to none of them.
    pub fn span_of(&self, part: Part) -> (usize, usize) {
        let spans = self.spans();
        spans[part as usize]
    }

    pub fn spans(&self) -> [(usize, usize); PART_COUNT] {
        let o = &self.offsets;
        let mut pos: usize;
        let mut out = [(0usize, 0usize); PART_COUNT];

        let scheme_end = if self.presence.contains(Presence::SCHEME) { o[0] as usize } else { 0 };
        out[0] = (0, scheme_end);
        pos = scheme_end;
        if self.presence.contains(Presence::SCHEME) {
            pos += 1;
        }
        if self.presence.contains(Presence::AUTHORITY) {
            pos += 2;
        }

        let ui_end = o[1] as usize;
        out[1] = (pos, ui_end);
        pos = ui_end;
        if self.presence.contains(Presence::USERINFO) {
            pos += 1;
        }

        let host_end = o[2] as usize;
        out[2] = (pos, host_end);
        pos = host_end;
        if self.presence.contains(Presence::PORT) {
            pos += 1;
        }

        let port_end = o[3] as usize;
        out[3] = (pos, port_end);
        pos = port_end;

        let path_end = o[4] as usize;
        out[4] = (pos, path_end);
        pos = path_end;
        if self.presence.contains(Presence::QUERY) {
            pos += 1;
        }

        let query_end = o[5] as usize;
        out[5] = (pos, query_end);
        pos = query_end;
        if self.presence.contains(Presence::FRAGMENT) {
            pos += 1;
        }

        let frag_end = o[6] as usize;
        out[6] = (pos, frag_end);

        out
    }
}

/// Which top-level reference form to parse. See `spec.md` §4.4.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Form {
    Uri,
    AbsoluteUri,
    RelativeRef,
    UriReference,
    OriginForm,
}

// ------------------------------------------------------------------------------------------------
// Entry point
// ------------------------------------------------------------------------------------------------

/// Parses `input` as `form`, producing a [`ParseRecord`] of offsets into `input` itself (the
/// caller copies `input` verbatim into a C5 buffer; no component is rewritten during parsing).
pub fn parse(input: &[u8], form: Form) -> Result<ParseRecord, Error> {
    match form {
        Form::Uri => parse_uri_form(input, true),
        Form::AbsoluteUri => parse_absolute_uri_form(input),
        Form::RelativeRef => parse_relative_ref_form(input),
        Form::UriReference => parse_uri_reference_form(input),
        Form::OriginForm => parse_origin_form(input),
    }
}

fn parse_uri_form(input: &[u8], allow_fragment: bool) -> Result<ParseRecord, Error> {
    let mut pos = 0usize;
    let scheme_end = scan_scheme(input, &mut pos)
        .ok_or_else(|| Error::from(ErrorKind::Invalid(ErrComponent::Scheme, pos)))?;
    if input.get(pos) != Some(&b':') {
        return Err(ErrorKind::Invalid(ErrComponent::Scheme, pos).into());
    }
    pos += 1;
    let scheme_id = SchemeId::classify(&input[0..scheme_end]);

    let mut presence = Presence::SCHEME;
    let (ui_off, host_off, port_off, port_number, port_numeric, host_kind) =
        scan_authority_if_present(input, &mut pos, &mut presence)?;

    let path_start = pos;
    scan_path(input, &mut pos, presence.contains(Presence::AUTHORITY), true)?;
    let path_end = pos;
    let nseg = count_segments(&input[path_start..path_end]);

    let (query_off, nparam) = scan_optional_query(input, &mut pos, &mut presence)?;
    let fragment_off = if allow_fragment {
        scan_optional_fragment(input, &mut pos, &mut presence)?
    } else {
        query_off
    };

    if pos != input.len() {
        return Err(ErrorKind::Invalid(ErrComponent::Path, pos).into());
    }

    Ok(ParseRecord {
        offsets: [
            scheme_end as u32,
            ui_off as u32,
            host_off as u32,
            port_off as u32,
            path_end as u32,
            query_off as u32,
            fragment_off as u32,
        ],
        presence,
        host_kind,
        port_number,
        port_numeric,
        scheme_id,
        nseg,
        nparam,
        size: input.len() as u32,
    })
}

fn parse_absolute_uri_form(input: &[u8]) -> Result<ParseRecord, Error> {
    parse_uri_form(input, false)
}

fn parse_relative_ref_form(input: &[u8]) -> Result<ParseRecord, Error> {
    let mut pos = 0usize;
    let mut presence = Presence::empty();

    let (ui_off, host_off, port_off, port_number, port_numeric, host_kind) =
        scan_authority_if_present(input, &mut pos, &mut presence)?;

    let path_start = pos;
    scan_path(input, &mut pos, presence.contains(Presence::AUTHORITY), false)?;
    let path_end = pos;
    let nseg = count_segments(&input[path_start..path_end]);

    let (query_off, nparam) = scan_optional_query(input, &mut pos, &mut presence)?;
    let fragment_off = scan_optional_fragment(input, &mut pos, &mut presence)?;

    if pos != input.len() {
        return Err(ErrorKind::Invalid(ErrComponent::Path, pos).into());
    }

    Ok(ParseRecord {
        offsets: [0, ui_off as u32, host_off as u32, port_off as u32, path_end as u32, query_off as u32, fragment_off as u32],
        presence,
        host_kind,
        port_number,
        port_numeric,
        scheme_id: SchemeId::Unknown,
        nseg,
        nparam,
        size: input.len() as u32,
    })
}

fn parse_uri_reference_form(input: &[u8]) -> Result<ParseRecord, Error> {
    match parse_uri_form(input, true) {
        Ok(rec) => Ok(rec),
        Err(_) => parse_relative_ref_form(input),
    }
}

fn parse_origin_form(input: &[u8]) -> Result<ParseRecord, Error> {
    let mut pos = 0usize;
    if input.first() != Some(&b'/') {
        return Err(ErrorKind::Invalid(ErrComponent::Path, 0).into());
    }
    let path_start = pos;
    scan_path(input, &mut pos, false, false)?;
    let path_end = pos;
    let nseg = count_segments(&input[path_start..path_end]);
    let mut presence = Presence::empty();
    let (query_off, nparam) = scan_optional_query(input, &mut pos, &mut presence)?;
    if pos != input.len() {
        return Err(ErrorKind::Invalid(ErrComponent::Path, pos).into());
    }
    Ok(ParseRecord {
        offsets: [0, 0, 0, 0, path_end as u32, query_off as u32, query_off as u32],
        presence,
        host_kind: HostKind::None,
        port_number: 0,
        port_numeric: false,
        scheme_id: SchemeId::Unknown,
        nseg,
        nparam,
        size: input.len() as u32,
    })
}

// ------------------------------------------------------------------------------------------------
// Scheme
// ------------------------------------------------------------------------------------------------

fn scan_scheme(input: &[u8], pos: &mut usize) -> Option<usize> {
    let mut cursor = grammar::Cursor::new(&input[*pos..]);
    if !matches!(grammar::delim(&mut cursor, &chars::SCHEME_START), Outcome::Matched(_)) {
        return None;
    }
    grammar::token0(&mut cursor, &chars::SCHEME);
    *pos += cursor.pos();
    Some(*pos)
}

// ------------------------------------------------------------------------------------------------
// Authority (userinfo / host / port)
// ------------------------------------------------------------------------------------------------

type AuthorityScan = (usize, usize, usize, u16, bool, HostKind);

fn scan_authority_if_present(
    input: &[u8],
    pos: &mut usize,
    presence: &mut Presence,
) -> Result<AuthorityScan, Error> {
    if input[*pos..].starts_with(b"//") {
        *pos += 2;
        presence.insert(Presence::AUTHORITY);
        scan_authority(input, pos, presence)
    } else {
        let p = *pos as u32;
        Ok((p as usize, p as usize, p as usize, 0, false, HostKind::None))
    }
}

fn scan_authority(input: &[u8], pos: &mut usize, presence: &mut Presence) -> Result<AuthorityScan, Error> {
    let authority_start = *pos;
    let authority_end = input[authority_start..]
        .iter()
        .position(|&b| b == b'/' || b == b'?' || b == b'#')
        .map(|n| authority_start + n)
        .unwrap_or(input.len());
    let authority = &input[authority_start..authority_end];

    let (userinfo_len, has_userinfo) = match find_unescaped(authority, b'@') {
        Some(n) => (n, true),
        None => (0, false),
    };
    if has_userinfo {
        presence.insert(Presence::USERINFO);
        validate_component(&authority[..userinfo_len], &chars::USERINFO, ErrComponent::Userinfo)?;
    }
    let host_port = if has_userinfo { &authority[userinfo_len + 1..] } else { authority };
    let host_port_start = authority_start + if has_userinfo { userinfo_len + 1 } else { 0 };
    let userinfo_end = authority_start + userinfo_len;

    let (host_span, host_kind) = scan_host(host_port)?;
    let host_end = host_port_start + host_span;

    let mut port_number = 0u16;
    let mut port_numeric = false;
    let port_end;
    if host_port.get(host_span) == Some(&b':') {
        presence.insert(Presence::PORT);
        let port_bytes = &host_port[host_span + 1..];
        let digits_len = chars::DIGIT.find_first_not_of(port_bytes);
        if digits_len != port_bytes.len() {
            return Err(ErrorKind::Invalid(ErrComponent::Port, host_end + 1 + digits_len).into());
        }
        port_end = host_end + 1 + digits_len;
        if digits_len > 0 {
            match std::str::from_utf8(&port_bytes[..digits_len]).unwrap().parse::<u32>() {
                Ok(v) if v <= u16::MAX as u32 => {
                    port_number = v as u16;
                    port_numeric = true;
                }
                _ => port_numeric = false,
            }
        }
    } else {
        port_end = host_end;
    }

    *pos = authority_end;
    Ok((userinfo_end, host_end, port_end, port_number, port_numeric, host_kind))
}

fn find_unescaped(span: &[u8], target: u8) -> Option<usize> {
    // userinfo/host never contain a literal '@' delimiter other than the one separating them;
    // percent-encoded bytes never decode to this search since we scan the encoded form.
    span.iter().position(|&b| b == target)
}

fn scan_host(host_port: &[u8]) -> Result<(usize, HostKind), Error> {
    if host_port.first() == Some(&b'[') {
        let end = host_port
            .iter()
            .position(|&b| b == b']')
            .ok_or_else(|| Error::from(ErrorKind::Invalid(ErrComponent::Host, 0)))?;
        let inner = &host_port[1..end];
        let kind = if inner.first() == Some(&b'v') || inner.first() == Some(&b'V') {
            IpFuture::parse(inner).map_err(|_| Error::from(ErrorKind::Invalid(ErrComponent::Host, 0)))?;
            HostKind::IpFuture
        } else {
            Ipv6Address::parse(inner).map_err(|_| Error::from(ErrorKind::Invalid(ErrComponent::Host, 0)))?;
            HostKind::Ipv6
        };
        return Ok((end + 1, kind));
    }

    let end = host_port
        .iter()
        .position(|&b| b == b':')
        .unwrap_or(host_port.len());
    let span = &host_port[..end];
    validate_component(span, &chars::REG_NAME, ErrComponent::Host)?;
    let kind = if Ipv4Address::parse(span).is_ok() {
        HostKind::Ipv4
    } else {
        HostKind::RegName
    };
    Ok((end, kind))
}

// ------------------------------------------------------------------------------------------------
// Path
// ------------------------------------------------------------------------------------------------

fn scan_path(
    input: &[u8],
    pos: &mut usize,
    has_authority: bool,
    allow_scheme_like_first_segment: bool,
) -> Result<(), Error> {
    let start = *pos;
    let end = input[start..]
        .iter()
        .position(|&b| b == b'?' || b == b'#')
        .map(|n| start + n)
        .unwrap_or(input.len());
    let path = &input[start..end];

    if has_authority {
        // path-abempty: zero or more "/" segment
        validate_path_segments(path, ErrComponent::Path)?;
    } else if path.first() == Some(&b'/') {
        // path-absolute
        validate_path_segments(path, ErrComponent::Path)?;
    } else if !path.is_empty() {
        if !allow_scheme_like_first_segment {
            // path-noscheme: first segment must not contain ':'
            let first_seg_end = path.iter().position(|&b| b == b'/').unwrap_or(path.len());
            if path[..first_seg_end].contains(&b':') {
                return Err(ErrorKind::Invalid(ErrComponent::Path, start).into());
            }
        }
        validate_path_segments(path, ErrComponent::Path)?;
    }
    // path-empty is the `path.is_empty()` fallthrough.

    *pos = end;
    Ok(())
}

fn validate_path_segments(path: &[u8], component: ErrComponent) -> Result<(), Error> {
    for segment in path.split(|&b| b == b'/') {
        validate_component(segment, &chars::PCHAR, component)?;
    }
    Ok(())
}

fn count_segments(path: &[u8]) -> u32 {
    if path.is_empty() {
        return 0;
    }
    // A leading "/" (path-absolute/path-abempty) introduces the path, it does not separate two
    // segments; `Segments::raw_segments` strips it for the same reason before splitting.
    let trimmed = if path.starts_with(b"/") { &path[1..] } else { path };
    trimmed.iter().filter(|&&b| b == b'/').count() as u32 + 1
}

// ------------------------------------------------------------------------------------------------
// Query / fragment
// ------------------------------------------------------------------------------------------------

fn scan_optional_query(input: &[u8], pos: &mut usize, presence: &mut Presence) -> Result<(usize, u32), Error> {
    if input.get(*pos) == Some(&b'?') {
        presence.insert(Presence::QUERY);
        *pos += 1;
        let start = *pos;
        let end = input[start..]
            .iter()
            .position(|&b| b == b'#')
            .map(|n| start + n)
            .unwrap_or(input.len());
        let query = &input[start..end];
        validate_component(query, &chars::QUERY, ErrComponent::Query)?;
        let nparam = if query.is_empty() { 0 } else { query.iter().filter(|&&b| b == b'&').count() as u32 + 1 };
        *pos = end;
        Ok((end, nparam))
    } else {
        Ok((*pos, 0))
    }
}

fn scan_optional_fragment(input: &[u8], pos: &mut usize, presence: &mut Presence) -> Result<usize, Error> {
    if input.get(*pos) == Some(&b'#') {
        presence.insert(Presence::FRAGMENT);
        *pos += 1;
        let start = *pos;
        let fragment = &input[start..];
        validate_component(fragment, &chars::FRAGMENT, ErrComponent::Fragment)?;
        *pos = input.len();
        Ok(input.len())
    } else {
        Ok(*pos)
    }
}

fn validate_component(span: &[u8], allowed: &CharSet, component: ErrComponent) -> Result<(), Error> {
    let mut i = 0usize;
    while i < span.len() {
        let b = span[i];
        if b == b'%' {
            let hex_ok = span.get(i + 1).map_or(false, |b| b.is_ascii_hexdigit())
                && span.get(i + 2).map_or(false, |b| b.is_ascii_hexdigit());
            if !hex_ok {
                return Err(ErrorKind::InvalidEncoding(i).into());
            }
            i += 3;
        } else if allowed.contains(b) {
            i += 1;
        } else {
            return Err(ErrorKind::Invalid(component, i).into());
        }
    }
    Ok(())
}

/// Public wrapper over [`validate_component`] for setters in [`crate::uri`] that need to
/// validate an encoded setter's input against a component's allowed character set before
/// copying it into the buffer (§4.6: "Encoded setters require valid percent-encoding... they
/// fail with `invalid-part` otherwise").
pub fn validate_component_pub(span: &[u8], allowed: &CharSet, component: ErrComponent) -> Result<(), Error> {
    validate_component(span, allowed, component)
}

// ------------------------------------------------------------------------------------------------
// Minimal bitflags, in the teacher's no-extra-dependency style for small internal flag sets
// ------------------------------------------------------------------------------------------------

macro_rules! bitflags_lite {
    (
        $(#[$meta:meta])*
        pub struct $name:ident: $ty:ty {
            $(const $flag:ident = $value:expr;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
        pub struct $name($ty);

        impl $name {
            $(pub const $flag: $name = $name($value);)*

            pub const fn empty() -> Self {
                $name(0)
            }

            pub fn contains(self, other: $name) -> bool {
                (self.0 & other.0) == other.0
            }

            pub fn insert(&mut self, other: $name) {
                self.0 |= other.0;
            }
        }

        impl std::ops::BitOr for $name {
            type Output = $name;
            fn bitor(self, rhs: $name) -> $name {
                $name(self.0 | rhs.0)
            }
        }
    };
}

use bitflags_lite;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_http_uri() {
        let rec = parse(b"http://example.com/a/b?q=1#frag", Form::Uri).unwrap();
        assert_eq!(rec.scheme_id, SchemeId::Known(crate::scheme::WellKnownScheme::Http));
        assert_eq!(rec.host_kind, HostKind::RegName);
        assert_eq!(rec.nseg, 2);
        assert_eq!(rec.nparam, 1);
    }

    #[test]
    fn rejects_relative_ref_with_colon_in_first_segment() {
        assert!(parse(b"a:b/c", Form::RelativeRef).is_err());
        assert!(parse(b"./a:b/c", Form::RelativeRef).is_ok());
    }

    #[test]
    fn absolute_uri_forbids_fragment() {
        assert!(parse(b"http://example.com/#frag", Form::AbsoluteUri).is_err());
        assert!(parse(b"http://example.com/", Form::AbsoluteUri).is_ok());
    }

    #[test]
    fn uri_reference_accepts_relative_ref() {
        let rec = parse(b"//example.com/a", Form::UriReference).unwrap();
        assert!(rec.presence.contains(Presence::AUTHORITY));
        assert!(!rec.presence.contains(Presence::SCHEME));
    }

    #[test]
    fn parses_ipv6_host() {
        let rec = parse(b"http://[2001:db8::1]:8080/", Form::Uri).unwrap();
        assert_eq!(rec.host_kind, HostKind::Ipv6);
        assert_eq!(rec.port_number, 8080);
    }

    #[test]
    fn origin_form_requires_leading_slash() {
        assert!(parse(b"/a/b?q=1", Form::OriginForm).is_ok());
        assert!(parse(b"a/b", Form::OriginForm).is_err());
    }
}
