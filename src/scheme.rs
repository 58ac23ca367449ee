/*!
Well-known scheme identification (C4) and default-port lookup.

Grounded in the teacher's `rdftk_iri::scheme::Scheme`, which exposed ~90 well-known schemes
as associated functions and compared case-insensitively. `spec.md` §6 narrows the *recognized*
catalog to six schemes used for default-port and normalization hints; this module keeps the
teacher's `default_port()`-style associated function (from `authority::Port::default_for`) but
scoped to that six-scheme enum rather than the teacher's much larger one.
*/

use std::fmt;

/// A scheme recognized for default-port and normalization purposes. Any other scheme still
/// parses successfully (C4 rules accept any `scheme` token); it is simply reported as
/// [`SchemeId::Unknown`] by the component rule that classifies it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WellKnownScheme {
    Ftp,
    File,
    Http,
    Https,
    Ws,
    Wss,
}

impl WellKnownScheme {
    /// Recognizes `name` case-insensitively against the six well-known schemes.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        let lower: Vec<u8> = name.iter().map(|b| b.to_ascii_lowercase()).collect();
        match lower.as_slice() {
            b"ftp" => Some(WellKnownScheme::Ftp),
            b"file" => Some(WellKnownScheme::File),
            b"http" => Some(WellKnownScheme::Http),
            b"https" => Some(WellKnownScheme::Https),
            b"ws" => Some(WellKnownScheme::Ws),
            b"wss" => Some(WellKnownScheme::Wss),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WellKnownScheme::Ftp => "ftp",
            WellKnownScheme::File => "file",
            WellKnownScheme::Http => "http",
            WellKnownScheme::Https => "https",
            WellKnownScheme::Ws => "ws",
            WellKnownScheme::Wss => "wss",
        }
    }

    /// The conventional default port, used by the normalizer (C10) to drop a redundant
    /// `:port` and by `encoded_host_and_port()` callers who want a display default. `file`
    /// has no default port.
    pub fn default_port(self) -> Option<u16> {
        match self {
            WellKnownScheme::Ftp => Some(21),
            WellKnownScheme::File => None,
            WellKnownScheme::Http => Some(80),
            WellKnownScheme::Https => Some(443),
            WellKnownScheme::Ws => Some(80),
            WellKnownScheme::Wss => Some(443),
        }
    }
}

impl fmt::Display for WellKnownScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The scheme classification a component rule reports for a parsed scheme token (§4.4): a
/// recognized well-known scheme, or `Unknown` for any other syntactically valid scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SchemeId {
    Known(WellKnownScheme),
    Unknown,
}

impl SchemeId {
    pub fn classify(name: &[u8]) -> Self {
        match WellKnownScheme::from_name(name) {
            Some(s) => SchemeId::Known(s),
            None => SchemeId::Unknown,
        }
    }

    pub fn default_port(self) -> Option<u16> {
        match self {
            SchemeId::Known(s) => s.default_port(),
            SchemeId::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_case_insensitively() {
        assert_eq!(SchemeId::classify(b"HTTPS"), SchemeId::Known(WellKnownScheme::Https));
        assert_eq!(SchemeId::classify(b"Http"), SchemeId::Known(WellKnownScheme::Http));
    }

    #[test]
    fn unknown_scheme_has_no_default_port() {
        assert_eq!(SchemeId::classify(b"mailto"), SchemeId::Unknown);
        assert_eq!(SchemeId::classify(b"mailto").default_port(), None);
    }

    #[test]
    fn file_has_no_default_port() {
        assert_eq!(WellKnownScheme::File.default_port(), None);
    }

    #[test]
    fn ws_and_http_share_port_80() {
        assert_eq!(WellKnownScheme::Ws.default_port(), Some(80));
        assert_eq!(WellKnownScheme::Http.default_port(), Some(80));
    }
}
