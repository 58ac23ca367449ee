/*!
A grammar-driven parser and indexed in-place editor for RFC 3986 URI references.

This crate parses a URI reference into a single contiguous buffer with precomputed component
offsets (see [`buffer`]), exposes it through a read-only [`uri::UriView`] / owning [`uri::Uri`]
pair (see [`uri`]), and layers segment (see [`segments`]) and query-parameter (see [`params`])
editors, a reference resolver (see [`resolve`]), and a normalizer/comparator (see [`normalize`])
on top.
*/

#[macro_use]
extern crate error_chain;
extern crate lazy_static;
extern crate regex;

pub mod address;
pub mod buffer;
pub mod chars;
pub mod error;
pub mod grammar;
pub mod normalize;
pub mod params;
pub mod pct;
pub mod resolve;
pub mod rules;
pub mod scheme;
pub mod segments;
pub mod uri;

#[cfg(feature = "stack")]
pub mod stack;

pub use error::{Component, Error, ErrorKind};
pub use rules::Form;
pub use scheme::{SchemeId, WellKnownScheme};
pub use uri::{Uri, UriRead, UriView};

/// Parses `input` as a `URI` (§4.4): scheme required, fragment allowed.
pub fn parse_uri(input: &str) -> Result<Uri, Error> {
    Uri::parse_as(input, Form::Uri)
}

/// Parses `input` as an `absolute-URI` (§4.4): scheme required, no fragment.
pub fn parse_absolute_uri(input: &str) -> Result<Uri, Error> {
    Uri::parse_as(input, Form::AbsoluteUri)
}

/// Parses `input` as a `relative-ref` (§4.4): no scheme.
pub fn parse_relative_ref(input: &str) -> Result<Uri, Error> {
    Uri::parse_as(input, Form::RelativeRef)
}

/// Parses `input` as a `URI-reference` (§4.4): either a `URI` or a `relative-ref`.
pub fn parse_uri_reference(input: &str) -> Result<Uri, Error> {
    Uri::parse_as(input, Form::UriReference)
}

/// Parses `input` as an HTTP `origin-form` request target: `path-absolute [ "?" query ]`.
pub fn parse_origin_form(input: &str) -> Result<Uri, Error> {
    Uri::parse_as(input, Form::OriginForm)
}

/// Parses `input` as a standalone path, validating it against the `path-rootless`/
/// `path-absolute`/`path-empty` grammar used when a path appears with no authority, and
/// returning a read-only segments view over it on success.
pub fn parse_path(input: &str) -> Result<segments::Segments<'_>, Error> {
    let bytes = input.as_bytes();
    for segment in bytes.split(|&b| b == b'/') {
        rules::validate_component_pub(segment, &chars::PCHAR, Component::Path)?;
    }
    Ok(segments::Segments::new(bytes))
}

/// Parses `input` as a standalone `authority` (`[ userinfo "@" ] host [ ":" port ]`) by
/// wrapping it in a throwaway `//` prefix and running the full reference parser, then
/// discarding everything but the authority-derived `Uri`.
pub fn parse_authority(input: &str) -> Result<Uri, Error> {
    let wrapped = format!("//{}", input);
    Uri::parse_as(&wrapped, Form::RelativeRef)
}

/// Parses `input` as a bare IPv4 address.
pub fn parse_ipv4(input: &str) -> Result<address::Ipv4Address, Error> {
    address::Ipv4Address::parse(input.as_bytes())
}

/// Parses `input` as a bare IPv6 address (without the surrounding `[` `]`).
pub fn parse_ipv6(input: &str) -> Result<address::Ipv6Address, Error> {
    address::Ipv6Address::parse(input.as_bytes())
}

/// Parses `input` as a bare `IPvFuture` literal (without the surrounding `[` `]`).
pub fn parse_ip_future(input: &str) -> Result<address::IpFuture, Error> {
    address::IpFuture::parse(input.as_bytes())
}
