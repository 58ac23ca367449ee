/*!
Query parameters editor (C8): an ordered `(key, value?)` sequence over the query component,
delimited by `&` and `=`.

Grounded in the teacher's `rdftk_iri::query::{Query, QueryPart}`, which paired a key with an
`Option<String>` value and composed `key=value` or a bare `key` on write; this module keeps
that pair shape but, like [`crate::segments`], splices directly into the C5 buffer instead of
rebuilding an owned `String`.
*/

use crate::buffer::Buffer;
use crate::chars::QUERY;
use crate::error::{Error, ErrorKind};
use crate::pct::{self, CodecOptions, DecodedView};
use crate::rules::Part;

// ------------------------------------------------------------------------------------------------
// Read-only iteration
// ------------------------------------------------------------------------------------------------

/// A single `(key, value?)` pair. `has_value` distinguishes a present-but-empty value
/// (`key=`) from an absent one (`key`), per §3.
#[derive(Clone, Copy)]
pub struct Param<'a> {
    pub encoded_key: &'a [u8],
    pub encoded_value: &'a [u8],
    pub has_value: bool,
    options: CodecOptions,
}

impl<'a> Param<'a> {
    pub fn key(&self) -> DecodedView<'a> {
        DecodedView::new(self.encoded_key, self.options)
    }

    pub fn value(&self) -> Option<DecodedView<'a>> {
        if self.has_value {
            Some(DecodedView::new(self.encoded_value, self.options))
        } else {
            None
        }
    }
}

/// An ordered, read-only view of a query's parameters.
#[derive(Clone, Copy)]
pub struct Params<'a> {
    query: &'a [u8],
    options: CodecOptions,
}

impl<'a> Params<'a> {
    pub fn new(query: &'a [u8], options: CodecOptions) -> Self {
        Self { query, options }
    }

    fn raw_pairs(&self) -> Vec<&'a [u8]> {
        if self.query.is_empty() {
            Vec::new()
        } else {
            self.query.split(|&b| b == b'&').collect()
        }
    }

    fn parse_pair(&self, raw: &'a [u8]) -> Param<'a> {
        match raw.iter().position(|&b| b == b'=') {
            Some(n) => Param {
                encoded_key: &raw[..n],
                encoded_value: &raw[n + 1..],
                has_value: true,
                options: self.options,
            },
            None => Param {
                encoded_key: raw,
                encoded_value: &[],
                has_value: false,
                options: self.options,
            },
        }
    }

    pub fn size(&self) -> usize {
        self.raw_pairs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.query.is_empty()
    }

    pub fn at_index(&self, index: usize) -> Option<Param<'a>> {
        self.raw_pairs().get(index).map(|r| self.parse_pair(r))
    }

    pub fn iter(&self) -> impl Iterator<Item = Param<'a>> + '_ {
        self.raw_pairs().into_iter().map(move |r| self.parse_pair(r))
    }

    fn key_eq(&self, a: &[u8], b: &[u8], ignore_case: bool) -> bool {
        let da: Vec<u8> = DecodedView::new(a, self.options).iter().collect();
        let db: Vec<u8> = DecodedView::new(b, self.options).iter().collect();
        if ignore_case {
            da.eq_ignore_ascii_case(&db)
        } else {
            da == db
        }
    }

    /// The first parameter whose decoded key equals `key`.
    pub fn find(&self, key: &[u8], ignore_case: bool) -> Option<Param<'a>> {
        self.iter().find(|p| self.key_eq(p.encoded_key, key, ignore_case))
    }

    /// The last parameter whose decoded key equals `key`.
    pub fn find_last(&self, key: &[u8], ignore_case: bool) -> Option<Param<'a>> {
        self.iter().filter(|p| self.key_eq(p.encoded_key, key, ignore_case)).last()
    }

    pub fn contains(&self, key: &[u8], ignore_case: bool) -> bool {
        self.find(key, ignore_case).is_some()
    }

    pub fn count(&self, key: &[u8], ignore_case: bool) -> usize {
        self.iter().filter(|p| self.key_eq(p.encoded_key, key, ignore_case)).count()
    }

    /// The first value by insertion order; fails with `not-found` if no parameter has `key`.
    pub fn at(&self, key: &[u8], ignore_case: bool) -> Result<DecodedView<'a>, Error> {
        self.find(key, ignore_case)
            .and_then(|p| p.value())
            .ok_or_else(|| ErrorKind::NotFound.into())
    }
}

// ------------------------------------------------------------------------------------------------
// Mutable editor over an owner's buffer
// ------------------------------------------------------------------------------------------------

/// A mutable editor over the query parameters of an owning [`crate::uri::Uri`].
pub struct ParamsMut<'a> {
    buffer: &'a mut Buffer,
    options: CodecOptions,
}

impl<'a> ParamsMut<'a> {
    pub fn new(buffer: &'a mut Buffer, options: CodecOptions) -> Self {
        Self { buffer, options }
    }

    fn query(&self) -> &[u8] {
        self.buffer.get(Part::Query)
    }

    fn read(&self) -> Params<'_> {
        Params::new(self.query(), self.options)
    }

    pub fn size(&self) -> usize {
        self.read().size()
    }

    fn byte_range_of(&self, index: usize) -> Option<(usize, usize)> {
        let mut pos = 0usize;
        for (i, raw) in self.query().split(|&b| b == b'&').enumerate() {
            let end = pos + raw.len();
            if i == index {
                return Some((pos, end));
            }
            pos = end + 1;
        }
        None
    }

    /// Appends a `(key, value?)` pair, percent-encoding `key`/`value` for the query's
    /// permissive set and honoring `space_as_plus`.
    pub fn push_back(&mut self, key: &[u8], value: Option<&[u8]>) -> Result<(), Error> {
        let encoded = encode_pair(key, value, self.options);
        let old_query = self.query();
        let n = self.read().size();
        if old_query.is_empty() {
            let span = self.buffer.resize_range(Part::Query, 0, 0, encoded.len(), Some(1))?;
            span.copy_from_slice(&encoded);
            self.buffer.presence_mut().insert(crate::rules::Presence::QUERY);
            return Ok(());
        }
        let at = old_query.len();
        let mut insertion = Vec::with_capacity(encoded.len() + 1);
        insertion.push(b'&');
        insertion.extend_from_slice(&encoded);
        self.buffer.resize_range(Part::Query, at, 0, insertion.len(), Some(n as u32 + 1))?;
        Ok(())
    }

    pub fn pop_back(&mut self) -> Result<(), Error> {
        let n = self.read().size();
        if n == 0 {
            return Ok(());
        }
        self.erase(n - 1)
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        let old_len = self.query().len();
        self.buffer.resize_range(Part::Query, 0, old_len, 0, Some(0))?;
        Ok(())
    }

    pub fn erase(&mut self, index: usize) -> Result<(), Error> {
        let n = self.read().size();
        if index >= n {
            return Ok(());
        }
        let (start, end) = self.byte_range_of(index).expect("index < n");
        let query_len = self.query().len();
        if n == 1 {
            self.buffer.resize_range(Part::Query, 0, query_len, 0, Some(0))?;
            return Ok(());
        }
        if end < query_len {
            self.buffer.resize_range(Part::Query, start, end - start + 1, 0, Some(n as u32 - 1))?;
        } else {
            self.buffer.resize_range(Part::Query, start - 1, end - start + 1, 0, Some(n as u32 - 1))?;
        }
        Ok(())
    }

    /// Replaces the first value for `key` (percent-encoding it) or appends `(key, value)` if
    /// no parameter with that key exists yet.
    pub fn set(&mut self, key: &[u8], value: &[u8], ignore_case: bool) -> Result<(), Error> {
        let found = self.read().find(key, ignore_case).map(|p| {
            let base = p.encoded_key.as_ptr() as usize - self.query().as_ptr() as usize;
            (base, p.has_value, p.encoded_key.len(), p.encoded_value.len())
        });
        match found {
            Some((key_start, has_value, key_len, value_len)) => {
                let value_encoded = pct::encode(value, &QUERY, self.options);
                if has_value {
                    let value_start = key_start + key_len + 1;
                    self.buffer.resize_range(Part::Query, value_start, value_len, value_encoded.len(), None)?;
                } else {
                    let insert_at = key_start + key_len;
                    let mut insertion = Vec::with_capacity(value_encoded.len() + 1);
                    insertion.push(b'=');
                    insertion.extend_from_slice(&value_encoded);
                    self.buffer.resize_range(Part::Query, insert_at, 0, insertion.len(), None)?;
                }
                Ok(())
            }
            None => self.push_back(key, Some(value)),
        }
    }

    /// Drops the `=value` for the parameter at `index`, keeping its key (reverts to
    /// `has_value=false`).
    pub fn unset(&mut self, index: usize) -> Result<(), Error> {
        let param = match self.read().at_index(index) {
            Some(p) if p.has_value => p,
            _ => return Ok(()),
        };
        let key_start = param.encoded_key.as_ptr() as usize - self.query().as_ptr() as usize;
        let old_len = param.encoded_key.len() + 1 + param.encoded_value.len();
        self.buffer.resize_range(Part::Query, key_start, old_len, param.encoded_key.len(), None)?;
        Ok(())
    }
}

fn encode_pair(key: &[u8], value: Option<&[u8]>, options: CodecOptions) -> Vec<u8> {
    let mut out = pct::encode(key, &QUERY, options);
    if let Some(v) = value {
        out.push(b'=');
        out.extend_from_slice(&pct::encode(v, &QUERY, options));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::rules::{self, Form};

    fn build(s: &[u8]) -> Buffer {
        Buffer::from_parse(s, rules::parse(s, Form::RelativeRef).unwrap())
    }

    #[test]
    fn iterates_pairs_and_distinguishes_no_value() {
        let buf = build(b"?a=1&b&c=");
        let q = buf.get(Part::Query);
        let params = Params::new(q, CodecOptions { space_as_plus: true });
        let all: Vec<Param> = params.iter().collect();
        assert_eq!(all.len(), 3);
        assert!(all[0].has_value);
        assert!(!all[1].has_value);
        assert!(all[2].has_value);
        assert_eq!(all[2].encoded_value, b"");
    }

    #[test]
    fn find_and_at_respect_insertion_order() {
        let buf = build(b"?a=1&a=2");
        let q = buf.get(Part::Query);
        let params = Params::new(q, CodecOptions { space_as_plus: true });
        let v = params.at(b"a", false).unwrap();
        assert_eq!(v, *"1");
    }

    #[test]
    fn set_appends_when_missing_and_replaces_when_present() {
        let mut buf = build(b"?a=1");
        {
            let mut pm = ParamsMut::new(&mut buf, CodecOptions { space_as_plus: true });
            pm.set(b"b", b"2", false).unwrap();
        }
        assert_eq!(buf.get(Part::Query), b"a=1&b=2");
        {
            let mut pm = ParamsMut::new(&mut buf, CodecOptions { space_as_plus: true });
            pm.set(b"a", b"9", false).unwrap();
        }
        assert_eq!(buf.get(Part::Query), b"a=9&b=2");
    }

    #[test]
    fn unset_keeps_key_without_value() {
        let mut buf = build(b"?a=1&b=2");
        {
            let mut pm = ParamsMut::new(&mut buf, CodecOptions { space_as_plus: true });
            pm.unset(0).unwrap();
        }
        assert_eq!(buf.get(Part::Query), b"a&b=2");
    }
}
