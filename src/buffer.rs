/*!
Indexed URI buffer (C5): a single contiguous, NUL-terminated ASCII buffer plus the seven
component end-offsets, splice primitives, and the precomputed metadata `spec.md` §3 requires.

There is no direct teacher equivalent — `rdftk_iri::iri::IRI` stored each component as an
independent owned `String`/value type rather than one shared buffer — so this module is
grounded instead in the one salvaged Boost.URL header read before `examples/` was lost,
`indexed_string.hpp` (`boost::urls::detail::indexed_view`), whose `index_[PartCount]` offset
array and `resize(part, n)`/`split(part, n)` splice primitives this module's `offsets` array
and `resize_component`/`resize_range` directly mirror. Error handling (`too-large` on overflow)
keeps the teacher's `error_chain!` idiom from [`crate::error`].
*/

use crate::error::{Error, ErrorKind};
use crate::pct::{self, CodecOptions};
use crate::rules::{HostKind, ParseRecord, Part, Presence, PART_COUNT};
use crate::scheme::SchemeId;

/// The maximum representable buffer size; offset arithmetic is `u32` throughout (§4.5: "an
/// unsigned size type sized to `max_size`... typical choice is 32-bit").
pub const MAX_SIZE: usize = u32::MAX as usize;

/// The indexed buffer: owned bytes, the seven part end-offsets, and precomputed metadata.
#[derive(Clone, Debug)]
pub struct Buffer {
    data: Vec<u8>,
    offsets: [u32; PART_COUNT],
    presence: Presence,
    host_kind: HostKind,
    port_number: u16,
    port_numeric: bool,
    scheme_id: SchemeId,
    nseg: u32,
    nparam: u32,
    decoded_len: [u32; PART_COUNT],
}

impl Buffer {
    /// Builds a buffer from a just-parsed input and its [`ParseRecord`]. `input` is copied
    /// verbatim: the parser reports offsets into `input` itself, and a valid URI reference's
    /// on-the-wire layout is already the buffer's canonical layout, so no component is
    /// rewritten here.
    pub fn from_parse(input: &[u8], record: ParseRecord) -> Self {
        let mut data = Vec::with_capacity(input.len() + 1);
        data.extend_from_slice(input);
        data.push(0);

        let mut buffer = Buffer {
            data,
            offsets: record.offsets,
            presence: record.presence,
            host_kind: record.host_kind,
            port_number: record.port_number,
            port_numeric: record.port_numeric,
            scheme_id: record.scheme_id,
            nseg: record.nseg,
            nparam: record.nparam,
            decoded_len: [0; PART_COUNT],
        };
        buffer.recompute_decoded_lens();
        buffer
    }

    fn recompute_decoded_lens(&mut self) {
        for part in ALL_PARTS {
            let span = self.get_by_index(part as usize).to_vec();
            let opts = codec_options_for(part);
            self.decoded_len[part as usize] = pct::decoded_size(&span, opts) as u32;
        }
    }

    // -------------------------------------------------------------------------------------
    // Read accessors
    // -------------------------------------------------------------------------------------

    /// The absolute end offset of `part` within the buffer.
    pub fn offset(&self, part: Part) -> u32 {
        self.offsets[part as usize]
    }

    /// The `(start, end)` byte range of `part`, honoring delimiter presence.
    pub fn range_of(&self, part: Part) -> (usize, usize) {
        self.record().span_of(part)
    }

    pub fn length(&self, part: Part) -> usize {
        let (s, e) = self.range_of(part);
        e - s
    }

    pub fn get(&self, part: Part) -> &[u8] {
        let (s, e) = self.range_of(part);
        &self.data[s..e]
    }

    fn get_by_index(&self, i: usize) -> &[u8] {
        self.get(INDEX_TO_PART[i])
    }

    pub fn decoded_length(&self, part: Part) -> u32 {
        self.decoded_len[part as usize]
    }

    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn host_kind(&self) -> HostKind {
        self.host_kind
    }

    pub fn port_number(&self) -> u16 {
        self.port_number
    }

    pub fn port_numeric(&self) -> bool {
        self.port_numeric
    }

    pub fn scheme_id(&self) -> SchemeId {
        self.scheme_id
    }

    pub fn nseg(&self) -> u32 {
        self.nseg
    }

    pub fn nparam(&self) -> u32 {
        self.nparam
    }

    pub fn capacity(&self) -> usize {
        self.data.capacity()
    }

    /// The size of the URI reference itself, excluding the trailing NUL.
    pub fn size(&self) -> usize {
        self.data.len() - 1
    }

    pub fn reserve(&mut self, additional: usize) {
        self.data.reserve(additional);
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.data.push(0);
        self.offsets = [0; PART_COUNT];
        self.presence = Presence::empty();
        self.host_kind = HostKind::None;
        self.port_number = 0;
        self.port_numeric = false;
        self.scheme_id = SchemeId::Unknown;
        self.nseg = 0;
        self.nparam = 0;
        self.decoded_len = [0; PART_COUNT];
    }

    /// The buffer's contents as a NUL-terminated byte slice.
    pub fn c_str(&self) -> &[u8] {
        &self.data
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.data.len() - 1]
    }

    fn record(&self) -> ParseRecord {
        ParseRecord {
            offsets: self.offsets,
            presence: self.presence,
            host_kind: self.host_kind,
            port_number: self.port_number,
            port_numeric: self.port_numeric,
            scheme_id: self.scheme_id,
            nseg: self.nseg,
            nparam: self.nparam,
            size: self.size() as u32,
        }
    }

    pub fn set_host_kind(&mut self, kind: HostKind) {
        self.host_kind = kind;
    }

    pub fn set_port_number(&mut self, number: u16, numeric: bool) {
        self.port_number = number;
        self.port_numeric = numeric;
    }

    pub fn set_scheme_id(&mut self, id: SchemeId) {
        self.scheme_id = id;
    }

    pub fn presence_mut(&mut self) -> &mut Presence {
        &mut self.presence
    }

    pub fn set_nseg(&mut self, n: u32) {
        self.nseg = n;
    }

    pub fn set_nparam(&mut self, n: u32) {
        self.nparam = n;
    }

    // -------------------------------------------------------------------------------------
    // Splice primitives
    // -------------------------------------------------------------------------------------

    fn ensure_capacity(&mut self, min_capacity: usize) -> Result<(), Error> {
        if min_capacity > MAX_SIZE {
            return Err(ErrorKind::TooLarge.into());
        }
        if self.data.capacity() < min_capacity {
            let grown = (self.data.capacity() * 2).max(min_capacity);
            self.data.reserve(grown - self.data.len());
        }
        Ok(())
    }

    /// Splices `old_len` bytes at absolute position `at` for `new_len` bytes, shifting every
    /// following byte by the same delta and preserving the NUL terminator. Returns the
    /// (uninitialized-content) span for the caller to write into.
    ///
    /// `part` identifies which component this splice belongs to: offsets at an earlier index
    /// than `part` are never touched, even when they numerically tie with `at + old_len` (a
    /// component immediately preceding an absent, zero-width delimiter-bearing gap stores an
    /// end offset equal to that gap's position); offsets at `part`'s index or later shift when
    /// they lie at or after `at + old_len`. `at` and `at + old_len` must fall within a single
    /// component's span, or its gap if absent; callers (C6/C7/C8) are responsible for that
    /// invariant.
    fn splice_at(&mut self, part: Part, at: usize, old_len: usize, new_len: usize) -> Result<&mut [u8], Error> {
        let old_tail_start = at + old_len;
        let delta = new_len as isize - old_len as isize;
        let new_total = (self.data.len() as isize + delta) as usize;
        if new_total > MAX_SIZE + 1 {
            return Err(ErrorKind::TooLarge.into());
        }
        self.ensure_capacity(new_total)?;

        if delta > 0 {
            self.data.resize(new_total, 0);
            self.data.copy_within(old_tail_start..self.data.len() - delta as usize, old_tail_start + delta as usize);
        } else if delta < 0 {
            let shrink = (-delta) as usize;
            self.data.copy_within(old_tail_start..self.data.len(), old_tail_start - shrink);
            self.data.truncate(self.data.len() - shrink);
        }

        let target_idx = part as usize;
        for (i, offset) in self.offsets.iter_mut().enumerate() {
            if i >= target_idx && (*offset as usize) >= old_tail_start {
                *offset = (*offset as isize + delta) as u32;
            }
        }

        self.recompute_decoded_lens();
        Ok(&mut self.data[at..at + new_len])
    }

    /// Grows or shrinks the span of `part` to `new_length` bytes. Does not validate the bytes
    /// later written into the returned span.
    pub fn resize_component(&mut self, part: Part, new_length: usize) -> Result<&mut [u8], Error> {
        let (start, end) = self.range_of(part);
        self.splice_at(part, start, end - start, new_length)
    }

    /// Splices `old_len` bytes at the byte offset `at` (relative to the start of `part`) for
    /// `new_len` bytes, and updates `nseg`/`nparam` to `new_count` when given. Used by the
    /// segment (C7) and parameter (C8) editors, which operate at sub-component byte
    /// granularity rather than whole-component granularity.
    pub fn resize_range(
        &mut self,
        part: Part,
        at_within_part: usize,
        old_len: usize,
        new_len: usize,
        new_count: Option<u32>,
    ) -> Result<&mut [u8], Error> {
        let (start, _) = self.range_of(part);
        let at = start + at_within_part;
        if let Some(count) = new_count {
            match part {
                Part::Path => self.nseg = count,
                Part::Query => self.nparam = count,
                _ => {}
            }
        }
        self.splice_at(part, at, old_len, new_len)
    }

    /// Splices a delimiter byte together with `content_len` bytes of new content into `part`'s
    /// currently-absent (zero-width) gap, for a delimiter that precedes its component: port
    /// `:`, query `?`, fragment `#`. The returned span covers only the content, after the
    /// written delimiter byte. `part`'s own stored offset ends up at the end of that content,
    /// matching what [`ParseRecord::spans`](crate::rules::ParseRecord::spans) expects once the
    /// presence bit is set.
    pub fn insert_leading_delimited(&mut self, part: Part, delim: u8, content_len: usize) -> Result<&mut [u8], Error> {
        let (start, _) = self.range_of(part);
        let span = self.splice_at(part, start, 0, 1 + content_len)?;
        span[0] = delim;
        Ok(&mut span[1..])
    }

    /// Same as [`Buffer::insert_leading_delimited`], but for a delimiter that follows its
    /// content: scheme `:`, userinfo `@`. Writes `content_len` bytes followed by `delim`, then
    /// corrects `part`'s own offset back by one byte so the delimiter is excluded from its span.
    pub fn insert_trailing_delimited(&mut self, part: Part, content_len: usize, delim: u8) -> Result<&mut [u8], Error> {
        let (start, _) = self.range_of(part);
        let span = self.splice_at(part, start, 0, content_len + 1)?;
        span[content_len] = delim;
        self.offsets[part as usize] -= 1;
        Ok(&mut span[..content_len])
    }

    /// Removes `part`'s content together with its leading delimiter (the mirror image of
    /// [`Buffer::insert_leading_delimited`]), collapsing back to the zero-width gap a never-set
    /// component occupies. Callers must only invoke this when `part` is actually present.
    pub fn remove_leading_delimited(&mut self, part: Part) -> Result<(), Error> {
        let (start, end) = self.range_of(part);
        self.splice_at(part, start - 1, end - start + 1, 0)?;
        Ok(())
    }

    /// Removes `part`'s content together with its trailing delimiter (the mirror image of
    /// [`Buffer::insert_trailing_delimited`]). The generic shift in [`Buffer::splice_at`] cannot
    /// reconstruct `part`'s own post-removal offset here (the delimiter being removed sits one
    /// byte past what `part`'s stored offset already excludes), so it is set directly.
    pub fn remove_trailing_delimited(&mut self, part: Part) -> Result<(), Error> {
        let (start, end) = self.range_of(part);
        self.splice_at(part, start, end - start + 1, 0)?;
        self.offsets[part as usize] = start as u32;
        Ok(())
    }

    /// Splices the authority marker `//` into the gap immediately before where userinfo/host
    /// would begin, on an absent-to-present transition for the authority itself.
    pub fn insert_authority_marker(&mut self) -> Result<(), Error> {
        let (start, _) = self.range_of(Part::Userinfo);
        let span = self.splice_at(Part::Userinfo, start, 0, 2)?;
        span.copy_from_slice(b"//");
        Ok(())
    }

    /// Removes the authority marker `//`. Callers must call this before clearing the
    /// `AUTHORITY` presence bit, and only after userinfo/host/port have already been collapsed
    /// to their absent, zero-width state.
    pub fn remove_authority_marker(&mut self) -> Result<(), Error> {
        let (start, _) = self.range_of(Part::Userinfo);
        self.splice_at(Part::Userinfo, start - 2, 2, 0)?;
        Ok(())
    }
}

const ALL_PARTS: [Part; PART_COUNT] = [
    Part::Scheme,
    Part::Userinfo,
    Part::Host,
    Part::Port,
    Part::Path,
    Part::Query,
    Part::Fragment,
];

const INDEX_TO_PART: [Part; PART_COUNT] = ALL_PARTS;

/// The query component is the only one that ever carries `space_as_plus`; see §4.1.
fn codec_options_for(part: Part) -> CodecOptions {
    CodecOptions {
        space_as_plus: matches!(part, Part::Query),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{self, Form};

    fn build(s: &[u8]) -> Buffer {
        let record = rules::parse(s, Form::UriReference).unwrap();
        Buffer::from_parse(s, record)
    }

    #[test]
    fn offsets_are_non_decreasing_and_final_equals_size() {
        let buf = build(b"http://a@example.com:8080/p/q?x=1#f");
        let mut prev = 0u32;
        for part in ALL_PARTS {
            let o = buf.offset(part);
            assert!(o >= prev);
            prev = o;
        }
        assert_eq!(buf.offset(Part::Fragment), buf.size() as u32);
    }

    #[test]
    fn get_recovers_each_component() {
        let buf = build(b"http://a@example.com:8080/p/q?x=1#f");
        assert_eq!(buf.get(Part::Scheme), b"http");
        assert_eq!(buf.get(Part::Userinfo), b"a");
        assert_eq!(buf.get(Part::Host), b"example.com");
        assert_eq!(buf.get(Part::Port), b"8080");
        assert_eq!(buf.get(Part::Path), b"/p/q");
        assert_eq!(buf.get(Part::Query), b"x=1");
        assert_eq!(buf.get(Part::Fragment), b"f");
    }

    #[test]
    fn resize_component_shifts_tail_and_offsets() {
        let mut buf = build(b"http://example.com/short?q=1");
        {
            let span = buf.resize_component(Part::Path, 12).unwrap();
            span.copy_from_slice(b"/much-longer");
        }
        assert_eq!(buf.get(Part::Path), b"/much-longer".as_ref());
        assert_eq!(buf.get(Part::Query), b"q=1");
        assert_eq!(buf.c_str().last(), Some(&0u8));
    }

    #[test]
    fn resize_component_can_shrink() {
        let mut buf = build(b"http://example.com/a/very/long/path?q=1");
        buf.resize_component(Part::Path, 2).unwrap().copy_from_slice(b"/x");
        assert_eq!(buf.get(Part::Path), b"/x");
        assert_eq!(buf.get(Part::Query), b"q=1");
    }
}
