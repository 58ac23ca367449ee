/*!
Path segments editor (C7): a read-only iterator over `/`-delimited path segments, and a
mutable editor layered over the C5 buffer.

Grounded in the teacher's `rdftk_iri::path::Path`, which offered `push`/`pop`/`pop_slug`/
`slug` over a `String`-backed path and applied the ambiguity rule implicitly through its
`resolve`/`Normalize` logic. This module keeps the same segment-at-a-time operation set but,
per `spec.md` §4.7, splices directly into the owner's shared buffer instead of rebuilding a
private `String`.
*/

use crate::buffer::Buffer;
use crate::chars::PCHAR;
use crate::error::Error;
use crate::pct::{self, CodecOptions, DecodedView};
use crate::rules::Part;

const OPTS: CodecOptions = CodecOptions { space_as_plus: false };

// ------------------------------------------------------------------------------------------------
// Read-only iteration (shared by views and owners)
// ------------------------------------------------------------------------------------------------

/// An ordered, read-only view of a path's segments. Does not include the separating `/`.
#[derive(Clone, Copy)]
pub struct Segments<'a> {
    path: &'a [u8],
}

impl<'a> Segments<'a> {
    pub fn new(path: &'a [u8]) -> Self {
        Self { path }
    }

    fn raw_segments(&self) -> Vec<&'a [u8]> {
        if self.path.is_empty() {
            return Vec::new();
        }
        let trimmed = if self.path.starts_with(b"/") { &self.path[1..] } else { self.path };
        trimmed.split(|&b| b == b'/').collect()
    }

    pub fn is_absolute(&self) -> bool {
        self.path.first() == Some(&b'/')
    }

    pub fn size(&self) -> usize {
        self.raw_segments().len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn encoded(&self, index: usize) -> Option<&'a [u8]> {
        self.raw_segments().get(index).copied()
    }

    pub fn decoded(&self, index: usize) -> Option<DecodedView<'a>> {
        self.encoded(index).map(|s| DecodedView::new(s, OPTS))
    }

    pub fn front(&self) -> Option<&'a [u8]> {
        self.encoded(0)
    }

    pub fn back(&self) -> Option<&'a [u8]> {
        let n = self.size();
        if n == 0 {
            None
        } else {
            self.encoded(n - 1)
        }
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &'a [u8]> {
        self.raw_segments().into_iter()
    }
}

// ------------------------------------------------------------------------------------------------
// Mutable editor over an owner's buffer
// ------------------------------------------------------------------------------------------------

/// A mutable editor over the path segments of an owning [`crate::uri::Uri`]. Every operation
/// splices directly into the owner's shared buffer; obtaining a second `SegmentsMut` or any
/// view after a mutation observes the new state (there is nothing left to invalidate within
/// this type itself, but any separately-held [`crate::uri::UriView`] is invalidated per §3).
pub struct SegmentsMut<'a> {
    buffer: &'a mut Buffer,
}

impl<'a> SegmentsMut<'a> {
    pub fn new(buffer: &'a mut Buffer) -> Self {
        Self { buffer }
    }

    fn path(&self) -> &[u8] {
        self.buffer.get(Part::Path)
    }

    fn read(&self) -> Segments<'_> {
        Segments::new(self.path())
    }

    pub fn size(&self) -> usize {
        self.read().size()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn front(&self) -> Option<Vec<u8>> {
        self.read().front().map(|s| s.to_vec())
    }

    pub fn back(&self) -> Option<Vec<u8>> {
        self.read().back().map(|s| s.to_vec())
    }

    fn byte_range_of(&self, index: usize) -> Option<(usize, usize)> {
        let is_absolute = self.read().is_absolute();
        let mut pos = if is_absolute { 1 } else { 0 };
        for (i, seg) in self.read().iter().enumerate() {
            let end = pos + seg.len();
            if i == index {
                return Some((pos, end));
            }
            pos = end + 1; // the separating '/'
        }
        None
    }

    /// Applies the §4.7 ambiguity rule: a relative path with no authority/scheme whose first
    /// segment would contain `:` must be prefixed by a `./` segment so it cannot be mistaken
    /// for a scheme.
    fn needs_dot_slash_prefix(&self, has_authority: bool, has_scheme: bool, first_segment: &[u8]) -> bool {
        !has_authority && !has_scheme && !self.read().is_absolute() && first_segment.contains(&b':')
    }

    /// Replaces the entire path with `segments`, re-applying the leading-`/` state of the
    /// current path and the ambiguity rule.
    pub fn assign(&mut self, segments: &[&[u8]], has_authority: bool, has_scheme: bool) -> Result<(), Error> {
        let is_absolute = self.read().is_absolute();
        let mut new_path: Vec<u8> = Vec::new();
        if is_absolute {
            new_path.push(b'/');
        }
        if let Some(first) = segments.first() {
            if self.needs_dot_slash_prefix(has_authority, has_scheme, first) && !is_absolute {
                new_path.extend_from_slice(b"./");
            }
        }
        for (i, seg) in segments.iter().enumerate() {
            if i > 0 {
                new_path.push(b'/');
            }
            new_path.extend_from_slice(seg);
        }
        let (start, end) = {
            let (s, _) = self.buffer.range_of(Part::Path);
            let full_len = self.buffer.get(Part::Path).len();
            (s, s + full_len)
        };
        let old_len = end - start;
        let span = self
            .buffer
            .resize_range(Part::Path, 0, old_len, new_path.len(), Some(segments.len() as u32))?;
        span.copy_from_slice(&new_path);
        Ok(())
    }

    pub fn push_back(&mut self, segment: &[u8], has_authority: bool, has_scheme: bool) -> Result<(), Error> {
        self.insert(self.size(), segment, has_authority, has_scheme)
    }

    pub fn pop_back(&mut self) -> Result<(), Error> {
        let n = self.size();
        if n == 0 {
            return Ok(());
        }
        self.erase(n - 1)
    }

    pub fn clear(&mut self) -> Result<(), Error> {
        let old_len = self.buffer.get(Part::Path).len();
        self.buffer.resize_range(Part::Path, 0, old_len, 0, Some(0))?;
        Ok(())
    }

    pub fn insert(
        &mut self,
        index: usize,
        segment: &[u8],
        has_authority: bool,
        has_scheme: bool,
    ) -> Result<(), Error> {
        let n = self.size();
        let is_absolute = self.read().is_absolute();
        let new_count = n as u32 + 1;

        if n == 0 {
            let mut new_path = Vec::new();
            if is_absolute {
                new_path.push(b'/');
            }
            if self.needs_dot_slash_prefix(has_authority, has_scheme, segment) {
                new_path.extend_from_slice(b"./");
            }
            new_path.extend_from_slice(segment);
            let old_len = self.path().len();
            let span = self.buffer.resize_range(Part::Path, 0, old_len, new_path.len(), Some(new_count))?;
            span.copy_from_slice(&new_path);
            return Ok(());
        }

        if index >= n {
            // append at the end
            let at = self.path().len();
            let mut insertion = Vec::new();
            insertion.push(b'/');
            insertion.extend_from_slice(segment);
            let span = self.buffer.resize_range(Part::Path, at, 0, insertion.len(), Some(new_count))?;
            span.copy_from_slice(&insertion);
            return Ok(());
        }

        let (seg_start, _) = self.byte_range_of(index).expect("index < n");
        let mut insertion = Vec::new();
        insertion.extend_from_slice(segment);
        insertion.push(b'/');
        let span = self.buffer.resize_range(Part::Path, seg_start, 0, insertion.len(), Some(new_count))?;
        span.copy_from_slice(&insertion);
        Ok(())
    }

    pub fn erase(&mut self, index: usize) -> Result<(), Error> {
        let n = self.size();
        if index >= n {
            return Ok(());
        }
        let (start, end) = self.byte_range_of(index).expect("index < n");
        let new_count = n as u32 - 1;
        if n == 1 {
            let is_absolute = self.read().is_absolute();
            let mut new_path = Vec::new();
            if is_absolute {
                new_path.push(b'/');
            }
            let old_len = self.path().len();
            let span = self.buffer.resize_range(Part::Path, 0, old_len, new_path.len(), Some(new_count))?;
            span.copy_from_slice(&new_path);
            return Ok(());
        }
        // remove the segment plus one adjoining '/' (the following one, or the preceding one
        // if this is the last segment).
        let path_len = self.path().len();
        if end < path_len {
            self.buffer.resize_range(Part::Path, start, end - start + 1, 0, Some(new_count))?;
        } else {
            self.buffer.resize_range(Part::Path, start - 1, end - start + 1, 0, Some(new_count))?;
        }
        Ok(())
    }

    pub fn replace(&mut self, index: usize, segment: &[u8]) -> Result<(), Error> {
        let n = self.size();
        if index >= n {
            return Ok(());
        }
        let (start, end) = self.byte_range_of(index).expect("index < n");
        self.buffer.resize_range(Part::Path, start, end - start, segment.len(), None)?;
        Ok(())
    }
}

/// Percent-encodes a decoded segment using the permissive `pchar` set (§4.7: "decoded inputs
/// are re-encoded by the permissive set for `pchar`").
pub fn encode_segment(decoded: &[u8]) -> Vec<u8> {
    pct::encode(decoded, &PCHAR, OPTS)
}
