/*!
Grammar combinators (C2): a byte cursor plus `sequence`/`alternative`/`optional`/`repeat`/
`delim`/`token`/`squelch`.

The teacher has no direct equivalent (`rdftk_iri::parse` drove everything off `regex!`), so
this module is grounded instead in the general shape of the teacher's `Result`-returning,
never-panicking parse functions (`parse_authority`, `parse_iuserinfo` in the old
`authority.rs`): every rule returns `Result<T>` and advances an explicit position rather than
throwing, and a distinguished error variant (here, [`Mismatch`]) means "try the next
alternative" without that ever becoming a public-facing error, matching §7's requirement that
`mismatch` never surfaces to callers.
*/

use crate::chars::CharSet;
use crate::error::{Error, ErrorKind};

// ------------------------------------------------------------------------------------------------
// Cursor
// ------------------------------------------------------------------------------------------------

/// A position within an input byte slice. Rules advance the cursor on success and leave it
/// untouched on failure (including on `Mismatch`).
#[derive(Clone, Copy)]
pub struct Cursor<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.pos..]
    }

    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }
}

/// Internal-only signal that a rule did not apply at the current position. Never converted
/// into the public [`Error`] type; combinators consume it to try the next alternative.
pub(crate) enum Outcome<T> {
    Matched(T),
    Mismatch,
    NeedMore(usize),
    Invalid(Error),
}

pub(crate) type PResult<T> = Outcome<T>;

/// Runs `rule` against `cursor`, restoring the cursor's position on any non-match.
pub(crate) fn try_rule<'a, T>(
    cursor: &mut Cursor<'a>,
    rule: impl FnOnce(&mut Cursor<'a>) -> PResult<T>,
) -> PResult<T> {
    let start = cursor.pos;
    let outcome = rule(cursor);
    if !matches!(outcome, Outcome::Matched(_)) {
        cursor.pos = start;
    }
    outcome
}

// ------------------------------------------------------------------------------------------------
// Combinators
// ------------------------------------------------------------------------------------------------

/// Matches a single byte from `set`.
pub(crate) fn delim<'a>(cursor: &mut Cursor<'a>, set: &CharSet) -> PResult<u8> {
    try_rule(cursor, |c| match c.peek() {
        Some(b) if set.contains(b) => {
            c.advance(1);
            Outcome::Matched(b)
        }
        Some(_) => Outcome::Mismatch,
        None => Outcome::NeedMore(c.pos),
    })
}

/// Matches a single literal byte.
pub(crate) fn literal<'a>(cursor: &mut Cursor<'a>, byte: u8) -> PResult<u8> {
    try_rule(cursor, |c| match c.peek() {
        Some(b) if b == byte => {
            c.advance(1);
            Outcome::Matched(b)
        }
        Some(_) => Outcome::Mismatch,
        None => Outcome::NeedMore(c.pos),
    })
}

/// Matches the longest run of bytes in `set`, requiring at least one.
pub(crate) fn token<'a>(cursor: &mut Cursor<'a>, set: &CharSet) -> PResult<&'a [u8]> {
    try_rule(cursor, |c| {
        let n = set.find_first_not_of(c.remaining());
        if n == 0 {
            Outcome::Mismatch
        } else {
            let span = &c.remaining()[..n];
            c.advance(n);
            Outcome::Matched(span)
        }
    })
}

/// Matches zero-or-more bytes in `set` (unlike [`token`], never fails).
pub(crate) fn token0<'a>(cursor: &mut Cursor<'a>, set: &CharSet) -> &'a [u8] {
    let n = set.find_first_not_of(cursor.remaining());
    let span = &cursor.remaining()[..n];
    cursor.advance(n);
    span
}

/// Returns `Some(value)` if `rule` matches, `None` otherwise; never itself fails.
pub(crate) fn optional<'a, T>(
    cursor: &mut Cursor<'a>,
    rule: impl FnOnce(&mut Cursor<'a>) -> PResult<T>,
) -> PResult<Option<T>> {
    match try_rule(cursor, rule) {
        Outcome::Matched(v) => Outcome::Matched(Some(v)),
        Outcome::Mismatch => Outcome::Matched(None),
        Outcome::NeedMore(o) => Outcome::NeedMore(o),
        Outcome::Invalid(e) => Outcome::Invalid(e),
    }
}

/// Applies `rule` between `min` and `max` (inclusive) times, greedily. Fails with `Mismatch`
/// if fewer than `min` repetitions are found.
pub(crate) fn repeat<'a, T>(
    cursor: &mut Cursor<'a>,
    min: usize,
    max: usize,
    mut rule: impl FnMut(&mut Cursor<'a>) -> PResult<T>,
) -> PResult<Vec<T>> {
    try_rule(cursor, |c| {
        let mut out = Vec::new();
        while out.len() < max {
            match try_rule(c, &mut rule) {
                Outcome::Matched(v) => out.push(v),
                Outcome::Mismatch => break,
                Outcome::NeedMore(o) => return Outcome::NeedMore(o),
                Outcome::Invalid(e) => return Outcome::Invalid(e),
            }
        }
        if out.len() < min {
            Outcome::Mismatch
        } else {
            Outcome::Matched(out)
        }
    })
}

/// Runs `rule` for its side effects and discards its value.
pub(crate) fn squelch<'a, T>(
    cursor: &mut Cursor<'a>,
    rule: impl FnOnce(&mut Cursor<'a>) -> PResult<T>,
) -> PResult<()> {
    match try_rule(cursor, rule) {
        Outcome::Matched(_) => Outcome::Matched(()),
        Outcome::Mismatch => Outcome::Mismatch,
        Outcome::NeedMore(o) => Outcome::NeedMore(o),
        Outcome::Invalid(e) => Outcome::Invalid(e),
    }
}

/// Tries each alternative in order, returning the first match. A `NeedMore` from any
/// alternative is propagated verbatim (per §4.2) rather than treated as a mismatch, so callers
/// can distinguish "none of these apply" from "this might apply given more bytes".
macro_rules! alternative {
    ($cursor:expr, $($rule:expr),+ $(,)?) => {{
        let cursor = $cursor;
        let mut result = $crate::grammar::Outcome::Mismatch;
        loop {
            $(
                match $crate::grammar::try_rule(cursor, $rule) {
                    $crate::grammar::Outcome::Matched(v) => {
                        result = $crate::grammar::Outcome::Matched(v);
                        break;
                    }
                    $crate::grammar::Outcome::Mismatch => {}
                    other @ $crate::grammar::Outcome::NeedMore(_) => {
                        result = other;
                        break;
                    }
                    other @ $crate::grammar::Outcome::Invalid(_) => {
                        result = other;
                        break;
                    }
                }
            )+
            break;
        }
        result
    }};
}

pub(crate) use alternative;

/// Converts an [`Outcome`] into a public [`Result`], turning an unresolved [`Outcome::Mismatch`]
/// into the supplied `invalid` error (a `Mismatch` reaching this point means every alternative
/// of a top-level rule failed).
pub(crate) fn finish<T>(outcome: PResult<T>, on_mismatch: impl FnOnce() -> Error) -> Result<T, Error> {
    match outcome {
        Outcome::Matched(v) => Ok(v),
        Outcome::Mismatch => Err(on_mismatch()),
        Outcome::NeedMore(o) => Err(ErrorKind::NeedMore(o).into()),
        Outcome::Invalid(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chars::{ALPHA, DIGIT};

    #[test]
    fn token_matches_longest_run() {
        let mut c = Cursor::new(b"abc123");
        match token(&mut c, &ALPHA) {
            Outcome::Matched(span) => assert_eq!(span, b"abc"),
            _ => panic!("expected match"),
        }
        assert_eq!(c.pos(), 3);
    }

    #[test]
    fn token_fails_on_empty_run() {
        let mut c = Cursor::new(b"123");
        assert!(matches!(token(&mut c, &ALPHA), Outcome::Mismatch));
        assert_eq!(c.pos(), 0);
    }

    #[test]
    fn optional_never_fails() {
        let mut c = Cursor::new(b"123");
        match optional(&mut c, |c| token(c, &ALPHA)) {
            Outcome::Matched(None) => {}
            _ => panic!("expected Matched(None)"),
        }
        assert_eq!(c.pos(), 0);
    }

    #[test]
    fn repeat_respects_bounds() {
        let a = crate::chars::CharSet::single(b'a');
        let mut c = Cursor::new(b"aaab");
        match repeat(&mut c, 2, 3, |c| delim(c, &a)) {
            Outcome::Matched(v) => assert_eq!(v.len(), 3),
            _ => panic!("expected 3 matches"),
        }
        assert_eq!(c.pos(), 3);
    }

    #[test]
    fn alternative_tries_in_order() {
        let mut c = Cursor::new(b"123");
        let outcome = alternative!(
            &mut c,
            |c: &mut Cursor| token(c, &ALPHA),
            |c: &mut Cursor| token(c, &DIGIT)
        );
        match outcome {
            Outcome::Matched(span) => assert_eq!(span, b"123"),
            _ => panic!("expected digit match"),
        }
    }
}
