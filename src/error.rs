/*!
Error types shared across the whole crate.

Every parse failure and every fallible mutation reports one of the `ErrorKind` variants
below together with the byte offset into the input (or into the owning buffer) at which the
problem was found. `Mismatch` is deliberately not part of this enum: it is used internally
by the grammar combinators in [`crate::grammar`] to signal "this alternative does not
apply" and is never allowed to escape a public function.
*/

use std::fmt;

// ------------------------------------------------------------------------------------------------
// Public Types
// ------------------------------------------------------------------------------------------------

/// Identifies which URI component an error occurred in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Component {
    Scheme,
    Userinfo,
    Host,
    Port,
    Path,
    Query,
    Fragment,
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Component::Scheme => "scheme",
            Component::Userinfo => "userinfo",
            Component::Host => "host",
            Component::Port => "port",
            Component::Path => "path",
            Component::Query => "query",
            Component::Fragment => "fragment",
        };
        write!(f, "{}", s)
    }
}

error_chain! {
    errors {
        /// Input was truncated at a point where more bytes might complete a valid parse.
        NeedMore(offset: usize) {
            description("input ended before a valid parse could complete")
            display("need more input at offset {}", offset)
        }
        /// A syntactic rule was violated (bad character, malformed octet count, port overflow).
        Invalid(component: Component, offset: usize) {
            description("a syntactic rule was violated")
            display("invalid {} at offset {}", component, offset)
        }
        /// A `%` was not followed by two hex digits, or an escape decoded to a disallowed byte.
        InvalidEncoding(offset: usize) {
            description("malformed percent-encoding")
            display("invalid percent-encoding at offset {}", offset)
        }
        /// A setter received content that does not conform to its component's grammar.
        InvalidPart(component: Component) {
            description("setter input does not conform to the component's grammar")
            display("invalid content for the {} component", component)
        }
        /// A lookup by key had no match.
        NotFound {
            description("no matching entry was found")
            display("no matching entry was found")
        }
        /// Resolution was attempted against a base that is not absolute.
        NotABase {
            description("the base URI has no scheme and cannot be used to resolve a reference")
            display("the base URI has no scheme and cannot be used to resolve a reference")
        }
        /// A splice would exceed the configured maximum size.
        TooLarge {
            description("the operation would exceed the maximum representable URI size")
            display("the operation would exceed the maximum representable URI size")
        }
        /// An index-based access was outside the valid range.
        OutOfRange {
            description("index out of range")
            display("index out of range")
        }
    }
}
