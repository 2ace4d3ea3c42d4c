//! # Core Parser Definitions
//!
//! This module defines the fundamental parser interface, the result algebra every
//! parser returns, and the failure helpers shared by all parser implementations.

use crate::error::{ErrorCause, GrammarError, ParseError};
use crate::expected::Expected;
use crate::state::ParseState;
use std::fmt;
use std::rc::Rc;

pub(crate) const EOF_MESSAGE: &str =
    "Expected the state to have more content but reached the end of the state.";
pub(crate) const TOKEN_MESSAGE: &str = "Token did not match expected predicate or token list.";

/// The outcome of a single parser attempt.
///
/// `consumed` tells whether the attempt advanced the cursor, whether or not it
/// succeeded. A failure that consumed input is committed: alternatives are not
/// tried after it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<O> {
    Success { value: O, consumed: bool },
    Failure { consumed: bool },
}

impl<O> Outcome<O> {
    pub fn success(value: O, consumed: bool) -> Self {
        Outcome::Success { value, consumed }
    }

    pub fn failure(consumed: bool) -> Self {
        Outcome::Failure { consumed }
    }

    pub fn consumed(&self) -> bool {
        match self {
            Outcome::Success { consumed, .. } | Outcome::Failure { consumed } => *consumed,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success { .. })
    }

    pub fn map<U>(self, f: impl FnOnce(O) -> U) -> Outcome<U> {
        match self {
            Outcome::Success { value, consumed } => Outcome::Success {
                value: f(value),
                consumed,
            },
            Outcome::Failure { consumed } => Outcome::Failure { consumed },
        }
    }

    /// Same outcome, with `consumed` forced on if `earlier` already consumed.
    pub fn after(self, earlier: bool) -> Self {
        match self {
            Outcome::Success { value, consumed } => Outcome::Success {
                value,
                consumed: consumed || earlier,
            },
            Outcome::Failure { consumed } => Outcome::Failure {
                consumed: consumed || earlier,
            },
        }
    }
}

/// Result type for parsing operations.
///
/// Ordinary parse failures are `Ok(Outcome::Failure { .. })` with the details left
/// in [`ParseState::error`]. `Err` is reserved for fatal grammar faults, which
/// abort the whole parse.
pub type Reply<O> = Result<Outcome<O>, GrammarError>;

/// Parser trait defines the core parsing interface.
///
/// # Type Parameters
///
/// * `I` - The input token type
/// * `O` - The output value type
pub trait Parser<I, O> {
    /// Attempts to parse from the current position of `state`.
    ///
    /// The state is shared by every parser of the call: a parser may advance it,
    /// push and pop bookmarks, and must leave a [`ParseError`] in it when failing.
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O>;

    /// What this parser expects to find; reported when it fails.
    fn expected(&self) -> &[Expected<I>];
}

impl<I, O, P: Parser<I, O> + ?Sized> Parser<I, O> for &P {
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        (**self).parse(state)
    }

    fn expected(&self) -> &[Expected<I>] {
        (**self).expected()
    }
}

impl<I, O, P: Parser<I, O> + ?Sized> Parser<I, O> for Box<P> {
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        (**self).parse(state)
    }

    fn expected(&self) -> &[Expected<I>] {
        (**self).expected()
    }
}

impl<I, O, P: Parser<I, O> + ?Sized> Parser<I, O> for Rc<P> {
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        (**self).parse(state)
    }

    fn expected(&self) -> &[Expected<I>] {
        (**self).expected()
    }
}

/// A shared, type-erased parser.
///
/// Cloning is cheap and clones share the same node, which is how a grammar reuses
/// one parser in several places.
pub struct BoxedParser<I, O> {
    parser: Rc<dyn Parser<I, O>>,
}

impl<I, O> BoxedParser<I, O> {
    pub fn new<P: Parser<I, O> + 'static>(parser: P) -> Self {
        BoxedParser {
            parser: Rc::new(parser),
        }
    }
}

impl<I, O> Clone for BoxedParser<I, O> {
    fn clone(&self) -> Self {
        BoxedParser {
            parser: Rc::clone(&self.parser),
        }
    }
}

impl<I, O> Parser<I, O> for BoxedParser<I, O> {
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        self.parser.parse(state)
    }

    fn expected(&self) -> &[Expected<I>] {
        self.parser.expected()
    }
}

impl<I, O> fmt::Debug for BoxedParser<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedParser").finish_non_exhaustive()
    }
}

/// Fails with a custom message, recording the error in the state.
pub fn fail<I: Clone, O>(
    state: &mut ParseState<'_, I>,
    expected: &[Expected<I>],
    unexpected: Option<I>,
    message: impl Into<String>,
    consumed: bool,
    is_eof: bool,
) -> Reply<O> {
    state.error = ParseError::new(
        ErrorCause::new(unexpected, state.position(), is_eof),
        expected.to_vec(),
        message,
    );
    Ok(Outcome::failure(consumed))
}

/// Fails because the input ended early.
pub fn fail_eof<I: Clone, O>(
    state: &mut ParseState<'_, I>,
    expected: &[Expected<I>],
    consumed: bool,
) -> Reply<O> {
    fail(state, expected, None, EOF_MESSAGE, consumed, true)
}

/// Fails because `unexpected` did not match.
pub fn fail_token<I: Clone, O>(
    state: &mut ParseState<'_, I>,
    expected: &[Expected<I>],
    unexpected: I,
    consumed: bool,
) -> Reply<O> {
    fail(state, expected, Some(unexpected), TOKEN_MESSAGE, consumed, false)
}

/// Fails by forwarding the error already in the state, with its expectations
/// replaced by `expected`.
pub fn forward_fail_with_expected<I: Clone, O>(
    state: &mut ParseState<'_, I>,
    expected: &[Expected<I>],
    consumed: bool,
) -> Reply<O> {
    state.error = state.error.with_expected(expected.to_vec());
    Ok(Outcome::failure(consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{CharPositions, SourcePosition};
    use crate::state::CharSource;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_outcome_after_propagates_consumption() {
        assert_eq!(Outcome::success(1, false).after(true), Outcome::success(1, true));
        assert_eq!(Outcome::<i32>::failure(false).after(true), Outcome::failure(true));
        assert_eq!(Outcome::<i32>::failure(true).after(false), Outcome::failure(true));
    }

    #[test]
    fn test_outcome_map_keeps_consumption() {
        assert_eq!(Outcome::success(2, true).map(|v| v * 10), Outcome::success(20, true));
        assert_eq!(
            Outcome::<i32>::failure(true).map(|v| v * 10),
            Outcome::<i32>::failure(true)
        );
    }

    #[test]
    fn test_fail_helpers_record_error() {
        let source = CharSource::new("x");
        let calc = CharPositions::default();
        let mut state = ParseState::new(&source, &calc, SourcePosition::default());
        let expected = vec![Expected::tokens(vec!['a'])];

        let reply: Reply<char> = fail_token(&mut state, &expected, 'x', false);
        assert_eq!(reply, Ok(Outcome::failure(false)));
        assert_eq!(state.error.cause.unexpected, Some('x'));
        assert_eq!(state.error.message, TOKEN_MESSAGE);
        assert_eq!(state.error.expected, expected);

        let reply: Reply<char> = forward_fail_with_expected(&mut state, &[Expected::Eof], true);
        assert_eq!(reply, Ok(Outcome::failure(true)));
        assert_eq!(state.error.message, TOKEN_MESSAGE);
        assert_eq!(state.error.expected, vec![Expected::Eof]);

        let reply: Reply<char> = fail_eof(&mut state, &[], false);
        assert_eq!(reply, Ok(Outcome::failure(false)));
        assert!(state.error.cause.is_eof);
    }
}
