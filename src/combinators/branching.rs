//! Alternation and the speculative parsers built on bookmarks.

use crate::core::{fail, forward_fail_with_expected, BoxedParser, Outcome, Parser, Reply};
use crate::error::{ErrorCause, ParseError};
use crate::expected::{union_expected, Expected};
use crate::state::ParseState;
use std::fmt;
use std::marker::PhantomData;

/// OneOf: Tries alternatives in order from the same position
///
/// The first alternative that succeeds, or that fails after consuming input, decides
/// the result. When every alternative fails without consuming, the reported error is
/// the one that got furthest into the input, the earliest alternative winning ties,
/// and its expectations are those of all alternatives.
pub struct OneOf<I, O> {
    parsers: Vec<BoxedParser<I, O>>,
    expected: Vec<Expected<I>>,
}

impl<I: Clone, O> OneOf<I, O> {
    pub fn new(parsers: Vec<BoxedParser<I, O>>) -> Self {
        Self {
            expected: union_expected(parsers.iter().map(|p| p.expected())),
            parsers,
        }
    }
}

impl<I: Clone, O> Clone for OneOf<I, O> {
    fn clone(&self) -> Self {
        Self {
            parsers: self.parsers.clone(),
            expected: self.expected.clone(),
        }
    }
}

impl<I: Clone, O> Parser<I, O> for OneOf<I, O> {
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        if self.parsers.is_empty() {
            return fail(state, &self.expected, None, "OneOf had no arguments.", false, false);
        }

        let mut furthest: Option<ParseError<I>> = None;

        for parser in &self.parsers {
            let outcome = parser.parse(state)?;
            if outcome.is_success() || outcome.consumed() {
                return Ok(outcome);
            }

            let further = furthest
                .as_ref()
                .map_or(true, |best| state.error.position() > best.position());
            if further {
                furthest = Some(state.error.clone());
            }
        }

        if let Some(error) = furthest {
            tracing::trace!(
                target: "parser::one_of",
                alternatives = self.parsers.len(),
                position = %error.position(),
                "all alternatives failed"
            );
            state.error = error;
        }
        forward_fail_with_expected(state, &self.expected, false)
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Not: Succeeds, producing nothing, only when the inner parser fails
///
/// When the inner parser succeeds the failure points at the token and position
/// where the attempt started.
#[derive(Clone)]
pub struct Not<P, I, O> {
    parser: P,
    message: String,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<O>,
}

impl<P, I, O> Not<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    /// Reports `message` when the inner parser succeeds. Needs no way of rendering
    /// the tokens.
    pub fn with_message(parser: P, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            expected: vec![Expected::label("Not...", parser.expected().to_vec())],
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<P, I, O> Not<P, I, O>
where
    P: Parser<I, O>,
    I: Clone + fmt::Display,
{
    /// Builds the message from the inner parser's rendered expectations.
    pub fn new(parser: P) -> Self {
        let rendered = parser
            .expected()
            .iter()
            .map(|expected| expected.to_string())
            .collect::<Vec<_>>()
            .join(", ");

        Self::with_message(parser, format!("Expected not {}", rendered))
    }
}

impl<P, I, O> Parser<I, ()> for Not<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<()> {
        let token = state.peek().cloned();
        let position = state.position();

        match self.parser.parse(state)? {
            Outcome::Success { consumed, .. } => {
                state.error = ParseError::new(
                    ErrorCause::new(token, position, false),
                    self.expected.clone(),
                    self.message.as_str(),
                );
                Ok(Outcome::failure(consumed))
            }
            Outcome::Failure { consumed } => Ok(Outcome::success((), consumed)),
        }
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Assert: Checks the value of a successful parse against a predicate
///
/// A rejected value fails with the computed message, keeping the consumption the
/// inner parser reported.
#[derive(Clone)]
pub struct Assert<P, F, M, I, O> {
    parser: P,
    predicate: F,
    message: M,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<O>,
}

impl<P, F, M, I, O> Assert<P, F, M, I, O>
where
    P: Parser<I, O>,
    F: Fn(&O) -> bool,
    M: Fn(&O) -> String,
    I: Clone,
{
    pub fn new(parser: P, predicate: F, message: M) -> Self {
        Self {
            expected: vec![Expected::label(
                "Result satisfying assertion",
                parser.expected().to_vec(),
            )],
            parser,
            predicate,
            message,
            _phantom: PhantomData,
        }
    }
}

impl<P, F, M, I, O> Parser<I, O> for Assert<P, F, M, I, O>
where
    P: Parser<I, O>,
    F: Fn(&O) -> bool,
    M: Fn(&O) -> String,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        match self.parser.parse(state)? {
            Outcome::Success { value, consumed } if !(self.predicate)(&value) => {
                let message = (self.message)(&value);
                fail(state, &self.expected, None, message, consumed, false)
            }
            outcome => Ok(outcome),
        }
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// WithExpected: Replaces the expectations reported by the inner parser
#[derive(Clone)]
pub struct WithExpected<P, I, O> {
    parser: P,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<O>,
}

impl<P, I, O> WithExpected<P, I, O>
where
    P: Parser<I, O>,
{
    pub fn new(parser: P, expected: Vec<Expected<I>>) -> Self {
        Self {
            parser,
            expected,
            _phantom: PhantomData,
        }
    }
}

impl<P, I, O> Parser<I, O> for WithExpected<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        match self.parser.parse(state)? {
            Outcome::Failure { consumed } => {
                forward_fail_with_expected(state, &self.expected, consumed)
            }
            success => Ok(success),
        }
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Lookahead: Parses without moving
///
/// On success the state is rewound and nothing is reported as consumed. A failure
/// is forwarded untouched, consumption included.
#[derive(Clone)]
pub struct Lookahead<P, I, O> {
    parser: P,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<O>,
}

impl<P, I, O> Lookahead<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    pub fn new(parser: P) -> Self {
        Self {
            expected: parser.expected().to_vec(),
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<P, I, O> Parser<I, O> for Lookahead<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        state.push_bookmark();
        let outcome = self.parser.parse(state).map_err(|e| {
            state.pop_bookmark();
            e
        })?;

        match outcome {
            Outcome::Success { value, .. } => {
                state.rewind();
                Ok(Outcome::success(value, false))
            }
            failure => {
                state.pop_bookmark();
                Ok(failure)
            }
        }
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Safe: Makes a parser atomic
///
/// A failure rewinds to where the attempt started and is reported as not
/// consuming, so an enclosing [`OneOf`] may try its next alternative.
#[derive(Clone)]
pub struct Safe<P, I, O> {
    parser: P,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<O>,
}

impl<P, I, O> Safe<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    pub fn new(parser: P) -> Self {
        Self {
            expected: parser.expected().to_vec(),
            parser,
            _phantom: PhantomData,
        }
    }
}

impl<P, I, O> Parser<I, O> for Safe<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        state.push_bookmark();
        let outcome = self.parser.parse(state).map_err(|e| {
            state.pop_bookmark();
            e
        })?;

        match outcome {
            Outcome::Failure { .. } => {
                state.rewind();
                Ok(Outcome::failure(false))
            }
            success => {
                state.pop_bookmark();
                Ok(success)
            }
        }
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::{ChainAtLeastOnceL, Return, Token, TokenSequence};
    use crate::error::GrammarError;
    use crate::position::SourcePosition;
    use crate::testing::{with_state, with_tokens};
    use pretty_assertions::assert_eq;

    fn word(text: &str) -> BoxedParser<char, String> {
        let text = text.to_string();
        BoxedParser::new(crate::combinators::Map::new(
            TokenSequence::new(text.chars().collect()),
            |chars: Vec<char>| chars.into_iter().collect(),
        ))
    }

    #[test]
    fn test_one_of_takes_first_success() {
        let parser = OneOf::new(vec![word("a"), word("b")]);

        with_state("b", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::success("b".to_string(), true)));
        });
    }

    #[test]
    fn test_one_of_committed_failure_wins() {
        let parser = OneOf::new(vec![word("ab"), word("ac")]);

        with_state("ac", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::failure(true)));
            assert_eq!(state.error.cause.unexpected, Some('c'));
            // only the first alternative ran
            assert_eq!(state.error.expected, vec![Expected::tokens(vec!['a', 'b'])]);
        });
    }

    #[test]
    fn test_one_of_reports_furthest_error() {
        let parser = OneOf::new(vec![
            word("x"),
            BoxedParser::new(Safe::new(word("abc"))),
            BoxedParser::new(Safe::new(word("ab!"))),
        ]);

        with_state("abz", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::failure(false)));
            assert_eq!(state.cursor(), 0);
            assert_eq!(state.error.position(), SourcePosition::new(1, 3));
            assert_eq!(state.error.cause.unexpected, Some('z'));
            assert_eq!(
                state.error.expected,
                vec![
                    Expected::tokens(vec!['x']),
                    Expected::tokens(vec!['a', 'b', 'c']),
                    Expected::tokens(vec!['a', 'b', '!']),
                ]
            );
        });
    }

    #[test]
    fn test_one_of_without_alternatives() {
        let parser: OneOf<char, char> = OneOf::new(Vec::new());

        with_state("a", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::failure(false)));
            assert_eq!(state.error.message, "OneOf had no arguments.");
        });
    }

    #[test]
    fn test_not() {
        let parser = Not::new(Token::new('a'));

        with_state("b", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::success((), false)));
        });
        with_state("xa", |state| {
            state.advance();
            assert_eq!(parser.parse(state), Ok(Outcome::failure(true)));
            assert_eq!(state.error.message, "Expected not a");
            assert_eq!(state.error.cause.unexpected, Some('a'));
            assert_eq!(state.error.position(), SourcePosition::new(1, 2));
            assert_eq!(
                state.error.expected,
                vec![Expected::label("Not...", vec![Expected::tokens(vec!['a'])])]
            );
        });
    }

    #[derive(Clone, Debug, PartialEq)]
    enum Tok {
        Ident,
        Comma,
    }

    #[test]
    fn test_not_over_tokens_without_display() {
        let parser = Not::with_message(Token::new(Tok::Comma), "trailing comma");

        with_tokens(&[Tok::Ident, Tok::Comma], |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::success((), false)));
            state.advance();
            assert_eq!(parser.parse(state), Ok(Outcome::failure(true)));
            assert_eq!(state.error.message, "trailing comma");
            assert_eq!(state.error.cause.unexpected, Some(Tok::Comma));
            assert_eq!(
                state.error.expected,
                vec![Expected::label("Not...", vec![Expected::tokens(vec![Tok::Comma])])]
            );
        });
    }

    #[test]
    fn test_clone_one_of_keeps_alternatives() {
        let parser = OneOf::new(vec![word("a"), word("b")]);
        let copy = parser.clone();

        assert_eq!(copy.expected(), parser.expected());
        with_state("b", |state| {
            assert_eq!(copy.parse(state), Ok(Outcome::success("b".to_string(), true)));
        });
    }

    #[test]
    fn test_assert() {
        let digit =
            crate::combinators::Candidate::with_label(|c: &char| c.is_ascii_digit(), "digit");
        let parser = Assert::new(digit, |c: &char| *c != '0', |c: &char| format!("{c} is zero"));

        with_state("5", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::success('5', true)));
        });
        with_state("0", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::failure(true)));
            assert_eq!(state.error.message, "0 is zero");
            assert_eq!(state.error.expected[0].to_string(), "\"Result satisfying assertion\"");
        });
    }

    #[test]
    fn test_with_expected_replaces_failure_expectations() {
        let parser = WithExpected::new(Token::new('a'), vec![Expected::label("letter a", vec![])]);

        with_state("b", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::failure(false)));
            assert_eq!(state.error.expected, vec![Expected::label("letter a", vec![])]);
            assert_eq!(state.error.cause.unexpected, Some('b'));
        });
    }

    #[test]
    fn test_lookahead_never_moves_on_success() {
        let parser = Lookahead::new(word("ab"));

        with_state("abc", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::success("ab".to_string(), false)));
            assert_eq!(state.cursor(), 0);
            assert_eq!(state.position(), SourcePosition::new(1, 1));
            assert_eq!(state.bookmark_depth(), 0);
        });
        with_state("ax", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::failure(true)));
            assert_eq!(state.bookmark_depth(), 0);
        });
    }

    #[test]
    fn test_safe_rewinds_only_on_failure() {
        let parser = Safe::new(word("ab"));

        with_state("ax", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::failure(false)));
            assert_eq!(state.cursor(), 0);
            assert_eq!(state.bookmark_depth(), 0);
        });
        with_state("ab", |state| {
            assert_eq!(parser.parse(state), Ok(Outcome::success("ab".to_string(), true)));
            assert_eq!(state.cursor(), 2);
        });
    }

    #[test]
    fn test_safe_releases_bookmark_on_fatal_error() {
        let looping = ChainAtLeastOnceL::new(Return::new('a'), Vec::new, |mut acc: Vec<char>, c| {
            acc.push(c);
            acc
        });
        let parser = Safe::new(looping);

        with_state("", |state| {
            assert!(matches!(parser.parse(state), Err(GrammarError::Reentry { .. })));
            assert_eq!(state.bookmark_depth(), 0);
        });
    }
}
