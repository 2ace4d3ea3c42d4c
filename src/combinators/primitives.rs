//! Leaf parsers: the only parsers that look at tokens directly.

use crate::core::{fail, fail_eof, fail_token, Outcome, Parser, Reply};
use crate::expected::Expected;
use crate::position::SourcePosition;
use crate::state::ParseState;
use once_cell::unsync::OnceCell;
use std::marker::PhantomData;

/// Token: Matches one specific token
///
/// Succeeds if the current token equals the expected one, consuming it.
#[derive(Clone)]
pub struct Token<I> {
    token: I,
    expected: Vec<Expected<I>>,
}

impl<I: Clone> Token<I> {
    pub fn new(token: I) -> Self {
        Self {
            expected: vec![Expected::tokens(vec![token.clone()])],
            token,
        }
    }
}

impl<I: Clone + PartialEq> Parser<I, I> for Token<I> {
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<I> {
        match state.peek().cloned() {
            None => fail_eof(state, &self.expected, false),
            Some(found) if found != self.token => fail_token(state, &self.expected, found, false),
            Some(found) => {
                state.advance();
                Ok(Outcome::success(found, true))
            }
        }
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// TokenSequence: Matches a run of tokens in order
///
/// A partial match is reported as consuming; nothing is rewound. Wrap the parser
/// in [`Safe`](super::Safe) to make it atomic.
#[derive(Clone)]
pub struct TokenSequence<I> {
    tokens: Vec<I>,
    expected: Vec<Expected<I>>,
}

impl<I: Clone> TokenSequence<I> {
    pub fn new(tokens: Vec<I>) -> Self {
        Self {
            expected: vec![Expected::tokens(tokens.clone())],
            tokens,
        }
    }
}

impl<I: Clone + PartialEq> Parser<I, Vec<I>> for TokenSequence<I> {
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<Vec<I>> {
        let mut consumed = false;

        for token in &self.tokens {
            match state.peek().cloned() {
                None => return fail_eof(state, &self.expected, consumed),
                Some(found) if found != *token => {
                    return fail_token(state, &self.expected, found, consumed)
                }
                Some(_) => {
                    consumed = true;
                    state.advance();
                }
            }
        }

        Ok(Outcome::success(self.tokens.clone(), consumed))
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Candidate: Matches any token accepted by a predicate
///
/// This is the building block for character classes: a labelled candidate is all
/// a digit or whitespace parser needs.
#[derive(Clone)]
pub struct Candidate<I, F> {
    predicate: F,
    expected: Vec<Expected<I>>,
}

impl<I, F> Candidate<I, F>
where
    F: Fn(&I) -> bool,
{
    pub fn new(predicate: F) -> Self {
        Self::with_label(predicate, "candidate")
    }

    pub fn with_label(predicate: F, label: impl Into<String>) -> Self {
        Self {
            predicate,
            expected: vec![Expected::label(label, Vec::new())],
        }
    }
}

impl<I, F> Parser<I, I> for Candidate<I, F>
where
    I: Clone,
    F: Fn(&I) -> bool,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<I> {
        match state.peek().cloned() {
            None => fail_eof(state, &self.expected, false),
            Some(found) if !(self.predicate)(&found) => {
                fail_token(state, &self.expected, found, false)
            }
            Some(found) => {
                state.advance();
                Ok(Outcome::success(found, true))
            }
        }
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// End: Succeeds only once the input is exhausted. Never consumes.
#[derive(Clone)]
pub struct End<I> {
    expected: Vec<Expected<I>>,
}

impl<I> End<I> {
    pub fn new() -> Self {
        Self {
            expected: vec![Expected::Eof],
        }
    }
}

impl<I> Default for End<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone> Parser<I, ()> for End<I> {
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<()> {
        match state.peek().cloned() {
            Some(found) => fail(
                state,
                &self.expected,
                Some(found),
                "Expected the state to have ended but found more content.",
                false,
                false,
            ),
            None => Ok(Outcome::success((), false)),
        }
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Fail: Always fails with a fixed message, without looking at the input.
#[derive(Clone)]
pub struct Fail<I, O> {
    message: String,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<O>,
}

impl<I, O> Fail<I, O> {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            expected: vec![Expected::NoInput],
            _phantom: PhantomData,
        }
    }
}

impl<I: Clone, O> Parser<I, O> for Fail<I, O> {
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        fail(state, &self.expected, None, self.message.as_str(), false, false)
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Return: Always succeeds with a fixed value, without looking at the input.
#[derive(Clone)]
pub struct Return<I, O> {
    value: O,
    expected: Vec<Expected<I>>,
}

impl<I, O> Return<I, O> {
    pub fn new(value: O) -> Self {
        Self {
            value,
            expected: vec![Expected::NoInput],
        }
    }
}

impl<I, O: Clone> Parser<I, O> for Return<I, O> {
    fn parse(&self, _state: &mut ParseState<'_, I>) -> Reply<O> {
        Ok(Outcome::success(self.value.clone(), false))
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// CurrentPosition: Succeeds with the current source position. Never consumes.
#[derive(Clone)]
pub struct CurrentPosition<I> {
    expected: Vec<Expected<I>>,
}

impl<I> CurrentPosition<I> {
    pub fn new() -> Self {
        Self {
            expected: vec![Expected::NoInput],
        }
    }
}

impl<I> Default for CurrentPosition<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: Clone> Parser<I, SourcePosition> for CurrentPosition<I> {
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<SourcePosition> {
        Ok(Outcome::success(state.position(), false))
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Recursive: A parser resolved on first use
///
/// Grammars that refer to themselves cannot build the referenced parser up front.
/// The provider runs the first time this node parses and its result is kept for
/// every later call, across parse calls.
pub struct Recursive<F, P, I, O> {
    provider: F,
    resolved: OnceCell<P>,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<O>,
}

/// A clone made after resolution keeps the resolved parser.
impl<F: Clone, P: Clone, I: Clone, O> Clone for Recursive<F, P, I, O> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            resolved: self.resolved.clone(),
            expected: self.expected.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<F, P, I, O> Recursive<F, P, I, O>
where
    F: Fn() -> P,
    P: Parser<I, O>,
{
    pub fn new(provider: F) -> Self {
        Self {
            provider,
            resolved: OnceCell::new(),
            expected: vec![Expected::label("Recursive", Vec::new())],
            _phantom: PhantomData,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    fn target(&self) -> &P {
        self.resolved.get_or_init(|| {
            tracing::trace!(target: "parser::recursive", "resolving recursive parser");
            (self.provider)()
        })
    }
}

impl<F, P, I, O> Parser<I, O> for Recursive<F, P, I, O>
where
    F: Fn() -> P,
    P: Parser<I, O>,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        self.target().parse(state)
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}
