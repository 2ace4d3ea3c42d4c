//! Repetition and separated lists.
//!
//! Every loop here requires its child to consume input on each iteration after the
//! first. A child that succeeds without consuming would repeat forever, so the loop
//! aborts the whole parse with [`GrammarError::Reentry`] instead.

use crate::core::{forward_fail_with_expected, Outcome, Parser, Reply};
use crate::error::GrammarError;
use crate::expected::{concat_expected, Expected};
use crate::state::ParseState;
use std::marker::PhantomData;

/// Builds the reentry fault for `$parser` and logs it under the loop's own target.
macro_rules! reentry {
    ($target:literal, $parser:ty, $combinator:literal, $position:expr $(,)?) => {{
        let error = GrammarError::reentry::<$parser>($combinator);
        tracing::error!(target: $target, position = %$position, "{}", error);
        error
    }};
}

/// ChainAtLeastOnceL: Left fold over one or more repetitions
///
/// Repeats the parser until it fails, folding each value into an accumulator
/// started from `seed()`. A final attempt that fails without consuming ends the
/// loop; one that fails after consuming fails the whole chain.
#[derive(Clone)]
pub struct ChainAtLeastOnceL<P, S, F, I, O, A> {
    parser: P,
    seed: S,
    combine: F,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<(O, A)>,
}

impl<P, S, F, I, O, A> ChainAtLeastOnceL<P, S, F, I, O, A>
where
    P: Parser<I, O>,
    S: Fn() -> A,
    F: Fn(A, O) -> A,
    I: Clone,
{
    pub fn new(parser: P, seed: S, combine: F) -> Self {
        Self {
            expected: parser.expected().to_vec(),
            parser,
            seed,
            combine,
            _phantom: PhantomData,
        }
    }
}

impl<P, S, F, I, O, A> Parser<I, A> for ChainAtLeastOnceL<P, S, F, I, O, A>
where
    P: Parser<I, O>,
    S: Fn() -> A,
    F: Fn(A, O) -> A,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<A> {
        let (first, mut consumed) = match self.parser.parse(state)? {
            Outcome::Success { value, consumed } => (value, consumed),
            Outcome::Failure { consumed } => return Ok(Outcome::failure(consumed)),
        };
        let mut accumulated = (self.combine)((self.seed)(), first);
        let mut iterations = 1usize;

        loop {
            match self.parser.parse(state)? {
                Outcome::Success { consumed: false, .. } => {
                    return Err(reentry!("parser::chain", P, "ChainAtLeastOnceL", state.position()));
                }
                Outcome::Success { value, .. } => {
                    consumed = true;
                    iterations += 1;
                    accumulated = (self.combine)(accumulated, value);
                }
                Outcome::Failure { consumed: true } => return Ok(Outcome::failure(true)),
                Outcome::Failure { consumed: false } => {
                    tracing::trace!(target: "parser::chain", iterations, "chain ended");
                    return Ok(Outcome::success(accumulated, consumed));
                }
            }
        }
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// SeparatedAtLeastOnce: One or more values with a separator between each
///
/// After the first value the list continues with separator-then-value pairs. A
/// pair that fails without consuming ends the list; a separator that is consumed
/// but not followed by a value fails the whole list.
#[derive(Clone)]
pub struct SeparatedAtLeastOnce<P, S, I, O, X> {
    value: P,
    separator: S,
    expected: Vec<Expected<I>>,
    remainder_expected: Vec<Expected<I>>,
    _phantom: PhantomData<(O, X)>,
}

impl<P, S, I, O, X> SeparatedAtLeastOnce<P, S, I, O, X>
where
    P: Parser<I, O>,
    S: Parser<I, X>,
    I: Clone,
{
    pub fn new(value: P, separator: S) -> Self {
        Self {
            expected: value.expected().to_vec(),
            remainder_expected: concat_expected([separator.expected(), value.expected()]),
            value,
            separator,
            _phantom: PhantomData,
        }
    }

    /// A separator followed by a value, keeping the value.
    fn remainder(&self, state: &mut ParseState<'_, I>) -> Reply<O> {
        let consumed = match self.separator.parse(state)? {
            Outcome::Success { consumed, .. } => consumed,
            Outcome::Failure { consumed } => {
                return forward_fail_with_expected(state, &self.remainder_expected, consumed)
            }
        };

        match self.value.parse(state)? {
            Outcome::Success { value, consumed: c } => Ok(Outcome::success(value, consumed || c)),
            Outcome::Failure { consumed: c } => {
                forward_fail_with_expected(state, &self.remainder_expected, consumed || c)
            }
        }
    }
}

impl<P, S, I, O, X> Parser<I, Vec<O>> for SeparatedAtLeastOnce<P, S, I, O, X>
where
    P: Parser<I, O>,
    S: Parser<I, X>,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<Vec<O>> {
        let (first, mut consumed) = match self.value.parse(state)? {
            Outcome::Success { value, consumed } => (value, consumed),
            Outcome::Failure { consumed } => return Ok(Outcome::failure(consumed)),
        };
        let mut values = vec![first];

        loop {
            match self.remainder(state)? {
                Outcome::Success { consumed: false, .. } => {
                    return Err(reentry!(
                        "parser::separated",
                        P,
                        "SeparatedAtLeastOnce",
                        state.position()
                    ));
                }
                Outcome::Success { value, .. } => {
                    consumed = true;
                    values.push(value);
                }
                Outcome::Failure { consumed: true } => return Ok(Outcome::failure(true)),
                Outcome::Failure { consumed: false } => {
                    tracing::trace!(
                        target: "parser::separated",
                        count = values.len(),
                        "list ended"
                    );
                    return Ok(Outcome::success(values, consumed));
                }
            }
        }
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// SeparatedAndOptionallyTerminatedAtLeastOnce: Like [`SeparatedAtLeastOnce`], but
/// a trailing separator may dangle
///
/// A separator not followed by a value ends the list successfully as long as the
/// failed value attempt did not consume.
#[derive(Clone)]
pub struct SeparatedAndOptionallyTerminatedAtLeastOnce<P, S, I, O, X> {
    value: P,
    separator: S,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<(O, X)>,
}

impl<P, S, I, O, X> SeparatedAndOptionallyTerminatedAtLeastOnce<P, S, I, O, X>
where
    P: Parser<I, O>,
    S: Parser<I, X>,
    I: Clone,
{
    pub fn new(value: P, separator: S) -> Self {
        Self {
            expected: value.expected().to_vec(),
            value,
            separator,
            _phantom: PhantomData,
        }
    }
}

impl<P, S, I, O, X> Parser<I, Vec<O>>
    for SeparatedAndOptionallyTerminatedAtLeastOnce<P, S, I, O, X>
where
    P: Parser<I, O>,
    S: Parser<I, X>,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<Vec<O>> {
        let (first, mut consumed) = match self.value.parse(state)? {
            Outcome::Success { value, consumed } => (value, consumed),
            Outcome::Failure { consumed } => return Ok(Outcome::failure(consumed)),
        };
        let mut values = vec![first];

        loop {
            let separator_consumed = match self.separator.parse(state)? {
                Outcome::Success { consumed, .. } => consumed,
                Outcome::Failure { consumed: true } => return Ok(Outcome::failure(true)),
                Outcome::Failure { consumed: false } => {
                    return Ok(Outcome::success(values, consumed))
                }
            };
            consumed |= separator_consumed;

            match self.value.parse(state)? {
                Outcome::Success { consumed: false, .. } if !separator_consumed => {
                    return Err(reentry!(
                        "parser::separated",
                        P,
                        "SeparatedAndOptionallyTerminatedAtLeastOnce",
                        state.position(),
                    ));
                }
                Outcome::Success { value, consumed: c } => {
                    consumed |= c;
                    values.push(value);
                }
                Outcome::Failure { consumed: true } => return Ok(Outcome::failure(true)),
                Outcome::Failure { consumed: false } => {
                    tracing::trace!(
                        target: "parser::separated",
                        count = values.len(),
                        "list ended with a trailing separator"
                    );
                    return Ok(Outcome::success(values, consumed));
                }
            }
        }
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}
