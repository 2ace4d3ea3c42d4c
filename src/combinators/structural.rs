//! Deterministic sequencing: map over one to four parsers, bind and homogeneous
//! sequences. None of these backtrack; a failure is forwarded as soon as it happens,
//! flagged as consuming if any earlier component consumed.

use crate::core::{forward_fail_with_expected, BoxedParser, Outcome, Parser, Reply};
use crate::error::GrammarError;
use crate::expected::{concat_expected, Expected};
use crate::state::ParseState;
use std::marker::PhantomData;

/// Runs one component of a sequence, folding its consumption into `consumed`.
///
/// Returns `None` when the component failed; the error is left in the state.
fn step<P, I, T>(
    parser: &P,
    state: &mut ParseState<'_, I>,
    consumed: &mut bool,
) -> Result<Option<T>, GrammarError>
where
    P: Parser<I, T> + ?Sized,
{
    let outcome = parser.parse(state)?;
    *consumed |= outcome.consumed();
    Ok(match outcome {
        Outcome::Success { value, .. } => Some(value),
        Outcome::Failure { .. } => None,
    })
}

/// Map: Transforms the output of a parser
///
/// Mapping a `Map` again composes the selectors inside the same node, so long
/// chains of `map` calls stay one level deep.
#[derive(Clone)]
pub struct Map<P, F, I, A, B> {
    parser: P,
    f: F,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<(A, B)>,
}

impl<P, F, I, A, B> Map<P, F, I, A, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> B,
    I: Clone,
{
    pub fn new(parser: P, f: F) -> Self {
        Self {
            expected: concat_expected([parser.expected()]),
            parser,
            f,
            _phantom: PhantomData,
        }
    }

    pub fn map<C, G>(self, g: G) -> Map<P, impl Fn(A) -> C, I, A, C>
    where
        G: Fn(B) -> C,
    {
        let f = self.f;
        Map {
            parser: self.parser,
            f: move |a| g(f(a)),
            expected: self.expected,
            _phantom: PhantomData,
        }
    }
}

impl<P, F, I, A, B> Parser<I, B> for Map<P, F, I, A, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> B,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<B> {
        let mut consumed = false;
        let Some(a) = step(&self.parser, state, &mut consumed)? else {
            return forward_fail_with_expected(state, &self.expected, consumed);
        };
        Ok(Outcome::success((self.f)(a), consumed))
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Map2: Runs two parsers in order and combines their outputs
#[derive(Clone)]
pub struct Map2<P1, P2, F, I, A, B, R> {
    first: P1,
    second: P2,
    f: F,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<(A, B, R)>,
}

impl<P1, P2, F, I, A, B, R> Map2<P1, P2, F, I, A, B, R>
where
    P1: Parser<I, A>,
    P2: Parser<I, B>,
    F: Fn(A, B) -> R,
    I: Clone,
{
    pub fn new(first: P1, second: P2, f: F) -> Self {
        Self {
            expected: concat_expected([first.expected(), second.expected()]),
            first,
            second,
            f,
            _phantom: PhantomData,
        }
    }

    pub fn map<C, G>(self, g: G) -> Map2<P1, P2, impl Fn(A, B) -> C, I, A, B, C>
    where
        G: Fn(R) -> C,
    {
        let f = self.f;
        Map2 {
            first: self.first,
            second: self.second,
            f: move |a, b| g(f(a, b)),
            expected: self.expected,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, F, I, A, B, R> Parser<I, R> for Map2<P1, P2, F, I, A, B, R>
where
    P1: Parser<I, A>,
    P2: Parser<I, B>,
    F: Fn(A, B) -> R,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<R> {
        let mut consumed = false;
        let Some(a) = step(&self.first, state, &mut consumed)? else {
            return forward_fail_with_expected(state, &self.expected, consumed);
        };
        let Some(b) = step(&self.second, state, &mut consumed)? else {
            return forward_fail_with_expected(state, &self.expected, consumed);
        };
        Ok(Outcome::success((self.f)(a, b), consumed))
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Map3: Runs three parsers in order and combines their outputs
#[derive(Clone)]
pub struct Map3<P1, P2, P3, F, I, A, B, C, R> {
    first: P1,
    second: P2,
    third: P3,
    f: F,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<(A, B, C, R)>,
}

impl<P1, P2, P3, F, I, A, B, C, R> Map3<P1, P2, P3, F, I, A, B, C, R>
where
    P1: Parser<I, A>,
    P2: Parser<I, B>,
    P3: Parser<I, C>,
    F: Fn(A, B, C) -> R,
    I: Clone,
{
    pub fn new(first: P1, second: P2, third: P3, f: F) -> Self {
        Self {
            expected: concat_expected([first.expected(), second.expected(), third.expected()]),
            first,
            second,
            third,
            f,
            _phantom: PhantomData,
        }
    }

    pub fn map<S, G>(self, g: G) -> Map3<P1, P2, P3, impl Fn(A, B, C) -> S, I, A, B, C, S>
    where
        G: Fn(R) -> S,
    {
        let f = self.f;
        Map3 {
            first: self.first,
            second: self.second,
            third: self.third,
            f: move |a, b, c| g(f(a, b, c)),
            expected: self.expected,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, P3, F, I, A, B, C, R> Parser<I, R> for Map3<P1, P2, P3, F, I, A, B, C, R>
where
    P1: Parser<I, A>,
    P2: Parser<I, B>,
    P3: Parser<I, C>,
    F: Fn(A, B, C) -> R,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<R> {
        let mut consumed = false;
        let Some(a) = step(&self.first, state, &mut consumed)? else {
            return forward_fail_with_expected(state, &self.expected, consumed);
        };
        let Some(b) = step(&self.second, state, &mut consumed)? else {
            return forward_fail_with_expected(state, &self.expected, consumed);
        };
        let Some(c) = step(&self.third, state, &mut consumed)? else {
            return forward_fail_with_expected(state, &self.expected, consumed);
        };
        Ok(Outcome::success((self.f)(a, b, c), consumed))
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Map4: Runs four parsers in order and combines their outputs
#[derive(Clone)]
pub struct Map4<P1, P2, P3, P4, F, I, A, B, C, D, R> {
    first: P1,
    second: P2,
    third: P3,
    fourth: P4,
    f: F,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<(A, B, C, D, R)>,
}

impl<P1, P2, P3, P4, F, I, A, B, C, D, R> Map4<P1, P2, P3, P4, F, I, A, B, C, D, R>
where
    P1: Parser<I, A>,
    P2: Parser<I, B>,
    P3: Parser<I, C>,
    P4: Parser<I, D>,
    F: Fn(A, B, C, D) -> R,
    I: Clone,
{
    pub fn new(first: P1, second: P2, third: P3, fourth: P4, f: F) -> Self {
        Self {
            expected: concat_expected([
                first.expected(),
                second.expected(),
                third.expected(),
                fourth.expected(),
            ]),
            first,
            second,
            third,
            fourth,
            f,
            _phantom: PhantomData,
        }
    }

    pub fn map<S, G>(
        self,
        g: G,
    ) -> Map4<P1, P2, P3, P4, impl Fn(A, B, C, D) -> S, I, A, B, C, D, S>
    where
        G: Fn(R) -> S,
    {
        let f = self.f;
        Map4 {
            first: self.first,
            second: self.second,
            third: self.third,
            fourth: self.fourth,
            f: move |a, b, c, d| g(f(a, b, c, d)),
            expected: self.expected,
            _phantom: PhantomData,
        }
    }
}

impl<P1, P2, P3, P4, F, I, A, B, C, D, R> Parser<I, R> for Map4<P1, P2, P3, P4, F, I, A, B, C, D, R>
where
    P1: Parser<I, A>,
    P2: Parser<I, B>,
    P3: Parser<I, C>,
    P4: Parser<I, D>,
    F: Fn(A, B, C, D) -> R,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<R> {
        let mut consumed = false;
        let Some(a) = step(&self.first, state, &mut consumed)? else {
            return forward_fail_with_expected(state, &self.expected, consumed);
        };
        let Some(b) = step(&self.second, state, &mut consumed)? else {
            return forward_fail_with_expected(state, &self.expected, consumed);
        };
        let Some(c) = step(&self.third, state, &mut consumed)? else {
            return forward_fail_with_expected(state, &self.expected, consumed);
        };
        let Some(d) = step(&self.fourth, state, &mut consumed)? else {
            return forward_fail_with_expected(state, &self.expected, consumed);
        };
        Ok(Outcome::success((self.f)(a, b, c, d), consumed))
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// Bind: Chooses the next parser from the value of the first
///
/// The binder sees the first value by reference; the combinator then receives
/// both values.
#[derive(Clone)]
pub struct Bind<P, B, F, I, A, N> {
    parser: P,
    binder: B,
    combinator: F,
    expected: Vec<Expected<I>>,
    _phantom: PhantomData<(A, N)>,
}

impl<P, B, F, I, A, N> Bind<P, B, F, I, A, N>
where
    P: Parser<I, A>,
    I: Clone,
{
    pub fn new<Q, R>(parser: P, binder: B, combinator: F) -> Self
    where
        B: Fn(&A) -> Q,
        Q: Parser<I, N>,
        F: Fn(A, N) -> R,
    {
        Self {
            expected: parser.expected().to_vec(),
            parser,
            binder,
            combinator,
            _phantom: PhantomData,
        }
    }
}

impl<P, B, Q, F, I, A, N, R> Parser<I, R> for Bind<P, B, F, I, A, N>
where
    P: Parser<I, A>,
    B: Fn(&A) -> Q,
    Q: Parser<I, N>,
    F: Fn(A, N) -> R,
    I: Clone,
{
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<R> {
        let mut consumed = false;
        let Some(a) = step(&self.parser, state, &mut consumed)? else {
            return Ok(Outcome::failure(consumed));
        };
        let next = (self.binder)(&a);
        let Some(n) = step(&next, state, &mut consumed)? else {
            return Ok(Outcome::failure(consumed));
        };
        Ok(Outcome::success((self.combinator)(a, n), consumed))
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}

/// ParserSequence: Runs same-typed parsers in order, collecting every output
pub struct ParserSequence<I, O> {
    parsers: Vec<BoxedParser<I, O>>,
    expected: Vec<Expected<I>>,
}

impl<I: Clone, O> ParserSequence<I, O> {
    pub fn new(parsers: Vec<BoxedParser<I, O>>) -> Self {
        Self {
            expected: concat_expected(parsers.iter().map(|p| p.expected())),
            parsers,
        }
    }
}

impl<I: Clone, O> Clone for ParserSequence<I, O> {
    fn clone(&self) -> Self {
        Self {
            parsers: self.parsers.clone(),
            expected: self.expected.clone(),
        }
    }
}

impl<I: Clone, O> Parser<I, Vec<O>> for ParserSequence<I, O> {
    fn parse(&self, state: &mut ParseState<'_, I>) -> Reply<Vec<O>> {
        let mut consumed = false;
        let mut values = Vec::with_capacity(self.parsers.len());

        for parser in &self.parsers {
            match step(parser, state, &mut consumed)? {
                Some(value) => values.push(value),
                None => return forward_fail_with_expected(state, &self.expected, consumed),
            }
        }

        Ok(Outcome::success(values, consumed))
    }

    fn expected(&self) -> &[Expected<I>] {
        &self.expected
    }
}
