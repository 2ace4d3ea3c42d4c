//! Grammar-author surface: one constructor function per parser node, the operators
//! derived from them, and the [`ParserExt`] fluent trait.
//!
//! ```
//! use parsimony::prelude::*;
//! use parsimony::parse_str;
//!
//! let digits = at_least_once(candidate_labelled(|c: &char| c.is_ascii_digit(), "digit"));
//! let list = between(token('['), separated(digits, token(',')), token(']'));
//!
//! let result = parse_str("[12,3]").run(&list).unwrap();
//! assert_eq!(result.value().len(), 2);
//! ```

use crate::combinators::*;
use crate::error::GrammarError;
use crate::expected::Expected;
use crate::position::SourcePosition;
use std::fmt;
use std::rc::Rc;

pub use crate::core::{BoxedParser, Outcome, Parser, Reply};

/// One or more repetitions collected into a `Vec`.
pub type AtLeastOnce<P, I, O> =
    ChainAtLeastOnceL<P, fn() -> Vec<O>, fn(Vec<O>, O) -> Vec<O>, I, O, Vec<O>>;
/// One or more repetitions whose values are dropped.
pub type SkipAtLeastOnce<P, I, O> = ChainAtLeastOnceL<P, fn(), fn((), O), I, O, ()>;
/// Two parsers in order, keeping the first value.
pub type Before<P, D, I, O, X> = Map2<P, D, fn(O, X) -> O, I, O, X, O>;
/// Two parsers in order, keeping the second value.
pub type Then<P, Q, I, A, B> = Map2<P, Q, fn(A, B) -> B, I, A, B, B>;
/// Three parsers in order, keeping the middle value.
pub type Between<L, P, R, I, X, O, Y> = Map3<L, P, R, fn(X, O, Y) -> O, I, X, O, Y, O>;
/// A value paired with the position where its parse started.
pub type WithPosition<P, I, O> = Map2<
    CurrentPosition<I>,
    P,
    fn(SourcePosition, O) -> (SourcePosition, O),
    I,
    SourcePosition,
    O,
    (SourcePosition, O),
>;
/// A parser producing an empty `Vec` without consuming.
pub type Empty<I, O> = Map<Return<I, ()>, fn(()) -> Vec<O>, I, (), Vec<O>>;

fn push_value<O>(mut values: Vec<O>, value: O) -> Vec<O> {
    values.push(value);
    values
}

fn discard<O>(_: (), _: O) {}

fn nothing() {}

fn keep_first<A, B>(a: A, _: B) -> A {
    a
}

fn keep_second<A, B>(_: A, b: B) -> B {
    b
}

fn keep_middle<X, O, Y>(_: X, value: O, _: Y) -> O {
    value
}

// Primitives

pub fn token<I: Clone>(token: I) -> Token<I> {
    Token::new(token)
}

pub fn token_sequence<I: Clone>(tokens: Vec<I>) -> TokenSequence<I> {
    TokenSequence::new(tokens)
}

pub fn candidate<I, F>(predicate: F) -> Candidate<I, F>
where
    F: Fn(&I) -> bool,
{
    Candidate::new(predicate)
}

pub fn candidate_labelled<I, F>(predicate: F, label: &str) -> Candidate<I, F>
where
    F: Fn(&I) -> bool,
{
    Candidate::with_label(predicate, label)
}

/// Any single token.
pub fn any<I>() -> Candidate<I, fn(&I) -> bool> {
    Candidate::with_label((|_: &I| true) as fn(&I) -> bool, "any token")
}

pub fn end<I>() -> End<I> {
    End::new()
}

pub fn fail<I, O>(message: &str) -> Fail<I, O> {
    Fail::new(message)
}

pub fn value<I, O: Clone>(value: O) -> Return<I, O> {
    Return::new(value)
}

pub fn unit<I>() -> Return<I, ()> {
    Return::new(())
}

pub fn empty<I: Clone, O>() -> Empty<I, O> {
    Map::new(unit(), (|()| Vec::new()) as fn(()) -> Vec<O>)
}

pub fn current_position<I>() -> CurrentPosition<I> {
    CurrentPosition::new()
}

/// A parser built on first use, for grammars that refer to themselves.
///
/// ```
/// use parsimony::prelude::*;
/// use parsimony::parse_str;
///
/// // nested := '(' nested? ')'
/// fn nested() -> BoxedParser<char, usize> {
///     between(
///         token('('),
///         optional(recursive(nested)).map(|depth| depth.map_or(1, |d| d + 1)),
///         token(')'),
///     )
///     .boxed()
/// }
///
/// assert_eq!(*parse_str("((()))").run(&nested()).unwrap().value(), 3);
/// ```
pub fn recursive<F, P, I, O>(provider: F) -> Recursive<F, P, I, O>
where
    F: Fn() -> P,
    P: Parser<I, O>,
{
    Recursive::new(provider)
}

// Structural

/// Wraps `parser` in a new [`Map`] node, even when `parser` is itself a `Map`.
///
/// Calling `.map` on a `Map` (or `Map2`..`Map4`) composes the functions in place
/// instead, so `map(p, f).map(g)` is a single node while `map(map(p, f), g)` is two.
pub fn map<P, F, I, A, B>(parser: P, f: F) -> Map<P, F, I, A, B>
where
    P: Parser<I, A>,
    F: Fn(A) -> B,
    I: Clone,
{
    Map::new(parser, f)
}

pub fn map2<P1, P2, F, I, A, B, R>(first: P1, second: P2, f: F) -> Map2<P1, P2, F, I, A, B, R>
where
    P1: Parser<I, A>,
    P2: Parser<I, B>,
    F: Fn(A, B) -> R,
    I: Clone,
{
    Map2::new(first, second, f)
}

pub fn map3<P1, P2, P3, F, I, A, B, C, R>(
    first: P1,
    second: P2,
    third: P3,
    f: F,
) -> Map3<P1, P2, P3, F, I, A, B, C, R>
where
    P1: Parser<I, A>,
    P2: Parser<I, B>,
    P3: Parser<I, C>,
    F: Fn(A, B, C) -> R,
    I: Clone,
{
    Map3::new(first, second, third, f)
}

pub fn map4<P1, P2, P3, P4, F, I, A, B, C, D, R>(
    first: P1,
    second: P2,
    third: P3,
    fourth: P4,
    f: F,
) -> Map4<P1, P2, P3, P4, F, I, A, B, C, D, R>
where
    P1: Parser<I, A>,
    P2: Parser<I, B>,
    P3: Parser<I, C>,
    P4: Parser<I, D>,
    F: Fn(A, B, C, D) -> R,
    I: Clone,
{
    Map4::new(first, second, third, fourth, f)
}

pub fn bind<P, B, Q, F, I, A, N, R>(parser: P, binder: B, combinator: F) -> Bind<P, B, F, I, A, N>
where
    P: Parser<I, A>,
    B: Fn(&A) -> Q,
    Q: Parser<I, N>,
    F: Fn(A, N) -> R,
    I: Clone,
{
    Bind::new(parser, binder, combinator)
}

pub fn sequence<I: Clone, O>(parsers: Vec<BoxedParser<I, O>>) -> ParserSequence<I, O> {
    ParserSequence::new(parsers)
}

pub fn then<P, Q, I, A, B>(parser: P, next: Q) -> Then<P, Q, I, A, B>
where
    P: Parser<I, A>,
    Q: Parser<I, B>,
    I: Clone,
{
    Map2::new(parser, next, keep_second as fn(A, B) -> B)
}

pub fn then_with<P, Q, F, I, A, B, R>(parser: P, next: Q, selector: F) -> Map2<P, Q, F, I, A, B, R>
where
    P: Parser<I, A>,
    Q: Parser<I, B>,
    F: Fn(A, B) -> R,
    I: Clone,
{
    Map2::new(parser, next, selector)
}

pub fn before<P, D, I, O, X>(parser: P, delimiter: D) -> Before<P, D, I, O, X>
where
    P: Parser<I, O>,
    D: Parser<I, X>,
    I: Clone,
{
    Map2::new(parser, delimiter, keep_first as fn(O, X) -> O)
}

pub fn between<L, P, R, I, X, O, Y>(left: L, parser: P, right: R) -> Between<L, P, R, I, X, O, Y>
where
    L: Parser<I, X>,
    P: Parser<I, O>,
    R: Parser<I, Y>,
    I: Clone,
{
    Map3::new(left, parser, right, keep_middle as fn(X, O, Y) -> O)
}

pub fn between_same<D, P, I, X, O>(delimiter: D, parser: P) -> Between<D, P, D, I, X, O, X>
where
    D: Parser<I, X> + Clone,
    P: Parser<I, O>,
    I: Clone,
{
    Map3::new(delimiter.clone(), parser, delimiter, keep_middle as fn(X, O, X) -> O)
}

// Branching

pub fn one_of<I: Clone, O>(parsers: Vec<BoxedParser<I, O>>) -> OneOf<I, O> {
    OneOf::new(parsers)
}

pub fn or<P, Q, I, O>(parser: P, alternative: Q) -> OneOf<I, O>
where
    P: Parser<I, O> + 'static,
    Q: Parser<I, O> + 'static,
    I: Clone,
{
    OneOf::new(vec![BoxedParser::new(parser), BoxedParser::new(alternative)])
}

pub fn optional<P, I, O>(parser: P) -> OneOf<I, Option<O>>
where
    P: Parser<I, O> + 'static,
    I: Clone + 'static,
    O: 'static,
{
    or(Map::new(parser, Some), Map::new(unit(), |()| None))
}

pub fn not<P, I, O>(parser: P) -> Not<P, I, O>
where
    P: Parser<I, O>,
    I: Clone + fmt::Display,
{
    Not::new(parser)
}

/// Like [`not`], reporting `message` instead of the rendered expectations. Works
/// over tokens that cannot be displayed.
pub fn not_with<P, I, O>(parser: P, message: impl Into<String>) -> Not<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    Not::with_message(parser, message)
}

/// Fails with "Assertion failed" unless the value satisfies `predicate`.
pub fn assert<P, F, I, O>(parser: P, predicate: F) -> Assert<P, F, impl Fn(&O) -> String, I, O>
where
    P: Parser<I, O>,
    F: Fn(&O) -> bool,
    I: Clone,
{
    assert_or(parser, predicate, "Assertion failed")
}

pub fn assert_or<P, F, I, O>(
    parser: P,
    predicate: F,
    message: &str,
) -> Assert<P, F, impl Fn(&O) -> String, I, O>
where
    P: Parser<I, O>,
    F: Fn(&O) -> bool,
    I: Clone,
{
    let message = message.to_string();
    Assert::new(parser, predicate, move |_: &O| message.clone())
}

pub fn assert_with<P, F, M, I, O>(parser: P, predicate: F, message: M) -> Assert<P, F, M, I, O>
where
    P: Parser<I, O>,
    F: Fn(&O) -> bool,
    M: Fn(&O) -> String,
    I: Clone,
{
    Assert::new(parser, predicate, message)
}

pub fn with_expected<P, I, O>(parser: P, expected: Vec<Expected<I>>) -> WithExpected<P, I, O>
where
    P: Parser<I, O>,
{
    WithExpected::new(parser, expected)
}

/// Names a parser in error reports, keeping its own expectations as the cause.
pub fn labelled<P, I, O>(label: &str, parser: P) -> WithExpected<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    let expected = vec![Expected::label(label, parser.expected().to_vec())];
    WithExpected::new(parser, expected)
}

pub fn try_labelled<P, I, O>(label: &str, parser: P) -> Result<WithExpected<P, I, O>, GrammarError>
where
    P: Parser<I, O>,
    I: Clone,
{
    if label.is_empty() {
        return Err(GrammarError::MissingArgument { argument: "label" });
    }
    Ok(labelled(label, parser))
}

pub fn lookahead<P, I, O>(parser: P) -> Lookahead<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    Lookahead::new(parser)
}

pub fn safe<P, I, O>(parser: P) -> Safe<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    Safe::new(parser)
}

// Repetition

pub fn chain_at_least_once_l<P, S, F, I, O, A>(
    parser: P,
    seed: S,
    combine: F,
) -> ChainAtLeastOnceL<P, S, F, I, O, A>
where
    P: Parser<I, O>,
    S: Fn() -> A,
    F: Fn(A, O) -> A,
    I: Clone,
{
    ChainAtLeastOnceL::new(parser, seed, combine)
}

/// Zero or more repetitions folded from `seed()`.
pub fn chain_l<P, S, F, I, O, A>(parser: P, seed: S, combine: F) -> OneOf<I, A>
where
    P: Parser<I, O> + 'static,
    S: Fn() -> A + 'static,
    F: Fn(A, O) -> A + 'static,
    I: Clone + 'static,
    O: 'static,
    A: 'static,
{
    let seed = Rc::new(seed);
    let fallback = Rc::clone(&seed);
    or(
        ChainAtLeastOnceL::new(parser, move || seed(), combine),
        Map::new(unit(), move |()| fallback()),
    )
}

pub fn at_least_once<P, I, O>(parser: P) -> AtLeastOnce<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    ChainAtLeastOnceL::new(
        parser,
        Vec::new as fn() -> Vec<O>,
        push_value as fn(Vec<O>, O) -> Vec<O>,
    )
}

pub fn many<P, I, O>(parser: P) -> OneOf<I, Vec<O>>
where
    P: Parser<I, O> + 'static,
    I: Clone + 'static,
    O: 'static,
{
    or(at_least_once(parser), empty())
}

pub fn skip_at_least_once<P, I, O>(parser: P) -> SkipAtLeastOnce<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    ChainAtLeastOnceL::new(parser, nothing as fn(), discard as fn((), O))
}

pub fn skip_many<P, I, O>(parser: P) -> OneOf<I, ()>
where
    P: Parser<I, O> + 'static,
    I: Clone + 'static,
    O: 'static,
{
    or(skip_at_least_once(parser), unit())
}

pub fn separated_at_least_once<P, S, I, O, X>(
    value: P,
    separator: S,
) -> SeparatedAtLeastOnce<P, S, I, O, X>
where
    P: Parser<I, O>,
    S: Parser<I, X>,
    I: Clone,
{
    SeparatedAtLeastOnce::new(value, separator)
}

pub fn separated<P, S, I, O, X>(value: P, separator: S) -> OneOf<I, Vec<O>>
where
    P: Parser<I, O> + 'static,
    S: Parser<I, X> + 'static,
    I: Clone + 'static,
    O: 'static,
    X: 'static,
{
    or(SeparatedAtLeastOnce::new(value, separator), empty())
}

pub fn separated_and_optionally_terminated_at_least_once<P, S, I, O, X>(
    value: P,
    separator: S,
) -> SeparatedAndOptionallyTerminatedAtLeastOnce<P, S, I, O, X>
where
    P: Parser<I, O>,
    S: Parser<I, X>,
    I: Clone,
{
    SeparatedAndOptionallyTerminatedAtLeastOnce::new(value, separator)
}

pub fn separated_and_optionally_terminated<P, S, I, O, X>(
    value: P,
    separator: S,
) -> OneOf<I, Vec<O>>
where
    P: Parser<I, O> + 'static,
    S: Parser<I, X> + 'static,
    I: Clone + 'static,
    O: 'static,
    X: 'static,
{
    or(
        SeparatedAndOptionallyTerminatedAtLeastOnce::new(value, separator),
        empty(),
    )
}

/// Values each followed by a separator, one or more times.
pub fn separated_and_terminated_at_least_once<P, S, I, O, X>(
    value: P,
    separator: S,
) -> AtLeastOnce<Before<P, S, I, O, X>, I, O>
where
    P: Parser<I, O>,
    S: Parser<I, X>,
    I: Clone,
{
    at_least_once(before(value, separator))
}

pub fn separated_and_terminated<P, S, I, O, X>(value: P, separator: S) -> OneOf<I, Vec<O>>
where
    P: Parser<I, O> + 'static,
    S: Parser<I, X> + 'static,
    I: Clone + 'static,
    O: 'static,
    X: 'static,
{
    many(before(value, separator))
}

// Side effects

/// Runs `action` on every value the parser produces.
pub fn tap<P, A, I, O>(parser: P, action: A) -> Map<P, impl Fn(O) -> O, I, O, O>
where
    P: Parser<I, O>,
    A: Fn(&O),
    I: Clone,
{
    Map::new(parser, move |value: O| {
        action(&value);
        value
    })
}

pub fn trace<P, I, O>(parser: P, message: &str) -> Map<P, impl Fn(O) -> O, I, O, O>
where
    P: Parser<I, O>,
    I: Clone,
{
    let message = message.to_string();
    tap(parser, move |_: &O| {
        tracing::debug!(target: "parser::trace", "{}", message);
    })
}

pub fn trace_with<P, M, I, O>(parser: P, message: M) -> Map<P, impl Fn(O) -> O, I, O, O>
where
    P: Parser<I, O>,
    M: Fn(&O) -> String,
    I: Clone,
{
    tap(parser, move |value: &O| {
        tracing::debug!(target: "parser::trace", "{}", message(value));
    })
}

pub fn trace_result<P, I, O>(parser: P) -> Map<P, impl Fn(O) -> O, I, O, O>
where
    P: Parser<I, O>,
    I: Clone,
    O: fmt::Debug,
{
    tap(parser, |value: &O| {
        tracing::debug!(target: "parser::trace", value = ?value, "parsed");
    })
}

/// Fluent combinator methods available on every parser.
pub trait ParserExt<I, O>: Parser<I, O> + Sized {
    fn map<B, F>(self, f: F) -> Map<Self, F, I, O, B>
    where
        F: Fn(O) -> B,
        I: Clone,
    {
        Map::new(self, f)
    }

    fn bind<B, Q, F, N, R>(self, binder: B, combinator: F) -> Bind<Self, B, F, I, O, N>
    where
        B: Fn(&O) -> Q,
        Q: Parser<I, N>,
        F: Fn(O, N) -> R,
        I: Clone,
    {
        Bind::new(self, binder, combinator)
    }

    fn then<Q, B>(self, next: Q) -> Then<Self, Q, I, O, B>
    where
        Q: Parser<I, B>,
        I: Clone,
    {
        then(self, next)
    }

    fn before<D, X>(self, delimiter: D) -> Before<Self, D, I, O, X>
    where
        D: Parser<I, X>,
        I: Clone,
    {
        before(self, delimiter)
    }

    fn or<Q>(self, alternative: Q) -> OneOf<I, O>
    where
        Self: 'static,
        Q: Parser<I, O> + 'static,
        I: Clone,
    {
        or(self, alternative)
    }

    fn optional(self) -> OneOf<I, Option<O>>
    where
        Self: 'static,
        I: Clone + 'static,
        O: 'static,
    {
        optional(self)
    }

    fn many(self) -> OneOf<I, Vec<O>>
    where
        Self: 'static,
        I: Clone + 'static,
        O: 'static,
    {
        many(self)
    }

    fn at_least_once(self) -> AtLeastOnce<Self, I, O>
    where
        I: Clone,
    {
        at_least_once(self)
    }

    fn separated_by<S, X>(self, separator: S) -> OneOf<I, Vec<O>>
    where
        Self: 'static,
        S: Parser<I, X> + 'static,
        I: Clone + 'static,
        O: 'static,
        X: 'static,
    {
        separated(self, separator)
    }

    fn labelled(self, label: &str) -> WithExpected<Self, I, O>
    where
        I: Clone,
    {
        labelled(label, self)
    }

    fn lookahead(self) -> Lookahead<Self, I, O>
    where
        I: Clone,
    {
        Lookahead::new(self)
    }

    fn safe(self) -> Safe<Self, I, O>
    where
        I: Clone,
    {
        Safe::new(self)
    }

    fn with_position(self) -> WithPosition<Self, I, O>
    where
        I: Clone,
    {
        Map2::new(
            CurrentPosition::new(),
            self,
            (|position, value| (position, value)) as fn(SourcePosition, O) -> (SourcePosition, O),
        )
    }

    fn boxed(self) -> BoxedParser<I, O>
    where
        Self: 'static,
    {
        BoxedParser::new(self)
    }
}

impl<P, I, O> ParserExt<I, O> for P where P: Parser<I, O> {}
