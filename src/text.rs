//! # Character Parsers
//!
//! Conveniences for grammars over `char` input. Everything here except
//! [`StringCaseInsensitive`] is an ordinary composition of the public combinators.

use crate::combinators::{
    Candidate, ChainAtLeastOnceL, Map, Map2, OneOf, Return, Token, TokenSequence, WithExpected,
};
use crate::core::{fail_eof, fail_token, Outcome, Parser, Reply};
use crate::error::GrammarError;
use crate::expected::Expected;
use crate::prelude::{labelled, many, or, skip_many, value};
use crate::state::ParseState;

/// A character class: a labelled predicate over one `char`.
pub type CharClass = Candidate<char, fn(&char) -> bool>;
/// A literal string, produced as a `String`.
pub type Literal = Map<TokenSequence<char>, fn(Vec<char>) -> String, char, Vec<char>, String>;
/// One or more tokens concatenated into a `String`.
pub type AtLeastOnceString<P, I, O> =
    ChainAtLeastOnceL<P, fn() -> String, fn(String, O) -> String, I, O, String>;
/// A letter followed by letters and digits.
pub type Identifier =
    Map2<CharClass, OneOf<char, String>, fn(char, String) -> String, char, char, String, String>;

fn collect_string(chars: Vec<char>) -> String {
    chars.into_iter().collect()
}

fn append<O>(mut text: String, piece: O) -> String
where
    String: Extend<O>,
{
    text.extend(std::iter::once(piece));
    text
}

fn char_class(predicate: fn(&char) -> bool, label: &str) -> CharClass {
    Candidate::with_label(predicate, label)
}

pub fn of_char(c: char) -> Token<char> {
    Token::new(c)
}

pub fn of_str(text: &str) -> Literal {
    Map::new(
        TokenSequence::new(text.chars().collect()),
        collect_string as fn(Vec<char>) -> String,
    )
}

pub fn try_of_str(text: &str) -> Result<Literal, GrammarError> {
    if text.is_empty() {
        return Err(GrammarError::MissingArgument {
            argument: "characters",
        });
    }
    Ok(of_str(text))
}

/// Any single character not listed in `excluded`.
pub fn any_char_except(excluded: &str) -> Candidate<char, impl Fn(&char) -> bool> {
    let excluded: Vec<char> = excluded.chars().collect();
    Candidate::new(move |c: &char| !excluded.contains(c))
}

pub fn digit() -> CharClass {
    char_class(char::is_ascii_digit, "digit")
}

pub fn lowercase() -> CharClass {
    char_class(char::is_ascii_lowercase, "lowercase letter")
}

pub fn uppercase() -> CharClass {
    char_class(char::is_ascii_uppercase, "uppercase letter")
}

pub fn letter() -> CharClass {
    char_class(char::is_ascii_alphabetic, "letter")
}

pub fn letter_or_digit() -> CharClass {
    char_class(|c| c.is_ascii_alphanumeric() || *c == '_', "letter or digit")
}

pub fn symbol() -> CharClass {
    char_class(
        |c| !(c.is_ascii_alphanumeric() || *c == '_' || c.is_whitespace()),
        "symbol",
    )
}

pub fn whitespace() -> CharClass {
    char_class(|c| c.is_whitespace(), "whitespace")
}

pub fn whitespaces() -> WithExpected<OneOf<char, Vec<char>>, char, Vec<char>> {
    labelled("whitespaces", many(whitespace()))
}

pub fn whitespace_string() -> WithExpected<OneOf<char, String>, char, String> {
    labelled("whitespaces", many_string(whitespace()))
}

pub fn skip_whitespaces() -> WithExpected<OneOf<char, ()>, char, ()> {
    labelled("skip whitespaces", skip_many(whitespace()))
}

/// Either a UNIX or a Windows line ending.
pub fn end_of_line() -> WithExpected<OneOf<char, String>, char, String> {
    labelled("End of line", or(of_str("\n"), of_str("\r\n")))
}

pub fn at_least_once_string<P, I, O>(parser: P) -> AtLeastOnceString<P, I, O>
where
    P: Parser<I, O>,
    I: Clone,
    String: Extend<O>,
{
    ChainAtLeastOnceL::new(
        parser,
        String::new as fn() -> String,
        append as fn(String, O) -> String,
    )
}

/// Zero or more tokens concatenated into a `String`.
pub fn many_string<P, I, O>(parser: P) -> OneOf<I, String>
where
    P: Parser<I, O> + 'static,
    I: Clone + 'static,
    O: 'static,
    String: Extend<O>,
{
    or(at_least_once_string(parser), value::<I, String>(String::new()))
}

/// StringCaseInsensitive: Matches a string ignoring case
///
/// The value is the input as written, so its casing is preserved. Like
/// [`TokenSequence`], a partial match reports consumption.
#[derive(Clone)]
pub struct StringCaseInsensitive {
    chars: Vec<char>,
    expected: Vec<Expected<char>>,
}

impl StringCaseInsensitive {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            expected: vec![
                Expected::tokens(text.to_lowercase().chars().collect()),
                Expected::tokens(text.to_uppercase().chars().collect()),
            ],
        }
    }
}

impl Parser<char, String> for StringCaseInsensitive {
    fn parse(&self, state: &mut ParseState<'_, char>) -> Reply<String> {
        let mut matched = String::with_capacity(self.chars.len());

        for expected in &self.chars {
            let consumed = !matched.is_empty();
            match state.peek().copied() {
                None => return fail_eof(state, &self.expected, consumed),
                Some(found) if !found.to_lowercase().eq(expected.to_lowercase()) => {
                    return fail_token(state, &self.expected, found, consumed)
                }
                Some(found) => {
                    matched.push(found);
                    state.advance();
                }
            }
        }

        let consumed = !matched.is_empty();
        Ok(Outcome::success(matched, consumed))
    }

    fn expected(&self) -> &[Expected<char>] {
        &self.expected
    }
}

pub fn string_case_insensitive(text: &str) -> StringCaseInsensitive {
    StringCaseInsensitive::new(text)
}

pub fn try_string_case_insensitive(text: &str) -> Result<StringCaseInsensitive, GrammarError> {
    if text.is_empty() {
        return Err(GrammarError::MissingArgument { argument: "tokens" });
    }
    Ok(StringCaseInsensitive::new(text))
}

pub fn char_case_insensitive(c: char) -> StringCaseInsensitive {
    StringCaseInsensitive::new(c.encode_utf8(&mut [0; 4]))
}

/// Matches nothing and produces an empty string.
pub fn empty_string<I>() -> Return<I, String> {
    Return::new(String::new())
}

/// One or more digits as a `String`.
pub fn digits() -> AtLeastOnceString<CharClass, char, char> {
    at_least_once_string(digit())
}

/// Letters and digits, starting with a letter.
pub fn identifier() -> Identifier {
    Map2::new(
        letter(),
        many_string(letter_or_digit()),
        (|head: char, tail: String| {
            let mut name = String::with_capacity(tail.len() + 1);
            name.push(head);
            name.push_str(&tail);
            name
        }) as fn(char, String) -> String,
    )
}
