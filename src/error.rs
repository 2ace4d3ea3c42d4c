//! # Error Types
//!
//! Two tiers of failure live here:
//!
//! * [`ParseError`] describes an ordinary, recoverable parse failure: what was
//!   found, where, and what was expected instead. Combinators read and replace the
//!   error held by the parse state while they backtrack.
//! * [`GrammarError`] is fatal. It signals a broken grammar rather than bad input
//!   and aborts the whole parse.

use crate::expected::Expected;
use crate::position::SourcePosition;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Fatal errors raised while building or running a grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// A repetition construct saw its child succeed without consuming input.
    #[error(
        "Using '{combinator}' with a parser that does not consume inputs, \
         like '{parser}', will cause an infinite loop."
    )]
    Reentry {
        combinator: &'static str,
        parser: String,
    },
    /// A grammar construction call received an empty mandatory argument.
    #[error("'{argument}' is a mandatory argument")]
    MissingArgument { argument: &'static str },
}

impl GrammarError {
    pub fn reentry<P: ?Sized>(combinator: &'static str) -> Self {
        GrammarError::Reentry {
            combinator,
            parser: short_type_name::<P>(),
        }
    }
}

/// Drops module paths from a type name, keeping generic structure readable.
fn short_type_name<P: ?Sized>() -> String {
    let full = std::any::type_name::<P>();
    let mut short = String::with_capacity(full.len());
    let mut segment = String::new();

    for c in full.chars() {
        match c {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '(' | ')' | '&' | '[' | ']' | ';' => {
                short.push_str(&segment);
                segment.clear();
                short.push(c);
            }
            _ => segment.push(c),
        }
    }
    short.push_str(&segment);
    short
}

/// The detailed cause of a parse failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorCause<I> {
    /// The token that triggered the failure, if any.
    pub unexpected: Option<I>,
    pub position: SourcePosition,
    /// Whether the failure happened because the input ended early.
    pub is_eof: bool,
}

impl<I> ErrorCause<I> {
    pub fn new(unexpected: Option<I>, position: SourcePosition, is_eof: bool) -> Self {
        Self {
            unexpected,
            position,
            is_eof,
        }
    }
}

/// A recoverable failure of the parsing process.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseError<I> {
    pub cause: ErrorCause<I>,
    pub expected: Vec<Expected<I>>,
    pub message: String,
}

impl<I> ParseError<I> {
    pub fn new(
        cause: ErrorCause<I>,
        expected: Vec<Expected<I>>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            cause,
            expected,
            message: message.into(),
        }
    }

    /// The error a fresh state starts with, before any parser ran.
    pub fn unknown() -> Self {
        Self::new(
            ErrorCause::new(None, SourcePosition::new(0, 0), false),
            Vec::new(),
            "Unknown error",
        )
    }

    /// Returns a copy of this error with its expectations replaced.
    pub fn with_expected(&self, expected: Vec<Expected<I>>) -> Self
    where
        I: Clone,
    {
        Self {
            cause: self.cause.clone(),
            expected,
            message: self.message.clone(),
        }
    }

    pub fn position(&self) -> SourcePosition {
        self.cause.position
    }
}

impl<I: fmt::Display> fmt::Display for ParseError<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Parse error.")?;

        if !self.message.is_empty() {
            write!(f, "\n{}", self.message)?;
        }

        if self.cause.is_eof {
            f.write_str("\nUnexpected: EOF")?;
        } else if let Some(token) = &self.cause.unexpected {
            write!(f, "\nUnexpected: \"{}\"", token)?;
        }

        if !self.expected.is_empty() {
            f.write_str("\nExpected:")?;
            render_expected(f, &self.expected, 1)?;
        }

        write!(f, "\nat {}", self.cause.position)
    }
}

fn render_expected<I: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    expected: &[Expected<I>],
    depth: usize,
) -> fmt::Result {
    let indent = "    ".repeat(depth);

    for entry in expected {
        write!(f, "\n{}<{}>", indent, entry)?;

        let causes = entry.causes();
        if !causes.is_empty() {
            write!(f, "\n{}Due to: ", indent)?;
            render_expected(f, causes, depth + 1)?;
        }
    }

    Ok(())
}

impl<I: fmt::Debug + fmt::Display> std::error::Error for ParseError<I> {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> ParseError<char> {
        ParseError::new(
            ErrorCause::new(Some('x'), SourcePosition::new(2, 5), false),
            vec![
                Expected::label("value", vec![Expected::tokens(vec!['n', 'u', 'l', 'l'])]),
                Expected::Eof,
            ],
            "Token did not match expected predicate or token list.",
        )
    }

    #[test]
    fn test_with_expected_keeps_cause_and_message() {
        let error = sample();
        let replaced = error.with_expected(vec![Expected::NoInput]);

        assert_eq!(replaced.cause, error.cause);
        assert_eq!(replaced.message, error.message);
        assert_eq!(replaced.expected, vec![Expected::NoInput]);
        // original is untouched
        assert_eq!(error.expected.len(), 2);
    }

    #[test]
    fn test_render_nested_causes() {
        let rendered = sample().to_string();
        let expected = "Parse error.\n\
            Token did not match expected predicate or token list.\n\
            Unexpected: \"x\"\n\
            Expected:\n    \
            <\"value\">\n    \
            Due to: \n        \
            <n, u, l, l>\n    \
            <EOF>\n\
            at line 2, column 5";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn test_render_eof() {
        let error: ParseError<char> = ParseError::new(
            ErrorCause::new(None, SourcePosition::new(1, 3), true),
            vec![],
            "",
        );
        assert_eq!(error.to_string(), "Parse error.\nUnexpected: EOF\nat line 1, column 3");
    }

    #[test]
    fn test_serializes_structurally() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["cause"]["position"]["line"], 2);
        assert_eq!(value["cause"]["unexpected"], "x");
        assert_eq!(value["expected"][1], "Eof");
    }

    #[test]
    fn test_reentry_message_names_parser() {
        let error =
            GrammarError::reentry::<crate::combinators::Return<char, ()>>("ChainAtLeastOnceL");
        assert_eq!(
            error.to_string(),
            "Using 'ChainAtLeastOnceL' with a parser that does not consume inputs, \
             like 'Return<char, ()>', will cause an infinite loop."
        );
    }
}
