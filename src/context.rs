//! # Parse Entry Points
//!
//! A [`ParseContext`] binds an input and a position calculator. Each call to
//! [`ParseContext::run`] parses the input from the start with a fresh state.
//!
//! ```
//! use parsimony::prelude::*;
//! use parsimony::parse_str;
//!
//! let result = parse_str("ab").run(&token('a')).unwrap();
//! assert!(result.is_successful());
//! assert!(result.has_consumed_input());
//! assert_eq!(*result.value(), 'a');
//! ```

use crate::config::ParserConfig;
use crate::core::{Outcome, Parser};
use crate::error::{GrammarError, ParseError};
use crate::position::{CharPositions, PositionCalculator, SourcePosition, TokenPositions};
use crate::state::{CharSource, ParseState, TokenSlice, TokenSource};

pub struct ParseContext<'a, I> {
    source: Box<dyn TokenSource<I> + 'a>,
    calculator: Box<dyn PositionCalculator<I> + 'a>,
    start: SourcePosition,
}

/// Prepares to parse a string, one `char` per token.
pub fn parse_str(input: &str) -> ParseContext<'_, char> {
    ParseContext::new(CharSource::new(input), CharPositions::default())
}

pub fn parse_str_with_config<'a>(
    input: &'a str,
    config: &ParserConfig,
) -> ParseContext<'a, char> {
    ParseContext::new(CharSource::new(input), config.char_positions())
        .starting_at(config.start_position())
}

/// Prepares to parse a slice of tokens. Positions only count columns.
pub fn parse_tokens<I: Clone>(tokens: &[I]) -> ParseContext<'_, I> {
    ParseContext::new(TokenSlice::new(tokens), TokenPositions)
}

impl<'a, I: Clone> ParseContext<'a, I> {
    pub fn new(
        source: impl TokenSource<I> + 'a,
        calculator: impl PositionCalculator<I> + 'a,
    ) -> Self {
        Self {
            source: Box::new(source),
            calculator: Box::new(calculator),
            start: SourcePosition::default(),
        }
    }

    /// Replaces the position calculator, e.g. with a closure.
    pub fn with_calculator(mut self, calculator: impl PositionCalculator<I> + 'a) -> Self {
        self.calculator = Box::new(calculator);
        self
    }

    pub fn starting_at(mut self, start: SourcePosition) -> Self {
        self.start = start;
        self
    }

    /// Runs `parser` against a fresh state over the bound input.
    ///
    /// Only grammar faults are errors here; a parse failure is an unsuccessful
    /// [`ParseResult`].
    pub fn run<P, O>(&self, parser: &P) -> Result<ParseResult<I, O>, GrammarError>
    where
        P: Parser<I, O> + ?Sized,
    {
        let mut state = ParseState::new(&*self.source, &*self.calculator, self.start);

        match parser.parse(&mut state)? {
            Outcome::Success { value, consumed } => {
                tracing::debug!(
                    target: "parser::run",
                    consumed,
                    position = %state.position(),
                    "parse succeeded"
                );
                Ok(ParseResult {
                    outcome: Ok(value),
                    consumed,
                })
            }
            Outcome::Failure { consumed } => {
                tracing::debug!(
                    target: "parser::run",
                    consumed,
                    position = %state.error.position(),
                    message = %state.error.message,
                    "parse failed"
                );
                Ok(ParseResult {
                    outcome: Err(state.error),
                    consumed,
                })
            }
        }
    }
}

/// The outcome of a whole parse.
///
/// # Panics
///
/// [`value`](Self::value) panics on a failed result and [`error`](Self::error)
/// panics on a successful one. Check [`is_successful`](Self::is_successful) first,
/// or use [`into_result`](Self::into_result).
#[derive(Debug, Clone, PartialEq)]
pub struct ParseResult<I, O> {
    outcome: Result<O, ParseError<I>>,
    consumed: bool,
}

impl<I, O> ParseResult<I, O> {
    pub fn is_successful(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn has_consumed_input(&self) -> bool {
        self.consumed
    }

    pub fn value(&self) -> &O {
        match &self.outcome {
            Ok(value) => value,
            Err(_) => panic!("Cannot read the value of a failed parse result."),
        }
    }

    pub fn error(&self) -> &ParseError<I> {
        match &self.outcome {
            Err(error) => error,
            Ok(_) => panic!("Cannot read the error of a successful parse result."),
        }
    }

    pub fn into_result(self) -> Result<O, ParseError<I>> {
        self.outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinators::{Fail, Map2, Token};
    use crate::expected::Expected;
    use crate::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_run_success() {
        let result = parse_str("a").run(&Token::new('a')).unwrap();

        assert!(result.is_successful());
        assert!(result.has_consumed_input());
        assert_eq!(*result.value(), 'a');
    }

    #[test]
    fn test_run_failure() {
        let result = parse_str("b").run(&Token::new('a')).unwrap();

        assert!(!result.is_successful());
        assert!(!result.has_consumed_input());
        assert_eq!(result.error().expected, vec![Expected::tokens(vec!['a'])]);
        assert_eq!(result.error().cause.unexpected, Some('b'));
    }

    #[test]
    fn test_each_run_starts_fresh() {
        let context = parse_str("xy");
        let parser = Map2::new(Token::new('x'), Token::new('y'), |x, y| (x, y));

        for _ in 0..2 {
            assert_eq!(*context.run(&parser).unwrap().value(), ('x', 'y'));
        }
    }

    #[test]
    #[should_panic(expected = "Cannot read the value of a failed parse result.")]
    fn test_value_of_failure_panics() {
        let parser: Fail<char, ()> = Fail::new("no");
        let result = parse_str("").run(&parser).unwrap();
        result.value();
    }

    #[test]
    #[should_panic(expected = "Cannot read the error of a successful parse result.")]
    fn test_error_of_success_panics() {
        let result = parse_str("").run(&end()).unwrap();
        result.error();
    }

    #[test]
    fn test_tokens_track_columns_only() {
        let tokens = vec!["let", "x", "\n", "="];
        let parser = then(many(candidate(|t: &&str| *t != "=")), current_position());
        let result = parse_tokens(&tokens).run(&parser).unwrap();

        assert_eq!(*result.value(), SourcePosition::new(1, 4));
    }

    #[test]
    fn test_config_and_custom_calculator() {
        let config = ParserConfig {
            reset_column_on_newline: true,
            first_line: 10,
            ..ParserConfig::default()
        };
        let parser = then(token_sequence(vec!['a', '\n']), current_position());

        let result = parse_str_with_config("a\nb", &config).run(&parser).unwrap();
        assert_eq!(*result.value(), SourcePosition::new(11, 1));

        let doubled = parse_str("ab")
            .with_calculator(|_: &char, previous: SourcePosition| previous.next_column(2))
            .run(&then(token('a'), current_position()))
            .unwrap();
        assert_eq!(*doubled.value(), SourcePosition::new(1, 3));
    }

    #[test]
    fn test_into_result() {
        let ok = parse_str("a").run(&token('a')).unwrap().into_result();
        assert_eq!(ok, Ok('a'));

        let err = parse_str("").run(&token('a')).unwrap().into_result();
        assert!(err.unwrap_err().cause.is_eof);
    }
}
