//! # Parsimony: Parser Combinators with Committed Choice
//!
//! Parsimony builds recursive-descent parsers over any token type by composing
//! small parsers into larger ones.
//!
//! ## Model
//!
//! Every attempt reports whether it *consumed* input, independently of success.
//! That flag drives all backtracking:
//!
//! - An alternative that fails after consuming is committed; [`prelude::one_of`]
//!   returns its failure without trying the rest.
//! - [`prelude::safe`] and [`prelude::lookahead`] are the only ways to undo
//!   consumption. Both save a bookmark on the [`state::ParseState`] and rewind to it.
//!
//! Failures carry a tree of [`expected::Expected`] values that renders as an
//! indented report with line and column.
//!
//! ## Layout
//!
//! - [`position`], [`expected`], [`error`], [`state`]: the data model
//! - [`core`]: the [`Parser`] trait and the result algebra
//! - [`combinators`]: one struct per parser node
//! - [`prelude`]: constructor functions, derived operators and [`prelude::ParserExt`]
//! - [`text`]: character parsers
//! - [`context`]: entry points
//!
//! ## Errors
//!
//! Ordinary parse failures are values. A grammar that repeats a parser which
//! consumes nothing is broken, and running it aborts with a [`GrammarError`].

pub mod combinators;
pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod expected;
pub mod position;
pub mod prelude;
pub mod state;
pub mod text;

#[cfg(test)]
mod testing;

// Re-exports
pub use crate::config::{ConfigError, ParserConfig};
pub use crate::context::{parse_str, parse_str_with_config, parse_tokens, ParseContext, ParseResult};
pub use crate::core::{BoxedParser, Outcome, Parser, Reply};
pub use crate::error::{ErrorCause, GrammarError, ParseError};
pub use crate::expected::Expected;
pub use crate::position::{CharPositions, PositionCalculator, SourcePosition, TokenPositions};
