//! # Expectations
//!
//! An [`Expected`] describes input that would have prevented a failure. Labelled
//! entries nest the expectations of the parser they describe, so a list of
//! expectations is a tree that error rendering walks depth first.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Expected<I> {
    /// A literal run of tokens.
    TokenSequence(Vec<I>),
    /// A named parser, with the expectations of the parser it names.
    Parser {
        label: String,
        expected: Vec<Expected<I>>,
    },
    /// The end of the input.
    Eof,
    /// Nothing in the input would have helped.
    NoInput,
}

impl<I> Expected<I> {
    pub fn tokens(tokens: Vec<I>) -> Self {
        Expected::TokenSequence(tokens)
    }

    pub fn label(label: impl Into<String>, expected: Vec<Expected<I>>) -> Self {
        Expected::Parser {
            label: label.into(),
            expected,
        }
    }

    /// Nested expectations of a labelled entry; empty for every other kind.
    pub fn causes(&self) -> &[Expected<I>] {
        match self {
            Expected::Parser { expected, .. } => expected,
            _ => &[],
        }
    }
}

impl<I: fmt::Display> fmt::Display for Expected<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::TokenSequence(tokens) => {
                for (i, token) in tokens.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", token)?;
                }
                Ok(())
            }
            Expected::Parser { label, .. } => write!(f, "\"{}\"", label),
            Expected::Eof => f.write_str("EOF"),
            Expected::NoInput => f.write_str("No Input"),
        }
    }
}

/// Concatenates expectation lists, keeping order and duplicates.
pub fn union_expected<'a, I>(
    collection: impl IntoIterator<Item = &'a [Expected<I>]>,
) -> Vec<Expected<I>>
where
    I: Clone + 'a,
{
    collection
        .into_iter()
        .flat_map(|expected| expected.iter().cloned())
        .collect()
}

/// Concatenates the expectation lists of consecutive components.
///
/// A component expecting exactly one token sequence is merged into the previous
/// one when that also was a lone token sequence, so sequencing `a`, `b` and `c`
/// one token at a time reads as a single expected `a, b, c`. Lists with several
/// entries, such as the alternatives of a `one_of`, are kept as they are. Empty
/// token sequences are dropped.
pub fn concat_expected<'a, I>(
    collection: impl IntoIterator<Item = &'a [Expected<I>]>,
) -> Vec<Expected<I>>
where
    I: Clone + 'a,
{
    let mut merged: Vec<Expected<I>> = Vec::new();
    let mut open_sequence = false;

    for component in collection {
        let entries: Vec<&Expected<I>> = component
            .iter()
            .filter(|expected| {
                !matches!(expected, Expected::TokenSequence(tokens) if tokens.is_empty())
            })
            .collect();

        match entries.as_slice() {
            [] => {}
            [Expected::TokenSequence(tokens)] => {
                match merged.last_mut() {
                    Some(Expected::TokenSequence(previous)) if open_sequence => {
                        previous.extend(tokens.iter().cloned());
                    }
                    _ => merged.push(Expected::TokenSequence(tokens.clone())),
                }
                open_sequence = true;
            }
            _ => {
                merged.extend(entries.iter().map(|expected| (*expected).clone()));
                open_sequence = false;
            }
        }
    }

    merged
}
