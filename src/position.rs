//! # Source Positions
//!
//! Line/column coordinates attached to every parse state and error, plus the
//! calculators that move a position forward as tokens are consumed.

use serde::Serialize;

/// A two dimensional coordinate of a token in its source stream.
///
/// Positions are immutable: every transition returns a new value. They order by
/// line first, then by column, which is what `one_of` relies on to keep the error
/// of the longest partial match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Moves down `jump` lines. The column is carried over unchanged.
    pub fn next_line(self, jump: usize) -> Self {
        Self::new(self.line + jump, self.column)
    }

    /// Moves right `jump` columns.
    pub fn next_column(self, jump: usize) -> Self {
        Self::new(self.line, self.column + jump)
    }
}

impl Default for SourcePosition {
    fn default() -> Self {
        Self::new(1, 1)
    }
}

impl std::fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Computes the position following a consumed token.
///
/// Any `Fn(&I, SourcePosition) -> SourcePosition` closure is a calculator.
pub trait PositionCalculator<I> {
    fn next_position(&self, token: &I, previous: SourcePosition) -> SourcePosition;
}

impl<I, F> PositionCalculator<I> for F
where
    F: Fn(&I, SourcePosition) -> SourcePosition,
{
    fn next_position(&self, token: &I, previous: SourcePosition) -> SourcePosition {
        self(token, previous)
    }
}

/// Character position tracking.
///
/// A newline moves to the next line, a tab advances `tab_width` columns and any
/// other character advances one column. By default the column is *not* reset when
/// crossing a newline; set `reset_column_on_newline` to get the usual convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharPositions {
    pub tab_width: usize,
    pub reset_column_on_newline: bool,
    pub first_column: usize,
}

impl Default for CharPositions {
    fn default() -> Self {
        Self {
            tab_width: 4,
            reset_column_on_newline: false,
            first_column: 1,
        }
    }
}

impl PositionCalculator<char> for CharPositions {
    fn next_position(&self, token: &char, previous: SourcePosition) -> SourcePosition {
        match token {
            '\n' if self.reset_column_on_newline => {
                SourcePosition::new(previous.line + 1, self.first_column)
            }
            '\n' => previous.next_line(1),
            '\t' => previous.next_column(self.tab_width),
            _ => previous.next_column(1),
        }
    }
}

/// Generic token tracking: every token advances one column, lines never change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenPositions;

impl<I> PositionCalculator<I> for TokenPositions {
    fn next_position(&self, _token: &I, previous: SourcePosition) -> SourcePosition {
        previous.next_column(1)
    }
}
