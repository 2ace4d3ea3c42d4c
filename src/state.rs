//! # Parse State
//!
//! The single mutable resource of a parse call. A [`ParseState`] owns the cursor
//! over a [`TokenSource`], the current source position, a stack of bookmarks used
//! to rewind after speculative parsing, and the latest [`ParseError`].
//!
//! Every parser in a call tree mutates the same state, passed explicitly by
//! `&mut` reference.

use crate::error::ParseError;
use crate::position::{PositionCalculator, SourcePosition};

/// Random access to the tokens of an in-memory input.
///
/// Cursors are opaque offsets chosen by the source; `token_at` returns the token
/// found at a cursor together with the width to skip to reach the next one.
pub trait TokenSource<I> {
    fn token_at(&self, cursor: usize) -> Option<(I, usize)>;
}

/// An array-indexed source: one token per slot.
#[derive(Debug, Clone, Copy)]
pub struct TokenSlice<'a, I> {
    tokens: &'a [I],
}

impl<'a, I> TokenSlice<'a, I> {
    pub fn new(tokens: &'a [I]) -> Self {
        Self { tokens }
    }
}

impl<I: Clone> TokenSource<I> for TokenSlice<'_, I> {
    fn token_at(&self, cursor: usize) -> Option<(I, usize)> {
        self.tokens.get(cursor).map(|token| (token.clone(), 1))
    }
}

/// A string-indexed source: cursors are byte offsets, tokens are chars.
#[derive(Debug, Clone, Copy)]
pub struct CharSource<'a> {
    input: &'a str,
}

impl<'a> CharSource<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }
}

impl TokenSource<char> for CharSource<'_> {
    fn token_at(&self, cursor: usize) -> Option<(char, usize)> {
        self.input
            .get(cursor..)
            .and_then(|rest| rest.chars().next())
            .map(|c| (c, c.len_utf8()))
    }
}

/// A saved cursor and position, restored by [`ParseState::rewind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bookmark {
    cursor: usize,
    position: SourcePosition,
}

pub struct ParseState<'a, I> {
    source: &'a dyn TokenSource<I>,
    calculator: &'a dyn PositionCalculator<I>,
    cursor: usize,
    current: Option<(I, usize)>,
    position: SourcePosition,
    bookmarks: Vec<Bookmark>,
    /// The latest failure. Any failing parser sets it; combinators read and
    /// replace it while unwinding.
    pub error: ParseError<I>,
}

impl<'a, I: Clone> ParseState<'a, I> {
    /// Creates a state positioned on the first token of `source`.
    pub fn new(
        source: &'a dyn TokenSource<I>,
        calculator: &'a dyn PositionCalculator<I>,
        start: SourcePosition,
    ) -> Self {
        Self {
            source,
            calculator,
            cursor: 0,
            current: source.token_at(0),
            position: start,
            bookmarks: Vec::new(),
            error: ParseError::unknown(),
        }
    }

    /// The current token, or `None` once the input is exhausted.
    pub fn peek(&self) -> Option<&I> {
        self.current.as_ref().map(|(token, _)| token)
    }

    pub fn is_at_end(&self) -> bool {
        self.current.is_none()
    }

    /// Commits the current token and loads the next one.
    pub fn advance(&mut self) {
        if let Some((token, width)) = &self.current {
            self.position = self.calculator.next_position(token, self.position);
            self.cursor += width;
        }
        self.load_current();
    }

    pub fn position(&self) -> SourcePosition {
        self.position
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn push_bookmark(&mut self) {
        self.bookmarks.push(Bookmark {
            cursor: self.cursor,
            position: self.position,
        });
    }

    /// Discards the latest bookmark without moving.
    pub fn pop_bookmark(&mut self) {
        self.bookmarks.pop();
    }

    /// Pops the latest bookmark and moves back to it.
    pub fn rewind(&mut self) {
        if let Some(bookmark) = self.bookmarks.pop() {
            self.cursor = bookmark.cursor;
            self.position = bookmark.position;
            self.load_current();
        }
    }

    pub fn bookmark_depth(&self) -> usize {
        self.bookmarks.len()
    }

    fn load_current(&mut self) {
        self.current = self.source.token_at(self.cursor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::{CharPositions, TokenPositions};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_peek_and_advance_over_chars() {
        let source = CharSource::new("aé\nb");
        let calc = CharPositions::default();
        let mut state = ParseState::new(&source, &calc, SourcePosition::default());

        assert_eq!(state.peek(), Some(&'a'));
        state.advance();
        assert_eq!(state.peek(), Some(&'é'));
        assert_eq!(state.position(), SourcePosition::new(1, 2));
        state.advance();
        assert_eq!(state.cursor(), 3);
        assert_eq!(state.peek(), Some(&'\n'));
        state.advance();
        assert_eq!(state.position(), SourcePosition::new(2, 3));
        state.advance();
        assert!(state.is_at_end());

        // advancing past the end is a no-op
        let position = state.position();
        state.advance();
        assert_eq!(state.position(), position);
    }

    #[test]
    fn test_rewind_restores_cursor_and_position() {
        let tokens = vec![10, 20, 30];
        let source = TokenSlice::new(&tokens);
        let mut state = ParseState::new(&source, &TokenPositions, SourcePosition::default());

        state.advance();
        state.push_bookmark();
        state.advance();
        state.advance();
        assert!(state.is_at_end());

        state.rewind();
        assert_eq!(state.peek(), Some(&20));
        assert_eq!(state.position(), SourcePosition::new(1, 2));
        assert_eq!(state.bookmark_depth(), 0);
    }

    #[test]
    fn test_pop_bookmark_keeps_position() {
        let tokens = vec!['x', 'y'];
        let source = TokenSlice::new(&tokens);
        let mut state = ParseState::new(&source, &TokenPositions, SourcePosition::default());

        state.push_bookmark();
        state.advance();
        state.pop_bookmark();

        assert_eq!(state.peek(), Some(&'y'));
        assert_eq!(state.bookmark_depth(), 0);
    }

    #[test]
    fn test_fresh_state_has_unknown_error() {
        let source = CharSource::new("");
        let calc = CharPositions::default();
        let state = ParseState::new(&source, &calc, SourcePosition::default());

        assert!(state.is_at_end());
        assert_eq!(state.error.message, "Unknown error");
    }
}
