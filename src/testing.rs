//! Helpers shared by the unit tests of the parser modules.

use crate::position::{CharPositions, SourcePosition, TokenPositions};
use crate::state::{CharSource, ParseState, TokenSlice};
use std::io;
use std::sync::{Arc, Mutex};

/// Runs `f` against a fresh character state over `input`.
pub(crate) fn with_state<R>(input: &str, f: impl FnOnce(&mut ParseState<'_, char>) -> R) -> R {
    let source = CharSource::new(input);
    let calc = CharPositions::default();
    let mut state = ParseState::new(&source, &calc, SourcePosition::default());
    f(&mut state)
}

/// Runs `f` against a fresh state over an array of arbitrary tokens.
pub(crate) fn with_tokens<I: Clone, R>(
    tokens: &[I],
    f: impl FnOnce(&mut ParseState<'_, I>) -> R,
) -> R {
    let source = TokenSlice::new(tokens);
    let mut state = ParseState::new(&source, &TokenPositions, SourcePosition::default());
    f(&mut state)
}

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Ok(mut bytes) = self.0.lock() {
            bytes.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a subscriber that records every event, returning the formatted
/// log lines with their targets.
pub(crate) fn capture_logs<R>(f: impl FnOnce() -> R) -> (R, String) {
    let buffer = SharedBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_target(true)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = buffer
        .0
        .lock()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default();
    (result, logs)
}
