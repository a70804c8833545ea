//! Character ports with one character of pushback.

use std::collections::VecDeque;
use std::io;
use std::sync::Arc;

use super::read::Read;
use crate::node::Location;

/// A row/column pair.
///
/// Rows start at 1. The column counts the characters consumed on the current
/// row, so after consuming the first character of a token, the column is the
/// one-based column of that token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    /// One-based row.
    pub row: usize,
    /// Characters consumed on the current row.
    pub column: usize,
}

impl Position {
    fn start() -> Self {
        Position { row: 1, column: 0 }
    }

    fn advance(&mut self, c: char) {
        if c == '\n' {
            self.row += 1;
            self.column = 0;
        } else {
            self.column += 1;
        }
    }
}

/// Why the port last reported the end of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    /// A newline acting as the end-of-input sentinel.
    Newline,
    /// The underlying source ran dry.
    Stream,
}

/// A character source with position bookkeeping, a single pushback slot and
/// the end-of-input modes used by the reader.
///
/// Besides the underlying [`Read`] source, a port holds a queue of pending
/// characters that are delivered first. The queue receives text supplied via
/// [`feed`](Port::feed) and characters replayed by
/// [`rewind`](Port::rewind).
pub struct Port<R> {
    read: R,
    name: Arc<str>,
    position: Position,
    /// Position before the most recently consumed character.
    previous: Position,
    pushback: Option<char>,
    pending: VecDeque<char>,
    /// Characters consumed since the last `mark`.
    transcript: Vec<char>,
    mark: Position,
    ready: bool,
    alternate_eof: bool,
    end: Option<End>,
}

impl<R: Read> Port<R> {
    /// Create a port reading from `read`, labelling locations with `name`.
    pub fn new(read: R, name: impl Into<Arc<str>>) -> Self {
        Port {
            read,
            name: name.into(),
            position: Position::start(),
            previous: Position::start(),
            pushback: None,
            pending: VecDeque::new(),
            transcript: Vec::new(),
            mark: Position::start(),
            ready: true,
            alternate_eof: false,
            end: None,
        }
    }

    /// Consume the next character.
    ///
    /// Returns `None` at the end of input. Once the end of input has been
    /// reached, the port keeps returning `None` until it is [`reset`]. In
    /// alternate-eof mode a newline counts as the end of input; it is consumed
    /// like any other character.
    ///
    /// [`reset`]: Port::reset
    pub fn next_char(&mut self) -> io::Result<Option<char>> {
        if !self.ready {
            return Ok(None);
        }
        let c = match self.pushback.take().or_else(|| self.pending.pop_front()) {
            Some(c) => c,
            None => match self.read.next()? {
                Some(c) => c,
                None => {
                    self.ready = false;
                    self.end = Some(End::Stream);
                    return Ok(None);
                }
            },
        };
        self.previous = self.position;
        self.position.advance(c);
        self.transcript.push(c);
        if c == '\n' && self.alternate_eof {
            self.ready = false;
            self.end = Some(End::Newline);
            return Ok(None);
        }
        Ok(Some(c))
    }

    /// Return the most recently consumed character, so that the next call to
    /// [`next_char`](Port::next_char) delivers it again.
    ///
    /// Only one character can be pushed back at a time, and it must be the
    /// one most recently returned.
    pub fn push_back(&mut self, c: char) {
        debug_assert!(self.pushback.is_none(), "pushback slot already in use");
        debug_assert_eq!(self.transcript.last(), Some(&c));
        self.transcript.pop();
        self.position = self.previous;
        self.pushback = Some(c);
    }

    /// Make the port deliver input again after it reported the end of input.
    pub fn reset(&mut self) {
        self.ready = true;
        self.end = None;
    }

    /// Append text to be delivered after any pending input.
    pub fn feed(&mut self, text: &str) {
        self.pending.extend(text.chars());
        self.reset();
    }

    /// Remember the current position as the start of a form, so that a later
    /// [`rewind`](Port::rewind) can replay everything read from here on.
    pub fn mark(&mut self) {
        if let Some(c) = self.pushback.take() {
            self.pending.push_front(c);
        }
        self.transcript.clear();
        self.mark = self.position;
    }

    /// Go back to the last mark, queueing every character consumed since
    /// then for delivery again.
    pub fn rewind(&mut self) {
        let mut replay: VecDeque<char> = self.transcript.drain(..).collect();
        replay.extend(self.pushback.take());
        replay.append(&mut self.pending);
        self.pending = replay;
        self.position = self.mark;
        self.previous = self.mark;
        self.reset();
    }

    /// The current position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Label of the source.
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// The current position as a source location.
    pub fn location(&self) -> Location {
        Location::new(self.name.clone(), self.position.row, self.position.column)
    }

    /// False once the end of input has been reached and the port was not
    /// reset since.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// True if the last end of input came from the underlying source running
    /// dry, as opposed to a newline in alternate-eof mode.
    pub fn is_exhausted(&self) -> bool {
        self.end == Some(End::Stream)
    }

    /// True if the last end of input was a newline in alternate-eof mode.
    pub fn ended_at_newline(&self) -> bool {
        self.end == Some(End::Newline)
    }

    /// Choose whether a newline acts as the end of input.
    pub fn set_alternate_eof(&mut self, enabled: bool) {
        self.alternate_eof = enabled;
    }

    /// Whether a newline acts as the end of input.
    pub fn alternate_eof(&self) -> bool {
        self.alternate_eof
    }

    /// Unwrap the underlying source.
    pub fn into_inner(self) -> R {
        self.read
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::StrRead;

    fn port(s: &str) -> Port<StrRead<'_>> {
        Port::new(StrRead::new(s), "test")
    }

    #[test]
    fn test_position_bookkeeping() {
        let mut port = port("ab\nc");
        assert_eq!(port.next_char().unwrap(), Some('a'));
        assert_eq!(port.position(), Position { row: 1, column: 1 });
        port.next_char().unwrap();
        port.next_char().unwrap();
        assert_eq!(port.position(), Position { row: 2, column: 0 });
        assert_eq!(port.next_char().unwrap(), Some('c'));
        assert_eq!(port.position(), Position { row: 2, column: 1 });
        assert_eq!(port.next_char().unwrap(), None);
        assert!(port.is_exhausted());
        assert!(!port.is_ready());
    }

    #[test]
    fn test_push_back_restores_position() {
        let mut port = port("x\ny");
        port.next_char().unwrap();
        let c = port.next_char().unwrap().unwrap();
        assert_eq!(port.position(), Position { row: 2, column: 0 });
        port.push_back(c);
        assert_eq!(port.position(), Position { row: 1, column: 1 });
        assert_eq!(port.next_char().unwrap(), Some('\n'));
        assert_eq!(port.next_char().unwrap(), Some('y'));
    }

    #[test]
    fn test_alternate_eof() {
        let mut port = port("a\nb");
        port.set_alternate_eof(true);
        assert_eq!(port.next_char().unwrap(), Some('a'));
        assert_eq!(port.next_char().unwrap(), None);
        assert!(port.ended_at_newline());
        assert_eq!(port.next_char().unwrap(), None);
        port.reset();
        assert_eq!(port.next_char().unwrap(), Some('b'));
        assert_eq!(port.position(), Position { row: 2, column: 1 });
    }

    #[test]
    fn test_rewind_replays_from_mark() {
        let mut port = port(" (a");
        port.next_char().unwrap();
        port.mark();
        assert_eq!(port.next_char().unwrap(), Some('('));
        assert_eq!(port.next_char().unwrap(), Some('a'));
        assert_eq!(port.next_char().unwrap(), None);
        port.rewind();
        port.feed(")");
        let rest: Vec<_> = std::iter::from_fn(|| port.next_char().unwrap()).collect();
        assert_eq!(rest, vec!['(', 'a', ')']);
        assert_eq!(port.position(), Position { row: 1, column: 4 });
    }

    #[test]
    fn test_mark_keeps_pushed_back_character() {
        let mut port = port("ab");
        let c = port.next_char().unwrap().unwrap();
        port.push_back(c);
        port.mark();
        assert_eq!(port.next_char().unwrap(), Some('a'));
        port.rewind();
        assert_eq!(port.next_char().unwrap(), Some('a'));
        assert_eq!(port.next_char().unwrap(), Some('b'));
    }
}
