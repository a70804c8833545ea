//! Reader for the textual representation of programs.
//!
//! # Terminology
//!
//! The process of converting text into syntax trees is referred to as
//! "reading" in Lisp. To avoid confusion with Rust's `Read` trait,
//! `lispfront` uses "parsing" instead.
//!
//! # Dots
//!
//! `(a . b)` reads as a dotted pair. Two lone dots around one element move
//! that element to the front: `(x . < . y)` reads as `(< x y)`. This
//! includes `(a . b . c)`, which reads as `(b a c)`. Every other use of a
//! lone `.` is an illegal-dot error.
//!
//! # Errors
//!
//! Parsing does not fail in the usual sense. When the input is malformed,
//! the parser returns an *error node* in place of the expression, and the
//! first error inside a list or vector ends that form, with the error node
//! propagated outward unchanged. Use [`Node::is_valid`] to check a result, or
//! [`Parser::parse_value`] to get a conventional `Result`.
//!
//! # Incremental mode
//!
//! With [`Options::with_wait`] enabled, running out of input inside an
//! unfinished form is not an error. If the source can deliver more text
//! later, for example the next line typed at a terminal, the parser invokes
//! the continuation hook and keeps reading. If the source is exhausted, the
//! parser rewinds to the start of the form and returns
//! [`Outcome::Incomplete`]; supply more text with [`Parser::feed`] and call
//! [`Parser::parse`] again.
//!
//! ```
//! use lispfront::parse::{Options, Outcome, Parser};
//!
//! let mut parser = Parser::from_str_custom("(define x", Options::new().with_wait(true));
//! assert!(matches!(parser.parse(), Some(Outcome::Incomplete)));
//! parser.feed(" 42)");
//! match parser.parse() {
//!     Some(Outcome::Complete(node)) => assert_eq!(node.to_string(), "(define x 42)"),
//!     _ => panic!("expected a complete expression"),
//! }
//! ```

use std::io;
use std::sync::Arc;

use crate::error::{Error, ErrorCode, Result};
use crate::node::{Location, Node};

pub use self::port::{Port, Position};
pub use self::read::{IoRead, Read, StrRead};

mod port;
mod read;
mod rewrite;

/// Various options to influence parser behavior.
#[derive(Debug, Clone)]
pub struct Options {
    wait: bool,
    alternate_eof: bool,
    name: Arc<str>,
    depth_limit: usize,
}

impl Options {
    /// Construct the default set of options.
    ///
    /// End of input inside a form is an error, only the end of the stream
    /// counts as end of input, sources are labelled `<string>` and nesting is
    /// limited to 128 levels.
    pub fn new() -> Self {
        Options {
            wait: false,
            alternate_eof: false,
            name: Arc::from("<string>"),
            depth_limit: 128,
        }
    }

    /// Construct options suitable for reading from a terminal, one line at a
    /// time: incremental mode, newline as end of input and the source name
    /// `<stdin>`.
    pub fn interactive() -> Self {
        Self::new()
            .with_wait(true)
            .with_alternate_eof(true)
            .with_name("<stdin>")
    }

    /// Choose whether running out of input inside a form waits for more.
    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait = wait;
        self
    }

    /// Choose whether a newline acts as the end of input.
    pub fn with_alternate_eof(mut self, enabled: bool) -> Self {
        self.alternate_eof = enabled;
        self
    }

    /// Set the source name recorded in node locations.
    pub fn with_name(mut self, name: impl Into<Arc<str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the maximum nesting depth of lists and vectors.
    pub fn with_depth_limit(mut self, limit: usize) -> Self {
        self.depth_limit = limit;
        self
    }

    /// Query whether incremental mode is enabled.
    pub fn wait(&self) -> bool {
        self.wait
    }

    /// Query whether a newline acts as the end of input.
    pub fn alternate_eof(&self) -> bool {
        self.alternate_eof
    }

    /// Query the source name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Query the nesting limit.
    pub fn depth_limit(&self) -> usize {
        self.depth_limit
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::new()
    }
}

/// The result of reading one top-level form.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A complete form. It may be an error node, or contain one.
    Complete(Node),
    /// Incremental mode ran out of input inside a form. The parser has
    /// rewound to the start of the form; feed more input and parse again.
    Incomplete,
}

/// Why a production stopped without producing a node.
enum Halt {
    /// An error node, passed outward unchanged.
    Failed(Node),
    /// Input ran out in incremental mode; the port was rewound.
    Suspended,
}

type Step<T = Node> = std::result::Result<T, Halt>;

/// Parser for the textual representation of programs.
///
/// This type, given an input source, provides the [`parse`] method, which
/// reads a single top-level form from the input source.
///
/// [`parse`]: Parser::parse
pub struct Parser<R> {
    port: Port<R>,
    options: Options,
    depth: usize,
    continuation: Option<Box<dyn FnMut(usize)>>,
}

impl<R> Parser<R>
where
    R: Read,
{
    /// Create a parser from one of the possible input sources.
    ///
    /// Typically it is more convenient to use one of these methods instead:
    ///
    ///   - `Parser::from_str`
    ///   - `Parser::from_reader`
    pub fn new(read: R) -> Self {
        Parser::with_options(read, Options::default())
    }

    /// Create a customized parser from one of the possible input sources.
    pub fn with_options(read: R, options: Options) -> Self {
        let mut port = Port::new(read, options.name.clone());
        port.set_alternate_eof(options.alternate_eof);
        Parser {
            port,
            options,
            depth: 0,
            continuation: None,
        }
    }

    /// Install a hook that is called, with the current nesting depth, each
    /// time incremental mode needs more input to continue. An interactive
    /// shell typically prints its continuation prompt from here.
    pub fn with_continuation(mut self, hook: impl FnMut(usize) + 'static) -> Self {
        self.continuation = Some(Box::new(hook));
        self
    }
}

impl<R> Parser<IoRead<R>>
where
    R: io::Read,
{
    /// Creates a parser from an `io::Read`.
    pub fn from_reader(reader: R) -> Self {
        Parser::new(IoRead::new(reader))
    }

    /// Creates a customized parser from an `io::Read`.
    pub fn from_reader_custom(reader: R, options: Options) -> Self {
        Parser::with_options(IoRead::new(reader), options)
    }
}

impl<'a> Parser<StrRead<'a>> {
    /// Creates a parser from a `&str`.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &'a str) -> Self {
        Parser::new(StrRead::new(s))
    }

    /// Creates a customized parser from a `&str`.
    pub fn from_str_custom(s: &'a str, options: Options) -> Self {
        Parser::with_options(StrRead::new(s), options)
    }
}

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']')
}

impl<R: Read> Parser<R> {
    /// Read a single top-level form from the input source.
    ///
    /// Returns `None` at the end of input. In alternate-eof mode each call
    /// starts on a fresh line and empty lines are skipped; only an exhausted
    /// source ends the input.
    ///
    /// ```
    /// # use lispfront::parse::{Outcome, Parser};
    /// let mut parser = Parser::from_str("foo (1 2 3)");
    /// let mut forms = Vec::new();
    /// while let Some(Outcome::Complete(node)) = parser.parse() {
    ///     forms.push(node.to_string());
    /// }
    /// assert_eq!(forms, ["foo", "(1 2 3)"]);
    /// ```
    pub fn parse(&mut self) -> Option<Outcome> {
        self.depth = 0;
        if self.port.ended_at_newline() {
            // The previous form ended the line.
            self.port.reset();
        }
        loop {
            match self.skip_atmosphere() {
                Err(err) => return Some(Outcome::Complete(self.io_failure(err))),
                Ok(Some(_)) => break,
                Ok(None) => {
                    if self.port.ended_at_newline() {
                        self.port.reset();
                        continue;
                    }
                    return None;
                }
            }
        }
        self.port.mark();
        match self.read_top() {
            Ok(node) | Err(Halt::Failed(node)) => Some(Outcome::Complete(node)),
            Err(Halt::Suspended) => Some(Outcome::Incomplete),
        }
    }

    /// Read a single form, converting error nodes into errors.
    ///
    /// This expects a form to be actually present, and returns an `Err` when
    /// called at the end of input or when incremental mode needs more input.
    /// Use [`Parser::parse`] to handle these cases gracefully.
    pub fn parse_value(&mut self) -> Result<Node> {
        match self.parse() {
            Some(Outcome::Complete(node)) => match node.first_error() {
                Some(error) => Err(error.clone()),
                None => Ok(node),
            },
            Some(Outcome::Incomplete) | None => Err(self.error(ErrorCode::EofWhileParsingValue)),
        }
    }

    /// Check that only atmosphere (whitespace and comments) remains in the
    /// input. Call this after the last expected form has been parsed.
    pub fn end(&mut self) -> Result<()> {
        match self.skip_atmosphere() {
            Ok(None) => Ok(()),
            Ok(Some(_)) => Err(self.error(ErrorCode::TrailingCharacters)),
            Err(err) => Err(self.error(ErrorCode::Io(err.kind()))),
        }
    }

    /// Iterate over the complete forms of the input.
    ///
    /// Iteration stops at the end of input, or when incremental mode needs
    /// more input.
    pub fn iter(&mut self) -> Iter<'_, R> {
        Iter { parser: self }
    }

    /// Supply more text, to be read after any input still pending.
    pub fn feed(&mut self, text: &str) {
        self.port.feed(text);
    }

    /// Continue reading after the end of input was reached, e.g. with the
    /// next line in alternate-eof mode.
    pub fn reset(&mut self) {
        self.port.reset();
    }

    /// The underlying port.
    pub fn port(&self) -> &Port<R> {
        &self.port
    }

    /// The options this parser was created with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    fn location(&self) -> Option<Location> {
        Some(self.port.location())
    }

    fn error(&self, code: ErrorCode) -> Error {
        Error::read(code, code.to_string(), self.location())
    }

    fn fail(&self, code: ErrorCode, message: String) -> Halt {
        let node = Node::failure(Error::read(code, message, self.location()));
        tracing::debug!(?code, location = ?node.location(), "read error");
        Halt::Failed(node)
    }

    fn fail_with(&self, error: Error) -> Halt {
        tracing::debug!(code = ?error.code(), location = ?error.location(), "read error");
        Halt::Failed(Node::failure(error))
    }

    fn io_failure(&self, err: io::Error) -> Node {
        let code = ErrorCode::Io(err.kind());
        Node::failure(Error::read(code, err.to_string(), self.location()))
    }

    fn cue(&mut self) {
        tracing::trace!(depth = self.depth, "waiting for more input");
        if let Some(hook) = self.continuation.as_mut() {
            hook(self.depth);
        }
    }

    /// Called when input ran out while `code` describes what was being read.
    /// Returns `Ok(())` if reading may continue.
    fn await_input(&mut self, code: ErrorCode) -> Step<()> {
        if !self.options.wait {
            return Err(self.fail(code, code.to_string()));
        }
        if self.port.is_exhausted() {
            self.port.rewind();
            return Err(Halt::Suspended);
        }
        self.cue();
        self.port.reset();
        Ok(())
    }

    fn next_char(&mut self) -> Step<Option<char>> {
        self.port
            .next_char()
            .map_err(|err| Halt::Failed(self.io_failure(err)))
    }

    /// Consumes whitespace and comments. Returns the first other character
    /// without consuming it, or `None` at the end of input.
    fn skip_atmosphere(&mut self) -> io::Result<Option<char>> {
        loop {
            match self.port.next_char()? {
                None => return Ok(None),
                Some(c) if c.is_whitespace() => {}
                Some(';') => {
                    while let Some(c) = self.port.next_char()? {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some(c) => {
                    self.port.push_back(c);
                    return Ok(Some(c));
                }
            }
        }
    }

    /// Like `skip_atmosphere`, but waits for more input in incremental mode.
    fn peek_significant(&mut self, code: ErrorCode) -> Step<char> {
        loop {
            match self.skip_atmosphere() {
                Ok(Some(c)) => return Ok(c),
                Ok(None) => self.await_input(code)?,
                Err(err) => return Err(Halt::Failed(self.io_failure(err))),
            }
        }
    }

    fn read_top(&mut self) -> Step {
        self.peek_significant(ErrorCode::EofWhileParsingValue)?;
        let c = match self.next_char()? {
            Some(c) => c,
            None => {
                let code = ErrorCode::EofWhileParsingValue;
                return Err(self.fail(code, code.to_string()));
            }
        };
        let location = self.location();
        match c {
            '\'' => self.read_quoted("quote", location),
            '`' => self.read_quoted("quasiquote", location),
            ',' => match self.next_char()? {
                Some('@') => self.read_quoted("unquote-splicing", location),
                Some(c) => {
                    self.port.push_back(c);
                    self.read_quoted("unquote", location)
                }
                None => self.read_quoted("unquote", location),
            },
            '#' => self.read_hash(location),
            '(' => self.read_sequence(')', false, location),
            '[' => self.read_sequence(']', false, location),
            '"' => self.read_string(location),
            ')' | ']' => Err(self.fail(
                ErrorCode::UnexpectedCharacter,
                format!("unexpected character `{}`", c),
            )),
            c => {
                let text = self.read_atom_text(c)?;
                Ok(Node::leaf(text).with_location(location))
            }
        }
    }

    fn read_quoted(&mut self, name: &str, location: Option<Location>) -> Step {
        let datum = self.nested(|parser| parser.read_top())?;
        Ok(Node::quoted(name, datum).with_location(location))
    }

    /// Runs `read` one nesting level deeper, failing past the depth limit.
    fn nested<T>(&mut self, read: impl FnOnce(&mut Self) -> Step<T>) -> Step<T> {
        if self.depth >= self.options.depth_limit {
            let code = ErrorCode::RecursionLimitExceeded;
            return Err(self.fail(code, code.to_string()));
        }
        self.depth += 1;
        let ret = read(self);
        self.depth -= 1;
        ret
    }

    /// Accumulates `first` and the following non-delimiter characters.
    fn read_atom_text(&mut self, first: char) -> Step<String> {
        let mut text = String::new();
        text.push(first);
        while let Some(c) = self.next_char()? {
            if is_delimiter(c) {
                self.port.push_back(c);
                break;
            }
            text.push(c);
        }
        Ok(text)
    }

    fn read_hash(&mut self, location: Option<Location>) -> Step {
        let next = loop {
            match self.next_char()? {
                None if self.options.wait => self.await_input(ErrorCode::EofWhileParsingValue)?,
                next => break next,
            }
        };
        match next {
            Some('(') => self.read_sequence(')', true, location),
            Some('[') => self.read_sequence(']', true, location),
            Some('\'') => self.read_quoted("syntax", location),
            Some('\\') => self.read_character(location),
            Some(c) if !is_delimiter(c) => {
                let text = self.read_atom_text(c)?;
                self.expand_shorthand(&text, location)
            }
            other => {
                if let Some(c) = other {
                    self.port.push_back(c);
                }
                self.expand_shorthand("", location)
            }
        }
    }

    fn read_character(&mut self, location: Option<Location>) -> Step {
        loop {
            match self.next_char()? {
                Some(c) => return Ok(Node::leaf(format!("#\\{}", c)).with_location(location)),
                None => {
                    if self.port.ended_at_newline() && self.options.wait {
                        // The newline itself is the character.
                        self.cue();
                        self.port.reset();
                        return Ok(Node::leaf("#\\\n").with_location(location));
                    }
                    self.await_input(ErrorCode::EofWhileParsingCharacter)?;
                }
            }
        }
    }

    fn expand_shorthand(&mut self, text: &str, location: Option<Location>) -> Step {
        match text {
            "t" => Ok(Node::leaf("true").with_location(location)),
            "f" => Ok(Node::leaf("false").with_location(location)),
            _ => {
                let token = Node::leaf(format!("#{}", text)).with_location(location);
                let message = format!("bad syntax `#{}`", text);
                let error =
                    Error::syntax(None, message, &token, None).with_code(ErrorCode::BadShorthand);
                Err(self.fail_with(error))
            }
        }
    }

    fn read_string(&mut self, location: Option<Location>) -> Step {
        let mut text = String::from("\"");
        loop {
            match self.next_char()? {
                Some('"') => {
                    text.push('"');
                    return Ok(Node::leaf(text).with_location(location));
                }
                Some('\\') => {
                    text.push('\\');
                    let escaped = loop {
                        match self.next_char()? {
                            Some(c) => break c,
                            None => {
                                let newline = self.port.ended_at_newline();
                                self.await_input(ErrorCode::EofWhileParsingString)?;
                                if newline {
                                    break '\n';
                                }
                            }
                        }
                    };
                    text.push(escaped);
                }
                Some(c) => text.push(c),
                None => {
                    let newline = self.port.ended_at_newline();
                    self.await_input(ErrorCode::EofWhileParsingString)?;
                    if newline {
                        text.push('\n');
                    }
                }
            }
        }
    }

    fn read_sequence(&mut self, close: char, vector: bool, location: Option<Location>) -> Step {
        let children = self.nested(|parser| parser.read_elements(close, vector))?;

        if vector {
            Ok(Node::vector(children).with_location(location))
        } else {
            rewrite::list(children, location).map_err(|error| self.fail_with(error))
        }
    }

    fn read_elements(&mut self, close: char, vector: bool) -> Step<Vec<Node>> {
        let eof = if vector {
            ErrorCode::EofWhileParsingVector
        } else {
            ErrorCode::EofWhileParsingList
        };
        let mut children = Vec::new();
        loop {
            match self.peek_significant(eof)? {
                c @ (')' | ']') => {
                    self.next_char()?;
                    if c != close {
                        return Err(self.fail(
                            ErrorCode::MismatchedBracket,
                            format!("mismatched parenthesis: expected `{}`, found `{}`", close, c),
                        ));
                    }
                    return Ok(children);
                }
                _ => children.push(self.read_top()?),
            }
        }
    }
}

/// Iterator over the complete forms of a parser's input, see
/// [`Parser::iter`].
pub struct Iter<'p, R> {
    parser: &'p mut Parser<R>,
}

impl<'p, R: Read> Iterator for Iter<'p, R> {
    type Item = Node;

    fn next(&mut self) -> Option<Node> {
        match self.parser.parse()? {
            Outcome::Complete(node) => Some(node),
            Outcome::Incomplete => None,
        }
    }
}

fn from_trait<R>(read: R, options: Options) -> Result<Node>
where
    R: Read,
{
    let mut parser = Parser::with_options(read, options);
    let value = parser.parse_value()?;
    parser.end()?;

    Ok(value)
}

/// Parse a single form from an IO stream.
///
/// When reading from a source against which short reads are not efficient,
/// such as a [`File`](std::fs::File), you will want to apply your own
/// buffering, e.g. using [`std::io::BufReader`].
pub fn from_reader_custom(rdr: impl io::Read, options: Options) -> Result<Node> {
    from_trait(IoRead::new(rdr), options)
}

/// Parse a single form from an IO stream, using the default options.
pub fn from_reader(rdr: impl io::Read) -> Result<Node> {
    from_reader_custom(rdr, Options::default())
}

/// Parse a single form from a string.
///
/// ```
/// let node = lispfront::from_str_custom("(a (nested) list)", lispfront::parse::Options::new());
/// assert_eq!(node.unwrap().arity(), 3);
/// ```
pub fn from_str_custom(s: &str, options: Options) -> Result<Node> {
    from_trait(StrRead::new(s), options)
}

/// Parse a single form from a string, using the default options.
///
/// Error nodes are converted into errors: the first error found in the tree
/// is returned.
pub fn from_str(s: &str) -> Result<Node> {
    from_str_custom(s, Options::default())
}

#[cfg(test)]
mod tests;
