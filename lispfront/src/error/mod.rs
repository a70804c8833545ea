//! Structured error values.
//!
//! An [`Error`] is produced both by the reader, which embeds it in an error
//! node instead of failing, and by later stages such as argument and arity
//! checks. Every error carries a message, an optional origin tag naming the
//! procedure or form that raised it, an ordered table of description entries
//! and a call trace.
//!
//! The trace is ordered from the outermost call to the innermost one.
//! Consecutive frames with the same name are collapsed into a single frame
//! marked as repeated, so a deep self-recursion reports one line instead of
//! thousands.

use std::error;
use std::fmt::{self, Debug, Display};
use std::io;
use std::result;

use crate::node::{Location, Node};

mod format;

pub use self::format::{format_message, Arg};

/// A structured error value.
#[derive(Clone)]
pub struct Error {
    /// This `Box` allows us to keep the size of `Error` as small as possible,
    /// which matters as error nodes are stored inline in syntax trees.
    err: Box<ErrorImpl>,
}

/// Alias for a `Result` with the error type `lispfront::Error`.
pub type Result<T> = result::Result<T, Error>;

#[derive(Clone)]
struct ErrorImpl {
    category: Category,
    code: Option<ErrorCode>,
    message: String,
    origin: Option<String>,
    description: Vec<(String, String)>,
    frames: Vec<Frame>,
}

/// Categorizes the cause of an `Error`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Category {
    /// The input ended inside an unfinished form.
    Eof,
    /// The input is not syntactically valid.
    Syntax,
    /// A procedure received an argument of the wrong kind.
    Argument,
    /// A procedure received the wrong number of arguments.
    Arity,
    /// An error raised with a free-form message.
    User,
    /// Reading from the character source failed.
    Io,
}

/// Reader error codes.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum ErrorCode {
    /// The character source failed.
    Io(io::ErrorKind),

    /// EOF while parsing a list.
    EofWhileParsingList,

    /// EOF while parsing a vector.
    EofWhileParsingVector,

    /// EOF while parsing a string.
    EofWhileParsingString,

    /// EOF while parsing a character literal.
    EofWhileParsingCharacter,

    /// EOF where a value was expected, e.g. after a quote.
    EofWhileParsingValue,

    /// The `.` tail marker was used in a position where it has no meaning.
    IllegalDot,

    /// A character that starts no valid production.
    UnexpectedCharacter,

    /// A `#`-prefixed token that is not a known shorthand literal.
    BadShorthand,

    /// A list was closed with a bracket of the wrong kind.
    MismatchedBracket,

    /// Nesting exceeded the configured depth limit.
    RecursionLimitExceeded,

    /// Non-whitespace input after the value.
    TrailingCharacters,
}

impl ErrorCode {
    fn category(self) -> Category {
        match self {
            ErrorCode::Io(_) => Category::Io,
            ErrorCode::EofWhileParsingList
            | ErrorCode::EofWhileParsingVector
            | ErrorCode::EofWhileParsingString
            | ErrorCode::EofWhileParsingCharacter
            | ErrorCode::EofWhileParsingValue => Category::Eof,
            ErrorCode::IllegalDot
            | ErrorCode::UnexpectedCharacter
            | ErrorCode::BadShorthand
            | ErrorCode::MismatchedBracket
            | ErrorCode::RecursionLimitExceeded
            | ErrorCode::TrailingCharacters => Category::Syntax,
        }
    }
}

impl Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ErrorCode::Io(kind) => write!(f, "I/O error: {:?}", kind),
            ErrorCode::EofWhileParsingList => f.write_str("EOF while parsing a list"),
            ErrorCode::EofWhileParsingVector => f.write_str("EOF while parsing a vector"),
            ErrorCode::EofWhileParsingString => f.write_str("EOF while parsing a string"),
            ErrorCode::EofWhileParsingCharacter => {
                f.write_str("EOF while parsing a character constant")
            }
            ErrorCode::EofWhileParsingValue => f.write_str("EOF while parsing a value"),
            ErrorCode::IllegalDot => f.write_str("illegal use of `.`"),
            ErrorCode::UnexpectedCharacter => f.write_str("unexpected character"),
            ErrorCode::BadShorthand => f.write_str("bad syntax"),
            ErrorCode::MismatchedBracket => f.write_str("mismatched parenthesis"),
            ErrorCode::RecursionLimitExceeded => f.write_str("recursion limit exceeded"),
            ErrorCode::TrailingCharacters => f.write_str("trailing characters"),
        }
    }
}

/// One entry of a call trace.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    location: Option<Location>,
    name: Option<String>,
    repeated: bool,
}

impl Frame {
    /// Where the call happened, if known.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Name of the called procedure, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// True if the call was immediately followed by further calls to the
    /// same procedure that were collapsed into this frame.
    pub fn is_repeated(&self) -> bool {
        self.repeated
    }
}

impl Error {
    fn new(category: Category, origin: Option<&str>, message: impl Into<String>) -> Self {
        Error {
            err: Box::new(ErrorImpl {
                category,
                code: None,
                message: message.into(),
                origin: origin.map(String::from),
                description: Vec::new(),
                frames: Vec::new(),
            }),
        }
    }

    /// An error raised by the reader for a lexical problem such as a
    /// premature end of input. The location becomes the first trace frame.
    pub(crate) fn read(code: ErrorCode, message: String, location: Option<Location>) -> Self {
        let mut error = Error::new(code.category(), None, message);
        error.err.code = Some(code);
        if location.is_some() {
            error.add_trace(location, None);
        }
        error
    }

    pub(crate) fn with_code(mut self, code: ErrorCode) -> Self {
        self.err.code = Some(code);
        self
    }

    /// A syntax error in `expr`.
    ///
    /// The description table receives an `in` entry with the rendered
    /// expression and, if `sub` is given, an `at` entry naming the offending
    /// sub-expression. If `expr` has a source location, it is recorded as the
    /// first trace frame.
    pub fn syntax(
        origin: Option<&str>,
        message: impl Into<String>,
        expr: &Node,
        sub: Option<&Node>,
    ) -> Self {
        let mut error = Error::new(Category::Syntax, origin, message);
        error.describe("in", expr.to_string());
        if let Some(sub) = sub {
            error.describe("at", sub.to_string());
        }
        if let Some(location) = expr.location() {
            error.add_trace(Some(location.clone()), None);
        }
        error
    }

    /// A contract violation: `origin` expected an argument satisfying the
    /// predicate `expected`.
    ///
    /// `given` is the offending value, rendered with its `Display`
    /// implementation; `position` is the zero-based argument index, reported
    /// as an ordinal such as `1st`.
    pub fn argument(
        origin: &str,
        expected: &str,
        given: Option<&dyn Display>,
        position: Option<usize>,
    ) -> Self {
        let mut error = Error::new(Category::Argument, Some(origin), "contract violation");
        error.describe("expected", expected);
        if let Some(given) = given {
            error.describe("given", given.to_string());
        }
        if let Some(position) = position {
            error.describe("location", ordinal(position));
        }
        error
    }

    /// `origin` was called with `got` arguments, but accepts between `min`
    /// and `max` (`None` meaning no upper bound).
    pub fn arity(origin: &str, min: usize, max: Option<usize>, got: usize) -> Self {
        let mut error = Error::new(Category::Arity, Some(origin), "arity mismatch");
        error.describe("expected", arity_expectation(min, max));
        let mut buffer = itoa::Buffer::new();
        error.describe("got", buffer.format(got));
        error
    }

    /// An error with a free-form message.
    pub fn user(origin: Option<&str>, message: impl Into<String>) -> Self {
        Error::new(Category::User, origin, message)
    }

    /// An error whose message is built from a `~`-directive format string.
    ///
    /// ```
    /// use lispfront::error::{Arg, Error};
    ///
    /// let error = Error::format(Some("vector-ref"), "index ~d out of range for ~a", &[
    ///     Arg::Int(7),
    ///     Arg::Str("#(1 2)"),
    /// ]);
    /// assert_eq!(error.message(), "index 7 out of range for #(1 2)");
    /// ```
    pub fn format(origin: Option<&str>, fmt: &str, args: &[Arg<'_>]) -> Self {
        Error::user(origin, format_message(fmt, args))
    }

    /// Append an entry to the description table.
    pub fn describe(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.err.description.push((key.into(), value.into()));
    }

    /// Builder-style variant of [`describe`](Error::describe).
    pub fn with_description(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.describe(key, value);
        self
    }

    /// Record a call in the trace.
    ///
    /// If the innermost frame so far has the same name, it is marked as
    /// repeated instead of adding a new frame. Unnamed frames never
    /// collapse.
    pub fn add_trace(&mut self, location: Option<Location>, name: Option<&str>) {
        if let (Some(name), Some(last)) = (name, self.err.frames.last_mut()) {
            if last.name.as_deref() == Some(name) {
                last.repeated = true;
                return;
            }
        }
        self.err.frames.push(Frame {
            location,
            name: name.map(String::from),
            repeated: false,
        });
    }

    /// The error message, without origin or description.
    pub fn message(&self) -> &str {
        &self.err.message
    }

    /// The origin tag, typically a procedure or form name.
    pub fn origin(&self) -> Option<&str> {
        self.err.origin.as_deref()
    }

    /// The description table, in insertion order.
    pub fn description(&self) -> &[(String, String)] {
        &self.err.description
    }

    /// Look up the first description entry with the given key.
    pub fn detail(&self, key: &str) -> Option<&str> {
        self.err
            .description
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The call trace, outermost frame first.
    pub fn frames(&self) -> &[Frame] {
        &self.err.frames
    }

    /// Location of the error, taken from the outermost trace frame.
    pub fn location(&self) -> Option<&Location> {
        self.err.frames.first().and_then(Frame::location)
    }

    /// The reader error code, for errors produced while parsing.
    pub fn code(&self) -> Option<ErrorCode> {
        self.err.code
    }

    /// Categorizes the cause of this error.
    pub fn classify(&self) -> Category {
        self.err.category
    }

    /// Returns true if this error was caused by prematurely reaching the end of
    /// the input data.
    ///
    /// Interactive callers may want to read more input and try again.
    pub fn is_eof(&self) -> bool {
        self.classify() == Category::Eof
    }

    /// Returns true if this error was caused by syntactically invalid input.
    pub fn is_syntax(&self) -> bool {
        self.classify() == Category::Syntax
    }
}

/// Render a zero-based position as a one-based English ordinal.
///
/// ```
/// assert_eq!(lispfront::error::ordinal(0), "1st");
/// assert_eq!(lispfront::error::ordinal(10), "11th");
/// assert_eq!(lispfront::error::ordinal(20), "21st");
/// ```
pub fn ordinal(index: usize) -> String {
    let n = index.saturating_add(1);
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    let mut buffer = itoa::Buffer::new();
    let mut s = String::from(buffer.format(n));
    s.push_str(suffix);
    s
}

/// Describe an accepted argument count: the exact count if `min == max`,
/// `at least N` without an upper bound and `between N and M` otherwise.
pub fn arity_expectation(min: usize, max: Option<usize>) -> String {
    let mut buffer = itoa::Buffer::new();
    match max {
        Some(max) if max == min => buffer.format(min).to_owned(),
        None => format!("at least {}", buffer.format(min)),
        Some(max) => {
            let low = buffer.format(min).to_owned();
            format!("between {} and {}", low, buffer.format(max))
        }
    }
}

impl From<Error> for io::Error {
    /// Convert a `lispfront::Error` into an `io::Error`.
    ///
    /// End-of-input errors become `UnexpectedEof`, errors of the character
    /// source keep their kind and everything else becomes `InvalidData`.
    fn from(error: Error) -> Self {
        let kind = match (error.code(), error.classify()) {
            (Some(ErrorCode::Io(kind)), _) => kind,
            (_, Category::Eof) => io::ErrorKind::UnexpectedEof,
            _ => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, error)
    }
}

impl error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let err = &*self.err;
        match &err.origin {
            Some(origin) => write!(f, "{}: {}", origin, err.message)?,
            None => f.write_str(&err.message)?,
        }
        for (key, value) in &err.description {
            write!(f, "\n  {}: {}", key, value)?;
        }
        if !err.frames.is_empty() {
            f.write_str("\n  context...:")?;
            for frame in &err.frames {
                f.write_str("\n   ")?;
                match &frame.location {
                    Some(location) => Display::fmt(location, f)?,
                    None => f.write_str("?")?,
                }
                if let Some(name) = &frame.name {
                    write!(f, " {}", name)?;
                }
                if frame.repeated {
                    f.write_str(" (repeated)")?;
                }
            }
        }
        Ok(())
    }
}

// Keep the debug representation to one line; it is what unwrap() shows.
impl Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location() {
            Some(loc) => write!(
                f,
                "Error({:?}, line: {}, column: {})",
                self.err.message,
                loc.row(),
                loc.column(),
            ),
            None => write!(f, "Error({:?})", self.err.message),
        }
    }
}
