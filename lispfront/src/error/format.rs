//! `~`-directive message formatting.

use std::fmt::{self, Write};

/// An argument for [`format_message`].
#[derive(Clone, Copy)]
pub enum Arg<'a> {
    /// Literal text, `~a`.
    Str(&'a str),
    /// A single character, `~c`.
    Char(char),
    /// A signed integer, `~d`.
    Int(i64),
    /// An unsigned integer, `~u`.
    Uint(u64),
    /// A floating point number, `~f`. Always printed with a decimal point.
    Float(f64),
    /// An embedded sub-buffer, `~b`; anything that can display itself.
    Buffer(&'a dyn fmt::Display),
}

impl<'a> fmt::Debug for Arg<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arg::Str(s) => f.debug_tuple("Str").field(s).finish(),
            Arg::Char(c) => f.debug_tuple("Char").field(c).finish(),
            Arg::Int(n) => f.debug_tuple("Int").field(n).finish(),
            Arg::Uint(n) => f.debug_tuple("Uint").field(n).finish(),
            Arg::Float(n) => f.debug_tuple("Float").field(n).finish(),
            Arg::Buffer(b) => f.debug_tuple("Buffer").field(&b.to_string()).finish(),
        }
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(s: &'a str) -> Self {
        Arg::Str(s)
    }
}

impl<'a> From<char> for Arg<'a> {
    fn from(c: char) -> Self {
        Arg::Char(c)
    }
}

impl<'a> From<i64> for Arg<'a> {
    fn from(n: i64) -> Self {
        Arg::Int(n)
    }
}

impl<'a> From<u64> for Arg<'a> {
    fn from(n: u64) -> Self {
        Arg::Uint(n)
    }
}

impl<'a> From<usize> for Arg<'a> {
    fn from(n: usize) -> Self {
        Arg::Uint(n as u64)
    }
}

impl<'a> From<f64> for Arg<'a> {
    fn from(n: f64) -> Self {
        Arg::Float(n)
    }
}

impl<'a> Arg<'a> {
    fn directive(&self) -> char {
        match self {
            Arg::Str(_) => 'a',
            Arg::Char(_) => 'c',
            Arg::Int(_) => 'd',
            Arg::Uint(_) => 'u',
            Arg::Float(_) => 'f',
            Arg::Buffer(_) => 'b',
        }
    }

    fn write_to(&self, out: &mut String) {
        match *self {
            Arg::Str(s) => out.push_str(s),
            Arg::Char(c) => out.push(c),
            Arg::Int(n) => out.push_str(itoa::Buffer::new().format(n)),
            Arg::Uint(n) => out.push_str(itoa::Buffer::new().format(n)),
            Arg::Float(n) => write_float(out, n),
            Arg::Buffer(b) => {
                // Writing into a String only fails if the Display impl does.
                let _ = write!(out, "{}", b);
            }
        }
    }
}

/// Expand a format string.
///
/// Each of the directives `~a`, `~c`, `~d`, `~u`, `~f` and `~b` consumes the
/// next argument; `~~` produces a literal tilde. Arguments are rendered
/// according to their own variant, a directive letter that does not match it
/// is only reported through `tracing`. Unknown directives are copied
/// verbatim, and a directive without an argument expands to nothing.
pub fn format_message(fmt: &str, args: &[Arg<'_>]) -> String {
    let mut out = String::with_capacity(fmt.len());
    let mut args = args.iter();
    let mut chars = fmt.chars();
    while let Some(c) = chars.next() {
        if c != '~' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('~') => out.push('~'),
            Some(d @ ('a' | 'c' | 'd' | 'u' | 'f' | 'b')) => match args.next() {
                Some(arg) => {
                    if arg.directive() != d {
                        tracing::warn!(
                            directive = %d,
                            argument = ?arg,
                            "format directive does not match argument"
                        );
                    }
                    arg.write_to(&mut out);
                }
                None => {
                    tracing::warn!(
                        directive = %d,
                        format = fmt,
                        "format directive without argument"
                    );
                }
            },
            Some(other) => {
                out.push('~');
                out.push(other);
            }
            None => out.push('~'),
        }
    }
    out
}

/// Floats are written in Scheme style: finite values always contain a
/// decimal point, the others are `+inf.0`, `-inf.0` and `+nan.0`.
fn write_float(out: &mut String, n: f64) {
    if n.is_nan() {
        out.push_str("+nan.0");
    } else if n.is_infinite() {
        out.push_str(if n > 0.0 { "+inf.0" } else { "-inf.0" });
    } else {
        let mut buffer = ryu::Buffer::new();
        let s = buffer.format_finite(n);
        if s.contains('.') {
            out.push_str(s);
        } else if let Some(e) = s.find('e') {
            out.push_str(&s[..e]);
            out.push_str(".0");
            out.push_str(&s[e..]);
        } else {
            out.push_str(s);
            out.push_str(".0");
        }
    }
}
