//! Converting syntax trees into text.
//!
//! # Terminology
//!
//! The process of serializing expressions to their textual representation is
//! referred to as "writing" in Lisp. To avoid confusion with Rust's `Write`
//! trait, `lispfront` uses "printing" instead.
//!
//! Leaves are printed verbatim, as the reader keeps the source text of every
//! token, so printing a tree read from valid input gives back text that reads
//! as an equal tree.

use std::io;

use crate::node::{Node, Shape};

/// Options for printing syntax trees.
#[derive(Clone, Debug, Default)]
pub struct Options {
    vector_style: VectorStyle,
}

impl Options {
    /// Construct the default printer options.
    pub fn new() -> Self {
        Options::default()
    }

    /// Set the style for printing vectors.
    pub fn with_vector_style(mut self, style: VectorStyle) -> Self {
        self.vector_style = style;
        self
    }
}

/// How to print vectors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VectorStyle {
    /// Use Scheme notation, i.e. `#(...)`.
    #[default]
    Octothorpe,
    /// Use `#[...]`, which the reader accepts as well.
    Brackets,
}

/// This trait abstracts away serializing the pieces of a syntax tree, which
/// allows the implementer to customize the output.
///
/// The default implementation produces compact, single-line Scheme text.
pub trait Formatter {
    /// Writes the text of a leaf to the specified writer.
    #[inline]
    fn write_leaf<W: ?Sized>(&mut self, writer: &mut W, text: &str) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(text.as_bytes())
    }

    /// Writes an error node to the specified writer. The default
    /// implementation writes the node's text, which is the error message.
    #[inline]
    fn write_error<W: ?Sized>(&mut self, writer: &mut W, text: &str) -> io::Result<()>
    where
        W: io::Write,
    {
        self.write_leaf(writer, text)
    }

    /// Called before any list elements.  Writes a `(` to the specified
    /// writer.
    #[inline]
    fn begin_list<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"(")
    }

    /// Called after all list elements have been written.  Writes a `)` to the
    /// specified writer.
    #[inline]
    fn end_list<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b")")
    }

    /// Called before starting to write a list or vector element. Writes a space
    /// to the specified writer, if needed.
    #[inline]
    fn begin_seq_element<W: ?Sized>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b" ")
        }
    }

    /// Called after every list or vector element.
    #[inline]
    fn end_seq_element<W: ?Sized>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        Ok(())
    }

    /// Called before any vector elements.  Writes `#(` to the specified
    /// writer.
    #[inline]
    fn begin_vector<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b"#(")
    }

    /// Called after all vector elements have been written.  Writes a `)` to the
    /// specified writer.
    #[inline]
    fn end_vector<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b")")
    }

    /// Called between the two halves of a dotted pair.  Writes a `.` to the
    /// specified writer.
    #[inline]
    fn write_dot<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        writer.write_all(b".")
    }
}

/// This structure prints a syntax tree on a single line, using Scheme
/// notation.
#[derive(Clone, Debug)]
pub struct DefaultFormatter;

impl Formatter for DefaultFormatter {}

/// A formatter which can be tuned via [`Options`].
#[derive(Clone, Debug)]
pub struct CustomizedFormatter {
    options: Options,
}

impl Formatter for CustomizedFormatter {
    fn begin_vector<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        match self.options.vector_style {
            VectorStyle::Octothorpe => writer.write_all(b"#("),
            VectorStyle::Brackets => writer.write_all(b"#["),
        }
    }

    fn end_vector<W: ?Sized>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: io::Write,
    {
        match self.options.vector_style {
            VectorStyle::Octothorpe => writer.write_all(b")"),
            VectorStyle::Brackets => writer.write_all(b"]"),
        }
    }
}

/// A printer for syntax trees.
#[derive(Debug)]
pub struct Printer<W, F = DefaultFormatter> {
    writer: W,
    formatter: F,
}

impl<W> Printer<W, CustomizedFormatter>
where
    W: io::Write,
{
    /// Construct a printer tuned given the specified options.
    pub fn with_options(writer: W, options: Options) -> Self {
        Printer {
            writer,
            formatter: CustomizedFormatter { options },
        }
    }
}

impl<W, F> Printer<W, F>
where
    W: io::Write,
    F: Formatter,
{
    /// Creates a new printer whose output will be written to the writer
    /// specified.
    #[inline]
    pub fn with_formatter(writer: W, formatter: F) -> Self {
        Printer { writer, formatter }
    }

    /// Unwrap the `Writer` from the `Printer`.
    #[inline]
    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Output the representation of the specified node to the underlying
    /// writer.
    pub fn print(&mut self, node: &Node) -> io::Result<()> {
        if let Some(text) = node.text() {
            return if node.is_error() {
                self.formatter.write_error(&mut self.writer, text)
            } else {
                self.formatter.write_leaf(&mut self.writer, text)
            };
        }
        match node.shape() {
            Some(Shape::Vector) => {
                self.formatter.begin_vector(&mut self.writer)?;
                self.write_elements(node.children())?;
                self.formatter.end_vector(&mut self.writer)
            }
            Some(Shape::Pair) => {
                self.formatter.begin_list(&mut self.writer)?;
                for (i, child) in node.children().iter().enumerate() {
                    if i > 0 {
                        self.formatter.begin_seq_element(&mut self.writer, false)?;
                        self.formatter.write_dot(&mut self.writer)?;
                        self.formatter.end_seq_element(&mut self.writer)?;
                    }
                    self.formatter.begin_seq_element(&mut self.writer, i == 0)?;
                    self.print(child)?;
                    self.formatter.end_seq_element(&mut self.writer)?;
                }
                self.formatter.end_list(&mut self.writer)
            }
            Some(Shape::List) | None => {
                self.formatter.begin_list(&mut self.writer)?;
                self.write_elements(node.children())?;
                self.formatter.end_list(&mut self.writer)
            }
        }
    }

    fn write_elements(&mut self, elements: &[Node]) -> io::Result<()> {
        for (i, element) in elements.iter().enumerate() {
            self.formatter.begin_seq_element(&mut self.writer, i == 0)?;
            self.print(element)?;
            self.formatter.end_seq_element(&mut self.writer)?;
        }
        Ok(())
    }
}

impl<W> Printer<W>
where
    W: io::Write,
{
    /// Creates a new printer.
    #[inline]
    pub fn new(writer: W) -> Self {
        Printer::with_formatter(writer, DefaultFormatter)
    }
}

impl<W, F> io::Write for Printer<W, F>
where
    W: io::Write,
{
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    #[inline]
    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Print the given node into the IO stream, using the default printer
/// options.
#[inline]
pub fn to_writer<W: io::Write>(writer: W, node: &Node) -> io::Result<()> {
    let mut printer = Printer::new(writer);
    printer.print(node)?;
    Ok(())
}

/// Print the given node into the IO stream.
#[inline]
pub fn to_writer_custom<W: io::Write>(writer: W, node: &Node, options: Options) -> io::Result<()> {
    let mut printer = Printer::with_options(writer, options);
    printer.print(node)?;
    Ok(())
}

/// Print the given node into a byte vector, using the default printer
/// options.
#[inline]
pub fn to_vec(node: &Node) -> io::Result<Vec<u8>> {
    let mut writer = Vec::with_capacity(128);
    to_writer(&mut writer, node)?;
    Ok(writer)
}

/// Print the given node into a byte vector.
#[inline]
pub fn to_vec_custom(node: &Node, options: Options) -> io::Result<Vec<u8>> {
    let mut writer = Vec::with_capacity(128);
    to_writer_custom(&mut writer, node, options)?;
    Ok(writer)
}

fn into_string(vec: Vec<u8>) -> io::Result<String> {
    String::from_utf8(vec).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Print the given node into a string, using the default printer options.
#[inline]
pub fn to_string(node: &Node) -> io::Result<String> {
    into_string(to_vec(node)?)
}

/// Print the given node into a string.
#[inline]
pub fn to_string_custom(node: &Node, options: Options) -> io::Result<String> {
    into_string(to_vec_custom(node, options)?)
}

#[cfg(test)]
mod tests;
