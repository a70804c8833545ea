//! Syntax trees produced by the reader.
//!
//! A [`Node`] is either a *leaf*, carrying the text of a single token, or an
//! *interior* node holding an ordered, non-empty sequence of children. The
//! arity of a node is the number of its children; leaves have arity zero.
//! Empty forms such as `()` and `#()` are leaves whose text is the form
//! itself, so that every interior node has at least one child.
//!
//! Reader failures do not abort parsing. Instead, the reader returns an
//! *error node*: a leaf whose text is the error message and which carries the
//! complete [`Error`] value. A tree containing an error node anywhere is
//! invalid, see [`Node::is_valid`].

use std::fmt;
use std::sync::Arc;

use crate::error::Error;
use crate::print;

/// The source location a node was read from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    name: Arc<str>,
    row: usize,
    column: usize,
}

impl Location {
    /// Construct a location from a source name and position.
    pub fn new(name: impl Into<Arc<str>>, row: usize, column: usize) -> Self {
        Location {
            name: name.into(),
            row,
            column,
        }
    }

    /// Label of the source, e.g. a file name or `<stdin>`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// One-based row (line) number.
    pub fn row(&self) -> usize {
        self.row
    }

    /// One-based column of the first character of the token or bracket.
    pub fn column(&self) -> usize {
        self.column
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.name, self.row, self.column)
    }
}

/// The kind of an interior node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// A proper list, written `(a b c)`.
    List,
    /// A dotted pair, written `(a . b)`; always has exactly two children.
    Pair,
    /// A vector, written `#(a b c)`.
    Vector,
}

#[derive(Debug, Clone)]
enum Data {
    Leaf(Box<str>),
    Interior(Shape, Vec<Node>),
}

/// A node of a syntax tree.
///
/// Cloning a node copies the whole tree below it; dropping it frees the whole
/// tree. Equality is structural and ignores source locations.
#[derive(Debug, Clone)]
pub struct Node {
    data: Data,
    location: Option<Location>,
    error: Option<Error>,
}

impl Node {
    /// Construct a leaf node.
    ///
    /// # Panics
    ///
    /// Panics if `text` is empty; leaves always carry a token.
    pub fn leaf(text: impl Into<Box<str>>) -> Self {
        let text = text.into();
        assert!(!text.is_empty(), "leaf nodes must carry non-empty text");
        Node {
            data: Data::Leaf(text),
            location: None,
            error: None,
        }
    }

    /// Construct a list node. An empty list becomes the leaf `()`.
    pub fn list(children: Vec<Node>) -> Self {
        Self::interior(Shape::List, children, "()")
    }

    /// Construct a vector node. An empty vector becomes the leaf `#()`.
    pub fn vector(children: Vec<Node>) -> Self {
        Self::interior(Shape::Vector, children, "#()")
    }

    /// Construct a dotted pair.
    pub fn pair(car: Node, cdr: Node) -> Self {
        Node {
            data: Data::Interior(Shape::Pair, vec![car, cdr]),
            location: None,
            error: None,
        }
    }

    /// Construct the two-element wrapper `(name datum)`, as produced for the
    /// quote family of shorthands.
    pub fn quoted(name: &str, datum: Node) -> Self {
        Node::list(vec![Node::leaf(name), datum])
    }

    /// Construct an error node carrying `error`.
    ///
    /// The node is a leaf whose text is the error message; it inherits the
    /// location of the error's first trace frame, if any.
    pub fn failure(error: Error) -> Self {
        let message = error.message();
        let text: Box<str> = if message.is_empty() {
            "error".into()
        } else {
            message.into()
        };
        let location = error.frames().first().and_then(|f| f.location().cloned());
        Node {
            data: Data::Leaf(text),
            location,
            error: Some(error),
        }
    }

    fn interior(shape: Shape, children: Vec<Node>, empty: &str) -> Self {
        let data = if children.is_empty() {
            Data::Leaf(empty.into())
        } else {
            Data::Interior(shape, children)
        };
        Node {
            data,
            location: None,
            error: None,
        }
    }

    /// Attach a source location, replacing any previous one.
    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }

    /// Number of children; zero for leaves.
    pub fn arity(&self) -> usize {
        self.children().len()
    }

    /// The children of an interior node, or an empty slice for a leaf.
    pub fn children(&self) -> &[Node] {
        match &self.data {
            Data::Leaf(_) => &[],
            Data::Interior(_, children) => children,
        }
    }

    /// Consume the node, returning its children.
    pub fn into_children(self) -> Vec<Node> {
        match self.data {
            Data::Leaf(_) => Vec::new(),
            Data::Interior(_, children) => children,
        }
    }

    /// The text of a leaf, or `None` for interior nodes.
    pub fn text(&self) -> Option<&str> {
        match &self.data {
            Data::Leaf(text) => Some(text),
            Data::Interior(..) => None,
        }
    }

    /// The kind of an interior node, or `None` for leaves.
    pub fn shape(&self) -> Option<Shape> {
        match &self.data {
            Data::Leaf(_) => None,
            Data::Interior(shape, _) => Some(*shape),
        }
    }

    /// Returns true for leaf nodes.
    pub fn is_leaf(&self) -> bool {
        matches!(self.data, Data::Leaf(_))
    }

    /// Where the node was read from, if known.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Returns true if this node itself is an error node.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// The error carried by this node, if it is an error node.
    pub fn error(&self) -> Option<&Error> {
        self.error.as_ref()
    }

    /// Returns true if neither this node nor any descendant is an error node.
    ///
    /// This walks the whole tree on every call.
    pub fn is_valid(&self) -> bool {
        self.first_error().is_none()
    }

    /// The first error found in a pre-order walk of the tree.
    pub fn first_error(&self) -> Option<&Error> {
        if let Some(error) = &self.error {
            return Some(error);
        }
        self.children().iter().find_map(Node::first_error)
    }

    /// Returns true for a plain atom leaf with the given text.
    pub fn is_atom(&self, text: &str) -> bool {
        self.error.is_none() && self.text() == Some(text)
    }

    /// Returns true for the lone `.` token.
    pub(crate) fn is_dot(&self) -> bool {
        self.is_atom(".")
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Node) -> bool {
        if self.is_error() != other.is_error() {
            return false;
        }
        match (&self.data, &other.data) {
            (Data::Leaf(a), Data::Leaf(b)) => a == b,
            (Data::Interior(s1, c1), Data::Interior(s2, c2)) => s1 == s2 && c1 == c2,
            _ => false,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = print::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::leaf(text)
    }
}
