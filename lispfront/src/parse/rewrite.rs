//! Rewrites applied to the children of a list right after it was read.

use crate::error::{Error, ErrorCode, Result};
use crate::node::{Location, Node};

/// Build the node for a list with the given children.
///
/// - `(a . b)` becomes a dotted pair of `a` and `b`.
/// - Two dots enclosing a single element move that element to the front, so
///   `(x . op . y)` becomes `(op x y)`. Three elements around two dots are
///   spliced too, so `(a . b . c)` reads as `(b a c)` and is not an
///   illegal-dot error.
///
/// Any other occurrence of a lone `.` is an error, e.g. `(. a)`, `(a . b c)`
/// or `(a . b . c . d)`.
pub(super) fn list(mut children: Vec<Node>, location: Option<Location>) -> Result<Node> {
    let dots: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, child)| child.is_dot())
        .map(|(i, _)| i)
        .collect();

    match *dots.as_slice() {
        [] => Ok(Node::list(children).with_location(location)),
        [1] if children.len() == 3 => match <[Node; 3]>::try_from(children) {
            Ok([car, _, cdr]) => Ok(Node::pair(car, cdr).with_location(location)),
            Err(children) => Err(illegal_dot(Node::list(children), location)),
        },
        [first, second] if second == first + 2 => {
            children.remove(second);
            let head = children.remove(first + 1);
            children.remove(first);
            children.insert(0, head);
            Ok(Node::list(children).with_location(location))
        }
        _ => Err(illegal_dot(Node::list(children), location)),
    }
}

fn illegal_dot(list: Node, location: Option<Location>) -> Error {
    let list = list.with_location(location);
    Error::syntax(None, "illegal use of `.`", &list, None).with_code(ErrorCode::IllegalDot)
}
