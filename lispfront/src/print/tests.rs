use super::*;
use crate::error::Error;

fn sample() -> Node {
    Node::list(vec![
        "define".into(),
        Node::pair("a".into(), "b".into()),
        Node::vector(vec!["1".into(), "\"two\"".into()]),
        Node::list(vec![]),
    ])
}

#[test]
fn test_default() {
    assert_eq!(to_string(&sample()).unwrap(), "(define (a . b) #(1 \"two\") ())");
}

#[test]
fn test_vector_style() {
    let options = Options::new().with_vector_style(VectorStyle::Brackets);
    assert_eq!(
        to_string_custom(&sample(), options).unwrap(),
        "(define (a . b) #[1 \"two\"] ())"
    );
}

#[test]
fn test_pair_with_list_tail_is_not_normalized() {
    let node = Node::pair("a".into(), Node::list(vec!["b".into(), "c".into()]));
    assert_eq!(to_string(&node).unwrap(), "(a . (b c))");
}

#[test]
fn test_error_nodes() {
    struct Marked;

    impl Formatter for Marked {
        fn write_error<W: ?Sized>(&mut self, writer: &mut W, text: &str) -> io::Result<()>
        where
            W: io::Write,
        {
            write!(writer, "#<error {}>", text)
        }
    }

    let node = Node::list(vec!["a".into(), Node::failure(Error::user(None, "boom"))]);
    assert_eq!(to_string(&node).unwrap(), "(a boom)");

    let mut printer = Printer::with_formatter(Vec::new(), Marked);
    printer.print(&node).unwrap();
    assert_eq!(printer.into_inner(), b"(a #<error boom>)");
}
