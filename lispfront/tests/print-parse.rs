use lispfront::node::Shape;
use lispfront::{parse, print, Node};

fn check_roundtrip_default(input: Node, printed: &str) {
    let string = lispfront::to_string(&input).expect("printing failed");
    assert_eq!(&string, printed);
    let output = lispfront::from_str(&string).expect("parsing failed");
    assert_eq!(input, output);
}

fn check_roundtrip_brackets(input: Node, printed: &str) {
    let options = print::Options::new().with_vector_style(print::VectorStyle::Brackets);
    let string = lispfront::to_string_custom(&input, options).expect("printing failed");
    assert_eq!(&string, printed);
    let output =
        lispfront::from_str_custom(&string, parse::Options::new()).expect("parsing failed");
    assert_eq!(input, output);
}

fn list(texts: &[&str]) -> Node {
    Node::list(texts.iter().map(|&t| Node::leaf(t)).collect())
}

#[test]
fn test_list() {
    check_roundtrip_default(list(&["1", "2", "3"]), "(1 2 3)");
}

#[test]
fn test_symbol() {
    check_roundtrip_default(Node::leaf("$?:!"), "$?:!");
}

static SPECIAL_INITIALS: &str = "!$%&*/:<=>?@^_~";

#[test]
fn test_special_symbols() {
    for initial in SPECIAL_INITIALS.chars() {
        let s = initial.to_string();
        check_roundtrip_default(Node::leaf(s.as_str()), &s);
    }
}

#[test]
fn test_peculiar_symbols() {
    for &peculiar in &["+", "+foo", "-", "-foo", "..", ".foo", "..."] {
        check_roundtrip_default(Node::leaf(peculiar), peculiar);
    }
}

#[test]
fn test_dotted_pair() {
    let pair = Node::pair(Node::leaf("a"), Node::leaf("b"));
    check_roundtrip_default(pair, "(a . b)");
    let nested = Node::pair(Node::leaf("a"), Node::pair(Node::leaf("b"), Node::leaf("c")));
    check_roundtrip_default(nested, "(a . (b . c))");
}

#[test]
fn test_vector() {
    let vector = Node::vector(vec![Node::leaf("1"), list(&["a", "b"])]);
    check_roundtrip_default(vector.clone(), "#(1 (a b))");
    check_roundtrip_brackets(vector, "#[1 (a b)]");
}

#[test]
fn test_empty_forms() {
    check_roundtrip_default(Node::list(vec![]), "()");
    check_roundtrip_default(Node::vector(vec![]), "#()");
    check_roundtrip_brackets(Node::vector(vec![]), "#()");
}

#[test]
fn test_quote_forms_read_as_lists() {
    let node = lispfront::from_str("'(a `b ,c ,@d)").unwrap();
    assert_eq!(
        node.to_string(),
        "(quote (a (quasiquote b) (unquote c) (unquote-splicing d)))"
    );
    assert_eq!(node.shape(), Some(Shape::List));
}

#[test]
fn test_literals_are_verbatim() {
    for &text in &["\"tab\\there\"", "#\\x", "#\\newline", "1e10", "#\\)"] {
        check_roundtrip_default(Node::leaf(text), text);
    }
}

#[test]
fn test_program() {
    let source = "
        ; factorial
        (define (fact n)
          (if (< n 2)
              1
              (* n (fact (- n 1)))))
        (display (fact 10))
    ";
    let mut parser = lispfront::Parser::from_str(source);
    let forms: Vec<_> = parser.iter().map(|node| node.to_string()).collect();
    assert_eq!(
        forms,
        [
            "(define (fact n) (if (< n 2) 1 (* n (fact (- n 1)))))",
            "(display (fact 10))"
        ]
    );
}
