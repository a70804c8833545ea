use super::*;
use crate::node::Shape;

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

fn parse_one(s: &str) -> Node {
    match Parser::from_str(s).parse() {
        Some(Outcome::Complete(node)) => node,
        other => panic!("expected a complete form for {:?}, got {:?}", s, other),
    }
}

fn error_code(s: &str) -> Option<ErrorCode> {
    let node = parse_one(s);
    assert!(!node.is_valid(), "expected an error node for {:?}", s);
    node.first_error().and_then(Error::code)
}

#[test]
fn test_round_trip() {
    for &s in &[
        "(1 2 3)",
        "foo",
        "(a (b c) #(d e) \"f g\")",
        "(a . b)",
        "(quote x)",
        "()",
        "#()",
        "#\\a",
    ] {
        assert_eq!(from_str(s).unwrap().to_string(), s);
    }
}

#[test]
fn test_atoms() {
    let mut parser = Parser::from_str("foo-symbol :keyword 100 -4.5 |odd|");
    let atoms: Vec<_> = parser.iter().map(|node| node.to_string()).collect();
    assert_eq!(atoms, ["foo-symbol", ":keyword", "100", "-4.5", "|odd|"]);
    parser.end().unwrap();
}

#[test]
fn test_dotted_pair() {
    let node = from_str("(a . b)").unwrap();
    assert_eq!(node.shape(), Some(Shape::Pair));
    assert_eq!(node.children(), &[Node::leaf("a"), Node::leaf("b")][..]);

    let node = from_str("(a b c)").unwrap();
    assert_eq!(node.shape(), Some(Shape::List));
    assert_eq!(node.arity(), 3);
}

#[test]
fn test_illegal_dot() {
    for &s in &["(. a)", "(a . b c)", "(a .)", "(a . . b)", "(a . b . c . d)"] {
        assert_eq!(error_code(s), Some(ErrorCode::IllegalDot), "{}", s);
    }
    let err = from_str("(. a)").unwrap_err();
    assert_eq!(err.message(), "illegal use of `.`");
    assert_eq!(err.detail("in"), Some("(. a)"));
    assert!(err.is_syntax());
}

#[test]
fn test_ellipsis_splice() {
    assert_eq!(from_str("(x . y . z)").unwrap(), from_str("(y x z)").unwrap());
    assert_eq!(from_str("(1 . < . 2 3)").unwrap().to_string(), "(< 1 2 3)");
    assert_eq!(from_str("(a . b . c)").unwrap().to_string(), "(b a c)");
}

#[test]
fn test_vectors_are_not_rewritten() {
    let node = from_str("#(a . b)").unwrap();
    assert_eq!(node.shape(), Some(Shape::Vector));
    assert_eq!(node.arity(), 3);
}

#[test]
fn test_shorthands() {
    assert_eq!(from_str("#t").unwrap(), Node::leaf("true"));
    assert_eq!(from_str("#f").unwrap(), Node::leaf("false"));

    let err = from_str("#z").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::BadShorthand));
    assert!(err.message().contains('z'));
    assert_eq!(err.detail("in"), Some("#z"));

    let err = from_str("#true").unwrap_err();
    assert!(err.message().contains("true"));
    assert_eq!(error_code("#"), Some(ErrorCode::BadShorthand));
}

#[test]
fn test_quote_family() {
    for &(input, expected) in &[
        ("'x", "(quote x)"),
        ("`x", "(quasiquote x)"),
        (",x", "(unquote x)"),
        (",@x", "(unquote-splicing x)"),
        ("#'x", "(syntax x)"),
        ("'(a 'b)", "(quote (a (quote b)))"),
    ] {
        assert_eq!(from_str(input).unwrap().to_string(), expected, "{}", input);
    }
}

#[test]
fn test_brackets() {
    assert_eq!(from_str("[a b]").unwrap(), from_str("(a b)").unwrap());
    assert_eq!(from_str("#[a b]").unwrap(), from_str("#(a b)").unwrap());
    assert_eq!(error_code("(a b]"), Some(ErrorCode::MismatchedBracket));
    assert_eq!(error_code("[a b)"), Some(ErrorCode::MismatchedBracket));
}

#[test]
fn test_empty_forms() {
    let node = from_str("()").unwrap();
    assert!(node.is_leaf());
    assert_eq!(node.text(), Some("()"));
    assert_eq!(from_str("#( )").unwrap().text(), Some("#()"));
}

#[test]
fn test_unexpected_character() {
    let err = from_str(")").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::UnexpectedCharacter));
    assert_eq!(err.message(), "unexpected character `)`");
}

#[test]
fn test_strings() {
    let node = from_str(r#""hello \"world\"\n""#).unwrap();
    assert_eq!(node.text(), Some(r#""hello \"world\"\n""#));
    assert_eq!(from_str("\"a (b) ; c\"").unwrap().text(), Some("\"a (b) ; c\""));
    assert_eq!(error_code("\"abc"), Some(ErrorCode::EofWhileParsingString));
}

#[test]
fn test_chars() {
    for &s in &["#\\a", "#\\(", "#\\ ", "#\\\u{203D}"] {
        assert_eq!(from_str(s).unwrap().text(), Some(s));
    }
    // A character literal is the prefix plus exactly one character.
    assert_eq!(
        from_str("(#\\ab)").unwrap().children(),
        &[Node::leaf("#\\a"), Node::leaf("b")][..]
    );
    assert_eq!(
        from_str("(#\\) x)").unwrap().children(),
        &[Node::leaf("#\\)"), Node::leaf("x")][..]
    );
    assert_eq!(error_code("#\\"), Some(ErrorCode::EofWhileParsingCharacter));
}

#[test]
fn test_comments() {
    let mut parser = Parser::from_str("; leading\n(a ; inner\n b) ; trailing");
    assert_eq!(parser.parse_value().unwrap(), from_str("(a b)").unwrap());
    assert!(parser.parse().is_none());
    parser.end().unwrap();
}

#[test]
fn test_locations() {
    let options = Options::new().with_name("test.scm");
    let node = from_str_custom("\n (a\n   (b c))", options).unwrap();
    let loc = node.location().unwrap();
    assert_eq!((loc.name(), loc.row(), loc.column()), ("test.scm", 2, 2));
    let a = &node.children()[0];
    assert_eq!(a.location().map(|l| (l.row(), l.column())), Some((2, 3)));
    let inner = &node.children()[1];
    assert_eq!(inner.location().map(|l| (l.row(), l.column())), Some((3, 4)));
    let c = &inner.children()[1];
    assert_eq!(c.location().map(|l| (l.row(), l.column())), Some((3, 7)));
}

#[test]
fn test_error_location() {
    let err = from_str("(a\n #z)").unwrap_err();
    let loc = err.location().unwrap();
    assert_eq!((loc.row(), loc.column()), (2, 2));
}

#[test]
fn test_first_error_ends_list() {
    let node = parse_one("(a (b #z) c)");
    assert!(node.is_error());
    assert_eq!(node.error().and_then(Error::code), Some(ErrorCode::BadShorthand));
}

#[test]
fn test_depth_limit() {
    let options = Options::new().with_depth_limit(2);
    assert!(from_str_custom("((a))", options.clone()).is_ok());
    let err = from_str_custom("(((a)))", options).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::RecursionLimitExceeded));
}

#[test]
fn test_depth_limit_quotes() {
    let options = Options::new().with_depth_limit(2);
    let node = from_str_custom("''x", options.clone()).unwrap();
    assert_eq!(node.to_string(), "(quote (quote x))");
    let err = from_str_custom("'''x", options.clone()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::RecursionLimitExceeded));

    // Quote prefixes and brackets count towards the same limit.
    let err = from_str_custom("'('x)", options).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::RecursionLimitExceeded));

    // A long run of prefixes is an error node, not a stack overflow.
    let input = format!("{}x", "'".repeat(200_000));
    let mut parser = Parser::from_str_custom(&input, Options::new().with_depth_limit(128));
    let node = match parser.parse() {
        Some(Outcome::Complete(node)) => node,
        other => panic!("unexpected {:?}", other),
    };
    let code = node.first_error().and_then(Error::code);
    assert_eq!(code, Some(ErrorCode::RecursionLimitExceeded));
}

#[test]
fn test_eof_without_wait() {
    let err = from_str("(1 2").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::EofWhileParsingList));
    assert!(err.is_eof());
    assert_eq!(error_code("#(1"), Some(ErrorCode::EofWhileParsingVector));
    assert_eq!(error_code("'"), Some(ErrorCode::EofWhileParsingValue));
}

#[test]
fn test_empty_input() {
    assert!(Parser::from_str("").parse().is_none());
    assert!(Parser::from_str("  ; nothing\n").parse().is_none());
    assert_eq!(from_str(" ").unwrap_err().code(), Some(ErrorCode::EofWhileParsingValue));
}

#[test]
fn test_trailing_characters() {
    let err = from_str("a b").unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TrailingCharacters));
    assert!(from_str("a ; b").is_ok());
}

#[test]
fn test_incremental() {
    let mut parser = Parser::from_str_custom("(1 2", Options::new().with_wait(true));
    assert_eq!(parser.parse(), Some(Outcome::Incomplete));
    parser.feed(" 3)");
    assert_eq!(parser.parse(), Some(Outcome::Complete(from_str("(1 2 3)").unwrap())));
    assert_eq!(parser.parse(), None);
}

#[test]
fn test_incremental_string() {
    let mut parser = Parser::from_str_custom("\"abc", Options::new().with_wait(true));
    assert_eq!(parser.parse(), Some(Outcome::Incomplete));
    parser.feed("def\"");
    assert_eq!(parser.parse_value().unwrap().text(), Some("\"abcdef\""));
}

#[test]
fn test_incremental_keeps_locations() {
    let options = Options::new().with_wait(true);
    let mut parser = Parser::from_str_custom("x\n  (a", options);
    assert_eq!(parser.parse_value().unwrap(), Node::leaf("x"));
    assert_eq!(parser.parse(), Some(Outcome::Incomplete));
    parser.feed(" b)");
    let node = parser.parse_value().unwrap();
    let loc = node.location().unwrap();
    assert_eq!((loc.row(), loc.column()), (2, 3));
}

#[test]
fn test_continuation_across_lines() {
    let depths = Rc::new(RefCell::new(Vec::new()));
    let seen = depths.clone();
    let mut parser = Parser::from_str_custom("(a\n (b\nc))\n\n'\nd\n", Options::interactive())
        .with_continuation(move |depth| seen.borrow_mut().push(depth));

    assert_eq!(parser.parse_value().unwrap().to_string(), "(a (b c))");
    assert_eq!(*depths.borrow(), [1, 2]);
    assert_eq!(parser.parse_value().unwrap().to_string(), "(quote d)");
    assert_eq!(*depths.borrow(), [1, 2, 1]);
    assert_eq!(parser.parse(), None);
}

#[test]
fn test_interactive_string_keeps_newlines() {
    let mut parser = Parser::from_str_custom("\"a\nb\"", Options::interactive());
    assert_eq!(parser.parse_value().unwrap().text(), Some("\"a\nb\""));
}

#[test]
fn test_alternate_eof_without_wait() {
    let options = Options::new().with_alternate_eof(true);
    let mut parser = Parser::from_str_custom("(a\nb)", options);
    let node = match parser.parse() {
        Some(Outcome::Complete(node)) => node,
        other => panic!("unexpected {:?}", other),
    };
    assert_eq!(node.error().and_then(Error::code), Some(ErrorCode::EofWhileParsingList));

    let options = Options::new().with_alternate_eof(true);
    let mut parser = Parser::from_str_custom("a\nb", options);
    let forms: Vec<_> = parser.iter().map(|n| n.to_string()).collect();
    assert_eq!(forms, ["a", "b"]);
}

#[test]
fn test_alternate_eof_reads_every_line() {
    // Whether or not the form consumed the newline, the next line is read.
    for &(input, expected) in &[
        ("(a)\nb", &["(a)", "b"][..]),
        ("a\n(b)", &["a", "(b)"][..]),
        ("(a)\n\n; comment\n#(b)\n", &["(a)", "#(b)"][..]),
        ("'x\n\"y\"\nz\n", &["(quote x)", "\"y\"", "z"][..]),
    ] {
        for wait in [false, true] {
            let options = Options::new().with_alternate_eof(true).with_wait(wait);
            let mut parser = Parser::from_str_custom(input, options);
            let forms: Vec<_> = parser.iter().map(|n| n.to_string()).collect();
            assert_eq!(forms, expected, "{:?} (wait: {})", input, wait);
        }
    }
}

#[test]
fn test_reader() {
    let node = from_reader(Cursor::new("(λ (x) \"‽\")")).unwrap();
    assert_eq!(node.to_string(), "(λ (x) \"‽\")");

    let mut parser = Parser::from_reader(Cursor::new(&b"(a \xFF)"[..]));
    let err = parser.parse_value().unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::Io(io::ErrorKind::InvalidData)));
}

#[test]
fn test_options() {
    let options = Options::interactive();
    assert!(options.wait());
    assert!(options.alternate_eof());
    assert_eq!(options.name(), "<stdin>");
    let options = Options::default();
    assert!(!options.wait());
    assert_eq!(options.name(), "<string>");
    assert_eq!(options.depth_limit(), 128);
}
