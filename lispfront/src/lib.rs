#![deny(missing_docs)]

//! This crate provides the front end of a small Scheme: it turns program
//! text into syntax trees, gives every distinct symbol name a single
//! canonical identity and describes failures with structured, inspectable
//! error values.
//!
//! ```scheme
//! (define (fact n)
//!   (if (< n 2)
//!       1
//!       (* n (fact (- n 1)))))
//! ```
//!
//! There are four pieces:
//!
//! - **The reader** ([`parse`]) turns text into [`Node`] trees. It never
//!   fails outright: malformed input yields an *error node* carrying an
//!   [`Error`], and in incremental mode an unfinished form can be completed
//!   with more input later, as an interactive prompt needs.
//!
//! - **The printer** ([`print`]) turns trees back into text.
//!
//! - **Symbols and bindings** ([`intern`], [`binding`], [`context`]): an
//!   [`InternTable`] maps each name to one canonical [`Symbol`], and a
//!   [`BindingTable`] maps symbols to values, distinguishing definition from
//!   assignment.
//!
//! - **Errors** ([`error`]): reader errors, contract violations, arity
//!   mismatches and free-form errors share one representation with a
//!   description table and a call trace whose repeated frames collapse.
//!
//! # Reading
//!
//! ```
//! use lispfront::node::Shape;
//!
//! let node = lispfront::from_str("(a . b)").unwrap();
//! assert_eq!(node.shape(), Some(Shape::Pair));
//! assert_eq!(node.to_string(), "(a . b)");
//!
//! let error = lispfront::from_str("(a #z)").unwrap_err();
//! assert_eq!(error.to_string(), "bad syntax `#z`\n  in: #z\n  context...:\n   <string>:1:4");
//! ```
//!
//! Leaves keep the source text of their token: the string literal `"a\n"`
//! keeps its quotes and its escape, and `#\a` keeps its prefix.
//! Turning literals into runtime values is the job of later stages.
//!
//! # Symbols and bindings
//!
//! ```
//! use lispfront::Context;
//!
//! let mut context = Context::new();
//! context.define("answer", 42);
//! assert!(context.assign("answer", 43));
//! assert!(!context.assign("question", 0));
//! assert_eq!(context.lookup("answer"), Some(&43));
//!
//! let node = lispfront::from_str("answer").unwrap();
//! let symbol = context.symbol_of(&node).unwrap();
//! assert!(symbol.ptr_eq(&context.intern("answer")));
//! ```
//!
//! # Logging
//!
//! The crate emits [`tracing`] events: a `trace` event whenever incremental
//! mode waits for input, `debug` events when a table grows or the reader
//! produces an error node, and a `warn` event for malformed error format
//! strings. Install a subscriber to see them.
//!
//! [`tracing`]: https://docs.rs/tracing

pub mod binding;
pub mod context;
pub mod error;
pub mod intern;
pub mod node;
pub mod parse;
pub mod print;

#[doc(inline)]
pub use self::parse::{from_reader, from_reader_custom, from_str, from_str_custom, Parser};

#[doc(inline)]
pub use self::print::{
    to_string, to_string_custom, to_vec, to_vec_custom, to_writer, to_writer_custom, Printer,
};

#[doc(inline)]
pub use self::error::{Error, Result};

#[doc(inline)]
pub use self::node::Node;

#[doc(inline)]
pub use self::intern::{InternTable, Symbol};

#[doc(inline)]
pub use self::binding::BindingTable;

#[doc(inline)]
pub use self::context::Context;
