//! Reads expressions from standard input and prints them back, or reports
//! what is wrong with them.
//!
//! The reader's debug events are logged to standard error.

use std::io::{self, Write};

use lispfront::error::Category;
use lispfront::parse::{Options, Outcome};
use lispfront::{Context, Parser};

fn prompt(text: &str) {
    print!("{}", text);
    let _ = io::stdout().flush();
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(io::stderr)
        .init();

    let mut context: Context<usize> = Context::new();
    let stdin = io::stdin();
    let mut parser = Parser::from_reader_custom(stdin.lock(), Options::interactive())
        .with_continuation(|depth| prompt(&format!("{}> ", ".".repeat(depth.max(1)))));

    let mut count = 0;
    loop {
        prompt("> ");
        let node = match parser.parse() {
            Some(Outcome::Complete(node)) => node,
            Some(Outcome::Incomplete) | None => break,
        };
        match node.first_error() {
            Some(error) => {
                let kind = match error.classify() {
                    Category::Eof => "incomplete input",
                    Category::Syntax => "syntax error",
                    _ => "error",
                };
                eprintln!("{}: {}", kind, error);
            }
            None => {
                count += 1;
                if let Some(symbol) = context.symbol_of(&node) {
                    match context.lookup(symbol.name()) {
                        Some(n) => println!("{} ; first read as form {}", node, n),
                        None => {
                            context.define(symbol.name(), count);
                            println!("{}", node);
                        }
                    }
                } else {
                    println!("{} ; {} children", node, node.arity());
                }
            }
        }
    }
    println!();
}
