//! The state shared by the stages after reading.
//!
//! A [`Context`] owns the symbol table and the global bindings of one
//! interpreter instance, so that independent instances never share symbols.

use crate::binding::BindingTable;
use crate::intern::{InternTable, Symbol};
use crate::node::Node;

/// Symbol table plus global environment.
#[derive(Debug, Default)]
pub struct Context<V> {
    symbols: InternTable,
    globals: BindingTable<V>,
}

impl<V> Context<V> {
    /// Create a context with empty tables.
    pub fn new() -> Self {
        Context {
            symbols: InternTable::new(),
            globals: BindingTable::new(),
        }
    }

    /// The canonical symbol for `name`.
    pub fn intern(&mut self, name: impl AsRef<str>) -> Symbol {
        self.symbols.intern(name)
    }

    /// The canonical symbol named by an identifier leaf.
    ///
    /// Returns `None` for interior nodes, error nodes and leaves that are
    /// literals rather than identifiers: strings, characters, numbers and the
    /// empty forms.
    pub fn symbol_of(&mut self, node: &Node) -> Option<Symbol> {
        if node.is_error() {
            return None;
        }
        let text = node.text()?;
        if is_identifier(text) {
            Some(self.symbols.intern(text))
        } else {
            None
        }
    }

    /// Bind `name` globally, replacing any existing binding.
    pub fn define(&mut self, name: &str, value: V) -> Symbol {
        let symbol = self.symbols.intern(name);
        self.globals.add(symbol.clone(), value);
        symbol
    }

    /// Assign to an existing global binding. Returns false if `name` is not
    /// bound.
    pub fn assign(&mut self, name: &str, value: V) -> bool {
        match self.symbols.get(name) {
            Some(symbol) => self.globals.set(symbol, value),
            None => false,
        }
    }

    /// The global value of `name`.
    pub fn lookup(&self, name: &str) -> Option<&V> {
        self.symbols
            .get(name)
            .and_then(|symbol| self.globals.get(symbol))
    }

    /// The symbol table.
    pub fn symbols(&self) -> &InternTable {
        &self.symbols
    }

    /// The global bindings.
    pub fn globals(&self) -> &BindingTable<V> {
        &self.globals
    }

    /// The global bindings, for callers that bind by symbol.
    pub fn globals_mut(&mut self) -> &mut BindingTable<V> {
        &mut self.globals
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    let first = match chars.next() {
        Some(c) => c,
        None => return false,
    };
    match first {
        '"' | '#' | '(' => false,
        '0'..='9' => false,
        '+' | '-' => match chars.next() {
            Some(c) if c.is_ascii_digit() => false,
            Some('.') => !starts_with_digit(chars),
            _ => true,
        },
        '.' => !starts_with_digit(chars),
        _ => true,
    }
}

fn starts_with_digit(mut chars: std::str::Chars<'_>) -> bool {
    chars.next().map_or(false, |c| c.is_ascii_digit())
}
