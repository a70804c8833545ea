//! Tables of variable bindings.
//!
//! A [`BindingTable`] maps interned [`Symbol`]s to values. It separates
//! *defining* a name ([`add`](BindingTable::add), which inserts or
//! overwrites) from *assigning* to it ([`set`](BindingTable::set), which only
//! overwrites an existing binding and reports whether there was one). How an
//! evaluator falls back between nested scopes when `set` fails is up to the
//! evaluator.

use std::fmt;

use crate::intern::{bucket_index, Symbol};

/// Row count of a table created with [`BindingTable::new`].
pub const INITIAL_CAPACITY: usize = 16;

const LOAD_FACTOR: f64 = 0.75;

/// A hashed table of `(name, value)` pairs.
///
/// Each row holds the pairs whose names hash to it, in insertion order. The
/// row count doubles when the table is more than three quarters full at the
/// time of an [`add`](BindingTable::add).
#[derive(Clone)]
pub struct BindingTable<V> {
    rows: Vec<Vec<(Symbol, V)>>,
    len: usize,
}

impl<V> BindingTable<V> {
    /// Create an empty table with [`INITIAL_CAPACITY`] rows.
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Create an empty table with the given number of rows (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let mut rows = Vec::with_capacity(capacity.max(1));
        rows.resize_with(capacity.max(1), Vec::new);
        BindingTable { rows, len: 0 }
    }

    fn row_index(&self, name: &Symbol) -> usize {
        bucket_index(name.hash_code(), self.rows.len())
    }

    fn find(&self, name: &Symbol) -> Option<&(Symbol, V)> {
        self.rows[self.row_index(name)]
            .iter()
            .find(|(key, _)| key == name)
    }

    fn find_mut(&mut self, name: &Symbol) -> Option<&mut (Symbol, V)> {
        let index = self.row_index(name);
        self.rows[index].iter_mut().find(|(key, _)| key == name)
    }

    /// Bind `name` to `value`, replacing any existing binding.
    pub fn add(&mut self, name: Symbol, value: V) {
        if self.len as f64 / self.rows.len() as f64 > LOAD_FACTOR {
            self.rehash(self.rows.len() * 2);
        }
        if let Some(entry) = self.find_mut(&name) {
            entry.1 = value;
            return;
        }
        let index = self.row_index(&name);
        self.rows[index].push((name, value));
        self.len += 1;
    }

    /// Replace the value of an existing binding.
    ///
    /// Returns false, leaving the table unchanged, if `name` is not bound.
    pub fn set(&mut self, name: &Symbol, value: V) -> bool {
        match self.find_mut(name) {
            Some(entry) => {
                entry.1 = value;
                true
            }
            None => false,
        }
    }

    /// The value bound to `name`.
    pub fn get(&self, name: &Symbol) -> Option<&V> {
        self.find(name).map(|(_, value)| value)
    }

    /// A mutable reference to the value bound to `name`.
    pub fn get_mut(&mut self, name: &Symbol) -> Option<&mut V> {
        self.find_mut(name).map(|(_, value)| value)
    }

    /// Returns true if `name` is bound.
    pub fn contains(&self, name: &Symbol) -> bool {
        self.find(name).is_some()
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the table holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current row count.
    pub fn capacity(&self) -> usize {
        self.rows.len()
    }

    /// Iterate over all bindings, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &V)> + '_ {
        self.rows
            .iter()
            .flatten()
            .map(|(name, value)| (name, value))
    }

    fn rehash(&mut self, capacity: usize) {
        let mut rows = Vec::with_capacity(capacity);
        rows.resize_with(capacity, Vec::new);
        for (name, value) in self.rows.drain(..).flatten() {
            let index = bucket_index(name.hash_code(), capacity);
            rows[index].push((name, value));
        }
        tracing::debug!(bindings = self.len, capacity, "rehashed binding table");
        self.rows = rows;
    }
}

impl<V: Clone> BindingTable<V> {
    /// Copy every binding of `other` into this table, see [`merge`].
    pub fn merge_from(&mut self, other: &BindingTable<V>) {
        for (name, value) in other.iter() {
            if !self.set(name, value.clone()) {
                self.add(name.clone(), value.clone());
            }
        }
    }
}

/// Copy every binding of `src` into `dest`: names already bound in `dest`
/// are assigned, the others are added.
pub fn merge<V: Clone>(dest: &mut BindingTable<V>, src: &BindingTable<V>) {
    dest.merge_from(src);
}

impl<V> Default for BindingTable<V> {
    fn default() -> Self {
        BindingTable::new()
    }
}

impl<V: fmt::Debug> fmt::Debug for BindingTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
