//! Symbol interning.
//!
//! An [`InternTable`] hands out exactly one [`Symbol`] per distinct name:
//! interning equal text twice yields handles to the same object, so symbols
//! compare and hash by identity.
//!
//! ```
//! use lispfront::InternTable;
//!
//! let mut table = InternTable::new();
//! let a = table.intern("lambda");
//! let b = table.intern(String::from("lambda"));
//! assert!(a.ptr_eq(&b));
//! assert_eq!(table.len(), 1);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::io::Cursor;
use std::rc::Rc;

use murmur3::murmur3_32;

/// Bucket counts the table steps through as it grows.
pub const PRIMES: &[usize] = &[
    31, 61, 127, 251, 509, 1021, 2039, 4093, 8191, 16381, 32749, 65521, 131071, 262139, 524287,
    1048573, 2097143, 4194301, 8388593, 16777213, 33554393, 67108859, 134217689, 268435399,
    536870909, 1073741789, 2147483647,
];

const LOAD_FACTOR: f64 = 0.75;

const SEED: u32 = 5731;

struct SymbolData {
    name: Box<str>,
    hash: u32,
}

/// A canonical symbol, as handed out by an [`InternTable`].
///
/// Cloning a symbol clones the handle, not the name. Equality and hashing use
/// the identity of the underlying object, which for symbols from the same
/// table coincides with equality of their names.
#[derive(Clone)]
pub struct Symbol(Rc<SymbolData>);

impl Symbol {
    /// The symbol's name.
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Returns true if both handles refer to the same symbol object.
    pub fn ptr_eq(&self, other: &Symbol) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn hash_code(&self) -> u32 {
        self.0.hash
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Symbol {}

impl Hash for Symbol {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        self.name()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.name())
    }
}

/// Murmur3 of the name's bytes.
fn hash_str(s: &str) -> u32 {
    // Reading from memory cannot fail.
    murmur3_32(&mut Cursor::new(s.as_bytes()), SEED).unwrap_or(0)
}

pub(crate) fn bucket_index(hash: u32, capacity: usize) -> usize {
    hash as usize % capacity
}

/// A hash-consing table mapping names to canonical [`Symbol`]s.
///
/// Buckets are chained; the bucket count follows [`PRIMES`] and grows once
/// more than three quarters of it is in use. The table never shrinks, and
/// symbols are never removed.
pub struct InternTable {
    buckets: Vec<Vec<Symbol>>,
    step: usize,
    len: usize,
}

impl InternTable {
    /// Create an empty table with the smallest bucket count.
    pub fn new() -> Self {
        Self::with_step(0)
    }

    /// Create an empty table with room for at least `capacity` symbols
    /// before it has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        let step = PRIMES
            .iter()
            .position(|&p| capacity as f64 <= p as f64 * LOAD_FACTOR)
            .unwrap_or(PRIMES.len() - 1);
        Self::with_step(step)
    }

    fn with_step(step: usize) -> Self {
        InternTable {
            buckets: vec![Vec::new(); PRIMES[step]],
            step,
            len: 0,
        }
    }

    /// Return the canonical symbol for `name`, creating it on first use.
    pub fn intern(&mut self, name: impl AsRef<str>) -> Symbol {
        let name = name.as_ref();
        let hash = hash_str(name);
        let index = bucket_index(hash, self.buckets.len());
        if let Some(symbol) = self.buckets[index].iter().find(|s| s.name() == name) {
            return symbol.clone();
        }

        let symbol = Symbol(Rc::new(SymbolData {
            name: name.into(),
            hash,
        }));
        self.buckets[index].insert(0, symbol.clone());
        self.len += 1;
        if self.len as f64 / self.buckets.len() as f64 > LOAD_FACTOR {
            self.grow();
        }
        symbol
    }

    /// Look up the symbol for `name` without creating it.
    pub fn get(&self, name: &str) -> Option<&Symbol> {
        let index = bucket_index(hash_str(name), self.buckets.len());
        self.buckets[index].iter().find(|s| s.name() == name)
    }

    /// Number of distinct symbols.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no symbol has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bucket count.
    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    /// Iterate over all symbols, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Symbol> + '_ {
        self.buckets.iter().flatten()
    }

    fn grow(&mut self) {
        if self.step + 1 >= PRIMES.len() {
            return;
        }
        self.step += 1;
        let capacity = PRIMES[self.step];
        let mut buckets = vec![Vec::new(); capacity];
        for symbol in self.buckets.drain(..).flatten() {
            buckets[bucket_index(symbol.hash_code(), capacity)].insert(0, symbol);
        }
        tracing::debug!(symbols = self.len, capacity, "grew intern table");
        self.buckets = buckets;
    }
}

impl Default for InternTable {
    fn default() -> Self {
        InternTable::new()
    }
}

impl fmt::Debug for InternTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InternTable")
            .field("len", &self.len)
            .field("capacity", &self.capacity())
            .finish()
    }
}
