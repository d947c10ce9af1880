//! String interner implementation using DashMap for concurrent access.
//!
//! This module provides a thread-safe string interner for attribute names:
//! - Lock-free concurrent lookup via DashMap keyed by the string itself
//! - Fast hashing with ahash
//! - An index-addressed string vector so `Symbol -> &str` is O(1)
//! - Statistics tracking for profiling
//!
//! # Performance Characteristics
//!
//! - **Interning (hit)**: O(1) - hash lookup only
//! - **Interning (miss)**: O(1) - hash insert + allocation + vector push
//! - **Symbol comparison**: O(1) - index comparison
//! - **String retrieval**: O(1) - read lock + vector index
//!
//! # Index Assignment
//!
//! New strings are inserted under the write lock on the string vector,
//! after a second map lookup. `strings[index]` is always the string that
//! was interned under `index`, two threads racing on the same new string
//! agree on one index, and only the winner allocates a copy.

use ahash::RandomState;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::LazyLock;

use super::{InternerStats, Symbol, KNOWN_SYMBOLS};

/// Global string table instance
///
/// Initialized on first use via `LazyLock`. All known attribute names are
/// pre-interned during initialization so they have stable, predictable
/// indices that match the `S_*` constants.
pub static STRING_TABLE: LazyLock<StringTable> = LazyLock::new(|| {
    let table = StringTable::new();
    table.initialize_known_symbols();
    table
});

/// Thread-safe string table
///
/// Strings are leaked to obtain `'static` references. Interned names are
/// never removed, and their total size is bounded by the source text the
/// evaluator reads.
pub struct StringTable {
    /// Maps string to symbol index
    map: DashMap<&'static str, u32, RandomState>,

    /// Index -> string, in interning order
    strings: RwLock<Vec<&'static str>>,

    /// Number of cache hits (string already interned)
    hits: AtomicUsize,

    /// Number of new strings copied into the table
    misses: AtomicUsize,
}

impl StringTable {
    /// Create a new empty string table
    #[inline]
    fn new() -> Self {
        Self {
            map: DashMap::with_capacity_and_hasher(256, RandomState::new()),
            strings: RwLock::new(Vec::with_capacity(256)),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
        }
    }

    /// Pre-intern every known attribute name in declaration order.
    ///
    /// Must run exactly once, before any other interning.
    fn initialize_known_symbols(&self) {
        for name in KNOWN_SYMBOLS {
            self.insert_new(name);
        }
    }

    /// Intern a string, returning its symbol
    ///
    /// If the string is already interned, returns the existing symbol.
    /// Otherwise the string is copied, leaked, and assigned the next index.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` distinct strings are interned.
    pub fn intern(&self, string: &str) -> Symbol {
        // Fast path: read-only shard lookup
        if let Some(symbol) = self.lookup(string) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return symbol;
        }

        self.insert_new(string)
    }

    /// Insert `string` unless another thread beat us to it.
    ///
    /// The string is copied and leaked only once it is known to be new.
    fn insert_new(&self, string: &str) -> Symbol {
        let mut strings = self.strings.write();
        if let Some(symbol) = self.lookup(string) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return symbol;
        }

        let index = u32::try_from(strings.len())
            .unwrap_or_else(|_| panic!("symbol table exhausted at {} entries", strings.len()));
        let interned: &'static str = Box::leak(string.to_owned().into_boxed_str());
        strings.push(interned);
        self.map.insert(interned, index);
        self.misses.fetch_add(1, Ordering::Relaxed);
        Symbol { index }
    }

    /// Get string by symbol
    ///
    /// Returns `None` for an index that was never handed out.
    #[inline]
    pub fn get(&self, symbol: Symbol) -> Option<&'static str> {
        self.strings.read().get(symbol.index as usize).copied()
    }

    /// Check whether `index` has been handed out
    #[inline]
    pub fn contains_index(&self, index: u32) -> bool {
        (index as usize) < self.strings.read().len()
    }

    /// Look up an already interned string without interning it
    pub fn lookup(&self, string: &str) -> Option<Symbol> {
        self.map.get(string).map(|entry| Symbol { index: *entry.value() })
    }

    /// Number of interned strings
    pub fn len(&self) -> usize {
        self.strings.read().len()
    }

    /// Whether the table is empty (never true once initialized)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get statistics about the string table for profiling
    pub fn stats(&self) -> InternerStats {
        InternerStats {
            count: self.map.len(),
            capacity: self.map.capacity(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Reset statistics counters (useful for benchmarking)
    #[cfg(test)]
    pub(crate) fn reset_stats(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}
