//! Symbol module - Interned identifier handles.
//!
//! This module provides the [`Symbol`] type, a compact (4-byte) handle to an
//! interned string. Attribute names are stored in the heap as the raw symbol
//! index, so a symbol must fit in one heap word and must be comparable
//! without touching the string table.
//!
//! # Ordering
//!
//! `Symbol` implements `Ord` by index, which is the interning order. That is
//! the order attribute sets are binary-searched in. It is **not** text order
//! and differs between processes; use [`Symbol::cmp_text`] for any listing a
//! user can see.
//!
//! # Examples
//!
//! ```
//! use lazr_util::symbol::Symbol;
//!
//! let s1 = Symbol::intern("hello");
//! let s2 = Symbol::intern("hello");
//! let s3 = Symbol::intern("world");
//!
//! assert_eq!(s1, s2);
//! assert_ne!(s1, s3);
//! assert_eq!(s3.as_str(), "world");
//! ```
//!
//! Known attribute names are pre-interned:
//!
//! ```
//! use lazr_util::symbol::{S_OUT_PATH, S_TYPE};
//!
//! assert_eq!(S_TYPE.as_str(), "type");
//! assert_eq!(S_OUT_PATH.as_str(), "outPath");
//! assert!(S_TYPE.is_known());
//! ```

mod interner;

pub use interner::{StringTable, STRING_TABLE};

use crate::error::{SymbolError, SymbolResult};
use std::cmp::Ordering;

/// Statistics about the string interner for profiling
///
/// # Examples
///
/// ```
/// use lazr_util::symbol::Symbol;
///
/// let stats = Symbol::stats();
/// println!("Interned {} strings", stats.count);
/// println!("Hit rate: {:.2}%", stats.hit_rate() * 100.0);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct InternerStats {
    /// Number of interned strings
    pub count: usize,
    /// Hash map capacity (number of buckets)
    pub capacity: usize,
    /// Number of cache hits (string already interned)
    pub hits: usize,
    /// Number of cache misses (new string allocation)
    pub misses: usize,
}

impl InternerStats {
    /// Calculate the load factor (count / capacity)
    ///
    /// ```
    /// use lazr_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats { count: 100, capacity: 200, hits: 0, misses: 0 };
    /// assert_eq!(stats.load_factor(), 0.5);
    /// ```
    pub fn load_factor(&self) -> f64 {
        if self.capacity == 0 {
            0.0
        } else {
            self.count as f64 / self.capacity as f64
        }
    }

    /// Calculate the hit rate (hits / (hits + misses))
    ///
    /// Returns 0.0 if no lookups have been performed.
    ///
    /// ```
    /// use lazr_util::symbol::InternerStats;
    ///
    /// let stats = InternerStats { count: 100, capacity: 200, hits: 90, misses: 10 };
    /// assert_eq!(stats.hit_rate(), 0.9);
    /// ```
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Symbol - An interned identifier
///
/// A compact handle to a string stored in the global [`STRING_TABLE`].
/// Equality and ordering are integer operations on the index.
///
/// # Examples
///
/// ```
/// use lazr_util::symbol::Symbol;
///
/// let name = Symbol::intern("src");
/// assert_eq!(name.as_str(), "src");
/// assert_eq!(name, Symbol::intern("src"));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol {
    /// Index into the global string table
    pub(crate) index: u32,
}

static_assertions::assert_eq_size!(Symbol, u32);

// ============================================================================
// KNOWN SYMBOLS (ATTRIBUTE NAMES THE EVALUATOR LOOKS UP BY ITSELF)
// ============================================================================

/// Known names, in index order. Must stay in sync with the constants below.
pub(crate) const KNOWN_SYMBOLS: [&str; 16] = [
    "type",
    "name",
    "value",
    "outPath",
    "drvPath",
    "meta",
    "outputs",
    "system",
    "args",
    "builder",
    "__functor",
    "__toString",
    "file",
    "line",
    "column",
    "recurseForDerivations",
];

/// Known symbol for `type`
pub const S_TYPE: Symbol = Symbol { index: 0 };
/// Known symbol for `name`
pub const S_NAME: Symbol = Symbol { index: 1 };
/// Known symbol for `value`
pub const S_VALUE: Symbol = Symbol { index: 2 };
/// Known symbol for `outPath`
pub const S_OUT_PATH: Symbol = Symbol { index: 3 };
/// Known symbol for `drvPath`
pub const S_DRV_PATH: Symbol = Symbol { index: 4 };
/// Known symbol for `meta`
pub const S_META: Symbol = Symbol { index: 5 };
/// Known symbol for `outputs`
pub const S_OUTPUTS: Symbol = Symbol { index: 6 };
/// Known symbol for `system`
pub const S_SYSTEM: Symbol = Symbol { index: 7 };
/// Known symbol for `args`
pub const S_ARGS: Symbol = Symbol { index: 8 };
/// Known symbol for `builder`
pub const S_BUILDER: Symbol = Symbol { index: 9 };
/// Known symbol for `__functor`
pub const S_FUNCTOR: Symbol = Symbol { index: 10 };
/// Known symbol for `__toString`
pub const S_TO_STRING: Symbol = Symbol { index: 11 };
/// Known symbol for `file`
pub const S_FILE: Symbol = Symbol { index: 12 };
/// Known symbol for `line`
pub const S_LINE: Symbol = Symbol { index: 13 };
/// Known symbol for `column`
pub const S_COLUMN: Symbol = Symbol { index: 14 };
/// Known symbol for `recurseForDerivations`
pub const S_RECURSE_FOR_DERIVATIONS: Symbol = Symbol { index: 15 };

impl Symbol {
    /// Intern a string, returning its symbol
    ///
    /// Thread-safe; interning the same string always returns the same
    /// symbol within one process.
    #[inline]
    pub fn intern(string: &str) -> Self {
        STRING_TABLE.intern(string)
    }

    /// Get the string value associated with this symbol
    ///
    /// Returns an empty string for an index that was never handed out,
    /// which can only happen through [`Symbol::from_u32`].
    #[inline]
    pub fn as_str(&self) -> &'static str {
        STRING_TABLE.get(*self).unwrap_or("")
    }

    /// Get the string value, failing for unknown indices
    pub fn try_as_str(&self) -> SymbolResult<&'static str> {
        STRING_TABLE
            .get(*self)
            .ok_or(SymbolError::NotFound { index: self.index })
    }

    /// Raw index, as stored in a heap word
    #[inline]
    pub const fn as_u32(&self) -> u32 {
        self.index
    }

    /// Rebuild a symbol from a raw index read back from a heap word
    ///
    /// No validity check is made; [`Symbol::is_valid`] tells whether the
    /// index was ever handed out.
    #[inline]
    pub const fn from_u32(index: u32) -> Self {
        Self { index }
    }

    /// Whether this symbol's index exists in the string table
    #[inline]
    pub fn is_valid(&self) -> bool {
        STRING_TABLE.contains_index(self.index)
    }

    /// Whether this is one of the pre-interned `S_*` symbols
    #[inline]
    pub fn is_known(&self) -> bool {
        (self.index as usize) < KNOWN_SYMBOLS.len()
    }

    /// Compare by string content instead of by interning order
    ///
    /// ```
    /// use lazr_util::symbol::Symbol;
    /// use std::cmp::Ordering;
    ///
    /// let z = Symbol::intern("doc_cmp_zeta");
    /// let a = Symbol::intern("doc_cmp_alpha");
    /// assert!(z < a);
    /// assert_eq!(z.cmp_text(&a), Ordering::Greater);
    /// ```
    #[inline]
    pub fn cmp_text(&self, other: &Symbol) -> Ordering {
        if self == other {
            return Ordering::Equal;
        }
        self.as_str().cmp(other.as_str())
    }

    /// Compare the symbol's string with `other` without interning it
    #[inline]
    pub fn eq_str(&self, other: &str) -> bool {
        self.as_str() == other
    }

    /// Get statistics about the interner
    pub fn stats() -> InternerStats {
        STRING_TABLE.stats()
    }
}

impl std::fmt::Debug for Symbol {
    /// ```
    /// use lazr_util::symbol::Symbol;
    ///
    /// let sym = Symbol::intern("hello");
    /// assert_eq!(format!("{:?}", sym), "Symbol(hello)");
    /// ```
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Symbol({})", self.as_str())
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for Symbol {
    fn from(string: &str) -> Self {
        Symbol::intern(string)
    }
}

// Ensure Symbol is thread-safe
static_assertions::assert_impl_all!(Symbol: Send, Sync, Copy);
