//! Span module - Source position tracking.
//!
//! Heap records carry a source position in a single word, so positions are
//! stored once in a global [`PosTable`] and referred to by a 32-bit
//! [`PosIdx`]. Index 0 is reserved for [`PosIdx::NONE`], the shared
//! "no position" sentinel.
//!
//! Positions are diagnostic context only: nothing in the heap compares or
//! dereferences them, they are resolved when an error is formatted.
//!
//! # Examples
//!
//! ```
//! use lazr_util::span::{Pos, PosIdx};
//!
//! let pos = PosIdx::add(Pos::new("default.nix", 3, 7));
//! assert_eq!(pos.to_string(), "default.nix:3:7");
//! assert_eq!(PosIdx::NONE.to_string(), "undefined position");
//! ```

mod pos_table;

pub use pos_table::{PosTable, POS_TABLE};

use crate::error::{PosError, PosResult};
use crate::symbol::Symbol;

/// A resolved source position
///
/// The file name is interned, which keeps `Pos` `Copy` and cheap to store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pos {
    /// File name or other origin description
    pub file: Symbol,
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based, 0 when unknown)
    pub column: u32,
}

impl Pos {
    /// Create a new position
    ///
    /// ```
    /// use lazr_util::span::Pos;
    ///
    /// let pos = Pos::new("lib.nix", 12, 4);
    /// assert_eq!(pos.file.as_str(), "lib.nix");
    /// assert_eq!(pos.line, 12);
    /// ```
    #[inline]
    pub fn new(file: &str, line: u32, column: u32) -> Self {
        Self {
            file: Symbol::intern(file),
            line,
            column,
        }
    }

    /// Create a position, rejecting line 0
    pub fn try_new(file: &str, line: u32, column: u32) -> PosResult<Self> {
        if line == 0 {
            return Err(PosError::InvalidLine { line });
        }
        Ok(Self::new(file, line, column))
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Index of a position in the global position table
///
/// Fits in a heap word; `PosIdx::NONE` is the sentinel every record without
/// an explicit position shares.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PosIdx(pub(crate) u32);

impl PosIdx {
    /// The shared "no position" sentinel
    pub const NONE: PosIdx = PosIdx(0);

    /// Register a position in the global table
    #[inline]
    pub fn add(pos: Pos) -> PosIdx {
        POS_TABLE.add(pos)
    }

    /// Resolve this index, `None` for the sentinel or an unknown index
    #[inline]
    pub fn get(self) -> Option<Pos> {
        POS_TABLE.get(self)
    }

    /// Resolve this index, failing for the sentinel or an unknown index
    pub fn try_get(self) -> PosResult<Pos> {
        self.get().ok_or(PosError::NotFound { index: self.0 })
    }

    /// Whether this is the "no position" sentinel
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Raw index, as stored in a heap word
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Rebuild an index read back from a heap word
    #[inline]
    pub const fn from_u32(raw: u32) -> Self {
        Self(raw)
    }
}

impl std::fmt::Display for PosIdx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.get() {
            Some(pos) => write!(f, "{}", pos),
            None => f.write_str("undefined position"),
        }
    }
}
