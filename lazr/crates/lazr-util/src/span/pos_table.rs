//! Global position table.
//!
//! Append-only: a `PosIdx` stays valid for the life of the process.
//! Slot 0 is occupied by a placeholder so that index 0 can serve as
//! [`PosIdx::NONE`].

use parking_lot::RwLock;
use std::sync::LazyLock;

use super::{Pos, PosIdx};

/// Global position table instance
pub static POS_TABLE: LazyLock<PosTable> = LazyLock::new(PosTable::new);

/// Append-only table of source positions
pub struct PosTable {
    positions: RwLock<Vec<Option<Pos>>>,
}

impl PosTable {
    fn new() -> Self {
        Self {
            positions: RwLock::new(vec![None]),
        }
    }

    /// Append a position and return its index
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` positions are registered.
    pub fn add(&self, pos: Pos) -> PosIdx {
        let mut positions = self.positions.write();
        let index = u32::try_from(positions.len())
            .unwrap_or_else(|_| panic!("position table exhausted at {} entries", positions.len()));
        positions.push(Some(pos));
        PosIdx(index)
    }

    /// Resolve an index; the sentinel and unknown indices yield `None`
    pub fn get(&self, idx: PosIdx) -> Option<Pos> {
        self.positions.read().get(idx.0 as usize).copied().flatten()
    }

    /// Number of registered positions, the sentinel excluded
    pub fn len(&self) -> usize {
        self.positions.read().len() - 1
    }

    /// Whether no real position has been registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
