//! lazr-util - Identifier Handles and Source Positions
//!
//! ============================================================================
//! MODULE OVERVIEW
//! ============================================================================
//!
//! Foundation types shared by the lazr heap and the evaluator that sits on
//! top of it. Both types here are small `Copy` handles into process-wide
//! tables, so they can be stored directly in a heap word.
//!
//! - [`Symbol`]: an interned attribute or variable name. Comparison is an
//!   integer comparison; the order is the interning order, not text order.
//! - [`PosIdx`]: an index into the position table, with [`PosIdx::NONE`]
//!   as the shared "no position" sentinel.
//
// ============================================================================
// WHY INTERNING ORDER IS NOT TEXT ORDER
// ============================================================================
//
// Attribute sets are binary-searched by symbol. Comparing two u32 indices is
// as cheap as a comparison gets and never touches the string table. The
// price is that the order depends on which names happened to be interned
// first, which differs between runs. Anything user-visible (printing,
// serialisation, diffing) must sort by `Symbol::as_str()` instead.
//
// ```
// intern("zeta")  -> Symbol(512)
// intern("alpha") -> Symbol(513)
//
// Symbol order: zeta < alpha
// Text order:   alpha < zeta
// ```

pub mod error;
pub mod span;
pub mod symbol;

pub use error::{PosError, PosResult, SymbolError, SymbolResult};
pub use span::{Pos, PosIdx, PosTable, POS_TABLE};
pub use symbol::{InternerStats, Symbol, STRING_TABLE};
