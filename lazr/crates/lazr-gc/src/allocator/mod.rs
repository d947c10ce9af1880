//! Allocator Module - Word allocation in the active space
//!
//! The heap allocates from a single semispace by bumping a pointer. There
//! are no size classes and no free lists: space is reclaimed wholesale when
//! the collector evacuates live objects into the other semispace and the
//! allocator is reset over it.

pub mod bump;

pub use bump::BumpAllocator;

/// Statistics for allocator
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AllocatorStats {
    /// Words handed out since the last reset
    pub allocated_words: usize,
    /// Words still available
    pub remaining_words: usize,
    /// Successful allocations since the heap was created
    pub allocations: u64,
    /// Failed allocations since the heap was created
    pub failures: u64,
}
