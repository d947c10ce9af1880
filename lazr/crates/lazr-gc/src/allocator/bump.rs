//! Allocator Submodule - Bump Pointer Allocation
//!
//! Allocation is a bounds check and an add. Offsets are in words and are
//! relative to the start of the space the allocator manages.

use crate::error::{HeapError, Result};

/// Bump pointer allocator over `[start, end)` word offsets
#[derive(Debug, Clone)]
pub struct BumpAllocator {
    start: usize,
    top: usize,
    end: usize,
}

impl BumpAllocator {
    pub fn new(start: usize, end: usize) -> Result<Self> {
        if start >= end {
            return Err(HeapError::InvalidArgument(format!(
                "start ({:#x}) must be less than end ({:#x})",
                start, end
            )));
        }

        Ok(Self {
            start,
            top: start,
            end,
        })
    }

    /// Reserve `words` words, returning the offset of the first
    pub fn allocate(&mut self, words: usize) -> Result<usize> {
        if words == 0 {
            return Err(HeapError::InvalidArgument(
                "cannot allocate zero words".to_string(),
            ));
        }

        let new_top = self.top.checked_add(words).ok_or(HeapError::OutOfMemory {
            requested: words,
            available: 0,
        })?;

        if new_top > self.end {
            return Err(HeapError::OutOfMemory {
                requested: words,
                available: self.remaining(),
            });
        }

        let addr = self.top;
        self.top = new_top;
        Ok(addr)
    }

    pub fn reset(&mut self) {
        self.top = self.start;
    }

    /// Move the top to `address`; ignored outside `[start, end]`
    pub fn set_top(&mut self, address: usize) {
        if address >= self.start && address <= self.end {
            self.top = address;
        }
    }

    #[inline]
    pub fn top(&self) -> usize {
        self.top
    }

    pub fn remaining(&self) -> usize {
        self.end - self.top
    }

    pub fn capacity(&self) -> usize {
        self.end - self.start
    }

    pub fn allocated(&self) -> usize {
        self.top - self.start
    }

    pub fn is_full(&self) -> bool {
        self.remaining() == 0
    }
}
