//! Object-Start Bitmap
//!
//! One bit per heap word, set exactly at the first word of every allocated
//! object. The validity check uses it to reject references into the middle
//! of an object (or into a record slot of a container), which the header
//! word alone cannot detect.
//!
//! Bitmap Structure:
//! ```text
//! Space: 1M words
//! Granularity: 1 word per bit
//! Bitmap size: 1M / 64 = 16,384 u64 = 128KB
//!
//! Object at word 130:
//! - Word index: 130 / 64 = 2
//! - Bit offset: 130 % 64 = 2
//! ```

/// ObjectBitmap - object start bits for one semispace
#[derive(Debug, Clone)]
pub struct ObjectBitmap {
    bits: Vec<u64>,
    words_covered: usize,
}

impl ObjectBitmap {
    /// Create an empty bitmap covering `words_covered` heap words
    pub fn new(words_covered: usize) -> Self {
        Self {
            bits: vec![0; words_covered.div_ceil(64)],
            words_covered,
        }
    }

    /// Mark `index` as an object start; out-of-range indices are ignored
    #[inline]
    pub fn set(&mut self, index: usize) {
        if index < self.words_covered {
            self.bits[index / 64] |= 1u64 << (index % 64);
        }
    }

    /// Whether an object starts at `index`
    #[inline]
    pub fn is_set(&self, index: usize) -> bool {
        if index >= self.words_covered {
            return false;
        }
        self.bits[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Clear all bits
    pub fn clear(&mut self) {
        self.bits.fill(0);
    }

    /// Number of object starts recorded
    pub fn count(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Set bits in ascending order
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter().enumerate().flat_map(|(word_index, &word)| {
            let mut remaining = word;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(word_index * 64 + bit)
            })
        })
    }

    /// Heap words covered
    pub fn words_covered(&self) -> usize {
        self.words_covered
    }

    /// Get bitmap size in bytes
    pub fn size_bytes(&self) -> usize {
        self.bits.len() * 8
    }
}
