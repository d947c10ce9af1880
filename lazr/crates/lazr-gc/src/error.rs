//! Error Module - Heap and Evaluation Error Types
//!
//! Defines the recoverable error types of the heap and of attribute lookup.
//!
//! # Error Categories
//!
//! ## Heap Errors
//! - `OutOfMemory` - Active space exhausted
//! - `Configuration` - Invalid heap configuration
//! - `InvalidObject` - Reference does not name a live object
//! - `CapacityOverflow` - Requested container capacity too large
//! - `InvalidArgument` - Invalid function argument
//!
//! ## Evaluation Errors
//! - `MissingAttribute` - Required attribute absent from a set
//! - `Heap` - Heap error surfaced during evaluation
//!
//! Contract violations (appending to a full or sealed container, looking up
//! in an unsealed one, storing a foreign reference) are not errors: they
//! panic in every build profile.

use crate::config::ConfigError;
use lazr_util::{PosIdx, Symbol};
use thiserror::Error;

/// Main error type for heap operations
///
/// # Examples
///
/// ```rust
/// use lazr_gc::error::HeapError;
///
/// fn handle_error(err: HeapError) {
///     match err {
///         HeapError::OutOfMemory { requested, available } => {
///             eprintln!("OOM: requested {} words, available {}", requested, available);
///         }
///         _ => eprintln!("Other error: {}", err),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum HeapError {
    /// Out of memory - active space exhausted
    ///
    /// **When returned:** An allocation needs more words than remain in the
    /// active space.
    ///
    /// **Recovery strategy:** Collect and retry at the caller's discretion.
    /// Containers never retry on their own.
    #[error("Out of memory: requested {requested} words, available {available} words")]
    OutOfMemory { requested: usize, available: usize },

    /// Configuration error
    ///
    /// **When returned:** `Heap::new` was given a config that fails validation
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Reference does not name a live object
    ///
    /// **When returned:** `Heap::verify` finds a dangling reference, or a
    /// checked accessor is handed an address that is not an object start.
    #[error("Invalid object reference: word {address:#x}")]
    InvalidObject { address: u32 },

    /// Container capacity exceeds the configured maximum
    ///
    /// **When returned:** `Bindings::alloc` with a capacity above
    /// `HeapConfig::max_bindings_capacity`
    #[error("Capacity overflow: requested {requested}, maximum {max}")]
    CapacityOverflow { requested: u32, max: u32 },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl HeapError {
    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HeapError::OutOfMemory { .. })
    }

    /// Check if this error indicates a bug in the code
    pub fn is_bug(&self) -> bool {
        matches!(self, HeapError::InvalidObject { .. })
    }
}

/// Errors raised while reading attribute sets during evaluation
#[derive(Debug, Error)]
pub enum EvalError {
    /// A required attribute is absent
    ///
    /// `pos` is the position of the expression that demanded the attribute,
    /// not of the set.
    #[error("attribute '{name}' missing, at {pos}")]
    MissingAttribute { name: Symbol, pos: PosIdx },

    /// Heap error surfaced during evaluation
    #[error(transparent)]
    Heap(#[from] HeapError),
}

/// Result type alias for heap operations
pub type Result<T> = std::result::Result<T, HeapError>;

/// Result type alias for evaluation operations
pub type EvalResult<T> = std::result::Result<T, EvalError>;
