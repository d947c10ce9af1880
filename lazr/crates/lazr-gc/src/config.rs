//! Configuration Module - Heap Tuning Parameters
//!
//! Manages the parameters of the word-addressed heap: how large the active
//! space is, how large a single attribute set may get, and how chatty and
//! paranoid collection is.

/// Smallest accepted heap, in words
pub const MIN_HEAP_WORDS: usize = 16;

/// Largest accepted heap, in words
///
/// Object references are 32-bit word offsets.
pub const MAX_HEAP_WORDS: usize = u32::MAX as usize;

/// Main configuration for the lazr heap
///
/// # Examples
///
/// ```rust
/// use lazr_gc::HeapConfig;
///
/// // Use default configuration
/// let config = HeapConfig::default();
///
/// // Small heap that verifies itself after every collection
/// let config = HeapConfig {
///     heap_words: 4096,
///     verify_after_collect: true,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct HeapConfig {
    /// Size of each semispace in words
    ///
    /// Allocation fails with `OutOfMemory` once the active space is full.
    /// The heap never grows.
    ///
    /// Default: 1M words (8MB)
    pub heap_words: usize,

    /// Largest capacity `Bindings::alloc` accepts
    ///
    /// Guards against a runaway capacity computation eating the whole heap
    /// in one request.
    ///
    /// Default: 16M entries
    pub max_bindings_capacity: u32,

    /// Enable verbose GC logging
    ///
    /// Records collection cycles, heap statistics and allocation failures
    /// in the global GC logger. Failures are always reported through `log`.
    /// Default: false
    pub verbose: bool,

    /// Walk and verify the whole heap after every collection
    ///
    /// Expensive; meant for tests and debugging.
    /// Default: false
    pub verify_after_collect: bool,
}

impl Default for HeapConfig {
    fn default() -> Self {
        HeapConfig {
            heap_words: 1 << 20,
            max_bindings_capacity: 1 << 24,
            verbose: false,
            verify_after_collect: false,
        }
    }
}

impl HeapConfig {
    /// Validate configuration
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lazr_gc::HeapConfig;
    ///
    /// let config = HeapConfig {
    ///     heap_words: 0,  // Invalid!
    ///     ..Default::default()
    /// };
    ///
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.heap_words < MIN_HEAP_WORDS {
            return Err(ConfigError::InvalidHeapSize(format!(
                "heap_words must be at least {}",
                MIN_HEAP_WORDS
            )));
        }

        if self.heap_words > MAX_HEAP_WORDS {
            return Err(ConfigError::InvalidHeapSize(format!(
                "heap_words must not exceed {}",
                MAX_HEAP_WORDS
            )));
        }

        if self.max_bindings_capacity == 0 {
            return Err(ConfigError::InvalidCapacity(
                "max_bindings_capacity must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Build configuration from environment variables
    ///
    /// Overrides defaults with environment variables:
    /// - LAZR_HEAP_WORDS
    /// - LAZR_MAX_BINDINGS_CAPACITY
    /// - LAZR_GC_VERBOSE
    /// - LAZR_GC_VERIFY
    ///
    /// Unparsable values are ignored.
    ///
    /// ```bash
    /// export LAZR_HEAP_WORDS=4194304  # 32MB
    /// export LAZR_GC_VERIFY=1
    /// ```
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("LAZR_HEAP_WORDS") {
            if let Ok(words) = val.parse::<usize>() {
                config.heap_words = words;
            }
        }

        if let Ok(val) = std::env::var("LAZR_MAX_BINDINGS_CAPACITY") {
            if let Ok(cap) = val.parse::<u32>() {
                config.max_bindings_capacity = cap;
            }
        }

        if let Ok(val) = std::env::var("LAZR_GC_VERBOSE") {
            config.verbose = parse_flag(&val);
        }

        if let Ok(val) = std::env::var("LAZR_GC_VERIFY") {
            config.verify_after_collect = parse_flag(&val);
        }

        config
    }

    /// Heap size in bytes
    pub fn heap_bytes(&self) -> usize {
        self.heap_words * std::mem::size_of::<crate::heap::Word>()
    }
}

/// Error types for configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid heap size: {0}")]
    InvalidHeapSize(String),

    #[error("Invalid capacity: {0}")]
    InvalidCapacity(String),
}

fn parse_flag(val: &str) -> bool {
    val == "1" || val.eq_ignore_ascii_case("true")
}
