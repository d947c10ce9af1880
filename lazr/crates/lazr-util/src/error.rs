//! Core error types for lazr-util crate
//!
//! This module defines error types used throughout the util crate.

use thiserror::Error;

/// Error type for symbol interning operations
#[derive(Debug, Error)]
pub enum SymbolError {
    /// Symbol not found in the interner
    #[error("Symbol not found: index {index}")]
    NotFound { index: u32 },
}

/// Error type for position table operations
#[derive(Debug, Error)]
pub enum PosError {
    /// Position index not present in the table
    #[error("Position not found: index {index}")]
    NotFound { index: u32 },

    /// Line numbers are 1-based
    #[error("Invalid line number: {line}")]
    InvalidLine { line: u32 },
}

/// Result type alias for symbol operations
pub type SymbolResult<T> = std::result::Result<T, SymbolError>;

/// Result type alias for position operations
pub type PosResult<T> = std::result::Result<T, PosError>;
