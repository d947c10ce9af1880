//! # lazr-gc - Attribute-Set Heap
//!
//! The garbage-collected heap of the lazr evaluator and the attribute-set
//! container that lives on it. Attribute sets are the evaluator's main
//! compound value: records mapping names to values, built once from a
//! known number of entries and then read many times.
//!
//! ## Overview
//!
//! - **Word-addressed heap**: a flat `Vec<u64>` semispace; objects are
//!   referenced by word offset ([`ObjRef`])
//! - **One-word headers**: a type tag plus a per-type "misc" field; the
//!   header alone determines an object's footprint
//! - **Sorted containers**: [`Bindings`] stores its records inline after
//!   the header, in one block of exactly the requested capacity
//! - **Copying collection**: [`Heap::collect`] evacuates everything
//!   reachable from the roots, tracing containers only up to their size
//!
//! ## Quick Start
//!
//! ```rust
//! use lazr_gc::{Attr, Bindings, Heap, HeapConfig, Value};
//! use lazr_util::symbol::S_NAME;
//! use lazr_util::{PosIdx, Symbol};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut heap = Heap::new(HeapConfig::default())?;
//!
//!     // Build { name = 1; version = 2; }
//!     let one = heap.alloc_int(1)?;
//!     let two = heap.alloc_int(2)?;
//!     let set = Bindings::alloc(&mut heap, 2)?;
//!     set.push(&mut heap, Attr::new(Symbol::intern("version"), two));
//!     set.push(&mut heap, Attr::new(S_NAME, one));
//!     set.sort(&mut heap);
//!
//!     // Keep it alive across a collection
//!     let value = heap.alloc_attrs(set)?;
//!     let root = heap.add_root(value);
//!     heap.collect()?;
//!
//!     let value = heap.root(root).unwrap();
//!     let Some(Value::Attrs(set)) = heap.value(value) else { unreachable!() };
//!     let view = set.view(&heap);
//!     let version = view.need(Symbol::intern("version"), PosIdx::NONE)?;
//!     assert_eq!(heap.value(version.value), Some(Value::Int(2)));
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────── Heap ──────────────────────────┐
//! │  BumpAllocator ──► active space ◄── ObjectBitmap        │
//! │                         │                                │
//! │                  ObjectHeader::words()                   │
//! │                   (footprint law)                        │
//! │                    │            │                        │
//! │         heap walk / copy    scan_object ─► scan_bindings │
//! │                    │            │      (slots < size)    │
//! │                    └── collect ─┘                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`allocator`]: Bump pointer allocation in the active space
//! - [`config`]: Heap configuration parameters and validation
//! - [`error`]: Heap and evaluation error types
//! - [`heap`]: The heap, object references, roots, walking and verification
//! - [`logging`]: Structured GC event log
//! - [`marker`]: Reference scanning, including the container scanning contract
//! - [`object`]: Header word layout and per-tag footprints
//! - [`relocate`]: Cheney copying collection
//! - [`value`]: Value kinds and the attribute-set container
//!
//! ## Limitations
//!
//! - **Single mutator**: allocation and construction take `&mut Heap`
//! - **Fixed size**: the heap never grows; exhaustion is an error
//! - **Explicit roots**: anything not reachable from a registered root is
//!   reclaimed by the next collection

// Core modules
pub mod config;
pub mod error;
pub mod logging;

// Memory management subsystems
pub mod allocator;
pub mod heap;
pub mod object;

// Collector components
pub mod marker;
pub mod relocate;

// Values
pub mod value;

// Re-export main types for convenience
pub use config::{ConfigError, HeapConfig};
pub use error::{EvalError, EvalResult, HeapError, Result};
pub use heap::{Heap, HeapStats, ObjRef, RootId, Word};
pub use object::{ObjectHeader, Tag};
pub use relocate::CollectStats;
pub use value::{Attr, Bindings, BindingsView, Value};

/// lazr-gc version string from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
