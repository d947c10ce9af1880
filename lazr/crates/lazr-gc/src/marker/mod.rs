//! Marker Module - Finding references inside objects
//!
//! The collector and the heap verifier never interpret an object's body
//! themselves. They hand the object's block to [`scan_object`], which
//! reports the word index of every field holding a heap reference.

pub mod object_scanner;

pub use object_scanner::{scan_bindings, scan_object, ObjectScan, ObjectScanStats};
