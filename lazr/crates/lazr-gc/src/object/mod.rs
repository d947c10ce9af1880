//! Object Module - heap object model
//!
//! Every heap object starts with one header word (see [`header`]). The
//! header alone determines how many words the object occupies, which is
//! all the allocator, the heap walk and the copying collector need to know.

pub mod header;

pub use header::{misc_use, ObjectHeader, Tag, MISC_MAX, MISC_SHIFT, POISON, TAG_MASK};
