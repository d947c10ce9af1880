//! Object Scanner - Traces References Within Objects
//!
//! Object scanner is responsible for:
//! - Decoding the header of an object block
//! - Finding every word of the block that holds a reference
//! - Reporting the field indices to the caller for tracing or checking
//!
//! # Partially built containers
//!
//! A `Bindings` block has room for `capacity` records but only the first
//! `size` are written; the rest hold poison. [`scan_bindings`] takes both
//! numbers as separate arguments and reports value fields of slots
//! `[0, size)` only, so a collection may run between any two appends.

use crate::heap::Word;
use crate::object::{ObjectHeader, Tag};
use crate::value::attrs::{self, Bindings};

/// Result of scanning one object
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ObjectScan {
    /// Reference fields reported
    pub references: usize,
    /// Allocated record slots left unvisited because they are past `size`
    pub unused_slots: usize,
}

/// Object scanning statistics
#[derive(Debug, Default, Clone)]
pub struct ObjectScanStats {
    /// Number of objects scanned
    pub objects_scanned: u64,
    /// Total references found
    pub references_found: u64,
    /// Record slots skipped because they were never written
    pub unused_slots_skipped: u64,
    /// Average refs per object
    pub avg_refs_per_object: f64,
    /// Maximum refs in one object
    pub max_refs_in_object: usize,
}

impl ObjectScanStats {
    /// Create new stats tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Record scan result
    pub fn record(&mut self, scan: ObjectScan) {
        self.objects_scanned += 1;
        self.references_found += scan.references as u64;
        self.unused_slots_skipped += scan.unused_slots as u64;
        self.avg_refs_per_object = self.references_found as f64 / self.objects_scanned as f64;

        if scan.references > self.max_refs_in_object {
            self.max_refs_in_object = scan.references;
        }
    }

    /// Merge with other stats
    pub fn merge(&mut self, other: &ObjectScanStats) {
        if other.objects_scanned == 0 {
            return;
        }

        self.objects_scanned += other.objects_scanned;
        self.references_found += other.references_found;
        self.unused_slots_skipped += other.unused_slots_skipped;
        self.avg_refs_per_object = self.references_found as f64 / self.objects_scanned as f64;
        self.max_refs_in_object = self.max_refs_in_object.max(other.max_refs_in_object);
    }
}

/// Scan an object block and report its reference fields
///
/// `block` is the whole object, header first, exactly as many words as the
/// header's footprint. `visit` receives indices into `block`.
///
/// # Panics
///
/// Panics if the block does not start with a valid header, if its length
/// disagrees with the header's footprint, or if it is a forwarding stub
/// (those are never scanned, only followed).
pub fn scan_object<F>(block: &[Word], mut visit: F) -> ObjectScan
where
    F: FnMut(usize),
{
    let header = match block.first().copied().and_then(ObjectHeader::decode) {
        Some(header) => header,
        None => panic!("scan_object: block does not start with an object header"),
    };
    assert_eq!(
        block.len(),
        header.words(),
        "scan_object: block length disagrees with the {:?} footprint",
        header.tag()
    );

    match header.tag() {
        Tag::Int => ObjectScan::default(),
        Tag::Attrs => {
            visit(1);
            ObjectScan {
                references: 1,
                unused_slots: 0,
            }
        },
        Tag::Bindings => {
            let capacity = header.misc() as u32;
            let (size, _sealed) = attrs::decode_size_word(block[1]);
            scan_bindings(block, capacity, size, visit)
        },
        Tag::Forward => panic!("scan_object: forwarding stubs are not scannable"),
    }
}

/// Scan the valid prefix of an attribute-set container
///
/// Reports the value field of each slot in `[0, size)`. Slots in
/// `[size, capacity)` are never read. Name and position fields are not
/// heap references and are not reported.
///
/// # Panics
///
/// Panics if `size > capacity` or if `block` is not exactly
/// `Bindings::words_for(capacity)` words long.
pub fn scan_bindings<F>(block: &[Word], capacity: u32, size: u32, mut visit: F) -> ObjectScan
where
    F: FnMut(usize),
{
    assert!(
        size <= capacity,
        "scan_bindings: size {} exceeds capacity {}",
        size,
        capacity
    );
    assert_eq!(
        block.len(),
        Bindings::words_for(capacity),
        "scan_bindings: block is not sized for capacity {}",
        capacity
    );

    for slot in 0..size {
        visit(attrs::value_field(slot));
    }

    ObjectScan {
        references: size as usize,
        unused_slots: (capacity - size) as usize,
    }
}
