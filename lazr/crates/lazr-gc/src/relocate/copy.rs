//! Object Copying - Cheney evacuation
//!
//! Copy Strategy:
//! 1. Copy the object's whole footprint into to-space (poisoned slots
//!    included, they are part of the block)
//! 2. Record the new start in the to-space bitmap
//! 3. Overwrite the from-space header with a `Forward` stub whose misc
//!    keeps the original footprint and whose word 1 holds the new address
//!
//! To-space doubles as the work queue: everything between the scan pointer
//! and the allocation top has been copied but not yet traced.

use crate::heap::{ObjRef, ObjectBitmap, Word};
use crate::marker::{scan_object, ObjectScanStats};
use crate::object::{ObjectHeader, Tag};

/// Copy counters for one collection
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CopyStats {
    /// Objects evacuated
    pub objects_copied: usize,
    /// Words evacuated
    pub words_copied: usize,
}

/// ObjectCopier - evacuates reachable objects from one space to another
pub struct ObjectCopier<'a> {
    from: &'a mut [Word],
    from_starts: &'a ObjectBitmap,
    to: &'a mut [Word],
    to_starts: ObjectBitmap,
    top: usize,
    copy_stats: CopyStats,
    scan_stats: ObjectScanStats,
}

impl<'a> ObjectCopier<'a> {
    /// Create a copier from `from` (the allocated part of the active
    /// space) into `to` (an empty space at least as large)
    pub fn new(from: &'a mut [Word], from_starts: &'a ObjectBitmap, to: &'a mut [Word]) -> Self {
        assert!(
            to.len() >= from.len(),
            "to-space ({} words) smaller than from-space ({} words)",
            to.len(),
            from.len()
        );
        let to_starts = ObjectBitmap::new(to.len());
        Self {
            from,
            from_starts,
            to,
            to_starts,
            top: 0,
            copy_stats: CopyStats::default(),
            scan_stats: ObjectScanStats::new(),
        }
    }

    /// Evacuate `obj` if it has not been already, returning its new address
    ///
    /// # Panics
    ///
    /// Panics if `obj` is not an object start in from-space. A reference
    /// read from an unwritten slot would land here.
    pub fn evacuate(&mut self, obj: ObjRef) -> ObjRef {
        let index = obj.index();
        assert!(
            self.from_starts.is_set(index) && index < self.from.len(),
            "collector reached {:?}, which is not an object start",
            obj
        );

        let header = match ObjectHeader::decode(self.from[index]) {
            Some(header) => header,
            None => panic!("collector reached {:?}, which has no valid header", obj),
        };

        if header.is_forwarded() {
            return match ObjRef::from_word(self.from[index + 1]) {
                Some(new) => new,
                None => panic!("forwarding stub at {:?} holds no address", obj),
            };
        }

        let words = header.words();
        let new_index = self.top;
        self.to[new_index..new_index + words].copy_from_slice(&self.from[index..index + words]);
        self.to_starts.set(new_index);
        self.top += words;

        let new = match ObjRef::from_index(new_index) {
            Some(new) => new,
            None => unreachable!("to-space offsets fit in 32 bits"),
        };
        self.from[index] = ObjectHeader::new(Tag::Forward, words as Word).raw();
        self.from[index + 1] = new.to_word();

        self.copy_stats.objects_copied += 1;
        self.copy_stats.words_copied += words;

        new
    }

    /// Trace everything copied so far, evacuating what it references,
    /// until no unscanned object remains
    pub fn scan(&mut self) {
        let mut cursor = 0;
        let mut fields = Vec::new();

        while cursor < self.top {
            let header = match ObjectHeader::decode(self.to[cursor]) {
                Some(header) => header,
                None => panic!("to-space holds an undecodable header at word {}", cursor),
            };
            let words = header.words();

            fields.clear();
            let scan = scan_object(&self.to[cursor..cursor + words], |field| fields.push(field));
            self.scan_stats.record(scan);

            for &field in &fields {
                let slot = cursor + field;
                let target = match ObjRef::from_word(self.to[slot]) {
                    Some(target) => target,
                    None => panic!("field at to-space word {} holds no reference", slot),
                };
                self.to[slot] = self.evacuate(target).to_word();
            }

            cursor += words;
        }
    }

    /// Finish, returning the to-space top, its start bitmap and counters
    pub fn finish(self) -> (usize, ObjectBitmap, CopyStats, ObjectScanStats) {
        (self.top, self.to_starts, self.copy_stats, self.scan_stats)
    }
}
