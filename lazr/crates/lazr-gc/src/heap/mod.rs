//! Heap Management Module - Word-Addressed Semispace Heap
//!
//! The heap is a flat array of 64-bit words. Objects are allocated by
//! bumping a pointer through the active semispace and are addressed by
//! their word offset ([`ObjRef`]). Collection copies everything reachable
//! from the roots into the other semispace (see [`crate::relocate`]).
//!
//! Heap Structure:
//! ```text
//! ┌──────────────────────── active space ────────────────────────┐
//! │ hdr │ w1 │ hdr │ w1 │ hdr │ size │ slot0 │ slot1 │ ... │ free │
//! │  Int      │  Attrs    │  Bindings (capacity 2)       │      │
//! └──────────────────────────────────────────────────────────────┘
//!   ^object start bits: 1      1         1
//! ```
//!
//! Every object's first word is its header. Everything the heap knows
//! about an object's extent comes from [`ObjectHeader::words`]; the
//! object-start bitmap records where objects begin so a reference can be
//! checked before it is stored.

pub mod bitmap;

pub use bitmap::ObjectBitmap;

use crate::allocator::{AllocatorStats, BumpAllocator};
use crate::config::HeapConfig;
use crate::error::{HeapError, Result};
use crate::logging::{log_event, GcEvent};
use crate::marker::scan_object;
use crate::object::{ObjectHeader, Tag, POISON};
use indexmap::IndexMap;

/// The heap's unit of storage
pub type Word = u64;

/// Reference to a heap object: the word offset of its header
///
/// References are only meaningful for the heap that produced them and
/// only until the next collection, unless held as a root.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjRef(u32);

impl ObjRef {
    /// Word offset of the object's header
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Encode for storage in a heap word
    #[inline]
    pub const fn to_word(self) -> Word {
        self.0 as Word
    }

    /// Decode a heap word, `None` if it cannot be a reference
    #[inline]
    pub fn from_word(word: Word) -> Option<Self> {
        u32::try_from(word).ok().map(ObjRef)
    }

    /// Build a reference from a word offset
    ///
    /// The result is unchecked; [`Heap::is_object`] tells whether it names
    /// a live object.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(ObjRef)
    }
}

impl std::fmt::Debug for ObjRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ObjRef({:#x})", self.0)
    }
}

/// Handle to a registered root
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RootId(u64);

/// Heap statistics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeapStats {
    /// Words in use in the active space
    pub used_words: usize,
    /// Size of the active space in words
    pub total_words: usize,
    /// Live objects (allocated since the last collection or surviving it)
    pub objects: usize,
    /// Registered roots
    pub roots: usize,
    /// Completed collections
    pub cycles: u64,
    /// Allocator counters
    pub allocator: AllocatorStats,
}

impl HeapStats {
    /// Fraction of the active space in use (0.0 - 1.0)
    pub fn utilization(&self) -> f64 {
        if self.total_words == 0 {
            return 0.0;
        }
        self.used_words as f64 / self.total_words as f64
    }
}

/// Heap - the active semispace, its allocator and its roots
///
/// Allocation and mutation take `&mut Heap`. Reading takes `&Heap`, and the
/// heap is `Sync`, so sealed containers can be read from many threads at
/// once without locking.
pub struct Heap {
    config: HeapConfig,

    /// Active semispace
    space: Vec<Word>,

    /// Evacuation target for the next collection; zeroed between cycles
    spare: Vec<Word>,

    allocator: BumpAllocator,

    /// Object starts in `space`
    starts: ObjectBitmap,

    roots: IndexMap<RootId, ObjRef>,
    next_root: u64,

    cycles: u64,
    allocations: u64,
    failures: u64,
}

impl Heap {
    /// Create a heap with both semispaces sized by `config`
    pub fn new(config: HeapConfig) -> Result<Self> {
        config.validate()?;

        let words = config.heap_words;
        let allocator = BumpAllocator::new(0, words)?;

        Ok(Self {
            space: vec![0; words],
            spare: vec![0; words],
            allocator,
            starts: ObjectBitmap::new(words),
            roots: IndexMap::new(),
            next_root: 0,
            cycles: 0,
            allocations: 0,
            failures: 0,
            config,
        })
    }

    /// Configuration this heap was built with
    pub fn config(&self) -> &HeapConfig {
        &self.config
    }

    // === Allocation ===

    /// Allocate an object of `words` words with the given header
    ///
    /// Word 0 receives the header, every other word is filled with
    /// [`POISON`], and the object start is recorded. Returns
    /// `OutOfMemory` when the active space cannot fit the object; nothing
    /// is retried.
    ///
    /// # Panics
    ///
    /// Panics if `words` disagrees with the footprint the header implies,
    /// or if `tag` is `Forward` (only the collector writes those).
    pub fn alloc(&mut self, tag: Tag, misc: Word, words: usize) -> Result<ObjRef> {
        assert!(tag != Tag::Forward, "forwarding stubs cannot be allocated");
        let header = ObjectHeader::new(tag, misc);
        assert_eq!(
            header.words(),
            words,
            "allocation of {} words disagrees with the {:?} footprint",
            words,
            tag
        );

        let start = match self.allocator.allocate(words) {
            Ok(start) => start,
            Err(err) => {
                self.failures += 1;
                if let HeapError::OutOfMemory {
                    requested,
                    available,
                } = err
                {
                    log::warn!(
                        "heap exhausted: {} words requested, {} available",
                        requested,
                        available
                    );
                    if self.config.verbose {
                        log_event(GcEvent::AllocationFailure {
                            requested,
                            available,
                        });
                    }
                }
                return Err(err);
            },
        };
        let obj = ObjRef::from_index(start).ok_or(HeapError::OutOfMemory {
            requested: words,
            available: 0,
        })?;

        self.space[start] = header.raw();
        self.space[start + 1..start + words].fill(POISON);
        self.starts.set(start);
        self.allocations += 1;

        Ok(obj)
    }

    // === Validity ===

    /// Whether `obj` names a live object in the active space
    ///
    /// True only for an in-bounds word that starts an object, carries a
    /// decodable header and has not been forwarded.
    pub fn is_object(&self, obj: ObjRef) -> bool {
        let index = obj.index();
        index < self.allocator.top()
            && self.starts.is_set(index)
            && matches!(ObjectHeader::decode(self.space[index]), Some(h) if !h.is_forwarded())
    }

    /// Panic unless `obj` names a live object
    ///
    /// Used at the moment a reference enters the object graph, so a foreign
    /// or stale reference is caught where it is stored rather than at the
    /// next collection.
    #[inline]
    #[track_caller]
    pub fn assert_object(&self, obj: ObjRef) {
        assert!(self.is_object(obj), "{:?} is not a live heap object", obj);
    }

    /// Header of a live object
    #[track_caller]
    pub fn header(&self, obj: ObjRef) -> ObjectHeader {
        self.assert_object(obj);
        match ObjectHeader::decode(self.space[obj.index()]) {
            Some(header) => header,
            None => unreachable!("is_object accepted an undecodable header"),
        }
    }

    /// Header of `obj` if it is a live object
    pub fn try_header(&self, obj: ObjRef) -> Option<ObjectHeader> {
        if self.is_object(obj) {
            ObjectHeader::decode(self.space[obj.index()])
        } else {
            None
        }
    }

    /// The whole block of a live object, header first
    #[track_caller]
    pub fn block(&self, obj: ObjRef) -> &[Word] {
        let words = self.header(obj).words();
        &self.space[obj.index()..obj.index() + words]
    }

    /// Mutable block of a live object, header first
    #[track_caller]
    pub(crate) fn block_mut(&mut self, obj: ObjRef) -> &mut [Word] {
        let words = self.header(obj).words();
        &mut self.space[obj.index()..obj.index() + words]
    }

    // === Walking ===

    /// Walk every object in the active space in address order
    ///
    /// Steps from header to header by footprint; after a collection this
    /// visits exactly the survivors.
    pub fn objects(&self) -> ObjectWalk<'_> {
        ObjectWalk {
            space: &self.space[..self.allocator.top()],
            cursor: 0,
        }
    }

    /// Check the whole heap for consistency
    ///
    /// Every object start found by walking must be recorded in the bitmap
    /// and vice versa, no live object may be a forwarding stub, and every
    /// reference reported by the scanner (and every root) must name a live
    /// object. Returns the number of objects checked.
    pub fn verify(&self) -> Result<usize> {
        let top = self.allocator.top();
        let mut cursor = 0;
        let mut objects = 0;

        while cursor < top {
            let header = match ObjectHeader::decode(self.space[cursor]) {
                Some(header) if !header.is_forwarded() => header,
                _ => return Err(invalid(cursor)),
            };
            let words = header.words();
            if !self.starts.is_set(cursor) || cursor + words > top {
                return Err(invalid(cursor));
            }

            let block = &self.space[cursor..cursor + words];
            let mut dangling = None;
            scan_object(block, |field| {
                let target = ObjRef::from_word(block[field]);
                if dangling.is_none() && !target.is_some_and(|t| self.is_object(t)) {
                    dangling = Some(cursor + field);
                }
            });
            if let Some(field) = dangling {
                return Err(invalid(field));
            }

            objects += 1;
            cursor += words;
        }

        if self.starts.count() != objects {
            let stray = self
                .starts
                .iter()
                .find(|&start| start >= top || ObjectHeader::decode(self.space[start]).is_none());
            return Err(invalid(stray.unwrap_or(top)));
        }

        for &root in self.roots.values() {
            if !self.is_object(root) {
                return Err(HeapError::InvalidObject { address: root.0 });
            }
        }

        if self.config.verbose {
            log_event(GcEvent::Verify {
                objects,
                passed: true,
            });
        }

        Ok(objects)
    }

    // === Roots ===

    /// Register `obj` as a root; it and everything it reaches survive
    /// collection, and [`Heap::root`] returns its current address
    #[track_caller]
    pub fn add_root(&mut self, obj: ObjRef) -> RootId {
        self.assert_object(obj);
        let id = RootId(self.next_root);
        self.next_root += 1;
        self.roots.insert(id, obj);
        id
    }

    /// Current address of a root
    pub fn root(&self, id: RootId) -> Option<ObjRef> {
        self.roots.get(&id).copied()
    }

    /// Unregister a root, returning its current address
    pub fn remove_root(&mut self, id: RootId) -> Option<ObjRef> {
        self.roots.shift_remove(&id)
    }

    /// Number of registered roots
    pub fn root_count(&self) -> usize {
        self.roots.len()
    }

    // === Statistics ===

    pub fn stats(&self) -> HeapStats {
        HeapStats {
            used_words: self.allocator.allocated(),
            total_words: self.allocator.capacity(),
            objects: self.starts.count(),
            roots: self.roots.len(),
            cycles: self.cycles,
            allocator: AllocatorStats {
                allocated_words: self.allocator.allocated(),
                remaining_words: self.allocator.remaining(),
                allocations: self.allocations,
                failures: self.failures,
            },
        }
    }

    /// Words still available for allocation
    pub fn remaining_words(&self) -> usize {
        self.allocator.remaining()
    }

    /// Words allocated in the active space
    pub fn used_words(&self) -> usize {
        self.allocator.allocated()
    }

    // === Collector plumbing ===

    /// Swap in the evacuated space after a collection
    pub(crate) fn install_space(&mut self, space: Vec<Word>, starts: ObjectBitmap, top: usize) {
        let mut old = std::mem::replace(&mut self.space, space);
        old.fill(0);
        self.spare = old;
        self.starts = starts;
        self.allocator.reset();
        self.allocator.set_top(top);
        self.cycles += 1;
    }

    /// Take the spare semispace to evacuate into
    pub(crate) fn take_spare(&mut self) -> Vec<Word> {
        std::mem::take(&mut self.spare)
    }

    /// Borrow the pieces the collector works on, all at once
    pub(crate) fn collection_parts(&mut self) -> CollectionParts<'_> {
        let top = self.allocator.top();
        CollectionParts {
            from: &mut self.space[..top],
            from_starts: &self.starts,
            roots: &mut self.roots,
        }
    }

    pub(crate) fn cycles(&self) -> u64 {
        self.cycles
    }
}

/// Disjoint borrows of the active space, its start bitmap and the roots
pub(crate) struct CollectionParts<'a> {
    pub(crate) from: &'a mut [Word],
    pub(crate) from_starts: &'a ObjectBitmap,
    pub(crate) roots: &'a mut IndexMap<RootId, ObjRef>,
}

fn invalid(index: usize) -> HeapError {
    HeapError::InvalidObject {
        address: index as u32,
    }
}

/// Linear walk over the active space
pub struct ObjectWalk<'a> {
    space: &'a [Word],
    cursor: usize,
}

impl Iterator for ObjectWalk<'_> {
    type Item = (ObjRef, ObjectHeader);

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.space.len() {
            return None;
        }
        let header = match ObjectHeader::decode(self.space[self.cursor]) {
            Some(header) => header,
            None => panic!("heap walk hit an undecodable header at word {}", self.cursor),
        };
        let obj = ObjRef(self.cursor as u32);
        self.cursor += header.words();
        Some((obj, header))
    }
}
