//! Attribute Sets - Sorted name/value records in one heap block
//!
//! Block Layout (capacity N):
//! ┌──────────────────────────────────────────┐
//! │ word 0: header (tag Bindings, misc = N)  │
//! ├──────────────────────────────────────────┤
//! │ word 1: size (bits 0-31), sealed (bit 32)│
//! ├──────────────────────────────────────────┤
//! │ slot 0: name │ value │ pos               │  words 2..5
//! │ slot 1: name │ value │ pos               │  words 5..8
//! │ ...                                      │
//! │ slot N-1                                 │
//! └──────────────────────────────────────────┘
//!
//! Slots `[0, size)` hold records; slots `[size, N)` hold poison until they
//! are appended to. Capacity never changes after allocation.
//!
//! # Lifecycle
//!
//! 1. [`Bindings::alloc`] reserves the exact capacity, with `size = 0`
//! 2. [`Bindings::push`] appends records in any order
//! 3. [`Bindings::sort`] seals the set: records are ordered by name and
//!    duplicates collapse to the last one appended
//! 4. [`Bindings::view`] reads it: binary search, iteration, text order
//!
//! Lookups on an unsealed set and appends to a sealed one panic. So does
//! any operation through a handle that no longer names a container.
//!
//! # Example
//!
//! ```
//! use lazr_gc::{Attr, Bindings, Heap, HeapConfig};
//! use lazr_util::Symbol;
//!
//! let mut heap = Heap::new(HeapConfig::default()).unwrap();
//! let one = heap.alloc_int(1).unwrap();
//! let two = heap.alloc_int(2).unwrap();
//!
//! let set = Bindings::alloc(&mut heap, 2).unwrap();
//! set.push(&mut heap, Attr::new(Symbol::intern("b"), two));
//! set.push(&mut heap, Attr::new(Symbol::intern("a"), one));
//! set.sort(&mut heap);
//!
//! let view = set.view(&heap);
//! assert_eq!(view.get(Symbol::intern("a")).map(|attr| attr.value), Some(one));
//! assert!(view.get(Symbol::intern("c")).is_none());
//! ```

use crate::error::{EvalError, EvalResult, HeapError, Result};
use crate::heap::{Heap, ObjRef, Word};
use crate::object::{ObjectHeader, Tag, POISON};
use lazr_util::{PosIdx, Symbol};
use std::cmp::Ordering;

/// Words before the first slot: header and size word
pub const HEADER_WORDS: usize = 2;

/// Words per record slot: name, value, position
pub const SLOT_WORDS: usize = 3;

const SIZE_MASK: Word = 0xFFFF_FFFF;
const SEALED_BIT: Word = 1 << 32;

/// Offset of slot `slot`'s first word within the block
#[inline]
pub(crate) const fn slot_base(slot: u32) -> usize {
    HEADER_WORDS + SLOT_WORDS * slot as usize
}

/// Offset of slot `slot`'s value word within the block
#[inline]
pub(crate) const fn value_field(slot: u32) -> usize {
    slot_base(slot) + 1
}

#[inline]
pub(crate) const fn encode_size_word(size: u32, sealed: bool) -> Word {
    size as Word | if sealed { SEALED_BIT } else { 0 }
}

#[inline]
pub(crate) const fn decode_size_word(word: Word) -> (u32, bool) {
    ((word & SIZE_MASK) as u32, word & SEALED_BIT != 0)
}

/// One attribute: a name, the value bound to it, and where it was defined
///
/// Ordering and equality look at `name` only; the value is a non-owning
/// reference kept alive by the container the record lives in.
#[derive(Debug, Clone, Copy)]
pub struct Attr {
    pub name: Symbol,
    pub value: ObjRef,
    pub pos: PosIdx,
}

impl Attr {
    /// Record without a source position
    #[inline]
    pub fn new(name: Symbol, value: ObjRef) -> Self {
        Self::with_pos(name, value, PosIdx::NONE)
    }

    #[inline]
    pub fn with_pos(name: Symbol, value: ObjRef, pos: PosIdx) -> Self {
        Self { name, value, pos }
    }

    fn read(block: &[Word], slot: u32) -> Self {
        let base = slot_base(slot);
        Self {
            name: Symbol::from_u32(block[base] as u32),
            value: match ObjRef::from_word(block[base + 1]) {
                Some(value) => value,
                None => panic!("attribute slot {} holds no value reference", slot),
            },
            pos: PosIdx::from_u32(block[base + 2] as u32),
        }
    }

    fn write(self, block: &mut [Word], slot: u32) {
        let base = slot_base(slot);
        block[base] = self.name.as_u32() as Word;
        block[base + 1] = self.value.to_word();
        block[base + 2] = self.pos.as_u32() as Word;
    }
}

impl PartialEq for Attr {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Attr {}

impl PartialOrd for Attr {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Attr {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}

/// Handle to an attribute-set container on the heap
///
/// A plain reference: it does not keep the container alive and goes stale
/// at the next collection unless re-read from a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bindings(pub(crate) ObjRef);

impl Bindings {
    /// Words occupied by a container of `capacity` records
    ///
    /// ```
    /// use lazr_gc::Bindings;
    ///
    /// assert_eq!(Bindings::words_for(0), 2);
    /// assert_eq!(Bindings::words_for(4), 14);
    /// ```
    #[inline]
    pub const fn words_for(capacity: u32) -> usize {
        slot_base(capacity)
    }

    /// Allocate an empty container with room for exactly `capacity` records
    ///
    /// Fails with `CapacityOverflow` above the configured maximum and with
    /// `OutOfMemory` when the heap cannot fit the block. A zero-capacity
    /// container can never change, so it starts out sealed.
    pub fn alloc(heap: &mut Heap, capacity: u32) -> Result<Self> {
        let max = heap.config().max_bindings_capacity;
        if capacity > max {
            return Err(HeapError::CapacityOverflow {
                requested: capacity,
                max,
            });
        }

        let obj = heap.alloc(Tag::Bindings, capacity as Word, Self::words_for(capacity))?;
        heap.block_mut(obj)[1] = encode_size_word(0, capacity == 0);
        Ok(Self(obj))
    }

    /// Allocate, fill and seal a container in one go
    pub fn build<I>(heap: &mut Heap, attrs: I) -> Result<Self>
    where
        I: IntoIterator<Item = Attr>,
        I::IntoIter: ExactSizeIterator,
    {
        let attrs = attrs.into_iter();
        let capacity = u32::try_from(attrs.len()).map_err(|_| HeapError::CapacityOverflow {
            requested: u32::MAX,
            max: heap.config().max_bindings_capacity,
        })?;

        let bindings = Self::alloc(heap, capacity)?;
        for attr in attrs {
            bindings.push(heap, attr);
        }
        bindings.sort(heap);
        Ok(bindings)
    }

    /// Interpret `obj` as a container, `None` if it is anything else
    pub fn from_ref(heap: &Heap, obj: ObjRef) -> Option<Self> {
        match heap.try_header(obj) {
            Some(header) if header.tag() == Tag::Bindings => Some(Self(obj)),
            _ => None,
        }
    }

    /// The container's heap reference
    #[inline]
    pub fn obj(self) -> ObjRef {
        self.0
    }

    /// Append a record
    ///
    /// # Panics
    ///
    /// Panics if the handle no longer names a live container, if the
    /// container is full or sealed, or if `attr.value` is not a live object
    /// of this heap.
    #[track_caller]
    pub fn push(self, heap: &mut Heap, attr: Attr) {
        heap.assert_object(attr.value);

        let capacity = self.capacity(heap);
        let block = self.block_mut(heap);
        let (size, sealed) = decode_size_word(block[1]);
        assert!(
            size < capacity,
            "attribute set is full (capacity {}), cannot append {:?}",
            capacity,
            attr.name
        );
        assert!(!sealed, "cannot append {:?} to a sealed attribute set", attr.name);

        attr.write(block, size);
        block[1] = encode_size_word(size + 1, false);
    }

    /// Seal the container: order records by name and drop shadowed
    /// duplicates
    ///
    /// The sort is stable, so among records sharing a name the one appended
    /// last survives. Vacated slots are poisoned again and `size` shrinks.
    /// Sealing twice is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the handle no longer names a live container.
    #[track_caller]
    pub fn sort(self, heap: &mut Heap) {
        let block = self.block_mut(heap);
        let (size, sealed) = decode_size_word(block[1]);
        if sealed {
            return;
        }

        let mut attrs: Vec<Attr> = (0..size).map(|slot| Attr::read(block, slot)).collect();
        attrs.sort();

        let mut kept: Vec<Attr> = Vec::with_capacity(attrs.len());
        for attr in attrs {
            match kept.last_mut() {
                Some(last) if last.name == attr.name => *last = attr,
                _ => kept.push(attr),
            }
        }

        let new_size = kept.len() as u32;
        for (slot, attr) in kept.into_iter().enumerate() {
            attr.write(block, slot as u32);
        }
        block[slot_base(new_size)..slot_base(size)].fill(POISON);
        block[1] = encode_size_word(new_size, true);

        if new_size < size {
            log::debug!(
                "sealed attribute set {:?}: {} duplicate name(s) shadowed",
                self.0,
                size - new_size
            );
        }
    }

    /// Read-only view of the container
    #[track_caller]
    pub fn view(self, heap: &Heap) -> BindingsView<'_> {
        self.checked_header(heap);
        BindingsView {
            obj: self.0,
            block: heap.block(self.0),
        }
    }

    #[track_caller]
    fn capacity(self, heap: &Heap) -> u32 {
        self.checked_header(heap).misc() as u32
    }

    /// Header of the object this handle names, which must be a container
    ///
    /// A handle kept across a collection may point at whatever was
    /// allocated there since; every access goes through this check first.
    #[track_caller]
    fn checked_header(self, heap: &Heap) -> ObjectHeader {
        let header = heap.header(self.0);
        assert_eq!(header.tag(), Tag::Bindings, "{:?} is not an attribute set", self.0);
        header
    }

    #[track_caller]
    fn block_mut(self, heap: &mut Heap) -> &mut [Word] {
        self.checked_header(heap);
        heap.block_mut(self.0)
    }
}

/// Borrowed view over a container's block
#[derive(Clone, Copy)]
pub struct BindingsView<'a> {
    obj: ObjRef,
    block: &'a [Word],
}

impl<'a> BindingsView<'a> {
    /// The container's heap reference
    pub fn obj(&self) -> ObjRef {
        self.obj
    }

    /// Records appended so far
    #[inline]
    pub fn size(&self) -> u32 {
        decode_size_word(self.block[1]).0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Records the container was allocated for
    #[inline]
    pub fn capacity(&self) -> u32 {
        // The block spans exactly words_for(capacity) words.
        ((self.block.len() - HEADER_WORDS) / SLOT_WORDS) as u32
    }

    #[inline]
    pub fn is_sealed(&self) -> bool {
        decode_size_word(self.block[1]).1
    }

    /// Words the container occupies; independent of `size`
    #[inline]
    pub fn words(&self) -> usize {
        Bindings::words_for(self.capacity())
    }

    /// Record at index `i`
    ///
    /// # Panics
    ///
    /// Panics if `i >= size`.
    #[track_caller]
    pub fn attr(&self, i: u32) -> Attr {
        let size = self.size();
        assert!(i < size, "attribute index {} out of range for size {}", i, size);
        Attr::read(self.block, i)
    }

    /// Records in slot order (name order once sealed)
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Attr> + 'a {
        let block = self.block;
        (0..self.size()).map(move |slot| Attr::read(block, slot))
    }

    /// Index of the record named `name`
    ///
    /// Binary search for the first slot whose name is not less than `name`.
    ///
    /// # Panics
    ///
    /// Panics if the container has not been sealed. Zero-capacity
    /// containers are sealed from allocation, so lookups on them always
    /// return `None`.
    #[track_caller]
    pub fn find(&self, name: Symbol) -> Option<u32> {
        assert!(
            self.is_sealed(),
            "lookup of {:?} in an unsealed attribute set",
            name
        );

        let size = self.size();
        let (mut lo, mut hi) = (0, size);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if self.name_at(mid) < name {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }

        (lo < size && self.name_at(lo) == name).then_some(lo)
    }

    /// Record named `name`
    #[track_caller]
    pub fn get(&self, name: Symbol) -> Option<Attr> {
        self.find(name).map(|slot| Attr::read(self.block, slot))
    }

    /// Record named `name`, or a missing-attribute error at `pos`
    ///
    /// `pos` is where the attribute was demanded, not anything stored in
    /// the set.
    #[track_caller]
    pub fn need(&self, name: Symbol, pos: PosIdx) -> EvalResult<Attr> {
        self.get(name)
            .ok_or(EvalError::MissingAttribute { name, pos })
    }

    /// Records ordered by name text, for anything a user sees
    ///
    /// Deterministic across runs, unlike the lookup order which follows
    /// interning order.
    pub fn lexicographic_order(&self) -> Vec<Attr> {
        let mut attrs: Vec<Attr> = self.iter().collect();
        attrs.sort_by(|a, b| a.name.cmp_text(&b.name));
        attrs
    }

    fn name_at(&self, slot: u32) -> Symbol {
        Symbol::from_u32(self.block[slot_base(slot)] as u32)
    }
}

impl std::fmt::Debug for BindingsView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for attr in self.iter() {
            map.entry(&attr.name, &attr.value);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HeapConfig;
    use lazr_util::Pos;

    fn heap() -> Heap {
        Heap::new(HeapConfig {
            heap_words: 4096,
            ..Default::default()
        })
        .unwrap()
    }

    fn sym(name: &str) -> Symbol {
        Symbol::intern(name)
    }

    #[test]
    fn test_layout_helpers() {
        assert_eq!(slot_base(0), 2);
        assert_eq!(slot_base(1), 5);
        assert_eq!(value_field(2), 9);
        assert_eq!(decode_size_word(encode_size_word(17, true)), (17, true));
        assert_eq!(decode_size_word(encode_size_word(u32::MAX, false)), (u32::MAX, false));
    }

    #[test]
    fn test_attr_order_by_name_only() {
        let mut heap = heap();
        let one = heap.alloc_int(1).unwrap();
        let two = heap.alloc_int(2).unwrap();

        let a = Attr::new(sym("attrs_order_x"), one);
        let b = Attr::with_pos(sym("attrs_order_x"), two, PosIdx::add(Pos::new("o.nix", 1, 1)));
        assert_eq!(a, b);
        assert_eq!(a.cmp(&b), Ordering::Equal);
        assert!(a.pos.is_none());
    }

    #[test]
    fn test_alloc_empty() {
        let mut heap = heap();
        let set = Bindings::alloc(&mut heap, 3).unwrap();
        let view = set.view(&heap);

        assert_eq!(view.size(), 0);
        assert!(view.is_empty());
        assert_eq!(view.capacity(), 3);
        assert_eq!(view.words(), 11);
        assert!(!view.is_sealed());
        assert_eq!(Bindings::from_ref(&heap, set.obj()), Some(set));
    }

    #[test]
    fn test_from_ref_rejects_other_objects() {
        let mut heap = heap();
        let int = heap.alloc_int(3).unwrap();
        assert_eq!(Bindings::from_ref(&heap, int), None);
    }

    #[test]
    fn test_capacity_overflow() {
        let mut heap = Heap::new(HeapConfig {
            heap_words: 4096,
            max_bindings_capacity: 8,
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(
            Bindings::alloc(&mut heap, 9),
            Err(HeapError::CapacityOverflow { requested: 9, max: 8 })
        ));
    }

    #[test]
    fn test_push_and_sort() {
        let mut heap = heap();
        let values: Vec<_> = (0..3).map(|n| heap.alloc_int(n).unwrap()).collect();
        let names = [sym("attrs_ps_c"), sym("attrs_ps_a"), sym("attrs_ps_b")];

        let set = Bindings::alloc(&mut heap, 3).unwrap();
        for (name, value) in names.iter().zip(&values) {
            set.push(&mut heap, Attr::new(*name, *value));
        }
        assert_eq!(set.view(&heap).size(), 3);

        set.sort(&mut heap);
        let view = set.view(&heap);
        assert!(view.is_sealed());
        let sorted: Vec<_> = view.iter().map(|a| a.name).collect();
        let mut expected = names.to_vec();
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_sort_is_idempotent() {
        let mut heap = heap();
        let v = heap.alloc_int(0).unwrap();
        let set = Bindings::alloc(&mut heap, 4).unwrap();
        for name in ["attrs_id_d", "attrs_id_b", "attrs_id_a", "attrs_id_c"] {
            set.push(&mut heap, Attr::new(sym(name), v));
        }

        set.sort(&mut heap);
        let once: Vec<_> = set.view(&heap).iter().map(|a| a.name).collect();
        set.sort(&mut heap);
        let twice: Vec<_> = set.view(&heap).iter().map(|a| a.name).collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_duplicates_last_write_wins() {
        let mut heap = heap();
        let first = heap.alloc_int(1).unwrap();
        let other = heap.alloc_int(2).unwrap();
        let last = heap.alloc_int(3).unwrap();
        let dup = sym("attrs_dup_name");

        let set = Bindings::alloc(&mut heap, 3).unwrap();
        set.push(&mut heap, Attr::new(dup, first));
        set.push(&mut heap, Attr::new(sym("attrs_dup_other"), other));
        set.push(&mut heap, Attr::new(dup, last));
        set.sort(&mut heap);

        let view = set.view(&heap);
        assert_eq!(view.size(), 2);
        assert_eq!(view.capacity(), 3);
        assert_eq!(view.get(dup).map(|a| a.value), Some(last));
        assert_eq!(heap.block(set.obj())[slot_base(2)..], [POISON; 3]);
        heap.verify().unwrap();
    }

    #[test]
    fn test_find_get_need() {
        let mut heap = heap();
        let a = heap.alloc_int(1).unwrap();
        let b = heap.alloc_int(2).unwrap();
        let c = heap.alloc_int(3).unwrap();
        let set = Bindings::build(
            &mut heap,
            [
                Attr::new(sym("c"), c),
                Attr::new(sym("a"), a),
                Attr::new(sym("b"), b),
            ],
        )
        .unwrap();

        let view = set.view(&heap);
        assert_eq!(view.get(sym("b")).map(|attr| attr.value), Some(b));
        assert!(view.find(sym("a")).is_some());
        assert!(view.get(sym("z")).is_none());

        let pos = PosIdx::add(Pos::new("attrs_need.nix", 2, 5));
        match view.need(sym("z"), pos) {
            Err(EvalError::MissingAttribute { name, pos: at }) => {
                assert_eq!(name.as_str(), "z");
                assert_eq!(at, pos);
            },
            other => panic!("expected missing attribute, got {:?}", other),
        }
        assert_eq!(view.need(sym("c"), pos).unwrap().value, c);
    }

    #[test]
    fn test_find_returns_slot() {
        let mut heap = heap();
        let v = heap.alloc_int(0).unwrap();
        let names: Vec<_> = (0..10).map(|i| sym(&format!("attrs_slot_{}", i))).collect();
        let set = Bindings::build(&mut heap, names.iter().map(|&n| Attr::new(n, v))).unwrap();

        let view = set.view(&heap);
        for name in names {
            let slot = view.find(name).unwrap();
            assert_eq!(view.attr(slot).name, name);
        }
    }

    #[test]
    fn test_lexicographic_order() {
        let mut heap = heap();
        let v = heap.alloc_int(0).unwrap();
        // Interned in reverse text order so symbol order disagrees with text
        let zz = sym("attrs_lex_zz");
        let mm = sym("attrs_lex_mm");
        let aa = sym("attrs_lex_aa");

        let set = Bindings::build(
            &mut heap,
            [Attr::new(mm, v), Attr::new(aa, v), Attr::new(zz, v)],
        )
        .unwrap();

        let view = set.view(&heap);
        let by_symbol: Vec<_> = view.iter().map(|a| a.name).collect();
        assert_eq!(by_symbol, vec![zz, mm, aa]);

        let by_text: Vec<_> = view.lexicographic_order().into_iter().map(|a| a.name).collect();
        assert_eq!(by_text, vec![aa, mm, zz]);
    }

    #[test]
    fn test_zero_capacity() {
        let mut heap = heap();
        let set = Bindings::alloc(&mut heap, 0).unwrap();
        set.sort(&mut heap);

        let view = set.view(&heap);
        assert!(view.is_empty());
        assert_eq!(view.words(), 2);
        assert!(view.get(sym("anything")).is_none());
        assert!(view.lexicographic_order().is_empty());
    }

    #[test]
    fn test_zero_capacity_is_sealed_from_allocation() {
        let mut heap = heap();
        let set = Bindings::alloc(&mut heap, 0).unwrap();

        let view = set.view(&heap);
        assert!(view.is_sealed());
        assert_eq!(view.find(sym("attrs_zero_unsealed")), None);
        assert!(view.get(sym("attrs_zero_unsealed")).is_none());
    }

    #[test]
    #[should_panic(expected = "attribute set is full (capacity 0)")]
    fn test_push_into_zero_capacity() {
        let mut heap = heap();
        let v = heap.alloc_int(0).unwrap();
        let set = Bindings::alloc(&mut heap, 0).unwrap();
        set.push(&mut heap, Attr::new(sym("attrs_zero_push"), v));
    }

    /// A container handle whose block was reclaimed and reused by an int
    fn stale_handle_over_int(heap: &mut Heap) -> (Bindings, ObjRef) {
        let stale = Bindings::alloc(heap, 0).unwrap();
        heap.collect().unwrap();
        let int = heap.alloc_int(0).unwrap();
        assert_eq!(int, stale.obj());
        (stale, int)
    }

    #[test]
    fn test_stale_sort_leaves_reused_object_alone() {
        let mut heap = heap();
        let (stale, int) = stale_handle_over_int(&mut heap);

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| stale.sort(&mut heap)));
        assert!(result.is_err());
        assert_eq!(heap.value(int), Some(crate::value::Value::Int(0)));
    }

    #[test]
    #[should_panic(expected = "is not an attribute set")]
    fn test_stale_sort_panics() {
        let mut heap = heap();
        let (stale, _) = stale_handle_over_int(&mut heap);
        stale.sort(&mut heap);
    }

    #[test]
    #[should_panic(expected = "is not an attribute set")]
    fn test_stale_push_panics() {
        let mut heap = heap();
        let (stale, int) = stale_handle_over_int(&mut heap);
        stale.push(&mut heap, Attr::new(sym("attrs_stale_push"), int));
    }

    #[test]
    fn test_words_independent_of_size() {
        let mut heap = heap();
        let v = heap.alloc_int(0).unwrap();
        let set = Bindings::alloc(&mut heap, 5).unwrap();
        for i in 0..5 {
            assert_eq!(set.view(&heap).words(), Bindings::words_for(5));
            set.push(&mut heap, Attr::new(sym(&format!("attrs_words_{}", i)), v));
        }
        assert_eq!(set.view(&heap).words(), Bindings::words_for(5));
        assert_eq!(heap.header(set.obj()).words(), Bindings::words_for(5));
    }

    #[test]
    #[should_panic(expected = "attribute set is full")]
    fn test_push_past_capacity() {
        let mut heap = heap();
        let v = heap.alloc_int(0).unwrap();
        let set = Bindings::alloc(&mut heap, 1).unwrap();
        set.push(&mut heap, Attr::new(sym("attrs_full_a"), v));
        set.push(&mut heap, Attr::new(sym("attrs_full_b"), v));
    }

    #[test]
    #[should_panic(expected = "sealed attribute set")]
    fn test_push_after_seal() {
        let mut heap = heap();
        let v = heap.alloc_int(0).unwrap();
        let set = Bindings::alloc(&mut heap, 2).unwrap();
        set.sort(&mut heap);
        set.push(&mut heap, Attr::new(sym("attrs_late"), v));
    }

    #[test]
    #[should_panic(expected = "unsealed attribute set")]
    fn test_lookup_before_seal() {
        let mut heap = heap();
        let v = heap.alloc_int(0).unwrap();
        let set = Bindings::alloc(&mut heap, 1).unwrap();
        set.push(&mut heap, Attr::new(sym("attrs_early"), v));
        set.view(&heap).get(sym("attrs_early"));
    }

    #[test]
    #[should_panic(expected = "is not a live heap object")]
    fn test_push_foreign_value() {
        let mut heap = heap();
        let set = Bindings::alloc(&mut heap, 1).unwrap();
        // Points into the container's own record area
        let interior = ObjRef::from_index(set.obj().index() + 2).unwrap();
        set.push(&mut heap, Attr::new(sym("attrs_foreign"), interior));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_attr_index_out_of_range() {
        let mut heap = heap();
        let set = Bindings::alloc(&mut heap, 2).unwrap();
        set.view(&heap).attr(0);
    }

    #[test]
    fn test_debug_lists_entries() {
        let mut heap = heap();
        let v = heap.alloc_int(0).unwrap();
        let set = Bindings::build(&mut heap, [Attr::new(sym("attrs_dbg"), v)]).unwrap();
        let text = format!("{:?}", set.view(&heap));
        assert!(text.contains("Symbol(attrs_dbg)"));
    }
}
