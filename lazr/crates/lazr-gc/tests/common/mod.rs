//! Test utilities for the lazr-gc integration suite
//!
//! Every helper asserts strictly: a failed allocation or a heap that does
//! not verify fails the test on the spot.

#![allow(dead_code)]

use lazr_gc::{Attr, Bindings, Heap, HeapConfig, ObjRef, RootId, Value};
use lazr_util::Symbol;

/// Default heap size for tests (64K words)
pub const DEFAULT_HEAP_WORDS: usize = 64 * 1024;

/// Heap fixture
///
/// Owns a fresh heap that verifies itself after every collection.
pub struct HeapFixture {
    pub heap: Heap,
}

impl HeapFixture {
    /// Create fixture with default test configuration
    pub fn with_defaults() -> Self {
        Self::with_heap_words(DEFAULT_HEAP_WORDS)
    }

    /// Create fixture with custom heap size
    pub fn with_heap_words(heap_words: usize) -> Self {
        let config = HeapConfig {
            heap_words,
            verify_after_collect: true,
            ..Default::default()
        };
        let heap = Heap::new(config).expect("heap initialization should succeed");
        Self { heap }
    }

    /// Allocate a boxed integer
    pub fn int(&mut self, n: i64) -> ObjRef {
        self.heap
            .alloc_int(n)
            .unwrap_or_else(|e| panic!("allocating int {} failed: {}", n, e))
    }

    /// Build and seal a set from `(name, int)` pairs
    pub fn set_of(&mut self, entries: &[(&str, i64)]) -> Bindings {
        let attrs: Vec<Attr> = entries
            .iter()
            .map(|&(name, n)| Attr::new(Symbol::intern(name), self.int(n)))
            .collect();
        Bindings::build(&mut self.heap, attrs).expect("building a set should succeed")
    }

    /// Box `bindings` as a value and register it as a root
    pub fn root_set(&mut self, bindings: Bindings) -> RootId {
        let value = self
            .heap
            .alloc_attrs(bindings)
            .expect("allocating a set value should succeed");
        self.heap.add_root(value)
    }

    /// Container behind a rooted set value
    pub fn rooted_set(&self, id: RootId) -> Bindings {
        let obj = self.heap.root(id).expect("root should be registered");
        match self.heap.value(obj) {
            Some(Value::Attrs(bindings)) => bindings,
            other => panic!("root {:?} holds {:?}, not a set", id, other),
        }
    }

    /// Integer stored under `name` in a sealed set
    pub fn int_attr(&self, bindings: Bindings, name: &str) -> Option<i64> {
        let attr = bindings.view(&self.heap).get(Symbol::intern(name))?;
        match self.heap.value(attr.value) {
            Some(Value::Int(n)) => Some(n),
            other => panic!("attribute {} holds {:?}, not an int", name, other),
        }
    }

    /// Collect and assert the heap still verifies
    pub fn collect(&mut self) {
        self.heap.collect().expect("collection should succeed");
        self.assert_verified();
    }

    pub fn assert_verified(&self) -> usize {
        self.heap
            .verify()
            .unwrap_or_else(|e| panic!("heap failed verification: {}", e))
    }
}

impl Default for HeapFixture {
    fn default() -> Self {
        Self::with_defaults()
    }
}
