//! Attribute set lookup, ordering and footprint tests
//!
//! Sets are built through the public API only, collected, and read back
//! through roots.

mod common;

use common::HeapFixture;
use lazr_gc::{Attr, Bindings, EvalError, Value};
use lazr_util::symbol::{S_META, S_NAME, S_OUT_PATH, S_SYSTEM, S_TYPE};
use lazr_util::{Pos, PosIdx, Symbol};

// ============================================================================
// LOOKUP
// ============================================================================

#[test]
fn test_lookup_finds_every_name() {
    let mut fx = HeapFixture::with_defaults();
    let set = fx.set_of(&[("zlib", 1), ("openssl", 2), ("curl", 3), ("bash", 4)]);

    assert_eq!(fx.int_attr(set, "zlib"), Some(1));
    assert_eq!(fx.int_attr(set, "openssl"), Some(2));
    assert_eq!(fx.int_attr(set, "curl"), Some(3));
    assert_eq!(fx.int_attr(set, "bash"), Some(4));
    assert_eq!(fx.int_attr(set, "perl"), None);
}

#[test]
fn test_lookup_survives_collection() {
    let mut fx = HeapFixture::with_defaults();
    let set = fx.set_of(&[("name", 10), ("version", 20), ("src", 30)]);
    let id = fx.root_set(set);

    // Garbage between the set and the next collection
    for n in 0..100 {
        fx.int(n);
    }
    fx.collect();
    fx.collect();

    let set = fx.rooted_set(id);
    assert_eq!(fx.int_attr(set, "name"), Some(10));
    assert_eq!(fx.int_attr(set, "version"), Some(20));
    assert_eq!(fx.int_attr(set, "src"), Some(30));
}

#[test]
fn test_need_reports_demand_position() {
    let mut fx = HeapFixture::with_defaults();
    let set = fx.set_of(&[("outPath", 1)]);
    let pos = PosIdx::add(Pos::new("default.nix", 12, 7));

    let err = set
        .view(&fx.heap)
        .need(Symbol::intern("meta"), pos)
        .unwrap_err();
    match err {
        EvalError::MissingAttribute { name, pos: at } => {
            assert_eq!(name, Symbol::intern("meta"));
            assert_eq!(at, pos);
        },
        other => panic!("expected a missing attribute, got {:?}", other),
    }
    assert_eq!(
        set.view(&fx.heap)
            .need(Symbol::intern("meta"), pos)
            .unwrap_err()
            .to_string(),
        "attribute 'meta' missing, at default.nix:12:7"
    );
}

#[test]
fn test_known_names_match_interned_text() {
    let mut fx = HeapFixture::with_defaults();
    let set = fx.set_of(&[("type", 1), ("name", 2), ("outPath", 3), ("system", 4)]);
    let view = set.view(&fx.heap);

    let known_names = [
        (S_TYPE, "type"),
        (S_NAME, "name"),
        (S_OUT_PATH, "outPath"),
        (S_SYSTEM, "system"),
    ];
    for (known, text) in known_names {
        assert_eq!(Symbol::intern(text), known);
        assert_eq!(view.get(known).map(|a| a.name.as_str()), Some(text));
    }
    assert_eq!(fx.int_attr(set, "outPath"), Some(3));
    assert!(view.get(S_META).is_none());
}

#[test]
fn test_record_position_is_kept() {
    let mut fx = HeapFixture::with_defaults();
    let value = fx.int(5);
    let pos = PosIdx::add(Pos::new("flake.nix", 3, 5));

    let set = Bindings::build(
        &mut fx.heap,
        [Attr::with_pos(Symbol::intern("inputs"), value, pos)],
    )
    .unwrap();
    let id = fx.root_set(set);
    fx.collect();

    let attr = fx
        .rooted_set(id)
        .view(&fx.heap)
        .get(Symbol::intern("inputs"))
        .unwrap();
    assert_eq!(attr.pos, pos);
    assert_eq!(attr.pos.get().map(|p| p.line), Some(3));
}

#[test]
fn test_empty_set_lookup() {
    let mut fx = HeapFixture::with_defaults();
    let set = Bindings::build(&mut fx.heap, Vec::<Attr>::new()).unwrap();
    let view = set.view(&fx.heap);

    assert!(view.is_empty());
    assert!(view.is_sealed());
    assert_eq!(view.find(Symbol::intern("anything")), None);
    assert_eq!(view.iter().len(), 0);
}

// ============================================================================
// ORDERING
// ============================================================================

#[test]
fn test_sealed_order_follows_symbol_order() {
    let mut fx = HeapFixture::with_defaults();
    let set = fx.set_of(&[("d", 4), ("b", 2), ("c", 3), ("a", 1)]);
    let names: Vec<Symbol> = set.view(&fx.heap).iter().map(|a| a.name).collect();

    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn test_lexicographic_order_is_by_text() {
    let mut fx = HeapFixture::with_defaults();
    // Interned in reverse so the symbol order disagrees with the text order
    for name in ["lex_z", "lex_m", "lex_a"] {
        Symbol::intern(name);
    }
    let set = fx.set_of(&[("lex_a", 1), ("lex_z", 26), ("lex_m", 13)]);

    let names: Vec<&str> = set
        .view(&fx.heap)
        .lexicographic_order()
        .iter()
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, ["lex_a", "lex_m", "lex_z"]);
}

#[test]
fn test_duplicate_names_last_write_wins() {
    let mut fx = HeapFixture::with_defaults();
    let set = fx.set_of(&[("x", 1), ("y", 2), ("x", 3), ("x", 4)]);
    let view = set.view(&fx.heap);

    assert_eq!(view.size(), 2);
    assert_eq!(view.capacity(), 4);
    assert_eq!(fx.int_attr(set, "x"), Some(4));
    assert_eq!(fx.int_attr(set, "y"), Some(2));
}

// ============================================================================
// FOOTPRINT
// ============================================================================

#[test]
fn test_footprint_is_fixed_by_capacity() {
    let mut fx = HeapFixture::with_defaults();
    for capacity in [0u32, 1, 2, 7, 64] {
        let before = fx.heap.used_words();
        let set = Bindings::alloc(&mut fx.heap, capacity).unwrap();
        assert_eq!(fx.heap.used_words() - before, Bindings::words_for(capacity));
        assert_eq!(set.view(&fx.heap).words(), 2 + 3 * capacity as usize);
        assert_eq!(fx.heap.header(set.obj()).words(), Bindings::words_for(capacity));
    }
}

#[test]
fn test_partial_fill_keeps_footprint() {
    let mut fx = HeapFixture::with_defaults();
    let set = Bindings::alloc(&mut fx.heap, 10).unwrap();
    let value = fx.int(1);
    set.push(&mut fx.heap, Attr::new(Symbol::intern("only"), value));
    set.sort(&mut fx.heap);
    let id = fx.root_set(set);

    fx.collect();

    let view = fx.rooted_set(id).view(&fx.heap);
    assert_eq!(view.size(), 1);
    assert_eq!(view.capacity(), 10);
    assert_eq!(view.words(), Bindings::words_for(10));
}

#[test]
fn test_heap_walk_steps_over_containers() {
    let mut fx = HeapFixture::with_defaults();
    fx.set_of(&[("a", 1)]);
    Bindings::alloc(&mut fx.heap, 5).unwrap();
    fx.int(9);

    let walked: usize = fx.heap.objects().map(|(_, header)| header.words()).sum();
    assert_eq!(walked, fx.heap.used_words());
    assert_eq!(fx.assert_verified(), fx.heap.objects().count());
}

// ============================================================================
// BOUNDARIES
// ============================================================================

#[test]
fn test_fill_to_exact_capacity() {
    let mut fx = HeapFixture::with_defaults();
    let set = Bindings::alloc(&mut fx.heap, 3).unwrap();
    for (i, name) in ["one", "two", "three"].into_iter().enumerate() {
        let value = fx.int(i as i64);
        set.push(&mut fx.heap, Attr::new(Symbol::intern(name), value));
    }
    set.sort(&mut fx.heap);

    let view = set.view(&fx.heap);
    assert_eq!(view.size(), view.capacity());
}

#[test]
#[should_panic(expected = "attribute set is full")]
fn test_push_past_capacity_panics() {
    let mut fx = HeapFixture::with_defaults();
    let set = Bindings::alloc(&mut fx.heap, 1).unwrap();
    let value = fx.int(0);
    set.push(&mut fx.heap, Attr::new(Symbol::intern("a"), value));
    set.push(&mut fx.heap, Attr::new(Symbol::intern("b"), value));
}

#[test]
#[should_panic(expected = "sealed attribute set")]
fn test_push_after_seal_panics() {
    let mut fx = HeapFixture::with_defaults();
    let set = Bindings::alloc(&mut fx.heap, 2).unwrap();
    let value = fx.int(0);
    set.sort(&mut fx.heap);
    set.push(&mut fx.heap, Attr::new(Symbol::intern("late"), value));
}

#[test]
#[should_panic(expected = "unsealed attribute set")]
fn test_lookup_before_seal_panics() {
    let mut fx = HeapFixture::with_defaults();
    let set = Bindings::alloc(&mut fx.heap, 2).unwrap();
    set.view(&fx.heap).find(Symbol::intern("a"));
}

#[test]
#[should_panic(expected = "out of range")]
fn test_index_past_size_panics() {
    let mut fx = HeapFixture::with_defaults();
    let set = fx.set_of(&[("a", 1)]);
    set.view(&fx.heap).attr(1);
}

#[test]
fn test_value_decoding() {
    let mut fx = HeapFixture::with_defaults();
    let set = fx.set_of(&[("a", 1)]);
    let value = fx.heap.alloc_attrs(set).unwrap();

    assert_eq!(fx.heap.value(value), Some(Value::Attrs(set)));
    assert_eq!(fx.heap.value(value).unwrap().type_name(), "set");
    // The container itself is not a value
    assert_eq!(fx.heap.value(set.obj()), None);
}
