//! Global GC event log under repeated allocation failure
//!
//! Runs as its own test binary so nothing else touches the global logger.
//! Everything lives in one test for the same reason.

use lazr_gc::logging::{
    configure_logger, get_event_count, get_events, GcEvent, GcLoggerConfig, LogLevel,
};
use lazr_gc::{Bindings, Heap, HeapConfig};

fn tiny_heap(verbose: bool) -> Heap {
    Heap::new(HeapConfig {
        heap_words: 16,
        verbose,
        ..Default::default()
    })
    .expect("heap initialization should succeed")
}

#[test]
fn test_event_log_stays_bounded() {
    // Quiet heaps record nothing, however often they fail
    configure_logger(GcLoggerConfig {
        level: LogLevel::Trace,
        max_events: 64,
        ..Default::default()
    });
    let mut heap = tiny_heap(false);
    for _ in 0..1000 {
        assert!(Bindings::alloc(&mut heap, 100).is_err());
    }
    assert_eq!(get_event_count(), 0);
    assert_eq!(heap.stats().allocator.failures, 1000);

    // Verbose heaps record, up to the configured limit
    let mut heap = tiny_heap(true);
    for _ in 0..1000 {
        assert!(Bindings::alloc(&mut heap, 100).is_err());
    }
    assert_eq!(get_event_count(), 64);
    assert!(get_events().iter().all(|event| matches!(
        event,
        GcEvent::AllocationFailure {
            requested,
            available: 16
        } if *requested == Bindings::words_for(100)
    )));

    // Collections stay within the limit too
    for _ in 0..100 {
        heap.collect().expect("collection should succeed");
    }
    assert_eq!(get_event_count(), 64);
    assert!(get_events()
        .iter()
        .any(|event| matches!(event, GcEvent::CycleEnd { cycle: 100, .. })));
}
