//! Relocate Module - Copying Collection
//!
//! [`Heap::collect`] is a stop-the-world Cheney collection:
//! 1. Evacuate every root into the spare semispace
//! 2. Scan to-space left to right, evacuating whatever the scanned
//!    objects reference
//! 3. Install to-space as the active space and zero the old one
//!
//! Objects are moved by their footprint alone and traced only through
//! the object scanner, so a container caught halfway through construction
//! moves intact and its unwritten slots are never followed.

pub mod copy;

pub use copy::{CopyStats, ObjectCopier};

use crate::error::Result;
use crate::heap::Heap;
use crate::logging::{log_event, GcEvent};
use crate::marker::ObjectScanStats;
use std::time::{Duration, Instant};

/// Outcome of one collection
#[derive(Debug, Clone)]
pub struct CollectStats {
    /// Cycle number, starting at 1
    pub cycle: u64,
    /// Words in use before collecting
    pub words_before: usize,
    /// Words in use after collecting
    pub words_after: usize,
    /// Copy counters
    pub copy: CopyStats,
    /// Scanner counters
    pub scan: ObjectScanStats,
    /// Wall time of the collection
    pub duration: Duration,
}

impl CollectStats {
    /// Words freed by this collection
    pub fn reclaimed_words(&self) -> usize {
        self.words_before.saturating_sub(self.words_after)
    }
}

impl Heap {
    /// Collect garbage, keeping everything reachable from the roots
    ///
    /// Every `ObjRef` not obtained through [`Heap::root`] afterwards is
    /// stale. Runs heap verification afterwards when
    /// `HeapConfig::verify_after_collect` is set and returns its error.
    pub fn collect(&mut self) -> Result<CollectStats> {
        let start = Instant::now();
        let cycle = self.cycles() + 1;
        let words_before = self.used_words();
        let verbose = self.config().verbose;

        if verbose {
            log_event(GcEvent::CycleStart {
                cycle,
                reason: "explicit".to_string(),
            });
        }

        let mut to = self.take_spare();
        let parts = self.collection_parts();
        let mut copier = ObjectCopier::new(parts.from, parts.from_starts, &mut to);
        for root in parts.roots.values_mut() {
            *root = copier.evacuate(*root);
        }
        copier.scan();
        let (top, to_starts, copy, scan) = copier.finish();

        self.install_space(to, to_starts, top);

        let stats = CollectStats {
            cycle,
            words_before,
            words_after: top,
            copy,
            scan,
            duration: start.elapsed(),
        };

        log::debug!(
            "gc cycle {}: {} objects ({} words) survived, {} words reclaimed",
            cycle,
            stats.copy.objects_copied,
            stats.copy.words_copied,
            stats.reclaimed_words()
        );

        if verbose {
            let heap = self.stats();
            log_event(GcEvent::ScanStats {
                objects_scanned: stats.scan.objects_scanned,
                references_found: stats.scan.references_found,
                unused_slots_skipped: stats.scan.unused_slots_skipped,
            });
            log_event(GcEvent::RelocateStats {
                relocated_count: stats.copy.objects_copied,
                words_moved: stats.copy.words_copied,
            });
            log_event(GcEvent::HeapStats {
                used_words: heap.used_words,
                total_words: heap.total_words,
                utilization: heap.utilization(),
            });
            log_event(GcEvent::CycleEnd {
                cycle,
                duration_ms: stats.duration.as_secs_f64() * 1000.0,
                reclaimed_words: stats.reclaimed_words(),
            });
        }

        if self.config().verify_after_collect {
            self.verify()?;
        }

        Ok(stats)
    }
}
