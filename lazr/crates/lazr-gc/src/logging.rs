//! GC Logging and Tracing
//!
//! Structured event log for heap operations, useful for:
//! - Debugging the collector
//! - Measuring how much of the heap attribute sets occupy
//!
//! Every recorded event is also forwarded to the `log` facade at its level,
//! so an application that installs a `log` backend sees heap activity
//! without configuring anything here. The logger itself keeps only the most
//! recent `max_events` events.
//!
//! Log Levels:
//! - ERROR: Allocation failures
//! - INFO: GC cycles, heap statistics
//! - DEBUG: Verification results
//! - TRACE: Scan and relocation counters

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Log level for GC operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}

/// GC event types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GcEvent {
    /// Collection started
    CycleStart { cycle: u64, reason: String },

    /// Collection completed
    CycleEnd {
        cycle: u64,
        duration_ms: f64,
        reclaimed_words: usize,
    },

    /// Heap statistics
    HeapStats {
        used_words: usize,
        total_words: usize,
        utilization: f64,
    },

    /// Allocation failure
    AllocationFailure { requested: usize, available: usize },

    /// Scanner counters for one cycle
    ScanStats {
        objects_scanned: u64,
        references_found: u64,
        unused_slots_skipped: u64,
    },

    /// Relocation counters for one cycle
    RelocateStats {
        relocated_count: usize,
        words_moved: usize,
    },

    /// Heap verification result
    Verify { objects: usize, passed: bool },
}

impl std::fmt::Display for GcEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GcEvent::CycleStart { cycle, reason } => {
                write!(f, "[GC] Cycle {} started (reason: {})", cycle, reason)
            },
            GcEvent::CycleEnd {
                cycle,
                duration_ms,
                reclaimed_words,
            } => write!(
                f,
                "[GC] Cycle {} completed ({:.2}ms, reclaimed {} words)",
                cycle, duration_ms, reclaimed_words
            ),
            GcEvent::HeapStats {
                used_words,
                total_words,
                utilization,
            } => write!(
                f,
                "[GC] Heap: {}/{} words ({:.1}% utilized)",
                used_words,
                total_words,
                utilization * 100.0
            ),
            GcEvent::AllocationFailure {
                requested,
                available,
            } => write!(
                f,
                "[GC] Allocation failure: {} words requested, {} available",
                requested, available
            ),
            GcEvent::ScanStats {
                objects_scanned,
                references_found,
                unused_slots_skipped,
            } => write!(
                f,
                "[GC] Scanned: {} objects, {} references, {} unused slots skipped",
                objects_scanned, references_found, unused_slots_skipped
            ),
            GcEvent::RelocateStats {
                relocated_count,
                words_moved,
            } => write!(
                f,
                "[GC] Relocated: {} objects ({} words moved)",
                relocated_count, words_moved
            ),
            GcEvent::Verify { objects, passed } => write!(
                f,
                "[GC] Verify: {} objects, {}",
                objects,
                if *passed { "ok" } else { "FAILED" }
            ),
        }
    }
}

/// GC Logger configuration
#[derive(Debug, Clone)]
pub struct GcLoggerConfig {
    /// Minimum log level
    pub level: LogLevel,

    /// Echo events to stdout/stderr
    pub console: bool,

    /// Enable JSON format
    pub json: bool,

    /// Enable timestamps
    pub timestamps: bool,

    /// Events retained for `get_events`; the oldest is dropped on overflow
    pub max_events: usize,
}

impl Default for GcLoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            console: false,
            json: false,
            timestamps: true,
            max_events: 1024,
        }
    }
}

/// GC Logger - centralized logging for heap operations
pub struct GcLogger {
    config: GcLoggerConfig,
    events: Mutex<VecDeque<(Instant, GcEvent)>>,
    enabled: AtomicBool,
}

impl GcLogger {
    /// Create new GC logger
    pub fn new(config: GcLoggerConfig) -> Self {
        Self {
            config,
            events: Mutex::new(VecDeque::new()),
            enabled: AtomicBool::new(true),
        }
    }

    /// Enable logging
    pub fn enable(&self) {
        self.enabled.store(true, Ordering::Relaxed);
    }

    /// Disable logging
    pub fn disable(&self) {
        self.enabled.store(false, Ordering::Relaxed);
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Log a GC event
    pub fn log(&self, event: GcEvent) {
        if !self.is_enabled() {
            return;
        }

        let level = Self::event_level(&event);
        if level > self.config.level {
            return;
        }

        log::log!(target: "lazr_gc", level.into(), "{}", event);

        if self.config.console {
            let line = self.format(&event);
            if level == LogLevel::Error {
                eprintln!("{}", line);
            } else {
                println!("{}", line);
            }
        }

        if self.config.max_events == 0 {
            return;
        }
        let mut events = self.events.lock();
        while events.len() >= self.config.max_events {
            events.pop_front();
        }
        events.push_back((Instant::now(), event));
    }

    /// Get log level for event
    fn event_level(event: &GcEvent) -> LogLevel {
        match event {
            GcEvent::AllocationFailure { .. } => LogLevel::Error,
            GcEvent::CycleStart { .. } | GcEvent::CycleEnd { .. } | GcEvent::HeapStats { .. } => {
                LogLevel::Info
            },
            GcEvent::Verify { .. } => LogLevel::Debug,
            GcEvent::ScanStats { .. } | GcEvent::RelocateStats { .. } => LogLevel::Trace,
        }
    }

    /// Render one event the way the console output shows it
    pub fn format(&self, event: &GcEvent) -> String {
        let body = if self.config.json {
            serde_json::to_string(event).unwrap_or_else(|_| event.to_string())
        } else {
            event.to_string()
        };

        if self.config.timestamps {
            let now = chrono::Local::now();
            format!("[{}] {}", now.format("%Y-%m-%d %H:%M:%S%.3f"), body)
        } else {
            body
        }
    }

    /// Get all events
    pub fn get_events(&self) -> Vec<(Instant, GcEvent)> {
        self.events.lock().iter().cloned().collect()
    }

    /// Clear all events
    pub fn clear_events(&self) {
        self.events.lock().clear();
    }

    /// Get event count
    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }
}

impl Default for GcLogger {
    fn default() -> Self {
        Self::new(GcLoggerConfig::default())
    }
}

// Global GC logger
lazy_static::lazy_static! {
    static ref GLOBAL_LOGGER: Mutex<GcLogger> = Mutex::new(GcLogger::default());
}

/// Log a GC event to global logger
pub fn log_event(event: GcEvent) {
    GLOBAL_LOGGER.lock().log(event);
}

/// Configure global logger
pub fn configure_logger(config: GcLoggerConfig) {
    *GLOBAL_LOGGER.lock() = GcLogger::new(config);
}

/// Get global logger event count
pub fn get_event_count() -> usize {
    GLOBAL_LOGGER.lock().event_count()
}

/// Snapshot of the global logger's events
pub fn get_events() -> Vec<GcEvent> {
    GLOBAL_LOGGER
        .lock()
        .get_events()
        .into_iter()
        .map(|(_, event)| event)
        .collect()
}
