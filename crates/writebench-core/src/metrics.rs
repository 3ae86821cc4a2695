//! Process-wide completion counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Success/failure tally for write completions.
///
/// Incremented from arbitrary completion-handling threads with no ordering
/// constraints; each counter is independent and single-field, so relaxed
/// atomics are all the synchronization required.
#[derive(Debug, Default)]
pub struct AppendCounters {
    success: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time read of both counters.
///
/// A snapshot may race with in-flight increments; exact-to-the-instant
/// consistency is not needed for a rate estimate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub success: u64,
    pub failed: u64,
}

impl AppendCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self) {
        self.success.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            success: self.success.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
