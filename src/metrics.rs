use std::sync::atomic::{AtomicU64, Ordering};

/// Runtime counters for one group.
///
/// Purpose:
/// - Track how many ticks ran
/// - Track dispatched vs. skipped instance runs
/// - Track failed and panicked collections
///
/// Design:
/// - Lock-free (Atomics)
/// - Written only by the scheduler after joining a task,
///   never from inside instance tasks
#[derive(Debug, Default)]
pub struct RuntimeMetrics {
    ticks: AtomicU64,
    dispatched: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
    panicked: AtomicU64,
}

/// Point-in-time copy of [`RuntimeMetrics`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub ticks: u64,
    pub dispatched: u64,
    pub skipped: u64,
    pub failed: u64,
    pub panicked: u64,
}

impl RuntimeMetrics {
    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_panic(&self) {
        self.panicked.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            panicked: self.panicked.load(Ordering::Relaxed),
        }
    }
}
