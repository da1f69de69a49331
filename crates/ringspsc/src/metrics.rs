use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe stall and resize counters.
///
/// Stall counters advance once per blocked *run*, not once per failed
/// attempt: a side that keeps hitting full/empty in a loop charges a single
/// stall until its next successful operation. The result measures how often
/// a side stalls rather than for how long.
#[derive(Debug, Default)]
pub(crate) struct Metrics {
    full_stalls: AtomicU64,
    empty_stalls: AtomicU64,
    grows: AtomicU64,
    grows_rejected: AtomicU64,
    shrinks: AtomicU64,
    shrinks_rejected: AtomicU64,
}

impl Metrics {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub(crate) fn add_full_stall(&self) {
        self.full_stalls.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn add_empty_stall(&self) {
        self.empty_stalls.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_grow(&self) {
        self.grows.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_grow_rejected(&self) {
        self.grows_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_shrink(&self) {
        self.shrinks.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn add_shrink_rejected(&self) {
        self.shrinks_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            full_stalls: self.full_stalls.load(Ordering::Relaxed),
            empty_stalls: self.empty_stalls.load(Ordering::Relaxed),
            grows: self.grows.load(Ordering::Relaxed),
            grows_rejected: self.grows_rejected.load(Ordering::Relaxed),
            shrinks: self.shrinks.load(Ordering::Relaxed),
            shrinks_rejected: self.shrinks_rejected.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the queue's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Runs in which the producer found the queue full.
    pub full_stalls: u64,
    /// Runs in which the consumer found the queue empty.
    pub empty_stalls: u64,
    /// Committed capacity doublings.
    pub grows: u64,
    /// Doublings refused because the maximum capacity was reached.
    pub grows_rejected: u64,
    /// Committed capacity halvings.
    pub shrinks: u64,
    /// Halvings aborted by a guard or lost to a concurrent head move.
    pub shrinks_rejected: u64,
}
