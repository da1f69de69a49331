use crate::info::{AtomicInfo, Info};
use crate::{Config, Consumer, Metrics, MetricsSnapshot, Producer};
use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

// =============================================================================
// MEMORY ORDERING & SYNCHRONIZATION STRATEGY
// =============================================================================
//
// This SPSC queue never shares its indices across threads on the hot path.
// Each side learns about the other only through slot *occupancy*: a slot
// holding zero is vacant, anything else is a published value.
//
// ## Slot protocol
//
// **Producer (push path):**
// 1. Check the grant (`local_head != info.head`), or run the batching probe
// 2. Write the value with Release (publishes to the consumer)
//
// **Consumer (pop path):**
// 1. Load the tail slot with Acquire; zero means empty
// 2. Advance `tail` with Relaxed (sole writer; `distance` tolerates races)
// 3. Clear the slot with Release (hands it back to the producer)
//
// The 0 -> value -> 0 transition of each slot is the only happens-before
// edge between the sides, and it is all the FIFO protocol needs.
//
// ## The packed info word
//
// `info` packs {head, queue_size} into one CAS-able word (see `info.rs`).
// - Producer loads it Relaxed: it is the only mover of `head`, and a stale
//   `queue_size` is repaired by the CAS on the next probe or wrap.
// - Consumer loads `queue_size` at its wrap check with Acquire, pairing
//   with the producer's AcqRel grow CAS.
// - The shrink CAS is SeqCst; its whole-word compare is what conditions
//   the halving on the producer's head staying put.
//
// ## Resize visibility
//
// A grow commits *before* the producer publishes the value that completes
// the lap (slot `queue_size - 1`). The consumer can only reach its matching
// wrap check after acquiring that very slot, so the grown capacity is
// always visible by the time the consumer decides where to wrap. Keeping
// the resize decision ahead of the slot publish is load-bearing; do not
// reorder it.
//
// ## Single-writer fields
//
// - `local_head` lives in the `Producer` handle: plain field, one owner.
// - `tail` is atomic only because `distance` reads it; the consumer is its
//   sole writer and accesses it Relaxed.
// - Traffic counters are mostly-owned (one writer each, both sides read
//   both, both sides may reset on a committed resize). They vote on
//   resizing; stale reads are harmless because every resize is re-guarded.
// =============================================================================

/// Fields written by the producer at high rate.
#[derive(Debug)]
pub(crate) struct ProducerHot {
    /// Packed {head, queue_size} word.
    pub(crate) info: AtomicInfo,
    /// Runs in which the producer found the queue full (resize vote).
    pub(crate) traffic_full: AtomicU64,
}

/// Fields written by the consumer at high rate.
#[derive(Debug)]
pub(crate) struct ConsumerHot {
    /// Consumer's next read slot, `0 <= tail < queue_size`.
    pub(crate) tail: AtomicU32,
    /// Runs in which the consumer found the queue empty (resize vote).
    pub(crate) traffic_empty: AtomicU64,
}

/// Shared state of one queue.
///
/// The hot groups are cache-padded so producer traffic never invalidates
/// consumer lines and vice versa; the slot array sits on its own lines
/// behind both.
#[repr(C)]
pub(crate) struct Ring {
    pub(crate) prod: CachePadded<ProducerHot>,
    pub(crate) cons: CachePadded<ConsumerHot>,
    /// Slot array, allocated at `max_capacity` once so growth is just a
    /// wider wrap. Zero marks a vacant slot.
    data: CachePadded<Box<[AtomicU64]>>,
    pub(crate) config: Config,
    pub(crate) metrics: Metrics,
}

impl Ring {
    fn new(config: Config) -> Self {
        config.validate();

        let mut slots = Vec::with_capacity(config.max_capacity as usize);
        slots.resize_with(config.max_capacity as usize, || AtomicU64::new(0));

        Self {
            prod: CachePadded::new(ProducerHot {
                info: AtomicInfo::new(Info::new(0, config.initial_capacity)),
                traffic_full: AtomicU64::new(0),
            }),
            cons: CachePadded::new(ConsumerHot {
                tail: AtomicU32::new(0),
                traffic_empty: AtomicU64::new(0),
            }),
            data: CachePadded::new(slots.into_boxed_slice()),
            config,
            metrics: Metrics::new(),
        }
    }

    #[inline]
    pub(crate) fn slot(&self, index: u32) -> &AtomicU64 {
        &self.data[index as usize]
    }

    /// Current logical capacity.
    #[inline]
    pub(crate) fn capacity(&self) -> u32 {
        self.prod.info.load(Ordering::Relaxed).queue_size
    }

    /// Full-pressure surplus: how many more full runs than empty runs the
    /// queue has seen since the last resize.
    #[inline]
    pub(crate) fn full_pressure(&self) -> i64 {
        let full = self.prod.traffic_full.load(Ordering::Relaxed) as i64;
        let empty = self.cons.traffic_empty.load(Ordering::Relaxed) as i64;
        full - empty
    }

    /// Empty-pressure surplus, the mirror of [`full_pressure`].
    #[inline]
    pub(crate) fn empty_pressure(&self) -> i64 {
        -self.full_pressure()
    }

    /// Both votes start over after a committed resize.
    pub(crate) fn reset_traffic(&self) {
        self.prod.traffic_full.store(0, Ordering::Relaxed);
        self.cons.traffic_empty.store(0, Ordering::Relaxed);
    }

    /// Producer-observed occupancy estimate. Advisory only: it reads the
    /// published head (which runs ahead of the last written slot by the
    /// remaining grant) and a possibly stale tail.
    pub(crate) fn distance(&self) -> u32 {
        let info = self.prod.info.load(Ordering::Relaxed);
        let tail = self.cons.tail.load(Ordering::Relaxed);
        if info.head >= tail {
            info.head - tail
        } else {
            info.head + info.queue_size - tail
        }
    }

    pub(crate) fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Creates a queue and hands back its two endpoints.
///
/// Exactly one thread may drive the [`Producer`] and one the [`Consumer`];
/// the handles are `Send` but not `Clone`, so the type system enforces it.
///
/// # Panics
///
/// Panics if `config` is internally inconsistent (see [`Config`]).
pub fn queue(config: Config) -> (Producer, Consumer) {
    let ring = Arc::new(Ring::new(config));
    (Producer::new(Arc::clone(&ring)), Consumer::new(ring))
}
