use std::sync::atomic::{AtomicU64, Ordering};

// =============================================================================
// THE PACKED METADATA WORD
// =============================================================================
//
// The producer's head index and the queue's logical capacity share one
// naturally-aligned 64-bit word:
//
//       63            32 31             0
//      +----------------+----------------+
//      |   queue_size   |      head      |
//      +----------------+----------------+
//
// Packing them is what makes the shrink protocol work: a word-wide CAS that
// replaces `queue_size` necessarily compares `head` too, so the capacity
// write is committed atomically *with* the condition that the producer's
// head has not moved since it was observed. The consumer gets a conditional
// write on one field keyed on the other field, from a single plain CAS.
//
// Rust offers no sound way to store just the `head` half while another
// thread CASes the whole word, so every producer-side update re-encodes
// both fields through `compare_exchange` as well. Those CASes only lose to
// a concurrent shrink, which is rare and strictly bounded (at most one
// attempt per consumer wrap).
// =============================================================================

/// Decoded snapshot of the packed word: the producer's next write slot and
/// the current logical capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Info {
    /// Producer's published head index, `0 <= head < queue_size`.
    pub head: u32,
    /// Current logical capacity, a power of two.
    pub queue_size: u32,
}

impl Info {
    pub(crate) const fn new(head: u32, queue_size: u32) -> Self {
        Self { head, queue_size }
    }

    const fn pack(self) -> u64 {
        ((self.queue_size as u64) << 32) | self.head as u64
    }

    const fn unpack(word: u64) -> Self {
        Self {
            head: word as u32,
            queue_size: (word >> 32) as u32,
        }
    }

    /// Same capacity, head moved to `head`.
    pub(crate) const fn with_head(self, head: u32) -> Self {
        Self { head, ..self }
    }

    /// Same head, capacity doubled.
    pub(crate) const fn doubled(self) -> Self {
        Self {
            queue_size: self.queue_size << 1,
            ..self
        }
    }

    /// Same head, capacity halved.
    pub(crate) const fn halved(self) -> Self {
        Self {
            queue_size: self.queue_size >> 1,
            ..self
        }
    }
}

/// The shared atomic cell holding an [`Info`].
///
/// All typed accessors take explicit orderings; the callers own the
/// synchronization story (documented in `ring.rs`).
#[derive(Debug)]
pub(crate) struct AtomicInfo(AtomicU64);

impl AtomicInfo {
    pub(crate) fn new(info: Info) -> Self {
        Self(AtomicU64::new(info.pack()))
    }

    #[inline]
    pub(crate) fn load(&self, order: Ordering) -> Info {
        Info::unpack(self.0.load(order))
    }

    /// Word-wide CAS over both fields. Returns the winning snapshot on
    /// failure so the caller can retry from fresh state.
    #[inline]
    pub(crate) fn compare_exchange(
        &self,
        current: Info,
        new: Info,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Info, Info> {
        self.0
            .compare_exchange(current.pack(), new.pack(), success, failure)
            .map(Info::unpack)
            .map_err(Info::unpack)
    }
}
