use crate::info::Info;
use crate::invariants::{
    debug_assert_capacity_bounded, debug_assert_index_bounded, debug_assert_resize_step,
    debug_assert_slot_vacant,
};
use crate::ring::Ring;
use crate::timing::wait_ticks;
use crate::{MetricsSnapshot, PushError};
use std::num::NonZeroU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// The producing endpoint of a queue.
///
/// `Send` but not `Clone`: exactly one thread may push. The private
/// `local_head` shadows the published head so the hot path touches no
/// shared index at all: fullness is discovered through slot occupancy and
/// the batching probe.
pub struct Producer {
    ring: Arc<Ring>,
    /// Next slot to write. Runs ahead inside the probe's grant and meets
    /// the published head when the grant is exhausted.
    local_head: u32,
    /// Set while the current full run has already been counted.
    stalled: bool,
}

impl Producer {
    pub(crate) fn new(ring: Arc<Ring>) -> Self {
        Self {
            ring,
            local_head: 0,
            stalled: false,
        }
    }

    /// Publishes `value` at the head of the queue.
    ///
    /// Returns [`PushError::Full`] without side effects on the slots when
    /// no vacancy is in reach. Never blocks and never panics; retry policy
    /// belongs to the caller.
    pub fn try_push(&mut self, value: NonZeroU64) -> Result<(), PushError> {
        let mut info = self.ring.prod.info.load(Ordering::Relaxed);

        // Grant exhausted: find more vacant slots before writing.
        if self.local_head == info.head {
            match self.probe(info) {
                Some(granted) => info = granted,
                None => {
                    self.record_full_stall();
                    return Err(PushError::Full);
                }
            }
        }

        let slot = self.local_head;
        self.local_head += 1;
        if self.local_head >= info.queue_size {
            self.wrap_or_grow();
        }

        // The publish must stay after the wrap decision: a consumer can
        // only reach its own wrap check after acquiring this slot, which
        // is what makes a just-committed grow visible to it in time.
        let cell = self.ring.slot(slot);
        debug_assert_slot_vacant!(cell.load(Ordering::Relaxed), slot);
        cell.store(value.get(), Ordering::Release);
        self.stalled = false;
        Ok(())
    }

    /// Spins with the configured penalty until the push succeeds.
    pub fn push_spinning(&mut self, value: NonZeroU64) {
        while self.try_push(value).is_err() {
            wait_ticks(self.ring.config.penalty);
        }
    }

    /// Batching probe: extend the grant by jumping the head forward in
    /// power-of-two strides without ever touching the consumer's index.
    ///
    /// Occupied values form one contiguous run, so a vacant slot `stride`
    /// ahead proves everything between the head and it is vacant too. On a
    /// hit the stride halves down to the configured slice; the search is
    /// exponentially bounded rather than a linear scan.
    fn probe(&self, mut info: Info) -> Option<Info> {
        let config = &self.ring.config;
        loop {
            let queue_size = info.queue_size;
            let mut stride = config.batch_size.min(queue_size >> 1);
            let mut target = wrap_index(info.head, stride, queue_size);

            while self.ring.slot(target).load(Ordering::Acquire) != 0 {
                wait_ticks(config.penalty);
                if stride > config.batch_slice {
                    stride >>= 1;
                    target = wrap_index(info.head, stride, queue_size);
                } else {
                    return None;
                }
            }

            debug_assert_index_bounded!("head", target, queue_size);
            let granted = info.with_head(target);
            match self.ring.prod.info.compare_exchange(
                info,
                granted,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(granted),
                // Lost to a concurrent shrink; rescan against the new
                // capacity.
                Err(fresh) => info = fresh,
            }
        }
    }

    /// Wrap decision at `local_head == queue_size`: double the capacity if
    /// full pressure reached the threshold, otherwise wrap to zero.
    fn wrap_or_grow(&mut self) {
        let config = &self.ring.config;
        if self.ring.full_pressure() < config.enlarge_threshold {
            self.local_head = 0;
            return;
        }

        let mut info = self.ring.prod.info.load(Ordering::Relaxed);
        loop {
            if info.queue_size << 1 > config.max_capacity {
                log::warn!(
                    "queue under full pressure but already at {} slots",
                    info.queue_size
                );
                self.ring.metrics.add_grow_rejected();
                self.local_head = 0;
                return;
            }

            let grown = info.doubled();
            match self.ring.prod.info.compare_exchange(
                info,
                grown,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => {
                    debug_assert_resize_step!(info.queue_size, grown.queue_size);
                    debug_assert_capacity_bounded!(grown.queue_size, config);
                    self.ring.reset_traffic();
                    self.ring.metrics.add_grow();
                    log::debug!("enlarged queue to {} slots", grown.queue_size);
                    // The slots past the old end are untouched, hence
                    // vacant; filling continues right there.
                    self.local_head = info.queue_size;
                    return;
                }
                Err(fresh) => info = fresh,
            }
        }
    }

    fn record_full_stall(&mut self) {
        if !self.stalled {
            self.stalled = true;
            self.ring.prod.traffic_full.fetch_add(1, Ordering::Relaxed);
            self.ring.metrics.add_full_stall();
        }
    }

    /// Current logical capacity.
    pub fn capacity(&self) -> u32 {
        self.ring.capacity()
    }

    /// Capacity ceiling fixed at construction.
    pub fn max_capacity(&self) -> u32 {
        self.ring.config.max_capacity
    }

    /// Producer-observed occupancy estimate (advisory).
    pub fn distance(&self) -> u32 {
        self.ring.distance()
    }

    /// Snapshot of the stall and resize counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.ring.metrics()
    }
}

/// `(base + offset) mod queue_size` for `base < queue_size` and
/// `offset <= queue_size`, without a division.
#[inline]
fn wrap_index(base: u32, offset: u32, queue_size: u32) -> u32 {
    let sum = base + offset;
    if sum >= queue_size {
        sum - queue_size
    } else {
        sum
    }
}
