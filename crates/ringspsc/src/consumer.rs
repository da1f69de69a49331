use crate::invariants::{
    debug_assert_capacity_bounded, debug_assert_index_bounded, debug_assert_resize_step,
};
use crate::ring::Ring;
use crate::timing::wait_ticks;
use crate::{MetricsSnapshot, PopError};
use std::num::NonZeroU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// The consuming endpoint of a queue.
///
/// `Send` but not `Clone`: exactly one thread may pop. The consumer owns
/// the tail index and is the only side allowed to halve the capacity,
/// which it attempts at its wrap point through the packed-word CAS.
pub struct Consumer {
    ring: Arc<Ring>,
    /// Set while the current empty run has already been counted.
    stalled: bool,
}

impl Consumer {
    pub(crate) fn new(ring: Arc<Ring>) -> Self {
        Self {
            ring,
            stalled: false,
        }
    }

    /// Takes the value at the tail of the queue.
    ///
    /// Returns [`PopError::Empty`] without side effects when the tail slot
    /// is vacant. Never blocks and never panics.
    pub fn try_pop(&mut self) -> Result<NonZeroU64, PopError> {
        let tail = self.ring.cons.tail.load(Ordering::Relaxed);

        // The acquire pairs with the producer's release publish; a vacant
        // slot is the only "empty" signal this protocol has.
        let raw = self.ring.slot(tail).load(Ordering::Acquire);
        let Some(value) = NonZeroU64::new(raw) else {
            self.record_empty_stall();
            return Err(PopError::Empty);
        };

        // Wrap check against the live capacity. The acquire here pairs
        // with the grow CAS, though reaching this point already implies
        // the grown value is visible (see the protocol notes in ring.rs).
        let queue_size = self.ring.prod.info.load(Ordering::Acquire).queue_size;
        debug_assert_index_bounded!("tail", tail, queue_size);
        if tail + 1 >= queue_size {
            self.maybe_shrink();
            self.ring.cons.tail.store(0, Ordering::Relaxed);
        } else {
            self.ring.cons.tail.store(tail + 1, Ordering::Relaxed);
        }

        // Clearing the slot is the release point of the whole dequeue: it
        // frees the slot for the producer and publishes the tail movement
        // above along with it.
        self.ring.slot(tail).store(0, Ordering::Release);
        self.stalled = false;
        Ok(value)
    }

    /// Spins with the configured penalty until a value arrives.
    pub fn pop_spinning(&mut self) -> NonZeroU64 {
        loop {
            if let Ok(value) = self.try_pop() {
                return value;
            }
            wait_ticks(self.ring.config.penalty);
        }
    }

    /// Halve the capacity if empty pressure reached the threshold and the
    /// producer's head has stayed out of the half being discarded.
    ///
    /// The CAS compares the whole packed word, so a head that moved since
    /// the guard was checked fails the exchange and the attempt is dropped;
    /// the next wrap re-evaluates from scratch.
    fn maybe_shrink(&self) {
        let config = &self.ring.config;
        if self.ring.empty_pressure() < config.shrink_threshold {
            return;
        }

        let observed = self.ring.prod.info.load(Ordering::Acquire);
        if observed.queue_size <= config.min_capacity {
            log::trace!("not shrinking below {} slots", observed.queue_size);
            self.ring.metrics.add_shrink_rejected();
            return;
        }
        if observed.head >= observed.queue_size >> 1 {
            log::trace!(
                "head {} still in the half being discarded, shrink postponed",
                observed.head
            );
            self.ring.metrics.add_shrink_rejected();
            return;
        }

        let halved = observed.halved();
        match self.ring.prod.info.compare_exchange(
            observed,
            halved,
            Ordering::SeqCst,
            Ordering::Relaxed,
        ) {
            Ok(_) => {
                debug_assert_resize_step!(observed.queue_size, halved.queue_size);
                debug_assert_capacity_bounded!(halved.queue_size, config);
                self.ring.reset_traffic();
                self.ring.metrics.add_shrink();
                log::debug!("shrank queue to {} slots", halved.queue_size);
            }
            Err(_) => {
                log::trace!("shrink lost to a concurrent head move");
                self.ring.metrics.add_shrink_rejected();
            }
        }
    }

    fn record_empty_stall(&mut self) {
        if !self.stalled {
            self.stalled = true;
            self.ring.cons.traffic_empty.fetch_add(1, Ordering::Relaxed);
            self.ring.metrics.add_empty_stall();
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
