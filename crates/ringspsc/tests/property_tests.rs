//! Property-based tests of the queue against a plain FIFO model.
//!
//! A single thread drives random push/pop interleavings and checks the
//! queue against a `VecDeque`. Resizing is configured aggressively so the
//! random walks cross grow and shrink events; the FIFO contract and the
//! capacity bounds must hold through all of them.

use proptest::prelude::*;
use ringspsc_rs::{queue, Config};
use std::collections::VecDeque;
use std::num::NonZeroU64;

fn elastic_config() -> Config {
    Config {
        initial_capacity: 8,
        min_capacity: 4,
        max_capacity: 64,
        batch_size: 4,
        batch_slice: 1,
        enlarge_threshold: 2,
        shrink_threshold: 2,
        penalty: 0,
    }
}

proptest! {
    /// Every successful pop yields exactly what the model predicts, a
    /// failed pop means the queue really is empty, and the drained tail
    /// matches the model to the last value. Covers FIFO order, non-loss
    /// and non-duplication in one sweep.
    #[test]
    fn queue_matches_fifo_model(ops in prop::collection::vec(any::<bool>(), 1..400)) {
        let (mut producer, mut consumer) = queue(elastic_config());
        let mut model = VecDeque::new();
        let mut next = 1u64;

        for push in ops {
            if push {
                let value = NonZeroU64::new(next).unwrap();
                if producer.try_push(value).is_ok() {
                    model.push_back(next);
                }
                next += 1;
            } else {
                match consumer.try_pop() {
                    Ok(value) => prop_assert_eq!(Some(value.get()), model.pop_front()),
                    Err(_) => prop_assert!(model.is_empty(),
                        "queue claims empty while the model still holds {} values", model.len()),
                }
            }
        }

        while let Ok(value) = consumer.try_pop() {
            prop_assert_eq!(Some(value.get()), model.pop_front());
        }
        prop_assert!(model.is_empty());
    }

    /// Capacity stays a power of two within the configured range, and
    /// between any two observations it is unchanged, doubled or halved.
    #[test]
    fn capacity_moves_in_powers_of_two(ops in prop::collection::vec(any::<bool>(), 1..400)) {
        let config = elastic_config();
        let (mut producer, mut consumer) = queue(config);
        let mut next = 1u64;
        let mut before = producer.capacity();

        for push in ops {
            if push {
                let _ = producer.try_push(NonZeroU64::new(next).unwrap());
                next += 1;
            } else {
                let _ = consumer.try_pop();
            }

            let after = producer.capacity();
            prop_assert!(after.is_power_of_two());
            prop_assert!(after >= config.min_capacity && after <= config.max_capacity);
            prop_assert!(
                after == before || after == before * 2 || after == before / 2,
                "capacity moved {} -> {}", before, after
            );
            before = after;
        }
    }
}
