use ringspsc_rs::{queue, Config};
use std::num::NonZeroU64;
use std::thread;

#[test]
fn fifo_order_across_threads() {
    const N: u64 = 200_000;

    // Small ring with low thresholds: the run crosses plenty of grow and
    // shrink events while the sequence check below stays exact.
    let config = Config {
        initial_capacity: 8,
        min_capacity: 8,
        max_capacity: 1024,
        batch_size: 4,
        batch_slice: 2,
        enlarge_threshold: 4,
        shrink_threshold: 4,
        penalty: 50,
    };
    let (mut producer, mut consumer) = queue(config);

    let handle = thread::spawn(move || {
        for i in 1..=N {
            let value = NonZeroU64::new(i).unwrap();
            while producer.try_push(value).is_err() {
                std::hint::spin_loop();
            }
        }
        producer
    });

    // Exact sequence match covers FIFO order, non-loss and
    // non-duplication at once.
    let mut expected = 1u64;
    while expected <= N {
        match consumer.try_pop() {
            Ok(value) => {
                assert_eq!(value.get(), expected, "FIFO violation at {}", expected);
                expected += 1;
            }
            Err(_) => std::hint::spin_loop(),
        }
    }

    let producer = handle.join().unwrap();
    assert!(consumer.try_pop().is_err());

    let capacity = consumer.capacity();
    assert!(capacity.is_power_of_two());
    assert!((8..=1024).contains(&capacity));

    // Both views read the same counters.
    assert_eq!(producer.metrics(), consumer.metrics());
}

#[test]
fn spinning_helpers_round_trip() {
    const N: u64 = 10_000;

    let (mut producer, mut consumer) = queue(Config::new(64, 10));

    let handle = thread::spawn(move || {
        for i in 1..=N {
            producer.push_spinning(NonZeroU64::new(i).unwrap());
        }
    });

    for i in 1..=N {
        assert_eq!(consumer.pop_spinning().get(), i);
    }
    handle.join().unwrap();
}

#[test]
fn bursty_producer_keeps_order_through_resizes() {
    const BURSTS: u64 = 200;
    const BURST_LEN: u64 = 64;

    let config = Config {
        initial_capacity: 16,
        min_capacity: 8,
        max_capacity: 256,
        batch_size: 8,
        batch_slice: 2,
        enlarge_threshold: 2,
        shrink_threshold: 2,
        penalty: 20,
    };
    let (mut producer, mut consumer) = queue(config);

    let handle = thread::spawn(move || {
        let mut i = 1u64;
        for _ in 0..BURSTS {
            for _ in 0..BURST_LEN {
                producer.push_spinning(NonZeroU64::new(i).unwrap());
                i += 1;
            }
            // Idle gap between bursts; lets empty pressure accumulate.
            ringspsc_rs::timing::wait_ticks(5_000);
        }
        producer
    });

    for i in 1..=BURSTS * BURST_LEN {
        assert_eq!(consumer.pop_spinning().get(), i);
    }

    let producer = handle.join().unwrap();
    let capacity = producer.capacity();
    assert!(capacity.is_power_of_two());
    assert!((8..=256).contains(&capacity));
}
