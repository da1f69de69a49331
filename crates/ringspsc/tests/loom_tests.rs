//! Loom-based concurrency tests for ringspsc-rs.
//!
//! Run with: `cargo test --features loom --test loom_tests --release`
//!
//! Loom exhaustively explores thread interleavings. The models below
//! reproduce the two protocols the queue's correctness hangs on, the
//! sentinel-zero slot handoff and the packed-word resize CAS, in
//! isolation with tiny state spaces.

#![cfg(feature = "loom")]

use loom::sync::atomic::{AtomicU64, Ordering};
use loom::sync::Arc;
use loom::thread;

fn pack(head: u32, queue_size: u32) -> u64 {
    (u64::from(queue_size) << 32) | u64::from(head)
}

fn unpack(word: u64) -> (u32, u32) {
    (word as u32, (word >> 32) as u32)
}

/// A value handed through a slot is seen exactly once, and the slot
/// returns to vacant.
#[test]
fn loom_slot_handoff() {
    loom::model(|| {
        let slot = Arc::new(AtomicU64::new(0));
        let slot2 = Arc::clone(&slot);

        let producer = thread::spawn(move || {
            slot2.store(42, Ordering::Release);
        });

        let consumer = thread::spawn(move || {
            let mut received = None;
            for _ in 0..2 {
                let raw = slot.load(Ordering::Acquire);
                if raw != 0 {
                    received = Some(raw);
                    slot.store(0, Ordering::Release);
                    break;
                }
                loom::thread::yield_now();
            }
            received
        });

        producer.join().unwrap();
        let received = consumer.join().unwrap();
        if let Some(value) = received {
            assert_eq!(value, 42);
        }
    });
}

/// The producer's probe CAS and the consumer's halving CAS race on the
/// packed word. Whatever order they land in, the committed state keeps the
/// head inside the logical capacity: a shrink can only win while the head
/// is still in the surviving half.
#[test]
fn loom_shrink_cas_never_strands_the_head() {
    loom::model(|| {
        let info = Arc::new(AtomicU64::new(pack(1, 8)));
        let info_p = Arc::clone(&info);
        let info_c = Arc::clone(&info);

        // Producer: commit a probe that moves the head into the upper
        // half, retrying against whatever capacity it observes.
        let producer = thread::spawn(move || {
            let mut current = info_p.load(Ordering::Relaxed);
            loop {
                let (head, queue_size) = unpack(current);
                let target = (head + queue_size / 2) % queue_size;
                match info_p.compare_exchange(
                    current,
                    pack(target, queue_size),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                ) {
                    Ok(_) => break,
                    Err(actual) => current = actual,
                }
            }
        });

        // Consumer: one guarded shrink attempt, dropped on CAS failure.
        let consumer = thread::spawn(move || {
            let observed = info_c.load(Ordering::SeqCst);
            let (head, queue_size) = unpack(observed);
            if queue_size > 4 && head < queue_size / 2 {
                let _ = info_c.compare_exchange(
                    observed,
                    pack(head, queue_size / 2),
                    Ordering::SeqCst,
                    Ordering::Relaxed,
                );
            }
        });

        producer.join().unwrap();
        consumer.join().unwrap();

        let (head, queue_size) = unpack(info.load(Ordering::SeqCst));
        assert!(
            head < queue_size,
            "head {} stranded outside capacity {}",
            head,
            queue_size
        );
    });
}

/// A grow committed before the lap-closing slot publish is visible to the
/// consumer by the time it acquires that slot. The wrap protocol relies
/// on this ordering.
#[test]
fn loom_grow_visible_at_consumer_wrap() {
    loom::model(|| {
        let info = Arc::new(AtomicU64::new(pack(0, 4)));
        let slot = Arc::new(AtomicU64::new(0));
        let info_p = Arc::clone(&info);
        let slot_p = Arc::clone(&slot);

        let producer = thread::spawn(move || {
            let current = info_p.load(Ordering::Relaxed);
            let (head, queue_size) = unpack(current);
            info_p
                .compare_exchange(
                    current,
                    pack(head, queue_size * 2),
                    Ordering::AcqRel,
                    Ordering::Acquire,
                )
                .unwrap();
            // Publish the value that completes the lap only after the
            // resize is committed.
            slot_p.store(7, Ordering::Release);
        });

        let consumer = thread::spawn(move || {
            if slot.load(Ordering::Acquire) != 0 {
                let (_, queue_size) = unpack(info.load(Ordering::Acquire));
                assert_eq!(queue_size, 8, "grow invisible after slot acquire");
            }
        });

        producer.join().unwrap();
        consumer.join().unwrap();
    });
}
