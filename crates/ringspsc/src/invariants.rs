//! Debug assertion macros for the queue's structural invariants.
//!
//! Active only in debug builds, so the hot paths carry zero overhead in
//! release. Each macro names the property it checks; violations indicate a
//! protocol bug, not a caller error.

/// An index published by either side stays inside the logical capacity.
macro_rules! debug_assert_index_bounded {
    ($name:literal, $index:expr, $queue_size:expr) => {
        debug_assert!(
            $index < $queue_size,
            "{} index {} outside logical capacity {}",
            $name,
            $index,
            $queue_size
        )
    };
}

/// The logical capacity stays a power of two within the configured range.
macro_rules! debug_assert_capacity_bounded {
    ($queue_size:expr, $config:expr) => {
        debug_assert!(
            $queue_size.is_power_of_two()
                && $queue_size >= $config.min_capacity
                && $queue_size <= $config.max_capacity,
            "logical capacity {} outside [{}, {}] or not a power of two",
            $queue_size,
            $config.min_capacity,
            $config.max_capacity
        )
    };
}

/// A committed resize either doubled or halved the capacity.
macro_rules! debug_assert_resize_step {
    ($old:expr, $new:expr) => {
        debug_assert!(
            $new == $old << 1 || $new == $old >> 1,
            "capacity changed {} -> {}, neither doubled nor halved",
            $old,
            $new
        )
    };
}

/// The slot a producer is about to publish into is vacant.
macro_rules! debug_assert_slot_vacant {
    ($slot_value:expr, $index:expr) => {
        debug_assert!(
            $slot_value == 0,
            "publishing into occupied slot {} (holds {})",
            $index,
            $slot_value
        )
    };
}

pub(crate) use debug_assert_capacity_bounded;
pub(crate) use debug_assert_index_bounded;
pub(crate) use debug_assert_resize_step;
pub(crate) use debug_assert_slot_vacant;
