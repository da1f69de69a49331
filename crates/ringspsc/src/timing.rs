//! Cycle counting and bounded spin-waits.
//!
//! The queue backs off in CPU cycles rather than wall-clock time so that on
//! frequency-scaling cores the back-off length tracks the actual work rate.
//! Nothing here synchronizes anything; these are rate-limiting primitives
//! only.

use std::hint;

/// Reads the monotonic cycle counter.
///
/// Timestamp counter on x86-64, virtual counter on aarch64. On other
/// targets this falls back to the monotonic clock in nanoseconds, which
/// keeps `wait_ticks` meaningful if not cycle-accurate.
#[inline]
pub fn cycles() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        // SAFETY: RDTSC has no preconditions; it only reads the TSC.
        unsafe { core::arch::x86_64::_rdtsc() }
    }

    #[cfg(target_arch = "aarch64")]
    {
        let count: u64;
        // SAFETY: CNTVCT_EL0 is a readable-from-EL0 monotonic counter.
        unsafe {
            core::arch::asm!("mrs {count}, cntvct_el0", count = out(reg) count);
        }
        count
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        use std::sync::OnceLock;
        use std::time::Instant;

        static START: OnceLock<Instant> = OnceLock::new();
        START.get_or_init(Instant::now).elapsed().as_nanos() as u64
    }
}

/// Spins until the cycle counter has advanced by at least `ticks`.
#[inline]
pub fn wait_ticks(ticks: u64) {
    let deadline = cycles().wrapping_add(ticks);
    while cycles() < deadline {
        hint::spin_loop();
    }
}
